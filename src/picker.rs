use crate::{float::FloatContent, hint::Shortcut, shortcuts, theme::Theme};
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent},
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem},
};

/// Single-select list float. The first entry is conventionally the
/// "everything" choice, so `selected == 0` means no filter.
pub struct ListPicker {
    title: &'static str,
    items: Vec<String>,
    selected: usize,
    cursor: usize,
    scroll: usize,
    last_visible_height: usize,
    pub finished: bool,
    pub cancelled: bool,
}

impl ListPicker {
    /// `items` must not be empty; `selected` indexes into it.
    pub fn new(title: &'static str, items: Vec<String>, selected: usize) -> Self {
        Self {
            title,
            items,
            selected,
            cursor: selected,
            scroll: 0,
            last_visible_height: 0,
            finished: false,
            cancelled: false,
        }
    }

    /// Index of the committed choice.
    pub fn choice(&self) -> usize {
        self.selected
    }

    fn ensure_cursor_in_view(&mut self) {
        if self.last_visible_height == 0 {
            return;
        }
        let start = self.scroll;
        let end = self
            .scroll
            .saturating_add(self.last_visible_height.saturating_sub(1));
        if self.cursor < start {
            self.scroll = self.cursor;
        } else if self.cursor > end {
            self.scroll = self.cursor.saturating_sub(self.last_visible_height - 1);
        }
    }

    fn move_down(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
            self.ensure_cursor_in_view();
        }
    }

    fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.ensure_cursor_in_view();
        }
    }
}

impl FloatContent for ListPicker {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(self.title)
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(theme.focused_color()))
            .style(Style::default().bg(theme.overlay_bg()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.last_visible_height = (inner.height as usize).max(1);
        self.ensure_cursor_in_view();

        let visible_items: Vec<_> = self
            .items
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(self.last_visible_height)
            .map(|(i, label)| {
                let mark = if i == self.selected { "[x]" } else { "[ ]" };
                let mut item = ListItem::new(format!("{mark} {label}"));
                if i == self.cursor {
                    item = item.style(
                        Style::default()
                            .fg(theme.selection_fg())
                            .bg(theme.selection_bg())
                            .add_modifier(Modifier::BOLD),
                    );
                }
                item
            })
            .collect();

        frame.render_widget(List::new(visible_items), inner);
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        use KeyCode::*;
        match key.code {
            Char('q') | Esc => {
                self.finished = true;
                self.cancelled = true;
            }
            Enter => {
                self.selected = self.cursor;
                self.finished = true;
            }
            Char(' ') => self.selected = self.cursor,
            Char('j') | Down => self.move_down(),
            Char('k') | Up => self.move_up(),
            Char('g') | Home => {
                self.cursor = 0;
                self.ensure_cursor_in_view();
            }
            Char('G') | End => {
                self.cursor = self.items.len().saturating_sub(1);
                self.ensure_cursor_in_view();
            }
            _ => {}
        }
        self.finished
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        (
            self.title.trim(),
            shortcuts!(
                ("Move selection", ["j", "k", "↑", "↓"]),
                ("First / last", ["g", "G"]),
                ("Choose", ["Enter"]),
                ("Cancel", ["q", "Esc"])
            ),
        )
    }
}
