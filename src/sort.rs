use crate::view::{SortKey, SortOrder};
use crate::{float::FloatContent, hint::Shortcut, shortcuts, theme::Theme};
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent},
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem},
};

/// Two-panel sort dialog: pick a column in the top panel, a direction in
/// the bottom one. Space marks, Enter confirms, q or Esc cancels.
#[derive(Debug, Clone)]
pub struct SortMenu {
    keys: Vec<SortKey>,
    selected_col: usize,
    selected_order: SortOrder,
    cursor_panel: usize,
    sortby_cursor: usize,
    sortby_scroll: usize,
    last_visible_height: usize,
    order_cursor: usize,
    pub finished: bool,
    pub cancelled: bool,
}

impl SortMenu {
    /// `keys` holds the columns that can sort right now and must not be
    /// empty; `default_col` indexes into it.
    pub fn new(keys: Vec<SortKey>, default_col: usize, default_order: SortOrder) -> Self {
        Self {
            keys,
            selected_col: default_col,
            selected_order: default_order,
            cursor_panel: 0,
            sortby_cursor: default_col,
            sortby_scroll: 0,
            last_visible_height: 0,
            order_cursor: if matches!(default_order, SortOrder::Descend) {
                1
            } else {
                0
            },
            finished: false,
            cancelled: false,
        }
    }

    pub fn chosen(&self) -> (SortKey, SortOrder) {
        (self.keys[self.selected_col], self.selected_order)
    }

    fn ensure_cursor_in_view(&mut self) {
        if self.last_visible_height == 0 {
            return;
        }
        let start = self.sortby_scroll;
        let end = self
            .sortby_scroll
            .saturating_add(self.last_visible_height.saturating_sub(1));
        if self.sortby_cursor < start {
            self.sortby_scroll = self.sortby_cursor;
        } else if self.sortby_cursor > end {
            self.sortby_scroll = self
                .sortby_cursor
                .saturating_sub(self.last_visible_height - 1);
        }
    }

    fn move_down(&mut self) {
        match self.cursor_panel {
            0 => {
                if self.sortby_cursor + 1 < self.keys.len() {
                    self.sortby_cursor += 1;
                    self.ensure_cursor_in_view();
                }
            }
            1 => {
                if self.order_cursor == 0 {
                    self.order_cursor = 1;
                }
            }
            _ => {}
        }
    }

    fn move_up(&mut self) {
        match self.cursor_panel {
            0 => {
                if self.sortby_cursor > 0 {
                    self.sortby_cursor -= 1;
                    self.ensure_cursor_in_view();
                }
            }
            1 => self.order_cursor = 0,
            _ => {}
        }
    }

    fn switch_focus(&mut self) {
        self.cursor_panel = (self.cursor_panel + 1) % 2;
    }

    fn choose_current(&mut self) {
        match self.cursor_panel {
            0 => self.selected_col = self.sortby_cursor,
            1 => {
                self.selected_order = if self.order_cursor == 0 {
                    SortOrder::Ascend
                } else {
                    SortOrder::Descend
                }
            }
            _ => {}
        }
    }
}

impl FloatContent for SortMenu {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Sort Options ")
            .title_alignment(Alignment::Center);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(4)].as_ref())
            .split(inner);

        // ==== SORT BY ====
        let visible_height = layout[0].height.saturating_sub(2) as usize;
        self.last_visible_height = visible_height.max(1);
        self.ensure_cursor_in_view();

        let visible_items: Vec<_> = self
            .keys
            .iter()
            .enumerate()
            .skip(self.sortby_scroll)
            .take(self.last_visible_height)
            .map(|(i, key)| {
                let mark = if i == self.selected_col { "[x]" } else { "[ ]" };
                let mut item = ListItem::new(format!("{mark} {key}"));
                if self.cursor_panel == 0 && i == self.sortby_cursor {
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

        let sort_block = Block::default()
            .borders(Borders::ALL)
            .title(" Sort By ")
            .border_type(BorderType::Rounded)
            .border_style(if self.cursor_panel == 0 {
                Style::default().fg(theme.focused_color())
            } else {
                Style::default().fg(theme.unfocused_color())
            });

        frame.render_widget(List::new(visible_items).block(sort_block), layout[0]);

        // ==== ORDER ====
        let order_items: Vec<_> = ["Ascend", "Descend"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mark = match (i, self.selected_order) {
                    (0, SortOrder::Ascend) | (1, SortOrder::Descend) => "[x]",
                    _ => "[ ]",
                };
                let mut item = ListItem::new(format!("{mark} {name}"));
                if self.cursor_panel == 1 && i == self.order_cursor {
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

        let order_block = Block::default()
            .borders(Borders::ALL)
            .title(" Order ")
            .border_type(BorderType::Rounded)
            .border_style(if self.cursor_panel == 1 {
                Style::default().fg(theme.focused_color())
            } else {
                Style::default().fg(theme.unfocused_color())
            });
        frame.render_widget(List::new(order_items).block(order_block), layout[1]);
    }

    fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        use KeyCode::*;
        match key.code {
            Char('q') | Esc => {
                self.finished = true;
                self.cancelled = true;
            }
            Enter => {
                self.finished = true;
            }
            Tab => self.switch_focus(),
            Char('j') | Down => self.move_down(),
            Char('k') | Up => self.move_up(),
            Char(' ') => self.choose_current(),
            _ => {}
        }
        self.finished
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        (
            "Sort Menu",
            shortcuts!(
                ("Move selection", ["j", "k", "↑", "↓"]),
                ("Switch panel", ["Tab"]),
                ("Select option", ["Space"]),
                ("Confirm", ["Enter"]),
                ("Cancel", ["q", "Esc"])
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(menu: &mut SortMenu, code: KeyCode) -> bool {
        menu.handle_key_event(&KeyEvent::from(code))
    }

    fn menu() -> SortMenu {
        SortMenu::new(
            vec![SortKey::Name, SortKey::Population, SortKey::Distance],
            0,
            SortOrder::Ascend,
        )
    }

    #[test]
    fn space_marks_and_enter_confirms() {
        let mut m = menu();
        press(&mut m, KeyCode::Char('j'));
        press(&mut m, KeyCode::Char(' '));
        assert!(press(&mut m, KeyCode::Enter));
        assert!(!m.cancelled);
        assert_eq!(m.chosen(), (SortKey::Population, SortOrder::Ascend));
    }

    #[test]
    fn tab_reaches_the_order_panel() {
        let mut m = menu();
        press(&mut m, KeyCode::Tab);
        press(&mut m, KeyCode::Char('j'));
        press(&mut m, KeyCode::Char(' '));
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.chosen(), (SortKey::Name, SortOrder::Descend));
    }

    #[test]
    fn moving_without_space_changes_nothing() {
        let mut m = menu();
        press(&mut m, KeyCode::Char('j'));
        press(&mut m, KeyCode::Char('j'));
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.chosen(), (SortKey::Name, SortOrder::Ascend));
    }

    #[test]
    fn escape_cancels() {
        let mut m = menu();
        press(&mut m, KeyCode::Char('j'));
        press(&mut m, KeyCode::Char(' '));
        assert!(press(&mut m, KeyCode::Esc));
        assert!(m.cancelled);
    }

    #[test]
    fn cursor_stays_inside_the_key_list() {
        let mut m = menu();
        for _ in 0..10 {
            press(&mut m, KeyCode::Char('j'));
        }
        press(&mut m, KeyCode::Char(' '));
        press(&mut m, KeyCode::Enter);
        assert_eq!(m.chosen().0, SortKey::Distance);
    }
}
