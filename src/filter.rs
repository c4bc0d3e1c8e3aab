use ratatui::{
    prelude::*,
    symbols::border,
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthChar;

/// Actions triggered by name filter input
pub enum SearchAction {
    None,
    Exit,
    Update,
}

/// Inline editor for the city-name filter. The term is matched as a
/// case-insensitive substring; editing state lives here, the match itself
/// happens in the view pipeline.
#[derive(Default)]
pub struct Filter {
    in_search: bool,
    input: Vec<char>,
    cursor: usize,
}

impl Filter {
    pub fn activate(&mut self) {
        self.in_search = true;
    }
    pub fn deactivate(&mut self) {
        self.in_search = false;
    }
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }
    pub fn term(&self) -> String {
        self.input.iter().collect()
    }
    pub fn active(&self) -> bool {
        self.in_search
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let hint = if self.in_search || !self.input.is_empty() {
            self.term()
        } else {
            "Press / to filter by name".into()
        };
        let p = Paragraph::new(hint).block(
            Block::bordered().title(" Name ").border_set(border::ROUNDED),
        );
        frame.render_widget(p, area);

        if self.in_search {
            let w: u16 = self
                .input
                .iter()
                .take(self.cursor)
                .map(|c| c.width().unwrap_or(1) as u16)
                .sum();
            frame.set_cursor_position(Position::new(area.x + 1 + w, area.y + 1));
        }
    }

    pub fn handle_key(&mut self, key: &ratatui::crossterm::event::KeyEvent) -> SearchAction {
        use ratatui::crossterm::event::{KeyCode, KeyModifiers};
        match key.code {
            KeyCode::Esc | KeyCode::Enter => return SearchAction::Exit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
                return SearchAction::Exit;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.input.remove(self.cursor);
                }
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                if self.cursor < self.input.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(ch) => {
                self.input.insert(self.cursor, ch);
                self.cursor += 1;
            }
            _ => return SearchAction::None,
        }
        SearchAction::Update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(filter: &mut Filter, code: KeyCode) -> SearchAction {
        filter.handle_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_term(filter: &mut Filter, term: &str) {
        for ch in term.chars() {
            press(filter, KeyCode::Char(ch));
        }
    }

    #[test]
    fn typing_builds_the_term_at_the_cursor() {
        let mut filter = Filter::default();
        filter.activate();
        type_term(&mut filter, "dm");
        press(&mut filter, KeyCode::Left);
        press(&mut filter, KeyCode::Char('a'));
        assert_eq!(filter.term(), "dam");
    }

    #[test]
    fn backspace_removes_before_the_cursor() {
        let mut filter = Filter::default();
        filter.activate();
        type_term(&mut filter, "dame");
        press(&mut filter, KeyCode::Backspace);
        assert_eq!(filter.term(), "dam");
        press(&mut filter, KeyCode::Left);
        press(&mut filter, KeyCode::Left);
        press(&mut filter, KeyCode::Left);
        // Cursor at the start, so backspace has nothing to remove.
        press(&mut filter, KeyCode::Backspace);
        assert_eq!(filter.term(), "dam");
    }

    #[test]
    fn enter_and_esc_exit_but_keep_the_term() {
        let mut filter = Filter::default();
        filter.activate();
        type_term(&mut filter, "haar");
        assert!(matches!(press(&mut filter, KeyCode::Enter), SearchAction::Exit));
        assert_eq!(filter.term(), "haar");
        assert!(matches!(press(&mut filter, KeyCode::Esc), SearchAction::Exit));
        assert_eq!(filter.term(), "haar");
    }

    #[test]
    fn ctrl_c_clears_and_exits() {
        let mut filter = Filter::default();
        filter.activate();
        type_term(&mut filter, "haar");
        let action = filter.handle_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(action, SearchAction::Exit));
        assert_eq!(filter.term(), "");
    }
}
