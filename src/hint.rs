use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// One keyboard hint: a description plus the keys that trigger it.
pub struct Shortcut {
    pub key_sequences: Vec<Span<'static>>,
    pub desc: &'static str,
}

/// Build a boxed shortcut slice without spelling out every constructor:
/// `shortcuts!(("Quit", ["q"]), ("Move", ["j", "k"]))`.
#[macro_export]
macro_rules! shortcuts {
    ($(($desc:expr, [$($key:expr),+ $(,)?])),* $(,)?) => {
        vec![
            $($crate::hint::Shortcut::new($desc, &[$($key),+])),*
        ]
        .into_boxed_slice()
    };
}

impl Shortcut {
    pub fn new(desc: &'static str, keys: &[&'static str]) -> Self {
        let key_sequences = keys
            .iter()
            .map(|key| Span::styled(format!("[{key}]"), Style::default().fg(Color::LightCyan)))
            .collect();
        Self {
            key_sequences,
            desc,
        }
    }

    fn spans(&self) -> Vec<Span<'static>> {
        let mut out = Vec::with_capacity(self.key_sequences.len() + 1);
        out.extend(self.key_sequences.iter().cloned());
        out.push(Span::raw(format!(" {}", self.desc)));
        out
    }

    fn width(&self) -> usize {
        self.spans().iter().map(Span::width).sum()
    }
}

const SEPARATOR: &str = "    ";

/// Pack the shortcuts into as few lines as fit the given width, in order.
/// A single oversized shortcut still gets a line of its own.
pub fn create_shortcut_list(shortcuts: Box<[Shortcut]>, width: u16) -> Box<[Line<'static>]> {
    let width = width.saturating_sub(2) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;

    for shortcut in shortcuts.into_vec() {
        let entry_width = shortcut.width();
        if !current.is_empty() && current_width + SEPARATOR.len() + entry_width > width {
            lines.push(Line::from(std::mem::take(&mut current)));
            current_width = 0;
        }
        if !current.is_empty() {
            current.push(Span::raw(SEPARATOR));
            current_width += SEPARATOR.len();
        }
        current.extend(shortcut.spans());
        current_width += entry_width;
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }

    lines.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits_on_one_wide_line() {
        let list = create_shortcut_list(
            crate::shortcuts!(("Quit", ["q"]), ("Move", ["j", "k"])),
            120,
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn narrow_widths_wrap_onto_more_lines() {
        let list = create_shortcut_list(
            crate::shortcuts!(("Search name", ["/"]), ("Sort", ["s"]), ("Quit", ["q"])),
            18,
        );
        assert!(list.len() >= 2);
    }

    #[test]
    fn an_oversized_shortcut_still_renders() {
        let list = create_shortcut_list(
            crate::shortcuts!(("A very long description that cannot fit", ["Enter"])),
            10,
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn keys_render_bracketed() {
        let shortcut = Shortcut::new("Quit", &["q", "Esc"]);
        let text: String = shortcut
            .spans()
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "[q][Esc] Quit");
    }
}
