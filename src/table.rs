use crate::columns::COLUMNS;
use crate::data::Dataset;
use crate::theme::Theme;
use crate::view::ViewRow;
use ratatui::{
    Frame,
    layout::{Constraint, Margin, Rect},
    style::{Modifier, Style},
    text::Text,
    widgets::{
        Block, BorderType, Borders, Cell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table,
    },
};
use std::ops::Range;

/// Extra scrollable space kept below the last row.
pub const CONTENT_PADDING: usize = 16;

/// Geometry the terminal renderer actually uses: one text line per row,
/// one for the pinned header.
const WINDOW: Window = Window::new(1, 1);

/// Vertical geometry of the scrollable table: fixed-height rows below a
/// pinned header. Heights and offsets share one unit; `row_height` must be
/// nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub row_height: usize,
    pub header_height: usize,
}

impl Window {
    pub const fn new(row_height: usize, header_height: usize) -> Self {
        Self {
            row_height,
            header_height,
        }
    }

    /// Upper bound on simultaneously visible rows for a viewport of the
    /// given height, rounded up so partial rows count.
    pub fn max_visible_rows(&self, viewport_height: usize) -> usize {
        viewport_height.div_ceil(self.row_height)
    }

    /// Index of the row under `scroll_offset`, clamped into `[0, row_count]`.
    pub fn first_visible(&self, scroll_offset: usize, row_count: usize) -> usize {
        (scroll_offset / self.row_height).min(row_count)
    }

    /// Row indices to materialize. Scrolling past the end yields an empty
    /// range rather than wrapping or panicking.
    pub fn visible_range(
        &self,
        scroll_offset: usize,
        row_count: usize,
        max_visible: usize,
    ) -> Range<usize> {
        let first = self.first_visible(scroll_offset, row_count);
        first..(first + max_visible).min(row_count)
    }

    /// Full scrollable extent, independent of how many rows are rendered.
    pub fn total_content_height(&self, row_count: usize) -> usize {
        self.header_height + self.row_height * row_count + CONTENT_PADDING
    }

    /// Absolute vertical offset of one row inside the content.
    pub fn row_offset(&self, index: usize) -> usize {
        self.header_height + self.row_height * index
    }

    /// Keep the offset from starting past the last row.
    pub fn clamp_offset(&self, scroll_offset: usize, row_count: usize) -> usize {
        scroll_offset.min(self.row_height * row_count)
    }

    /// Move the window by whole rows until the cursor row is inside it.
    pub fn follow_cursor(
        &self,
        scroll_offset: usize,
        cursor: usize,
        max_visible: usize,
        row_count: usize,
    ) -> usize {
        if max_visible == 0 || row_count == 0 {
            return 0;
        }
        let first = self.first_visible(scroll_offset, row_count);
        if cursor < first {
            self.row_height * cursor
        } else if cursor >= first + max_visible {
            self.row_height * (cursor + 1 - max_visible)
        } else {
            scroll_offset
        }
    }
}

/// Everything the table needs for one frame.
pub struct TableFrame<'a> {
    pub dataset: &'a Dataset,
    pub rows: &'a [ViewRow],
    pub located: bool,
    pub cursor: usize,
}

/// Draw the windowed table. Rows outside the current window are never
/// materialized, so a scroll only costs the window, not the dataset.
/// Returns the row capacity of the window for page-wise movement.
pub fn draw_table(
    f: &mut Frame,
    area: Rect,
    theme: &Theme,
    view: &TableFrame,
    scroll_offset: &mut usize,
) -> usize {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_color()))
        .title(format!(
            " Cities {}/{} ",
            view.rows.len(),
            view.dataset.cities.len()
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || (inner.height as usize) <= WINDOW.header_height {
        return 0;
    }

    let viewport = inner.height as usize - WINDOW.header_height;
    let max_visible = WINDOW.max_visible_rows(viewport);
    let row_count = view.rows.len();

    *scroll_offset = WINDOW.clamp_offset(*scroll_offset, row_count);
    *scroll_offset = WINDOW.follow_cursor(*scroll_offset, view.cursor, max_visible, row_count);
    let range = WINDOW.visible_range(*scroll_offset, row_count, max_visible);
    let first = range.start;

    let header = Row::new(COLUMNS.iter().map(|col| {
        Cell::from(Text::from(col.title(view.located)).alignment(col.alignment()))
    }))
    .style(
        Style::default()
            .fg(theme.table_header())
            .bg(theme.selection_bg())
            .add_modifier(Modifier::BOLD),
    );

    let body = view.rows[range].iter().enumerate().map(|(i, row)| {
        let absolute = first + i;
        let city = &view.dataset.cities[row.city];
        let style = if absolute == view.cursor {
            Style::default()
                .bg(theme.selection_bg())
                .fg(theme.selection_fg())
                .add_modifier(Modifier::BOLD)
        } else if absolute % 2 == 0 {
            Style::default().bg(theme.table_row_even())
        } else {
            Style::default().bg(theme.table_row_odd())
        };
        Row::new(COLUMNS.iter().map(|col| {
            Cell::from(Text::from(col.cell(view.dataset, city, row)).alignment(col.alignment()))
        }))
        .style(style)
    });

    let widths = COLUMNS.map(|col| Constraint::Percentage(col.width_percent()));
    f.render_widget(Table::new(body, widths).header(header).column_spacing(1), inner);

    if row_count > max_visible {
        let mut state = ScrollbarState::new(WINDOW.total_content_height(row_count))
            .position(WINDOW.row_offset(first));
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut state,
        );
    }

    max_visible
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXELS: Window = Window::new(50, 105);

    #[test]
    fn first_visible_row_under_a_pixel_scroll_offset() {
        // 1000 rows of height 50 below a 105-high header, scrolled to 2600.
        assert_eq!(PIXELS.first_visible(2600, 1000), 52);
        assert_eq!(PIXELS.visible_range(2600, 1000, 20), 52..72);
    }

    #[test]
    fn window_stays_inside_the_rows_for_any_offset() {
        let win = Window::new(7, 3);
        let rows = 23;
        for offset in 0..=win.total_content_height(rows) {
            let range = win.visible_range(offset, rows, 5);
            assert!(range.start <= range.end);
            assert!(range.end <= rows);
        }
    }

    #[test]
    fn scrolling_past_the_end_yields_an_empty_window() {
        let win = Window::new(10, 0);
        assert_eq!(win.visible_range(500, 4, 6), 4..4);
    }

    #[test]
    fn empty_table_still_has_header_and_padding_height() {
        assert_eq!(PIXELS.total_content_height(0), 105 + CONTENT_PADDING);
        assert_eq!(PIXELS.visible_range(0, 0, 20), 0..0);
    }

    #[test]
    fn content_height_counts_every_row_once() {
        assert_eq!(PIXELS.total_content_height(1000), 105 + 50_000 + CONTENT_PADDING);
    }

    #[test]
    fn row_offsets_are_absolute_positions() {
        assert_eq!(PIXELS.row_offset(0), 105);
        assert_eq!(PIXELS.row_offset(52), 105 + 2600);
    }

    #[test]
    fn max_visible_rows_rounds_partial_rows_up() {
        let win = Window::new(50, 0);
        assert_eq!(win.max_visible_rows(100), 2);
        assert_eq!(win.max_visible_rows(130), 3);
        assert_eq!(win.max_visible_rows(0), 0);
        assert_eq!(Window::new(1, 1).max_visible_rows(33), 33);
    }

    #[test]
    fn clamp_keeps_the_offset_inside_the_content() {
        let win = Window::new(10, 5);
        assert_eq!(win.clamp_offset(0, 10), 0);
        assert_eq!(win.clamp_offset(99, 10), 99);
        assert_eq!(win.clamp_offset(101, 10), 100);
    }

    #[test]
    fn cursor_below_the_window_pulls_it_down() {
        let win = Window::new(1, 1);
        // Rows 0..10 visible; moving to row 14 scrolls the window to 5.
        assert_eq!(win.follow_cursor(0, 14, 10, 100), 5);
    }

    #[test]
    fn cursor_above_the_window_pulls_it_up() {
        let win = Window::new(1, 1);
        assert_eq!(win.follow_cursor(40, 12, 10, 100), 12);
    }

    #[test]
    fn cursor_inside_the_window_keeps_the_offset() {
        let win = Window::new(1, 1);
        assert_eq!(win.follow_cursor(40, 45, 10, 100), 40);
    }
}
