use crate::{
    columns::{COLUMNS, MAX_DISTANCE_CHOICES_KM},
    data::Dataset,
    detail::CityDetail,
    filter::{Filter, SearchAction},
    float::{Float, FloatContent},
    geo::Coordinate,
    hint::Shortcut,
    picker::ListPicker,
    quit::ConfirmQuit,
    sort::SortMenu,
    table::{self, TableFrame},
    terminal_check::{draw_too_small_warning, is_too_small},
    theme::Theme,
    view::{SortKey, SortOrder, SortSpec, ViewCache, ViewQuery},
};
use anyhow::Result;
use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

/// Where the viewer location stands for this session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationState {
    /// Lookup still in flight
    Pending,
    Known(Coordinate),
    /// Lookup failed or was disabled; the distance column stays off
    Unavailable,
}

pub struct App {
    theme: Theme,
    dataset: Dataset,
    dataset_path: PathBuf,
    query: ViewQuery,
    cache: ViewCache,
    filter: Filter,
    cursor: usize,
    scroll: usize,
    /// Row capacity of the table window as of the last draw
    visible_rows: usize,
    location: LocationState,
    location_rx: Option<Receiver<Option<Coordinate>>>,
    province_picker: Option<Float<ListPicker>>,
    distance_picker: Option<Float<ListPicker>>,
    sort_menu: Option<Float<SortMenu>>,
    detail_float: Option<Float<CityDetail>>,
    confirm_quit: Option<Float<ConfirmQuit>>,
}

impl App {
    pub fn new(
        dataset: Dataset,
        dataset_path: PathBuf,
        location: LocationState,
        location_rx: Option<Receiver<Option<Coordinate>>>,
    ) -> Self {
        let mut query = ViewQuery::default();
        if let LocationState::Known(coord) = location {
            query.viewer = Some(coord);
        }
        Self {
            theme: Theme::Default,
            dataset,
            dataset_path,
            query,
            cache: ViewCache::default(),
            filter: Filter::default(),
            cursor: 0,
            scroll: 0,
            visible_rows: 1,
            location,
            location_rx,
            province_picker: None,
            distance_picker: None,
            sort_menu: None,
            detail_float: None,
            confirm_quit: None,
        }
    }

    pub fn run(
        &mut self,
        term: &mut Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        loop {
            // Apply the location result, if any, before rendering.
            self.poll_location();
            term.draw(|f| self.draw(f))?;
            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            match event::read()? {
                Event::Key(k) => {
                    if k.kind == KeyEventKind::Release {
                        continue;
                    }
                    if !self.handle_key(k) {
                        break;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn located(&self) -> bool {
        matches!(self.location, LocationState::Known(_))
    }

    /// Drain the one-shot location channel. The session gets at most one
    /// answer; failure quietly leaves the distance column disabled.
    fn poll_location(&mut self) {
        let Some(rx) = &self.location_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(Some(coord)) => {
                self.location = LocationState::Known(coord);
                self.query.viewer = Some(coord);
                self.location_rx = None;
            }
            Ok(None) | Err(TryRecvError::Disconnected) => {
                self.location = LocationState::Unavailable;
                self.location_rx = None;
            }
            Err(TryRecvError::Empty) => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Floating windows take priority over the table.
        if let Some(ref mut float) = self.detail_float {
            float.handle_key_event(&key);
            if float.content.is_finished() {
                self.detail_float = None;
            }
            return true;
        }

        if let Some(ref mut float) = self.province_picker {
            float.handle_key_event(&key);
            let finished = float.content.is_finished();
            let cancelled = float.content.cancelled;
            let choice = float.content.choice();
            if finished {
                self.province_picker = None;
                if !cancelled {
                    self.query.province_filter = self.province_choice_id(choice);
                }
            }
            return true;
        }

        if let Some(ref mut float) = self.distance_picker {
            float.handle_key_event(&key);
            let finished = float.content.is_finished();
            let cancelled = float.content.cancelled;
            let choice = float.content.choice();
            if finished {
                self.distance_picker = None;
                if !cancelled {
                    self.query.max_distance_km = choice
                        .checked_sub(1)
                        .and_then(|i| MAX_DISTANCE_CHOICES_KM.get(i).copied());
                }
            }
            return true;
        }

        if let Some(ref mut float) = self.sort_menu {
            float.handle_key_event(&key);
            let finished = float.content.is_finished();
            let cancelled = float.content.cancelled;
            let chosen = float.content.chosen();
            if finished {
                self.sort_menu = None;
                if !cancelled {
                    let (key, order) = chosen;
                    self.query.sort = SortSpec {
                        key: Some(key),
                        order,
                    };
                }
            }
            return true;
        }

        if let Some(ref mut float) = self.confirm_quit {
            float.handle_key_event(&key);
            if float.content.is_finished() {
                let confirmed = float.content.confirmed();
                self.confirm_quit = None;
                if confirmed {
                    return false;
                }
            }
            return true;
        }

        if self.filter.active() {
            match self.filter.handle_key(&key) {
                SearchAction::Exit => {
                    self.filter.deactivate();
                    self.apply_name_filter();
                }
                // The name filter is live: every edit reshapes the view.
                SearchAction::Update => self.apply_name_filter(),
                SearchAction::None => {}
            }
            return true;
        }

        self.handle_key_table(key.code)
    }

    fn apply_name_filter(&mut self) {
        let term = self.filter.term();
        if self.query.name_filter != term {
            self.query.name_filter = term;
        }
    }

    fn handle_key_table(&mut self, code: KeyCode) -> bool {
        use KeyCode::*;
        match code {
            Char('q') => {
                self.confirm_quit = Some(Float::new_absolute(Box::new(ConfirmQuit::new()), 40, 6));
            }
            Char('/') => self.filter.activate(),
            Up | Char('k') => self.cursor = self.cursor.saturating_sub(1),
            Down | Char('j') => {
                let len = self.row_count();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            PageUp | Char('h') => {
                self.cursor = self.cursor.saturating_sub(self.visible_rows.max(1));
            }
            PageDown | Char('l') => {
                let len = self.row_count();
                self.cursor = (self.cursor + self.visible_rows.max(1)).min(len.saturating_sub(1));
            }
            Home | Char('g') => self.cursor = 0,
            End | Char('G') => self.cursor = self.row_count().saturating_sub(1),
            Enter => self.open_detail(),
            Char('p') => self.open_province_picker(),
            Char('m') => {
                if self.located() {
                    self.open_distance_picker();
                }
            }
            Char('s') => self.open_sort_menu(),
            Char('c') => {
                self.filter.clear();
                self.query.name_filter.clear();
                self.query.province_filter = None;
                self.query.max_distance_km = None;
            }
            Char(c @ '1'..='4') => self.toggle_sort_column((c as u8 - b'1') as usize),
            _ => {}
        }
        true
    }

    fn row_count(&mut self) -> usize {
        self.cache.rows(&self.dataset.cities, &self.query).len()
    }

    /// A sortable column toggles between ascending and descending; columns
    /// without a comparator ignore the key.
    fn toggle_sort_column(&mut self, idx: usize) {
        let located = self.located();
        if let Some(key) = COLUMNS[idx].sort_key(located) {
            self.query.sort = self.query.sort.toggle(key);
        }
    }

    fn open_detail(&mut self) {
        let row = {
            let rows = self.cache.rows(&self.dataset.cities, &self.query);
            if rows.is_empty() {
                return;
            }
            rows[self.cursor.min(rows.len() - 1)]
        };
        let city = &self.dataset.cities[row.city];
        self.detail_float = Some(Float::new_absolute(
            Box::new(CityDetail::new(&self.dataset, city, row.distance_km)),
            48,
            9,
        ));
    }

    fn open_province_picker(&mut self) {
        let provinces = self.dataset.provinces_by_name();
        let mut items = Vec::with_capacity(provinces.len() + 1);
        items.push("All".to_string());
        items.extend(provinces.iter().map(|p| p.name.clone()));
        let selected = match self.query.province_filter {
            Some(id) => provinces
                .iter()
                .position(|p| p.id == id)
                .map_or(0, |i| i + 1),
            None => 0,
        };
        self.province_picker = Some(Float::new_absolute(
            Box::new(ListPicker::new(" Province ", items, selected)),
            36,
            16,
        ));
    }

    fn province_choice_id(&self, choice: usize) -> Option<u32> {
        choice
            .checked_sub(1)
            .and_then(|i| self.dataset.provinces_by_name().get(i).map(|p| p.id))
    }

    fn open_distance_picker(&mut self) {
        let mut items = vec!["Any".to_string()];
        items.extend(MAX_DISTANCE_CHOICES_KM.iter().map(|km| format!("{km} km")));
        let selected = self
            .query
            .max_distance_km
            .and_then(|max| MAX_DISTANCE_CHOICES_KM.iter().position(|km| *km == max))
            .map_or(0, |i| i + 1);
        self.distance_picker = Some(Float::new_absolute(
            Box::new(ListPicker::new(" Max Distance ", items, selected)),
            30,
            10,
        ));
    }

    fn open_sort_menu(&mut self) {
        let located = self.located();
        let keys: Vec<SortKey> = COLUMNS
            .iter()
            .filter_map(|c| c.sort_key(located))
            .collect();
        let default_idx = self
            .query
            .sort
            .key
            .and_then(|k| keys.iter().position(|x| *x == k))
            .unwrap_or(0);
        self.sort_menu = Some(Float::new_absolute(
            Box::new(SortMenu::new(keys, default_idx, self.query.sort.order)),
            40,
            12,
        ));
    }

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        if is_too_small(area) {
            draw_too_small_warning(f, area);
            return;
        }

        let (_title, shortcuts) = self.get_current_shortcuts();
        let lines = crate::hint::create_shortcut_list(shortcuts, area.width);
        let hint_height = (lines.len() as u16 + 2).clamp(3, 8);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),           // title bar
                Constraint::Length(3),           // name filter + view summary
                Constraint::Min(1),              // table
                Constraint::Length(hint_height), // shortcuts
            ])
            .split(area);

        self.draw_title(f, chunks[0]);
        self.draw_view_bar(f, chunks[1]);
        self.draw_city_table(f, chunks[2]);
        self.draw_hint(f, chunks[3]);

        if let Some(ref mut float) = self.sort_menu {
            float.draw(f, f.area(), &self.theme);
        }
        if let Some(ref mut float) = self.province_picker {
            float.draw(f, f.area(), &self.theme);
        }
        if let Some(ref mut float) = self.distance_picker {
            float.draw(f, f.area(), &self.theme);
        }
        if let Some(ref mut float) = self.detail_float {
            float.draw(f, f.area(), &self.theme);
        }
        if let Some(ref mut float) = self.confirm_quit {
            float.draw(f, f.area(), &self.theme);
        }
    }

    fn draw_title(&self, f: &mut Frame, area: Rect) {
        let (status, color) = match self.location {
            LocationState::Pending => ("locating...", self.theme.pending_color()),
            LocationState::Known(_) => ("located", self.theme.success_color()),
            LocationState::Unavailable => ("no location", self.theme.unfocused_color()),
        };
        let title = Line::from(vec![
            Span::styled(
                format!(
                    "citytab  |  File: {}  |  {} cities  |  ",
                    self.dataset_path.display(),
                    self.dataset.cities.len()
                ),
                Style::default().fg(self.theme.title_color()),
            ),
            Span::styled(status, Style::default().fg(color)),
        ]);
        f.render_widget(Paragraph::new(title), area);
    }

    fn draw_view_bar(&self, f: &mut Frame, area: Rect) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.filter.draw(f, halves[0]);

        let province = match self.query.province_filter {
            Some(id) => self.dataset.province_name(id).unwrap_or("?"),
            None => "All",
        };
        let max_distance = match self.query.max_distance_km {
            Some(km) => format!("{km} km"),
            None => "Any".to_string(),
        };
        let sort = match self.query.sort.key {
            Some(key) => format!(
                "{key} {}",
                match self.query.sort.order {
                    SortOrder::Ascend => "↑",
                    SortOrder::Descend => "↓",
                }
            ),
            None => "none".to_string(),
        };

        let summary = Paragraph::new(format!(
            "Province: {province}  |  Within: {max_distance}  |  Sort: {sort}"
        ))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" View "),
        );
        f.render_widget(summary, halves[1]);
    }

    fn draw_city_table(&mut self, f: &mut Frame, area: Rect) {
        let located = self.located();
        let rows = self.cache.rows(&self.dataset.cities, &self.query);
        self.cursor = self.cursor.min(rows.len().saturating_sub(1));
        let view = TableFrame {
            dataset: &self.dataset,
            rows,
            located,
            cursor: self.cursor,
        };
        self.visible_rows = table::draw_table(f, area, &self.theme, &view, &mut self.scroll);
    }

    fn draw_hint(&self, f: &mut Frame, area: Rect) {
        let (title, shortcuts) = self.get_current_shortcuts();
        let lines = crate::hint::create_shortcut_list(shortcuts, area.width);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" {title} Shortcuts "));

        let para = Paragraph::new(lines.to_vec())
            .block(block)
            .wrap(ratatui::widgets::Wrap { trim: false });

        f.render_widget(para, area);
    }

    fn get_current_shortcuts(&self) -> (&str, Box<[Shortcut]>) {
        if let Some(ref float) = self.detail_float {
            return float.get_shortcut_list();
        }
        if let Some(ref float) = self.province_picker {
            return float.get_shortcut_list();
        }
        if let Some(ref float) = self.distance_picker {
            return float.get_shortcut_list();
        }
        if let Some(ref float) = self.sort_menu {
            return float.get_shortcut_list();
        }
        if let Some(ref float) = self.confirm_quit {
            return float.get_shortcut_list();
        }
        if self.filter.active() {
            return (
                "Name Filter",
                crate::shortcuts!(
                    ("Apply and close", ["Esc", "Enter"]),
                    ("Move cursor", ["←", "→"]),
                    ("Delete char", ["Backspace"]),
                    ("Clear", ["Ctrl-c"]),
                ),
            );
        }
        if self.located() {
            (
                "City Table",
                crate::shortcuts!(
                    ("Move", ["j", "k", "↑", "↓"]),
                    ("Page", ["h", "l", "PgUp", "PgDn"]),
                    ("Top / bottom", ["g", "G"]),
                    ("Filter name", ["/"]),
                    ("Province", ["p"]),
                    ("Max distance", ["m"]),
                    ("Sort menu", ["s"]),
                    ("Sort by column", ["1-4"]),
                    ("Detail", ["Enter"]),
                    ("Clear filters", ["c"]),
                    ("Quit", ["q"]),
                ),
            )
        } else {
            (
                "City Table",
                crate::shortcuts!(
                    ("Move", ["j", "k", "↑", "↓"]),
                    ("Page", ["h", "l", "PgUp", "PgDn"]),
                    ("Top / bottom", ["g", "G"]),
                    ("Filter name", ["/"]),
                    ("Province", ["p"]),
                    ("Sort menu", ["s"]),
                    ("Sort by column", ["1-4"]),
                    ("Detail", ["Enter"]),
                    ("Clear filters", ["c"]),
                    ("Quit", ["q"]),
                ),
            )
        }
    }
}
