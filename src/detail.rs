use crate::columns::{format_coordinate, format_distance, format_grouped};
use crate::data::{City, Dataset};
use crate::{float::FloatContent, hint::Shortcut, theme::Theme};
use ratatui::{Frame, layout::Rect};

/// Read-only popup with every field of one city row.
pub struct CityDetail {
    lines: Vec<String>,
    finished: bool,
}

impl CityDetail {
    pub fn new(dataset: &Dataset, city: &City, distance_km: Option<f64>) -> Self {
        let mut lines = vec![
            format!("Name: {}", city.name),
            format!(
                "Province: {}",
                city.province_id
                    .and_then(|id| dataset.province_name(id))
                    .unwrap_or("unknown")
            ),
            format!(
                "Population: {}",
                city.population
                    .map(format_grouped)
                    .unwrap_or_else(|| "unknown".into())
            ),
            format!("Coordinates: {}", format_coordinate(city.coordinate)),
        ];
        if let Some(d) = distance_km {
            lines.push(format!("Distance: {}", format_distance(d)));
        }
        Self {
            lines,
            finished: false,
        }
    }
}

impl FloatContent for CityDetail {
    fn draw(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        use ratatui::{
            layout::Alignment,
            style::Style,
            widgets::{Block, Borders, Clear, Paragraph},
        };

        // Dim overlay
        let overlay = Block::default().style(Style::default().bg(theme.overlay_bg()));
        frame.render_widget(overlay, frame.area());
        frame.render_widget(Clear, area);

        let text = Paragraph::new(self.lines.join("\n"))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" City ")
                    .border_type(ratatui::widgets::BorderType::Rounded)
                    .border_style(Style::default().fg(theme.border_color())),
            )
            .alignment(Alignment::Left);

        frame.render_widget(text, area);
    }

    fn handle_key_event(&mut self, key: &ratatui::crossterm::event::KeyEvent) -> bool {
        use ratatui::crossterm::event::KeyCode::*;
        match key.code {
            Char('q') | Esc | Enter => {
                self.finished = true;
                true
            }
            _ => false,
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn get_shortcut_list(&self) -> (&str, Box<[Shortcut]>) {
        ("City", crate::shortcuts!(("Close", ["q", "Esc", "Enter"]),))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RawCity, normalize};

    fn dataset() -> Dataset {
        normalize(vec![
            RawCity {
                city: "Amsterdam".into(),
                lat: "52.3676".into(),
                lng: "4.9041".into(),
                admin_name: "Noord-Holland".into(),
                population: "905234".into(),
            },
            RawCity {
                city: "Dam".into(),
                lat: "52.7408".into(),
                lng: "4.7356".into(),
                admin_name: "".into(),
                population: "".into(),
            },
        ])
    }

    #[test]
    fn detail_lists_every_known_field() {
        let ds = dataset();
        let detail = CityDetail::new(&ds, &ds.cities[0], Some(41.7));
        assert_eq!(
            detail.lines,
            vec![
                "Name: Amsterdam",
                "Province: Noord-Holland",
                "Population: 905,234",
                "Coordinates: 52.368, 4.904",
                "Distance: 41 km",
            ]
        );
    }

    #[test]
    fn missing_fields_read_as_unknown() {
        let ds = dataset();
        let detail = CityDetail::new(&ds, &ds.cities[1], None);
        assert_eq!(detail.lines[1], "Province: unknown");
        assert_eq!(detail.lines[2], "Population: unknown");
        assert_eq!(detail.lines.len(), 4);
    }
}
