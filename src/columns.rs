use crate::data::{City, Dataset};
use crate::geo::Coordinate;
use crate::view::{SortKey, ViewRow};
use ratatui::layout::Alignment;

/// Fixed candidates for the maximum-distance filter, in kilometers.
pub const MAX_DISTANCE_CHOICES_KM: [f64; 5] = [30.0, 100.0, 250.0, 500.0, 1000.0];

/// The four table columns in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Province,
    Population,
    /// Shows coordinates until the viewer location is known, then switches
    /// to the distance from the viewer.
    Location,
}

pub const COLUMNS: [Column; 4] = [
    Column::Name,
    Column::Province,
    Column::Population,
    Column::Location,
];

impl Column {
    pub fn title(self, located: bool) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Province => "Province",
            Column::Population => "Population",
            Column::Location if located => "Distance",
            Column::Location => "Coordinates",
        }
    }

    pub fn width_percent(self) -> u16 {
        match self {
            Column::Name | Column::Province => 30,
            Column::Population | Column::Location => 20,
        }
    }

    /// Text columns align left, numeric columns right.
    pub fn alignment(self) -> Alignment {
        match self {
            Column::Name | Column::Province => Alignment::Left,
            Column::Population | Column::Location => Alignment::Right,
        }
    }

    /// The comparator behind the column, if it can order the table. The
    /// distance ordering only exists once the viewer location is known.
    pub fn sort_key(self, located: bool) -> Option<SortKey> {
        match self {
            Column::Name => Some(SortKey::Name),
            Column::Province => None,
            Column::Population => Some(SortKey::Population),
            Column::Location => located.then_some(SortKey::Distance),
        }
    }

    /// Cell text for one derived row.
    pub fn cell(self, dataset: &Dataset, city: &City, row: &ViewRow) -> String {
        match self {
            Column::Name => city.name.clone(),
            Column::Province => city
                .province_id
                .and_then(|id| dataset.province_name(id))
                .unwrap_or("")
                .to_string(),
            Column::Population => city.population.map(format_grouped).unwrap_or_default(),
            Column::Location => match row.distance_km {
                Some(d) => format_distance(d),
                None => format_coordinate(city.coordinate),
            },
        }
    }
}

/// Thousands grouping: `1031000` becomes `1,031,000`.
pub fn format_grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole kilometers, rounded down.
pub fn format_distance(d: f64) -> String {
    format!("{} km", d.floor())
}

/// Both components with three decimals, latitude first.
pub fn format_coordinate(c: Coordinate) -> String {
    format!("{:.3}, {:.3}", c.lat_deg, c.lng_deg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize;
    use crate::data::RawCity;

    fn sample_dataset() -> Dataset {
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
    fn location_column_renames_itself_once_located() {
        assert_eq!(Column::Location.title(false), "Coordinates");
        assert_eq!(Column::Location.title(true), "Distance");
        assert_eq!(Column::Name.title(true), "Name");
    }

    #[test]
    fn distance_sorting_requires_a_viewer_location() {
        assert_eq!(Column::Location.sort_key(false), None);
        assert_eq!(Column::Location.sort_key(true), Some(SortKey::Distance));
        assert_eq!(Column::Province.sort_key(true), None);
        assert_eq!(Column::Name.sort_key(false), Some(SortKey::Name));
    }

    #[test]
    fn widths_cover_the_full_table() {
        let total: u16 = COLUMNS.iter().map(|c| c.width_percent()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn numeric_columns_align_right() {
        assert_eq!(Column::Name.alignment(), Alignment::Left);
        assert_eq!(Column::Province.alignment(), Alignment::Left);
        assert_eq!(Column::Population.alignment(), Alignment::Right);
        assert_eq!(Column::Location.alignment(), Alignment::Right);
    }

    #[test]
    fn population_grouping() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(7), "7");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1000), "1,000");
        assert_eq!(format_grouped(1031000), "1,031,000");
        assert_eq!(format_grouped(905234), "905,234");
    }

    #[test]
    fn distance_renders_whole_kilometers() {
        assert_eq!(format_distance(57.9), "57 km");
        assert_eq!(format_distance(0.4), "0 km");
        assert_eq!(format_distance(1000.0), "1000 km");
    }

    #[test]
    fn coordinates_render_three_decimals() {
        assert_eq!(
            format_coordinate(Coordinate::new(52.3676, 4.9041)),
            "52.368, 4.904"
        );
        assert_eq!(format_coordinate(Coordinate::new(-1.0, 0.5)), "-1.000, 0.500");
    }

    #[test]
    fn cells_fall_back_to_empty_text() {
        let ds = sample_dataset();
        let dam = &ds.cities[1];
        let row = ViewRow {
            city: 1,
            distance_km: None,
        };
        assert_eq!(Column::Province.cell(&ds, dam, &row), "");
        assert_eq!(Column::Population.cell(&ds, dam, &row), "");
        assert_eq!(Column::Location.cell(&ds, dam, &row), "52.741, 4.736");
    }

    #[test]
    fn location_cell_prefers_the_distance_annotation() {
        let ds = sample_dataset();
        let amsterdam = &ds.cities[0];
        let row = ViewRow {
            city: 0,
            distance_km: Some(41.7),
        };
        assert_eq!(Column::Location.cell(&ds, amsterdam, &row), "41 km");
        assert_eq!(Column::Name.cell(&ds, amsterdam, &row), "Amsterdam");
        assert_eq!(Column::Province.cell(&ds, amsterdam, &row), "Noord-Holland");
        assert_eq!(Column::Population.cell(&ds, amsterdam, &row), "905,234");
    }
}
