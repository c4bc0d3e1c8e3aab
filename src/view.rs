use crate::data::City;
use crate::geo::{self, Coordinate};
use std::cmp::Ordering;
use std::fmt;

/// Columns that can order the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Population,
    Distance,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "Name"),
            SortKey::Population => write!(f, "Population"),
            SortKey::Distance => write!(f, "Distance"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Ascend => SortOrder::Descend,
            SortOrder::Descend => SortOrder::Ascend,
        }
    }
}

/// Active sort column and direction. `key: None` leaves rows in their
/// post-filter order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortSpec {
    pub key: Option<SortKey>,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: Some(SortKey::Name),
            order: SortOrder::Ascend,
        }
    }
}

impl SortSpec {
    /// Selecting a new column sorts it ascending; re-selecting the active
    /// column flips the direction.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == Some(key) {
            Self {
                key: Some(key),
                order: self.order.flipped(),
            }
        } else {
            Self {
                key: Some(key),
                order: SortOrder::Ascend,
            }
        }
    }
}

/// Snapshot of every input the pipeline depends on. Equal queries over the
/// same dataset always produce the same rows, which is what makes the cache
/// in [`ViewCache`] sound.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewQuery {
    /// Case-insensitive substring match on the city name; empty matches all.
    pub name_filter: String,
    /// Province id to keep, or `None` for all provinces.
    pub province_filter: Option<u32>,
    /// Keep only rows within this many kilometers of the viewer. Ignored
    /// until the viewer location is known.
    pub max_distance_km: Option<f64>,
    /// Viewer location, once acquired.
    pub viewer: Option<Coordinate>,
    pub sort: SortSpec,
}

/// One row of the derived view: an index into the dataset's city list plus
/// the distance annotation. The annotation lives here, never on the city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRow {
    pub city: usize,
    pub distance_km: Option<f64>,
}

/// Run the full pipeline: annotate, filter, sort. Pure; the input is never
/// mutated and the stages always run in this order.
pub fn build_view(cities: &[City], query: &ViewQuery) -> Vec<ViewRow> {
    let needle = query.name_filter.to_lowercase();
    let max_distance = query.viewer.and(query.max_distance_km);

    let mut rows: Vec<ViewRow> = cities
        .iter()
        .enumerate()
        .map(|(i, city)| ViewRow {
            city: i,
            distance_km: query.viewer.map(|v| geo::distance_km(v, city.coordinate)),
        })
        .filter(|row| match query.province_filter {
            Some(id) => cities[row.city].province_id == Some(id),
            None => true,
        })
        .filter(|row| needle.is_empty() || cities[row.city].name.to_lowercase().contains(&needle))
        .filter(|row| match (max_distance, row.distance_km) {
            // NaN distances fail the comparison and drop out here.
            (Some(max), Some(d)) => d <= max,
            _ => true,
        })
        .collect();

    if let Some(key) = query.sort.key {
        let order = query.sort.order;
        // sort_by is stable, so rows with equal keys keep their relative
        // order in both directions.
        rows.sort_by(|a, b| {
            let ord = compare(
                key,
                (&cities[a.city], a.distance_km),
                (&cities[b.city], b.distance_km),
            );
            match order {
                SortOrder::Ascend => ord,
                SortOrder::Descend => ord.reverse(),
            }
        });
    }

    rows
}

/// Case-insensitive name ordering with the raw strings as a deterministic
/// tiebreak for case-only differences.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// The comparator behind each sortable column, over `(city, distance)`
/// pairs. Absent populations count as zero; absent distances sort last and
/// NaN compares as equal rather than poisoning the order.
pub fn compare(key: SortKey, a: (&City, Option<f64>), b: (&City, Option<f64>)) -> Ordering {
    match key {
        SortKey::Name => compare_names(&a.0.name, &b.0.name),
        SortKey::Population => a
            .0
            .population
            .unwrap_or(0)
            .cmp(&b.0.population.unwrap_or(0)),
        SortKey::Distance => match (a.1, b.1) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Last pipeline input and output. As long as the query stays equal to the
/// cached one the rows are reused untouched; any change recomputes the whole
/// view.
#[derive(Debug, Default)]
pub struct ViewCache {
    key: Option<ViewQuery>,
    rows: Vec<ViewRow>,
}

impl ViewCache {
    pub fn rows(&mut self, cities: &[City], query: &ViewQuery) -> &[ViewRow] {
        if self.key.as_ref() != Some(query) {
            self.rows = build_view(cities, query);
            self.key = Some(query.clone());
            tracing::debug!(rows = self.rows.len(), "recomputed derived view");
        }
        &self.rows
    }
}
