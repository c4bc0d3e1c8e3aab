use crate::geo::Coordinate;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One record as it appears in the source file. Every field is a string;
/// empty means absent. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCity {
    pub city: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
    #[serde(default)]
    pub admin_name: String,
    #[serde(default)]
    pub population: String,
}

/// A normalized city row. `id` is dense and 1-based in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub id: u32,
    pub name: String,
    pub province_id: Option<u32>,
    pub population: Option<u64>,
    pub coordinate: Coordinate,
}

/// A province interned from the `admin_name` column. Ids start at 1 and
/// follow first appearance in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Province {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub cities: Vec<City>,
    /// Province records in id order, so `provinces[i].id == i + 1`.
    pub provinces: Vec<Province>,
}

impl Dataset {
    pub fn province_name(&self, id: u32) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|i| self.provinces.get(i as usize))
            .map(|p| p.name.as_str())
    }

    /// Provinces in presentation order: case-insensitive by name.
    pub fn provinces_by_name(&self) -> Vec<&Province> {
        self.provinces
            .iter()
            .sorted_by(|a, b| crate::view::compare_names(&a.name, &b.name))
            .collect()
    }
}

/// Read a dataset from a `.csv` or `.json` file, either of which may carry
/// an extra `.gz` suffix for gzip compression.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let reader = open_reader(path)?;
    let raw = if is_json_path(path) {
        parse_json(reader).with_context(|| format!("parsing {}", path.display()))?
    } else {
        parse_csv(reader).with_context(|| format!("parsing {}", path.display()))?
    };
    Ok(normalize(raw))
}

fn open_reader(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    if file_name_lower(path).ends_with(".gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// True when the file name, minus any trailing `.gz`, ends in `.json`.
pub fn is_json_path(path: &Path) -> bool {
    let name = file_name_lower(path);
    name.strip_suffix(".gz").unwrap_or(&name).ends_with(".json")
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn parse_csv(reader: Box<dyn Read>) -> Result<Vec<RawCity>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: RawCity = record.context("malformed csv record")?;
        out.push(record);
    }
    Ok(out)
}

pub fn parse_json(reader: Box<dyn Read>) -> Result<Vec<RawCity>> {
    serde_json::from_reader(reader).context("malformed json array")
}

/// Turn raw records into the typed dataset:
///
/// - city ids are assigned densely from 1 in source order,
/// - provinces are interned by exact `admin_name`, first seen first,
/// - unparseable populations become `None`, never zero,
/// - unparseable coordinates become NaN and stay in the dataset.
pub fn normalize(raw: Vec<RawCity>) -> Dataset {
    let mut provinces: Vec<Province> = Vec::new();
    let mut province_ids: HashMap<String, u32> = HashMap::new();
    let mut cities = Vec::with_capacity(raw.len());

    for (i, rec) in raw.into_iter().enumerate() {
        let province_id = if rec.admin_name.is_empty() {
            None
        } else {
            let id = *province_ids.entry(rec.admin_name.clone()).or_insert_with(|| {
                let id = provinces.len() as u32 + 1;
                provinces.push(Province {
                    id,
                    name: rec.admin_name.clone(),
                });
                id
            });
            Some(id)
        };

        cities.push(City {
            id: i as u32 + 1,
            name: rec.city,
            province_id,
            population: parse_population(&rec.population),
            coordinate: Coordinate::new(parse_degrees(&rec.lat), parse_degrees(&rec.lng)),
        });
    }

    Dataset { cities, provinces }
}

fn parse_population(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

fn parse_degrees(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}
