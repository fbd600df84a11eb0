//! Load well inputs (JSON) and well-head production (CSV)

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::Reader;

use super::input::WellInput;
use crate::econ::VolumeSeries;
use crate::error::EconError;
use crate::time::{month_offset, month_start, parse_date};

/// Raw production CSV row: `date,oil,gas,water`; blank volumes are 0
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    date: String,
    #[serde(default)]
    oil: Option<f64>,
    #[serde(default)]
    gas: Option<f64>,
    #[serde(default)]
    water: Option<f64>,
}

impl CsvRow {
    fn to_point(self) -> Result<(NaiveDate, [f64; 3]), EconError> {
        let date = parse_date(&self.date)
            .ok_or_else(|| EconError::InvalidInput(format!("Unknown production date: {}", self.date)))?;
        Ok((
            date,
            [
                self.oil.unwrap_or(0.0),
                self.gas.unwrap_or(0.0),
                self.water.unwrap_or(0.0),
            ],
        ))
    }
}

/// Lay out dated rows on a regular axis; `offset` gives a row's position
/// relative to the first row. Gaps are 0 and duplicate periods accumulate.
fn to_series(
    points: Vec<(NaiveDate, [f64; 3])>,
    start: NaiveDate,
    offset: impl Fn(NaiveDate) -> i64,
) -> Result<VolumeSeries, EconError> {
    let mut series = VolumeSeries::new(start);
    for (date, [oil, gas, water]) in points {
        let idx = offset(date);
        if idx < 0 {
            return Err(EconError::InvalidInput(format!(
                "Production date {} precedes the first row {}",
                date, start
            )));
        }
        let idx = idx as usize;
        if series.oil.len() <= idx {
            series.oil.resize(idx + 1, 0.0);
            series.gas.resize(idx + 1, 0.0);
            series.water.resize(idx + 1, 0.0);
        }
        series.oil[idx] += oil;
        series.gas[idx] += gas;
        series.water[idx] += water;
    }
    Ok(series)
}

fn read_points<R: Read>(reader: R) -> Result<Vec<(NaiveDate, [f64; 3])>, EconError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut points = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        points.push(row.to_point()?);
    }
    Ok(points)
}

/// Monthly volumes from any reader; rows may carry any day of their month
pub fn monthly_production_from_reader<R: Read>(reader: R) -> Result<Option<VolumeSeries>, EconError> {
    let points = read_points(reader)?;
    let start = match points.iter().map(|(date, _)| *date).min() {
        Some(first) => month_start(first),
        None => return Ok(None),
    };
    to_series(points, start, |date| month_offset(date, start)).map(Some)
}

/// Daily volumes from any reader
pub fn daily_production_from_reader<R: Read>(reader: R) -> Result<Option<VolumeSeries>, EconError> {
    let points = read_points(reader)?;
    let start = match points.iter().map(|(date, _)| *date).min() {
        Some(first) => first,
        None => return Ok(None),
    };
    to_series(points, start, |date| (date - start).num_days()).map(Some)
}

pub fn load_monthly_production<P: AsRef<Path>>(path: P) -> Result<Option<VolumeSeries>, EconError> {
    monthly_production_from_reader(File::open(path)?)
}

pub fn load_daily_production<P: AsRef<Path>>(path: P) -> Result<Option<VolumeSeries>, EconError> {
    daily_production_from_reader(File::open(path)?)
}

/// Load a well input document
pub fn load_well_input<P: AsRef<Path>>(path: P) -> Result<WellInput, EconError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Load a well input document from any reader
pub fn well_input_from_reader<R: Read>(reader: R) -> Result<WellInput, EconError> {
    Ok(serde_json::from_reader(reader)?)
}

/// JSON files of a well directory, in name order
pub fn well_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, EconError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
