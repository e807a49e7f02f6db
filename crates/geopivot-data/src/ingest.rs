//! Semicolon-delimited CSV ingestion.
//!
//! Input files carry a header row and at least a date column (`YYYY-MM-DD`),
//! an event type code, an event type name, and longitude/latitude columns.
//! Header names are configurable through [`CsvColumns`]; any other columns are
//! ignored. Coordinates may use either `.` or `,` as the decimal separator.

use std::{fs::File, io, num::ParseFloatError, path::Path};

use serde::{Deserialize, Serialize};

use crate::Event;

/// Header names of the columns read from a CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvColumns {
    pub date: String,
    pub type_id: String,
    pub type_name: String,
    pub lon: String,
    pub lat: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            date: "dt".to_owned(),
            type_id: "type_id".to_owned(),
            type_name: "type_name".to_owned(),
            lon: "lon".to_owned(),
            lat: "lat".to_owned(),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum IngestError {
    #[display("failed to read CSV: {_0}")]
    Csv(csv::Error),
    #[display("missing CSV column '{name}'")]
    MissingHeader { name: String },
    #[display("line {line}: invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        line: u64,
        value: String,
        source: chrono::ParseError,
    },
    #[display("line {line}: invalid {column} value '{value}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
        source: ParseFloatError,
    },
}

#[derive(Debug, Clone, Copy)]
struct FieldIndices {
    date: usize,
    type_id: usize,
    type_name: usize,
    lon: usize,
    lat: usize,
}

impl FieldIndices {
    fn locate(headers: &csv::StringRecord, columns: &CsvColumns) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| IngestError::MissingHeader {
                    name: name.to_owned(),
                })
        };
        Ok(Self {
            date: find(&columns.date)?,
            type_id: find(&columns.type_id)?,
            type_name: find(&columns.type_name)?,
            lon: find(&columns.lon)?,
            lat: find(&columns.lat)?,
        })
    }
}

fn parse_coordinate(line: u64, column: &str, value: &str) -> Result<f64, IngestError> {
    value
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|source| IngestError::InvalidNumber {
            line,
            column: column.to_owned(),
            value: value.to_owned(),
            source,
        })
}

/// Reads every event from semicolon-delimited CSV data.
///
/// Any malformed record aborts the whole read; no partial result is returned.
///
/// # Examples
///
/// ```
/// # use geopivot_data::{CsvColumns, read_events};
/// let data = "dt;type_id;type_name;lon;lat\n2021-05-01;7;Flood;37,6;55,7\n";
/// let events = read_events(data.as_bytes(), &CsvColumns::default()).unwrap();
/// assert_eq!(events[0].month, 5);
/// assert_eq!(events[0].lon, 37.6);
/// ```
pub fn read_events<R>(reader: R, columns: &CsvColumns) -> Result<Vec<Event>, IngestError>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);
    let indices = FieldIndices::locate(reader.headers().map_err(IngestError::Csv)?, columns)?;

    let mut events = vec![];
    for record in reader.records() {
        let record = record.map_err(IngestError::Csv)?;
        let line = record.position().map_or(0, csv::Position::line);
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let date = field(indices.date);
        let lon = parse_coordinate(line, &columns.lon, field(indices.lon))?;
        let lat = parse_coordinate(line, &columns.lat, field(indices.lat))?;
        let event = Event::from_raw(
            date,
            field(indices.type_id),
            field(indices.type_name),
            lon,
            lat,
        )
        .map_err(|source| IngestError::InvalidDate {
            line,
            value: date.to_owned(),
            source,
        })?;
        events.push(event);
    }

    log::debug!("read {} events from CSV", events.len());
    Ok(events)
}

/// Reads every event from a CSV file.
pub fn read_events_from_path<P>(path: P, columns: &CsvColumns) -> Result<Vec<Event>, IngestError>
where
    P: AsRef<Path>,
{
    let file = File::open(path).map_err(|e| IngestError::Csv(e.into()))?;
    read_events(io::BufReader::new(file), columns)
}
