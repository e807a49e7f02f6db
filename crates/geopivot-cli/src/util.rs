use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use geopivot_analysis::config::ReportConfig;
use geopivot_data::{CsvColumns, Dataset};

/// Pretty JSON destination: a file when a path is given, stdout otherwise.
pub struct JsonOutput {
    writer: Box<dyn Write>,
    target: String,
}

impl JsonOutput {
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                writer: Box::new(io::stdout().lock()),
                target: "stdout".to_owned(),
            });
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            target: path.display().to_string(),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Writes `value` followed by a newline and flushes.
    pub fn write<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(self.writer))
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write JSON to {}", self.target))
    }
}

pub fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Report configuration from an optional JSON file, with the radius override applied.
///
/// # Errors
///
/// Returns error if the file cannot be read or the result is invalid
pub fn load_config(path: Option<&Path>, radius: Option<f64>) -> anyhow::Result<ReportConfig> {
    let mut config = match path {
        Some(path) => read_json_file("config", path)?,
        None => ReportConfig::default(),
    };
    if let Some(radius) = radius {
        config.radius = radius;
    }
    config.validate().context("Invalid report configuration")?;
    Ok(config)
}

/// Read events from a semicolon-delimited CSV file into a dataset
pub fn read_dataset_file<P>(path: P, columns: &CsvColumns) -> anyhow::Result<Dataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let events = geopivot_data::read_events_from_path(path, columns)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    Ok(Dataset::from_events(&events))
}
