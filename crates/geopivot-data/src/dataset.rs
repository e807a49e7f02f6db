//! Columnar, read-only event dataset.
//!
//! The report engine only needs two capabilities from its data source:
//! "select rows where column == value" ([`Dataset::filter_eq`]) and
//! "extract column as list" ([`Dataset::column_values`], [`Dataset::points`]).
//! Both are answered by linear scans over typed columns; a dataset is never
//! mutated after construction, and filtering yields a new dataset.
//!
//! # Examples
//!
//! ```
//! use geopivot_data::{Column, Dataset, Event};
//!
//! let dataset = Dataset::from_events(&[
//!     Event::from_raw("2020-01-05", "A", "Fire", 30.0, 60.0).unwrap(),
//!     Event::from_raw("2021-01-07", "B", "Flood", 31.0, 61.0).unwrap(),
//! ]);
//!
//! let in_2020 = dataset.filter_eq(Column::Year, "2020").unwrap();
//! assert_eq!(in_2020.len(), 1);
//! assert_eq!(in_2020.column_values(Column::TypeName).unwrap(), ["Fire"]);
//! ```

use std::collections::BTreeMap;

use geopivot_stats::point::Point;
use serde::{Deserialize, Serialize};

use crate::{DatasetError, Event};

/// A named dataset column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    #[display("year")]
    Year,
    #[display("month")]
    Month,
    #[display("day")]
    Day,
    #[display("type_id")]
    TypeId,
    #[display("type_name")]
    TypeName,
    #[display("lon")]
    Lon,
    #[display("lat")]
    Lat,
}

impl Column {
    pub const ALL: [Self; 7] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::TypeId,
        Self::TypeName,
        Self::Lon,
        Self::Lat,
    ];
}

/// Typed values of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(values) => values.len(),
            ColumnData::Float(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// String encoding of every value: integers in decimal, floats via `Display`,
    /// text verbatim.
    fn encode(&self) -> Vec<String> {
        match self {
            ColumnData::Int(values) => values.iter().map(ToString::to_string).collect(),
            ColumnData::Float(values) => values.iter().map(ToString::to_string).collect(),
            ColumnData::Text(values) => values.clone(),
        }
    }

    fn select(&self, rows: &[usize]) -> Self {
        match self {
            ColumnData::Int(values) => ColumnData::Int(rows.iter().map(|&i| values[i]).collect()),
            ColumnData::Float(values) => {
                ColumnData::Float(rows.iter().map(|&i| values[i]).collect())
            }
            ColumnData::Text(values) => {
                ColumnData::Text(rows.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }

    #[allow(clippy::float_cmp)]
    fn matching_rows(&self, column: Column, value: &str) -> Result<Vec<usize>, DatasetError> {
        let invalid = || DatasetError::InvalidValue {
            column,
            value: value.to_owned(),
        };
        let rows = match self {
            ColumnData::Int(values) => {
                let needle = value.trim().parse::<i64>().map_err(|_| invalid())?;
                positions(values, |v| *v == needle)
            }
            ColumnData::Float(values) => {
                let needle = value.trim().parse::<f64>().map_err(|_| invalid())?;
                positions(values, |v| *v == needle)
            }
            ColumnData::Text(values) => positions(values, |v| v == value),
        };
        Ok(rows)
    }

    // Text cells are trimmed and parsed; a cell that is not an integer never matches.
    #[allow(clippy::float_cmp)]
    #[expect(clippy::cast_precision_loss)]
    fn matching_int_rows(&self, value: i64) -> Vec<usize> {
        match self {
            ColumnData::Int(values) => positions(values, |v| *v == value),
            ColumnData::Float(values) => positions(values, |v| *v == value as f64),
            ColumnData::Text(values) => {
                positions(values, |v| v.trim().parse::<i64>().ok() == Some(value))
            }
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn to_f64(&self, column: Column) -> Result<Vec<f64>, DatasetError> {
        match self {
            ColumnData::Int(values) => Ok(values.iter().map(|&v| v as f64).collect()),
            ColumnData::Float(values) => Ok(values.clone()),
            ColumnData::Text(_) => Err(DatasetError::NotNumeric { column }),
        }
    }
}

fn positions<T>(values: &[T], mut pred: impl FnMut(&T) -> bool) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| pred(v).then_some(i))
        .collect()
}

/// An ordered, read-only collection of event rows stored column by column.
///
/// A dataset may carry any subset of [`Column`]s; all columns have the same
/// number of rows. Referencing an absent column fails with
/// [`DatasetError::MissingColumn`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    len: usize,
    columns: BTreeMap<Column, ColumnData>,
}

impl Dataset {
    /// Builds a dataset carrying every [`Column`], rows in input order.
    #[must_use]
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut year = vec![];
        let mut month = vec![];
        let mut day = vec![];
        let mut type_id = vec![];
        let mut type_name = vec![];
        let mut lon = vec![];
        let mut lat = vec![];
        for event in events {
            year.push(i64::from(event.year));
            month.push(i64::from(event.month));
            day.push(i64::from(event.day));
            type_id.push(event.type_id.clone());
            type_name.push(event.type_name.clone());
            lon.push(event.lon);
            lat.push(event.lat);
        }

        let len = year.len();
        let columns = BTreeMap::from([
            (Column::Year, ColumnData::Int(year)),
            (Column::Month, ColumnData::Int(month)),
            (Column::Day, ColumnData::Int(day)),
            (Column::TypeId, ColumnData::Text(type_id)),
            (Column::TypeName, ColumnData::Text(type_name)),
            (Column::Lon, ColumnData::Float(lon)),
            (Column::Lat, ColumnData::Float(lat)),
        ]);
        Self { len, columns }
    }

    /// Builds a dataset from explicit columns.
    ///
    /// The first column fixes the row count; a later column of a different
    /// length fails with [`DatasetError::LengthMismatch`]. A repeated column
    /// replaces the earlier one.
    pub fn from_columns<I>(columns: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (Column, ColumnData)>,
    {
        let mut len = None;
        let mut map = BTreeMap::new();
        for (column, data) in columns {
            let expected = *len.get_or_insert(data.len());
            if data.len() != expected {
                return Err(DatasetError::LengthMismatch {
                    column,
                    expected,
                    actual: data.len(),
                });
            }
            map.insert(column, data);
        }
        Ok(Self {
            len: len.unwrap_or(0),
            columns: map,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    /// Columns present in this dataset, in [`Column`] order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.keys().copied()
    }

    pub fn column(&self, column: Column) -> Result<&ColumnData, DatasetError> {
        self.columns
            .get(&column)
            .ok_or(DatasetError::MissingColumn { column })
    }

    /// Extracts a column as string-encoded values in row order.
    pub fn column_values(&self, column: Column) -> Result<Vec<String>, DatasetError> {
        Ok(self.column(column)?.encode())
    }

    /// Selects the rows whose `column` equals the string-encoded `value`.
    ///
    /// Numeric columns parse `value` first and compare numerically, so `"07"`
    /// matches month 7; text columns compare exactly. Row order is preserved.
    pub fn filter_eq(&self, column: Column, value: &str) -> Result<Self, DatasetError> {
        let rows = self.column(column)?.matching_rows(column, value)?;
        Ok(self.select_rows(&rows))
    }

    /// Selects the rows whose `column` holds the integer `value`.
    ///
    /// Unlike [`Dataset::filter_eq`], text cells are compared by integer value,
    /// so `"09"`, `" 9"` and `"9"` all match `9`.
    pub fn filter_int(&self, column: Column, value: i64) -> Result<Self, DatasetError> {
        let rows = self.column(column)?.matching_int_rows(value);
        Ok(self.select_rows(&rows))
    }

    fn select_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|(&column, data)| (column, data.select(rows)))
            .collect();
        Self {
            len: rows.len(),
            columns,
        }
    }

    /// Keeps only the given columns.
    pub fn project(&self, columns: &[Column]) -> Result<Self, DatasetError> {
        let columns = columns
            .iter()
            .map(|&column| Ok((column, self.column(column)?.clone())))
            .collect::<Result<BTreeMap<_, _>, DatasetError>>()?;
        Ok(Self {
            len: self.len,
            columns,
        })
    }

    /// `(lon, lat)` points of every row, in row order.
    pub fn points(&self) -> Result<Vec<Point>, DatasetError> {
        let lon = self.column(Column::Lon)?.to_f64(Column::Lon)?;
        let lat = self.column(Column::Lat)?.to_f64(Column::Lat)?;
        Ok(lon
            .into_iter()
            .zip(lat)
            .map(|(x, y)| Point::new(x, y))
            .collect())
    }
}
