//! Category discovery and display labels
//!
//! Every pivot starts from the distinct keys of a dimension. Keys are kept as
//! strings (the dataset's string encoding of the column) so that counts,
//! point clouds and nested tables share one key type.
//!
//! # Key Order
//!
//! | dimension | order                                  |
//! |-----------|----------------------------------------|
//! | year      | numeric ascending                      |
//! | month     | numeric ascending                      |
//! | type      | first-seen row order of the type code  |
//!
//! # Labels
//!
//! | dimension | label                                        |
//! |-----------|----------------------------------------------|
//! | year      | the key itself                               |
//! | month     | localized month name (1-12)                  |
//! | type      | `type_name` of the first row with that code  |
//!
//! Labels within one dimension are unique. When a label is already taken by an
//! earlier key, the later key's code is appended (`"Fire"`, `"Fire (2)"`), so
//! relabelled tables never carry two entries under one name.

use std::collections::HashSet;

use geopivot_data::{Column, Dataset};
use serde::Serialize;

use crate::{AnalysisError, dimension::Dimension, table::PivotTable};

/// Month names indexed by month number minus one.
pub const MONTH_NAMES: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Ordered, duplicate-free keys of one dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryKeySet {
    keys: Vec<String>,
}

impl CategoryKeySet {
    /// Keeps the first occurrence of every value, in input order.
    #[must_use]
    pub fn first_seen<I>(values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let keys = values
            .into_iter()
            .filter(|value| seen.insert(value.clone()))
            .collect();
        Self { keys }
    }

    /// Parses every value as an integer and keeps the distinct ones in ascending order.
    ///
    /// Keys are re-encoded in canonical decimal form, so `"03"` and `"3"` are one key.
    pub fn numeric<I>(dimension: Dimension, values: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut numbers = values
            .into_iter()
            .map(|value| {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| AnalysisError::Parse { dimension, value })
            })
            .collect::<Result<Vec<_>, _>>()?;
        numbers.sort_unstable();
        numbers.dedup();
        Ok(Self {
            keys: numbers.iter().map(ToString::to_string).collect(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.keys
    }
}

/// Display label of every key of one dimension, in key order.
///
/// No two keys share a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelMap {
    #[serde(skip)]
    dimension: Dimension,
    #[serde(flatten)]
    labels: PivotTable<String>,
}

impl LabelMap {
    #[must_use]
    pub fn from_fn<F>(dimension: Dimension, keys: &CategoryKeySet, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let mut taken = HashSet::new();
        Self {
            dimension,
            labels: PivotTable::from_keys(keys, |key| unique_label(&mut taken, key, f(key))),
        }
    }

    pub fn try_from_fn<F>(
        dimension: Dimension,
        keys: &CategoryKeySet,
        mut f: F,
    ) -> Result<Self, AnalysisError>
    where
        F: FnMut(&str) -> Result<String, AnalysisError>,
    {
        let mut taken = HashSet::new();
        Ok(Self {
            dimension,
            labels: PivotTable::try_from_keys(keys, |key| {
                Ok::<_, AnalysisError>(unique_label(&mut taken, key, f(key)?))
            })?,
        })
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Label of `key`, or [`AnalysisError::NotFound`].
    pub fn try_get(&self, key: &str) -> Result<&str, AnalysisError> {
        self.get(key).ok_or_else(|| AnalysisError::NotFound {
            dimension: self.dimension,
            key: key.to_owned(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.labels
            .iter()
            .map(|(key, label)| (key, label.as_str()))
    }
}

fn unique_label(taken: &mut HashSet<String>, key: &str, label: String) -> String {
    if taken.insert(label.clone()) {
        return label;
    }
    let mut candidate = format!("{label} ({key})");
    let mut counter = 2;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{label} ({key}, {counter})");
        counter += 1;
    }
    log::debug!("label '{label}' already taken, key '{key}' labelled '{candidate}'");
    candidate
}

/// Distinct keys of `dimension` in display order.
///
/// # Examples
///
/// ```
/// # use geopivot_analysis::{category::extract_keys, dimension::Dimension};
/// # use geopivot_data::{Column, ColumnData, Dataset};
/// let dataset = Dataset::from_columns([(
///     Column::Month,
///     ColumnData::Text(["3", "1", "2", "1"].map(String::from).to_vec()),
/// )])
/// .unwrap();
/// let keys = extract_keys(&dataset, Dimension::Month).unwrap();
/// assert_eq!(keys.as_slice(), ["1", "2", "3"]);
/// ```
pub fn extract_keys(
    dataset: &Dataset,
    dimension: Dimension,
) -> Result<CategoryKeySet, AnalysisError> {
    let values = dataset.column_values(dimension.column())?;
    let keys = if dimension.is_numeric() {
        CategoryKeySet::numeric(dimension, values)?
    } else {
        CategoryKeySet::first_seen(values)
    };
    log::debug!("{dimension}: {} distinct keys", keys.len());
    Ok(keys)
}

/// Display labels for `keys`.
pub fn extract_labels(
    dataset: &Dataset,
    keys: &CategoryKeySet,
    dimension: Dimension,
) -> Result<LabelMap, AnalysisError> {
    match dimension {
        Dimension::Year => Ok(LabelMap::from_fn(dimension, keys, str::to_owned)),
        Dimension::Month => LabelMap::try_from_fn(dimension, keys, |key| {
            month_name(key).map(str::to_owned)
        }),
        Dimension::Type => {
            let names = dataset.project(&[Column::TypeId, Column::TypeName])?;
            LabelMap::try_from_fn(dimension, keys, |key| {
                names
                    .filter_eq(Column::TypeId, key)?
                    .column_values(Column::TypeName)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| AnalysisError::NotFound {
                        dimension,
                        key: key.to_owned(),
                    })
            })
        }
    }
}

/// Localized name of a month key (`"1"`..=`"12"`).
pub fn month_name(key: &str) -> Result<&'static str, AnalysisError> {
    let month = key
        .trim()
        .parse::<i64>()
        .map_err(|_| AnalysisError::Parse {
            dimension: Dimension::Month,
            value: key.to_owned(),
        })?;
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|idx| MONTH_NAMES.get(idx).copied())
        .ok_or(AnalysisError::Range { month })
}
