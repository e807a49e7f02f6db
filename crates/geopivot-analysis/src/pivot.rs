//! Single- and two-dimensional aggregation
//!
//! Every pass produces a count table and a point-cloud table with identical
//! keys. Each key is an independent equality filter over the dataset (by
//! integer value for year and month, by exact text for type), so a
//! pass costs one scan per key; reports are small enough that no index is
//! kept between passes.

use geopivot_data::Dataset;
use geopivot_stats::point::PointCloud;

use crate::{AnalysisError, category::CategoryKeySet, dimension::Dimension, table::PivotTable};

pub type CountTable = PivotTable<usize>;
pub type PointTable = PivotTable<PointCloud>;
pub type CrossCountTable = PivotTable<CountTable>;
pub type CrossPointTable = PivotTable<PointTable>;

/// Counts and points per key of `dimension`.
///
/// The tables follow `keys` order. A key with no matching row yields a zero
/// count and an empty cloud.
pub fn single_dimension_pass(
    dataset: &Dataset,
    keys: &CategoryKeySet,
    dimension: Dimension,
) -> Result<(CountTable, PointTable), AnalysisError> {
    let table = PivotTable::try_from_keys(keys, |key| {
        let subset = select_key(dataset, dimension, key)?;
        Ok::<_, AnalysisError>((subset.len(), subset.points()?))
    })?;
    log::debug!(
        "single pass over {dimension}: {} keys, {} rows",
        keys.len(),
        dataset.len()
    );
    Ok(table.unzip())
}

/// Counts and points per `(outer, inner)` key pair.
///
/// The outer filter runs once per outer key; the inner pass runs against that
/// subset only. Every inner table carries the full `inner_keys` set.
pub fn double_dimension_pass(
    dataset: &Dataset,
    outer_keys: &CategoryKeySet,
    inner_keys: &CategoryKeySet,
    outer: Dimension,
    inner: Dimension,
) -> Result<(CrossCountTable, CrossPointTable), AnalysisError> {
    let table = PivotTable::try_from_keys(outer_keys, |key| {
        outer_slot(dataset, key, inner_keys, outer, inner)
    })?;
    log::debug!(
        "double pass over {outer} x {inner}: {} x {} keys",
        outer_keys.len(),
        inner_keys.len()
    );
    Ok(table.unzip())
}

/// [`double_dimension_pass`] with outer keys processed on the rayon pool.
///
/// Produces exactly the same tables; outer order is restored from
/// `outer_keys`, not from completion order.
#[cfg(feature = "parallel")]
pub fn double_dimension_pass_parallel(
    dataset: &Dataset,
    outer_keys: &CategoryKeySet,
    inner_keys: &CategoryKeySet,
    outer: Dimension,
    inner: Dimension,
) -> Result<(CrossCountTable, CrossPointTable), AnalysisError> {
    use rayon::prelude::*;

    let slots = outer_keys
        .as_slice()
        .par_iter()
        .map(|key| outer_slot(dataset, key, inner_keys, outer, inner))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!(
        "parallel double pass over {outer} x {inner}: {} x {} keys",
        outer_keys.len(),
        inner_keys.len()
    );
    Ok(PivotTable::zip_keys(outer_keys, slots).unzip())
}

fn outer_slot(
    dataset: &Dataset,
    key: &str,
    inner_keys: &CategoryKeySet,
    outer: Dimension,
    inner: Dimension,
) -> Result<(CountTable, PointTable), AnalysisError> {
    let subset = select_key(dataset, outer, key)?;
    single_dimension_pass(&subset, inner_keys, inner)
}

// Numeric keys match by value, so text cells such as "09" land under key "9".
fn select_key(
    dataset: &Dataset,
    dimension: Dimension,
    key: &str,
) -> Result<Dataset, AnalysisError> {
    if dimension.is_numeric() {
        let value = key.trim().parse::<i64>().map_err(|_| AnalysisError::Parse {
            dimension,
            value: key.to_owned(),
        })?;
        Ok(dataset.filter_int(dimension.column(), value)?)
    } else {
        Ok(dataset.filter_eq(dimension.column(), key)?)
    }
}

#[cfg(test)]
mod tests {
    use geopivot_data::{Column, ColumnData, DatasetError, Event};
    use geopivot_stats::point::Point;

    use super::*;
    use crate::category::extract_keys;

    fn scenario() -> Dataset {
        Dataset::from_events(&[
            Event::from_raw("2020-01-05", "A", "Fire", 1.0, 2.0).unwrap(),
            Event::from_raw("2020-02-10", "A", "Fire", 3.0, 4.0).unwrap(),
            Event::from_raw("2021-01-15", "B", "Flood", 5.0, 6.0).unwrap(),
        ])
    }

    #[test]
    fn test_single_pass_counts_and_points() {
        let dataset = scenario();
        let keys = extract_keys(&dataset, Dimension::Year).unwrap();
        let (counts, points) = single_dimension_pass(&dataset, &keys, Dimension::Year).unwrap();

        assert_eq!(counts.iter().collect::<Vec<_>>(), [("2020", &2), ("2021", &1)]);
        assert_eq!(
            points.get("2020").unwrap(),
            &vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]
        );
        assert_eq!(points.get("2021").unwrap(), &vec![Point::new(5.0, 6.0)]);
    }

    #[test]
    fn test_single_pass_unmatched_key_is_zero() {
        let dataset = scenario();
        let keys = CategoryKeySet::first_seen(["A".to_owned(), "Z".to_owned()]);
        let (counts, points) = single_dimension_pass(&dataset, &keys, Dimension::Type).unwrap();
        assert_eq!(counts.get("Z"), Some(&0));
        assert!(points.get("Z").unwrap().is_empty());
    }

    #[test]
    fn test_double_pass_full_inner_key_set() {
        let dataset = scenario();
        let years = extract_keys(&dataset, Dimension::Year).unwrap();
        let types = extract_keys(&dataset, Dimension::Type).unwrap();
        let (counts, points) =
            double_dimension_pass(&dataset, &years, &types, Dimension::Year, Dimension::Type)
                .unwrap();

        let y2020 = counts.get("2020").unwrap();
        let y2021 = counts.get("2021").unwrap();
        assert_eq!(y2020.iter().collect::<Vec<_>>(), [("A", &2), ("B", &0)]);
        assert_eq!(y2021.iter().collect::<Vec<_>>(), [("A", &0), ("B", &1)]);
        assert_eq!(
            points.get("2021").unwrap().get("B").unwrap(),
            &vec![Point::new(5.0, 6.0)]
        );
    }

    #[test]
    fn test_double_pass_sums_match_single_pass() {
        let dataset = scenario();
        let years = extract_keys(&dataset, Dimension::Year).unwrap();
        let months = extract_keys(&dataset, Dimension::Month).unwrap();
        let (single, _) = single_dimension_pass(&dataset, &years, Dimension::Year).unwrap();
        let (double, _) =
            double_dimension_pass(&dataset, &years, &months, Dimension::Year, Dimension::Month)
                .unwrap();
        for (year, count) in single.iter() {
            assert_eq!(double.get(year).unwrap().total(), *count);
        }
    }

    #[test]
    fn test_missing_column_propagates() {
        let dataset =
            Dataset::from_columns([(Column::Year, ColumnData::Int(vec![2020, 2021]))]).unwrap();
        let keys = extract_keys(&dataset, Dimension::Year).unwrap();
        assert_eq!(
            single_dimension_pass(&dataset, &keys, Dimension::Year).unwrap_err(),
            AnalysisError::Dataset(DatasetError::MissingColumn { column: Column::Lon })
        );
    }

    #[test]
    fn test_non_canonical_text_months_are_counted() {
        let text = ["09", "9", " 3"].map(String::from).to_vec();
        let dataset = Dataset::from_columns([
            (Column::Month, ColumnData::Text(text)),
            (Column::Lon, ColumnData::Float(vec![0.0; 3])),
            (Column::Lat, ColumnData::Float(vec![0.0; 3])),
        ])
        .unwrap();
        let keys = extract_keys(&dataset, Dimension::Month).unwrap();
        assert_eq!(keys.as_slice(), ["3", "9"]);

        let (counts, points) = single_dimension_pass(&dataset, &keys, Dimension::Month).unwrap();
        assert_eq!(counts.iter().collect::<Vec<_>>(), [("3", &1), ("9", &2)]);
        assert_eq!(counts.total(), dataset.len());
        assert_eq!(points.get("9").unwrap().len(), 2);
    }

    #[test]
    fn test_non_integer_numeric_key() {
        let dataset = scenario();
        let keys = CategoryKeySet::first_seen(["2020".to_owned(), "later".to_owned()]);
        assert_eq!(
            single_dimension_pass(&dataset, &keys, Dimension::Year).unwrap_err(),
            AnalysisError::Parse {
                dimension: Dimension::Year,
                value: "later".to_owned()
            }
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let dataset = scenario();
        let years = extract_keys(&dataset, Dimension::Year).unwrap();
        let types = extract_keys(&dataset, Dimension::Type).unwrap();
        let sequential =
            double_dimension_pass(&dataset, &years, &types, Dimension::Year, Dimension::Type)
                .unwrap();
        let parallel = double_dimension_pass_parallel(
            &dataset,
            &years,
            &types,
            Dimension::Year,
            Dimension::Type,
        )
        .unwrap();
        assert_eq!(sequential, parallel);
    }
}
