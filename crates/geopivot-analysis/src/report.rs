//! Full report for one dataset
//!
//! [`Report::build`] runs every stage of the pipeline once per dataset:
//!
//! 1. keys and labels of each dimension the configuration mentions
//! 2. one single pass per dimension needed by totals or the map
//! 3. one double pass per configured crosstab
//! 4. declutter of every map series
//! 5. relabel of every table as it is stored in the report
//!
//! Key sets, labels and single passes are computed at most once per dimension.
//! The report serializes to the JSON document renderers consume.

use std::collections::{BTreeMap, BTreeSet};

use geopivot_data::Dataset;
use geopivot_stats::{
    declutter::{DeclutterParams, count_range},
    point::{Point, Representative},
};
use serde::Serialize;

use crate::{
    AnalysisError,
    category::{CategoryKeySet, LabelMap, extract_keys, extract_labels},
    config::{Crosstab, ReportConfig},
    dimension::Dimension,
    pivot::{CountTable, CrossCountTable, PointTable, single_dimension_pass},
    table::PivotTable,
};

#[cfg(not(feature = "parallel"))]
use crate::pivot::double_dimension_pass as double_pass;
#[cfg(feature = "parallel")]
use crate::pivot::double_dimension_pass_parallel as double_pass;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total_events: usize,
    pub dimensions: BTreeMap<Dimension, DimensionSummary>,
    pub totals: Vec<TotalTable>,
    pub crosstabs: Vec<CrosstabTable>,
    pub map: MapReport,
}

/// Keys of one dimension in display order, with their labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionSummary {
    pub keys: CategoryKeySet,
    pub labels: LabelMap,
}

/// Event count per label of one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalTable {
    pub dimension: Dimension,
    pub counts: CountTable,
}

/// Event count per `(outer, inner)` label pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrosstabTable {
    pub outer: Dimension,
    pub inner: Dimension,
    pub counts: CrossCountTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapReport {
    pub dimension: Dimension,
    pub radius: f64,
    pub series: PivotTable<MapSeries>,
}

/// Decluttered points of one map series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSeries {
    pub points: Vec<Representative>,
    pub min_count: usize,
    pub max_count: usize,
    /// Number of events before declutter.
    pub total: usize,
}

impl MapSeries {
    #[must_use]
    pub fn from_points(params: &DeclutterParams, points: &[Point]) -> Self {
        let reps = params.declutter(points);
        let (min_count, max_count) = count_range(&reps);
        Self {
            points: reps,
            min_count,
            max_count,
            total: points.len(),
        }
    }
}

impl Report {
    /// Builds the report of `dataset` as described by `config`.
    ///
    /// Any error aborts the whole report; there is no partial result.
    pub fn build(dataset: &Dataset, config: &ReportConfig) -> Result<Self, AnalysisError> {
        config.validate()?;

        let needed = config
            .totals
            .iter()
            .copied()
            .chain(config.crosstabs.iter().flat_map(|c| [c.outer, c.inner]))
            .chain([config.map_dimension])
            .collect::<BTreeSet<_>>();
        let dimensions = needed
            .into_iter()
            .map(|dimension| {
                let keys = extract_keys(dataset, dimension)?;
                let labels = extract_labels(dataset, &keys, dimension)?;
                Ok((dimension, DimensionSummary { keys, labels }))
            })
            .collect::<Result<BTreeMap<_, _>, AnalysisError>>()?;

        let mut passes = BTreeMap::new();
        for &dimension in config.totals.iter().chain([&config.map_dimension]) {
            if !passes.contains_key(&dimension) {
                let summary = &dimensions[&dimension];
                passes.insert(
                    dimension,
                    single_dimension_pass(dataset, &summary.keys, dimension)?,
                );
            }
        }

        let totals = config
            .totals
            .iter()
            .map(|&dimension| {
                let (counts, _) = &passes[&dimension];
                Ok(TotalTable {
                    dimension,
                    counts: counts.clone().relabel(&dimensions[&dimension].labels)?,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        let crosstabs = config
            .crosstabs
            .iter()
            .map(|&crosstab| build_crosstab(dataset, &dimensions, crosstab))
            .collect::<Result<Vec<_>, _>>()?;

        let (_, points) = &passes[&config.map_dimension];
        let map = build_map(
            points,
            &dimensions[&config.map_dimension].labels,
            config,
        )?;

        log::info!(
            "report built: {} events, {} totals, {} crosstabs, {} map series",
            dataset.len(),
            totals.len(),
            crosstabs.len(),
            map.series.len()
        );

        Ok(Self {
            total_events: dataset.len(),
            dimensions,
            totals,
            crosstabs,
            map,
        })
    }

    #[must_use]
    pub fn total(&self, dimension: Dimension) -> Option<&CountTable> {
        self.totals
            .iter()
            .find(|t| t.dimension == dimension)
            .map(|t| &t.counts)
    }

    #[must_use]
    pub fn crosstab(&self, outer: Dimension, inner: Dimension) -> Option<&CrossCountTable> {
        self.crosstabs
            .iter()
            .find(|c| c.outer == outer && c.inner == inner)
            .map(|c| &c.counts)
    }
}

fn build_crosstab(
    dataset: &Dataset,
    dimensions: &BTreeMap<Dimension, DimensionSummary>,
    Crosstab { outer, inner }: Crosstab,
) -> Result<CrosstabTable, AnalysisError> {
    let outer_summary = &dimensions[&outer];
    let inner_summary = &dimensions[&inner];
    let (counts, _) = double_pass(
        dataset,
        &outer_summary.keys,
        &inner_summary.keys,
        outer,
        inner,
    )?;
    let counts = counts
        .relabel(&outer_summary.labels)?
        .relabel_inner(&inner_summary.labels)?;
    Ok(CrosstabTable {
        outer,
        inner,
        counts,
    })
}

fn build_map(
    points: &PointTable,
    labels: &LabelMap,
    config: &ReportConfig,
) -> Result<MapReport, AnalysisError> {
    let params = config.declutter_params();
    let series = points.clone().map_values(|cloud| MapSeries::from_points(&params, &cloud));
    for (key, s) in series.iter() {
        if s.points.is_empty() {
            log::warn!("map series for {} '{key}' has no points", config.map_dimension);
        } else {
            log::debug!(
                "map series '{key}': {} points -> {} representatives",
                s.total,
                s.points.len()
            );
        }
    }
    Ok(MapReport {
        dimension: config.map_dimension,
        radius: params.radius,
        series: series.relabel(labels)?,
    })
}
