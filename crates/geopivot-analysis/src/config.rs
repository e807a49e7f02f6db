//! Report configuration
//!
//! Every field has a default, so an empty JSON object (`{}`) is a valid
//! configuration describing the standard report.

use geopivot_data::CsvColumns;
use geopivot_stats::declutter::DeclutterParams;
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("declutter radius must be a finite non-negative number, got {radius}")]
    InvalidRadius { radius: f64 },
    #[display("latitude weight must be a finite non-negative number, got {lat_weight}")]
    InvalidLatWeight { lat_weight: f64 },
    #[display("crosstab uses {dimension} as both outer and inner dimension")]
    SameDimension { dimension: Dimension },
}

/// A two-dimensional count table: one row per `outer` key, one column per `inner` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crosstab {
    pub outer: Dimension,
    pub inner: Dimension,
}

impl Crosstab {
    #[must_use]
    pub const fn new(outer: Dimension, inner: Dimension) -> Self {
        Self { outer, inner }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Declutter radius of the map series.
    pub radius: f64,
    /// Latitude weight of the declutter distance.
    pub lat_weight: f64,
    /// Dimensions with a one-dimensional count table.
    pub totals: Vec<Dimension>,
    pub crosstabs: Vec<Crosstab>,
    /// Dimension the map series are split by.
    pub map_dimension: Dimension,
    pub csv: CsvColumns,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            lat_weight: DeclutterParams::DEFAULT_LAT_WEIGHT,
            totals: vec![Dimension::Year, Dimension::Type],
            crosstabs: vec![
                Crosstab::new(Dimension::Year, Dimension::Month),
                Crosstab::new(Dimension::Year, Dimension::Type),
            ],
            map_dimension: Dimension::Type,
            csv: CsvColumns::default(),
        }
    }
}

impl ReportConfig {
    pub const DEFAULT_RADIUS: f64 = 4.0;

    #[must_use]
    pub fn declutter_params(&self) -> DeclutterParams {
        DeclutterParams::new(self.radius).with_lat_weight(self.lat_weight)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(ConfigError::InvalidRadius {
                radius: self.radius,
            });
        }
        if !(self.lat_weight.is_finite() && self.lat_weight >= 0.0) {
            return Err(ConfigError::InvalidLatWeight {
                lat_weight: self.lat_weight,
            });
        }
        if let Some(crosstab) = self.crosstabs.iter().find(|c| c.outer == c.inner) {
            return Err(ConfigError::SameDimension {
                dimension: crosstab.outer,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config: ReportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: ReportConfig = serde_json::from_str(
            r#"{
                "radius": 1.5,
                "crosstabs": [{ "outer": "month", "inner": "type" }],
                "csv": { "date": "event_date" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.radius, 1.5);
        assert_eq!(
            config.crosstabs,
            [Crosstab::new(Dimension::Month, Dimension::Type)]
        );
        assert_eq!(config.csv.date, "event_date");
        assert_eq!(config.csv.lon, "lon");
        assert_eq!(config.map_dimension, Dimension::Type);
    }

    #[test]
    fn test_declutter_params() {
        let config = ReportConfig {
            radius: 2.0,
            lat_weight: 1.0,
            ..ReportConfig::default()
        };
        let params = config.declutter_params();
        assert_eq!(params.radius, 2.0);
        assert_eq!(params.lat_weight, 1.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let negative = ReportConfig {
            radius: -1.0,
            ..ReportConfig::default()
        };
        assert_eq!(
            negative.validate().unwrap_err(),
            ConfigError::InvalidRadius { radius: -1.0 }
        );

        let infinite = ReportConfig {
            lat_weight: f64::INFINITY,
            ..ReportConfig::default()
        };
        assert!(matches!(
            infinite.validate().unwrap_err(),
            ConfigError::InvalidLatWeight { .. }
        ));

        let nan = ReportConfig {
            radius: f64::NAN,
            ..ReportConfig::default()
        };
        assert!(matches!(
            nan.validate().unwrap_err(),
            ConfigError::InvalidRadius { .. }
        ));

        let same = ReportConfig {
            crosstabs: vec![Crosstab::new(Dimension::Type, Dimension::Type)],
            ..ReportConfig::default()
        };
        assert_eq!(
            same.validate().unwrap_err(),
            ConfigError::SameDimension {
                dimension: Dimension::Type
            }
        );
    }
}
