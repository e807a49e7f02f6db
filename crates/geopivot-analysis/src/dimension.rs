use geopivot_data::Column;
use serde::{Deserialize, Serialize};

/// A categorical attribute events are grouped by.
///
/// Parses case-insensitively from its variant name (`"year"`, `"Month"`,
/// `"TYPE"`).
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
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    #[display("year")]
    Year,
    #[display("month")]
    Month,
    #[display("type")]
    Type,
}

impl Dimension {
    pub const ALL: [Self; 3] = [Self::Year, Self::Month, Self::Type];

    /// Dataset column the dimension groups on.
    #[must_use]
    pub const fn column(self) -> Column {
        match self {
            Self::Year => Column::Year,
            Self::Month => Column::Month,
            Self::Type => Column::TypeId,
        }
    }

    /// Whether keys are integers ordered numerically.
    ///
    /// Non-numeric dimensions keep keys in first-seen row order.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Year | Self::Month)
    }
}
