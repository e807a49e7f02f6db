use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeTuple as _};

/// A geographic point in map coordinates.
///
/// `x` is the longitude and `y` the latitude. Equality is plain value equality
/// on both coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Strict total order: `x` ascending, ties broken by `y` ascending.
    ///
    /// Uses [`f64::total_cmp`], so the order is total even for NaN and signed zeros.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The points of one category combination. Order carries no meaning.
pub type PointCloud = Vec<Point>;

/// An original input point standing in for itself and every point merged into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Representative {
    /// The input point chosen as representative (never a synthesized centroid).
    pub point: Point,
    /// Number of input points this representative stands for, itself included.
    pub count: usize,
}

impl Representative {
    #[must_use]
    pub const fn new(point: Point) -> Self {
        Self { point, count: 1 }
    }
}

// Serialized as `[x, y, count]`, the value layout scatter renderers consume.
impl Serialize for Representative {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.point.x)?;
        tuple.serialize_element(&self.point.y)?;
        tuple.serialize_element(&self.count)?;
        tuple.end()
    }
}
