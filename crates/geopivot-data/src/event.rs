use chrono::{Datelike as _, NaiveDate};
use geopivot_stats::point::Point;
use serde::{Deserialize, Serialize};

/// A single event row.
///
/// Derived once from a raw `YYYY-MM-DD` date and the raw category and
/// coordinate fields, and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub year: i32,
    /// Month of year, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
    /// Internal event type code.
    pub type_id: String,
    /// Human-readable event type name.
    pub type_name: String,
    /// Longitude.
    pub lon: f64,
    /// Latitude.
    pub lat: f64,
}

impl Event {
    /// `chrono` format of the raw date field.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Builds an event from a raw date string.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geopivot_data::Event;
    /// let event = Event::from_raw("2021-03-08", "12", "Flood", 37.6, 55.7).unwrap();
    /// assert_eq!((event.year, event.month, event.day), (2021, 3, 8));
    /// ```
    pub fn from_raw(
        date: &str,
        type_id: impl Into<String>,
        type_name: impl Into<String>,
        lon: f64,
        lat: f64,
    ) -> Result<Self, chrono::ParseError> {
        let date = NaiveDate::parse_from_str(date.trim(), Self::DATE_FORMAT)?;
        Ok(Self::from_date(date, type_id, type_name, lon, lat))
    }

    #[must_use]
    pub fn from_date(
        date: NaiveDate,
        type_id: impl Into<String>,
        type_name: impl Into<String>,
        lon: f64,
        lat: f64,
    ) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            type_id: type_id.into(),
            type_name: type_name.into(),
            lon,
            lat,
        }
    }

    /// The event location as a `(lon, lat)` map point.
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}
