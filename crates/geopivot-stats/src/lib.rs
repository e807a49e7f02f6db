//! Spatial statistics for the geopivot report engine.
//!
//! This crate reduces geographic point clouds to a bounded number of weighted
//! representatives so that map renderers do not overplot dense areas.
//!
//! # Modules
//!
//! - [`point`]: Geographic points and weighted representatives
//! - [`declutter`]: Greedy proximity-based reduction of point clouds
//!
//! # Examples
//!
//! ## Decluttering a point cloud
//!
//! ```
//! use geopivot_stats::{declutter::filter_points, point::Point};
//!
//! let points = [Point::new(0.0, 0.0), Point::new(0.0, 0.4), Point::new(10.0, 10.0)];
//! let reps = filter_points(2.0, &points);
//!
//! assert_eq!(reps.len(), 2);
//! assert_eq!(reps[0].point, Point::new(0.0, 0.0));
//! assert_eq!(reps[0].count, 2);
//! assert_eq!(reps[1].count, 1);
//! ```
//!
//! ## Scaling a visual map
//!
//! ```
//! use geopivot_stats::{declutter::{count_range, filter_points}, point::Point};
//!
//! let points = [Point::new(1.0, 1.0), Point::new(1.0, 1.0), Point::new(5.0, 5.0)];
//! let reps = filter_points(0.0, &points);
//! assert_eq!(count_range(&reps), (1, 2));
//! ```

pub mod declutter;
pub mod point;
