//! Greedy spatial declutter for map rendering.
//!
//! Dense point clouds overplot when rendered as scatter series. This module
//! merges points that lie within a weighted Manhattan radius of an existing
//! representative, so that a renderer draws one dot per representative and
//! scales it by the representative's count.
//!
//! # Algorithm
//!
//! 1. Sort the input by `x` ascending, ties by `y` ascending ([`Point::total_cmp`])
//! 2. Stream the sorted points; for each point, scan the representatives in
//!    creation order and merge into the first one with
//!    `|Δx| + |Δy| · lat_weight <= radius` (with a zero radius, only a
//!    bit-identical point merges)
//! 3. A point that matches no representative becomes a new one with count 1
//!
//! This is a leader-style approximation, not clustering: a point may be merged
//! into a representative that is not its nearest one, and reordering the input
//! may change which points become representatives. For a fixed input order and
//! fixed parameters the result is deterministic.
//!
//! Latitude differences are weighted more heavily than longitude differences
//! (`lat_weight`, 1.25 by default) to approximate visual density at mid
//! latitudes.

use serde::{Deserialize, Serialize};

use crate::point::{Point, Representative};

/// Parameters of the declutter pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeclutterParams {
    /// Merge radius in weighted map units. Zero merges bit-identical duplicates only.
    pub radius: f64,
    /// Multiplier applied to latitude differences.
    pub lat_weight: f64,
}

impl Default for DeclutterParams {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl DeclutterParams {
    pub const DEFAULT_LAT_WEIGHT: f64 = 1.25;

    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self {
            radius,
            lat_weight: Self::DEFAULT_LAT_WEIGHT,
        }
    }

    #[must_use]
    pub const fn with_lat_weight(self, lat_weight: f64) -> Self {
        Self { lat_weight, ..self }
    }

    /// Weighted Manhattan distance between two points.
    #[must_use]
    pub fn distance(&self, a: Point, b: Point) -> f64 {
        (a.x - b.x).abs() + (a.y - b.y).abs() * self.lat_weight
    }

    /// Whether `point` falls into the representative at `rep`.
    ///
    /// A zero radius only merges bit-identical points, so `-0.0` and `0.0`
    /// stay apart.
    #[must_use]
    pub fn merges(&self, rep: Point, point: Point) -> bool {
        if self.radius == 0.0 {
            rep.total_cmp(&point).is_eq()
        } else {
            self.distance(rep, point) <= self.radius
        }
    }

    /// Reduces `points` to weighted representatives.
    ///
    /// The returned representatives are in creation order, which is the sorted
    /// order of their points. Counts sum to `points.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geopivot_stats::{declutter::DeclutterParams, point::Point};
    /// let params = DeclutterParams::new(1.0).with_lat_weight(2.0);
    /// // dy = 0.6 * 2.0 = 1.2 > 1.0, so no merge
    /// let reps = params.declutter(&[Point::new(0.0, 0.0), Point::new(0.0, 0.6)]);
    /// assert_eq!(reps.len(), 2);
    /// ```
    #[must_use]
    pub fn declutter(&self, points: &[Point]) -> Vec<Representative> {
        let mut sorted = points.to_vec();
        sorted.sort_by(Point::total_cmp);

        let mut reps: Vec<Representative> = vec![];
        for point in sorted {
            match reps.iter_mut().find(|rep| self.merges(rep.point, point)) {
                Some(rep) => rep.count += 1,
                None => reps.push(Representative::new(point)),
            }
        }
        reps
    }
}

/// Declutters `points` with the given radius and the default latitude weight.
#[must_use]
pub fn filter_points(radius: f64, points: &[Point]) -> Vec<Representative> {
    DeclutterParams::new(radius).declutter(points)
}

/// Smallest and largest representative count, `(1, 1)` when there are none.
///
/// Used to bound the colour/size scale of a rendered map.
#[must_use]
pub fn count_range(reps: &[Representative]) -> (usize, usize) {
    let min = reps.iter().map(|rep| rep.count).min().unwrap_or(1);
    let max = reps.iter().map(|rep| rep.count).max().unwrap_or(1);
    (min, max)
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    fn random_points(rng: &mut Pcg32, n: usize) -> Vec<Point> {
        (0..n)
            .map(|_| Point::new(rng.random_range(20.0..60.0), rng.random_range(40.0..70.0)))
            .collect()
    }

    #[test]
    fn test_merges_within_weighted_radius() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.4),
            Point::new(10.0, 10.0),
        ];
        let reps = filter_points(2.0, &points);
        assert_eq!(
            reps,
            vec![
                Representative {
                    point: Point::new(0.0, 0.0),
                    count: 2
                },
                Representative {
                    point: Point::new(10.0, 10.0),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_points(4.0, &[]).is_empty());
    }

    #[test]
    fn test_single_point() {
        let reps = filter_points(4.0, &[Point::new(3.0, 4.0)]);
        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].point, Point::new(3.0, 4.0));
        assert_eq!(reps[0].count, 1);
    }

    #[test]
    fn test_zero_radius_merges_exact_duplicates_only() {
        let points = [
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.000_001),
            Point::new(1.000_001, 1.0),
        ];
        let reps = filter_points(0.0, &points);
        assert_eq!(reps.len(), 3);
        assert_eq!(reps[0].count, 2);
    }

    #[test]
    fn test_zero_radius_keeps_signed_zeros_apart() {
        let points = [
            Point::new(-0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, -0.0),
            Point::new(0.0, 0.0),
        ];
        let reps = filter_points(0.0, &points);
        assert_eq!(reps.len(), 3);
        assert_eq!(reps.iter().map(|r| r.count).sum::<usize>(), 4);
        assert!(reps[0].point.x.is_sign_negative());
        assert_eq!(reps[2].count, 2);

        // any positive radius treats them as the same spot
        assert_eq!(filter_points(0.1, &points).len(), 1);
    }

    #[test]
    fn test_latitude_is_weighted() {
        // dx = 0, dy = 1.0 * 1.25 = 1.25 > 1.2
        let vertical = [Point::new(0.0, 0.0), Point::new(0.0, 1.0)];
        assert_eq!(filter_points(1.2, &vertical).len(), 2);
        // dx = 1.0, dy = 0 -> 1.0 <= 1.2
        let horizontal = [Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        assert_eq!(filter_points(1.2, &horizontal).len(), 1);
    }

    #[test]
    fn test_first_match_wins() {
        // c is nearer to b (0.85) than to a (1.725) but a was created first.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.5, 1.5);
        let c = Point::new(0.6, 0.9);
        let reps = filter_points(2.0, &[c, b, a]);
        assert_eq!(reps.len(), 2);
        assert_eq!(reps[0].point, a);
        assert_eq!(reps[0].count, 2);
        assert_eq!(reps[1].point, b);
        assert_eq!(reps[1].count, 1);
    }

    #[test]
    fn test_output_independent_of_input_permutation_for_fixed_sort() {
        // Input is sorted before streaming, so any permutation of distinct points
        // yields the same representatives.
        let points = [
            Point::new(3.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.5),
            Point::new(3.2, 1.1),
        ];
        let mut reversed = points;
        reversed.reverse();
        assert_eq!(filter_points(1.0, &points), filter_points(1.0, &reversed));
    }

    #[test]
    fn test_bound_and_count_conservation() {
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        for n in [0, 1, 10, 200] {
            let points = random_points(&mut rng, n);
            for radius in [0.0, 0.5, 2.0, 8.0, 100.0] {
                let reps = filter_points(radius, &points);
                assert!(reps.len() <= points.len());
                assert_eq!(reps.iter().map(|r| r.count).sum::<usize>(), points.len());
                for rep in &reps {
                    assert!(points.contains(&rep.point), "{} is not an input point", rep.point);
                }
            }
        }
    }

    #[test]
    fn test_huge_radius_collapses_everything() {
        let mut rng = Pcg32::seed_from_u64(7);
        let points = random_points(&mut rng, 50);
        let reps = filter_points(1.0e6, &points);
        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].count, 50);
    }

    #[test]
    fn test_monotone_in_radius_on_collinear_points() {
        let mut rng = Pcg32::seed_from_u64(42);
        let along_x = (0..100)
            .map(|_| Point::new(rng.random_range(0.0..50.0), 0.0))
            .collect::<Vec<_>>();
        let along_y = (0..100)
            .map(|_| Point::new(0.0, rng.random_range(0.0..50.0)))
            .collect::<Vec<_>>();

        for points in [&along_x, &along_y] {
            let mut prev = usize::MAX;
            for radius in [0.0, 0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 64.0] {
                let len = filter_points(radius, points).len();
                assert!(len <= prev, "radius {radius}: {len} > {prev}");
                prev = len;
            }
        }
    }

    #[test]
    fn test_count_range() {
        assert_eq!(count_range(&[]), (1, 1));
        let reps = [
            Representative {
                point: Point::new(0.0, 0.0),
                count: 3,
            },
            Representative {
                point: Point::new(9.0, 0.0),
                count: 7,
            },
        ];
        assert_eq!(count_range(&reps), (3, 7));
    }
}
