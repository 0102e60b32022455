//! Point cloud input for the triangulation
//!
//! A bounded, ordered sequence of points with an axis-aligned bounding
//! rectangle in the `x`/`z` plane. The order of the points is the insertion
//! order used by the triangulation.

use glam::DVec3;
use parry2d_f64::math::Point;
use parry2d_f64::transformation;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DelaunayError, Result};
use crate::geometry::{orientation, planar_distance_squared};

/// Axis-aligned rectangle in the `x`/`z` plane
///
/// Only the `x` and `z` components of the corners are meaningful; `y` is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRect {
    /// Corner with the smallest `x` and `z`
    pub min: DVec3,
    /// Corner with the largest `x` and `z`
    pub max: DVec3,
}

impl BoundingRect {
    /// Size along `x`
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Size along `z`
    #[inline]
    pub fn depth(&self) -> f64 {
        self.max.z - self.min.z
    }

    /// Largest side of the rectangle
    #[inline]
    pub fn extent(&self) -> f64 {
        self.width().max(self.depth())
    }

    /// Rectangle grown by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: DVec3::new(self.min.x - margin, 0.0, self.min.z - margin),
            max: DVec3::new(self.max.x + margin, 0.0, self.max.z + margin),
        }
    }
}

/// An ordered, bounded set of points to triangulate
///
/// # Example
///
/// ```rust
/// use terrain_delaunay::*;
/// use glam::DVec3;
///
/// let mut cloud = PointCloud::new(4);
/// cloud.add_point(DVec3::new(0.0, 1.0, 0.0)).unwrap();
/// cloud.add_point(DVec3::new(4.0, 2.0, 0.0)).unwrap();
///
/// let rect = cloud.bounding_rect(1.0).unwrap();
/// assert_eq!(rect.min.x, -1.0);
/// assert_eq!(rect.max.x, 5.0);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedPointCloud"))]
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    /// Maximum number of points accepted
    max_points: usize,
    /// Points in insertion order
    points: Vec<DVec3>,
}

/// Serialized form of a [`PointCloud`], checked against its bound on the way in
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct UncheckedPointCloud {
    max_points: usize,
    points: Vec<DVec3>,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedPointCloud> for PointCloud {
    type Error = DelaunayError;

    fn try_from(unchecked: UncheckedPointCloud) -> Result<Self> {
        if unchecked.points.len() > unchecked.max_points {
            return Err(DelaunayError::TooManyPoints {
                max: unchecked.max_points,
            });
        }
        Ok(Self {
            max_points: unchecked.max_points,
            points: unchecked.points,
        })
    }
}

impl PointCloud {
    /// Create an empty cloud holding at most `max_points` points
    pub fn new(max_points: usize) -> Self {
        Self {
            max_points,
            points: Vec::with_capacity(max_points),
        }
    }

    /// Create a cloud from existing points
    ///
    /// # Errors
    ///
    /// Returns `TooManyPoints` if more than `max_points` points are supplied
    pub fn from_points<I>(points: I, max_points: usize) -> Result<Self>
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut cloud = Self::new(max_points);
        for point in points {
            cloud.add_point(point)?;
        }
        Ok(cloud)
    }

    /// Generate `count` uniformly distributed points inside the box `[min, max]`
    ///
    /// The same seed always produces the same points in the same order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use terrain_delaunay::PointCloud;
    /// use glam::DVec3;
    ///
    /// let min = DVec3::new(-40.0, -2.0, -40.0);
    /// let max = DVec3::new(40.0, 2.0, 40.0);
    /// let cloud = PointCloud::random(100, min, max, 7);
    /// assert_eq!(cloud.len(), 100);
    /// ```
    pub fn random(count: usize, min: DVec3, max: DVec3, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let lo = min.min(max);
        let hi = min.max(max);

        let points = (0..count)
            .map(|_| {
                DVec3::new(
                    rng.gen_range(lo.x..=hi.x),
                    rng.gen_range(lo.y..=hi.y),
                    rng.gen_range(lo.z..=hi.z),
                )
            })
            .collect();

        Self {
            max_points: count,
            points,
        }
    }

    /// Append a point
    ///
    /// # Errors
    ///
    /// Returns `TooManyPoints` if the cloud is full
    pub fn add_point(&mut self, point: DVec3) -> Result<()> {
        if self.points.len() >= self.max_points {
            return Err(DelaunayError::TooManyPoints {
                max: self.max_points,
            });
        }
        self.points.push(point);
        Ok(())
    }

    /// Randomize the insertion order deterministically
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.points.shuffle(&mut rng);
    }

    /// Remove all points
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Points in insertion order
    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Number of points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the cloud has no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum number of points accepted
    #[inline]
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Bounding rectangle in the `x`/`z` plane grown by `expansion`
    ///
    /// Returns `None` for an empty cloud.
    pub fn bounding_rect(&self, expansion: f64) -> Option<BoundingRect> {
        let first = self.points.first()?;
        let mut min = DVec3::new(first.x, 0.0, first.z);
        let mut max = min;

        for point in &self.points[1..] {
            min.x = min.x.min(point.x);
            min.z = min.z.min(point.z);
            max.x = max.x.max(point.x);
            max.z = max.z.max(point.z);
        }

        Some(BoundingRect { min, max }.expanded(expansion))
    }

    /// Area of the convex hull of the points in the `x`/`z` plane
    ///
    /// Zero for fewer than three points or collinear clouds.
    pub fn convex_hull_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }

        // All points on one line (or coincident) span no area
        let origin = self.points[0];
        let farthest = self
            .points
            .iter()
            .copied()
            .max_by(|a, b| {
                planar_distance_squared(origin, *a).total_cmp(&planar_distance_squared(origin, *b))
            })
            .unwrap_or(origin);
        if self
            .points
            .iter()
            .all(|p| orientation(origin, farthest, *p) == 0.0)
        {
            return 0.0;
        }

        let projected: Vec<Point<f64>> = self
            .points
            .iter()
            .map(|p| Point::new(p.x, p.z))
            .collect();
        let hull = transformation::convex_hull(&projected);
        if hull.len() < 3 {
            return 0.0;
        }

        // Shoelace formula over the hull polygon
        let twice_area: f64 = hull
            .iter()
            .zip(hull.iter().cycle().skip(1))
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();

        0.5 * twice_area.abs()
    }
}
