//! Triangulation configuration and builder
//!
//! This module provides the knobs that size the entity pools, shape the root
//! (super) triangle, and decide how degenerate input points are treated.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DelaunayError, Result};

/// Upper bound on the triangles a run over `max_points` points can allocate
///
/// The `i`-th insertion leaves its point with at most `i + 2` neighbors, so it
/// allocates at most `2i + 1` triangles (three for the split, two per flip).
/// Each insertion reserves `2 * (vertices + 1)` before touching the mesh; the
/// bound `1 + 2 * (max_points + 3)²` covers those reservations with room left
/// for the flips of the final repair pass.
pub fn worst_case_triangles(max_points: usize) -> usize {
    let n = max_points.saturating_add(3);
    n.saturating_mul(n).saturating_mul(2).saturating_add(1)
}

/// What to do with a point that lies exactly on an existing edge
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePointPolicy {
    /// Split both triangles sharing the edge into two each
    #[default]
    Split,
    /// Refuse the point with [`DelaunayError::PointOnEdge`]
    Reject,
}

/// What to do with a point that coincides with an existing vertex
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Leave the triangulation untouched and record the point as skipped
    #[default]
    Skip,
    /// Refuse the point with [`DelaunayError::DuplicatePoint`]
    Reject,
}

/// Configuration for a Delaunay triangulation run
///
/// The same configuration and the same point order always produce the
/// identical triangulation.
///
/// # Example
///
/// ```rust
/// use terrain_delaunay::*;
///
/// let config = TriangulationConfigBuilder::new()
///     .max_points(256)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.vertex_capacity(), 259);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangulationConfig {
    /// Expected maximum number of inserted points
    pub max_points: usize,

    /// Explicit triangle pool capacity, overriding the value derived from `max_points`
    pub triangle_capacity_override: Option<usize>,

    /// Absolute margin added around the point cloud's bounding rectangle
    pub root_expansion: f64,

    /// Additional margin as a multiple of the bounding rectangle's largest side
    ///
    /// Legality never compares the super-triangle corners by distance, but a
    /// wide margin keeps the triangles fanning out to them well shaped.
    pub root_expansion_scale: f64,

    /// Handling of points lying exactly on an existing edge
    pub edge_point_policy: EdgePointPolicy,

    /// Handling of points coinciding with an existing vertex
    pub duplicate_policy: DuplicatePolicy,
}

impl TriangulationConfig {
    /// Capacity of the vertex pool (input points plus the three super-triangle corners)
    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.max_points + 3
    }

    /// Capacity of the triangle pool
    ///
    /// Defaults to [`worst_case_triangles`]; pools grow on demand, so a large
    /// capacity costs nothing until it is used.
    #[inline]
    pub fn triangle_capacity(&self) -> usize {
        self.triangle_capacity_override
            .unwrap_or_else(|| worst_case_triangles(self.max_points))
    }

    /// Capacity of the half-edge pool (three per triangle)
    #[inline]
    pub fn edge_capacity(&self) -> usize {
        self.triangle_capacity().saturating_mul(3)
    }

    /// Margin applied to a bounding rectangle whose largest side is `extent`
    #[inline]
    pub fn root_margin(&self, extent: f64) -> f64 {
        self.root_expansion + self.root_expansion_scale * extent
    }
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            max_points: 1024,
            triangle_capacity_override: None,
            root_expansion: 50.0,
            root_expansion_scale: 10.0,
            edge_point_policy: EdgePointPolicy::default(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// Builder for creating TriangulationConfig with validation
///
/// # Example
///
/// ```rust
/// use terrain_delaunay::*;
///
/// let config = TriangulationConfigBuilder::new()
///     .max_points(100)
///     .unwrap()
///     .root_expansion(10.0)
///     .unwrap()
///     .edge_point_policy(EdgePointPolicy::Reject)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.edge_point_policy, EdgePointPolicy::Reject);
/// ```
#[derive(Debug, Clone)]
pub struct TriangulationConfigBuilder {
    config: TriangulationConfig,
}

impl TriangulationConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - max_points: 1024
    /// - triangle capacity: derived from max_points
    /// - root_expansion: 50.0
    /// - root_expansion_scale: 10.0
    /// - edge_point_policy: Split
    /// - duplicate_policy: Skip
    pub fn new() -> Self {
        Self {
            config: TriangulationConfig::default(),
        }
    }

    /// Set the expected maximum number of points
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `max_points` is 0
    pub fn max_points(mut self, max_points: usize) -> Result<Self> {
        if max_points == 0 {
            return Err(DelaunayError::InvalidConfig(
                "max points must be at least 1".to_string(),
            ));
        }
        self.config.max_points = max_points;
        Ok(self)
    }

    /// Override the triangle pool capacity
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `capacity` is 0 (the root triangle needs a slot)
    pub fn triangle_capacity(mut self, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DelaunayError::InvalidConfig(
                "triangle capacity must be at least 1".to_string(),
            ));
        }
        self.config.triangle_capacity_override = Some(capacity);
        Ok(self)
    }

    /// Set the absolute root triangle margin
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `expansion` is not strictly positive and finite
    pub fn root_expansion(mut self, expansion: f64) -> Result<Self> {
        if !(expansion.is_finite() && expansion > 0.0) {
            return Err(DelaunayError::InvalidConfig(format!(
                "root expansion must be positive (got {})",
                expansion
            )));
        }
        self.config.root_expansion = expansion;
        Ok(self)
    }

    /// Set the root triangle margin relative to the cloud's extent
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `scale` is negative or not finite
    pub fn root_expansion_scale(mut self, scale: f64) -> Result<Self> {
        if !(scale.is_finite() && scale >= 0.0) {
            return Err(DelaunayError::InvalidConfig(format!(
                "root expansion scale must be >= 0 (got {})",
                scale
            )));
        }
        self.config.root_expansion_scale = scale;
        Ok(self)
    }

    /// Set the policy for points lying on an existing edge
    pub fn edge_point_policy(mut self, policy: EdgePointPolicy) -> Self {
        self.config.edge_point_policy = policy;
        self
    }

    /// Set the policy for duplicate points
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<TriangulationConfig> {
        Ok(self.config)
    }
}

impl Default for TriangulationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
