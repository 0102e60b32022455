//! Root (super) triangle construction

use glam::DVec3;
use log::debug;

use super::Delaunay;
use crate::error::{DelaunayError, Result};
use crate::geometry::{orientation, Line};
use crate::point_cloud::{BoundingRect, PointCloud};

impl Delaunay {
    /// Build the super-triangle enclosing the expanded bounding rectangle
    ///
    /// Two lines with slopes ±1 pass through the expanded rectangle's minimum
    /// corners and a third runs along its maximum `z` side; their pairwise
    /// intersections are the corners. The triangle is stored with positive
    /// [`orientation`] and every edge is a boundary edge.
    pub(super) fn build_root(&mut self, cloud: &PointCloud) -> Result<()> {
        let rect = cloud.bounding_rect(0.0).unwrap_or(BoundingRect {
            min: DVec3::ZERO,
            max: DVec3::ZERO,
        });
        let rect = rect.expanded(self.config.root_margin(rect.extent()));
        let (min, max) = (rect.min, rect.max);

        let left = Line::through(min, DVec3::new(min.x + 1.0, 0.0, min.z - 1.0));
        let right = Line::through(
            DVec3::new(max.x, 0.0, min.z),
            DVec3::new(max.x - 1.0, 0.0, min.z - 1.0),
        );
        let top = Line::through(DVec3::new(min.x, 0.0, max.z), max);

        let degenerate = || DelaunayError::InvalidConfig("root triangle is degenerate".to_string());
        let apex = left.intersect(&right).ok_or_else(degenerate)?;
        let mut corner_a = left.intersect(&top).ok_or_else(degenerate)?;
        let mut corner_b = right.intersect(&top).ok_or_else(degenerate)?;

        let winding = orientation(apex, corner_a, corner_b);
        if !winding.is_finite() || winding == 0.0 {
            return Err(degenerate());
        }
        if winding < 0.0 {
            std::mem::swap(&mut corner_a, &mut corner_b);
        }

        let v0 = self.add_vertex(apex)?;
        let v1 = self.add_vertex(corner_a)?;
        let v2 = self.add_vertex(corner_b)?;
        let (root, _) = self.add_triangle(v0, v1, v2)?;
        self.root = Some(root);

        debug!(
            "root triangle {:?}: ({:.2}, {:.2}) ({:.2}, {:.2}) ({:.2}, {:.2})",
            root, apex.x, apex.z, corner_a.x, corner_a.z, corner_b.x, corner_b.z
        );
        Ok(())
    }
}
