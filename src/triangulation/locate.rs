//! Point location through the triangle hierarchy

use glam::DVec3;

use super::{Delaunay, EdgeId, TriangleId, TriangleState, VertexId};
use crate::error::{DelaunayError, Result};
use crate::geometry::{planar, point_in_or_on_triangle, point_in_segment};

/// Where a point falls in the current triangulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Strictly inside a leaf triangle
    Inside(TriangleId),
    /// Exactly on the given half-edge of a leaf triangle
    OnEdge(TriangleId, EdgeId),
    /// Coincides with an existing vertex
    OnVertex(VertexId),
}

impl Delaunay {
    /// Find the leaf triangle containing `point`
    ///
    /// Descends from the root, entering the first child whose region holds the
    /// point and backing up when that child leads to no live leaf. After the
    /// boundary trim only the final triangles can be found.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if there is no root triangle and
    /// `PointOutsideTriangulation` if no leaf contains the point.
    pub fn locate(&self, point: DVec3) -> Result<Location> {
        let root = self.root.ok_or(DelaunayError::NotInitialized)?;
        self.locate_from(point, root)
            .ok_or(DelaunayError::PointOutsideTriangulation {
                x: point.x,
                z: point.z,
            })
    }

    fn locate_from(&self, point: DVec3, root: TriangleId) -> Option<Location> {
        let mut pending = vec![root];

        while let Some(id) = pending.pop() {
            let [a, b, c] = self.triangle_positions(id);
            if !point_in_or_on_triangle(point, a, b, c) {
                continue;
            }

            let triangle = self.triangle(id);
            match triangle.state {
                TriangleState::Live => return Some(self.classify(point, id)),
                TriangleState::Pruned => {}
                // first child on top
                TriangleState::Subdivided => pending.extend(triangle.children.iter().rev()),
            }
        }

        None
    }

    /// Refine a containing leaf into vertex, edge, or interior hit
    fn classify(&self, point: DVec3, id: TriangleId) -> Location {
        let edges = self.triangle_edges(id);

        for &e in &edges {
            let origin = self.origin(e);
            if planar(self.position(origin)) == planar(point) {
                return Location::OnVertex(origin);
            }
        }

        for &e in &edges {
            let from = self.position(self.origin(e));
            let to = self.position(self.origin(self.next(e)));
            if point_in_segment(point, from, to) {
                return Location::OnEdge(id, e);
            }
        }

        Location::Inside(id)
    }
}
