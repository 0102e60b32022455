//! Point insertion: triangle and edge splits

use glam::DVec3;
use log::{debug, warn};

use super::{Delaunay, EdgeId, IterationState, Location, TriangleId, VertexId};
use crate::config::{DuplicatePolicy, EdgePointPolicy};
use crate::error::{DelaunayError, Result};

/// Outcome of inserting a single point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The point became a new vertex
    Inserted(VertexId),
    /// The point coincides with an existing vertex and was left out
    Skipped {
        /// Vertex already occupying the position
        existing: VertexId,
    },
}

impl Delaunay {
    /// Insert one point and restore the Delaunay property around it
    ///
    /// # Errors
    ///
    /// - `NotInitialized` before the root triangle exists or after the trim
    /// - `PointOutsideTriangulation` if the point is outside the root triangle
    /// - `DuplicatePoint` / `PointOnEdge` when the policies reject the point
    /// - `CapacityExceeded` when the pools cannot hold the worst case of the
    ///   insertion; the mesh is left unchanged
    pub fn insert_point(&mut self, point: DVec3) -> Result<Insertion> {
        if self.root.is_none() || self.state == IterationState::Done {
            return Err(DelaunayError::NotInitialized);
        }

        match self.locate(point)? {
            Location::OnVertex(existing) => match self.config.duplicate_policy {
                DuplicatePolicy::Skip => {
                    warn!(
                        "skipping point ({}, {}): duplicates {:?}",
                        point.x, point.z, existing
                    );
                    Ok(Insertion::Skipped { existing })
                }
                DuplicatePolicy::Reject => Err(DelaunayError::DuplicatePoint {
                    x: point.x,
                    z: point.z,
                }),
            },
            Location::OnEdge(triangle, edge) => match self.config.edge_point_policy {
                EdgePointPolicy::Split => {
                    self.reserve_insertion()?;
                    self.split_edge(triangle, edge, point).map(Insertion::Inserted)
                }
                EdgePointPolicy::Reject => Err(DelaunayError::PointOnEdge {
                    x: point.x,
                    z: point.z,
                }),
            },
            Location::Inside(triangle) => {
                self.reserve_insertion()?;
                self.split_triangle(triangle, point).map(Insertion::Inserted)
            }
        }
    }

    /// Make room for the split and every flip that can follow it
    ///
    /// The new point ends up with at most one neighbor per existing vertex.
    /// The split leaves it with three or four and each flip adds one more
    /// along with two triangles, so `2 * (vertices + 1)` triangles always fit.
    fn reserve_insertion(&self) -> Result<()> {
        let triangles = 2 * (self.vertices.len() + 1);
        self.vertices.reserve(1)?;
        self.triangles.reserve(triangles)?;
        self.edges.reserve(3 * triangles)
    }

    /// Split leaf `(a, b, c)` at an interior point `p` into `(p, a, b)`, `(p, b, c)`, `(p, c, a)`
    ///
    /// Both splits run after `reserve_insertion` and cannot run out of space.
    fn split_triangle(&mut self, id: TriangleId, point: DVec3) -> Result<VertexId> {
        let [ab, bc, ca] = self.triangle_edges(id);
        let [a, b, c] = [ab, bc, ca].map(|e| self.origin(e));

        let p = self.add_vertex(point)?;
        let (t0, [t0_pa, t0_ab, t0_bp]) = self.add_triangle(p, a, b)?;
        let (t1, [t1_pb, t1_bc, t1_cp]) = self.add_triangle(p, b, c)?;
        let (t2, [t2_pc, t2_ca, t2_ap]) = self.add_triangle(p, c, a)?;

        // outer edges take over the neighbors of the split triangle
        self.link_twins(t0_ab, self.twin(ab));
        self.link_twins(t1_bc, self.twin(bc));
        self.link_twins(t2_ca, self.twin(ca));

        // inner edges pair up around p
        self.link_twins(t0_bp, Some(t1_pb));
        self.link_twins(t1_cp, Some(t2_pc));
        self.link_twins(t2_ap, Some(t0_pa));

        self.subdivide(id, &[t0, t1, t2]);
        debug!("split {:?} at {:?} into {:?} {:?} {:?}", id, p, t0, t1, t2);

        for edge in [t0_ab, t1_bc, t2_ca] {
            self.legalize(edge)?;
        }
        Ok(p)
    }

    /// Split the triangles on both sides of `edge` at a point `p` lying on it
    ///
    /// With `edge = a → b` in `(a, b, c)` and its twin in `(b, a, d)`, the
    /// children are `(p, b, c)`, `(p, c, a)`, `(p, a, d)` and `(p, d, b)`.
    /// A boundary edge only splits its own triangle.
    fn split_edge(&mut self, id: TriangleId, edge: EdgeId, point: DVec3) -> Result<VertexId> {
        let opposite = self.twin(edge);
        let bc = self.next(edge);
        let ca = self.next(bc);
        let (a, b, c) = (self.origin(edge), self.origin(bc), self.origin(ca));

        let p = self.add_vertex(point)?;
        let (t0, [t0_pb, t0_bc, t0_cp]) = self.add_triangle(p, b, c)?;
        let (t1, [t1_pc, t1_ca, t1_ap]) = self.add_triangle(p, c, a)?;

        self.link_twins(t0_bc, self.twin(bc));
        self.link_twins(t1_ca, self.twin(ca));
        self.link_twins(t0_cp, Some(t1_pc));
        self.subdivide(id, &[t0, t1]);

        let mut outer = vec![t0_bc, t1_ca];

        if let Some(ba) = opposite {
            let neighbor = self.edge(ba).face;
            let ad = self.next(ba);
            let db = self.next(ad);
            let d = self.origin(db);

            let (t2, [t2_pa, t2_ad, t2_dp]) = self.add_triangle(p, a, d)?;
            let (t3, [t3_pd, t3_db, t3_bp]) = self.add_triangle(p, d, b)?;

            self.link_twins(t2_ad, self.twin(ad));
            self.link_twins(t3_db, self.twin(db));
            self.link_twins(t2_dp, Some(t3_pd));

            // stitch the two halves together across the split edge
            self.link_twins(t1_ap, Some(t2_pa));
            self.link_twins(t3_bp, Some(t0_pb));
            self.subdivide(neighbor, &[t2, t3]);

            debug!(
                "split edge {:?} at {:?}: {:?} -> {:?} {:?}, {:?} -> {:?} {:?}",
                edge, p, id, t0, t1, neighbor, t2, t3
            );
            outer.extend([t2_ad, t3_db]);
        } else {
            debug!("split boundary edge {:?} at {:?}: {:?} -> {:?} {:?}", edge, p, id, t0, t1);
        }

        for edge in outer {
            self.legalize(edge)?;
        }
        Ok(p)
    }
}
