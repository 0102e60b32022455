//! Edge legalization by flipping
//!
//! The super-triangle corners stand for points infinitely far away, so they
//! never take part in an incircle test. An edge touching them is judged by
//! rank instead: corner `i` outranks corner `j` when `i < j`, and every corner
//! outranks a real point. Such an edge is illegal when its better endpoint
//! outranks both opposite vertices, which pushes the corners off the hull and
//! lets the real edges take their place. No flip is made unless the
//! quadrilateral around the edge is strictly convex.

use log::{debug, trace};

use super::{Delaunay, EdgeId, VertexId};
use crate::error::Result;
use crate::geometry::{in_circumcircle, orientation};

impl Delaunay {
    /// Flip `edge` if it is illegal, then keep flipping the newly exposed edges
    ///
    /// `edge` must be the edge opposite the just-inserted point `p` in its
    /// triangle `(a, b, p)`, with `edge = a → b`. Across the twin lies
    /// `(b, a, d)`. A flip replaces both triangles with `(p, a, d)` and
    /// `(p, d, b)`, which become children of both, and exposes `a → d` and
    /// `d → b` to the same test.
    pub(super) fn legalize(&mut self, edge: EdgeId) -> Result<()> {
        let mut pending = vec![edge];

        while let Some(edge) = pending.pop() {
            if !self.is_live_edge(edge) {
                continue;
            }
            let Some(twin) = self.twin(edge) else {
                continue;
            };
            if !self.is_illegal(edge, twin) {
                continue;
            }

            let [_, n0_ad, n1_db, _] = self.flip(edge, twin)?;
            pending.push(n1_db);
            pending.push(n0_ad);
        }

        Ok(())
    }

    /// Flip illegal edges anywhere in the mesh until none is left
    ///
    /// Insertion only looks at the edges around the new point; the corners of
    /// the super-triangle can leave illegal edges elsewhere on the hull.
    pub(super) fn repair(&mut self) -> Result<usize> {
        let mut pending: Vec<EdgeId> = self
            .leaves()
            .flat_map(|t| self.triangle_edges(t))
            .collect();
        pending.reverse();

        let mut flips = 0;
        while let Some(edge) = pending.pop() {
            if !self.is_live_edge(edge) {
                continue;
            }
            let Some(twin) = self.twin(edge) else {
                continue;
            };
            if !self.is_illegal(edge, twin) {
                continue;
            }

            pending.extend(self.flip(edge, twin)?);
            flips += 1;
        }

        debug!("repair pass flipped {} edges", flips);
        Ok(flips)
    }

    /// Legality of `edge = a → b` in `(a, b, p)` against the apex `d` across `twin`
    fn is_illegal(&self, edge: EdgeId, twin: EdgeId) -> bool {
        let bp = self.next(edge);
        let pa = self.next(bp);
        let db = self.next(self.next(twin));
        let (a, b, p, d) = (
            self.origin(edge),
            self.origin(bp),
            self.origin(pa),
            self.origin(db),
        );

        if self.is_super_vertex(a) && self.is_super_vertex(b) {
            return false;
        }

        let [pos_a, pos_b, pos_p, pos_d] = [a, b, p, d].map(|v| self.position(v));
        let convex = orientation(pos_p, pos_a, pos_d) > 0.0
            && orientation(pos_p, pos_d, pos_b) > 0.0;
        if !convex {
            return false;
        }

        if [a, b, p, d].iter().all(|&v| !self.is_super_vertex(v)) {
            return in_circumcircle(pos_a, pos_b, pos_p, pos_d);
        }

        self.rank(a).min(self.rank(b)) < self.rank(p).min(self.rank(d))
    }

    /// Replace `(a, b, p)` and `(b, a, d)` with `(p, a, d)` and `(p, d, b)`
    ///
    /// Returns the four outer edges `[p → a, a → d, d → b, b → p]`.
    fn flip(&mut self, edge: EdgeId, twin: EdgeId) -> Result<[EdgeId; 4]> {
        self.triangles.reserve(2)?;
        self.edges.reserve(6)?;

        let bp = self.next(edge);
        let pa = self.next(bp);
        let ad = self.next(twin);
        let db = self.next(ad);
        let (a, b, p, d) = (
            self.origin(edge),
            self.origin(bp),
            self.origin(pa),
            self.origin(db),
        );

        let left = self.edge(edge).face;
        let right = self.edge(twin).face;

        let (n0, [n0_pa, n0_ad, n0_dp]) = self.add_triangle(p, a, d)?;
        let (n1, [n1_pd, n1_db, n1_bp]) = self.add_triangle(p, d, b)?;

        // the quadrilateral's four outer edges keep their neighbors
        self.link_twins(n0_pa, self.twin(pa));
        self.link_twins(n0_ad, self.twin(ad));
        self.link_twins(n1_db, self.twin(db));
        self.link_twins(n1_bp, self.twin(bp));
        self.link_twins(n0_dp, Some(n1_pd));

        self.subdivide(left, &[n0, n1]);
        self.subdivide(right, &[n0, n1]);
        trace!("flipped {:?}: {:?} {:?} -> {:?} {:?}", edge, left, right, n0, n1);

        Ok([n0_pa, n0_ad, n1_db, n1_bp])
    }

    fn is_live_edge(&self, edge: EdgeId) -> bool {
        self.triangle(self.edge(edge).face).is_leaf()
    }

    /// Super-triangle corners rank by slot, real points after all of them
    fn rank(&self, vertex: VertexId) -> usize {
        if self.is_super_vertex(vertex) {
            vertex.index()
        } else {
            usize::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::{Delaunay, PointCloud, TriangulationConfig};

    #[test]
    fn test_first_split_keeps_corner_edges() {
        let mut delaunay = Delaunay::new(TriangulationConfig::default());
        delaunay
            .triangulate_by_iterations(&PointCloud::new(1))
            .unwrap();
        delaunay.insert_point(DVec3::new(0.0, 0.0, 0.0)).unwrap();

        // the quadrilateral around each inner edge is reflex at the new point
        assert_eq!(delaunay.leaves().count(), 3);
        for t in delaunay.leaves() {
            for e in delaunay.triangle_edges(t) {
                if let Some(twin) = delaunay.edge(e).twin {
                    assert!(!delaunay.is_illegal(e, twin));
                }
            }
        }
    }

    #[test]
    fn test_repair_on_legal_mesh_is_a_no_op() {
        let cloud = PointCloud::random(
            60,
            DVec3::new(-10.0, 0.0, -10.0),
            DVec3::new(10.0, 0.0, 10.0),
            3,
        );
        let mut delaunay = Delaunay::new(TriangulationConfig::default());
        delaunay.triangulate(&cloud).unwrap();

        let before = delaunay.triangle_count();
        assert_eq!(delaunay.repair().unwrap(), 0);
        assert_eq!(delaunay.triangle_count(), before);
    }
}
