//! Incremental Delaunay triangulation engine
//!
//! Points are inserted one at a time into a half-edge mesh seeded with a
//! super-triangle that contains the whole cloud:
//!
//! 1. Locate the leaf triangle containing the point by descending the
//!    triangle hierarchy from the root.
//! 2. Split it into three children (or split the two triangles sharing an
//!    edge into four when the point lies on that edge).
//! 3. Legalize the edges opposite the new point by edge flips.
//!
//! Once every point is in, a last pass flips any edge still illegal, the
//! triangles touching the super-triangle are trimmed and the surviving leaves
//! form the triangulation.

mod insert;
mod legalize;
mod locate;
mod pool;
mod root;
pub mod structures;
mod trim;

pub use insert::Insertion;
pub use locate::Location;
pub use structures::{
    EdgeId, HalfEdge, Triangle, TriangleId, TriangleState, Vertex, VertexId,
};

use glam::DVec3;
use log::{debug, info};

use crate::config::TriangulationConfig;
use crate::error::{DelaunayError, Result};
use crate::point_cloud::PointCloud;
use pool::Pool;

/// Progress of a step-by-step triangulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationState {
    /// The next step builds the root triangle
    RootPending,
    /// The next step inserts the point with this index
    Inserting(usize),
    /// The next step flips the remaining illegal edges and trims the super-triangle
    Finalizing,
    /// The triangulation is complete
    Done,
}

/// A Delaunay triangulation of a point cloud
///
/// The engine owns three capacity-limited pools (vertices, half-edges and
/// triangles). Entities are never freed during a run; [`Delaunay::clear`]
/// resets everything for the next one.
///
/// # Examples
///
/// ```
/// use terrain_delaunay::*;
/// use glam::DVec3;
///
/// let cloud = PointCloud::from_points(
///     vec![
///         DVec3::new(0.0, 0.0, 0.0),
///         DVec3::new(4.0, 0.0, 0.0),
///         DVec3::new(2.0, 0.0, 4.0),
///     ],
///     3,
/// )
/// .unwrap();
///
/// let mut delaunay = Delaunay::new(TriangulationConfig::default());
/// delaunay.triangulate(&cloud).unwrap();
/// assert_eq!(delaunay.triangulation().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Delaunay {
    /// Configuration used to size the pools and shape the root triangle
    config: TriangulationConfig,

    vertices: Pool<Vertex>,
    edges: Pool<HalfEdge>,
    triangles: Pool<Triangle>,

    /// Root of the point-location hierarchy (the super-triangle)
    root: Option<TriangleId>,

    /// Final leaf triangles, filled by the boundary trim
    triangulation: Vec<TriangleId>,

    /// Cloud indices of points skipped as duplicates
    skipped: Vec<usize>,

    /// Progress of the current run
    state: IterationState,
}

impl Delaunay {
    /// Create an empty triangulation with pools sized from `config`
    pub fn new(config: TriangulationConfig) -> Self {
        let delaunay = Self {
            config,
            vertices: Pool::new("vertex", config.vertex_capacity()),
            edges: Pool::new("half-edge", config.edge_capacity()),
            triangles: Pool::new("triangle", config.triangle_capacity()),
            root: None,
            triangulation: Vec::new(),
            skipped: Vec::new(),
            state: IterationState::RootPending,
        };
        debug!(
            "pools sized for {} points: {} vertices, {} half-edges, {} triangles",
            config.max_points,
            delaunay.vertices.capacity(),
            delaunay.edges.capacity(),
            delaunay.triangles.capacity()
        );
        delaunay
    }

    /// Reset every pool, the hierarchy and the iteration state
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.triangles.clear();
        self.root = None;
        self.triangulation.clear();
        self.skipped.clear();
        self.state = IterationState::RootPending;
    }

    /// Triangulate the whole cloud in one call
    ///
    /// Clears any previous run, builds the root triangle, inserts every point
    /// in cloud order and trims the super-triangle.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` when a pool runs out, or the insertion
    /// errors selected by the configured policies.
    pub fn triangulate(&mut self, cloud: &PointCloud) -> Result<()> {
        self.clear();
        while self.step(cloud)? != IterationState::Done {}

        info!(
            "triangulated {} points into {} triangles ({} skipped)",
            cloud.len(),
            self.triangulation.len(),
            self.skipped.len()
        );
        Ok(())
    }

    /// Advance the triangulation by one step
    ///
    /// The first call builds the root triangle, the next `cloud.len()` calls
    /// insert one point each, and the following call repairs the remaining
    /// illegal edges and trims the super-triangle. Further calls do nothing until [`Delaunay::clear`].
    /// Driving this to [`IterationState::Done`] yields exactly the result of
    /// [`Delaunay::triangulate`].
    ///
    /// Returns the state the next call will act on.
    pub fn triangulate_by_iterations(&mut self, cloud: &PointCloud) -> Result<IterationState> {
        self.step(cloud)
    }

    fn step(&mut self, cloud: &PointCloud) -> Result<IterationState> {
        match self.state {
            IterationState::RootPending => {
                self.clear();
                self.build_root(cloud)?;
                self.state = Self::after_insert(0, cloud);
            }
            IterationState::Inserting(index) => {
                if let Some(&point) = cloud.points().get(index) {
                    if let Insertion::Skipped { .. } = self.insert_point(point)? {
                        self.skipped.push(index);
                    }
                }
                self.state = Self::after_insert(index + 1, cloud);
            }
            IterationState::Finalizing => {
                self.repair()?;
                self.trim();
                self.state = IterationState::Done;
            }
            IterationState::Done => {}
        }

        Ok(self.state)
    }

    fn after_insert(next: usize, cloud: &PointCloud) -> IterationState {
        if next < cloud.len() {
            IterationState::Inserting(next)
        } else {
            IterationState::Finalizing
        }
    }

    /// Configuration of this triangulation
    #[inline]
    pub fn config(&self) -> &TriangulationConfig {
        &self.config
    }

    /// Progress of the current run
    #[inline]
    pub fn state(&self) -> IterationState {
        self.state
    }

    /// Root (super) triangle, once built
    #[inline]
    pub fn root(&self) -> Option<TriangleId> {
        self.root
    }

    /// Final triangles in trim order
    ///
    /// Empty until the run reaches [`IterationState::Done`].
    #[inline]
    pub fn triangulation(&self) -> &[TriangleId] {
        &self.triangulation
    }

    /// Cloud indices of points skipped as duplicates
    #[inline]
    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    /// Current faces of the triangulation, including those touching the super-triangle
    ///
    /// Useful for displaying a run in progress.
    pub fn leaves(&self) -> impl Iterator<Item = TriangleId> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, triangle)| triangle.is_leaf())
            .map(|(index, _)| TriangleId::new(index))
    }

    /// Get a vertex by id
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by id
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &HalfEdge {
        &self.edges[id.index()]
    }

    /// Get a triangle by id
    #[inline]
    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.index()]
    }

    /// The three half-edges of a triangle, starting at its stored edge
    pub fn triangle_edges(&self, id: TriangleId) -> [EdgeId; 3] {
        let e0 = self.triangle(id).edge;
        let e1 = self.edge(e0).next;
        let e2 = self.edge(e1).next;
        [e0, e1, e2]
    }

    /// The three vertices of a triangle in boundary order
    pub fn triangle_vertices(&self, id: TriangleId) -> [VertexId; 3] {
        self.triangle_edges(id).map(|e| self.edge(e).origin)
    }

    /// The three vertex positions of a triangle in boundary order
    pub fn triangle_positions(&self, id: TriangleId) -> [DVec3; 3] {
        self.triangle_vertices(id).map(|v| self.vertex(v).position)
    }

    /// Check if a vertex is one of the super-triangle corners
    #[inline]
    pub fn is_super_vertex(&self, id: VertexId) -> bool {
        // the root triangle always claims the first three vertex slots
        self.root.is_some() && id.index() < 3
    }

    /// Number of allocated vertices, super-triangle corners included
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of allocated half-edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of allocated triangles, hierarchy nodes included
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check the half-edge invariants of every live triangle
    ///
    /// - `next` cycles have length exactly 3 and stay on one face
    /// - a twin links back (`e.twin.twin == e`) with reversed endpoints
    ///   (`e.twin.origin == e.next.origin`) and belongs to a live triangle
    ///
    /// # Errors
    ///
    /// Returns `CorruptTopology` describing the first violation found
    pub fn validate(&self) -> Result<()> {
        for t in self.leaves() {
            let edges = self.triangle_edges(t);
            if self.edge(edges[2]).next != edges[0] {
                return Err(corrupt(format!("{:?} boundary is not a 3-cycle", t)));
            }

            for e in edges {
                let edge = self.edge(e);
                if edge.face != t {
                    return Err(corrupt(format!("{:?} is owned by {:?}, not {:?}", e, edge.face, t)));
                }

                let Some(twin) = edge.twin else { continue };
                let twin_edge = self.edge(twin);
                if twin_edge.twin != Some(e) {
                    return Err(corrupt(format!("{:?} and {:?} are not mutual twins", e, twin)));
                }
                if twin_edge.origin != self.edge(edge.next).origin
                    || self.edge(twin_edge.next).origin != edge.origin
                {
                    return Err(corrupt(format!("{:?} and {:?} do not share reversed endpoints", e, twin)));
                }
                if !self.triangle(twin_edge.face).is_leaf() {
                    return Err(corrupt(format!("{:?} is twinned with a dead triangle", e)));
                }
            }
        }

        Ok(())
    }

    // ---- construction helpers shared by root/insert/legalize ----

    fn add_vertex(&mut self, position: DVec3) -> Result<VertexId> {
        self.vertices.alloc(Vertex::new(position)).map(VertexId::new)
    }

    /// Allocate a live triangle `a → b → c` with three fresh boundary half-edges
    ///
    /// Returns the triangle and its edges `[a→b, b→c, c→a]`.
    fn add_triangle(
        &mut self,
        a: VertexId,
        b: VertexId,
        c: VertexId,
    ) -> Result<(TriangleId, [EdgeId; 3])> {
        self.edges.reserve(3)?;
        self.triangles.reserve(1)?;

        let face = TriangleId::new(self.triangles.next_index());
        let first = self.edges.next_index();
        let ids = [
            EdgeId::new(first),
            EdgeId::new(first + 1),
            EdgeId::new(first + 2),
        ];

        for (i, origin) in [a, b, c].into_iter().enumerate() {
            self.edges.alloc(HalfEdge {
                origin,
                next: ids[(i + 1) % 3],
                twin: None,
                face,
            })?;
            self.vertices[origin.index()].edge = Some(ids[i]);
        }
        self.triangles.alloc(Triangle::new(ids[0]))?;

        Ok((face, ids))
    }

    /// Make `edge` and `twin` mutual twins; `None` turns `edge` into a boundary edge
    fn link_twins(&mut self, edge: EdgeId, twin: Option<EdgeId>) {
        self.edges[edge.index()].twin = twin;
        if let Some(twin) = twin {
            self.edges[twin.index()].twin = Some(edge);
        }
    }

    /// Register `children` as the subdivision of `parent`
    fn subdivide(&mut self, parent: TriangleId, children: &[TriangleId]) {
        let node = &mut self.triangles[parent.index()];
        node.state = TriangleState::Subdivided;
        node.children.extend_from_slice(children);

        for &child in children {
            self.triangles[child.index()].parents.push(parent);
        }
    }

    fn origin(&self, edge: EdgeId) -> VertexId {
        self.edge(edge).origin
    }

    fn next(&self, edge: EdgeId) -> EdgeId {
        self.edge(edge).next
    }

    fn twin(&self, edge: EdgeId) -> Option<EdgeId> {
        self.edge(edge).twin
    }

    fn position(&self, vertex: VertexId) -> DVec3 {
        self.vertex(vertex).position
    }
}

fn corrupt(message: String) -> DelaunayError {
    DelaunayError::CorruptTopology(message)
}

#[cfg(test)]
mod tests;
