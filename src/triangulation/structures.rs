//! Half-edge mesh entities
//!
//! Vertices, half-edges and triangles live in capacity-limited pools and refer
//! to each other through typed indices, never through owning references.

use std::fmt;

use glam::DVec3;

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create an index from a raw pool slot
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            /// Raw pool slot
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }
    };
}

/// Index of a vertex in the vertex pool
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VertexId(usize);

/// Index of a half-edge in the edge pool
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeId(usize);

/// Index of a triangle in the triangle pool
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TriangleId(usize);

impl_index_type!(VertexId, "V");
impl_index_type!(EdgeId, "E");
impl_index_type!(TriangleId, "T");

/// A point of the triangulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position; `x`/`z` are triangulated, `y` is carried along
    pub position: DVec3,

    /// One half-edge whose origin is this vertex
    ///
    /// Traversal convenience only; kept pointing at an edge of a live
    /// triangle while the vertex is part of one.
    pub edge: Option<EdgeId>,
}

impl Vertex {
    /// Create a vertex with no incident edge yet
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            edge: None,
        }
    }
}

/// A directed edge owned by exactly one triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// Vertex this half-edge starts at
    pub origin: VertexId,

    /// Following half-edge around the same triangle
    pub next: EdgeId,

    /// Oppositely directed half-edge of the neighboring triangle
    ///
    /// `None` marks a boundary edge.
    pub twin: Option<EdgeId>,

    /// Triangle owning this half-edge
    pub face: TriangleId,
}

impl HalfEdge {
    /// Check if this half-edge lies on the boundary
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.twin.is_none()
    }
}

/// Role of a triangle in the point-location hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleState {
    /// Leaf: a face of the current triangulation
    Live,
    /// Internal node: its region has been split or flipped into children
    Subdivided,
    /// Removed by the boundary trim because it touches the super-triangle
    Pruned,
}

/// A triangular face and a node of the point-location hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// One of the three boundary half-edges; the others follow via `next`
    pub edge: EdgeId,

    /// Triangles this one was carved out of
    ///
    /// One parent after a split, two after an edge flip, none for the root.
    pub parents: Vec<TriangleId>,

    /// Triangles covering this one's region once it has been subdivided
    pub children: Vec<TriangleId>,

    /// Current role in the hierarchy
    pub state: TriangleState,
}

impl Triangle {
    /// Create a live triangle with no hierarchy links
    pub fn new(edge: EdgeId) -> Self {
        Self {
            edge,
            parents: Vec::new(),
            children: Vec::new(),
            state: TriangleState::Live,
        }
    }

    /// Check if this triangle is a face of the current triangulation
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.state == TriangleState::Live
    }
}
