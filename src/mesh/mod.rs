//! Mesh data for a finished triangulation
//!
//! Flattens the half-edge triangulation into engine-agnostic vertex and index
//! buffers, and reads/writes them as Wavefront OBJ text.

pub mod obj;

pub use obj::{export, registered_files, ExportFormat, MANIFEST_FILE};

use std::collections::HashMap;

use glam::DVec3;

use crate::geometry::triangle_area;
use crate::triangulation::{Delaunay, VertexId};

/// Engine-agnostic triangle mesh
///
/// Vertices are unique; triangles reference them through `indices`, three
/// per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f64; 3]>,
    /// Triangle indices into `positions`
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Flatten the final triangles of a triangulation
    ///
    /// Vertices are deduplicated by identity and numbered from 0 in order of
    /// first use, walking the triangles in triangulation order. Each triangle
    /// keeps its boundary order.
    pub fn from_triangulation(delaunay: &Delaunay) -> Self {
        let mut mesh = MeshData::default();
        let mut export_index: HashMap<VertexId, u32> = HashMap::new();

        for &triangle in delaunay.triangulation() {
            for vertex in delaunay.triangle_vertices(triangle) {
                let index = *export_index.entry(vertex).or_insert_with(|| {
                    let p = delaunay.vertex(vertex).position;
                    mesh.positions.push([p.x, p.y, p.z]);
                    (mesh.positions.len() - 1) as u32
                });
                mesh.indices.push(index);
            }
        }

        mesh
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Corner positions of every triangle
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [tri[0], tri[1], tri[2]].map(|i| DVec3::from_array(self.positions[i as usize]))
        })
    }

    /// Total area of the triangles projected on the `x`/`z` plane
    pub fn area(&self) -> f64 {
        self.triangles().map(|[a, b, c]| triangle_area(a, b, c)).sum()
    }
}
