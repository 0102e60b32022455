//! Boundary trim: removal of triangles touching the super-triangle

use log::debug;

use super::{Delaunay, TriangleId, TriangleState, VertexId};

impl Delaunay {
    /// Split the live leaves into the final triangulation and pruned triangles
    ///
    /// A leaf incident to a super-triangle corner is pruned: its twins are
    /// severed so the kept neighbor becomes a boundary edge, and it is detached
    /// from its parents' child lists. Every other leaf is kept, in pool order.
    pub(super) fn trim(&mut self) {
        self.triangulation.clear();

        for index in 0..self.triangles.len() {
            let id = TriangleId::new(index);
            if !self.triangle(id).is_leaf() {
                continue;
            }

            let touches_root = self
                .triangle_vertices(id)
                .iter()
                .any(|&v| self.is_super_vertex(v));
            if touches_root {
                self.prune(id);
            } else {
                self.triangulation.push(id);
            }
        }

        // vertex back-references must point into kept triangles
        for index in 0..self.vertices.len() {
            self.vertices[index].edge = None;
        }
        for position in 0..self.triangulation.len() {
            for edge in self.triangle_edges(self.triangulation[position]) {
                let origin = self.origin(edge);
                self.vertices[origin.index()].edge = Some(edge);
            }
        }

        debug!(
            "trimmed super-triangle: kept {} triangles",
            self.triangulation.len()
        );
    }

    fn prune(&mut self, id: TriangleId) {
        for edge in self.triangle_edges(id) {
            if let Some(twin) = self.twin(edge) {
                self.edges[twin.index()].twin = None;
            }
            self.edges[edge.index()].twin = None;
        }

        let parents = self.triangle(id).parents.clone();
        for parent in parents {
            self.triangles[parent.index()]
                .children
                .retain(|&child| child != id);
        }
        self.triangles[id.index()].state = TriangleState::Pruned;
    }

    /// Vertices of the final triangulation that came from the point cloud
    ///
    /// Before the trim this yields every inserted vertex.
    pub fn output_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len())
            .map(VertexId::new)
            .filter(|&v| !self.is_super_vertex(v) && self.vertex(v).edge.is_some())
    }
}
