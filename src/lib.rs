//! Incremental planar Delaunay triangulation for terrain point clouds
//!
//! A standalone library that triangulates a cloud of 3D points on their
//! horizontal (`x`/`z`) projection, carrying the height (`y`) through to the
//! output mesh. Suitable for terrain generation in any game engine.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use terrain_delaunay::*;
//!
//! // Scatter some points
//! let cloud = PointCloud::random(
//!     500,
//!     DVec3::new(-40.0, -2.0, -40.0),
//!     DVec3::new(40.0, 2.0, 40.0),
//!     42,
//! );
//!
//! // Triangulate them
//! let config = TriangulationConfigBuilder::new()
//!     .max_points(cloud.len()).unwrap()
//!     .build().unwrap();
//! let mut delaunay = Delaunay::new(config);
//! delaunay.triangulate(&cloud).unwrap();
//!
//! // Flatten and export for rendering
//! let mesh = MeshData::from_triangulation(&delaunay);
//! export(ExportFormat::WavefrontObj, &mesh, "assets", "terrain", true).unwrap();
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! The same run can be driven one step at a time with
//! [`Delaunay::triangulate_by_iterations`] to display it in progress.
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration and point clouds

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod point_cloud;
pub mod triangulation;
pub mod mesh;

// Re-export core types for convenience
pub use error::{DelaunayError, Result};
pub use config::{DuplicatePolicy, EdgePointPolicy, TriangulationConfig, TriangulationConfigBuilder};
pub use point_cloud::{BoundingRect, PointCloud};
pub use triangulation::{Delaunay, EdgeId, Insertion, IterationState, Location, TriangleId, VertexId};
pub use mesh::{export, registered_files, ExportFormat, MeshData};

// Re-export glam::DVec3 for convenience
pub use glam::DVec3;
