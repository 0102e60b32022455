//! Error types for Delaunay triangulation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, querying, or exporting a triangulation
#[derive(Error, Debug)]
pub enum DelaunayError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// One of the capacity-limited entity pools is full
    #[error("{pool} pool exhausted (capacity {capacity})")]
    CapacityExceeded {
        /// Name of the exhausted pool
        pool: &'static str,
        /// Capacity the pool was created with
        capacity: usize,
    },

    /// The triangulation has no root triangle, or was already finalized
    #[error("triangulation is not initialized for insertion")]
    NotInitialized,

    /// Point location walked off the root triangle
    #[error("point ({x}, {z}) lies outside the triangulation")]
    PointOutsideTriangulation {
        /// X coordinate of the point
        x: f64,
        /// Z coordinate of the point
        z: f64,
    },

    /// A point coincides with a vertex already in the triangulation
    #[error("point ({x}, {z}) duplicates an existing vertex")]
    DuplicatePoint {
        /// X coordinate of the point
        x: f64,
        /// Z coordinate of the point
        z: f64,
    },

    /// A point lies exactly on an existing edge and edge splits are disabled
    #[error("point ({x}, {z}) lies on an existing edge")]
    PointOnEdge {
        /// X coordinate of the point
        x: f64,
        /// Z coordinate of the point
        z: f64,
    },

    /// Half-edge adjacency violates a mesh invariant
    #[error("corrupt topology: {0}")]
    CorruptTopology(String),

    /// The point cloud is full
    #[error("point cloud holds at most {max} points")]
    TooManyPoints {
        /// Maximum number of points
        max: usize,
    },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A mesh file could not be parsed
    #[error("failed to parse {} at line {line}: {message}", .path.display())]
    Parse {
        /// The file path
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
}

/// Result type alias for triangulation operations
pub type Result<T> = std::result::Result<T, DelaunayError>;
