//! Wavefront OBJ export and import
//!
//! The files written here use a minimal dialect: a header comment, one
//! `v x y z` line per vertex, then one `f i j k` line per triangle with
//! **0-based** vertex indices. [`MeshData::load_obj`] reads the same dialect.
//! Exported files can be recorded in a plain-text manifest for later discovery.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use log::info;

use super::MeshData;
use crate::error::{DelaunayError, Result};

/// Name of the manifest listing exported files, one path per line
pub const MANIFEST_FILE: &str = "triangulations.txt";

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Wavefront OBJ text
    WavefrontObj,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::WavefrontObj => "obj",
        }
    }
}

/// Write `mesh` to `<dir>/<name>.<ext>` and optionally record it in the manifest
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns `Io` if the file or the manifest cannot be written. The mesh is
/// never modified.
///
/// # Example
///
/// ```no_run
/// use terrain_delaunay::*;
///
/// # let delaunay = Delaunay::new(TriangulationConfig::default());
/// let mesh = MeshData::from_triangulation(&delaunay);
/// let path = export(ExportFormat::WavefrontObj, &mesh, "assets/triangulations", "terrain_0", true).unwrap();
/// println!("wrote {}", path.display());
/// ```
pub fn export<P: AsRef<Path>>(
    format: ExportFormat,
    mesh: &MeshData,
    dir: P,
    name: &str,
    register: bool,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let path = dir.join(format!("{}.{}", name, format.extension()));

    match format {
        ExportFormat::WavefrontObj => mesh.save_obj(&path)?,
    }

    if register {
        let mut manifest = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(MANIFEST_FILE))?;
        writeln!(manifest, "{}", path.display())?;
    }

    info!(
        "exported {} triangles to {}",
        mesh.triangle_count(),
        path.display()
    );
    Ok(path)
}

/// Paths recorded in the manifest of `dir`, in registration order
///
/// A missing manifest yields an empty list.
pub fn registered_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let manifest = dir.as_ref().join(MANIFEST_FILE);
    let file = match File::open(&manifest) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut paths = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            paths.push(PathBuf::from(line));
        }
    }
    Ok(paths)
}

impl MeshData {
    /// Write the mesh as OBJ text
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be created or written
    pub fn save_obj<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);

        writeln!(out, "# Delaunay triangulation")?;
        writeln!(out)?;
        writeln!(out, "# vertices (x, y, z)")?;
        writeln!(out)?;
        for [x, y, z] in &self.positions {
            writeln!(out, "v {} {} {}", x, y, z)?;
        }

        writeln!(out)?;
        writeln!(out, "# faces")?;
        writeln!(out)?;
        for tri in self.indices.chunks_exact(3) {
            writeln!(out, "f {} {} {}", tri[0], tri[1], tri[2])?;
        }

        out.flush()?;
        Ok(())
    }

    /// Read a mesh written by [`MeshData::save_obj`]
    ///
    /// Only `v` and `f` lines are interpreted; comments and other records are
    /// ignored. Face indices are 0-based.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Parse` for malformed
    /// records or face indices referring to vertices not defined yet.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut mesh = MeshData::default();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let fail = |message: String| DelaunayError::Parse {
                path: path.to_path_buf(),
                line: number + 1,
                message,
            };

            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("v") => {
                    let coords = parse_fields::<f64, 3>(&mut parts).map_err(&fail)?;
                    mesh.positions.push(coords);
                }
                Some("f") => {
                    let tri = parse_fields::<u32, 3>(&mut parts).map_err(&fail)?;
                    if let Some(&bad) = tri.iter().find(|&&i| i as usize >= mesh.positions.len()) {
                        return Err(fail(format!("face references undefined vertex {}", bad)));
                    }
                    mesh.indices.extend_from_slice(&tri);
                }
                _ => {}
            }
        }

        Ok(mesh)
    }
}

/// Parse exactly `N` whitespace-separated values
fn parse_fields<T, const N: usize>(
    parts: &mut SplitWhitespace<'_>,
) -> std::result::Result<[T; N], String>
where
    T: std::str::FromStr + Copy + Default,
{
    let mut values = [T::default(); N];
    for (i, value) in values.iter_mut().enumerate() {
        let field = parts
            .next()
            .ok_or_else(|| format!("expected {} values, found {}", N, i))?;
        *value = field
            .parse()
            .map_err(|_| format!("invalid value {:?}", field))?;
    }
    if parts.next().is_some() {
        return Err(format!("expected {} values, found more", N));
    }
    Ok(values)
}
