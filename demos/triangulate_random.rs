//! Complete workflow demonstration for terrain_delaunay
//!
//! Usage: `cargo run --example triangulate_random [output-dir] [point-count]`
//!
//! Set `RUST_LOG=debug` to follow the insertion steps.

use std::time::Instant;

use terrain_delaunay::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let out_dir = args
        .next()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    let count: usize = args.next().and_then(|n| n.parse().ok()).unwrap_or(1000);

    println!("=== terrain_delaunay Demo ===\n");

    // Step 1: Scatter points
    println!("Step 1: Scattering {} points...", count);
    let cloud = PointCloud::random(
        count,
        DVec3::new(-40.0, -2.0, -40.0),
        DVec3::new(40.0, 2.0, 40.0),
        12345,
    );
    if let Some(rect) = cloud.bounding_rect(0.0) {
        println!("  Bounds: {:.1} x {:.1}", rect.width(), rect.depth());
    }
    println!("  Hull area: {:.2}", cloud.convex_hull_area());

    // Step 2: Triangulate in one call
    println!("\nStep 2: Triangulating...");
    let config = TriangulationConfigBuilder::new()
        .max_points(count.max(1))?
        .build()?;
    let mut delaunay = Delaunay::new(config);

    let start = Instant::now();
    delaunay.triangulate(&cloud)?;
    println!("  Took {:?}", start.elapsed());
    println!("  Triangles: {}", delaunay.triangulation().len());
    println!("  Hierarchy nodes: {}", delaunay.triangle_count());
    println!("  Half-edges: {}", delaunay.edge_count());
    println!("  Skipped duplicates: {}", delaunay.skipped().len());
    delaunay.validate()?;

    // Step 3: Replay step by step
    println!("\nStep 3: Replaying step by step...");
    delaunay.clear();
    let mut steps = 0;
    loop {
        let state = delaunay.triangulate_by_iterations(&cloud)?;
        steps += 1;
        if steps % 250 == 0 {
            println!("  step {}: {} live faces", steps, delaunay.leaves().count());
        }
        if state == IterationState::Done {
            break;
        }
    }
    println!("  {} steps, {} triangles", steps, delaunay.triangulation().len());

    // Step 4: Export
    println!("\nStep 4: Exporting...");
    let mesh = MeshData::from_triangulation(&delaunay);
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Area: {:.2}", mesh.area());

    let path = export(ExportFormat::WavefrontObj, &mesh, &out_dir, "terrain_random", true)?;
    println!("  Wrote {}", path.display());
    println!("  Registered files: {}", registered_files(&out_dir)?.len());

    println!("\n=== Demo Complete ===");
    Ok(())
}
