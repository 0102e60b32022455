use super::*;
use crate::config::{DuplicatePolicy, EdgePointPolicy, TriangulationConfigBuilder};
use crate::geometry::{circumcircle, orientation, planar_distance_squared, triangle_area};
use std::collections::BTreeSet;

fn p(x: f64, z: f64) -> DVec3 {
    DVec3::new(x, 0.0, z)
}

fn cloud(points: Vec<DVec3>) -> PointCloud {
    let len = points.len();
    PointCloud::from_points(points, len.max(1)).unwrap()
}

fn triangulated(points: Vec<DVec3>) -> Delaunay {
    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    delaunay.triangulate(&cloud(points)).unwrap();
    delaunay
}

fn random_cloud(count: usize, seed: u64) -> PointCloud {
    PointCloud::random(
        count,
        DVec3::new(-40.0, -2.0, -40.0),
        DVec3::new(40.0, 2.0, 40.0),
        seed,
    )
}

/// Square corners plus random points kept away from its sides
fn framed_cloud(count: usize, seed: u64) -> PointCloud {
    let corners = [p(0.0, 0.0), p(80.0, 0.0), p(80.0, 80.0), p(0.0, 80.0)];
    let interior = PointCloud::random(
        count,
        DVec3::new(8.0, -2.0, 8.0),
        DVec3::new(72.0, 2.0, 72.0),
        seed,
    );
    cloud(corners.into_iter().chain(interior.points().iter().copied()).collect())
}

/// Final triangles as sorted vertex id triples
fn triangle_set(delaunay: &Delaunay) -> BTreeSet<[usize; 3]> {
    delaunay
        .triangulation()
        .iter()
        .map(|&t| {
            let mut ids = delaunay.triangle_vertices(t).map(|v| v.index());
            ids.sort();
            ids
        })
        .collect()
}

fn total_area(delaunay: &Delaunay) -> f64 {
    delaunay
        .triangulation()
        .iter()
        .map(|&t| {
            let [a, b, c] = delaunay.triangle_positions(t);
            triangle_area(a, b, c)
        })
        .sum()
}

fn assert_empty_circumcircles(delaunay: &Delaunay) {
    let vertices: Vec<DVec3> = delaunay
        .output_vertices()
        .map(|v| delaunay.vertex(v).position)
        .collect();

    for &t in delaunay.triangulation() {
        let [a, b, c] = delaunay.triangle_positions(t);
        let circle = circumcircle(a, b, c).unwrap();
        let tolerance = 1e-9 * circle.radius_squared.max(1.0);

        for &v in &vertices {
            let d = planar_distance_squared(v, circle.center);
            assert!(
                d >= circle.radius_squared - tolerance,
                "{:?} has ({}, {}) inside its circumcircle",
                t,
                v.x,
                v.z
            );
        }
    }
}

#[test]
fn test_single_triangle() {
    let delaunay = triangulated(vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0)]);

    assert_eq!(delaunay.state(), IterationState::Done);
    assert_eq!(delaunay.triangulation().len(), 1);

    let t = delaunay.triangulation()[0];
    let corners: BTreeSet<[u64; 2]> = delaunay
        .triangle_positions(t)
        .iter()
        .map(|v| [v.x.to_bits(), v.z.to_bits()])
        .collect();
    let expected: BTreeSet<[u64; 2]> = [p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0)]
        .iter()
        .map(|v| [v.x.to_bits(), v.z.to_bits()])
        .collect();
    assert_eq!(corners, expected);

    // the kept triangle lost all its neighbors to the trim
    for e in delaunay.triangle_edges(t) {
        assert!(delaunay.edge(e).is_boundary());
    }
    delaunay.validate().unwrap();
}

#[test]
fn test_square_two_triangles() {
    let delaunay = triangulated(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]);

    assert_eq!(delaunay.triangulation().len(), 2);
    assert!((total_area(&delaunay) - 16.0).abs() < 1e-9);

    // exactly one interior edge, shared as twins
    let interior: Vec<EdgeId> = delaunay
        .triangulation()
        .iter()
        .flat_map(|&t| delaunay.triangle_edges(t))
        .filter(|&e| !delaunay.edge(e).is_boundary())
        .collect();
    assert_eq!(interior.len(), 2);
    assert_eq!(delaunay.edge(interior[0]).twin, Some(interior[1]));
    delaunay.validate().unwrap();
}

#[test]
fn test_triangles_keep_root_winding() {
    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    delaunay.triangulate(&random_cloud(150, 3)).unwrap();

    for &t in delaunay.triangulation() {
        let [a, b, c] = delaunay.triangle_positions(t);
        assert!(orientation(a, b, c) > 0.0, "{:?} has flipped winding", t);
    }
}

#[test]
fn test_point_on_shared_edge_splits_four_ways() {
    let mut points = vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0), p(2.0, -4.0)];
    let before = triangulated(points.clone());
    assert_eq!(before.triangulation().len(), 2);

    points.push(p(2.0, 0.0));
    let delaunay = triangulated(points);

    assert_eq!(delaunay.triangulation().len(), 4);
    assert!((total_area(&delaunay) - 16.0).abs() < 1e-9);

    // the new vertex is a corner of every final triangle
    let center = VertexId::new(3 + 4);
    for &t in delaunay.triangulation() {
        assert!(delaunay.triangle_vertices(t).contains(&center));
    }
    delaunay.validate().unwrap();
    assert_empty_circumcircles(&delaunay);
}

#[test]
fn test_point_on_boundary_edge_splits_two_ways() {
    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    delaunay
        .triangulate_by_iterations(&PointCloud::new(1))
        .unwrap();

    // midpoint of the root's top side
    let [_, a, b] = delaunay.triangle_positions(delaunay.root().unwrap());
    let midpoint = 0.5 * (a + b);
    assert!(matches!(
        delaunay.locate(midpoint).unwrap(),
        Location::OnEdge(..)
    ));

    let inserted = match delaunay.insert_point(midpoint).unwrap() {
        Insertion::Inserted(v) => v,
        other => panic!("expected an insertion, got {:?}", other),
    };
    assert_eq!(delaunay.leaves().count(), 2);

    let mut boundary = 0;
    for t in delaunay.leaves() {
        assert!(delaunay.triangle_vertices(t).contains(&inserted));
        boundary += delaunay
            .triangle_edges(t)
            .iter()
            .filter(|&&e| delaunay.edge(e).is_boundary())
            .count();
    }
    assert_eq!(boundary, 4);
    delaunay.validate().unwrap();
}

#[test]
fn test_point_on_edge_rejected() {
    let config = TriangulationConfigBuilder::new()
        .edge_point_policy(EdgePointPolicy::Reject)
        .build()
        .unwrap();
    let mut delaunay = Delaunay::new(config);

    let result = delaunay.triangulate(&cloud(vec![
        p(0.0, 0.0),
        p(4.0, 0.0),
        p(2.0, 4.0),
        p(2.0, -4.0),
        p(2.0, 0.0),
    ]));
    assert!(matches!(
        result,
        Err(DelaunayError::PointOnEdge { x, z }) if x == 2.0 && z == 0.0
    ));
}

#[test]
fn test_duplicate_skipped() {
    let delaunay = triangulated(vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0), p(4.0, 0.0)]);

    assert_eq!(delaunay.skipped(), &[3]);
    assert_eq!(delaunay.triangulation().len(), 1);
    assert_eq!(delaunay.output_vertices().count(), 3);
}

#[test]
fn test_duplicate_ignores_height() {
    let delaunay = triangulated(vec![
        p(0.0, 0.0),
        p(4.0, 0.0),
        p(2.0, 4.0),
        DVec3::new(2.0, 9.0, 4.0),
    ]);
    assert_eq!(delaunay.skipped(), &[3]);
}

#[test]
fn test_duplicate_rejected() {
    let config = TriangulationConfigBuilder::new()
        .duplicate_policy(DuplicatePolicy::Reject)
        .build()
        .unwrap();
    let mut delaunay = Delaunay::new(config);

    let result = delaunay.triangulate(&cloud(vec![p(0.0, 0.0), p(4.0, 0.0), p(0.0, 0.0)]));
    assert!(matches!(result, Err(DelaunayError::DuplicatePoint { .. })));
}

#[test]
fn test_no_super_vertices_in_output() {
    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    delaunay.triangulate(&random_cloud(200, 5)).unwrap();

    assert!(!delaunay.triangulation().is_empty());
    for &t in delaunay.triangulation() {
        for v in delaunay.triangle_vertices(t) {
            assert!(!delaunay.is_super_vertex(v));
        }
    }
    assert!(delaunay.output_vertices().all(|v| v.index() >= 3));
}

#[test]
fn test_topology_is_consistent() {
    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    delaunay.triangulate(&random_cloud(300, 8)).unwrap();
    delaunay.validate().unwrap();

    let kept: BTreeSet<TriangleId> = delaunay.triangulation().iter().copied().collect();
    for &t in delaunay.triangulation() {
        for e in delaunay.triangle_edges(t) {
            if let Some(twin) = delaunay.edge(e).twin {
                assert!(kept.contains(&delaunay.edge(twin).face));
            }
        }
    }

    // vertex back-references land on kept triangles leaving that vertex
    for v in delaunay.output_vertices() {
        let e = delaunay.vertex(v).edge.unwrap();
        assert_eq!(delaunay.edge(e).origin, v);
        assert!(kept.contains(&delaunay.edge(e).face));
    }
}

#[test]
fn test_delaunay_property() {
    for seed in [1, 2, 3, 4] {
        let mut delaunay = Delaunay::new(TriangulationConfig::default());
        delaunay.triangulate(&random_cloud(250, seed)).unwrap();
        assert_empty_circumcircles(&delaunay);
    }
}

#[test]
fn test_covers_convex_hull() {
    for seed in [10, 11, 12] {
        let cloud = framed_cloud(120, seed);
        let mut delaunay = Delaunay::new(TriangulationConfig::default());
        delaunay.triangulate(&cloud).unwrap();

        let hull = cloud.convex_hull_area();
        assert!((hull - 6400.0).abs() < 1e-6);
        assert!(
            (total_area(&delaunay) - hull).abs() < 1e-6 * hull,
            "area {} != hull {}",
            total_area(&delaunay),
            hull
        );
        assert_eq!(delaunay.output_vertices().count(), cloud.len());
        assert_empty_circumcircles(&delaunay);
    }
}

#[test]
fn test_random_clouds_cover_convex_hull() {
    for seed in 1..=8 {
        let cloud = random_cloud(250, seed);
        let mut delaunay = Delaunay::new(TriangulationConfig::default());
        delaunay.triangulate(&cloud).unwrap();

        let hull = cloud.convex_hull_area();
        assert!(
            (total_area(&delaunay) - hull).abs() < 1e-6 * hull,
            "seed {}: area {} != hull {}",
            seed,
            total_area(&delaunay),
            hull
        );
        assert_eq!(delaunay.output_vertices().count(), cloud.len());
        delaunay.validate().unwrap();
    }
}

#[test]
fn test_thin_triangle_is_kept() {
    let delaunay = triangulated(vec![p(0.0, 0.0), p(100.0, 0.0), p(50.0, 0.01)]);
    assert_eq!(delaunay.triangulation().len(), 1);
    assert!((total_area(&delaunay) - 0.5).abs() < 1e-9);

    let delaunay = triangulated(vec![p(0.0, 0.0), p(100.0, 0.0), p(50.0, 0.01), p(50.0, 30.0)]);
    assert_eq!(delaunay.triangulation().len(), 3);
    assert!((total_area(&delaunay) - 1500.0).abs() < 1e-6);
    assert_empty_circumcircles(&delaunay);
}

#[test]
fn test_nearly_collinear_hull() {
    // a long shallow arc: every point is on the hull
    let points: Vec<DVec3> = (0..40)
        .map(|i| {
            let x = i as f64 * 2.5;
            p(x, 1.0e-3 * x * (100.0 - x))
        })
        .collect();
    let cloud = cloud(points);

    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    delaunay.triangulate(&cloud).unwrap();

    let hull = cloud.convex_hull_area();
    assert_eq!(delaunay.triangulation().len(), cloud.len() - 2);
    assert!((total_area(&delaunay) - hull).abs() < 1e-6 * hull);
    delaunay.validate().unwrap();
}

#[test]
fn test_row_major_grid() {
    let points: Vec<DVec3> = (0..30)
        .flat_map(|row| (0..30).map(move |col| p(col as f64, row as f64)))
        .collect();
    let delaunay = triangulated(points);

    assert_eq!(delaunay.triangulation().len(), 1682);
    assert!((total_area(&delaunay) - 841.0).abs() < 1e-9);
    delaunay.validate().unwrap();
}

#[test]
fn test_sorted_input_on_small_stack() {
    let mut points = random_cloud(3000, 17).points().to_vec();
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    let cloud = cloud(points);

    let (area, hull) = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(move || {
            let config = TriangulationConfigBuilder::new()
                .max_points(cloud.len())
                .unwrap()
                .build()
                .unwrap();
            let mut delaunay = Delaunay::new(config);
            delaunay.triangulate(&cloud).unwrap();
            (total_area(&delaunay), cloud.convex_hull_area())
        })
        .unwrap()
        .join()
        .unwrap();

    assert!((area - hull).abs() < 1e-6 * hull, "area {} != hull {}", area, hull);
}

#[test]
fn test_rerun_is_identical() {
    let cloud = random_cloud(100, 21);
    let mut delaunay = Delaunay::new(TriangulationConfig::default());

    delaunay.triangulate(&cloud).unwrap();
    let first = triangle_set(&delaunay);
    let first_ids = delaunay.triangulation().to_vec();

    delaunay.triangulate(&cloud).unwrap();
    assert_eq!(triangle_set(&delaunay), first);
    assert_eq!(delaunay.triangulation(), first_ids.as_slice());
}

#[test]
fn test_clear() {
    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    delaunay.triangulate(&random_cloud(30, 2)).unwrap();
    delaunay.clear();

    assert_eq!(delaunay.state(), IterationState::RootPending);
    assert_eq!(delaunay.root(), None);
    assert!(delaunay.triangulation().is_empty());
    assert_eq!(delaunay.vertex_count(), 0);
    assert_eq!(delaunay.edge_count(), 0);
    assert_eq!(delaunay.triangle_count(), 0);
}

#[test]
fn test_iterations_match_synchronous() {
    let cloud = random_cloud(60, 13);

    let mut sync = Delaunay::new(TriangulationConfig::default());
    sync.triangulate(&cloud).unwrap();

    let mut stepped = Delaunay::new(TriangulationConfig::default());
    let mut states = Vec::new();
    loop {
        let state = stepped.triangulate_by_iterations(&cloud).unwrap();
        states.push(state);
        if state == IterationState::Done {
            break;
        }
    }

    assert_eq!(states.len(), cloud.len() + 2);
    assert_eq!(states[0], IterationState::Inserting(0));
    assert_eq!(states[cloud.len() - 1], IterationState::Inserting(cloud.len() - 1));
    assert_eq!(states[cloud.len()], IterationState::Finalizing);

    assert_eq!(stepped.triangulation(), sync.triangulation());
    assert_eq!(triangle_set(&stepped), triangle_set(&sync));

    // further steps are no-ops
    assert_eq!(
        stepped.triangulate_by_iterations(&cloud).unwrap(),
        IterationState::Done
    );
    assert_eq!(stepped.triangulation(), sync.triangulation());
}

#[test]
fn test_leaves_during_iteration() {
    let cloud = random_cloud(20, 4);
    let mut delaunay = Delaunay::new(TriangulationConfig::default());

    delaunay.triangulate_by_iterations(&cloud).unwrap();
    assert_eq!(delaunay.leaves().count(), 1);
    assert_eq!(delaunay.leaves().next(), delaunay.root());

    for inserted in 1..=cloud.len() {
        delaunay.triangulate_by_iterations(&cloud).unwrap();
        // every insertion adds two faces, flips keep the count
        assert_eq!(delaunay.leaves().count(), 1 + 2 * inserted);
        delaunay.validate().unwrap();
    }
    assert!(delaunay.triangulation().is_empty());
}

#[test]
fn test_empty_cloud() {
    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    let empty = PointCloud::new(4);

    assert_eq!(
        delaunay.triangulate_by_iterations(&empty).unwrap(),
        IterationState::Finalizing
    );
    assert_eq!(
        delaunay.triangulate_by_iterations(&empty).unwrap(),
        IterationState::Done
    );
    assert!(delaunay.triangulation().is_empty());

    delaunay.triangulate(&empty).unwrap();
    assert!(delaunay.triangulation().is_empty());
    assert_eq!(delaunay.output_vertices().count(), 0);
}

#[test]
fn test_collinear_points_produce_nothing() {
    let delaunay = triangulated(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)]);
    assert!(delaunay.triangulation().is_empty());
    delaunay.validate().unwrap();
}

#[test]
fn test_triangle_pool_exhausted() {
    let config = TriangulationConfigBuilder::new()
        .triangle_capacity(1)
        .unwrap()
        .build()
        .unwrap();
    let mut delaunay = Delaunay::new(config);

    let result = delaunay.triangulate(&cloud(vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0)]));
    assert!(matches!(
        result,
        Err(DelaunayError::CapacityExceeded {
            pool: "triangle",
            capacity: 1
        })
    ));

    // the failed split left the root untouched
    assert_eq!(delaunay.triangle_count(), 1);
    assert_eq!(delaunay.vertex_count(), 3);
    delaunay.validate().unwrap();
}

#[test]
fn test_failed_insertion_can_be_retried() {
    // room for the split itself but not for the flips that may follow
    let config = TriangulationConfigBuilder::new()
        .triangle_capacity(4)
        .unwrap()
        .build()
        .unwrap();
    let cloud = cloud(vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0)]);
    let mut delaunay = Delaunay::new(config);

    assert_eq!(
        delaunay.triangulate_by_iterations(&cloud).unwrap(),
        IterationState::Inserting(0)
    );
    for _ in 0..2 {
        assert!(matches!(
            delaunay.triangulate_by_iterations(&cloud),
            Err(DelaunayError::CapacityExceeded {
                pool: "triangle",
                capacity: 4
            })
        ));
        assert_eq!(delaunay.state(), IterationState::Inserting(0));
        assert_eq!(delaunay.triangle_count(), 1);
        assert_eq!(delaunay.vertex_count(), 3);
        assert!(delaunay.skipped().is_empty());
    }
    delaunay.validate().unwrap();
}

#[test]
fn test_vertex_pool_exhausted() {
    let config = TriangulationConfigBuilder::new()
        .max_points(2)
        .unwrap()
        .build()
        .unwrap();
    let mut delaunay = Delaunay::new(config);

    let result = delaunay.triangulate(&cloud(vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0)]));
    assert!(matches!(
        result,
        Err(DelaunayError::CapacityExceeded { pool: "vertex", .. })
    ));
}

#[test]
fn test_locate_before_root() {
    let delaunay = Delaunay::new(TriangulationConfig::default());
    assert!(matches!(
        delaunay.locate(p(0.0, 0.0)),
        Err(DelaunayError::NotInitialized)
    ));
}

#[test]
fn test_insert_requires_active_run() {
    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    assert!(matches!(
        delaunay.insert_point(p(0.0, 0.0)),
        Err(DelaunayError::NotInitialized)
    ));

    delaunay
        .triangulate(&cloud(vec![p(0.0, 0.0), p(4.0, 0.0), p(2.0, 4.0)]))
        .unwrap();
    assert!(matches!(
        delaunay.insert_point(p(2.0, 1.0)),
        Err(DelaunayError::NotInitialized)
    ));
}

#[test]
fn test_manual_insertion() {
    let cloud = cloud(vec![p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)]);
    let mut delaunay = Delaunay::new(TriangulationConfig::default());

    // build the root only, then feed points by hand
    delaunay.triangulate_by_iterations(&cloud).unwrap();
    for &point in cloud.points() {
        assert!(matches!(
            delaunay.insert_point(point).unwrap(),
            Insertion::Inserted(_)
        ));
    }
    assert_eq!(
        delaunay.insert_point(p(10.0, 0.0)).unwrap(),
        Insertion::Skipped {
            existing: VertexId::new(4)
        }
    );

    let far = p(1.0e6, 1.0e6);
    assert!(matches!(
        delaunay.insert_point(far),
        Err(DelaunayError::PointOutsideTriangulation { .. })
    ));
    delaunay.validate().unwrap();
}

#[test]
fn test_locate_after_trim() {
    let delaunay = triangulated(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]);

    match delaunay.locate(p(1.0, 2.0)).unwrap() {
        Location::Inside(t) => assert!(delaunay.triangulation().contains(&t)),
        other => panic!("expected an interior hit, got {:?}", other),
    }
    assert!(matches!(
        delaunay.locate(p(0.0, 0.0)).unwrap(),
        Location::OnVertex(_)
    ));
    assert!(matches!(
        delaunay.locate(p(2.0, 0.0)).unwrap(),
        Location::OnEdge(..)
    ));

    // inside the super-triangle but outside the hull
    assert!(matches!(
        delaunay.locate(p(10.0, 10.0)),
        Err(DelaunayError::PointOutsideTriangulation { .. })
    ));
}

#[test]
fn test_flip_hierarchy_links() {
    let mut delaunay = Delaunay::new(TriangulationConfig::default());
    delaunay.triangulate(&random_cloud(80, 6)).unwrap();

    let mut flipped = 0;
    for index in 0..delaunay.triangle_count() {
        let triangle = delaunay.triangle(TriangleId::new(index));
        if triangle.parents.len() == 2 {
            flipped += 1;
        }
        for &parent in &triangle.parents {
            assert_eq!(
                delaunay.triangle(parent).state,
                TriangleState::Subdivided
            );
        }
    }
    assert!(flipped > 0);
}
