//! # Consumer Agreement Tests
//!
//! Mesh, scatter, ribbon and tile cache must all read the same oracle, so
//! props sit on the ground the player sees and the trail decal sits on the
//! trail.

use std::sync::Arc;

use trailhead_procedural::{
    region_seed, scatter, HeightTileCache, PathRibbon, RibbonSpec, ScatterRule, TerrainGrid,
    TerrainMesh, World, WorldConfig,
};

fn world() -> World {
    World::new(WorldConfig::default()).expect("default config is valid")
}

/// Test: Every mesh vertex is exactly the oracle's height.
#[test]
fn test_mesh_vertices_are_oracle_heights() {
    let world = world();
    let grid = TerrainGrid::centered([0.0, 0.0], 120.0, 96).expect("valid grid");
    let mesh = TerrainMesh::tessellate(&world, grid).expect("mesh");

    for i in 0..mesh.heights().len() {
        let p = mesh.position(i);
        assert_eq!(p.y.to_bits(), world.height_at(p.x, p.z).to_bits(), "vertex {i}");
    }
}

/// Test: Mesh normals agree with the oracle's own normals on a fine grid.
#[test]
fn test_mesh_normals_track_oracle_normals() {
    let world = world();
    let grid = TerrainGrid::centered([20.0, 60.0], 40.0, 200).expect("valid grid");
    let mesh = TerrainMesh::tessellate(&world, grid).expect("mesh");

    // Ridge creases and fine detail make single vertices disagree; the
    // surface as a whole must not
    let side = grid.side();
    let mut cosines = Vec::with_capacity(side * side);
    for row in 1..side - 1 {
        for col in 1..side - 1 {
            let i = row * side + col;
            let p = mesh.position(i);
            cosines.push(mesh.normals()[i].dot(world.normal_at(p.x, p.z)));
        }
    }
    cosines.sort_by(f64::total_cmp);
    let mean = cosines.iter().sum::<f64>() / cosines.len() as f64;
    let p5 = cosines[cosines.len() / 20];
    println!("Mesh/oracle normal cosine: mean {mean:.5}, 5th percentile {p5:.5}");
    assert!(mean > 0.98);
    assert!(p5 > 0.9);
}

/// Test: Parallel tessellation and tile-cached tessellation are identical to
/// the serial pass.
#[test]
fn test_tessellation_paths_agree() {
    let world = Arc::new(world());
    let grid = TerrainGrid::centered([0.0, 0.0], 600.0, 64).expect("valid grid");

    let serial = TerrainMesh::tessellate(world.as_ref(), grid).expect("mesh");
    let parallel = TerrainMesh::tessellate_parallel(world.as_ref(), grid, 4).expect("mesh");
    let cache = HeightTileCache::new(Arc::clone(&world), grid.spacing).expect("cache");
    let cached = TerrainMesh::tessellate(&cache, grid).expect("mesh");

    assert_eq!(serial.heights(), parallel.heights());
    assert_eq!(serial.heights(), cached.heights());
    assert_eq!(serial.indices(), cached.indices());
    assert_eq!(serial.height_bounds(), cached.height_bounds());
}

/// Test: Every scatter family is grounded by the oracle.
#[test]
fn test_scatter_is_grounded() {
    let world = world();
    let seed = region_seed("default");

    for rule in [
        ScatterRule::rocks(),
        ScatterRule::pebbles(),
        ScatterRule::grass(),
        ScatterRule::trail_pebbles(),
        ScatterRule::trees(),
    ] {
        let placements = scatter(&world, &rule, seed, 60);
        assert!(!placements.is_empty(), "{} placed nothing", rule.name);

        for p in &placements {
            let (x, z) = (p.position.x, p.position.z);
            let ground = match rule.footprint {
                Some(factor) => world.min_height_in_footprint(x, z, factor * p.scale.x.max(p.scale.z)),
                None => world.height_at(x, z),
            };
            let expected = ground - rule.embed * p.scale.y + rule.lift;
            assert_eq!(p.position.y, expected, "{} floats or sinks", rule.name);
            assert!(p.position.y <= world.height_at(x, z) + rule.lift);
        }
    }
}

/// Test: The ribbon rides the trail just above the ground.
#[test]
fn test_ribbon_sits_on_trail() {
    let world = world();
    let spec = RibbonSpec {
        z_start: -150.0,
        z_end: 150.0,
        ..RibbonSpec::default()
    };
    let ribbon = PathRibbon::build(&world, spec).expect("ribbon");

    for c in ribbon.centers() {
        assert_eq!(c.x, world.path_center_at(c.z));
        let gap = c.y - world.height_at(c.x, c.z);
        assert!((gap - spec.lift).abs() < 1e-9);
    }

    // The ribbon is narrower than the flattened band, so it never touches
    // wild terrain
    for p in ribbon.positions() {
        let profile = world.path_profile_at(p.z);
        assert!((p.x - profile.center).abs() < profile.width * 0.5);
        assert!(p.y > world.height_at(p.x, p.z));
    }
}

/// Test: Scatter passes for different regions draw from different streams.
#[test]
fn test_regions_get_distinct_scatter() {
    let world = world();
    let rule = ScatterRule::grass();
    let a = scatter(&world, &rule, region_seed("meadow"), 40);
    let b = scatter(&world, &rule, region_seed("ridge"), 40);
    assert_ne!(a, b);
    assert_eq!(a, scatter(&world, &rule, region_seed("meadow"), 40));
}
