//! Geometry-file round trips through an output directory.

use lumen_codec::{Encoding, IoConfig, IoContext, OverwritePolicy, Precision};
use lumen_core::CoordinateSystem;
use lumen_grid::{Axis, Grid};
use proptest::prelude::*;

fn context(dir: &std::path::Path, encoding: Encoding) -> IoContext {
    let config = IoConfig {
        outdir: dir.to_path_buf(),
        encoding,
        precision: Precision::Double,
        clobber: true,
    };
    IoContext::new(config, OverwritePolicy::Never).unwrap()
}

/// Strictly increasing edges from a start and positive steps.
fn edges() -> impl Strategy<Value = Vec<f64>> {
    (-1e3f64..1e3, proptest::collection::vec(1e-3f64..1e2, 1..6)).prop_map(|(start, steps)| {
        let mut out = vec![start];
        for s in steps {
            let last = out[out.len() - 1];
            out.push(last + s);
        }
        out
    })
}

fn system() -> impl Strategy<Value = CoordinateSystem> {
    prop_oneof![
        Just(CoordinateSystem::Cartesian),
        Just(CoordinateSystem::Spherical),
        Just(CoordinateSystem::Cylindrical),
    ]
}

#[test]
fn file_name_follows_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let grid = Grid::new(CoordinateSystem::Cartesian, &[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0]).unwrap();
    let path = grid.write(&mut context(dir.path(), Encoding::Ascii)).unwrap();
    assert!(path.ends_with("amr_grid.inp"));
    let path = grid.write(&mut context(dir.path(), Encoding::Binary)).unwrap();
    assert!(path.ends_with("amr_grid.binp"));
}

#[test]
fn missing_grid_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let io = context(dir.path(), Encoding::Binary);
    assert!(Grid::read(&io).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn read_reproduces_write(
        u in edges(),
        v in edges(),
        w in edges(),
        system in system(),
        ascii in any::<bool>(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let encoding = if ascii { Encoding::Ascii } else { Encoding::Binary };
        let mut io = context(dir.path(), encoding);
        let grid = Grid::new(system, &u, &v, &w).unwrap();
        grid.write(&mut io).unwrap();
        let back = Grid::read(&io).unwrap();
        prop_assert_eq!(back.shape(), grid.shape());
        prop_assert_eq!(back.coordinate_system(), system);
        for axis in Axis::ALL {
            prop_assert_eq!(back.edges(axis), grid.edges(axis));
        }
        prop_assert_eq!(back.cells(), grid.cells());
    }
}
