//! End-to-end scenarios through the facade.

use lumen::prelude::*;
use lumen_test_utils::{two_cell_grid, TestOutdir};
use proptest::prelude::*;

fn le_ints(bytes: &[u8], count: usize) -> Vec<i64> {
    bytes
        .chunks_exact(8)
        .take(count)
        .map(|c| i64::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

#[test]
fn uniform_dust_on_two_cells_binary() {
    let out = TestOutdir::new();
    let mut sim = Simulation::new(out.config(Encoding::Binary), OverwritePolicy::Always).unwrap();
    sim.set_grid(two_cell_grid());
    sim.dust_mut().insert("species0", UniformDust::new(1e-18));
    sim.commit_mctherm().unwrap();

    let bytes = std::fs::read(out.path().join("dust_density.binp")).unwrap();
    assert_eq!(le_ints(&bytes, 4), [1, 8, 2, 1]);
    assert_eq!(bytes.len(), 4 * 8 + 2 * 8);
    let body: Vec<f64> = bytes[32..]
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect();
    assert_eq!(body, [1e-18, 1e-18]);

    let mapped = sim.map().unwrap();
    assert_eq!(mapped.dust_density.len(), 1);
    let rho = &mapped.dust_density["species0"];
    assert_eq!(rho.dims(), &[2, 1, 1]);
    assert_eq!(rho.as_slice(), &[1e-18, 1e-18]);
}

#[test]
fn uniform_dust_on_two_cells_ascii() {
    let out = TestOutdir::new();
    let mut sim = Simulation::new(out.config(Encoding::Ascii), OverwritePolicy::Always).unwrap();
    sim.set_grid(two_cell_grid());
    sim.dust_mut().insert("species0", UniformDust::new(1e-18));
    sim.commit_mctherm().unwrap();

    let text = std::fs::read_to_string(out.path().join("dust_density.inp")).unwrap();
    let tokens: Vec<&str> = text.split_whitespace().collect();
    assert_eq!(&tokens[..3], ["1", "2", "1"]);
    assert_eq!(&tokens[3..], ["1e-18", "1e-18"]);

    let mapped = sim.map().unwrap();
    assert_eq!(mapped.dust_density["species0"].as_slice(), &[1e-18, 1e-18]);
}

#[test]
fn no_line_descriptor_means_no_gas() {
    let out = TestOutdir::new();
    let mut sim = Simulation::new(out.config(Encoding::Binary), OverwritePolicy::Always).unwrap();
    sim.set_grid(two_cell_grid());
    sim.dust_mut().insert("species0", UniformDust::new(1.0));
    sim.commit_mctherm().unwrap();

    let mapped = sim.map().unwrap();
    assert!(mapped.gas_number_density.is_empty());
    assert!(mapped.gas_temperature.is_none());
    assert!(mapped.gas_velocity.is_none());
    assert!(!mapped.is_empty());
}

#[test]
fn grid_reads_back_from_committed_directory() {
    let out = TestOutdir::new();
    let mut sim = Simulation::new(out.config(Encoding::Ascii), OverwritePolicy::Always).unwrap();
    let grid = Grid::new(
        CoordinateSystem::Spherical,
        &[1.0, 2.0, 4.0],
        &[0.1, 1.5, 3.0],
        &[0.0, 3.0, 6.0],
    )
    .unwrap();
    sim.set_grid(grid.clone());
    sim.commit_mctherm().unwrap();
    assert_eq!(Grid::read(sim.io()).unwrap(), grid);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn encodings_map_back_equal(
        densities in prop::collection::vec(1e-30f64..1e-10, 1..4),
        nu in 1usize..4,
    ) {
        let grid = lumen_test_utils::cartesian_grid(nu, 2, 1);
        let mut maps = Vec::new();
        for encoding in [Encoding::Ascii, Encoding::Binary] {
            let out = TestOutdir::new();
            let mut sim = Simulation::new(out.config(encoding), OverwritePolicy::Always).unwrap();
            sim.set_grid(grid.clone());
            for (i, &rho) in densities.iter().enumerate() {
                sim.dust_mut().insert(format!("dust{i}"), UniformDust::new(rho));
            }
            sim.commit_mctherm().unwrap();
            maps.push(sim.map().unwrap().dust_density);
        }
        prop_assert_eq!(&maps[0], &maps[1]);
        for (i, &rho) in densities.iter().enumerate() {
            let block = maps[1][&format!("dust{i}")].as_slice();
            prop_assert!(block.iter().all(|&v| v == rho));
        }
    }
}
