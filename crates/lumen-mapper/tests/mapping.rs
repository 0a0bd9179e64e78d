//! Mapper integration tests over real output directories.

use std::path::Path;

use lumen_codec::{
    files, CodecError, DustOpacityEntry, Encoding, FieldShape, FileKind, IoConfig, IoContext,
    LineEntry, OverwritePolicy, Precision,
};
use lumen_core::CoordinateSystem;
use lumen_grid::Grid;
use lumen_mapper::map_variables;

// ── Helpers ─────────────────────────────────────────────────────

fn context(dir: &Path, encoding: Encoding) -> IoContext {
    let config = IoConfig {
        outdir: dir.to_path_buf(),
        encoding,
        precision: Precision::Double,
        clobber: true,
    };
    IoContext::new(config, OverwritePolicy::Never).unwrap()
}

fn two_cell_grid() -> Grid {
    Grid::new(
        CoordinateSystem::Cartesian,
        &[0.0, 1.0, 2.0],
        &[0.0, 1.0],
        &[0.0, 1.0],
    )
    .unwrap()
}

fn molecule(name: &str) -> LineEntry {
    LineEntry {
        name: name.into(),
        input_style: "leiden".into(),
        flag_a: 0,
        flag_b: 0,
        partners: vec![],
    }
}

// ── Scenarios ───────────────────────────────────────────────────

#[test]
fn uniform_dust_species_maps_back() {
    for encoding in [Encoding::Ascii, Encoding::Binary] {
        let dir = tempfile::tempdir().unwrap();
        let mut io = context(dir.path(), encoding);
        let grid = two_cell_grid();
        io.write_dust_opacities(&[DustOpacityEntry::thermal("species0")])
            .unwrap();
        io.write_field(
            files::DUST_DENSITY,
            FileKind::Input,
            FieldShape::SPECIES,
            grid.nrcells(),
            1,
            |_| vec![1e-18; 2],
        )
        .unwrap();

        let mapped = map_variables(&io, &grid).unwrap();
        let rho = &mapped.dust_density["species0"];
        assert_eq!(rho.dims(), &[2, 1, 1]);
        assert_eq!(rho.as_slice(), &[1e-18, 1e-18]);
        assert!(mapped.dust_temperature.is_empty());
        assert!(mapped.gas_number_density.is_empty());
    }
}

#[test]
fn missing_line_descriptor_gives_empty_gas() {
    let dir = tempfile::tempdir().unwrap();
    let mut io = context(dir.path(), Encoding::Binary);
    let grid = two_cell_grid();
    io.write_field(
        files::GAS_TEMPERATURE,
        FileKind::Input,
        FieldShape::SCALAR,
        2,
        1,
        |_| vec![10.0, 20.0],
    )
    .unwrap();
    let mapped = map_variables(&io, &grid).unwrap();
    assert!(mapped.gas_number_density.is_empty());
    assert!(mapped.gas_temperature.is_none());
    assert!(mapped.is_empty());
}

#[test]
fn species_count_must_match_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let mut io = context(dir.path(), Encoding::Binary);
    let grid = two_cell_grid();
    io.write_dust_opacities(&[DustOpacityEntry::thermal("a")])
        .unwrap();
    io.write_field(
        files::DUST_DENSITY,
        FileKind::Input,
        FieldShape::SPECIES,
        2,
        2,
        |i| vec![i as f64; 2],
    )
    .unwrap();
    assert!(matches!(
        map_variables(&io, &grid),
        Err(CodecError::InconsistentSpeciesCount {
            descriptor: 1,
            file: 2
        })
    ));
}

#[test]
fn gas_families_and_skipped_molecule() {
    let dir = tempfile::tempdir().unwrap();
    let mut io = context(dir.path(), Encoding::Ascii);
    let grid = two_cell_grid();
    io.write_lines(&[molecule("co"), molecule("hcn")]).unwrap();
    io.write_field(
        &files::number_density("co"),
        FileKind::Input,
        FieldShape::SCALAR,
        2,
        1,
        |_| vec![3.0, 4.0],
    )
    .unwrap();
    io.write_field(
        files::GAS_VELOCITY,
        FileKind::Input,
        FieldShape::VECTOR,
        2,
        1,
        |_| vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
    )
    .unwrap();

    let mapped = map_variables(&io, &grid).unwrap();
    assert_eq!(mapped.gas_number_density.len(), 1);
    assert_eq!(mapped.gas_number_density["co"].as_slice(), &[3.0, 4.0]);
    assert!(mapped.gas_temperature.is_none());
    let v = mapped.gas_velocity.unwrap();
    assert_eq!(v.dims(), &[3, 2, 1, 1]);
    assert_eq!(v.component(1).unwrap().as_slice(), &[2.0, 5.0]);
}

#[test]
fn dust_temperature_uses_output_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut io = context(dir.path(), Encoding::Binary);
    let grid = two_cell_grid();
    io.write_dust_opacities(&[DustOpacityEntry::thermal("a"), DustOpacityEntry::thermal("b")])
        .unwrap();
    let path = io
        .write_field(
            files::DUST_TEMPERATURE,
            FileKind::Output,
            FieldShape::SPECIES,
            2,
            2,
            |i| vec![100.0 * (i + 1) as f64; 2],
        )
        .unwrap();
    assert!(path.ends_with("dust_temperature.bdat"));
    let mapped = map_variables(&io, &grid).unwrap();
    let names: Vec<_> = mapped.dust_temperature.keys().cloned().collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(mapped.dust_temperature["b"].as_slice(), &[200.0, 200.0]);
}

#[test]
fn cell_count_checked_against_grid() {
    let dir = tempfile::tempdir().unwrap();
    let mut io = context(dir.path(), Encoding::Binary);
    io.write_dust_opacities(&[DustOpacityEntry::thermal("a")])
        .unwrap();
    io.write_field(
        files::DUST_DENSITY,
        FileKind::Input,
        FieldShape::SPECIES,
        5,
        1,
        |_| vec![0.0; 5],
    )
    .unwrap();
    assert!(matches!(
        map_variables(&io, &two_cell_grid()),
        Err(CodecError::CellCountMismatch { expected: 2, found: 5 })
    ));
}
