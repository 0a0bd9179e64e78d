//! Reverse reading of an output directory.
//!
//! Each field family is governed by a descriptor: `dustopac.inp` for the
//! dust families and `line.inp` for the gas families. A missing descriptor
//! or a missing numeric file means the family was never written and yields
//! an empty result. Everything else (bad headers, wrong cell counts,
//! species counts that disagree with the descriptor) is an error.

use indexmap::IndexMap;
use lumen_codec::{
    files, CodecError, DustOpacityEntry, FieldShape, FileKind, IoContext, LineEntry,
};
use lumen_core::FieldArray;
use lumen_grid::Grid;
use tracing::{debug, warn};

use crate::fields::MappedFields;

/// Turn `MissingDescriptor` into `None`.
fn soft<T>(result: Result<T, CodecError>) -> Result<Option<T>, CodecError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(CodecError::MissingDescriptor { path }) => {
            warn!(path = %path.display(), "descriptor absent, skipping field family");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Reads every discoverable field of one output directory over one grid.
#[derive(Debug)]
pub struct Mapper<'a> {
    io: &'a IoContext,
    grid: &'a Grid,
}

impl<'a> Mapper<'a> {
    /// A mapper over `io`'s output directory, shaped by `grid`.
    pub fn new(io: &'a IoContext, grid: &'a Grid) -> Self {
        Self { io, grid }
    }

    fn cell_dims(&self) -> [usize; 3] {
        self.grid.shape()
    }

    fn read_blocks(
        &self,
        stem: &str,
        kind: FileKind,
        shape: FieldShape,
    ) -> Result<Option<Vec<Vec<f64>>>, CodecError> {
        let blocks = self
            .io
            .read_field(stem, kind, shape, self.grid.nrcells())?;
        if blocks.is_none() {
            warn!(stem, "field file absent");
        }
        Ok(blocks)
    }

    /// Read a multi-species dust file, naming blocks from `entries`.
    fn dust_family(
        &self,
        entries: Option<&[DustOpacityEntry]>,
        stem: &str,
        kind: FileKind,
    ) -> Result<IndexMap<String, FieldArray>, CodecError> {
        let Some(entries) = entries else {
            return Ok(IndexMap::new());
        };
        let Some(blocks) = self.read_blocks(stem, kind, FieldShape::SPECIES)? else {
            return Ok(IndexMap::new());
        };
        if blocks.len() != entries.len() {
            return Err(CodecError::InconsistentSpeciesCount {
                descriptor: entries.len(),
                file: blocks.len(),
            });
        }
        let dims = self.cell_dims();
        let mut out = IndexMap::with_capacity(entries.len());
        for (entry, block) in entries.iter().zip(blocks) {
            out.insert(entry.name.clone(), FieldArray::from_vec(&dims, block)?);
        }
        debug!(stem, species = out.len(), "mapped dust family");
        Ok(out)
    }

    /// Dust density per dust species.
    pub fn dust_density(&self) -> Result<IndexMap<String, FieldArray>, CodecError> {
        let entries = soft(self.io.read_dust_opacities())?;
        self.dust_family(entries.as_deref(), files::DUST_DENSITY, FileKind::Input)
    }

    /// Solver-computed dust temperature per dust species.
    pub fn dust_temperature(&self) -> Result<IndexMap<String, FieldArray>, CodecError> {
        let entries = soft(self.io.read_dust_opacities())?;
        self.dust_family(entries.as_deref(), files::DUST_TEMPERATURE, FileKind::Output)
    }

    fn number_density_from(
        &self,
        entries: Option<&[LineEntry]>,
    ) -> Result<IndexMap<String, FieldArray>, CodecError> {
        let Some(entries) = entries else {
            return Ok(IndexMap::new());
        };
        let dims = self.cell_dims();
        let mut out = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let stem = files::number_density(&entry.name);
            let Some(mut blocks) = self.read_blocks(&stem, FileKind::Input, FieldShape::SCALAR)?
            else {
                continue;
            };
            let block = blocks.pop().unwrap_or_default();
            out.insert(entry.name.clone(), FieldArray::from_vec(&dims, block)?);
        }
        Ok(out)
    }

    /// Number density per molecule listed in `line.inp`.
    ///
    /// A molecule whose `numberdens_<name>` file is absent is skipped.
    pub fn gas_number_density(&self) -> Result<IndexMap<String, FieldArray>, CodecError> {
        let entries = soft(self.io.read_lines())?;
        self.number_density_from(entries.as_deref())
    }

    /// Read a single-block gas file if the line descriptor was present.
    fn gas_single(
        &self,
        lines: Option<&[LineEntry]>,
        stem: &str,
        shape: FieldShape,
        dims: &[usize],
    ) -> Result<Option<FieldArray>, CodecError> {
        if lines.is_none() {
            return Ok(None);
        }
        let Some(mut blocks) = self.read_blocks(stem, FileKind::Input, shape)? else {
            return Ok(None);
        };
        let block = blocks.pop().unwrap_or_default();
        Ok(Some(FieldArray::from_vec(dims, block)?))
    }

    fn gas_temperature_from(
        &self,
        lines: Option<&[LineEntry]>,
    ) -> Result<Option<FieldArray>, CodecError> {
        self.gas_single(lines, files::GAS_TEMPERATURE, FieldShape::SCALAR, &self.cell_dims())
    }

    fn gas_velocity_from(
        &self,
        lines: Option<&[LineEntry]>,
    ) -> Result<Option<FieldArray>, CodecError> {
        let [nu, nv, nw] = self.cell_dims();
        self.gas_single(lines, files::GAS_VELOCITY, FieldShape::VECTOR, &[3, nu, nv, nw])
    }

    /// Gas temperature, `[nu, nv, nw]`.
    pub fn gas_temperature(&self) -> Result<Option<FieldArray>, CodecError> {
        let lines = soft(self.io.read_lines())?;
        self.gas_temperature_from(lines.as_deref())
    }

    /// Gas velocity, `[3, nu, nv, nw]`.
    pub fn gas_velocity(&self) -> Result<Option<FieldArray>, CodecError> {
        let lines = soft(self.io.read_lines())?;
        self.gas_velocity_from(lines.as_deref())
    }

    /// Every family at once. Each descriptor is parsed a single time.
    pub fn map_variables(&self) -> Result<MappedFields, CodecError> {
        let dust = soft(self.io.read_dust_opacities())?;
        let lines = soft(self.io.read_lines())?;
        Ok(MappedFields {
            dust_density: self.dust_family(dust.as_deref(), files::DUST_DENSITY, FileKind::Input)?,
            dust_temperature: self.dust_family(
                dust.as_deref(),
                files::DUST_TEMPERATURE,
                FileKind::Output,
            )?,
            gas_number_density: self.number_density_from(lines.as_deref())?,
            gas_temperature: self.gas_temperature_from(lines.as_deref())?,
            gas_velocity: self.gas_velocity_from(lines.as_deref())?,
        })
    }
}

/// Map every discoverable field in `io`'s output directory.
pub fn map_variables(io: &IoContext, grid: &Grid) -> Result<MappedFields, CodecError> {
    Mapper::new(io, grid).map_variables()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_codec::{Encoding, IoConfig, OverwritePolicy, Precision};
    use lumen_core::CoordinateSystem;

    fn setup(dir: &std::path::Path) -> (IoContext, Grid) {
        let config = IoConfig {
            outdir: dir.to_path_buf(),
            encoding: Encoding::Ascii,
            precision: Precision::Double,
            clobber: true,
        };
        let io = IoContext::new(config, OverwritePolicy::Always).unwrap();
        let grid = Grid::new(CoordinateSystem::Cartesian, &[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, 1.0])
            .unwrap();
        (io, grid)
    }

    #[test]
    fn gas_readers_follow_the_entries_they_are_given() {
        let dir = tempfile::tempdir().unwrap();
        let (mut io, grid) = setup(dir.path());
        io.write_field(
            files::GAS_TEMPERATURE,
            FileKind::Input,
            FieldShape::SCALAR,
            grid.nrcells(),
            1,
            |_| vec![10.0, 20.0],
        )
        .unwrap();
        let mapper = Mapper::new(&io, &grid);

        // No line.inp on disk: the public reader sees no gas family.
        assert!(mapper.gas_temperature().unwrap().is_none());
        // Entries parsed elsewhere are trusted without touching the descriptor.
        let no_molecules: [LineEntry; 0] = [];
        let t = mapper.gas_temperature_from(Some(&no_molecules[..])).unwrap().unwrap();
        assert_eq!(t.as_slice(), &[10.0, 20.0]);
        assert!(mapper.gas_temperature_from(None).unwrap().is_none());
    }

    #[test]
    fn dust_family_checks_count_against_given_entries() {
        let dir = tempfile::tempdir().unwrap();
        let (mut io, grid) = setup(dir.path());
        io.write_field(
            files::DUST_DENSITY,
            FileKind::Input,
            FieldShape::SPECIES,
            grid.nrcells(),
            1,
            |_| vec![1.0, 2.0],
        )
        .unwrap();
        let mapper = Mapper::new(&io, &grid);
        let two = [DustOpacityEntry::thermal("a"), DustOpacityEntry::thermal("b")];
        assert!(matches!(
            mapper.dust_family(Some(&two[..]), files::DUST_DENSITY, FileKind::Input),
            Err(CodecError::InconsistentSpeciesCount { descriptor: 2, file: 1 })
        ));
        let one = mapper
            .dust_family(Some(&two[..1]), files::DUST_DENSITY, FileKind::Input)
            .unwrap();
        assert_eq!(one.keys().collect::<Vec<_>>(), ["a"]);
    }
}
