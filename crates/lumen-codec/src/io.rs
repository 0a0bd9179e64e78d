//! Output-directory I/O context and the overwrite gate.
//!
//! [`IoContext`] owns the output directory, the chosen encoding and
//! precision, and the [`OverwritePolicy`] consulted before any existing
//! file is replaced. Every writer in Lumen opens its files through it.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::CodecError;
use crate::layout::{Encoding, FieldLayout, FieldShape, FileKind, Precision};
use crate::reader::FieldReader;
use crate::writer::FieldWriter;

/// Configuration for an [`IoContext`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IoConfig {
    /// Directory every solver file lives in. Default: `"."`.
    pub outdir: PathBuf,
    /// Encoding used for numeric files on write. Default: binary.
    pub encoding: Encoding,
    /// Binary value width on write. Default: double.
    pub precision: Precision,
    /// Replace existing files without consulting the overwrite policy.
    /// Default: `false`.
    pub clobber: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            outdir: PathBuf::from("."),
            encoding: Encoding::Binary,
            precision: Precision::Double,
            clobber: false,
        }
    }
}

impl IoConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.outdir.as_os_str().is_empty() {
            return Err(CodecError::InvalidConfig {
                reason: "output directory path is empty".into(),
            });
        }
        if self.outdir.is_file() {
            return Err(CodecError::InvalidConfig {
                reason: format!("{} is a file, not a directory", self.outdir.display()),
            });
        }
        Ok(())
    }
}

/// Decides whether an existing file may be overwritten.
pub enum OverwritePolicy {
    /// Always overwrite.
    Always,
    /// Never overwrite; every collision aborts.
    Never,
    /// Ask on the terminal, blocking until the user answers `y` or `n`.
    Prompt,
    /// Caller-supplied decision, e.g. for headless or test environments.
    Custom(Box<dyn FnMut(&Path) -> bool + Send>),
}

impl fmt::Debug for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "Always"),
            Self::Never => write!(f, "Never"),
            Self::Prompt => write!(f, "Prompt"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl OverwritePolicy {
    /// Wrap a closure as [`OverwritePolicy::Custom`].
    pub fn custom(f: impl FnMut(&Path) -> bool + Send + 'static) -> Self {
        Self::Custom(Box::new(f))
    }

    /// Whether `path` may be replaced.
    pub fn confirm(&mut self, path: &Path) -> Result<bool, CodecError> {
        match self {
            Self::Always => Ok(true),
            Self::Never => Ok(false),
            Self::Prompt => {
                let stdin = io::stdin();
                let stdout = io::stdout();
                prompt_overwrite(&mut stdin.lock(), &mut stdout.lock(), path)
            }
            Self::Custom(f) => Ok(f(path)),
        }
    }
}

/// Ask `y/n` about `path` until a valid answer arrives.
///
/// End of input counts as `n`.
pub fn prompt_overwrite(
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    path: &Path,
) -> Result<bool, CodecError> {
    let mut line = String::new();
    loop {
        write!(
            output,
            "the file {} already exists! overwrite? [y/n] ",
            path.display()
        )?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}

/// Output-directory context shared by all writers and readers.
#[derive(Debug)]
pub struct IoContext {
    config: IoConfig,
    policy: OverwritePolicy,
}

impl IoContext {
    /// Validate `config` and build a context.
    pub fn new(config: IoConfig, policy: OverwritePolicy) -> Result<Self, CodecError> {
        config.validate()?;
        Ok(Self { config, policy })
    }

    /// The configuration in force.
    pub fn config(&self) -> &IoConfig {
        &self.config
    }

    /// Output directory.
    pub fn outdir(&self) -> &Path {
        &self.config.outdir
    }

    /// Encoding used on write.
    pub fn encoding(&self) -> Encoding {
        self.config.encoding
    }

    /// Binary precision used on write.
    pub fn precision(&self) -> Precision {
        self.config.precision
    }

    /// Full path of `name` inside the output directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.config.outdir.join(name)
    }

    /// Whether `name` exists as a regular file.
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// File name of a numeric file in the configured encoding.
    pub fn field_file_name(&self, stem: &str, kind: FileKind) -> String {
        self.config.encoding.file_name(stem, kind)
    }

    /// Run the overwrite gate for `path`.
    pub fn check_overwrite(&mut self, path: &Path) -> Result<(), CodecError> {
        if self.config.clobber || !path.exists() {
            return Ok(());
        }
        if self.policy.confirm(path)? {
            return Ok(());
        }
        warn!(path = %path.display(), "overwrite declined");
        Err(CodecError::OverwriteAborted {
            path: path.to_path_buf(),
        })
    }

    /// Create (or, after the overwrite gate, truncate) `name` for writing.
    pub fn create(&mut self, name: &str) -> Result<BufWriter<File>, CodecError> {
        let path = self.path(name);
        self.check_overwrite(&path)?;
        std::fs::create_dir_all(&self.config.outdir)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        debug!(path = %path.display(), "opened for write");
        Ok(BufWriter::new(file))
    }

    /// Open `name` for reading.
    pub fn open(&self, name: &str) -> Result<BufReader<File>, CodecError> {
        let path = self.path(name);
        debug!(path = %path.display(), "opened for read");
        Ok(BufReader::new(File::open(path)?))
    }

    /// Locate the ASCII or binary variant of `stem`, preferring ASCII.
    ///
    /// Returns `None` when neither exists.
    pub fn probe(&self, stem: &str, kind: FileKind) -> Option<(String, Encoding)> {
        [Encoding::Ascii, Encoding::Binary]
            .into_iter()
            .map(|e| (e.file_name(stem, kind), e))
            .find(|(name, _)| self.exists(name))
    }

    /// Like [`probe`](Self::probe), but a missing file is
    /// [`CodecError::AmbiguousOrMissingFile`].
    pub fn require(&self, stem: &str, kind: FileKind) -> Result<(String, Encoding), CodecError> {
        self.probe(stem, kind)
            .ok_or_else(|| CodecError::AmbiguousOrMissingFile {
                stem: stem.to_string(),
            })
    }

    /// Open a positional [`FieldWriter`] for `stem` in the configured
    /// encoding, with the header already written.
    ///
    /// Callers that compute blocks fallibly drive the writer themselves;
    /// [`write_field`](Self::write_field) is the one-call form.
    pub fn field_writer(
        &mut self,
        stem: &str,
        kind: FileKind,
        shape: FieldShape,
        cell_count: usize,
        species_count: usize,
    ) -> Result<(FieldWriter<BufWriter<File>>, PathBuf), CodecError> {
        let name = self.field_file_name(stem, kind);
        let layout = FieldLayout::new(
            self.config.encoding,
            self.config.precision,
            shape,
            cell_count,
            species_count,
        );
        let sink = self.create(&name)?;
        debug!(
            file = %name,
            encoding = ?layout.encoding,
            width = layout.precision.bytes(),
            "writing field"
        );
        Ok((FieldWriter::new(sink, layout)?, self.path(&name)))
    }

    /// Write a numeric field file named after `stem` in the configured
    /// encoding, block by block.
    ///
    /// `provider(i)` supplies the column-major values of block `i`; it is
    /// called once per block in index order, so only one species is held
    /// in memory at a time. Returns the path written.
    pub fn write_field<F>(
        &mut self,
        stem: &str,
        kind: FileKind,
        shape: FieldShape,
        cell_count: usize,
        species_count: usize,
        mut provider: F,
    ) -> Result<PathBuf, CodecError>
    where
        F: FnMut(usize) -> Vec<f64>,
    {
        let (mut writer, path) =
            self.field_writer(stem, kind, shape, cell_count, species_count)?;
        for i in 0..writer.layout().species_count {
            writer.write_block(i, &provider(i))?;
        }
        writer.finish()?;
        Ok(path)
    }

    /// Read every block of `stem` if either variant exists.
    ///
    /// The header's cell count must equal `cell_count`. Returns `None` when
    /// neither file exists.
    pub fn read_field(
        &self,
        stem: &str,
        kind: FileKind,
        shape: FieldShape,
        cell_count: usize,
    ) -> Result<Option<Vec<Vec<f64>>>, CodecError> {
        let Some((name, encoding)) = self.probe(stem, kind) else {
            return Ok(None);
        };
        let reader = FieldReader::open(self.open(&name)?, encoding, shape)?;
        reader.check_cell_count(cell_count)?;
        Ok(Some(reader.read_all()?))
    }
}
