//! Companion descriptor files.
//!
//! Multi-species numeric files carry only a species count. The positional
//! names come from a sibling text descriptor, which must therefore be
//! parsed before the numeric file:
//!
//! - `dustopac.inp`: one entry per dust species, separated by rule lines
//! - `line.inp`: one record per molecule plus its collision partners

use std::io::{BufRead, Write};

use tracing::debug;

use crate::codec::parse_int;
use crate::error::CodecError;
use crate::files;
use crate::io::IoContext;

/// Format version of both descriptor files.
pub const DESCRIPTOR_FORMAT: i64 = 2;

/// Separator line between dust entries.
const RULE: &str = "================================================================================";

/// One dust species in `dustopac.inp`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DustOpacityEntry {
    /// Opacity file input style. Lumen writes 1 (`dustkappa_<name>.inp`).
    pub input_style: i64,
    /// Quantum-heating flag. Lumen writes 0 (thermal grains).
    pub quantum: i64,
    /// Species name, which is also the opacity file suffix.
    pub name: String,
}

impl DustOpacityEntry {
    /// A thermal grain species read from a `dustkappa_<name>.inp` table.
    pub fn thermal(name: impl Into<String>) -> Self {
        Self {
            input_style: 1,
            quantum: 0,
            name: name.into(),
        }
    }
}

/// One molecule in `line.inp`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineEntry {
    /// Molecule name; the number-density file is `numberdens_<name>`.
    pub name: String,
    /// Molecular data input style, e.g. `"leiden"`.
    pub input_style: String,
    /// First solver flag.
    pub flag_a: i64,
    /// Second solver flag.
    pub flag_b: i64,
    /// Collision partner names.
    pub partners: Vec<String>,
}

fn is_rule(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '=' || c == '-')
}

/// Non-blank, non-rule lines, trimmed.
fn content_lines(r: &mut dyn BufRead) -> Result<Vec<String>, CodecError> {
    let mut out = Vec::new();
    for line in r.lines() {
        let line = line?;
        let t = line.trim();
        if !t.is_empty() && !is_rule(t) {
            out.push(t.to_string());
        }
    }
    Ok(out)
}

fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

fn eof(what: &str) -> CodecError {
    CodecError::MalformedHeader {
        detail: format!("descriptor ended before {what}"),
    }
}

/// Read `[format, count]` from the front of a descriptor.
fn descriptor_header<'a>(
    lines: &mut impl Iterator<Item = &'a String>,
) -> Result<usize, CodecError> {
    let format = parse_int(first_token(lines.next().ok_or_else(|| eof("format"))?))?;
    if format != DESCRIPTOR_FORMAT {
        return Err(CodecError::UnrecognizedFormat { found: format });
    }
    let count = parse_int(first_token(lines.next().ok_or_else(|| eof("count"))?))?;
    usize::try_from(count).map_err(|_| CodecError::MalformedHeader {
        detail: format!("negative species count {count}"),
    })
}

/// Encode `dustopac.inp`.
pub fn encode_dust_opacities(
    w: &mut dyn Write,
    entries: &[DustOpacityEntry],
) -> Result<(), CodecError> {
    writeln!(w, "{DESCRIPTOR_FORMAT}")?;
    writeln!(w, "{}", entries.len())?;
    writeln!(w, "{RULE}")?;
    for e in entries {
        writeln!(w, "{}", e.input_style)?;
        writeln!(w, "{}", e.quantum)?;
        writeln!(w, "{}", e.name)?;
        writeln!(w, "{RULE}")?;
    }
    Ok(())
}

/// Decode `dustopac.inp`, in file order.
pub fn decode_dust_opacities(r: &mut dyn BufRead) -> Result<Vec<DustOpacityEntry>, CodecError> {
    let lines = content_lines(r)?;
    let mut it = lines.iter();
    let count = descriptor_header(&mut it)?;
    let mut entries = Vec::new();
    for _ in 0..count {
        let input_style = parse_int(first_token(it.next().ok_or_else(|| eof("input style"))?))?;
        let quantum = parse_int(first_token(it.next().ok_or_else(|| eof("quantum flag"))?))?;
        let name = first_token(it.next().ok_or_else(|| eof("species name"))?).to_string();
        entries.push(DustOpacityEntry {
            input_style,
            quantum,
            name,
        });
    }
    Ok(entries)
}

/// Encode `line.inp`.
pub fn encode_lines(w: &mut dyn Write, entries: &[LineEntry]) -> Result<(), CodecError> {
    writeln!(w, "{DESCRIPTOR_FORMAT}")?;
    writeln!(w, "{}", entries.len())?;
    for e in entries {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            e.name,
            e.input_style,
            e.flag_a,
            e.flag_b,
            e.partners.len()
        )?;
        for p in &e.partners {
            writeln!(w, "{p}")?;
        }
    }
    Ok(())
}

/// Decode `line.inp`, in file order.
pub fn decode_lines(r: &mut dyn BufRead) -> Result<Vec<LineEntry>, CodecError> {
    let lines = content_lines(r)?;
    let mut it = lines.iter();
    let count = descriptor_header(&mut it)?;
    let mut entries = Vec::new();
    for _ in 0..count {
        let record = it.next().ok_or_else(|| eof("molecule record"))?;
        let fields: Vec<&str> = record.split_whitespace().collect();
        let &[name, style, a, b, n] = fields.as_slice() else {
            return Err(CodecError::MalformedHeader {
                detail: format!("expected 5 fields in line record, got {record:?}"),
            });
        };
        let n = usize::try_from(parse_int(n)?).map_err(|_| CodecError::MalformedHeader {
            detail: format!("negative partner count in {record:?}"),
        })?;
        let partners = (0..n)
            .map(|_| {
                it.next()
                    .map(|p| first_token(p).to_string())
                    .ok_or_else(|| eof("collision partner"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        entries.push(LineEntry {
            name: name.to_string(),
            input_style: style.to_string(),
            flag_a: parse_int(a)?,
            flag_b: parse_int(b)?,
            partners,
        });
    }
    Ok(entries)
}

impl IoContext {
    /// Write `dustopac.inp` into the output directory.
    pub fn write_dust_opacities(&mut self, entries: &[DustOpacityEntry]) -> Result<(), CodecError> {
        let mut w = self.create(files::DUST_OPACITY)?;
        encode_dust_opacities(&mut w, entries)?;
        w.flush()?;
        debug!(species = entries.len(), "wrote dust opacity descriptor");
        Ok(())
    }

    /// Read `dustopac.inp`; absence is [`CodecError::MissingDescriptor`].
    pub fn read_dust_opacities(&self) -> Result<Vec<DustOpacityEntry>, CodecError> {
        if !self.exists(files::DUST_OPACITY) {
            return Err(CodecError::MissingDescriptor {
                path: self.path(files::DUST_OPACITY),
            });
        }
        decode_dust_opacities(&mut self.open(files::DUST_OPACITY)?)
    }

    /// Write `line.inp` into the output directory.
    pub fn write_lines(&mut self, entries: &[LineEntry]) -> Result<(), CodecError> {
        let mut w = self.create(files::LINES)?;
        encode_lines(&mut w, entries)?;
        w.flush()?;
        debug!(species = entries.len(), "wrote line descriptor");
        Ok(())
    }

    /// Read `line.inp`; absence is [`CodecError::MissingDescriptor`].
    pub fn read_lines(&self) -> Result<Vec<LineEntry>, CodecError> {
        if !self.exists(files::LINES) {
            return Err(CodecError::MissingDescriptor {
                path: self.path(files::LINES),
            });
        }
        decode_lines(&mut self.open(files::LINES)?)
    }
}
