//! Field-file integration tests.
//!
//! Each test writes through the public writer API and reads back through
//! [`FieldReader`], in both encodings, checking that the two encodings
//! agree value for value.

use std::io::Cursor;

use lumen_codec::{
    write_blocks, CodecError, Encoding, FieldLayout, FieldReader, FieldShape, FieldWriter,
    Precision,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────

fn encode(encoding: Encoding, precision: Precision, shape: FieldShape, blocks: &[Vec<f64>]) -> Vec<u8> {
    let cells = blocks[0].len() / shape.components;
    let layout = FieldLayout::new(encoding, precision, shape, cells, blocks.len());
    write_blocks(Cursor::new(Vec::new()), layout, |i| blocks[i].clone())
        .unwrap()
        .into_inner()
}

fn decode(bytes: Vec<u8>, encoding: Encoding, shape: FieldShape) -> Vec<Vec<f64>> {
    FieldReader::open(Cursor::new(bytes), encoding, shape)
        .unwrap()
        .read_all()
        .unwrap()
}

// ── Concrete layouts ────────────────────────────────────────────

#[test]
fn single_species_binary_bytes() {
    let bytes = encode(
        Encoding::Binary,
        Precision::Double,
        FieldShape::SPECIES,
        &[vec![1e-18, 1e-18]],
    );
    let ints: Vec<i64> = bytes[..32]
        .chunks_exact(8)
        .map(|c| i64::from_le_bytes(c.try_into().unwrap()))
        .collect();
    assert_eq!(ints, vec![1, 8, 2, 1]);
    assert_eq!(bytes.len(), 48);
    assert_eq!(f64::from_le_bytes(bytes[40..48].try_into().unwrap()), 1e-18);
}

#[test]
fn species_offsets_in_multi_species_file() {
    let cells = 5;
    let blocks: Vec<Vec<f64>> = (0..4).map(|s| vec![s as f64 + 0.5; cells]).collect();
    let bytes = encode(Encoding::Binary, Precision::Single, FieldShape::SPECIES, &blocks);
    let layout = FieldLayout::new(Encoding::Binary, Precision::Single, FieldShape::SPECIES, cells, 4);
    for s in 0..4 {
        let off = layout.block_offset(s) as usize;
        let first = f32::from_le_bytes(bytes[off..off + 4].try_into().unwrap());
        assert_eq!(first, s as f32 + 0.5);
    }
}

#[test]
fn vector_field_interleaved_on_disk() {
    let body = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let bytes = encode(Encoding::Ascii, Precision::Double, FieldShape::VECTOR, &[body.clone()]);
    let text = String::from_utf8(bytes.clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(&lines[..2], &["1", "2"]);
    assert_eq!(decode(bytes, Encoding::Ascii, FieldShape::VECTOR), vec![body]);
}

#[test]
fn binary_writer_accepts_any_block_order() {
    let layout = FieldLayout::new(Encoding::Binary, Precision::Double, FieldShape::SPECIES, 3, 3);
    let mut w = FieldWriter::new(Cursor::new(Vec::new()), layout).unwrap();
    for i in [2, 0, 1] {
        w.write_block(i, &[i as f64; 3]).unwrap();
    }
    let bytes = w.finish().unwrap().into_inner();
    let blocks = decode(bytes, Encoding::Binary, FieldShape::SPECIES);
    assert_eq!(blocks, vec![vec![0.0; 3], vec![1.0; 3], vec![2.0; 3]]);
}

#[test]
fn bad_precision_field_rejected() {
    let mut bytes = encode(Encoding::Binary, Precision::Double, FieldShape::SCALAR, &[vec![1.0]]);
    bytes[8..16].copy_from_slice(&3i64.to_le_bytes());
    let err = FieldReader::open(Cursor::new(bytes), Encoding::Binary, FieldShape::SCALAR)
        .err()
        .unwrap();
    assert!(matches!(err, CodecError::InvalidPrecision { found: 3 }));
}

#[test]
fn fortran_exponents_in_ascii_body() {
    let text = "1\n2\n1\n1.5D-3\n2.0d+2\n";
    let blocks = decode(text.as_bytes().to_vec(), Encoding::Ascii, FieldShape::SPECIES);
    assert_eq!(blocks, vec![vec![1.5e-3, 200.0]]);
}

// ── Properties ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn ascii_and_double_binary_agree(
        species in 1usize..4,
        cells in 1usize..16,
        seed in proptest::collection::vec(-1e30f64..1e30, 64),
    ) {
        let blocks: Vec<Vec<f64>> = (0..species)
            .map(|s| (0..cells).map(|c| seed[(s * cells + c) % seed.len()]).collect())
            .collect();
        let ascii = decode(
            encode(Encoding::Ascii, Precision::Double, FieldShape::SPECIES, &blocks),
            Encoding::Ascii,
            FieldShape::SPECIES,
        );
        let binary = decode(
            encode(Encoding::Binary, Precision::Double, FieldShape::SPECIES, &blocks),
            Encoding::Binary,
            FieldShape::SPECIES,
        );
        prop_assert_eq!(&ascii, &blocks);
        prop_assert_eq!(&binary, &blocks);
    }

    #[test]
    fn single_precision_within_f32_rounding(values in proptest::collection::vec(-1e20f64..1e20, 1..32)) {
        let bytes = encode(Encoding::Binary, Precision::Single, FieldShape::SCALAR, &[values.clone()]);
        let back = decode(bytes, Encoding::Binary, FieldShape::SCALAR);
        for (a, b) in values.iter().zip(&back[0]) {
            prop_assert_eq!(*a as f32 as f64, *b);
        }
    }
}
