//! Reader and writer for the `.wtns` binary witness format.
//!
//! The layout is: the magic number `wtns`, a version, a section count and
//! two sections. Section 1 carries the field byte width, the prime in
//! little-endian bytes and the number of values; section 2 carries the
//! values, each in canonical little-endian encoding.

use std::io::{self, Read, Write};

use witcalc_number::FieldElement;

const MAGIC: [u8; 4] = *b"wtns";
const VERSION: u32 = 2;
const N_SECTIONS: u32 = 2;
const HEADER_SECTION: u32 = 1;
const VALUES_SECTION: u32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum WtnsError {
    #[error("failed to access witness file: {0}")]
    Io(#[from] io::Error),
    #[error("witness file ends prematurely")]
    Truncated,
    #[error("not a witness file (bad magic number)")]
    BadMagic,
    #[error("unsupported witness file version {0}")]
    UnsupportedVersion(u32),
    #[error("expected {expected} sections, found {actual}")]
    SectionCount { expected: u32, actual: u32 },
    #[error("expected section {expected}, found section {actual}")]
    UnexpectedSection { expected: u32, actual: u32 },
    #[error("section {section} has length {actual}, expected {expected}")]
    SectionLength {
        section: u32,
        expected: u64,
        actual: u64,
    },
    #[error("witness file prime does not match the target field")]
    PrimeMismatch,
    #[error("invalid field element in witness file: {0}")]
    BadElement(String),
}

/// Writes witness values in `.wtns` layout.
pub fn write_wtns<T: FieldElement>(mut writer: impl Write, values: &[T]) -> Result<(), WtnsError> {
    let prime = T::modulus().to_bytes_le();
    let n8 = prime.len() as u32;

    writer.write_all(&MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&N_SECTIONS.to_le_bytes())?;

    writer.write_all(&HEADER_SECTION.to_le_bytes())?;
    writer.write_all(&(8 + n8 as u64).to_le_bytes())?;
    writer.write_all(&n8.to_le_bytes())?;
    writer.write_all(&prime)?;
    writer.write_all(&(values.len() as u32).to_le_bytes())?;

    writer.write_all(&VALUES_SECTION.to_le_bytes())?;
    writer.write_all(&(values.len() as u64 * n8 as u64).to_le_bytes())?;
    for value in values {
        writer.write_all(&value.to_bytes_le())?;
    }

    Ok(())
}

/// Reads witness values, checking that the file's prime matches `T`.
pub fn read_wtns<T: FieldElement>(mut reader: impl Read) -> Result<Vec<T>, WtnsError> {
    let mut magic = [0u8; 4];
    read_exact(&mut reader, &mut magic)?;
    if magic != MAGIC {
        return Err(WtnsError::BadMagic);
    }
    let version = read_u32(&mut reader)?;
    if version != VERSION {
        return Err(WtnsError::UnsupportedVersion(version));
    }
    let sections = read_u32(&mut reader)?;
    if sections != N_SECTIONS {
        return Err(WtnsError::SectionCount {
            expected: N_SECTIONS,
            actual: sections,
        });
    }

    expect_section(&mut reader, HEADER_SECTION)?;
    let length = read_u64(&mut reader)?;
    let n8 = read_u32(&mut reader)?;
    if length != 8 + n8 as u64 {
        return Err(WtnsError::SectionLength {
            section: HEADER_SECTION,
            expected: 8 + n8 as u64,
            actual: length,
        });
    }
    let mut prime = vec![0u8; n8 as usize];
    read_exact(&mut reader, &mut prime)?;
    if prime != T::modulus().to_bytes_le() {
        return Err(WtnsError::PrimeMismatch);
    }
    let count = read_u32(&mut reader)?;

    expect_section(&mut reader, VALUES_SECTION)?;
    let length = read_u64(&mut reader)?;
    let expected = count as u64 * n8 as u64;
    if length != expected {
        return Err(WtnsError::SectionLength {
            section: VALUES_SECTION,
            expected,
            actual: length,
        });
    }

    let mut values = Vec::with_capacity(count as usize);
    let mut buf = vec![0u8; n8 as usize];
    for _ in 0..count {
        read_exact(&mut reader, &mut buf)?;
        values.push(T::from_bytes_le(&buf).map_err(WtnsError::BadElement)?);
    }
    Ok(values)
}

fn expect_section(reader: &mut impl Read, expected: u32) -> Result<(), WtnsError> {
    let actual = read_u32(reader)?;
    if actual != expected {
        return Err(WtnsError::UnexpectedSection { expected, actual });
    }
    Ok(())
}

fn read_u32(reader: &mut impl Read) -> Result<u32, WtnsError> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64(reader: &mut impl Read) -> Result<u64, WtnsError> {
    let mut buf = [0u8; 8];
    read_exact(reader, &mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_exact(reader: &mut impl Read, buf: &mut [u8]) -> Result<(), WtnsError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => WtnsError::Truncated,
        _ => WtnsError::Io(e),
    })
}
