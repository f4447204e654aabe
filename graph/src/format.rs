use std::{fs::File, io, path::Path};

use serde::{Deserialize, Serialize};
use witcalc_number::{FieldElement, KnownField};

use crate::Graph;

// This is the magic number for the .graph file format. It spells "witcalc"
// in ASCII.
const MAGIC: [u8; 7] = [0x77, 0x69, 0x74, 0x63, 0x61, 0x6c, 0x63];

/// Bumped on incompatible changes to the encoding of [Graph].
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("failed to access graph file: {0}")]
    Io(#[from] io::Error),
    #[error("not a graph file (bad magic number)")]
    BadMagic,
    #[error("unsupported graph format version {actual}, expected {expected}")]
    UnsupportedVersion { expected: u32, actual: u32 },
    #[error("graph is defined over field {actual}, expected {expected}")]
    FieldMismatch {
        expected: KnownField,
        actual: KnownField,
    },
    #[error("failed to decode graph file: {0}")]
    Codec(#[from] serde_cbor::Error),
    #[error("invalid graph: {0}")]
    Invalid(String),
}

/// The on-disk envelope of a compiled circuit: magic number, format
/// version and field tag around the CBOR-encoded [Graph].
#[derive(Serialize, Deserialize)]
pub struct SerializedGraph {
    magic: [u8; 7],
    version: u32,
    field: KnownField,
    graph: Vec<u8>,
}

impl<T: FieldElement> TryFrom<&Graph<T>> for SerializedGraph {
    type Error = FormatError;

    fn try_from(graph: &Graph<T>) -> Result<Self, Self::Error> {
        Ok(Self {
            magic: MAGIC,
            version: FORMAT_VERSION,
            field: T::known_field(),
            graph: serde_cbor::to_vec(graph)?,
        })
    }
}

impl<T: FieldElement> TryFrom<SerializedGraph> for Graph<T> {
    type Error = FormatError;

    fn try_from(serialized: SerializedGraph) -> Result<Self, Self::Error> {
        serialized.check::<T>()?;
        let graph: Graph<T> = serde_cbor::from_slice(&serialized.graph)?;
        graph.validate().map_err(FormatError::Invalid)?;
        Ok(graph)
    }
}

impl SerializedGraph {
    /// The field tag of the envelope. Available without committing to an
    /// element type, so callers can dispatch on it.
    pub fn field(&self) -> KnownField {
        self.field
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Checks magic number and format version.
    pub fn check_envelope(&self) -> Result<(), FormatError> {
        if self.magic != MAGIC {
            return Err(FormatError::BadMagic);
        }
        if self.version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion {
                expected: FORMAT_VERSION,
                actual: self.version,
            });
        }
        Ok(())
    }

    /// Checks the envelope and that the payload is defined over `T`.
    pub fn check<T: FieldElement>(&self) -> Result<(), FormatError> {
        self.check_envelope()?;
        if self.field != T::known_field() {
            return Err(FormatError::FieldMismatch {
                expected: T::known_field(),
                actual: self.field,
            });
        }
        Ok(())
    }

    pub fn serialize_to(&self, path: &Path) -> Result<(), FormatError> {
        serde_cbor::to_writer(&mut File::create(path)?, self)?;
        Ok(())
    }

    pub fn deserialize_from(path: &Path) -> Result<Self, FormatError> {
        let serialized: Self = serde_cbor::from_reader(File::open(path)?)?;
        serialized.check_envelope()?;
        Ok(serialized)
    }
}

/// Writes a graph with its format envelope to the given path.
pub fn write_graph_file<T: FieldElement>(path: &Path, graph: &Graph<T>) -> Result<(), FormatError> {
    SerializedGraph::try_from(graph)?.serialize_to(path)?;
    log::debug!("Wrote graph file {}", path.display());
    Ok(())
}

/// Reads and validates a graph from the given path.
pub fn read_graph_file<T: FieldElement>(path: &Path) -> Result<Graph<T>, FormatError> {
    let graph: Graph<T> = SerializedGraph::deserialize_from(path)?.try_into()?;
    log::debug!(
        "Loaded graph file {} ({} nodes, witness length {})",
        path.display(),
        graph.nodes.len(),
        graph.witness.len()
    );
    Ok(graph)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::GraphBuilder;
    use pretty_assertions::assert_eq;
    use test_log::test;
    use witcalc_number::{Bls12_381Field, Bn254Field};

    fn sum_graph<T: FieldElement>() -> Graph<T> {
        let mut builder = GraphBuilder::new();
        let xs = builder.input("x", 3).unwrap();
        let partial = builder.add(xs[0], xs[1]);
        let sum = builder.add(partial, xs[2]);
        builder.output(sum);
        builder.build().unwrap()
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sum.graph");

        let graph = sum_graph::<Bn254Field>();
        write_graph_file(&path, &graph).unwrap();
        let read: Graph<Bn254Field> = read_graph_file(&path).unwrap();

        assert_eq!(read, graph);
    }

    #[test]
    fn field_mismatch_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sum.graph");

        write_graph_file(&path, &sum_graph::<Bn254Field>()).unwrap();
        let err = read_graph_file::<Bls12_381Field>(&path).unwrap_err();

        assert!(
            matches!(
                err,
                FormatError::FieldMismatch {
                    expected: KnownField::Bls12_381,
                    actual: KnownField::Bn254,
                }
            ),
            "{err}"
        );
    }

    #[test]
    fn bad_magic_is_detected() {
        let serialized = SerializedGraph {
            magic: *b"wrong!!",
            version: FORMAT_VERSION,
            field: KnownField::Bn254,
            graph: vec![],
        };
        assert!(matches!(
            serialized.check::<Bn254Field>(),
            Err(FormatError::BadMagic)
        ));
    }

    #[test]
    fn unsupported_version_is_detected() {
        let serialized = SerializedGraph {
            magic: MAGIC,
            version: FORMAT_VERSION + 1,
            field: KnownField::Bn254,
            graph: vec![],
        };
        assert!(matches!(
            serialized.check::<Bn254Field>(),
            Err(FormatError::UnsupportedVersion {
                expected: FORMAT_VERSION,
                ..
            })
        ));
    }

    #[test]
    fn truncated_file_is_a_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.graph");
        std::fs::write(&path, b"not a graph").unwrap();

        let err = read_graph_file::<Bn254Field>(&path).unwrap_err();
        assert!(matches!(err, FormatError::Codec(_)), "{err}");
    }

    #[test]
    fn tampered_payload_fails_validation() {
        let mut graph = sum_graph::<Bn254Field>();
        graph.witness.push(crate::NodeId(999));

        let serialized = SerializedGraph {
            magic: MAGIC,
            version: FORMAT_VERSION,
            field: KnownField::Bn254,
            graph: serde_cbor::to_vec(&graph).unwrap(),
        };
        let err = Graph::<Bn254Field>::try_from(serialized).unwrap_err();
        assert!(matches!(err, FormatError::Invalid(_)), "{err}");
    }
}
