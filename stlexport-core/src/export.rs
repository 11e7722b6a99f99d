//! Scene to STL export entry point
use std::io::{self, Write};

use tracing::debug;

use crate::ascii::AsciiWriter;
use crate::binary::BinaryWriter;
use crate::collector::collect;
use crate::error::{ExportError, ExportResult};
use crate::scene::SceneNode;
use crate::serializer::serialize;

/// Export configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Emit binary STL instead of ASCII
    pub binary: bool,
}

impl ExportOptions {
    pub fn binary() -> Self {
        Self { binary: true }
    }

    pub fn ascii() -> Self {
        Self { binary: false }
    }
}

/// The encoded STL document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StlOutput {
    Binary(Vec<u8>),
    Ascii(String),
}

impl StlOutput {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            StlOutput::Binary(bytes) => bytes,
            StlOutput::Ascii(text) => text.as_bytes(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            StlOutput::Binary(bytes) => bytes,
            StlOutput::Ascii(text) => text.into_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, StlOutput::Binary(_))
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.as_bytes())
    }
}

/// Export every mesh in `scene` as a single STL solid.
///
/// Meshes are written in depth-first order using their `matrix_world`.
/// The scene is fully validated before any output is produced.
pub fn export(scene: &SceneNode, options: &ExportOptions) -> ExportResult<StlOutput> {
    let collection = collect(scene)?;
    debug!(
        meshes = collection.meshes.len(),
        triangles = collection.triangle_count,
        binary = options.binary,
        "exporting scene"
    );

    let output = if options.binary {
        let count = u32::try_from(collection.triangle_count)
            .map_err(|_| ExportError::TooManyTriangles(collection.triangle_count))?;
        let mut writer = BinaryWriter::new(count);
        let written = serialize(&collection.meshes, &mut writer);
        debug_assert_eq!(written, collection.triangle_count);
        StlOutput::Binary(writer.finish())
    } else {
        let mut writer = AsciiWriter::new();
        serialize(&collection.meshes, &mut writer);
        StlOutput::Ascii(writer.finish())
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::encoded_len;
    use crate::geometry::{cube, Geometry};

    #[test]
    fn test_default_is_ascii() {
        assert_eq!(ExportOptions::default(), ExportOptions::ascii());
        assert!(!ExportOptions::default().binary);
    }

    #[test]
    fn test_export_binary_cube() {
        let mut scene = SceneNode::mesh("box", Geometry::from(cube(1.0)));
        scene.update_matrix_world();

        let output = export(&scene, &ExportOptions::binary()).unwrap();
        assert!(output.is_binary());
        assert_eq!(output.len(), encoded_len(12));
        assert_eq!(&output.as_bytes()[80..84], &12u32.to_le_bytes());
    }

    #[test]
    fn test_export_ascii_cube_facets() {
        let scene = SceneNode::mesh("box", Geometry::from(cube(1.0)));

        let output = export(&scene, &ExportOptions::ascii()).unwrap();
        let StlOutput::Ascii(text) = output else {
            panic!("expected ASCII output");
        };
        assert!(text.starts_with("solid exported\n"));
        assert!(text.ends_with("endsolid exported\n"));
        assert_eq!(text.matches("\tfacet normal").count(), 12);
        assert_eq!(text.matches("\t\t\tvertex").count(), 36);
    }

    #[test]
    fn test_write_to() {
        let output = StlOutput::Ascii("solid exported\nendsolid exported\n".to_string());
        let mut sink = Vec::new();
        output.write_to(&mut sink).unwrap();
        assert_eq!(sink, output.clone().into_bytes());
        assert!(!output.is_empty());
    }
}
