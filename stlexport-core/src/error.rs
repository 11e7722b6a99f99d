//! Error types for exporting and reading STL data

use thiserror::Error;

/// Shape problems found while validating a buffer geometry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryDefect {
    #[error("geometry has no position attribute")]
    MissingPosition,

    #[error("position attribute has item size {0}, expected 3")]
    PositionItemSize(usize),

    #[error("position array length {len} is not a multiple of item size {item_size}")]
    RaggedPosition { len: usize, item_size: usize },

    #[error("index length {0} is not a multiple of 3")]
    IndexLength(usize),

    #[error("non-indexed vertex count {0} is not a multiple of 3")]
    VertexCount(usize),

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Errors that abort an export. No partial output is produced.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A mesh carries face-list geometry instead of buffer geometry
    #[error("mesh '{node}': geometry is not a buffer geometry")]
    UnsupportedGeometryKind { node: String },

    /// A mesh's buffer geometry cannot be triangulated safely
    #[error("mesh '{node}': malformed geometry: {defect}")]
    MalformedGeometry {
        node: String,
        #[source]
        defect: GeometryDefect,
    },

    /// The binary header stores the triangle count as a u32
    #[error("{0} triangles exceed the binary STL limit of u32::MAX")]
    TooManyTriangles(usize),
}

/// Errors raised while reading STL data back
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("data is {0} bytes, too small to be a binary STL")]
    TooShort(usize),

    #[error("binary STL truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

pub type ReadResult<T> = std::result::Result<T, ReadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExportError::UnsupportedGeometryKind {
            node: "bracket".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "mesh 'bracket': geometry is not a buffer geometry"
        );

        let err = ExportError::MalformedGeometry {
            node: "plate".to_string(),
            defect: GeometryDefect::IndexLength(7),
        };
        assert!(err.to_string().contains("plate"));
        assert!(err.to_string().contains("index length 7"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExportError>();
        assert_send_sync::<ReadError>();
    }
}
