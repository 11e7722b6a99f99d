//! stlexport core library - scene graph to STL export
//!
//! Walks a scene graph, collects its triangle meshes with their world
//! transforms, and encodes them as a single binary or ASCII STL solid.
//!
//! ```
//! use stlexport_core::{cube, export, ExportOptions, Geometry, SceneNode, Transform};
//!
//! let mut scene = SceneNode::group("root").with_child(
//!     SceneNode::mesh("box", Geometry::from(cube(10.0)))
//!         .with_matrix(Transform::translation(0.0, 0.0, 5.0)),
//! );
//! scene.update_matrix_world();
//!
//! let stl = export(&scene, &ExportOptions::binary()).unwrap();
//! assert_eq!(stl.len(), 84 + 50 * 12);
//! ```

pub mod ascii;
pub mod binary;
pub mod collector;
pub mod error;
pub mod export;
pub mod geometry;
pub mod reader;
pub mod scene;
pub mod serializer;
pub mod transform;

// Re-export commonly used types
pub use binary::set_binary_header;
pub use collector::{collect, CollectedMesh, Collection};
pub use error::{ExportError, ExportResult, GeometryDefect, ReadError, ReadResult};
pub use export::{export, ExportOptions, StlOutput};
pub use geometry::{cube, tetrahedron, BufferAttribute, BufferGeometry, FaceGeometry, Geometry, Triangle};
pub use reader::{read_stl, Facet};
pub use scene::{walk, NodeKind, SceneNode, SceneVisitor};
pub use transform::{EulerRotation, Transform};
