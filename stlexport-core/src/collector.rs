//! Gathers exportable meshes from a scene graph
use nalgebra::Matrix4;
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::geometry::{BufferGeometry, Geometry};
use crate::scene::{walk, SceneNode, SceneVisitor};

/// A mesh's geometry paired with its resolved world transform
#[derive(Debug, Clone, Copy)]
pub struct CollectedMesh<'a> {
    pub name: &'a str,
    pub geometry: &'a BufferGeometry,
    pub world_transform: Matrix4<f32>,
}

/// Meshes in traversal order plus the total number of triangles they hold
#[derive(Debug, Clone, Default)]
pub struct Collection<'a> {
    pub meshes: Vec<CollectedMesh<'a>>,
    pub triangle_count: usize,
}

impl<'a> SceneVisitor<'a> for Collection<'a> {
    type Error = ExportError;

    fn visit_mesh(&mut self, node: &'a SceneNode, geometry: &'a Geometry) -> ExportResult<()> {
        let geometry = match geometry {
            Geometry::Buffer(buffer) => buffer,
            Geometry::Faces(_) => {
                return Err(ExportError::UnsupportedGeometryKind {
                    node: node.name.clone(),
                })
            }
        };

        geometry
            .validate()
            .map_err(|defect| ExportError::MalformedGeometry {
                node: node.name.clone(),
                defect,
            })?;

        let triangles = geometry.triangle_count();
        debug!(
            mesh = %node.name,
            triangles,
            indexed = geometry.index.is_some(),
            "collected mesh"
        );

        self.triangle_count += triangles;
        self.meshes.push(CollectedMesh {
            name: &node.name,
            geometry,
            world_transform: node.matrix_world,
        });

        Ok(())
    }
}

/// Walk the scene and collect every mesh, validating its geometry.
///
/// Lights, cameras, groups, lines and points are skipped. Fails on the
/// first mesh whose geometry cannot be exported.
pub fn collect(scene: &SceneNode) -> ExportResult<Collection<'_>> {
    let mut collection = Collection::default();
    walk(scene, &mut collection)?;
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryDefect;
    use crate::geometry::{cube, tetrahedron, FaceGeometry};
    use crate::transform::Transform;
    use nalgebra::Point3;

    #[test]
    fn test_collect_skips_non_meshes() {
        let mut scene = SceneNode::group("root")
            .with_child(SceneNode::light("sun"))
            .with_child(SceneNode::camera("cam"))
            .with_child(SceneNode::line("edge", Geometry::from(tetrahedron(1.0))))
            .with_child(SceneNode::points("cloud", Geometry::from(tetrahedron(1.0))))
            .with_child(SceneNode::mesh("box", Geometry::from(cube(1.0))));
        scene.update_matrix_world();

        let collection = collect(&scene).unwrap();
        assert_eq!(collection.meshes.len(), 1);
        assert_eq!(collection.meshes[0].name, "box");
        assert_eq!(collection.triangle_count, 12);
    }

    #[test]
    fn test_collect_sums_triangles_in_order() {
        let mut scene = SceneNode::group("root")
            .with_child(SceneNode::mesh("first", Geometry::from(tetrahedron(1.0))))
            .with_child(
                SceneNode::group("nested")
                    .with_child(SceneNode::mesh("second", Geometry::from(cube(1.0)))),
            )
            .with_child(SceneNode::mesh("third", Geometry::from(tetrahedron(2.0))));
        scene.update_matrix_world();

        let collection = collect(&scene).unwrap();
        let names: Vec<_> = collection.meshes.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(collection.triangle_count, 4 + 12 + 4);
    }

    #[test]
    fn test_collect_records_world_transform() {
        let mut scene = SceneNode::group("root")
            .with_matrix(Transform::translation(0.0, 0.0, 5.0))
            .with_child(
                SceneNode::mesh("box", Geometry::from(cube(1.0)))
                    .with_matrix(Transform::uniform_scale(2.0)),
            );
        scene.update_matrix_world();

        let collection = collect(&scene).unwrap();
        assert_eq!(
            collection.meshes[0].world_transform,
            Transform::translation(0.0, 0.0, 5.0) * Transform::uniform_scale(2.0)
        );
    }

    #[test]
    fn test_collect_rejects_face_geometry() {
        let faces = FaceGeometry::new(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
        );
        let scene = SceneNode::group("root")
            .with_child(SceneNode::mesh("ok", Geometry::from(cube(1.0))))
            .with_child(SceneNode::mesh("legacy", Geometry::from(faces)));

        match collect(&scene) {
            Err(ExportError::UnsupportedGeometryKind { node }) => assert_eq!(node, "legacy"),
            other => panic!("expected UnsupportedGeometryKind, got {:?}", other),
        }
    }

    #[test]
    fn test_collect_ignores_face_geometry_on_non_mesh() {
        let faces = FaceGeometry::new(vec![Point3::origin()], Vec::new());
        let scene = SceneNode::group("root").with_child(SceneNode::line("legacy", Geometry::from(faces)));

        let collection = collect(&scene).unwrap();
        assert!(collection.meshes.is_empty());
        assert_eq!(collection.triangle_count, 0);
    }

    #[test]
    fn test_collect_rejects_malformed_index() {
        let scene = SceneNode::mesh("bad", Geometry::from(cube(1.0).with_index(vec![0, 1])));

        match collect(&scene) {
            Err(ExportError::MalformedGeometry { node, defect }) => {
                assert_eq!(node, "bad");
                assert_eq!(defect, GeometryDefect::IndexLength(2));
            }
            other => panic!("expected MalformedGeometry, got {:?}", other),
        }
    }
}
