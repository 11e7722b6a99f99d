//! Geometry primitives consumed by the exporter
use std::collections::BTreeMap;

use nalgebra::{Point3, Vector3};

use crate::error::GeometryDefect;

/// Name of the attribute holding vertex positions
pub const POSITION: &str = "position";

/// A flat array of per-vertex values, `item_size` components per vertex
#[derive(Debug, Clone, PartialEq)]
pub struct BufferAttribute {
    pub array: Vec<f32>,
    pub item_size: usize,
}

impl BufferAttribute {
    pub fn new(array: Vec<f32>, item_size: usize) -> Self {
        Self { array, item_size }
    }

    /// Build a 3-component attribute from points
    pub fn from_points(points: &[Point3<f32>]) -> Self {
        let mut array = Vec::with_capacity(points.len() * 3);
        for p in points {
            array.extend_from_slice(&[p.x, p.y, p.z]);
        }
        Self::new(array, 3)
    }

    /// Number of vertices stored in the attribute
    pub fn count(&self) -> usize {
        if self.item_size == 0 {
            0
        } else {
            self.array.len() / self.item_size
        }
    }

    /// Read the first three components of vertex `i`
    pub fn xyz(&self, i: usize) -> Point3<f32> {
        let base = i * self.item_size;
        Point3::new(self.array[base], self.array[base + 1], self.array[base + 2])
    }
}

/// Geometry stored as flat attribute buffers with an optional index buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferGeometry {
    pub attributes: BTreeMap<String, BufferAttribute>,
    pub index: Option<Vec<u32>>,
}

impl BufferGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-indexed geometry: every three positions form one triangle
    pub fn from_positions(positions: &[Point3<f32>]) -> Self {
        let mut geometry = Self::new();
        geometry.set_attribute(POSITION, BufferAttribute::from_points(positions));
        geometry
    }

    pub fn with_index(mut self, index: Vec<u32>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn set_attribute(&mut self, name: &str, attribute: BufferAttribute) {
        self.attributes.insert(name.to_string(), attribute);
    }

    pub fn attribute(&self, name: &str) -> Option<&BufferAttribute> {
        self.attributes.get(name)
    }

    pub fn position(&self) -> Option<&BufferAttribute> {
        self.attribute(POSITION)
    }

    /// Triangles described by this geometry, `index.len() / 3` when indexed
    pub fn triangle_count(&self) -> usize {
        match &self.index {
            Some(index) => index.len() / 3,
            None => self.position().map_or(0, |p| p.count() / 3),
        }
    }

    /// Check the shape invariants the serializer relies on.
    ///
    /// Returns the first defect found; a geometry that passes can be
    /// triangulated without any out-of-range reads.
    pub fn validate(&self) -> Result<(), GeometryDefect> {
        let position = self.position().ok_or(GeometryDefect::MissingPosition)?;

        if position.item_size != 3 {
            return Err(GeometryDefect::PositionItemSize(position.item_size));
        }
        if position.array.len() % position.item_size != 0 {
            return Err(GeometryDefect::RaggedPosition {
                len: position.array.len(),
                item_size: position.item_size,
            });
        }

        let vertex_count = position.count();
        match &self.index {
            Some(index) => {
                if index.len() % 3 != 0 {
                    return Err(GeometryDefect::IndexLength(index.len()));
                }
                if let Some(&bad) = index.iter().find(|&&i| i as usize >= vertex_count) {
                    return Err(GeometryDefect::IndexOutOfRange {
                        index: bad,
                        vertex_count,
                    });
                }
            }
            None => {
                if vertex_count % 3 != 0 {
                    return Err(GeometryDefect::VertexCount(vertex_count));
                }
            }
        }

        Ok(())
    }
}

/// Legacy face-list geometry: shared vertices plus per-face vertex indices.
///
/// The exporter rejects this representation; convert it with
/// [`FaceGeometry::to_buffer_geometry`] first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceGeometry {
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<[u32; 3]>,
}

impl FaceGeometry {
    pub fn new(vertices: Vec<Point3<f32>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Convert to an indexed buffer geometry with the same winding
    pub fn to_buffer_geometry(&self) -> BufferGeometry {
        let index = self.faces.iter().flatten().copied().collect();
        BufferGeometry::from_positions(&self.vertices).with_index(index)
    }
}

/// The geometry representations a scene node may carry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Buffer(BufferGeometry),
    Faces(FaceGeometry),
}

impl From<BufferGeometry> for Geometry {
    fn from(geometry: BufferGeometry) -> Self {
        Geometry::Buffer(geometry)
    }
}

impl From<FaceGeometry> for Geometry {
    fn from(geometry: FaceGeometry) -> Self {
        Geometry::Faces(geometry)
    }
}

/// A triangle defined by three positions in winding order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point3<f32>,
    pub b: Point3<f32>,
    pub c: Point3<f32>,
}

impl Triangle {
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self { a, b, c }
    }

    /// Unit face normal from the edges `c - b` and `a - b`.
    ///
    /// Degenerate triangles yield the zero vector.
    pub fn face_normal(&self) -> Vector3<f32> {
        face_normal(&self.a, &self.b, &self.c)
    }
}

pub(crate) fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let cb = c - b;
    let ab = a - b;

    cb.cross(&ab).try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

/// Create an indexed cube centred on the origin, outward-facing winding
pub fn cube(size: f32) -> BufferGeometry {
    let h = size / 2.0;
    let vertices = [
        Point3::new(-h, -h, -h),
        Point3::new(h, -h, -h),
        Point3::new(h, h, -h),
        Point3::new(-h, h, -h),
        Point3::new(-h, -h, h),
        Point3::new(h, -h, h),
        Point3::new(h, h, h),
        Point3::new(-h, h, h),
    ];

    #[rustfmt::skip]
    let index = vec![
        // Front (+z)
        4, 5, 6,  4, 6, 7,
        // Back (-z)
        0, 3, 2,  0, 2, 1,
        // Top (+y)
        3, 7, 6,  3, 6, 2,
        // Bottom (-y)
        0, 1, 5,  0, 5, 4,
        // Right (+x)
        1, 2, 6,  1, 6, 5,
        // Left (-x)
        0, 4, 7,  0, 7, 3,
    ];

    BufferGeometry::from_positions(&vertices).with_index(index)
}

/// Create a non-indexed regular tetrahedron with vertices `size` from the origin
pub fn tetrahedron(size: f32) -> BufferGeometry {
    let s = size / 3f32.sqrt();
    let p0 = Point3::new(s, s, s);
    let p1 = Point3::new(-s, -s, s);
    let p2 = Point3::new(-s, s, -s);
    let p3 = Point3::new(s, -s, -s);

    // Counter-clockwise seen from outside
    BufferGeometry::from_positions(&[
        p0, p2, p1, //
        p0, p1, p3, //
        p0, p3, p2, //
        p1, p2, p3,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_face_normal_right_hand_rule() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(tri.face_normal(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_face_normal_degenerate_is_zero() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let tri = Triangle::new(p, p, Point3::new(2.0, 4.0, 6.0));
        assert_eq!(tri.face_normal(), Vector3::zeros());
    }

    #[test]
    fn test_triangle_count() {
        assert_eq!(cube(1.0).triangle_count(), 12);
        assert_eq!(tetrahedron(1.0).triangle_count(), 4);
        assert_eq!(BufferGeometry::new().triangle_count(), 0);
    }

    #[test]
    fn test_shapes_validate() {
        assert_eq!(cube(2.0).validate(), Ok(()));
        assert_eq!(tetrahedron(2.0).validate(), Ok(()));
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let geometry = cube(2.0);
        let position = geometry.position().unwrap();
        for tri in geometry.index.as_ref().unwrap().chunks(3) {
            let a = position.xyz(tri[0] as usize);
            let b = position.xyz(tri[1] as usize);
            let c = position.xyz(tri[2] as usize);
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            let normal = Triangle::new(a, b, c).face_normal();
            assert!(normal.dot(&centroid) > 0.0, "inward face {:?}", tri);
        }
    }

    #[test]
    fn test_tetrahedron_normals_point_outward() {
        let geometry = tetrahedron(1.0);
        let position = geometry.position().unwrap();
        for i in (0..position.count()).step_by(3) {
            let (a, b, c) = (position.xyz(i), position.xyz(i + 1), position.xyz(i + 2));
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            let normal = Triangle::new(a, b, c).face_normal();
            assert!(normal.dot(&centroid) > 0.0, "inward face at {}", i);
        }
    }

    #[test]
    fn test_validate_missing_position() {
        let geometry = BufferGeometry::new();
        assert_eq!(geometry.validate(), Err(GeometryDefect::MissingPosition));
    }

    #[test]
    fn test_validate_index_length() {
        let geometry = cube(1.0).with_index(vec![0, 1, 2, 3]);
        assert_eq!(geometry.validate(), Err(GeometryDefect::IndexLength(4)));
    }

    #[test]
    fn test_validate_index_out_of_range() {
        let geometry = cube(1.0).with_index(vec![0, 1, 8]);
        assert_eq!(
            geometry.validate(),
            Err(GeometryDefect::IndexOutOfRange {
                index: 8,
                vertex_count: 8
            })
        );
    }

    #[test]
    fn test_validate_vertex_count() {
        let geometry = BufferGeometry::from_positions(&[Point3::origin(), Point3::origin()]);
        assert_eq!(geometry.validate(), Err(GeometryDefect::VertexCount(2)));
    }

    #[test]
    fn test_validate_item_size() {
        let mut geometry = BufferGeometry::new();
        geometry.set_attribute(POSITION, BufferAttribute::new(vec![0.0; 4], 2));
        assert_eq!(geometry.validate(), Err(GeometryDefect::PositionItemSize(2)));
    }

    #[test]
    fn test_validate_ragged_position() {
        let mut geometry = BufferGeometry::new();
        geometry.set_attribute(POSITION, BufferAttribute::new(vec![0.0; 10], 3));
        assert_eq!(
            geometry.validate(),
            Err(GeometryDefect::RaggedPosition { len: 10, item_size: 3 })
        );
    }

    #[test]
    fn test_face_geometry_conversion() {
        let faces = FaceGeometry::new(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
        );
        let buffer = faces.to_buffer_geometry();
        assert_eq!(buffer.index, Some(vec![0, 1, 2]));
        assert_eq!(buffer.position().unwrap().count(), 3);
        assert_eq!(buffer.validate(), Ok(()));
    }
}
