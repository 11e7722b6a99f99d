//! Turns collected meshes into a stream of world-space facets
use nalgebra::{Matrix4, Point3, Vector3};
use tracing::warn;

use crate::collector::CollectedMesh;
use crate::geometry::{face_normal, BufferAttribute};
use crate::transform::apply_point;

/// Working storage for one facet, reused across triangles
#[derive(Debug, Clone, Copy)]
pub struct FacetScratch {
    pub normal: Vector3<f32>,
    pub a: Point3<f32>,
    pub b: Point3<f32>,
    pub c: Point3<f32>,
}

impl FacetScratch {
    fn new() -> Self {
        Self {
            normal: Vector3::zeros(),
            a: Point3::origin(),
            b: Point3::origin(),
            c: Point3::origin(),
        }
    }

    fn is_degenerate(&self) -> bool {
        self.normal == Vector3::zeros()
    }
}

/// An output encoding that receives facets in order
pub trait FacetWriter {
    fn write_facet(&mut self, facet: &FacetScratch);
}

/// Load vertices `ia`, `ib`, `ic`, move them into world space and
/// compute the face normal from the transformed positions.
fn load_facet(
    scratch: &mut FacetScratch,
    position: &BufferAttribute,
    [ia, ib, ic]: [usize; 3],
    world: &Matrix4<f32>,
) {
    scratch.a = apply_point(world, &position.xyz(ia));
    scratch.b = apply_point(world, &position.xyz(ib));
    scratch.c = apply_point(world, &position.xyz(ic));
    scratch.normal = face_normal(&scratch.a, &scratch.b, &scratch.c);
}

/// Feed every triangle of every mesh to `writer`, meshes in collection
/// order and triangles in geometry order. Returns the number written.
///
/// Meshes must come from [`collect`](crate::collector::collect), which
/// validates their geometry.
pub(crate) fn serialize<W: FacetWriter>(meshes: &[CollectedMesh<'_>], writer: &mut W) -> usize {
    let mut scratch = FacetScratch::new();
    let mut written = 0;
    let mut degenerate = 0;

    for mesh in meshes {
        let Some(position) = mesh.geometry.position() else {
            continue;
        };
        let world = &mesh.world_transform;

        match &mesh.geometry.index {
            Some(index) => {
                for tri in index.chunks_exact(3) {
                    let corners = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                    load_facet(&mut scratch, position, corners, world);
                    degenerate += usize::from(scratch.is_degenerate());
                    writer.write_facet(&scratch);
                    written += 1;
                }
            }
            None => {
                for t in 0..position.count() / 3 {
                    let j = t * 3;
                    load_facet(&mut scratch, position, [j, j + 1, j + 2], world);
                    degenerate += usize::from(scratch.is_degenerate());
                    writer.write_facet(&scratch);
                    written += 1;
                }
            }
        }
    }

    if degenerate > 0 {
        warn!(degenerate, "degenerate facets written with zero normals");
    }

    written
}
