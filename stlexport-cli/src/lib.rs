//! Command-line front end for the stlexport library
use std::io::{self, Write};

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector3};
use stlexport_core::{cube, tetrahedron, EulerRotation, Facet, Geometry, SceneNode, Transform};

/// Built-in scenes the CLI can export
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DemoShape {
    Cube,
    Tetrahedron,
    /// A group holding a cube, a tetrahedron, a light and a camera
    Assembly,
}

/// Build a demo scene with resolved world matrices
pub fn demo_scene(shape: DemoShape) -> SceneNode {
    let mut scene = match shape {
        DemoShape::Cube => SceneNode::mesh("cube", Geometry::from(cube(2.0))),
        DemoShape::Tetrahedron => SceneNode::mesh("tetrahedron", Geometry::from(tetrahedron(2.0))),
        DemoShape::Assembly => SceneNode::group("assembly")
            .with_child(SceneNode::light("key-light").with_matrix(Transform::translation(5.0, 5.0, 5.0)))
            .with_child(SceneNode::camera("camera").with_matrix(Transform::translation(0.0, 0.0, 10.0)))
            .with_child(
                SceneNode::mesh("base", Geometry::from(cube(2.0)))
                    .with_matrix(Transform::translation(0.0, 0.0, 1.0)),
            )
            .with_child(
                SceneNode::group("top").with_child(
                    SceneNode::mesh("spike", Geometry::from(tetrahedron(1.0))).with_matrix(
                        Transform::compose(
                            &Vector3::new(0.0, 0.0, 3.0),
                            &EulerRotation::new(0.0, 0.0, std::f32::consts::FRAC_PI_4),
                            &Vector3::new(1.0, 1.0, 1.5),
                        ),
                    ),
                ),
            ),
    };
    scene.update_matrix_world();
    scene
}

/// Facet count and axis-aligned bounds of an STL document
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub facets: usize,
    pub bounds: Option<(Point3<f32>, Point3<f32>)>,
}

pub fn summarize(facets: &[Facet]) -> Summary {
    let bounds = facets
        .iter()
        .flat_map(|f| f.vertices.iter())
        .fold(None, |acc: Option<(Point3<f32>, Point3<f32>)>, v| match acc {
            None => Some((*v, *v)),
            Some((min, max)) => Some((min.inf(v), max.sup(v))),
        });

    Summary {
        facets: facets.len(),
        bounds,
    }
}

/// Print a coloured `label: message` status line
pub fn status<W: Write>(writer: &mut W, color: Color, label: &str, message: &str) -> io::Result<()> {
    writer
        .queue(SetForegroundColor(color))?
        .queue(Print(format!("{:>10}", label)))?
        .queue(ResetColor)?
        .queue(Print(format!(" {}\n", message)))?;
    writer.flush()
}
