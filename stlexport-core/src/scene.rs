//! Scene graph nodes and traversal
//!
//! A scene is a tree of [`SceneNode`]s. Each node carries a local `matrix`
//! and a resolved `matrix_world`; the exporter only reads `matrix_world`,
//! so callers run [`SceneNode::update_matrix_world`] after editing local
//! transforms.
use std::sync::Arc;

use nalgebra::Matrix4;

use crate::geometry::Geometry;

/// The closed set of node kinds a scene may contain
#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Mesh(Arc<Geometry>),
    Line(Arc<Geometry>),
    Points(Arc<Geometry>),
    Light,
    Camera,
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub matrix: Matrix4<f32>,
    pub matrix_world: Matrix4<f32>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            matrix: Matrix4::identity(),
            matrix_world: Matrix4::identity(),
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: impl Into<Arc<Geometry>>) -> Self {
        Self::new(name, NodeKind::Mesh(geometry.into()))
    }

    pub fn line(name: impl Into<String>, geometry: impl Into<Arc<Geometry>>) -> Self {
        Self::new(name, NodeKind::Line(geometry.into()))
    }

    pub fn points(name: impl Into<String>, geometry: impl Into<Arc<Geometry>>) -> Self {
        Self::new(name, NodeKind::Points(geometry.into()))
    }

    pub fn light(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Light)
    }

    pub fn camera(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Camera)
    }

    /// Set the local transform relative to the parent
    pub fn with_matrix(mut self, matrix: Matrix4<f32>) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    /// Recompute `matrix_world` for this node and all descendants,
    /// treating this node as a root.
    pub fn update_matrix_world(&mut self) {
        self.update_matrix_world_from(&Matrix4::identity());
    }

    fn update_matrix_world_from(&mut self, parent_world: &Matrix4<f32>) {
        self.matrix_world = parent_world * self.matrix;
        let world = self.matrix_world;
        for child in &mut self.children {
            child.update_matrix_world_from(&world);
        }
    }
}

/// Callbacks invoked by [`walk`] for every node in the tree
pub trait SceneVisitor<'a> {
    type Error;

    fn visit_mesh(&mut self, node: &'a SceneNode, geometry: &'a Geometry)
        -> Result<(), Self::Error>;

    /// Called for every node that is not a mesh
    fn visit_other(&mut self, _node: &'a SceneNode) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Pre-order depth-first traversal. Stops at the first visitor error.
pub fn walk<'a, V: SceneVisitor<'a>>(node: &'a SceneNode, visitor: &mut V) -> Result<(), V::Error> {
    match &node.kind {
        NodeKind::Mesh(geometry) => visitor.visit_mesh(node, geometry)?,
        _ => visitor.visit_other(node)?,
    }

    for child in &node.children {
        walk(child, visitor)?;
    }

    Ok(())
}
