//! Diagram graph produced by projection and consumed by layout and export.
//!
//! A [`Diagram`] is a flat list of [`DiagramNode`]s (one per visible
//! declaration) and [`DiagramEdge`]s (property references and inheritance).
//! Nodes are never mutated in place by the pipeline: projection builds a fresh
//! diagram and layout returns a new one with positions replaced.

use serde::Serialize;

use concerto_diagram_core::{
    geometry::{Bounds, Point, Side, Size},
    identifier::Id,
    metamodel::{Declaration, Property, TypeIdentifier},
};

/// Visual kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Concept,
    Enum,
}

/// A property row shown inside a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySummary {
    name: String,
    type_name: String,
    modifiers: String,
}

impl PropertySummary {
    fn from_property(property: &Property) -> Self {
        Self {
            name: property.name().to_string(),
            type_name: property.type_display_name().to_string(),
            modifiers: property.modifiers(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn modifiers(&self) -> &str {
        &self.modifiers
    }
}

/// A declaration rendered as a diagram node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramNode {
    id: Id,
    label: String,
    namespace: String,
    kind: NodeKind,
    class_description: &'static str,
    is_abstract: bool,
    properties: Vec<PropertySummary>,
    /// Top-left corner of the node rectangle.
    position: Point,
    /// Size measured by the rendering surface, absent until first paint.
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_side: Option<Side>,
}

impl DiagramNode {
    /// Creates the node for `declaration` declared in `namespace`.
    pub fn from_declaration(namespace: &str, declaration: &Declaration, position: Point) -> Self {
        let kind = if declaration.kind().is_enum() {
            NodeKind::Enum
        } else {
            NodeKind::Concept
        };
        Self {
            id: Id::qualified(namespace, declaration.name()),
            label: declaration.name().to_string(),
            namespace: namespace.to_string(),
            kind,
            class_description: declaration.kind().description(),
            is_abstract: declaration.is_abstract(),
            properties: declaration
                .properties()
                .iter()
                .map(PropertySummary::from_property)
                .collect(),
            position,
            size: None,
            source_side: None,
            target_side: None,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Class of the declaration, e.g. `Concept`, `Asset` or `Enum`.
    pub fn class_description(&self) -> &'static str {
        self.class_description
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn properties(&self) -> &[PropertySummary] {
        &self.properties
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Records the size measured by the rendering surface.
    pub fn set_size(&mut self, size: Size) {
        self.size = Some(size);
    }

    pub fn source_side(&self) -> Option<Side> {
        self.source_side
    }

    pub fn target_side(&self) -> Option<Side> {
        self.target_side
    }

    pub fn set_sides(&mut self, source: Side, target: Side) {
        self.source_side = Some(source);
        self.target_side = Some(target);
    }

    /// Returns the node rectangle, or `None` while the node is unmeasured.
    pub fn bounds(&self) -> Option<Bounds> {
        self.size
            .map(|size| Bounds::from_top_left(self.position, size))
    }
}

/// What an edge represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeKind {
    /// An object or relationship property of the owner.
    Property { property_name: String },
    /// The owner extends `super_type`.
    SuperType { super_type: TypeIdentifier },
}

/// A directed connection between two nodes of the same diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramEdge {
    id: String,
    source: Id,
    target: Id,
    label: String,
    /// Declaration that owns the property or supertype, for editing round trips.
    owner: TypeIdentifier,
    kind: EdgeKind,
}

impl DiagramEdge {
    pub fn new(
        id: impl Into<String>,
        source: Id,
        target: Id,
        label: impl Into<String>,
        owner: TypeIdentifier,
        kind: EdgeKind,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            target,
            label: label.into(),
            owner,
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn owner(&self) -> &TypeIdentifier {
        &self.owner
    }

    pub fn kind(&self) -> &EdgeKind {
        &self.kind
    }

    /// Returns the property name for property edges.
    pub fn property_name(&self) -> Option<&str> {
        match &self.kind {
            EdgeKind::Property { property_name } => Some(property_name),
            EdgeKind::SuperType { .. } => None,
        }
    }

    pub fn is_super_type(&self) -> bool {
        matches!(self.kind, EdgeKind::SuperType { .. })
    }
}

/// Nodes and edges of one projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagram {
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
}

impl Diagram {
    pub fn new(nodes: Vec<DiagramNode>, edges: Vec<DiagramEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [DiagramNode] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: Id) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: Id) -> Option<&mut DiagramNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn into_parts(self) -> (Vec<DiagramNode>, Vec<DiagramEdge>) {
        (self.nodes, self.edges)
    }
}
