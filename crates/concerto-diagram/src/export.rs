//! Serializable view of a positioned diagram.
//!
//! [`RenderedDiagram`] pairs every edge with its floating-edge geometry so
//! consumers can draw the diagram without reimplementing the intersection
//! math. Nodes that were never measured are treated as having the layout
//! node size, and are exported with that size.

use serde::Serialize;

use concerto_diagram_core::geometry::Size;

use crate::{
    floating::{EdgeParams, NodeRect, edge_params},
    graph::{Diagram, DiagramEdge, DiagramNode},
};

/// An edge together with its end points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEdge {
    #[serde(flatten)]
    edge: DiagramEdge,
    geometry: EdgeParams,
}

impl RenderedEdge {
    pub fn edge(&self) -> &DiagramEdge {
        &self.edge
    }

    pub fn geometry(&self) -> &EdgeParams {
        &self.geometry
    }
}

/// A diagram ready to be written out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDiagram {
    nodes: Vec<DiagramNode>,
    edges: Vec<RenderedEdge>,
}

impl RenderedDiagram {
    /// Computes edge geometry for `diagram`, sizing unmeasured nodes with `node_size`.
    pub fn new(diagram: &Diagram, node_size: Size) -> Self {
        let nodes: Vec<DiagramNode> = diagram
            .nodes()
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if node.size().is_none() {
                    node.set_size(node_size);
                }
                node
            })
            .collect();

        let edges = diagram
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = nodes.iter().find(|node| node.id() == edge.source())?;
                let target = nodes.iter().find(|node| node.id() == edge.target())?;
                Some(RenderedEdge {
                    edge: edge.clone(),
                    geometry: edge_params(&NodeRect::from(source), &NodeRect::from(target)),
                })
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[RenderedEdge] {
        &self.edges
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
