//! Sugiyama (hierarchical) layout engine
//!
//! Nodes are ranked into layers, ordered within each layer to reduce edge
//! crossings, and assigned coordinates by the rust-sugiyama implementation.
//! The engine works on an abstract grid of `(rank, slot)` cells: the rank is
//! the layer index along the flow direction, the slot the position across it.
//! Cells are then scaled by the fixed node size plus spacing.
//!
//! Weakly connected components are laid out one at a time and placed next to
//! each other across the flow direction, in the order of their first node.

use std::{any::Any, collections::HashMap, panic};

use indexmap::IndexMap;
use log::debug;
use petgraph::unionfind::UnionFind;
use rust_sugiyama::configure::Config;

use concerto_diagram_core::{
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    config::LayoutConfig,
    graph::Diagram,
    layout::{Direction, LayoutError},
};

/// Tolerance used when grouping y coordinates into layers.
const LEVEL_EPSILON: f64 = 1e-6;

/// Position of a node on the abstract layer grid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Cell {
    rank: f64,
    slot: f64,
}

/// The Sugiyama layout engine for class diagrams
pub struct Engine {
    /// Size of every node rectangle
    node_size: Size,

    /// Horizontal gap between node rectangles
    horizontal_spacing: f32,

    /// Vertical gap between node rectangles
    vertical_spacing: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl Engine {
    /// Create a new Sugiyama layout engine with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            node_size: config.node_size(),
            horizontal_spacing: config.horizontal_spacing(),
            vertical_spacing: config.vertical_spacing(),
        }
    }

    /// Set the size used for every node
    pub fn set_node_size(&mut self, size: Size) -> &mut Self {
        self.node_size = size;
        self
    }

    /// Set the horizontal spacing between nodes
    pub fn set_horizontal_spacing(&mut self, spacing: f32) -> &mut Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the vertical spacing between nodes
    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    pub fn node_size(&self) -> Size {
        self.node_size
    }

    /// Lays out `diagram` in the given direction.
    ///
    /// Returns a copy of the diagram in which every node has its top-left
    /// position and its attachment sides replaced. Ids, data and edges are
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EnginePanicked`] if the layering crate panics.
    pub fn layout(&self, diagram: &Diagram, direction: Direction) -> Result<Diagram, LayoutError> {
        if diagram.is_empty() {
            return Ok(diagram.clone());
        }

        let index_of: HashMap<Id, usize> = diagram
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id(), index))
            .collect();

        // Self loops and parallel edges carry no layering information
        let mut edges: Vec<(usize, usize)> = diagram
            .edges()
            .iter()
            .filter_map(|edge| {
                Some((
                    *index_of.get(&edge.source())?,
                    *index_of.get(&edge.target())?,
                ))
            })
            .filter(|(source, target)| source != target)
            .collect();
        edges.sort_unstable();
        edges.dedup();

        debug!(
            nodes = diagram.nodes().len(),
            edges = edges.len(),
            direction:% = direction;
            "Laying out diagram"
        );

        let cells = self.cells(diagram.nodes().len(), &edges)?;
        let max_rank = cells.iter().map(|cell| cell.rank).fold(0.0, f64::max);

        let mut laid_out = diagram.clone();
        for (node, cell) in laid_out.nodes_mut().iter_mut().zip(&cells) {
            let rank = if direction.is_reversed() {
                max_rank - cell.rank
            } else {
                cell.rank
            };
            // The grid anchors nodes at their center, nodes are anchored top-left
            let center = self.cell_center(rank, cell.slot, direction);
            node.set_position(center.sub_point(self.node_size.half()));
            node.set_sides(direction.source_side(), direction.target_side());
        }

        Ok(laid_out)
    }

    fn cell_center(&self, rank: f64, slot: f64, direction: Direction) -> Point {
        let pitch_x = f64::from(self.node_size.width() + self.horizontal_spacing);
        let pitch_y = f64::from(self.node_size.height() + self.vertical_spacing);
        let (column, row) = if direction.is_horizontal() {
            (rank, slot)
        } else {
            (slot, rank)
        };
        Point::new((column * pitch_x) as f32, (row * pitch_y) as f32).add_point(self.node_size.half())
    }

    /// Assigns a grid cell to every node, composing connected components side by side.
    fn cells(&self, node_count: usize, edges: &[(usize, usize)]) -> Result<Vec<Cell>, LayoutError> {
        let mut components = UnionFind::<usize>::new(node_count);
        for &(source, target) in edges {
            components.union(source, target);
        }

        let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
        for (node, label) in components.into_labeling().into_iter().enumerate() {
            groups.entry(label).or_default().push(node);
        }

        let mut cells = vec![Cell::default(); node_count];
        let mut slot_offset = 0.0;
        for members in groups.values() {
            let local_cells = if members.len() == 1 {
                vec![Cell::default()]
            } else {
                layer_component(members, edges)?
            };

            let mut width: f64 = 0.0;
            for (&node, cell) in members.iter().zip(local_cells) {
                width = width.max(cell.slot + 1.0);
                cells[node] = Cell {
                    rank: cell.rank,
                    slot: cell.slot + slot_offset,
                };
            }
            slot_offset += width;
        }

        debug!(components = groups.len(); "Composed layout components");
        Ok(cells)
    }
}

/// Lays out one connected component, returning cells indexed like `members`.
fn layer_component(members: &[usize], edges: &[(usize, usize)]) -> Result<Vec<Cell>, LayoutError> {
    let local_index: HashMap<usize, u32> = members
        .iter()
        .enumerate()
        .map(|(local, &node)| (node, local as u32))
        .collect();
    let local_edges: Vec<(u32, u32)> = edges
        .iter()
        .filter_map(|(source, target)| Some((*local_index.get(source)?, *local_index.get(target)?)))
        .collect();

    debug!(
        nodes = members.len(),
        edges = local_edges.len();
        "Applying Sugiyama algorithm to component"
    );

    let engine_edges = local_edges.clone();
    let layouts = panic::catch_unwind(move || {
        // With unit vertex spacing the x coordinates are slot indices
        let config = Config {
            minimum_length: 1,
            vertex_spacing: 1.0,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&engine_edges, &config)
    })
    .map_err(|payload| LayoutError::EnginePanicked(panic_message(&*payload)))?;

    let mut coordinates: Vec<Option<(f64, f64)>> = vec![None; members.len()];
    for (coords, _, _) in &layouts {
        for &(id, (x, y)) in coords {
            if let Some(slot) = coordinates.get_mut(id as usize) {
                *slot = Some((x as f64, y as f64));
            }
        }
    }

    let placed: Vec<(f64, f64)> = coordinates.iter().flatten().copied().collect();
    let min_x = placed
        .iter()
        .map(|&(x, _)| x)
        .fold(f64::INFINITY, f64::min);
    let mut levels: Vec<f64> = placed.iter().map(|&(_, y)| y).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup_by(|a, b| (*a - *b).abs() < LEVEL_EPSILON);
    let rank_of = |y: f64| {
        levels
            .iter()
            .position(|level| (level - y).abs() < LEVEL_EPSILON)
            .unwrap_or(0) as f64
    };

    let mut cells: Vec<Option<Cell>> = coordinates
        .iter()
        .map(|coordinate| {
            coordinate.map(|(x, y)| Cell {
                rank: rank_of(y),
                slot: x - min_x,
            })
        })
        .collect();

    // Normalize so that edge sources sit on earlier ranks than their targets
    let (forward, backward) = local_edges.iter().fold((0, 0), |(forward, backward), &(s, t)| {
        match (cells[s as usize], cells[t as usize]) {
            (Some(source), Some(target)) if source.rank < target.rank => (forward + 1, backward),
            (Some(source), Some(target)) if source.rank > target.rank => (forward, backward + 1),
            _ => (forward, backward),
        }
    });
    if backward > forward {
        let max_rank = levels.len().saturating_sub(1) as f64;
        for cell in cells.iter_mut().flatten() {
            cell.rank = max_rank - cell.rank;
        }
    }

    let mut next_slot = cells
        .iter()
        .flatten()
        .map(|cell| cell.slot)
        .fold(-1.0, f64::max)
        + 1.0;
    let mut resolved = Vec::with_capacity(cells.len());
    for cell in cells {
        match cell {
            Some(cell) => resolved.push(cell),
            None => {
                debug!(slot = next_slot; "Node missing from layering result, appending");
                resolved.push(Cell {
                    rank: 0.0,
                    slot: next_slot,
                });
                next_slot += 1.0;
            }
        }
    }
    Ok(resolved)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|msg| msg.to_string()))
        .unwrap_or_else(|| "unknown error".to_string())
}
