//! Floating edge geometry.
//!
//! A floating edge is not pinned to fixed handles: it attaches where the
//! straight line between the two node centers crosses each node's rectangle.
//! The side of the rectangle hit by that line decides the orientation of the
//! edge end, so curved renderers can leave and enter nodes perpendicularly.
//!
//! All functions are pure and work on [`NodeRect`], the position and measured
//! size of a node. Rectangles with no size, or with a zero dimension, have no
//! boundary to intersect and resolve to their top-left position.

use serde::Serialize;

use concerto_diagram_core::geometry::{Point, Side, Size};

use crate::graph::DiagramNode;

/// Distance in pixels within which a point counts as lying on an edge of the rectangle.
const SIDE_TOLERANCE: f32 = 1.0;

/// Rectangle of a node as seen by the floating edge computations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRect {
    /// Top-left corner.
    position: Point,
    size: Option<Size>,
}

impl NodeRect {
    pub fn new(position: Point, size: Option<Size>) -> Self {
        Self { position, size }
    }

    /// Rectangle of `node`, using `fallback` while the node is unmeasured.
    pub fn with_fallback_size(node: &DiagramNode, fallback: Size) -> Self {
        Self::new(node.position(), Some(node.size().unwrap_or(fallback)))
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Returns the center, or `None` if the rectangle has no usable size.
    pub fn center(&self) -> Option<Point> {
        self.measured().map(|size| self.position.add_point(size.half()))
    }

    fn measured(&self) -> Option<Size> {
        self.size.filter(|size| !size.is_degenerate())
    }
}

impl From<&DiagramNode> for NodeRect {
    fn from(node: &DiagramNode) -> Self {
        Self::new(node.position(), node.size())
    }
}

/// Point where the line from the center of `node` towards the center of
/// `other` leaves the rectangle of `node`.
///
/// The rectangle is mapped onto a unit diamond, where the crossing is found
/// by normalizing the direction with the L1 norm, and mapped back.
pub fn node_intersection(node: &NodeRect, other: &NodeRect) -> Point {
    let Some(size) = node.measured() else {
        return node.position;
    };
    let half = size.half();
    let center = node.position.add_point(half);
    let other_center = other.center().unwrap_or(other.position);

    let dx = other_center.x() - center.x();
    let dy = other_center.y() - center.y();
    let xx1 = dx / (2.0 * half.x()) - dy / (2.0 * half.y());
    let yy1 = dx / (2.0 * half.x()) + dy / (2.0 * half.y());
    let norm = xx1.abs() + yy1.abs();
    if norm == 0.0 {
        return center;
    }

    let xx3 = xx1 / norm;
    let yy3 = yy1 / norm;
    Point::new(
        half.x() * (xx3 + yy3) + center.x(),
        half.y() * (-xx3 + yy3) + center.y(),
    )
}

/// Side of the rectangle of `node` that `point` lies on.
///
/// Coordinates are rounded and compared within one pixel. Left and right take
/// precedence over top and bottom at corners; points on no side map to top.
pub fn edge_side(node: &NodeRect, point: Point) -> Side {
    let Some(size) = node.measured() else {
        return Side::Top;
    };
    let origin = node.position.round();
    let point = point.round();

    if point.x() <= origin.x() + SIDE_TOLERANCE {
        Side::Left
    } else if point.x() >= origin.x() + size.width() - SIDE_TOLERANCE {
        Side::Right
    } else if point.y() <= origin.y() + SIDE_TOLERANCE {
        Side::Top
    } else if point.y() >= origin.y() + size.height() - SIDE_TOLERANCE {
        Side::Bottom
    } else {
        Side::Top
    }
}

/// End points and end orientations of a floating edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeParams {
    source: Point,
    target: Point,
    source_side: Side,
    target_side: Side,
}

impl EdgeParams {
    pub fn source(&self) -> Point {
        self.source
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn source_side(&self) -> Side {
        self.source_side
    }

    pub fn target_side(&self) -> Side {
        self.target_side
    }
}

/// Geometry of the floating edge from `source` to `target`.
pub fn edge_params(source: &NodeRect, target: &NodeRect) -> EdgeParams {
    let source_point = node_intersection(source, target);
    let target_point = node_intersection(target, source);
    EdgeParams {
        source: source_point,
        target: target_point,
        source_side: edge_side(source, source_point),
        target_side: edge_side(target, target_point),
    }
}

/// Geometry of a connection being dragged from `source` to `pointer`.
///
/// The pointer stands in for a one pixel node, so only the source end is
/// clipped to a rectangle.
pub fn connection_line_params(source: &NodeRect, pointer: Point) -> EdgeParams {
    let target = NodeRect::new(pointer, Some(Size::new(1.0, 1.0)));
    edge_params(source, &target)
}
