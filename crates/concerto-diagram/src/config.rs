//! Configuration types for projection and layout.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file. Missing fields fall back to the
//! defaults below.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and projection settings.
//! - [`LayoutConfig`] - Direction, node size and spacing of the hierarchical layout.
//! - [`ProjectionConfig`] - Grid used for nodes without an explicit position.
//!
//! # Example
//!
//! ```
//! # use concerto_diagram::{config::AppConfig, layout::Direction};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().direction(), Direction::TopToBottom);
//! assert_eq!(config.projection().tile_count(), 4);
//! ```

use serde::Deserialize;

use concerto_diagram_core::geometry::Size;

use crate::layout::Direction;

/// Default width of a node during layout.
pub const DEFAULT_NODE_WIDTH: f32 = 350.0;
/// Default height of a node during layout.
pub const DEFAULT_NODE_HEIGHT: f32 = 120.0;
/// Number of columns of the default tile grid.
pub const DEFAULT_TILE_COUNT: usize = 4;
pub const DEFAULT_TILE_WIDTH: f32 = 200.0;
pub const DEFAULT_TILE_HEIGHT: f32 = 400.0;

/// Top-level configuration combining layout and projection settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Projection configuration section.
    #[serde(default)]
    projection: ProjectionConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    pub fn new(layout: LayoutConfig, projection: ProjectionConfig) -> Self {
        Self { layout, projection }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the projection configuration.
    pub fn projection(&self) -> &ProjectionConfig {
        &self.projection
    }

    /// Overrides the layout direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.layout.direction = direction;
        self
    }
}

/// Settings of the hierarchical layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Flow direction of the layers.
    direction: Direction,
    /// Width of every node rectangle.
    node_width: f32,
    /// Height of every node rectangle.
    node_height: f32,
    /// Gap between horizontally adjacent nodes.
    horizontal_spacing: f32,
    /// Gap between vertically adjacent nodes.
    vertical_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            horizontal_spacing: 50.0,
            vertical_spacing: 50.0,
        }
    }
}

impl LayoutConfig {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the fixed node size used by the layout.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }
}

/// Grid used to place nodes that carry no position annotation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Number of columns.
    tile_count: usize,
    /// Horizontal distance between columns.
    tile_width: f32,
    /// Vertical distance between rows.
    tile_height: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            tile_count: DEFAULT_TILE_COUNT,
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
        }
    }
}

impl ProjectionConfig {
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().node_size(), Size::new(350.0, 120.0));
        assert_eq!(config.layout().horizontal_spacing(), 50.0);
        assert_eq!(config.projection().tile_width(), 200.0);
        assert_eq!(config.projection().tile_height(), 400.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"layout": {"direction": "LR", "node_width": 200.0}}"#)
                .unwrap();
        assert_eq!(config.layout().direction(), Direction::LeftToRight);
        assert_eq!(config.layout().node_size(), Size::new(200.0, 120.0));
        assert_eq!(config.projection().tile_count(), 4);
    }

    #[test]
    fn test_with_direction() {
        let config = AppConfig::default().with_direction(Direction::RightToLeft);
        assert_eq!(config.layout().direction(), Direction::RightToLeft);
    }
}
