//! Concerto Diagram - class diagrams for Concerto models.
//!
//! Projection of Concerto metamodel JSON into declaration nodes and
//! relationship edges, hierarchical layout in four directions, and the
//! floating-edge geometry used to draw connectors between nodes.

pub mod config;
pub mod export;
pub mod floating;
pub mod graph;
pub mod layout;
pub mod projection;
pub mod workspace;

mod error;

pub use concerto_diagram_core::{geometry, identifier, metamodel};

pub use error::DiagramError;
pub use layout::LayoutError;
pub use projection::ProjectionError;
pub use workspace::{Workspace, WorkspaceError};

use log::{debug, info, trace};

use config::AppConfig;
use export::RenderedDiagram;
use graph::Diagram;
use layout::{Direction, Engine};
use metamodel::Models;
use projection::Projector;

/// Builder for projecting, laying out and exporting Concerto class diagrams.
///
/// # Examples
///
/// ```rust
/// use concerto_diagram::{DiagramBuilder, Workspace, config::AppConfig};
///
/// let source = r#"{
///     "$class": "concerto.metamodel@1.0.0.Models",
///     "models": [{
///         "$class": "concerto.metamodel@1.0.0.Model",
///         "namespace": "org.acme@1.0.0",
///         "declarations": [
///             { "$class": "concerto.metamodel@1.0.0.ConceptDeclaration", "name": "Person", "properties": [] }
///         ]
///     }]
/// }"#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let models = builder.parse(source).expect("Failed to parse");
/// let workspace = Workspace::from_models(models);
///
/// let diagram = builder.project(&workspace).expect("Failed to project");
/// let diagram = builder.layout(&diagram).expect("Failed to lay out");
/// let json = builder.render_json(&diagram).expect("Failed to render");
/// assert!(json.contains("org.acme@1.0.0.Person"));
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a Concerto metamodel JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Json`] for malformed JSON or unknown `$class` values.
    pub fn parse(&self, source: &str) -> Result<Models, DiagramError> {
        info!("Parsing metamodel");
        let models: Models = serde_json::from_str(source)?;
        debug!(models = models.models().len(); "Metamodel parsed successfully");
        Ok(models)
    }

    /// Project the visible namespaces of `workspace` into a diagram.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Projection`] for unresolved or duplicate declarations.
    pub fn project(&self, workspace: &Workspace) -> Result<Diagram, DiagramError> {
        let projector = Projector::from_config(self.config.projection());
        let diagram = workspace.project(&projector)?;
        trace!(diagram:?; "Projected diagram");
        Ok(diagram)
    }

    /// Lay out `diagram` in the configured direction.
    pub fn layout(&self, diagram: &Diagram) -> Result<Diagram, DiagramError> {
        self.layout_with_direction(diagram, self.config.layout().direction())
    }

    /// Lay out `diagram` in `direction`, ignoring the configured direction.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Layout`] if the layering engine fails.
    pub fn layout_with_direction(
        &self,
        diagram: &Diagram,
        direction: Direction,
    ) -> Result<Diagram, DiagramError> {
        info!(direction:% = direction; "Calculating layout");
        let engine = Engine::from_config(self.config.layout());
        let laid_out = engine.layout(diagram, direction)?;
        trace!(laid_out:?; "Layout calculated");
        Ok(laid_out)
    }

    /// Compute edge geometry for `diagram`.
    pub fn render(&self, diagram: &Diagram) -> RenderedDiagram {
        RenderedDiagram::new(diagram, self.config.layout().node_size())
    }

    /// Render `diagram` with its edge geometry to pretty-printed JSON.
    pub fn render_json(&self, diagram: &Diagram) -> Result<String, DiagramError> {
        let json = self.render(diagram).to_json()?;
        info!(bytes = json.len(); "Diagram rendered");
        Ok(json)
    }
}
