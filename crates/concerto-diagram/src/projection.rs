//! Model to graph projection.
//!
//! The [`Projector`] turns the declarations of a set of namespaces into a
//! [`Diagram`]: one node per declaration of every visible namespace, one edge
//! per object/relationship property and one edge per supertype.
//!
//! # Positions
//!
//! A declaration annotated with `@diagram(x, y)` is placed at `(x, y)`.
//! Every other declaration gets a tile of a fixed grid, computed from its
//! index among the emitted nodes, so unlaid-out diagrams are stable and
//! non-overlapping.
//!
//! # Visibility
//!
//! Declarations of hidden namespaces produce neither nodes nor edges, and
//! edges pointing into a hidden namespace are dropped. References that cannot
//! be resolved in any namespace, hidden or not, fail the projection.

mod label;

pub use label::{indefinite_article, property_label, super_type_label};

use std::collections::HashMap;

use log::{debug, info, trace};
use thiserror::Error;

use concerto_diagram_core::{
    geometry::Point,
    identifier::Id,
    metamodel::{Declaration, Model, TypeIdentifier},
};

use crate::{
    config::ProjectionConfig,
    graph::{Diagram, DiagramEdge, DiagramNode, EdgeKind},
};

/// Name of the decorator carrying an explicit node position.
pub const POSITION_DECORATOR: &str = "diagram";

/// Errors that prevent a model from being projected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("property `{property}` of `{owner}` references unknown type `{target}`")]
    UnresolvedType {
        owner: String,
        property: String,
        target: String,
    },

    #[error("`{owner}` extends unknown type `{target}`")]
    UnresolvedSuperType { owner: String, target: String },

    #[error("declaration `{id}` is defined more than once")]
    DuplicateDeclaration { id: String },
}

impl ProjectionError {
    /// Stable code identifying the kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedType { .. } => "P001",
            Self::UnresolvedSuperType { .. } => "P002",
            Self::DuplicateDeclaration { .. } => "P003",
        }
    }

    /// Suggestion shown alongside the error.
    pub fn help(&self) -> String {
        match self {
            Self::UnresolvedType { target, .. } | Self::UnresolvedSuperType { target, .. } => {
                format!("load the model that declares `{target}` or fix the type name")
            }
            Self::DuplicateDeclaration { .. } => {
                "rename one of the declarations or remove the duplicate model".to_string()
            }
        }
    }
}

/// Reads the explicit position of a declaration.
///
/// Only a `diagram` decorator with exactly two numeric arguments counts;
/// anything else yields `None`.
pub fn position_hint(declaration: &Declaration) -> Option<Point> {
    let decorator = declaration.decorator(POSITION_DECORATOR)?;
    match decorator.arguments() {
        [x, y] => Some(Point::new(x.as_number()? as f32, y.as_number()? as f32)),
        _ => None,
    }
}

/// Converts namespaces of declarations into diagram nodes and edges.
#[derive(Debug, Clone)]
pub struct Projector {
    tile_count: usize,
    tile_width: f32,
    tile_height: f32,
}

impl Default for Projector {
    fn default() -> Self {
        Self::from_config(&ProjectionConfig::default())
    }
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self {
            tile_count: config.tile_count().max(1),
            tile_width: config.tile_width(),
            tile_height: config.tile_height(),
        }
    }

    /// Default position of the node with the given index.
    pub fn tile_position(&self, index: usize) -> Point {
        let column = index % self.tile_count;
        let row = index / self.tile_count;
        Point::new(
            column as f32 * self.tile_width,
            row as f32 * self.tile_height,
        )
    }

    /// Projects every namespace, paired with its visibility flag.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] when a visible declaration references a
    /// type that no namespace declares, or when two declarations share an id.
    pub fn project<'a, I>(&self, namespaces: I) -> Result<Diagram, ProjectionError>
    where
        I: IntoIterator<Item = (&'a Model, bool)>,
    {
        let namespaces: Vec<(&Model, bool)> = namespaces.into_iter().collect();

        // Every declared type, mapped to the visibility of its namespace
        let mut declared: HashMap<Id, bool> = HashMap::new();
        for (model, visible) in &namespaces {
            for decl in model.declarations() {
                let id = Id::qualified(model.namespace(), decl.name());
                if declared.insert(id, *visible).is_some() {
                    return Err(ProjectionError::DuplicateDeclaration { id: id.to_string() });
                }
            }
        }

        let visible_models: Vec<&Model> = namespaces
            .iter()
            .filter_map(|(model, visible)| visible.then_some(*model))
            .collect();

        let mut nodes = Vec::new();
        for model in &visible_models {
            for decl in model.declarations() {
                let position =
                    position_hint(decl).unwrap_or_else(|| self.tile_position(nodes.len()));
                let node = DiagramNode::from_declaration(model.namespace(), decl, position);
                trace!(node:?; "Projected node");
                nodes.push(node);
            }
        }

        let mut edges = Vec::new();
        for model in &visible_models {
            for decl in model.declarations() {
                self.declaration_edges(model.namespace(), decl, &declared, &mut edges)?;
            }
        }

        info!(nodes = nodes.len(), edges = edges.len(); "Projected models");
        Ok(Diagram::new(nodes, edges))
    }

    /// Projects every namespace as visible.
    pub fn project_all<'a, I>(&self, models: I) -> Result<Diagram, ProjectionError>
    where
        I: IntoIterator<Item = &'a Model>,
    {
        self.project(models.into_iter().map(|model| (model, true)))
    }

    fn declaration_edges(
        &self,
        namespace: &str,
        decl: &Declaration,
        declared: &HashMap<Id, bool>,
        edges: &mut Vec<DiagramEdge>,
    ) -> Result<(), ProjectionError> {
        let owner_id = Id::qualified(namespace, decl.name());
        let owner = TypeIdentifier::qualified(namespace, decl.name());

        for property in decl.properties() {
            let Some(type_id) = property.type_reference() else {
                continue;
            };
            let target = Id::qualified(type_id.namespace_or(namespace), type_id.name());
            match declared.get(&target) {
                None => {
                    return Err(ProjectionError::UnresolvedType {
                        owner: owner_id.to_string(),
                        property: property.name().to_string(),
                        target: target.to_string(),
                    });
                }
                Some(false) => {
                    debug!(source:% = owner_id, target:% = target; "Skipping edge into hidden namespace");
                }
                Some(true) => edges.push(DiagramEdge::new(
                    format!("{owner_id}#{}", property.name()),
                    owner_id,
                    target,
                    property_label(property),
                    owner.clone(),
                    EdgeKind::Property {
                        property_name: property.name().to_string(),
                    },
                )),
            }
        }

        if let Some(super_type) = decl.super_type() {
            let target = Id::qualified(super_type.namespace_or(namespace), super_type.name());
            match declared.get(&target) {
                None => {
                    return Err(ProjectionError::UnresolvedSuperType {
                        owner: owner_id.to_string(),
                        target: target.to_string(),
                    });
                }
                Some(false) => {
                    debug!(source:% = owner_id, target:% = target; "Skipping supertype edge into hidden namespace");
                }
                Some(true) => edges.push(DiagramEdge::new(
                    format!("{owner_id}^{target}"),
                    owner_id,
                    target,
                    super_type_label(super_type),
                    owner,
                    EdgeKind::SuperType {
                        super_type: super_type.clone(),
                    },
                )),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use concerto_diagram_core::metamodel::{
        Decorator, DecoratorArgument, Property, PropertyKind,
    };

    const NS: &str = "org.acme@1.0.0";

    fn object(name: &str, type_name: &str) -> Property {
        Property::new(name, PropertyKind::Object(TypeIdentifier::local(type_name)))
    }

    fn at(x: f64, y: f64) -> Decorator {
        Decorator::new(
            POSITION_DECORATOR,
            vec![DecoratorArgument::Number(x), DecoratorArgument::Number(y)],
        )
    }

    /// `A` has many `b: B`, `B extends C`.
    fn abc_model() -> Model {
        Model::new(NS)
            .with_declaration(
                Declaration::concept("A").with_property(object("b", "B").with_array(true)),
            )
            .with_declaration(
                Declaration::concept("B").with_super_type(TypeIdentifier::local("C")),
            )
            .with_declaration(Declaration::concept("C"))
    }

    #[test]
    fn test_abc_scenario() {
        let model = abc_model();
        let diagram = Projector::new().project_all([&model]).unwrap();

        let ids: Vec<String> = diagram.nodes().iter().map(|n| n.id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                format!("{NS}.A"),
                format!("{NS}.B"),
                format!("{NS}.C")
            ]
        );

        assert_eq!(diagram.edges().len(), 2);
        let has_many = &diagram.edges()[0];
        assert_eq!(has_many.source(), Id::qualified(NS, "A"));
        assert_eq!(has_many.target(), Id::qualified(NS, "B"));
        assert_eq!(has_many.label(), "has many b");
        assert_eq!(has_many.property_name(), Some("b"));

        let is_a = &diagram.edges()[1];
        assert_eq!(is_a.source(), Id::qualified(NS, "B"));
        assert_eq!(is_a.target(), Id::qualified(NS, "C"));
        assert_eq!(is_a.label(), "is a C");
        assert!(is_a.is_super_type());
    }

    #[test]
    fn test_tiled_default_positions() {
        let mut model = Model::new(NS);
        for i in 0..6 {
            model = model.with_declaration(Declaration::concept(format!("D{i}")));
        }
        let diagram = Projector::new().project_all([&model]).unwrap();
        let positions: Vec<Point> = diagram.nodes().iter().map(|n| n.position()).collect();
        assert_eq!(
            positions,
            vec![
                Point::new(0.0, 0.0),
                Point::new(200.0, 0.0),
                Point::new(400.0, 0.0),
                Point::new(600.0, 0.0),
                Point::new(0.0, 400.0),
                Point::new(200.0, 400.0),
            ]
        );
    }

    #[test]
    fn test_tiles_continue_across_namespaces() {
        let first = Model::new("one").with_declaration(Declaration::concept("A"));
        let second = Model::new("two").with_declaration(Declaration::concept("A"));
        let diagram = Projector::new().project_all([&first, &second]).unwrap();
        assert_eq!(diagram.nodes()[0].position(), Point::new(0.0, 0.0));
        assert_eq!(diagram.nodes()[1].position(), Point::new(200.0, 0.0));
    }

    #[test]
    fn test_explicit_position_overrides_tile() {
        let model = Model::new(NS)
            .with_declaration(Declaration::concept("A"))
            .with_declaration(Declaration::concept("B").with_decorator(at(-15.0, 42.5)));
        let diagram = Projector::new().project_all([&model]).unwrap();
        assert_eq!(diagram.nodes()[1].position(), Point::new(-15.0, 42.5));
    }

    #[test]
    fn test_malformed_position_falls_back_to_tile() {
        let three_args = Decorator::new(
            POSITION_DECORATOR,
            vec![
                DecoratorArgument::Number(1.0),
                DecoratorArgument::Number(2.0),
                DecoratorArgument::Number(3.0),
            ],
        );
        let not_numbers = Decorator::new(
            POSITION_DECORATOR,
            vec![
                DecoratorArgument::String("x".to_string()),
                DecoratorArgument::Number(2.0),
            ],
        );
        let other_name = Decorator::new(
            "position",
            vec![DecoratorArgument::Number(1.0), DecoratorArgument::Number(2.0)],
        );
        let model = Model::new(NS)
            .with_declaration(Declaration::concept("A").with_decorator(three_args))
            .with_declaration(Declaration::concept("B").with_decorator(not_numbers))
            .with_declaration(Declaration::concept("C").with_decorator(other_name));

        let diagram = Projector::new().project_all([&model]).unwrap();
        let projector = Projector::new();
        for (index, node) in diagram.nodes().iter().enumerate() {
            assert_eq!(node.position(), projector.tile_position(index));
        }
    }

    #[test]
    fn test_property_labels() {
        let model = Model::new(NS)
            .with_declaration(
                Declaration::concept("Order")
                    .with_property(object("address", "Address"))
                    .with_property(object("lines", "Line").with_array(true))
                    .with_property(Property::new(
                        "customer",
                        PropertyKind::Relationship(TypeIdentifier::local("Customer")),
                    ))
                    .with_property(
                        Property::new(
                            "items",
                            PropertyKind::Relationship(TypeIdentifier::local("Line")),
                        )
                        .with_array(true),
                    ),
            )
            .with_declaration(Declaration::concept("Address"))
            .with_declaration(Declaration::concept("Line"))
            .with_declaration(Declaration::concept("Customer"));

        let diagram = Projector::new().project_all([&model]).unwrap();
        let labels: Vec<&str> = diagram.edges().iter().map(|e| e.label()).collect();
        assert_eq!(
            labels,
            vec![
                "has an address",
                "has many lines",
                "references a customer",
                "references many items"
            ]
        );
    }

    #[test]
    fn test_primitive_and_enum_value_properties_have_no_edges() {
        let model = Model::new(NS)
            .with_declaration(
                Declaration::concept("Person")
                    .with_property(Property::new("name", PropertyKind::String))
                    .with_property(Property::new("age", PropertyKind::Integer)),
            )
            .with_declaration(
                Declaration::enumeration("Color")
                    .with_property(Property::new("RED", PropertyKind::EnumValue)),
            );
        let diagram = Projector::new().project_all([&model]).unwrap();
        assert_eq!(diagram.nodes().len(), 2);
        assert!(diagram.edges().is_empty());
    }

    #[test]
    fn test_object_property_to_enum_has_edge() {
        let model = Model::new(NS)
            .with_declaration(Declaration::concept("Car").with_property(object("color", "Color")))
            .with_declaration(Declaration::enumeration("Color"));
        let diagram = Projector::new().project_all([&model]).unwrap();
        assert_eq!(diagram.edges().len(), 1);
        assert_eq!(diagram.edges()[0].label(), "has a color");
    }

    #[test]
    fn test_unresolved_property_type_is_an_error() {
        let model = Model::new(NS)
            .with_declaration(Declaration::concept("A").with_property(object("ghost", "Ghost")));
        let err = Projector::new().project_all([&model]).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::UnresolvedType {
                owner: format!("{NS}.A"),
                property: "ghost".to_string(),
                target: format!("{NS}.Ghost"),
            }
        );
        assert_eq!(err.code(), "P001");
    }

    #[test]
    fn test_unresolved_super_type_is_an_error() {
        let model = Model::new(NS).with_declaration(
            Declaration::concept("A").with_super_type(TypeIdentifier::qualified("other", "Base")),
        );
        let err = Projector::new().project_all([&model]).unwrap_err();
        assert!(matches!(err, ProjectionError::UnresolvedSuperType { .. }));
        assert_eq!(err.code(), "P002");
    }

    #[test]
    fn test_duplicate_declaration_is_an_error() {
        let model = Model::new(NS)
            .with_declaration(Declaration::concept("A"))
            .with_declaration(Declaration::enumeration("A"));
        let err = Projector::new().project_all([&model]).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::DuplicateDeclaration {
                id: format!("{NS}.A")
            }
        );
    }

    #[test]
    fn test_cross_namespace_reference() {
        let base = Model::new("org.base").with_declaration(Declaration::concept("Entity"));
        let app = Model::new("org.app").with_declaration(
            Declaration::concept("User")
                .with_super_type(TypeIdentifier::qualified("org.base", "Entity")),
        );
        let diagram = Projector::new().project_all([&base, &app]).unwrap();
        assert_eq!(diagram.edges().len(), 1);
        assert_eq!(diagram.edges()[0].target(), "org.base.Entity");
        assert_eq!(diagram.edges()[0].label(), "is a Entity");
    }

    #[test]
    fn test_hidden_namespace_removes_nodes_and_incident_edges() {
        let base = Model::new("org.base").with_declaration(Declaration::concept("Entity"));
        let app = Model::new("org.app")
            .with_declaration(
                Declaration::concept("User")
                    .with_super_type(TypeIdentifier::qualified("org.base", "Entity"))
                    .with_property(object("profile", "Profile")),
            )
            .with_declaration(Declaration::concept("Profile"));

        let projector = Projector::new();
        let hidden = projector.project([(&base, false), (&app, true)]).unwrap();
        let ids: Vec<String> = hidden.nodes().iter().map(|n| n.id().to_string()).collect();
        assert_eq!(ids, vec!["org.app.User", "org.app.Profile"]);
        assert_eq!(hidden.edges().len(), 1);
        assert_eq!(hidden.edges()[0].label(), "has a profile");

        let app_hidden = projector.project([(&base, true), (&app, false)]).unwrap();
        assert_eq!(app_hidden.nodes().len(), 1);
        assert!(app_hidden.edges().is_empty());
    }

    #[test]
    fn test_visibility_round_trip() {
        let base = Model::new("org.base").with_declaration(Declaration::concept("Entity"));
        let app = Model::new("org.app").with_declaration(
            Declaration::concept("User")
                .with_super_type(TypeIdentifier::qualified("org.base", "Entity")),
        );
        let projector = Projector::new();
        let before = projector.project([(&base, true), (&app, true)]).unwrap();
        let _hidden = projector.project([(&base, false), (&app, true)]).unwrap();
        let after = projector.project([(&base, true), (&app, true)]).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_broken_hidden_namespace_is_ignored() {
        // Broken references inside a hidden namespace do not fail the projection
        let broken = Model::new("org.broken")
            .with_declaration(Declaration::concept("A").with_property(object("x", "Missing")));
        let diagram = Projector::new().project([(&broken, false)]).unwrap();
        assert!(diagram.is_empty());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let model = abc_model();
        let projector = Projector::new();
        assert_eq!(
            projector.project_all([&model]).unwrap(),
            projector.project_all([&model]).unwrap()
        );
    }

    #[test]
    fn test_empty_input() {
        let diagram = Projector::new().project_all(std::iter::empty()).unwrap();
        assert!(diagram.is_empty());
        assert!(diagram.edges().is_empty());
    }

    proptest! {
        #[test]
        fn prop_tiles_are_distinct_and_follow_grid(count in 0usize..40) {
            let mut model = Model::new(NS);
            for i in 0..count {
                model = model.with_declaration(Declaration::concept(format!("D{i}")));
            }
            let diagram = Projector::new().project_all([&model]).unwrap();
            prop_assert_eq!(diagram.nodes().len(), count);
            for (index, node) in diagram.nodes().iter().enumerate() {
                let expected = Point::new((index % 4) as f32 * 200.0, (index / 4) as f32 * 400.0);
                prop_assert_eq!(node.position(), expected);
            }
            for (i, a) in diagram.nodes().iter().enumerate() {
                for b in &diagram.nodes()[i + 1..] {
                    prop_assert_ne!(a.position(), b.position());
                }
            }
        }

        #[test]
        fn prop_explicit_positions_are_exact(x in -10_000i32..10_000, y in -10_000i32..10_000) {
            let model = Model::new(NS).with_declaration(
                Declaration::concept("A").with_decorator(at(f64::from(x), f64::from(y))),
            );
            let diagram = Projector::new().project_all([&model]).unwrap();
            prop_assert_eq!(diagram.nodes()[0].position(), Point::new(x as f32, y as f32));
        }
    }
}
