//! Editor state for a set of namespaces.
//!
//! The [`Workspace`] owns the loaded models in load order together with the
//! visibility of each namespace. It is the single place where the diagram
//! writes back into the models: moving a node stores its position as a
//! `@diagram(x, y)` decorator on the declaration.

use indexmap::IndexMap;
use log::{debug, info};
use thiserror::Error;

use concerto_diagram_core::{
    geometry::Point,
    metamodel::{Decorator, DecoratorArgument, Model, Models, namespace_of, short_name},
};

use crate::{
    graph::Diagram,
    projection::{POSITION_DECORATOR, ProjectionError, Projector},
};

/// Errors raised by workspace edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("namespace `{0}` is not loaded")]
    UnknownNamespace(String),

    #[error("declaration `{0}` does not exist")]
    UnknownDeclaration(String),

    #[error("namespace `{0}` is already loaded")]
    NamespaceExists(String),
}

/// A loaded model and whether its namespace is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    model: Model,
    visible: bool,
}

impl ModelEntry {
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Ordered set of namespaces being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    entries: IndexMap<String, ModelEntry>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workspace with every model of `models` visible.
    pub fn from_models(models: Models) -> Self {
        let mut workspace = Self::new();
        workspace.load(models);
        workspace
    }

    /// Loads `models`, replacing models of the same namespace in place.
    ///
    /// New namespaces are appended and visible. Replaced namespaces keep
    /// their position and visibility.
    pub fn load(&mut self, models: Models) {
        for model in models.into_models() {
            self.insert_model(model);
        }
        info!(namespaces = self.entries.len(); "Loaded models");
    }

    pub fn insert_model(&mut self, model: Model) {
        let namespace = model.namespace().to_string();
        match self.entries.get_mut(&namespace) {
            Some(entry) => {
                debug!(namespace:% = namespace; "Replacing model");
                entry.model = model;
            }
            None => {
                debug!(namespace:% = namespace; "Adding model");
                self.entries.insert(
                    namespace,
                    ModelEntry {
                        model,
                        visible: true,
                    },
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, namespace: &str) -> Option<&ModelEntry> {
        self.entries.get(namespace)
    }

    pub fn model(&self, namespace: &str) -> Option<&Model> {
        self.entry(namespace).map(ModelEntry::model)
    }

    /// Every model in load order, paired with its visibility.
    pub fn namespaces(&self) -> impl Iterator<Item = (&Model, bool)> {
        self.entries
            .values()
            .map(|entry| (&entry.model, entry.visible))
    }

    pub fn is_visible(&self, namespace: &str) -> Option<bool> {
        self.entry(namespace).map(ModelEntry::is_visible)
    }

    pub fn set_visible(&mut self, namespace: &str, visible: bool) -> Result<(), WorkspaceError> {
        let entry = self.entry_mut(namespace)?;
        entry.visible = visible;
        debug!(namespace, visible; "Changed namespace visibility");
        Ok(())
    }

    /// Flips the visibility of `namespace` and returns the new value.
    pub fn toggle_visible(&mut self, namespace: &str) -> Result<bool, WorkspaceError> {
        let entry = self.entry_mut(namespace)?;
        entry.visible = !entry.visible;
        let visible = entry.visible;
        debug!(namespace, visible; "Toggled namespace visibility");
        Ok(visible)
    }

    /// Removes `namespace` and returns its model.
    pub fn remove_namespace(&mut self, namespace: &str) -> Result<Model, WorkspaceError> {
        self.entries
            .shift_remove(namespace)
            .map(|entry| entry.model)
            .ok_or_else(|| WorkspaceError::UnknownNamespace(namespace.to_string()))
    }

    /// Renames a namespace, keeping its position in the load order.
    ///
    /// References to the old name from other namespaces are left untouched.
    pub fn rename_namespace(&mut self, from: &str, to: &str) -> Result<(), WorkspaceError> {
        if from == to {
            return self.entry_mut(from).map(|_| ());
        }
        if self.entries.contains_key(to) {
            return Err(WorkspaceError::NamespaceExists(to.to_string()));
        }
        let (index, _, mut entry) = self
            .entries
            .shift_remove_full(from)
            .ok_or_else(|| WorkspaceError::UnknownNamespace(from.to_string()))?;
        entry.model.set_namespace(to);
        self.entries.shift_insert(index, to.to_string(), entry);
        info!(from, to; "Renamed namespace");
        Ok(())
    }

    /// Stores the position of a moved node on its declaration.
    ///
    /// `id` is the fully qualified name of the declaration. The position is
    /// written as `@diagram(x, y)` with both coordinates truncated toward
    /// zero, replacing any previous position.
    pub fn position_changed(&mut self, id: &str, position: Point) -> Result<(), WorkspaceError> {
        let namespace = namespace_of(id);
        let entry = self.entry_mut(namespace)?;
        let declaration = entry
            .model
            .declaration_mut(short_name(id))
            .ok_or_else(|| WorkspaceError::UnknownDeclaration(id.to_string()))?;

        let x = position.x().trunc();
        let y = position.y().trunc();
        declaration.set_decorator(Decorator::new(
            POSITION_DECORATOR,
            vec![
                DecoratorArgument::Number(f64::from(x)),
                DecoratorArgument::Number(f64::from(y)),
            ],
        ));
        debug!(id, x, y; "Stored node position");
        Ok(())
    }

    /// Projects the visible namespaces.
    pub fn project(&self, projector: &Projector) -> Result<Diagram, ProjectionError> {
        projector.project(self.namespaces())
    }

    /// Copy of the current state, e.g. for undo history.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// All models in load order, hidden ones included.
    pub fn to_models(&self) -> Models {
        Models::new(
            self.entries
                .values()
                .map(|entry| entry.model.clone())
                .collect(),
        )
    }

    fn entry_mut(&mut self, namespace: &str) -> Result<&mut ModelEntry, WorkspaceError> {
        self.entries
            .get_mut(namespace)
            .ok_or_else(|| WorkspaceError::UnknownNamespace(namespace.to_string()))
    }
}
