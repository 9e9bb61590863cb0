//! Typed Concerto metamodel.
//!
//! The external Concerto parser emits models as a JSON AST in which every
//! object carries a `$class` tag such as
//! `concerto.metamodel@1.0.0.ConceptDeclaration`. This module reads that AST
//! into closed Rust types: the `$class` tag is interpreted exactly once, during
//! deserialization, and everything downstream matches on
//! [`DeclarationKind`], [`PropertyKind`] and [`DecoratorArgument`].
//!
//! Fields the diagram does not use (validators, default values, source
//! locations, ...) are kept verbatim on models, declarations and properties,
//! so a loaded model serializes back without losing information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Prefix used for `$class` tags written by this crate.
pub const METAMODEL_NAMESPACE: &str = "concerto.metamodel@1.0.0";

type Extra = Map<String, Value>;

/// Errors raised while interpreting the `$class` tags of a metamodel AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetamodelError {
    #[error("unknown {context} class `{class}`")]
    UnknownClass { context: &'static str, class: String },

    #[error("property `{property}` of class `{class}` has no type reference")]
    MissingTypeReference { property: String, class: String },

    #[error("decorator argument of class `{class}` has an invalid value")]
    InvalidDecoratorArgument { class: String },
}

fn class_of(short_name: &str) -> String {
    format!("{METAMODEL_NAMESPACE}.{short_name}")
}

/// Returns the short name of a `$class` tag, the text after its last `.`.
fn short_class(class: &str) -> &str {
    class.rsplit('.').next().unwrap_or(class)
}

/// Returns the short name of a fully qualified name.
///
/// ```
/// use concerto_diagram_core::metamodel::short_name;
///
/// assert_eq!(short_name("org.acme.Person"), "Person");
/// assert_eq!(short_name("Person"), "Person");
/// ```
pub fn short_name(fully_qualified_name: &str) -> &str {
    fully_qualified_name
        .rsplit_once('.')
        .map_or(fully_qualified_name, |(_, name)| name)
}

/// Returns the namespace part of a fully qualified name, or `""` when there is none.
pub fn namespace_of(fully_qualified_name: &str) -> &str {
    fully_qualified_name
        .rsplit_once('.')
        .map_or("", |(namespace, _)| namespace)
}

fn is_false(value: &bool) -> bool {
    !*value
}

// =============================================================================
// Models
// =============================================================================

/// A set of models, one per namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Models {
    #[serde(rename = "$class", default = "models_class")]
    class: String,
    #[serde(default)]
    models: Vec<Model>,
}

fn models_class() -> String {
    class_of("Models")
}

impl Models {
    pub fn new(models: Vec<Model>) -> Self {
        Self {
            class: models_class(),
            models,
        }
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn into_models(self) -> Vec<Model> {
        self.models
    }
}

/// The declarations of one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "$class", default = "model_class")]
    class: String,
    namespace: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    imports: Vec<Value>,
    #[serde(default)]
    declarations: Vec<Declaration>,
    #[serde(flatten)]
    extra: Extra,
}

fn model_class() -> String {
    class_of("Model")
}

impl Model {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            class: model_class(),
            namespace: namespace.into(),
            imports: Vec::new(),
            declarations: Vec::new(),
            extra: Extra::new(),
        }
    }

    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Returns the declaration with the given short name.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|decl| decl.name == name)
    }

    pub fn declaration_mut(&mut self, name: &str) -> Option<&mut Declaration> {
        self.declarations.iter_mut().find(|decl| decl.name == name)
    }
}

/// Reference to a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeIdentifier {
    #[serde(rename = "$class", default = "type_identifier_class")]
    class: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

fn type_identifier_class() -> String {
    class_of("TypeIdentifier")
}

impl TypeIdentifier {
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            class: type_identifier_class(),
            name: name.into(),
            namespace,
        }
    }

    /// A type identifier with an explicit namespace.
    pub fn qualified(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(name, Some(namespace.into()))
    }

    /// A type identifier without namespace, resolved against the owning model.
    pub fn local(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns `namespace.name`, or just `name` when the namespace is absent or empty.
    pub fn fully_qualified_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!("{namespace}.{}", self.name),
            _ => self.name.clone(),
        }
    }

    /// Returns the namespace this identifier refers to, defaulting to `owner`.
    pub fn namespace_or<'a>(&'a self, owner: &'a str) -> &'a str {
        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => namespace,
            _ => owner,
        }
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// The class of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Concept,
    Asset,
    Participant,
    Transaction,
    Event,
    Enum,
}

impl DeclarationKind {
    fn from_class(class: &str) -> Result<Self, MetamodelError> {
        match short_class(class) {
            "ConceptDeclaration" => Ok(Self::Concept),
            "AssetDeclaration" => Ok(Self::Asset),
            "ParticipantDeclaration" => Ok(Self::Participant),
            "TransactionDeclaration" => Ok(Self::Transaction),
            "EventDeclaration" => Ok(Self::Event),
            "EnumDeclaration" => Ok(Self::Enum),
            _ => Err(MetamodelError::UnknownClass {
                context: "declaration",
                class: class.to_string(),
            }),
        }
    }

    /// Human readable class name, e.g. `Concept` or `Enum`.
    pub fn description(self) -> &'static str {
        match self {
            Self::Concept => "Concept",
            Self::Asset => "Asset",
            Self::Participant => "Participant",
            Self::Transaction => "Transaction",
            Self::Event => "Event",
            Self::Enum => "Enum",
        }
    }

    pub fn is_enum(self) -> bool {
        matches!(self, Self::Enum)
    }
}

/// A named type definition within a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDeclaration", into = "RawDeclaration")]
pub struct Declaration {
    name: String,
    kind: DeclarationKind,
    is_abstract: bool,
    super_type: Option<TypeIdentifier>,
    properties: Vec<Property>,
    decorators: Vec<Decorator>,
    extra: Extra,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_abstract: false,
            super_type: None,
            properties: Vec::new(),
            decorators: Vec::new(),
            extra: Extra::new(),
        }
    }

    pub fn concept(name: impl Into<String>) -> Self {
        Self::new(name, DeclarationKind::Concept)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, DeclarationKind::Enum)
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_super_type(mut self, super_type: TypeIdentifier) -> Self {
        self.super_type = Some(super_type);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn super_type(&self) -> Option<&TypeIdentifier> {
        self.super_type.as_ref()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }

    /// Returns the first decorator with the given name.
    pub fn decorator(&self, name: &str) -> Option<&Decorator> {
        self.decorators.iter().find(|decorator| decorator.name == name)
    }

    /// Inserts a decorator, replacing the arguments of an existing decorator with the same name.
    pub fn set_decorator(&mut self, decorator: Decorator) {
        match self
            .decorators
            .iter_mut()
            .find(|existing| existing.name == decorator.name)
        {
            Some(existing) => existing.arguments = decorator.arguments,
            None => self.decorators.push(decorator),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeclaration {
    #[serde(rename = "$class")]
    class: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_abstract: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    super_type: Option<TypeIdentifier>,
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    decorators: Vec<Decorator>,
    #[serde(flatten)]
    extra: Extra,
}

impl TryFrom<RawDeclaration> for Declaration {
    type Error = MetamodelError;

    fn try_from(raw: RawDeclaration) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: DeclarationKind::from_class(&raw.class)?,
            name: raw.name,
            is_abstract: raw.is_abstract.unwrap_or(false),
            super_type: raw.super_type,
            properties: raw.properties,
            decorators: raw.decorators,
            extra: raw.extra,
        })
    }
}

impl From<Declaration> for RawDeclaration {
    fn from(decl: Declaration) -> Self {
        let class = class_of(match decl.kind {
            DeclarationKind::Concept => "ConceptDeclaration",
            DeclarationKind::Asset => "AssetDeclaration",
            DeclarationKind::Participant => "ParticipantDeclaration",
            DeclarationKind::Transaction => "TransactionDeclaration",
            DeclarationKind::Event => "EventDeclaration",
            DeclarationKind::Enum => "EnumDeclaration",
        });
        Self {
            class,
            name: decl.name,
            is_abstract: (!decl.kind.is_enum()).then_some(decl.is_abstract),
            super_type: decl.super_type,
            properties: decl.properties,
            decorators: decl.decorators,
            extra: decl.extra,
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

/// The value type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    String,
    Boolean,
    DateTime,
    Double,
    Integer,
    Long,
    /// A value of an enumeration declaration.
    EnumValue,
    /// Contains an instance of another declaration.
    Object(TypeIdentifier),
    /// Refers to an identified instance of another declaration.
    Relationship(TypeIdentifier),
}

impl PropertyKind {
    fn short_class(&self) -> &'static str {
        match self {
            Self::String => "StringProperty",
            Self::Boolean => "BooleanProperty",
            Self::DateTime => "DateTimeProperty",
            Self::Double => "DoubleProperty",
            Self::Integer => "IntegerProperty",
            Self::Long => "LongProperty",
            Self::EnumValue => "EnumProperty",
            Self::Object(_) => "ObjectProperty",
            Self::Relationship(_) => "RelationshipProperty",
        }
    }
}

/// A named, typed member of a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProperty", into = "RawProperty")]
pub struct Property {
    name: String,
    kind: PropertyKind,
    is_array: bool,
    is_optional: bool,
    decorators: Vec<Decorator>,
    extra: Extra,
}

impl Property {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_array: false,
            is_optional: false,
            decorators: Vec::new(),
            extra: Extra::new(),
        }
    }

    pub fn with_array(mut self, is_array: bool) -> Self {
        self.is_array = is_array;
        self
    }

    pub fn with_optional(mut self, is_optional: bool) -> Self {
        self.is_optional = is_optional;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self.kind, PropertyKind::Relationship(_))
    }

    /// Returns the referenced declaration for object and relationship properties.
    pub fn type_reference(&self) -> Option<&TypeIdentifier> {
        match &self.kind {
            PropertyKind::Object(type_id) | PropertyKind::Relationship(type_id) => Some(type_id),
            _ => None,
        }
    }

    /// Returns the name of the property type as shown on a diagram node.
    ///
    /// Enum values have no type and yield an empty string.
    pub fn type_display_name(&self) -> &str {
        match &self.kind {
            PropertyKind::String => "String",
            PropertyKind::Boolean => "Boolean",
            PropertyKind::DateTime => "DateTime",
            PropertyKind::Double => "Double",
            PropertyKind::Integer => "Integer",
            PropertyKind::Long => "Long",
            PropertyKind::EnumValue => "",
            PropertyKind::Object(type_id) | PropertyKind::Relationship(type_id) => {
                short_name(type_id.name())
            }
        }
    }

    /// Space separated modifiers: `optional`, `array` and `reference`, in that order.
    pub fn modifiers(&self) -> String {
        [
            (self.is_optional, "optional"),
            (self.is_array, "array"),
            (self.is_relationship(), "reference"),
        ]
        .into_iter()
        .filter_map(|(set, word)| set.then_some(word))
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperty {
    #[serde(rename = "$class")]
    class: String,
    name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    type_id: Option<TypeIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_array: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    decorators: Vec<Decorator>,
    #[serde(flatten)]
    extra: Extra,
}

impl TryFrom<RawProperty> for Property {
    type Error = MetamodelError;

    fn try_from(raw: RawProperty) -> Result<Self, Self::Error> {
        let missing_type = || MetamodelError::MissingTypeReference {
            property: raw.name.clone(),
            class: raw.class.clone(),
        };
        let kind = match short_class(&raw.class) {
            "StringProperty" => PropertyKind::String,
            "BooleanProperty" => PropertyKind::Boolean,
            "DateTimeProperty" => PropertyKind::DateTime,
            "DoubleProperty" => PropertyKind::Double,
            "IntegerProperty" => PropertyKind::Integer,
            "LongProperty" => PropertyKind::Long,
            "EnumProperty" => PropertyKind::EnumValue,
            "ObjectProperty" => PropertyKind::Object(raw.type_id.clone().ok_or_else(missing_type)?),
            "RelationshipProperty" => {
                PropertyKind::Relationship(raw.type_id.clone().ok_or_else(missing_type)?)
            }
            _ => {
                return Err(MetamodelError::UnknownClass {
                    context: "property",
                    class: raw.class,
                });
            }
        };
        Ok(Self {
            name: raw.name,
            kind,
            is_array: raw.is_array.unwrap_or(false),
            is_optional: raw.is_optional.unwrap_or(false),
            decorators: raw.decorators,
            extra: raw.extra,
        })
    }
}

impl From<Property> for RawProperty {
    fn from(property: Property) -> Self {
        let class = class_of(property.kind.short_class());
        let is_enum_value = matches!(property.kind, PropertyKind::EnumValue);
        let type_id = match property.kind {
            PropertyKind::Object(type_id) | PropertyKind::Relationship(type_id) => Some(type_id),
            _ => None,
        };
        Self {
            class,
            name: property.name,
            type_id,
            is_array: (!is_enum_value).then_some(property.is_array),
            is_optional: (!is_enum_value).then_some(property.is_optional),
            decorators: property.decorators,
            extra: property.extra,
        }
    }
}

// =============================================================================
// Decorators
// =============================================================================

/// An annotation attached to a declaration or property, e.g. `@diagram(10, 20)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decorator {
    #[serde(rename = "$class", default = "decorator_class")]
    class: String,
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    arguments: Vec<DecoratorArgument>,
}

fn decorator_class() -> String {
    class_of("Decorator")
}

impl Decorator {
    pub fn new(name: impl Into<String>, arguments: Vec<DecoratorArgument>) -> Self {
        Self {
            class: decorator_class(),
            name: name.into(),
            arguments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[DecoratorArgument] {
        &self.arguments
    }
}

/// A literal argument of a decorator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDecoratorArgument", into = "RawDecoratorArgument")]
pub enum DecoratorArgument {
    String(String),
    Number(f64),
    Boolean(bool),
    TypeReference {
        type_id: TypeIdentifier,
        is_array: bool,
    },
}

impl DecoratorArgument {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDecoratorArgument {
    #[serde(rename = "$class")]
    class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    type_id: Option<TypeIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_array: Option<bool>,
}

impl TryFrom<RawDecoratorArgument> for DecoratorArgument {
    type Error = MetamodelError;

    fn try_from(raw: RawDecoratorArgument) -> Result<Self, Self::Error> {
        let invalid = || MetamodelError::InvalidDecoratorArgument {
            class: raw.class.clone(),
        };
        match short_class(&raw.class) {
            "DecoratorString" => match &raw.value {
                Some(Value::String(value)) => Ok(Self::String(value.clone())),
                _ => Err(invalid()),
            },
            "DecoratorNumber" => raw
                .value
                .as_ref()
                .and_then(Value::as_f64)
                .map(Self::Number)
                .ok_or_else(invalid),
            "DecoratorBoolean" => raw
                .value
                .as_ref()
                .and_then(Value::as_bool)
                .map(Self::Boolean)
                .ok_or_else(invalid),
            "DecoratorTypeReference" => {
                let type_id = raw.type_id.clone().ok_or_else(invalid)?;
                Ok(Self::TypeReference {
                    type_id,
                    is_array: raw.is_array.unwrap_or(false),
                })
            }
            _ => Err(MetamodelError::UnknownClass {
                context: "decorator argument",
                class: raw.class,
            }),
        }
    }
}

impl From<DecoratorArgument> for RawDecoratorArgument {
    fn from(argument: DecoratorArgument) -> Self {
        match argument {
            DecoratorArgument::String(value) => Self {
                class: class_of("DecoratorString"),
                value: Some(Value::String(value)),
                type_id: None,
                is_array: None,
            },
            DecoratorArgument::Number(value) => Self {
                class: class_of("DecoratorNumber"),
                value: Some(Value::from(value)),
                type_id: None,
                is_array: None,
            },
            DecoratorArgument::Boolean(value) => Self {
                class: class_of("DecoratorBoolean"),
                value: Some(Value::Bool(value)),
                type_id: None,
                is_array: None,
            },
            DecoratorArgument::TypeReference { type_id, is_array } => Self {
                class: class_of("DecoratorTypeReference"),
                value: None,
                type_id: Some(type_id),
                is_array: Some(is_array),
            },
        }
    }
}
