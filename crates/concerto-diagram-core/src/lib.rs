//! Concerto Diagram Core Types
//!
//! This crate provides the foundational types shared by the Concerto diagram
//! crates. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Metamodel**: Typed Concerto metamodel loaded from the JSON AST ([`metamodel`] module)

pub mod geometry;
pub mod identifier;
pub mod metamodel;
