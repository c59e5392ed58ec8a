// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for the sable stylesheet language.
//!
//! This crate defines the token kinds, AST nodes, visitor traversal, and
//! selector resolution shared between the lexer, parser, and compiler.

pub mod span;
pub mod token;
pub mod expr;
pub mod stmt;
pub mod visit;
pub mod selector;

pub use span::{LineMap, Span};

/// Unique identifier for AST nodes.
///
/// Used by semantic passes to track per-node state (reduction results,
/// consumed literals) without storing it in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}
