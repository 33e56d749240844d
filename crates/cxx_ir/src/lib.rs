//! Core data types for cxx-syntax: spans, tokens, node kinds, and the
//! concrete syntax tree arena.
//!
//! This crate has no knowledge of the grammar or the parser; it only defines
//! the vocabulary they share and the read-only tree API handed to consumers.

mod node;
mod span;
mod token;
mod tree;

pub use node::{FieldName, NodeKind};
pub use span::{Span, SpanError};
pub use token::{ExternalToken, Token, TokenKind, TokenList};
pub use tree::{InputEdit, NodeId, NodeRef, SyntaxTree};
