use thiserror::Error;

/// Errors produced while lexing, parsing or building a tree from a regular
/// expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    #[error("invalid symbol at byte offset {0}")]
    InvalidSymbol(usize),

    #[error("empty expression")]
    EmptyExpression,

    #[error("unbalanced parenthesis")]
    UnbalancedParen,

    #[error("invalid node type encountered during tree traversal")]
    InvalidNodeType,

    #[error("invalid access to a tree node's child")]
    InvalidTreeChildAccess,
}
