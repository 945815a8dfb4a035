use crate::ir::{RecordId, SpanId};

/// Reasons a document yields no records at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructureError {
    #[error("no `entity <name> is` declaration found")]
    NoEntity,

    #[error("expected exactly one entity declaration, found {0}")]
    MultipleEntities(usize),

    #[error("entity `{0}` has no matching `end` statement")]
    MissingEntityEnd(String),

    #[error("generic and port blocks overlap")]
    OverlappingBlocks,

    #[error("Failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// An expression that cannot be reduced to an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,

    #[error("based literals are not evaluated")]
    BasedLiteral,

    #[error("string and character literals are not evaluated")]
    QuotedLiteral,

    #[error("not an arithmetic expression: {0}")]
    Malformed(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown name: {0}")]
    UnknownName(String),

    #[error("generic `{name}` holds non-numeric value `{value}`")]
    NonNumericValue { name: String, value: String },

    #[error("integer overflow")]
    Overflow,
}

/// Misuse of the importer's mutating entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("no record with id {0}")]
    UnknownRecord(RecordId),

    #[error("no declaration with id {0}")]
    UnknownSpan(SpanId),

    #[error("{0} is not a generic")]
    NotAGeneric(RecordId),
}
