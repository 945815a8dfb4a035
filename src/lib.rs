pub mod config;
pub mod error;
pub mod import;
pub mod ir;
pub mod parser;
pub mod report;

// Re-export commonly used types
pub use config::ImportConfig;
pub use error::{EvalError, ImportError, StructureError};
pub use import::{
    DependencyGraph, EntityImporter, GenericSink, ImportSummary, LogSink, PortSink,
    RecordingSink, Reevaluation, SinkEvent,
};
pub use ir::{
    DeclarationKind, DeclarationSpan, GenericRecord, PortDirection, PortRecord, RecordId, SpanId,
};
pub use report::interface_report;
