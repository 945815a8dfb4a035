pub mod graph;
pub mod importer;
pub mod sink;

pub use graph::{mentions, DependencyGraph};
pub use importer::{EntityImporter, ImportSummary, Reevaluation};
pub use sink::{GenericSink, LogSink, PortSink, RecordingSink, SinkEvent};
