pub mod model;

pub use model::{
    BlockSpan, DeclarationKind, DeclarationSpan, EntitySpan, GenericRecord, PortDirection,
    PortRecord, RecordId, SpanId,
};
