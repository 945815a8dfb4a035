use crate::ir::{GenericRecord, PortRecord};

/// Receives ports as they are imported or deselected.
pub trait PortSink {
    fn add_port(&mut self, port: &PortRecord);
    fn remove_port(&mut self, port: &PortRecord);
}

/// Receives generics as they are imported or deselected.
pub trait GenericSink {
    fn add_generic(&mut self, generic: &GenericRecord);
    fn remove_generic(&mut self, generic: &GenericRecord);
}

/// Reports every event through `tracing`.
pub struct LogSink;

impl PortSink for LogSink {
    fn add_port(&mut self, port: &PortRecord) {
        tracing::info!("Add port {} ({})", port.name, port.id);
    }

    fn remove_port(&mut self, port: &PortRecord) {
        tracing::info!("Remove port {} ({})", port.name, port.id);
    }
}

impl GenericSink for LogSink {
    fn add_generic(&mut self, generic: &GenericRecord) {
        tracing::info!("Add generic {} ({})", generic.name, generic.id);
    }

    fn remove_generic(&mut self, generic: &GenericRecord) {
        tracing::info!("Remove generic {} ({})", generic.name, generic.id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    AddGeneric(GenericRecord),
    RemoveGeneric(GenericRecord),
    AddPort(PortRecord),
    RemovePort(PortRecord),
}

impl SinkEvent {
    /// Name of the record the event carries.
    pub fn name(&self) -> &str {
        match self {
            SinkEvent::AddGeneric(g) | SinkEvent::RemoveGeneric(g) => &g.name,
            SinkEvent::AddPort(p) | SinkEvent::RemovePort(p) => &p.name,
        }
    }
}

/// Keeps every event, in the order it was emitted.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl PortSink for RecordingSink {
    fn add_port(&mut self, port: &PortRecord) {
        self.events.push(SinkEvent::AddPort(port.clone()));
    }

    fn remove_port(&mut self, port: &PortRecord) {
        self.events.push(SinkEvent::RemovePort(port.clone()));
    }
}

impl GenericSink for RecordingSink {
    fn add_generic(&mut self, generic: &GenericRecord) {
        self.events.push(SinkEvent::AddGeneric(generic.clone()));
    }

    fn remove_generic(&mut self, generic: &GenericRecord) {
        self.events.push(SinkEvent::RemoveGeneric(generic.clone()));
    }
}
