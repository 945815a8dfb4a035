use std::collections::{BTreeMap, BTreeSet};

use crate::ir::{DeclarationSpan, GenericRecord, PortRecord, RecordId, SpanId};

/// Which records have bounds or defaults written in terms of which generic.
///
/// Built once per parse pass. Edges only ever point one hop away from a
/// generic; chains through other generics are not followed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    ports: BTreeMap<RecordId, BTreeSet<RecordId>>,
    generics: BTreeMap<RecordId, BTreeSet<RecordId>>,
}

impl DependencyGraph {
    /// Link every generic to the records whose declaration text mentions its name.
    ///
    /// With `whole_identifiers` unset a mention is plain substring containment,
    /// so `N` is also found inside `N_BITS`.
    pub fn build(
        source: &str,
        declarations: &[DeclarationSpan],
        generics: &[GenericRecord],
        ports: &[PortRecord],
        whole_identifiers: bool,
    ) -> Self {
        let text_of = |span: SpanId| {
            declarations
                .iter()
                .find(|d| d.id == span)
                .map_or("", |d| d.text(source))
        };

        let mut graph = Self::default();

        for generic in generics {
            for port in ports {
                if mentions(text_of(port.span), &generic.name, whole_identifiers) {
                    graph.ports.entry(generic.id).or_default().insert(port.id);
                }
            }

            for other in generics.iter().filter(|other| other.id != generic.id) {
                if mentions(text_of(other.span), &generic.name, whole_identifiers) {
                    graph.generics.entry(generic.id).or_default().insert(other.id);
                }
            }
        }

        graph
    }

    pub fn dependent_ports(&self, generic: RecordId) -> impl Iterator<Item = RecordId> + '_ {
        self.ports.get(&generic).into_iter().flatten().copied()
    }

    pub fn dependent_generics(&self, generic: RecordId) -> impl Iterator<Item = RecordId> + '_ {
        self.generics.get(&generic).into_iter().flatten().copied()
    }

    pub fn edge_count(&self) -> usize {
        self.ports.values().map(BTreeSet::len).sum::<usize>()
            + self.generics.values().map(BTreeSet::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }
}

/// Whether `text` refers to `name`.
pub fn mentions(text: &str, name: &str, whole_identifiers: bool) -> bool {
    if name.is_empty() {
        return false;
    }
    if !whole_identifiers {
        return text.contains(name);
    }
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|word| word == name)
}
