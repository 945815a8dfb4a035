use anyhow::{Context, Result};
use std::path::Path;

use crate::config::ImportConfig;
use crate::error::{EvalError, ImportError, StructureError};
use crate::import::graph::DependencyGraph;
use crate::import::sink::{GenericSink, PortSink};
use crate::ir::{
    BlockSpan, DeclarationKind, DeclarationSpan, EntitySpan, GenericRecord, PortDirection,
    PortRecord, RecordId, SpanId,
};
use crate::parser::{
    self, DeclarationBlockScanner, EntityLayout, ExpressionEvaluator, ParsedDeclaration,
};

/// Outcome of one full parse pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub entity: Option<String>,
    pub generics: usize,
    pub ports: usize,
    pub dependencies: usize,
    /// Why nothing was recognized, when the document failed validation.
    pub rejected: Option<StructureError>,
}

impl ImportSummary {
    pub fn is_empty(&self) -> bool {
        self.generics == 0 && self.ports == 0
    }
}

/// Records touched by one generic value change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reevaluation {
    pub ports: Vec<RecordId>,
    pub generics: Vec<RecordId>,
}

/// Extracts the generics and ports of a single VHDL entity and keeps their
/// derived values in step with generic value edits.
///
/// Every call to [`EntityImporter::load_document`] replaces all records,
/// spans and dependency edges. Between loads only `enabled` flags, generic
/// values, port bounds and defaults change.
#[derive(Debug, Default)]
pub struct EntityImporter {
    config: ImportConfig,
    source: String,
    layout: Option<EntityLayout>,
    declarations: Vec<DeclarationSpan>,
    generics: Vec<GenericRecord>,
    ports: Vec<PortRecord>,
    graph: DependencyGraph,
}

impl EntityImporter {
    pub fn new(config: ImportConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn load_file<S>(&mut self, path: &Path, sink: &mut S) -> Result<ImportSummary>
    where
        S: PortSink + GenericSink + ?Sized,
    {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read VHDL file: {:?}", path))?;
        Ok(self.load_document(&content, sink))
    }

    /// Discard everything and import `text`.
    ///
    /// Records that are currently enabled are first withdrawn from `sink`. The
    /// new generics are then announced, followed by the new ports. A document
    /// without exactly one well-formed entity yields no records.
    pub fn load_document<S>(&mut self, text: &str, sink: &mut S) -> ImportSummary
    where
        S: PortSink + GenericSink + ?Sized,
    {
        self.withdraw(sink);
        self.clear();
        self.source = text.to_string();

        let layout = match parser::locate(text) {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!("Nothing recognized: {}", e);
                return self.summary(Some(e));
            }
        };

        if let Some(block) = layout.generics {
            self.parse_block(DeclarationKind::Generic, block);
        }
        for index in 0..self.generics.len() {
            self.evaluate_generic(index);
        }

        if let Some(block) = layout.ports {
            self.parse_block(DeclarationKind::Port, block);
        }
        for index in 0..self.ports.len() {
            self.evaluate_port(index);
        }

        self.layout = Some(layout);
        self.graph = DependencyGraph::build(
            &self.source,
            &self.declarations,
            &self.generics,
            &self.ports,
            self.config.token_dependencies,
        );

        for generic in &self.generics {
            sink.add_generic(generic);
        }
        for port in &self.ports {
            sink.add_port(port);
        }

        let summary = self.summary(None);
        tracing::info!(
            "Imported entity {:?}: {} generics, {} ports, {} dependencies",
            summary.entity,
            summary.generics,
            summary.ports,
            summary.dependencies
        );
        summary
    }

    /// Re-evaluate the ports and generics that mention generic `id`.
    ///
    /// Only direct dependents are refreshed; records depending on a refreshed
    /// generic are left as they are.
    pub fn on_generic_value_changed(&mut self, id: RecordId) -> Result<Reevaluation, ImportError> {
        self.generic_index(id)?;

        let ports: Vec<RecordId> = self.graph.dependent_ports(id).collect();
        let generics: Vec<RecordId> = self
            .graph
            .dependent_generics(id)
            .filter(|other| *other != id)
            .collect();

        tracing::debug!(
            "Generic {} changed: re-evaluating {} ports and {} generics",
            id,
            ports.len(),
            generics.len()
        );

        for port in &ports {
            if let Some(index) = self.ports.iter().position(|p| p.id == *port) {
                self.evaluate_port(index);
            }
        }
        for generic in &generics {
            if let Some(index) = self.generics.iter().position(|g| g.id == *generic) {
                self.evaluate_generic(index);
            }
        }

        Ok(Reevaluation { ports, generics })
    }

    /// Store a new value for generic `id` and refresh its dependents.
    pub fn set_generic_value(
        &mut self,
        id: RecordId,
        value: impl Into<String>,
    ) -> Result<Reevaluation, ImportError> {
        let index = self.generic_index(id)?;
        self.generics[index].value = value.into();
        self.on_generic_value_changed(id)
    }

    /// Select or deselect every record declared by `span`.
    ///
    /// Records whose state actually changes are announced to `sink`.
    pub fn on_selection_toggled<S>(
        &mut self,
        span: SpanId,
        enabled: bool,
        sink: &mut S,
    ) -> Result<(), ImportError>
    where
        S: PortSink + GenericSink + ?Sized,
    {
        let kind = self.declaration(span).ok_or(ImportError::UnknownSpan(span))?.kind;
        tracing::debug!("Span {} set to enabled={}", span, enabled);

        match kind {
            DeclarationKind::Generic => {
                for generic in self
                    .generics
                    .iter_mut()
                    .filter(|g| g.span == span && g.enabled != enabled)
                {
                    generic.enabled = enabled;
                    if enabled {
                        sink.add_generic(generic);
                    } else {
                        sink.remove_generic(generic);
                    }
                }
            }
            DeclarationKind::Port => {
                for port in self
                    .ports
                    .iter_mut()
                    .filter(|p| p.span == span && p.enabled != enabled)
                {
                    port.enabled = enabled;
                    if enabled {
                        sink.add_port(port);
                    } else {
                        sink.remove_port(port);
                    }
                }
            }
        }

        Ok(())
    }

    /// Flip the selection of `span`, returning the new state.
    pub fn toggle_span<S>(&mut self, span: SpanId, sink: &mut S) -> Result<bool, ImportError>
    where
        S: PortSink + GenericSink + ?Sized,
    {
        let enabled = !self.is_span_enabled(span)?;
        self.on_selection_toggled(span, enabled, sink)?;
        Ok(enabled)
    }

    /// The collaborator dropped port `id` on its own; deselect its span quietly.
    pub fn on_port_removed(&mut self, id: RecordId) -> Result<(), ImportError> {
        let span = self.port(id).ok_or(ImportError::UnknownRecord(id))?.span;
        for port in self.ports.iter_mut().filter(|p| p.span == span) {
            port.enabled = false;
        }
        Ok(())
    }

    /// The collaborator dropped generic `id` on its own; deselect its span quietly.
    pub fn on_generic_removed(&mut self, id: RecordId) -> Result<(), ImportError> {
        let span = self.generics[self.generic_index(id)?].span;
        for generic in self.generics.iter_mut().filter(|g| g.span == span) {
            generic.enabled = false;
        }
        Ok(())
    }

    pub fn is_span_enabled(&self, span: SpanId) -> Result<bool, ImportError> {
        let kind = self.declaration(span).ok_or(ImportError::UnknownSpan(span))?.kind;
        let enabled = match kind {
            DeclarationKind::Generic => self.generics.iter().any(|g| g.span == span && g.enabled),
            DeclarationKind::Port => self.ports.iter().any(|p| p.span == span && p.enabled),
        };
        Ok(enabled)
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entity(&self) -> Option<&EntitySpan> {
        self.layout.as_ref().map(|layout| &layout.entity)
    }

    pub fn generics_block(&self) -> Option<BlockSpan> {
        self.layout.as_ref().and_then(|layout| layout.generics)
    }

    pub fn ports_block(&self) -> Option<BlockSpan> {
        self.layout.as_ref().and_then(|layout| layout.ports)
    }

    pub fn declarations(&self) -> &[DeclarationSpan] {
        &self.declarations
    }

    pub fn declaration(&self, span: SpanId) -> Option<&DeclarationSpan> {
        self.declarations.iter().find(|d| d.id == span)
    }

    pub fn declaration_text(&self, span: SpanId) -> Option<&str> {
        self.declaration(span).map(|d| d.text(&self.source))
    }

    pub fn generics(&self) -> &[GenericRecord] {
        &self.generics
    }

    pub fn ports(&self) -> &[PortRecord] {
        &self.ports
    }

    pub fn generic(&self, id: RecordId) -> Option<&GenericRecord> {
        self.generics.iter().find(|g| g.id == id)
    }

    pub fn port(&self, id: RecordId) -> Option<&PortRecord> {
        self.ports.iter().find(|p| p.id == id)
    }

    pub fn generic_by_name(&self, name: &str) -> Option<&GenericRecord> {
        self.generics.iter().find(|g| g.name == name)
    }

    pub fn port_by_name(&self, name: &str) -> Option<&PortRecord> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Span declaring the generic or port called `name`.
    pub fn span_of(&self, name: &str) -> Option<SpanId> {
        self.generic_by_name(name)
            .map(|g| g.span)
            .or_else(|| self.port_by_name(name).map(|p| p.span))
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    fn clear(&mut self) {
        self.source.clear();
        self.layout = None;
        self.declarations.clear();
        self.generics.clear();
        self.ports.clear();
        self.graph = DependencyGraph::default();
    }

    fn withdraw<S>(&self, sink: &mut S)
    where
        S: PortSink + GenericSink + ?Sized,
    {
        for port in self.ports.iter().filter(|p| p.enabled) {
            sink.remove_port(port);
        }
        for generic in self.generics.iter().filter(|g| g.enabled) {
            sink.remove_generic(generic);
        }
    }

    fn summary(&self, rejected: Option<StructureError>) -> ImportSummary {
        ImportSummary {
            entity: self.entity().map(|e| e.name.clone()),
            generics: self.generics.len(),
            ports: self.ports.len(),
            dependencies: self.graph.edge_count(),
            rejected,
        }
    }

    fn parse_block(&mut self, kind: DeclarationKind, block: BlockSpan) {
        let scanner = match kind {
            DeclarationKind::Generic => DeclarationBlockScanner::generics(),
            DeclarationKind::Port => DeclarationBlockScanner::ports(),
        };
        let block_text = self.source.get(block.begin..block.end).unwrap_or("");

        for range in scanner.scan(block_text, block.begin) {
            let Some(parsed) = parser::parse_declaration(kind, &self.source, range.start, range.end)
            else {
                continue;
            };

            let span = SpanId(self.declarations.len() as u32);
            self.declarations.push(DeclarationSpan {
                id: span,
                kind,
                begin: range.start,
                end: range.end,
            });

            for name in &parsed.names {
                let id = RecordId((self.generics.len() + self.ports.len()) as u32);
                match kind {
                    DeclarationKind::Generic => self.generics.push(GenericRecord {
                        id,
                        span,
                        enabled: true,
                        name: name.clone(),
                        generic_type: parsed.type_text.clone(),
                        value: parsed.default_text.clone(),
                        description: parsed.description.clone(),
                    }),
                    DeclarationKind::Port => self.ports.push(PortRecord {
                        id,
                        span,
                        enabled: true,
                        name: name.clone(),
                        direction: parsed.direction.unwrap_or(PortDirection::Unspecified),
                        port_type: parser::split_type(&parsed.type_text).base_type,
                        left_bound: 0,
                        right_bound: 0,
                        default_value: parsed.default_text.clone(),
                        description: parsed.description.clone(),
                    }),
                }
            }
        }
    }

    fn parse_span(&self, span: SpanId) -> Option<ParsedDeclaration> {
        let declaration = self.declaration(span)?;
        parser::parse_declaration(
            declaration.kind,
            &self.source,
            declaration.begin,
            declaration.end,
        )
    }

    fn evaluator(&self) -> ExpressionEvaluator<'_, [GenericRecord]> {
        ExpressionEvaluator::new(self.generics.as_slice())
            .with_conventional_power(self.config.conventional_power)
    }

    /// Recompute a generic's value from its default expression. A failed
    /// evaluation keeps the current value.
    fn evaluate_generic(&mut self, index: usize) {
        let Some(generic) = self.generics.get(index) else {
            return;
        };
        let Some(parsed) = self.parse_span(generic.span) else {
            return;
        };

        match self.evaluate_default(&parsed.default_text) {
            Ok(value) => self.generics[index].value = value.to_string(),
            Err(e) => tracing::debug!(
                "Generic {} keeps value {:?}: {}",
                self.generics[index].name,
                self.generics[index].value,
                e
            ),
        }
    }

    /// Recompute a port's bounds and default from its declaration.
    fn evaluate_port(&mut self, index: usize) {
        let Some(port) = self.ports.get(index) else {
            return;
        };
        let Some(parsed) = self.parse_span(port.span) else {
            return;
        };

        let bounds = parser::split_type(&parsed.type_text);
        let (left, right) = parser::evaluate_bounds(&bounds, &self.evaluator());
        let default = self.evaluate_default(&parsed.default_text);

        let port = &mut self.ports[index];
        port.left_bound = left;
        port.right_bound = right;
        match default {
            Ok(value) => port.default_value = value.to_string(),
            Err(e) => tracing::debug!(
                "Port {} keeps default {:?}: {}",
                port.name,
                port.default_value,
                e
            ),
        }
    }

    fn evaluate_default(&self, text: &str) -> Result<i64, EvalError> {
        self.evaluator().evaluate(text)
    }

    fn generic_index(&self, id: RecordId) -> Result<usize, ImportError> {
        match self.generics.iter().position(|g| g.id == id) {
            Some(index) => Ok(index),
            None if self.port(id).is_some() => Err(ImportError::NotAGeneric(id)),
            None => Err(ImportError::UnknownRecord(id)),
        }
    }
}
