use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one declaration span (`a, b : in std_logic;`) within a parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpanId(pub u32);

/// Identifies one generic or port record within a parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u32);

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "span#{}", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    In,
    Out,
    InOut,
    /// Direction slot held a word other than `in`, `out` or `inout`, or was empty.
    Unspecified,
}

impl PortDirection {
    pub fn from_vhdl(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "in" => PortDirection::In,
            "out" => PortDirection::Out,
            "inout" => PortDirection::InOut,
            _ => PortDirection::Unspecified,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PortDirection::In => "in",
            PortDirection::Out => "out",
            PortDirection::InOut => "inout",
            PortDirection::Unspecified => "unspecified",
        }
    }
}

/// Byte range of the single `entity <name> is ... end <name>;` unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub begin: usize,
    pub end: usize,
    pub name: String,
}

/// Byte range of the inner text of a `generic ( ... );` or `port ( ... );` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpan {
    pub begin: usize,
    pub end: usize,
}

impl BlockSpan {
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
    Generic,
    Port,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSpan {
    pub id: SpanId,
    pub kind: DeclarationKind,
    pub begin: usize,
    pub end: usize,
}

impl DeclarationSpan {
    /// Slice of `source` covered by this declaration.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.begin..self.end).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericRecord {
    pub id: RecordId,
    pub span: SpanId,
    pub enabled: bool,
    pub name: String,
    pub generic_type: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    pub id: RecordId,
    pub span: SpanId,
    pub enabled: bool,
    pub name: String,
    pub direction: PortDirection,
    pub port_type: String,
    pub left_bound: i64,
    pub right_bound: i64,
    pub default_value: String,
    pub description: String,
}

impl PortRecord {
    /// Number of bits described by the bounds; scalar ports report 1.
    pub fn width(&self) -> u64 {
        self.left_bound.abs_diff(self.right_bound) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_direction_conversion() {
        assert_eq!(PortDirection::from_vhdl("in"), PortDirection::In);
        assert_eq!(PortDirection::from_vhdl("OUT"), PortDirection::Out);
        assert_eq!(PortDirection::from_vhdl("InOut"), PortDirection::InOut);
        assert_eq!(PortDirection::from_vhdl("buffer"), PortDirection::Unspecified);
        assert_eq!(PortDirection::InOut.as_str(), "inout");
    }

    #[test]
    fn test_declaration_span_text() {
        let source = "port (a : in bit);";
        let span = DeclarationSpan {
            id: SpanId(0),
            kind: DeclarationKind::Port,
            begin: 6,
            end: 16,
        };
        assert_eq!(span.text(source), "a : in bit");
    }

    #[test]
    fn test_port_width() {
        let mut port = PortRecord {
            id: RecordId(0),
            span: SpanId(0),
            enabled: true,
            name: "data".to_string(),
            direction: PortDirection::In,
            port_type: "std_logic_vector".to_string(),
            left_bound: 7,
            right_bound: 0,
            default_value: String::new(),
            description: String::new(),
        };
        assert_eq!(port.width(), 8);

        port.left_bound = 0;
        port.right_bound = 0;
        assert_eq!(port.width(), 1);
    }
}
