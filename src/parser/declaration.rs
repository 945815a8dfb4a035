use regex::Captures;

use crate::ir::{DeclarationKind, PortDirection};
use crate::parser::syntax;

/// Fields of one `name{,name} : [direction] type [:= default]` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDeclaration {
    pub names: Vec<String>,
    /// `None` for generics.
    pub direction: Option<PortDirection>,
    pub type_text: String,
    pub default_text: String,
    pub description: String,
}

/// Parse the declaration occupying `source[begin..end]`.
///
/// The description is the declaration's trailing comment, or failing that a
/// comment forming the whole line immediately above it.
pub fn parse_declaration(
    kind: DeclarationKind,
    source: &str,
    begin: usize,
    end: usize,
) -> Option<ParsedDeclaration> {
    let text = source.get(begin..end)?;
    let mut parsed = match kind {
        DeclarationKind::Generic => parse_generic(text)?,
        DeclarationKind::Port => parse_port(text)?,
    };

    if parsed.description.is_empty() {
        if let Some(comment) = preceding_comment(source, begin) {
            parsed.description = comment;
        }
    }

    Some(parsed)
}

pub fn parse_generic(text: &str) -> Option<ParsedDeclaration> {
    let caps = syntax::GENERIC_DECLARATION.captures(text)?;
    Some(from_captures(&caps, None))
}

pub fn parse_port(text: &str) -> Option<ParsedDeclaration> {
    let caps = syntax::PORT_DECLARATION.captures(text)?;
    let direction = caps
        .name("direction")
        .map_or(PortDirection::Unspecified, |m| PortDirection::from_vhdl(m.as_str()));
    Some(from_captures(&caps, Some(direction)))
}

fn from_captures(caps: &Captures<'_>, direction: Option<PortDirection>) -> ParsedDeclaration {
    let field = |name: &str| caps.name(name).map_or("", |m| m.as_str()).trim().to_string();

    let names = syntax::NAME_DELIMITER
        .split(caps.name("names").map_or("", |m| m.as_str()))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    let description = caps
        .name("comment")
        .or_else(|| caps.name("tail"))
        .map_or(String::new(), |m| m.as_str().trim().to_string());

    ParsedDeclaration {
        names,
        direction,
        type_text: field("type"),
        default_text: field("default"),
        description,
    }
}

/// Text of a `--` comment that is the entire line right above `begin`.
fn preceding_comment(source: &str, begin: usize) -> Option<String> {
    let before = source.get(..begin)?;
    let line_start = before.trim_end_matches([' ', '\t']);
    let above = line_start.strip_suffix('\n')?;
    let above = above.strip_suffix('\r').unwrap_or(above);

    let line = match above.rfind('\n') {
        Some(index) => &above[index + 1..],
        None => above,
    };

    line.trim()
        .strip_prefix("--")
        .map(|comment| comment.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_with_multiple_names() {
        let parsed = parse_port("a, b ,c : in std_logic;").unwrap();
        assert_eq!(parsed.names, vec!["a", "b", "c"]);
        assert_eq!(parsed.direction, Some(PortDirection::In));
        assert_eq!(parsed.type_text, "std_logic");
        assert_eq!(parsed.default_text, "");
    }

    #[test]
    fn test_stray_commas_are_discarded() {
        let parsed = parse_port("a,, b, : out bit;").unwrap();
        assert_eq!(parsed.names, vec!["a", "b"]);
    }

    #[test]
    fn test_unrecognized_direction() {
        let parsed = parse_port("q : buffer std_logic;").unwrap();
        assert_eq!(parsed.direction, Some(PortDirection::Unspecified));
        assert_eq!(parsed.type_text, "std_logic");

        let parsed = parse_port("q : std_logic;").unwrap();
        assert_eq!(parsed.direction, Some(PortDirection::Unspecified));
    }

    #[test]
    fn test_parse_generic_with_default_and_comment() {
        let parsed = parse_generic("DEPTH : natural := 2**ADDR_BITS; -- fifo depth").unwrap();
        assert_eq!(parsed.names, vec!["DEPTH"]);
        assert_eq!(parsed.direction, None);
        assert_eq!(parsed.type_text, "natural");
        assert_eq!(parsed.default_text, "2**ADDR_BITS");
        assert_eq!(parsed.description, "fifo depth");
    }

    #[test]
    fn test_description_from_preceding_line() {
        let source = "port (\n    -- system clock\n    clk : in std_logic;\n";
        let begin = source.find("clk").unwrap();
        let end = source.find(';').unwrap() + 1;

        let parsed = parse_declaration(DeclarationKind::Port, source, begin, end).unwrap();
        assert_eq!(parsed.description, "system clock");
    }

    #[test]
    fn test_trailing_comment_wins_over_preceding_line() {
        let source = "-- above\nclk : in std_logic; -- beside";
        let parsed =
            parse_declaration(DeclarationKind::Port, source, 9, source.len()).unwrap();
        assert_eq!(parsed.description, "beside");
    }

    #[test]
    fn test_no_description_when_line_above_is_code() {
        let source = "a : in bit; -- for a\nb : in bit;";
        let begin = source.find("b :").unwrap();
        let parsed =
            parse_declaration(DeclarationKind::Port, source, begin, source.len()).unwrap();
        assert_eq!(parsed.description, "");
    }
}
