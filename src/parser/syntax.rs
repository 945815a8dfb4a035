// Declaration grammar for the entity subset of VHDL.
//
// All patterns are case-insensitive. Declaration patterns swallow leading
// whitespace so that a declaration "starts" where the previous item ended.
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::StructureError;

/// `operand { op operand }`, the arithmetic subset that can be evaluated.
pub const EXPRESSION: &str = r"[+-]?\w+(?:\s*(?:\*\*|[*/+-])\s*\w+)*";

const NAMES: &str = r"(?P<names>\w+(?:\s*,[\s,]*\w+)*)[\s,]*:";

const TYPE: &str = r"(?P<type>[\w.]+(?:\s*\([^;]*?\))?(?:\s+range\s+[^;:]+?)?)";

const DEFAULT: &str = r"(?:\s*:=\s*(?P<default>[^;]*?))?";

// A declaration ends at `;` (optionally followed by a same-line comment) or,
// for the last declaration of a block, at the end of the block text. Comment
// lines after that last declaration are cut off by the scanner beforehand.
const TERMINATOR: &str =
    r"[ \t]*(?:;[ \t]*(?:--(?P<comment>[^\n]*))?|(?:--(?P<tail>[^\n]*))?\s*$)";

lazy_static! {
    pub static ref ENTITY_BEGIN: Regex =
        Regex::new(r"(?i)\bentity\s+(\w+)\s+is\b").expect("entity pattern is valid");

    pub static ref GENERICS_BEGIN: Regex =
        Regex::new(r"(?i)\bgeneric\s*\(").expect("generic pattern is valid");

    pub static ref PORTS_BEGIN: Regex =
        Regex::new(r"(?i)\bport\s*\(").expect("port pattern is valid");

    /// What must follow the `)` that closes a generic or port clause.
    pub static ref CLAUSE_END: Regex =
        Regex::new(r"^\s*(?:--[^\n]*\s*)*;").expect("clause end pattern is valid");

    pub static ref COMMENT_LINE: Regex =
        Regex::new(r"\s*--[^\n]*").expect("comment pattern is valid");

    pub static ref GENERIC_DECLARATION: Regex = Regex::new(&format!(
        r"(?i)\s*{}\s*{}{}{}",
        NAMES, TYPE, DEFAULT, TERMINATOR
    )).expect("generic declaration pattern is valid");

    pub static ref PORT_DECLARATION: Regex = Regex::new(&format!(
        r"(?i)\s*{}\s*(?:(?P<direction>\w+)\s+)?{}{}{}",
        NAMES, TYPE, DEFAULT, TERMINATOR
    )).expect("port declaration pattern is valid");

    pub static ref TYPE_SPLIT: Regex = Regex::new(
        r"(?s)^\s*(?P<base>[\w.]+)\s*(?P<bound>\(.*\))?"
    ).expect("type pattern is valid");

    pub static ref BOUND: Regex = Regex::new(&format!(
        r"\(\s*(?P<left>{})\s+(?P<word>\w+)\s+(?P<right>{})\s*\)",
        EXPRESSION, EXPRESSION
    )).expect("bound pattern is valid");

    pub static ref EQUATION: Regex = Regex::new(
        r"^(?P<first>[+-]?\w+)(?P<rest>(?:\s*(?:\*\*|[*/+-])\s*\w+)*)$"
    ).expect("equation pattern is valid");

    pub static ref OPERATION: Regex =
        Regex::new(r"(?P<op>\*\*|[*/+-])\s*(?P<operand>\w+)").expect("operation pattern is valid");

    pub static ref BASED_LITERAL: Regex =
        Regex::new(r"\d+#[0-9A-Fa-f_.]+#").expect("based literal pattern is valid");

    pub static ref NAME_DELIMITER: Regex =
        Regex::new(r"\s*,\s*").expect("name delimiter pattern is valid");
}

/// `end [entity] <name> ;` for one specific entity.
pub fn entity_end(name: &str) -> Result<Regex, StructureError> {
    let pattern = format!(r"(?i)\bend\s+(?:entity\s+)?{}\s*;", regex::escape(name));
    Ok(Regex::new(&pattern)?)
}
