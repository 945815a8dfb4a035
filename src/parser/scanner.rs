use regex::Regex;
use std::ops::Range;

use crate::parser::syntax;

/// Splits one block's inner text into declaration spans, skipping comments and
/// anything that is not a recognisable declaration.
pub struct DeclarationBlockScanner<'r> {
    declaration: &'r Regex,
    comment: &'r Regex,
}

impl DeclarationBlockScanner<'static> {
    pub fn generics() -> Self {
        Self::new(&syntax::GENERIC_DECLARATION, &syntax::COMMENT_LINE)
    }

    pub fn ports() -> Self {
        Self::new(&syntax::PORT_DECLARATION, &syntax::COMMENT_LINE)
    }
}

impl<'r> DeclarationBlockScanner<'r> {
    pub fn new(declaration: &'r Regex, comment: &'r Regex) -> Self {
        Self {
            declaration,
            comment,
        }
    }

    /// Scan `block` (which starts at `block_offset` in the source) and return
    /// the absolute byte range of every declaration, in order.
    ///
    /// Ranges exclude the whitespace surrounding a declaration, and comment
    /// lines after the last declaration are never part of it.
    pub fn scan(&self, block: &str, block_offset: usize) -> Vec<Range<usize>> {
        let block = strip_trailing_comments(block);
        let mut spans = Vec::new();
        let mut cursor = 0;

        while cursor < block.len() {
            let declaration = self.declaration.find_at(block, cursor);
            let comment = self.comment.find_at(block, cursor);

            if let Some(m) = comment.filter(|m| m.start() == cursor && m.end() > cursor) {
                cursor = m.end();
            } else if let Some(m) = declaration.filter(|m| m.start() == cursor && m.end() > cursor) {
                let text = m.as_str();
                let leading = text.len() - text.trim_start().len();
                let begin = block_offset + m.start() + leading;
                let end = block_offset + m.start() + text.trim_end().len();
                tracing::debug!("Declaration at {}..{}: {}", begin, end, text.trim());
                spans.push(begin..end);
                cursor = m.end();
            } else {
                let next = [declaration, comment]
                    .iter()
                    .flatten()
                    .map(|m| m.start())
                    .filter(|&start| start > cursor)
                    .min()
                    .unwrap_or(block.len());
                cursor = next;
            }
        }

        spans
    }
}

/// `block` without the blank space and comment-only lines at its end.
fn strip_trailing_comments(block: &str) -> &str {
    let mut end = block.trim_end().len();
    loop {
        let body = &block[..end];
        let line_start = body.rfind('\n').map_or(0, |i| i + 1);
        if !body[line_start..].trim_start().starts_with("--") {
            return body;
        }
        end = body[..line_start].trim_end().len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(source: &'a str, spans: &[Range<usize>]) -> Vec<&'a str> {
        spans.iter().map(|r| &source[r.clone()]).collect()
    }

    #[test]
    fn test_scan_ports_with_comments() {
        let block = r#"
        -- clock input
        clk   : in  std_logic;
        rst_n : in  std_logic; -- active low
        count : out std_logic_vector(7 downto 0)
    "#;
        let spans = DeclarationBlockScanner::ports().scan(block, 0);
        assert_eq!(
            texts(block, &spans),
            vec![
                "clk   : in  std_logic;",
                "rst_n : in  std_logic; -- active low",
                "count : out std_logic_vector(7 downto 0)",
            ]
        );
    }

    #[test]
    fn test_scan_skips_malformed_line() {
        let block = "a : in bit;\n  this is not a declaration\n  b : out bit;";
        let spans = DeclarationBlockScanner::ports().scan(block, 0);
        assert_eq!(texts(block, &spans), vec!["a : in bit;", "b : out bit;"]);
    }

    #[test]
    fn test_scan_offsets_are_absolute() {
        let source = "generic (N : integer := 4);";
        let block = &source[9..25];
        let spans = DeclarationBlockScanner::generics().scan(block, 9);
        assert_eq!(spans, vec![9..25]);
        assert_eq!(&source[spans[0].clone()], "N : integer := 4");
    }

    #[test]
    fn test_closing_comment_lines_stay_outside_last_declaration() {
        let block = "\n  a : in bit;\n  b : out bit -- result\n-- End of all ports.\n  -- WIDTH\n ";
        let spans = DeclarationBlockScanner::ports().scan(block, 0);
        assert_eq!(texts(block, &spans), vec!["a : in bit;", "b : out bit -- result"]);
    }

    #[test]
    fn test_scan_empty_block() {
        let spans = DeclarationBlockScanner::generics().scan("  -- nothing here\n  ", 0);
        assert!(spans.is_empty());
    }
}
