use regex::Regex;

use crate::error::StructureError;
use crate::ir::{BlockSpan, EntitySpan};
use crate::parser::syntax;

/// Where the entity and its two declaration blocks sit in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLayout {
    pub entity: EntitySpan,
    pub generics: Option<BlockSpan>,
    pub ports: Option<BlockSpan>,
}

/// Outer extent of a block: start of `generic (`/`port (` and start of its closing `)`.
#[derive(Debug, Clone, Copy)]
struct BlockBounds {
    open: usize,
    inner_begin: usize,
    close: usize,
}

/// Locate the single entity of `text` and the generic/port blocks inside it.
pub fn locate(text: &str) -> Result<EntityLayout, StructureError> {
    let entity = locate_entity(text)?;
    let (generics, ports) = locate_blocks(&text[entity.begin..entity.end])?;

    let absolute = |block: BlockSpan| BlockSpan {
        begin: entity.begin + block.begin,
        end: entity.begin + block.end,
    };

    Ok(EntityLayout {
        generics: generics.map(absolute),
        ports: ports.map(absolute),
        entity,
    })
}

/// Find the one `entity <name> is ... end [entity] <name>;` unit of `text`.
pub fn locate_entity(text: &str) -> Result<EntitySpan, StructureError> {
    let count = syntax::ENTITY_BEGIN.find_iter(text).count();
    if count == 0 {
        return Err(StructureError::NoEntity);
    }
    if count > 1 {
        return Err(StructureError::MultipleEntities(count));
    }

    let caps = syntax::ENTITY_BEGIN
        .captures(text)
        .ok_or(StructureError::NoEntity)?;
    let begin = caps.get(0).map_or(0, |m| m.start());
    let name = caps.get(1).map_or("", |m| m.as_str()).to_string();

    let end_exp = syntax::entity_end(&name)?;
    let end = end_exp
        .find_at(text, begin)
        .ok_or_else(|| StructureError::MissingEntityEnd(name.clone()))?;

    tracing::debug!("Located entity '{}' at {}..{}", name, begin, end.end());

    Ok(EntitySpan {
        begin,
        end: end.end(),
        name,
    })
}

/// Find the generic and port blocks of an entity's text.
///
/// Offsets are relative to `entity_text`. Only the first clause of each kind
/// is used. A block closes at the `)` balancing its opening parenthesis, which
/// must be followed by `;`; without one the block is treated as absent.
/// Interleaved blocks reject the whole entity.
pub fn locate_blocks(
    entity_text: &str,
) -> Result<(Option<BlockSpan>, Option<BlockSpan>), StructureError> {
    let generics = find_block(entity_text, &syntax::GENERICS_BEGIN);
    let ports = find_block(entity_text, &syntax::PORTS_BEGIN);

    if let (Some(g), Some(p)) = (generics, ports) {
        let generic_end_inside_ports = p.open < g.close && g.close <= p.close;
        let port_end_inside_generics = g.open < p.close && p.close <= g.close;
        if generic_end_inside_ports || port_end_inside_generics {
            return Err(StructureError::OverlappingBlocks);
        }
    }

    let inner = |b: BlockBounds| BlockSpan {
        begin: b.inner_begin,
        end: b.close,
    };

    Ok((generics.map(inner), ports.map(inner)))
}

fn find_block(text: &str, begin: &Regex) -> Option<BlockBounds> {
    let open = begin.find(text)?;
    let close = closing_parenthesis(text, open.end())?;

    Some(BlockBounds {
        open: open.start(),
        inner_begin: open.end(),
        close,
    })
}

/// Offset of the `)` that balances the `(` ending just before `from`.
///
/// Parentheses inside comments, string literals and character literals are
/// not counted.
fn closing_parenthesis(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
                continue;
            }
            b'"' => {
                i = text[i + 1..].find('"').map_or(bytes.len(), |n| i + n + 2);
                continue;
            }
            b'\'' if bytes.get(i + 2) == Some(&b'\'') => {
                i += 3;
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return syntax::CLAUSE_END.is_match(&text[i + 1..]).then_some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}
