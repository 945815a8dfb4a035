use crate::error::EvalError;
use crate::parser::expression::{ExpressionEvaluator, GenericLookup};
use crate::parser::syntax;

/// `(<left> <word> <right>)` as written in a vector type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundExpression {
    pub left: String,
    /// Usually `downto` or `to`; any single word is accepted.
    pub word: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBounds {
    pub base_type: String,
    pub bound: Option<BoundExpression>,
}

/// Split a type such as `std_logic_vector(WIDTH-1 downto 0)` into its base
/// name and bound expression.
pub fn split_type(type_text: &str) -> TypeBounds {
    let Some(caps) = syntax::TYPE_SPLIT.captures(type_text) else {
        return TypeBounds {
            base_type: type_text.trim().to_string(),
            bound: None,
        };
    };

    let base_type = caps.name("base").map_or("", |m| m.as_str()).to_string();
    let bound = caps
        .name("bound")
        .and_then(|m| syntax::BOUND.captures(m.as_str()))
        .map(|b| BoundExpression {
            left: b["left"].to_string(),
            word: b["word"].to_string(),
            right: b["right"].to_string(),
        });

    TypeBounds { base_type, bound }
}

/// Evaluated `(left, right)` of a bound expression; unresolvable sides are 0,
/// and a type without bounds yields `(0, 0)`.
pub fn evaluate_bounds<L: GenericLookup + ?Sized>(
    bounds: &TypeBounds,
    evaluator: &ExpressionEvaluator<'_, L>,
) -> (i64, i64) {
    let Some(bound) = &bounds.bound else {
        return (0, 0);
    };

    let side = |text: &str| {
        evaluator.evaluate(text).unwrap_or_else(|e: EvalError| {
            tracing::debug!("Bound '{}' of {} left at 0: {}", text, bounds.base_type, e);
            0
        })
    };

    (side(&bound.left), side(&bound.right))
}
