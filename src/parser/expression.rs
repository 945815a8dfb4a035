//! Integer evaluation of the arithmetic found in bounds and default values.
//!
//! Expressions are flat `operand { op operand }` sequences over `**`, `*`, `/`,
//! `+` and `-`. Operands are decimal literals or generic names. Folding happens
//! in three passes, each repeatedly reducing the leftmost operator of its
//! class: power, then multiply/divide, then add/subtract.

use std::collections::HashMap;

use crate::error::EvalError;
use crate::ir::GenericRecord;
use crate::parser::syntax;

/// Source of generic values for named operands.
pub trait GenericLookup {
    /// Stored value text of the generic called `name`, whether enabled or not.
    fn generic_value(&self, name: &str) -> Option<&str>;
}

impl GenericLookup for [GenericRecord] {
    fn generic_value(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|generic| generic.name == name)
            .map(|generic| generic.value.as_str())
    }
}

impl GenericLookup for Vec<GenericRecord> {
    fn generic_value(&self, name: &str) -> Option<&str> {
        self.as_slice().generic_value(name)
    }
}

impl GenericLookup for HashMap<String, String> {
    fn generic_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Power,
    Multiply,
    Divide,
    Add,
    Subtract,
}

impl Operator {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "**" => Some(Operator::Power),
            "*" => Some(Operator::Multiply),
            "/" => Some(Operator::Divide),
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Operand<'t> {
    Text(&'t str),
    Value(i64),
}

pub struct ExpressionEvaluator<'a, L: GenericLookup + ?Sized> {
    lookup: &'a L,
    conventional_power: bool,
}

impl<'a, L: GenericLookup + ?Sized> ExpressionEvaluator<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            conventional_power: false,
        }
    }

    /// Use `x ** n == x^n` (so `x ** 0 == 1`) instead of the historical
    /// `x ** n == x^max(n, 1)`.
    pub fn with_conventional_power(mut self, enabled: bool) -> Self {
        self.conventional_power = enabled;
        self
    }

    pub fn evaluate(&self, text: &str) -> Result<i64, EvalError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EvalError::Empty);
        }
        if syntax::BASED_LITERAL.is_match(text) {
            return Err(EvalError::BasedLiteral);
        }
        if text.contains(['\'', '"']) {
            return Err(EvalError::QuotedLiteral);
        }

        let (mut operands, mut operators) = tokenize(text)?;

        self.fold(&mut operands, &mut operators, &[Operator::Power])?;
        self.fold(
            &mut operands,
            &mut operators,
            &[Operator::Multiply, Operator::Divide],
        )?;
        self.fold(
            &mut operands,
            &mut operators,
            &[Operator::Add, Operator::Subtract],
        )?;

        match operands.as_slice() {
            [single] => self.resolve(*single),
            _ => Err(EvalError::Malformed(text.to_string())),
        }
    }

    fn fold(
        &self,
        operands: &mut Vec<Operand<'_>>,
        operators: &mut Vec<Operator>,
        class: &[Operator],
    ) -> Result<(), EvalError> {
        while let Some(index) = operators.iter().position(|op| class.contains(op)) {
            let left = self.resolve(operands[index])?;
            let right = self.resolve(operands[index + 1])?;
            let result = self.apply(operators[index], left, right)?;

            operands[index] = Operand::Value(result);
            operands.remove(index + 1);
            operators.remove(index);
        }
        Ok(())
    }

    fn apply(&self, op: Operator, left: i64, right: i64) -> Result<i64, EvalError> {
        let result = match op {
            Operator::Power => return self.power(left, right),
            Operator::Multiply => left.checked_mul(right),
            Operator::Divide => {
                if right == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                left.checked_div(right)
            }
            Operator::Add => left.checked_add(right),
            Operator::Subtract => left.checked_sub(right),
        };
        result.ok_or(EvalError::Overflow)
    }

    fn power(&self, base: i64, exponent: i64) -> Result<i64, EvalError> {
        let exponent = if self.conventional_power {
            if exponent < 0 {
                return Err(EvalError::Malformed(format!("negative exponent {}", exponent)));
            }
            exponent
        } else {
            // Repeated multiplication never goes below the base itself.
            exponent.max(1)
        };

        let exponent = u32::try_from(exponent).map_err(|_| EvalError::Overflow)?;
        base.checked_pow(exponent).ok_or(EvalError::Overflow)
    }

    /// Decimal literal, or the stored value of the generic of that name.
    fn resolve(&self, operand: Operand<'_>) -> Result<i64, EvalError> {
        let text = match operand {
            Operand::Value(value) => return Ok(value),
            Operand::Text(text) => text,
        };

        if let Ok(value) = text.parse::<i64>() {
            return Ok(value);
        }

        let stored = self
            .lookup
            .generic_value(text)
            .ok_or_else(|| EvalError::UnknownName(text.to_string()))?;

        stored
            .trim()
            .parse::<i64>()
            .map_err(|_| EvalError::NonNumericValue {
                name: text.to_string(),
                value: stored.to_string(),
            })
    }
}

/// Evaluate `text` with the historical rules.
pub fn evaluate<L: GenericLookup + ?Sized>(text: &str, lookup: &L) -> Result<i64, EvalError> {
    ExpressionEvaluator::new(lookup).evaluate(text)
}

fn tokenize(text: &str) -> Result<(Vec<Operand<'_>>, Vec<Operator>), EvalError> {
    let caps = syntax::EQUATION
        .captures(text)
        .ok_or_else(|| EvalError::Malformed(text.to_string()))?;

    let mut operands = Vec::new();
    let mut operators = Vec::new();

    if let Some(first) = caps.name("first") {
        operands.push(Operand::Text(first.as_str()));
    }

    if let Some(rest) = caps.name("rest") {
        for op_caps in syntax::OPERATION.captures_iter(rest.as_str()) {
            let op = op_caps
                .name("op")
                .and_then(|m| Operator::parse(m.as_str()))
                .ok_or_else(|| EvalError::Malformed(text.to_string()))?;
            let operand = op_caps
                .name("operand")
                .ok_or_else(|| EvalError::Malformed(text.to_string()))?;
            operators.push(op);
            operands.push(Operand::Text(operand.as_str()));
        }
    }

    if operands.len() != operators.len() + 1 {
        return Err(EvalError::Malformed(text.to_string()));
    }

    Ok((operands, operators))
}
