//! Number predicates, three-way comparison and the relational operators.
//!
//! The `Is*` predicates always answer: anything that is not a number
//! simply fails the test.

use num_integer::Integer;
use std::cmp::Ordering;

use super::number_arg;
use crate::evaluator::{ReducerOptions, Registry, Session};
use crate::expression::NodeId;
use crate::number::Number;
use crate::ReductionError;

pub const IS_REAL_NUMBER: &str = "Math.Arithmetic.IsRealNumber";
pub const IS_RATIONAL_NUMBER: &str = "Math.Arithmetic.IsRationalNumber";
pub const IS_NUMERIC: &str = "Math.Arithmetic.IsNumeric";
pub const IS_INTEGER_VALUE: &str = "Math.Arithmetic.IsIntegerValue";
pub const IS_INTEGER: &str = "Math.Arithmetic.IsInteger";
pub const IS_DECIMAL: &str = "Math.Arithmetic.IsDecimal";
pub const IS_NEGATIVE_NUMBER: &str = "Math.Arithmetic.IsNegativeNumber";
pub const IS_POSITIVE_NUMBER: &str = "Math.Arithmetic.IsPositiveNumber";
pub const IS_NUMBER_ZERO: &str = "Math.Arithmetic.IsNumberZero";
pub const IS_EVEN: &str = "Math.Arithmetic.IsEven";
pub const IS_ODD: &str = "Math.Arithmetic.IsOdd";

pub const COMPARE: &str = "Relation.Compare";
pub const COMPARISON_EQUALS: &str = "Relation.Comparison.Equals";
pub const COMPARISON_LESS: &str = "Relation.Comparison.Less";
pub const COMPARISON_GREATER: &str = "Relation.Comparison.Greater";

pub const EQUALS: &str = "Relation.Equals";
pub const NOT_EQUALS: &str = "Relation.NotEquals";
pub const LESS: &str = "Relation.Less";
pub const LESS_OR_EQUALS: &str = "Relation.LessOrEquals";
pub const GREATER: &str = "Relation.Greater";
pub const GREATER_OR_EQUALS: &str = "Relation.GreaterOrEquals";

const PREDICATES: [&str; 11] = [
  IS_REAL_NUMBER,
  IS_RATIONAL_NUMBER,
  IS_NUMERIC,
  IS_INTEGER_VALUE,
  IS_INTEGER,
  IS_DECIMAL,
  IS_NEGATIVE_NUMBER,
  IS_POSITIVE_NUMBER,
  IS_NUMBER_ZERO,
  IS_EVEN,
  IS_ODD,
];

const RELATIONS: [&str; 6] = [
  EQUALS,
  NOT_EQUALS,
  LESS,
  LESS_OR_EQUALS,
  GREATER,
  GREATER_OR_EQUALS,
];

pub fn register(registry: &mut Registry) {
  for tag in PREDICATES {
    registry.add_reducer(tag, predicate, "Is", ReducerOptions::default());
  }
  registry.add_reducer(COMPARE, compare, "Compare", ReducerOptions::default());
  for tag in RELATIONS {
    registry.add_reducer(tag, relation, "Relation", ReducerOptions::default());
  }
}

fn parity(n: &Number) -> Option<bool> {
  n.integer_value().map(|i| i.is_even())
}

/// Answers the predicate named by `tag` for an optional number.
fn holds(tag: &str, n: Option<&Number>) -> bool {
  let Some(n) = n else {
    return false;
  };
  match tag {
    IS_REAL_NUMBER => n.is_real(),
    IS_RATIONAL_NUMBER => n.is_real() && n.is_exact(),
    IS_NUMERIC => true,
    IS_INTEGER_VALUE => n.has_integer_value(),
    IS_INTEGER => n.is_integer(),
    IS_DECIMAL => n.is_decimal(),
    IS_NEGATIVE_NUMBER => n.is_negative(),
    IS_POSITIVE_NUMBER => n.is_positive(),
    IS_NUMBER_ZERO => n.is_zero(),
    IS_EVEN => parity(n) == Some(true),
    IS_ODD => parity(n) == Some(false),
    _ => false,
  }
}

/// IsInteger[x], IsEven[x], ... - True or False
fn predicate(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let tag = session.tree.tag(node).clone();
  let value = number_arg(session, node, 0);
  let answer = holds(tag.as_str(), value.as_ref());
  session.replace_by_boolean(node, answer);
  Ok(true)
}

/// Ordering of two real numbers, compared by value across kinds.
fn real_ordering(session: &Session, node: NodeId) -> Option<Ordering> {
  if session.tree.child_count(node) != 2 {
    return None;
  }
  let a = number_arg(session, node, 0)?;
  let b = number_arg(session, node, 1)?;
  if a.is_complex() || b.is_complex() {
    return None;
  }
  a.comparison(&b)
}

/// Compare[a, b] - Equals, Less or Greater
fn compare(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(ordering) = real_ordering(session, node) else {
    return Ok(false);
  };
  let tag = match ordering {
    Ordering::Equal => COMPARISON_EQUALS,
    Ordering::Less => COMPARISON_LESS,
    Ordering::Greater => COMPARISON_GREATER,
  };
  session.replace_by_leaf(node, tag);
  Ok(true)
}

/// a = b, a < b, ... over real numbers
fn relation(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(ordering) = real_ordering(session, node) else {
    return Ok(false);
  };
  let answer = match session.tree.tag(node).as_str() {
    EQUALS => ordering.is_eq(),
    NOT_EQUALS => ordering.is_ne(),
    LESS => ordering.is_lt(),
    LESS_OR_EQUALS => ordering.is_le(),
    GREATER => ordering.is_gt(),
    GREATER_OR_EQUALS => ordering.is_ge(),
    _ => return Ok(false),
  };
  session.replace_by_boolean(node, answer);
  Ok(true)
}
