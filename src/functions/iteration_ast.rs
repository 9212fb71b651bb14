//! Summation, Product and Piecewise, plus the lookup of symbols bound by
//! an iteration scope.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::cmp::Ordering;
use tracing::debug;

use super::number_arg;
use crate::evaluator::{ReducerOptions, Registry, Session, MAX_ITERATIONS};
use crate::expression::{tags, NodeId};
use crate::number::Number;
use crate::ReductionError;

pub const SUMMATION: &str = "Math.Arithmetic.Summation";
pub const PRODUCT: &str = "Math.Arithmetic.Product";
pub const PIECEWISE: &str = "Math.Arithmetic.Piecewise";

const ITERATIONS_MESSAGE: &str = "Too many iterations";

pub fn register(registry: &mut Registry) {
  registry.add_reducer(
    SUMMATION,
    iterate_over_list,
    "Summation(list)",
    ReducerOptions::special(),
  );
  registry.add_reducer(
    SUMMATION,
    iterate,
    "Summation",
    ReducerOptions::special(),
  );
  registry.add_reducer(
    PRODUCT,
    iterate_over_list,
    "Product(list)",
    ReducerOptions::special(),
  );
  registry.add_reducer(PRODUCT, iterate, "Product", ReducerOptions::special());
  registry.add_reducer(
    PIECEWISE,
    piecewise,
    "Piecewise",
    ReducerOptions::special(),
  );
  registry.add_reducer(
    tags::SYMBOL,
    bound_symbol,
    "Symbol",
    ReducerOptions::default(),
  );
}

/// Addition for a Summation, Multiplication for a Product, with the
/// identity of each.
fn accumulator(session: &Session, node: NodeId) -> (&'static str, i64) {
  if session.tree.is(node, SUMMATION) {
    (tags::ADDITION, 0)
  } else {
    (tags::MULTIPLICATION, 1)
  }
}

/// Collapses a freshly built Addition or Multiplication: no terms give
/// the identity, a single term stands alone.
fn finish(
  session: &mut Session,
  result: NodeId,
  identity: i64,
) -> Result<bool, ReductionError> {
  match session.tree.child_count(result) {
    0 => {
      session.replace_by_number(result, Number::integer(identity));
    }
    1 => {
      let only = session.tree.child(result, 0);
      session.tree.replace_by(result, only);
    }
    _ => {
      session.reduce(result)?;
    }
  }
  Ok(true)
}

fn symbol_operand(session: &Session, node: NodeId) -> Option<String> {
  let symbol = session.tree.child(node, 1);
  if !session.tree.is(symbol, tags::SYMBOL) {
    return None;
  }
  session.tree.symbol_name(symbol).map(str::to_string)
}

/// Summation[body, n], Summation[body, i, to], Summation[body, i, from, to]
/// and Summation[body, i, from, to, step]; the same forms for Product.
fn iterate(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let arity = session.tree.child_count(node);
  if !(2..=5).contains(&arity) {
    return Ok(false);
  }
  let (tag, identity) = accumulator(session, node);

  if arity == 2 {
    let body = session.reduce_and_get(node, 0)?;
    let count_node = session.reduce_and_get(node, 1)?;
    let Some(count) = session
      .tree
      .number_of(count_node)
      .and_then(Number::as_integer)
      .cloned()
    else {
      return Ok(false);
    };
    if count > BigInt::from(MAX_ITERATIONS) {
      return Err(session.validation_error(count_node, ITERATIONS_MESSAGE));
    }
    let count = count.max(BigInt::zero()).to_usize().unwrap_or(0);
    let copies: Vec<NodeId> =
      (0..count).map(|_| session.tree.clone_subtree(body)).collect();
    let result = session.tree.add(tag, copies);
    session.tree.replace_by(node, result);
    return finish(session, result, identity);
  }

  let Some(name) = symbol_operand(session, node) else {
    return Ok(false);
  };
  for index in 2..arity {
    session.reduce_and_get(node, index)?;
  }
  let bounds = if arity == 3 {
    (Some(Number::one()), number_arg(session, node, 2))
  } else {
    (number_arg(session, node, 2), number_arg(session, node, 3))
  };
  let (Some(from), Some(to)) = bounds else {
    return Ok(false);
  };
  let step = if arity == 5 {
    number_arg(session, node, 4)
  } else {
    Some(Number::one())
  };
  let Some(step) = step else {
    return Ok(false);
  };
  if step.is_zero() || from.comparison(&to).is_none() || !step.is_real() {
    return Ok(false);
  }
  let stop = if step.is_negative() {
    Ordering::Less
  } else {
    Ordering::Greater
  };
  let cfg = session.cfg();
  let steps = to.subtraction(&from, cfg).division(&step, cfg).ok();
  let limit = Number::integer(MAX_ITERATIONS);
  if steps.is_some_and(|n| n.comparison(&limit) == Some(Ordering::Greater)) {
    let bound = session.tree.child(node, arity.min(4) - 1);
    return Err(session.validation_error(bound, ITERATIONS_MESSAGE));
  }

  let body = session.tree.child(node, 0);
  let result = session.tree.add(tag, vec![]);
  session.tree.replace_by(node, result);
  session.tree.create_scope(result);
  debug!(symbol = %name, "iteration scope created");

  let filled: Result<(), ReductionError> = (|| {
    let mut current = from;
    while current.comparison(&to).is_some_and(|o| o != stop) {
      let value = session.number(current.clone());
      session.tree.put_into_scope(result, &name, value);
      let term = session.tree.clone_subtree(body);
      session.tree.add_child(result, term);
      session.reduce(term)?;
      current = current.addition(&step, cfg);
    }
    Ok(())
  })();
  session.tree.remove_scope(result);
  debug!(symbol = %name, "iteration scope removed");
  filled?;

  finish(session, result, identity)
}

/// Summation[body, i, {a, b, ...}] - `i` takes each element in turn
fn iterate_over_list(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 3 {
    return Ok(false);
  }
  let Some(name) = symbol_operand(session, node) else {
    return Ok(false);
  };
  let list = session.reduce_and_get(node, 2)?;
  if !session.tree.is(list, tags::LIST) {
    return Ok(false);
  }
  let (tag, identity) = accumulator(session, node);
  let body = session.tree.child(node, 0);
  let elements = session.tree.children(list).to_vec();

  let result = session.tree.add(tag, vec![]);
  session.tree.replace_by(node, result);
  session.tree.create_scope(result);
  session.tree.lock_scope(result);
  debug!(symbol = %name, elements = elements.len(), "list scope created");

  let filled: Result<(), ReductionError> = (|| {
    for element in elements {
      let value = session.tree.clone_subtree(element);
      session.tree.put_into_scope(result, &name, value);
      let term = session.tree.clone_subtree(body);
      session.tree.add_child(result, term);
      session.tree.unlock_scope(result);
      let reduced = session.reduce(term);
      session.tree.lock_scope(result);
      reduced?;
    }
    Ok(())
  })();
  session.tree.remove_scope(result);
  debug!(symbol = %name, "list scope removed");
  filled?;

  finish(session, result, identity)
}

/// Piecewise[value1, guard1, value2, guard2, ..., otherwise]
fn piecewise(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let arity = session.tree.child_count(node);
  for case in 0..arity / 2 {
    let guard_index = 2 * case + 1;
    let backup = if case == 0 {
      let first = session.tree.child(node, guard_index);
      Some(session.tree.clone_subtree(first))
    } else {
      None
    };
    let guard = session.reduce_and_get(node, guard_index)?;
    match session.tree.boolean_value(guard) {
      Some(true) => {
        let value = session.tree.child(node, 2 * case);
        session.tree.replace_by(node, value);
        session.reduce(value)?;
        return Ok(true);
      }
      Some(false) => continue,
      None => {
        if let Some(backup) = backup {
          session.tree.set_child(node, guard_index, backup);
          return Ok(false);
        }
        let message = "Expression must be boolean";
        return Err(session.validation_error(guard, message));
      }
    }
  }

  if arity % 2 == 1 {
    let otherwise = session.tree.child(node, arity - 1);
    session.tree.replace_by(node, otherwise);
    session.reduce(otherwise)?;
  } else {
    session.replace_by_leaf(node, tags::NULL);
  }
  Ok(true)
}

/// A symbol bound by an enclosing iteration takes the bound value.
fn bound_symbol(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(name) = session.tree.symbol_name(node) else {
    return Ok(false);
  };
  let Some(value) = session.tree.lookup(name) else {
    return Ok(false);
  };
  let copy = session.tree.clone_subtree(value);
  session.tree.replace_by(node, copy);
  Ok(true)
}
