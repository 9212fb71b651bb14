// Reducers are organized by categories; every module registers its rules
// through `register`.
pub mod arithmetic_ast;
pub mod conversion_ast;
pub mod exponentiation_ast;
pub mod iteration_ast;
pub mod number_theory_ast;
pub mod precision_ast;
pub mod predicate_ast;
pub mod transcendental_ast;

use num_bigint::BigInt;

use crate::evaluator::{Registry, Session};
use crate::expression::{tags, NodeId};
use crate::number::{Number, NumericError, RoundingMode};
use crate::ReductionError;

pub fn register_all(registry: &mut Registry) {
  arithmetic_ast::register(registry);
  exponentiation_ast::register(registry);
  precision_ast::register(registry);
  number_theory_ast::register(registry);
  transcendental_ast::register(registry);
  iteration_ast::register(registry);
  predicate_ast::register(registry);
  conversion_ast::register(registry);
}

/// Number held by child `index`, cloned so the tree can be mutated.
pub(crate) fn number_arg(
  session: &Session,
  node: NodeId,
  index: usize,
) -> Option<Number> {
  session.tree.child_number(node, index).cloned()
}

pub(crate) fn integer_arg(
  session: &Session,
  node: NodeId,
  index: usize,
) -> Option<BigInt> {
  session
    .tree
    .child_number(node, index)
    .and_then(|n| n.as_integer().cloned())
}

/// Optional rounding-mode operand at `index`.
pub(crate) fn rounding_mode_arg(
  session: &mut Session,
  node: NodeId,
  index: usize,
) -> Result<Option<RoundingMode>, ReductionError> {
  if index >= session.tree.child_count(node) {
    return Ok(None);
  }
  let child = session.tree.child(node, index);
  match RoundingMode::from_tag(session.tree.tag(child).as_str()) {
    Some(mode) => Ok(Some(mode)),
    None => {
      Err(session.validation_error(child, "Expression must be a rounding mode"))
    }
  }
}

/// Replaces `node` by a list of numbers.
pub(crate) fn replace_by_list(
  session: &mut Session,
  node: NodeId,
  items: Vec<Number>,
) -> NodeId {
  let children: Vec<NodeId> = items
    .into_iter()
    .map(|n| session.tree.number(n))
    .collect();
  let list = session.tree.add(tags::LIST, children);
  session.tree.replace_by(node, list);
  list
}

/// Puts `node` under a fresh `tag` node at its own position and returns
/// the wrapper.
pub(crate) fn wrap_in(
  session: &mut Session,
  node: NodeId,
  tag: &str,
) -> NodeId {
  let wrapper = session.tree.add(tag, vec![]);
  session.tree.replace_by(node, wrapper);
  session.tree.add_child(wrapper, node);
  wrapper
}

/// Maps a numeric failure to the reducer outcome: domain problems
/// decline, backend failures abort.
pub(crate) fn decline_on(error: NumericError) -> Result<bool, ReductionError> {
  match error {
    NumericError::Backend(_) => Err(ReductionError::Numeric(error)),
    _ => Ok(false),
  }
}
