//! Session state and the bottom-up reduction walk.

pub mod registry;

use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::expression::{tags, Attribute, NodeId, Tree, ERROR};
use crate::number::{DecimalConfig, DivisionMode, Number, RoundingMode};
use crate::syntax::expr_to_string;
use crate::ReductionError;
pub use registry::{Precedence, Reducer, ReducerFn, ReducerOptions, Registry};

pub const MIN_PRECISION: u32 = 1;
pub const MAX_PRECISION: u32 = 1_000_000_000;

/// Nesting limit of the walk; deeper trees end in `RecursionLimit`
/// instead of a stack overflow.
pub const MAX_DEPTH: usize = 256;

/// Most terms a Summation or Product expands to, and the longest list a
/// count operand may ask for.
pub const MAX_ITERATIONS: usize = 1_000_000;

/// Precision and mode settings of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
  pub precision: u32,
  pub rounding: RoundingMode,
  pub division: DivisionMode,
  /// Exact operands of inexact operations are evaluated as Decimals.
  pub numeric: bool,
  pub no_symbolic: bool,
}

impl Default for Context {
  fn default() -> Self {
    Context {
      precision: 20,
      rounding: RoundingMode::HalfAwayFromZero,
      division: DivisionMode::Rounding(RoundingMode::TowardsZero),
      numeric: false,
      no_symbolic: false,
    }
  }
}

impl Context {
  pub fn decimal_config(&self) -> DecimalConfig {
    DecimalConfig::new(self.precision, self.rounding)
  }
}

/// One reduction request: the tree, its settings and the rule table.
pub struct Session {
  pub tree: Tree,
  pub context: Context,
  registry: Rc<Registry>,
  depth: usize,
  applied: usize,
}

impl Session {
  pub fn new(context: Context) -> Self {
    Session::with_registry(context, Rc::new(Registry::with_default_rules()))
  }

  pub fn with_registry(context: Context, registry: Rc<Registry>) -> Self {
    Session {
      tree: Tree::new(),
      context,
      registry,
      depth: 0,
      applied: 0,
    }
  }

  pub fn cfg(&self) -> DecimalConfig {
    self.context.decimal_config()
  }

  /// Reducers that returned `true` since the session was created.
  pub fn applied(&self) -> usize {
    self.applied
  }

  /// Reduces a subtree and returns whatever occupies its position
  /// afterwards.
  pub fn reduce(&mut self, id: NodeId) -> Result<NodeId, ReductionError> {
    let position = self.tree.position(id);
    self.walk(id)?;
    Ok(self.tree.at(position))
  }

  /// Reduces child `index` of `parent`.
  pub fn reduce_and_get(
    &mut self,
    parent: NodeId,
    index: usize,
  ) -> Result<NodeId, ReductionError> {
    let child = self.tree.child(parent, index);
    self.reduce(child)
  }

  /// Reduces the whole tree.
  pub fn reduce_root(&mut self) -> Result<Option<NodeId>, ReductionError> {
    match self.tree.root() {
      Some(root) => self.reduce(root).map(Some),
      None => Ok(None),
    }
  }

  fn walk(&mut self, id: NodeId) -> Result<(), ReductionError> {
    if self.depth >= MAX_DEPTH {
      return Err(ReductionError::RecursionLimit(MAX_DEPTH));
    }
    self.depth += 1;
    let outcome = self.walk_node(id);
    self.depth -= 1;
    outcome
  }

  fn walk_node(&mut self, id: NodeId) -> Result<(), ReductionError> {
    let position = self.tree.position(id);
    let tag = self.tree.tag(id).clone();
    if !self.registry.has_special(tag.as_str()) {
      for index in 0..self.tree.child_count(id) {
        let child = self.tree.child(id, index);
        self.walk(child)?;
      }
    }
    if !self.dispatch(id)? {
      return Ok(());
    }
    let now = self.tree.at(position);
    if *self.tree.tag(now) != tag {
      self.walk(now)?;
    }
    Ok(())
  }

  /// Runs the reducer chain of a node's tag until one applies.
  fn dispatch(&mut self, id: NodeId) -> Result<bool, ReductionError> {
    let position = self.tree.position(id);
    let tag = self.tree.tag(id).clone();
    let registry = Rc::clone(&self.registry);
    let mut current = id;
    for reducer in registry.chain(tag.as_str()) {
      if reducer.options.symbolic && self.context.no_symbolic {
        continue;
      }
      if (reducer.func)(self, current)? {
        self.applied += 1;
        debug!(tag = %tag, reducer = reducer.name, "reducer applied");
        return Ok(true);
      }
      current = self.tree.at(position);
      if *self.tree.tag(current) != tag {
        return Ok(true);
      }
    }
    trace!(tag = %tag, "no reducer applied");
    Ok(false)
  }

  /// Annotates a node with a message and returns the error that aborts
  /// the request.
  pub fn validation_error(
    &mut self,
    node: NodeId,
    message: &str,
  ) -> ReductionError {
    self
      .tree
      .set_attribute(node, ERROR, Attribute::Text(message.to_string()));
    ReductionError::Validation {
      expression: expr_to_string(&self.tree, node),
      message: message.to_string(),
    }
  }

  pub fn number(&mut self, value: Number) -> NodeId {
    self.tree.number(value)
  }

  /// Replaces `node` by a fresh leaf holding `value`.
  pub fn replace_by_number(&mut self, node: NodeId, value: Number) -> NodeId {
    let leaf = self.tree.number(value);
    self.tree.replace_by(node, leaf);
    leaf
  }

  /// Replaces `node` by a fresh leaf with the given tag.
  pub fn replace_by_leaf(&mut self, node: NodeId, tag: &str) -> NodeId {
    let leaf = self.tree.leaf(tag);
    self.tree.replace_by(node, leaf);
    leaf
  }

  pub fn replace_by_boolean(&mut self, node: NodeId, value: bool) {
    let leaf = self.tree.boolean(value);
    self.tree.replace_by(node, leaf);
  }

  /// `Negative(Infinity)` in place of `node`.
  pub fn replace_by_negative_infinity(&mut self, node: NodeId) {
    let infinity = self.tree.leaf(tags::INFINITY);
    let negative = self.tree.add(tags::NEGATIVE, vec![infinity]);
    self.tree.replace_by(node, negative);
  }

  /// Temporarily changes the context; the previous one comes back when
  /// the guard is dropped, on success and error paths alike.
  pub fn override_context(&mut self) -> ContextGuard<'_> {
    let saved = self.context;
    ContextGuard {
      session: self,
      saved,
    }
  }

  pub fn with_precision(&mut self, precision: u32) -> ContextGuard<'_> {
    let mut guard = self.override_context();
    guard.context.precision = precision;
    guard
  }

  pub fn with_rounding(&mut self, mode: RoundingMode) -> ContextGuard<'_> {
    let mut guard = self.override_context();
    guard.context.rounding = mode;
    guard
  }

  pub fn with_numeric(&mut self) -> ContextGuard<'_> {
    let mut guard = self.override_context();
    guard.context.numeric = true;
    guard
  }
}

pub struct ContextGuard<'a> {
  session: &'a mut Session,
  saved: Context,
}

impl Deref for ContextGuard<'_> {
  type Target = Session;

  fn deref(&self) -> &Session {
    self.session
  }
}

impl DerefMut for ContextGuard<'_> {
  fn deref_mut(&mut self) -> &mut Session {
    self.session
  }
}

impl Drop for ContextGuard<'_> {
  fn drop(&mut self) {
    trace!(precision = self.saved.precision, "context restored");
    self.session.context = self.saved;
  }
}

/// Checks a precision operand.
pub fn valid_precision(value: &Number) -> Option<u32> {
  let n = value.as_integer()?;
  let p = u32::try_from(n).ok()?;
  (MIN_PRECISION..=MAX_PRECISION).contains(&p).then_some(p)
}
