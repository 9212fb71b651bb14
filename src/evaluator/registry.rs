//! Tag → reducer chain table.

use std::collections::{HashMap, HashSet};

use super::Session;
use crate::expression::NodeId;
use crate::ReductionError;

/// A rewrite attempt. `Ok(true)`: the node was rewritten and the chain
/// stops. `Ok(false)`: not applicable (the node may still have been
/// simplified in place).
pub type ReducerFn = fn(&mut Session, NodeId) -> Result<bool, ReductionError>;

/// Tiers are tried High first, then Normal, then Low; registration order
/// is kept within a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Precedence {
  High,
  #[default]
  Normal,
  Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReducerOptions {
  /// The reducer reduces the children it needs itself.
  pub special: bool,
  pub precedence: Precedence,
  /// Skipped while the session forbids symbolic rewriting.
  pub symbolic: bool,
}

impl ReducerOptions {
  pub fn special() -> Self {
    ReducerOptions {
      special: true,
      ..Default::default()
    }
  }

  pub fn symbolic() -> Self {
    ReducerOptions {
      symbolic: true,
      ..Default::default()
    }
  }

  pub fn high(self) -> Self {
    ReducerOptions {
      precedence: Precedence::High,
      ..self
    }
  }

  pub fn low(self) -> Self {
    ReducerOptions {
      precedence: Precedence::Low,
      ..self
    }
  }
}

#[derive(Clone)]
pub struct Reducer {
  pub func: ReducerFn,
  pub name: &'static str,
  pub options: ReducerOptions,
}

impl std::fmt::Debug for Reducer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Reducer")
      .field("name", &self.name)
      .field("options", &self.options)
      .finish()
  }
}

#[derive(Debug, Default)]
pub struct Registry {
  chains: HashMap<String, Vec<Reducer>>,
  specials: HashSet<String>,
}

impl Registry {
  pub fn new() -> Self {
    Registry::default()
  }

  /// Every rule of the kernel.
  pub fn with_default_rules() -> Self {
    let mut registry = Registry::new();
    crate::functions::register_all(&mut registry);
    registry
  }

  pub fn add_reducer(
    &mut self,
    tag: &str,
    func: ReducerFn,
    name: &'static str,
    options: ReducerOptions,
  ) {
    let chain = self.chains.entry(tag.to_string()).or_default();
    let at = chain
      .iter()
      .position(|r| r.options.precedence > options.precedence)
      .unwrap_or(chain.len());
    chain.insert(
      at,
      Reducer {
        func,
        name,
        options,
      },
    );
    if options.special {
      self.specials.insert(tag.to_string());
    }
  }

  pub fn chain(&self, tag: &str) -> &[Reducer] {
    self.chains.get(tag).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Whether the walk must leave the children of `tag` unreduced.
  pub fn has_special(&self, tag: &str) -> bool {
    self.specials.contains(tag)
  }

  pub fn tags(&self) -> impl Iterator<Item = &str> {
    self.chains.keys().map(String::as_str)
  }
}
