//! Mutable, tagged n-ary expression trees stored in an arena.
//!
//! Nodes are addressed by [`NodeId`] and never freed during a request;
//! surgery (`replace_by`, `set_child`, ...) only rewires parent and child
//! links. The arena also owns the stack of lexical scope frames used by
//! iteration constructs.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::number::Number;

/// Tags used structurally across the rule set.
pub mod tags {
  pub const NUMBER: &str = "Math.Number";
  pub const INFINITY: &str = "Math.Infinity";
  pub const UNDEFINED: &str = "Math.Undefined";
  pub const IMAGINARY: &str = "Math.Complex.Imaginary";
  pub const ADDITION: &str = "Math.Arithmetic.Addition";
  pub const MULTIPLICATION: &str = "Math.Arithmetic.Multiplication";
  pub const NEGATIVE: &str = "Math.Arithmetic.Negative";
  pub const DIVISION: &str = "Math.Arithmetic.Division";
  pub const EXPONENTIATION: &str = "Math.Arithmetic.Exponentiation";
  pub const SQUARE_ROOT: &str = "Math.Arithmetic.SquareRoot";
  pub const NUMERIC: &str = "Math.Numeric";
  pub const TRUE: &str = "Logic.True";
  pub const FALSE: &str = "Logic.False";
  pub const NULL: &str = "Null";
  pub const LIST: &str = "List.List";
  pub const STRING: &str = "String.String";
  pub const SYMBOL: &str = "Symbolic.Symbol";
}

/// Attribute keys.
pub const VALUE: &str = "Value";
pub const NAME: &str = "Name";
pub const ERROR: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Expression tag such as `Math.Arithmetic.Addition`. The tag space is
/// open: any dotted name is a valid tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
  pub fn new(name: impl Into<String>) -> Self {
    Tag(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Last dotted segment: `Addition` for `Math.Arithmetic.Addition`.
  pub fn short_name(&self) -> &str {
    self.0.rsplit('.').next().unwrap_or(&self.0)
  }
}

impl fmt::Display for Tag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl PartialEq<str> for Tag {
  fn eq(&self, other: &str) -> bool {
    self.0 == other
  }
}

impl PartialEq<&str> for Tag {
  fn eq(&self, other: &&str) -> bool {
    self.0 == *other
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
  Number(Number),
  Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
  tag: Tag,
  children: Vec<NodeId>,
  parent: Option<NodeId>,
  attributes: BTreeMap<String, Attribute>,
}

/// Where a node sits, resolvable again after the slot has been rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
  Root,
  Child(NodeId, usize),
  /// Not linked into the tree; replacements are followed through
  /// forward links.
  Detached(NodeId),
}

#[derive(Debug, Clone)]
struct ScopeFrame {
  owner: NodeId,
  bindings: HashMap<String, NodeId>,
  locked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
  nodes: Vec<Node>,
  root: Option<NodeId>,
  forward: HashMap<NodeId, NodeId>,
  scopes: Vec<ScopeFrame>,
}

impl Tree {
  pub fn new() -> Self {
    Tree::default()
  }

  fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id.0]
  }

  fn node_mut(&mut self, id: NodeId) -> &mut Node {
    &mut self.nodes[id.0]
  }

  /// Creates a detached node with the given children.
  pub fn add(&mut self, tag: &str, children: Vec<NodeId>) -> NodeId {
    let id = NodeId(self.nodes.len());
    for &child in &children {
      self.node_mut(child).parent = Some(id);
    }
    self.nodes.push(Node {
      tag: Tag::new(tag),
      children,
      parent: None,
      attributes: BTreeMap::new(),
    });
    id
  }

  pub fn leaf(&mut self, tag: &str) -> NodeId {
    self.add(tag, Vec::new())
  }

  /// An internal number node.
  pub fn number(&mut self, value: Number) -> NodeId {
    let id = self.leaf(tags::NUMBER);
    self.set_attribute(id, VALUE, Attribute::Number(value));
    id
  }

  pub fn symbol(&mut self, name: &str) -> NodeId {
    let id = self.leaf(tags::SYMBOL);
    self.set_attribute(id, NAME, Attribute::Text(name.to_string()));
    id
  }

  pub fn string(&mut self, text: &str) -> NodeId {
    let id = self.leaf(tags::STRING);
    self.set_attribute(id, VALUE, Attribute::Text(text.to_string()));
    id
  }

  pub fn boolean(&mut self, value: bool) -> NodeId {
    self.leaf(if value { tags::TRUE } else { tags::FALSE })
  }

  pub fn root(&self) -> Option<NodeId> {
    self.root
  }

  pub fn set_root(&mut self, id: NodeId) {
    self.node_mut(id).parent = None;
    self.root = Some(id);
  }

  pub fn tag(&self, id: NodeId) -> &Tag {
    &self.node(id).tag
  }

  pub fn is(&self, id: NodeId, tag: &str) -> bool {
    self.node(id).tag == tag
  }

  /// Retags a node in place, keeping its children.
  pub fn set_tag(&mut self, id: NodeId, tag: &str) {
    self.node_mut(id).tag = Tag::new(tag);
  }

  pub fn children(&self, id: NodeId) -> &[NodeId] {
    &self.node(id).children
  }

  pub fn child(&self, id: NodeId, index: usize) -> NodeId {
    self.node(id).children[index]
  }

  pub fn child_count(&self, id: NodeId) -> usize {
    self.node(id).children.len()
  }

  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.node(id).parent
  }

  pub fn attribute(&self, id: NodeId, key: &str) -> Option<&Attribute> {
    self.node(id).attributes.get(key)
  }

  pub fn set_attribute(&mut self, id: NodeId, key: &str, value: Attribute) {
    self.node_mut(id).attributes.insert(key.to_string(), value);
  }

  pub fn text(&self, id: NodeId, key: &str) -> Option<&str> {
    match self.attribute(id, key) {
      Some(Attribute::Text(s)) => Some(s),
      _ => None,
    }
  }

  pub fn is_internal_number(&self, id: NodeId) -> bool {
    self.is(id, tags::NUMBER)
      && matches!(self.attribute(id, VALUE), Some(Attribute::Number(_)))
  }

  /// The Canonical Number of an internal number node.
  pub fn number_of(&self, id: NodeId) -> Option<&Number> {
    if !self.is(id, tags::NUMBER) {
      return None;
    }
    match self.attribute(id, VALUE) {
      Some(Attribute::Number(n)) => Some(n),
      _ => None,
    }
  }

  /// Number of child `index`, if that child is an internal number.
  pub fn child_number(&self, id: NodeId, index: usize) -> Option<&Number> {
    self.children(id).get(index).and_then(|&c| self.number_of(c))
  }

  pub fn symbol_name(&self, id: NodeId) -> Option<&str> {
    if self.is(id, tags::SYMBOL) {
      self.text(id, NAME)
    } else {
      None
    }
  }

  pub fn boolean_value(&self, id: NodeId) -> Option<bool> {
    if self.is(id, tags::TRUE) {
      Some(true)
    } else if self.is(id, tags::FALSE) {
      Some(false)
    } else {
      None
    }
  }

  pub fn error(&self, id: NodeId) -> Option<&str> {
    self.text(id, ERROR)
  }

  pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
    self.node_mut(child).parent = Some(parent);
    self.node_mut(parent).children.push(child);
  }

  pub fn add_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
    self.node_mut(child).parent = Some(parent);
    self.node_mut(parent).children.insert(index, child);
  }

  /// Unlinks and returns child `index`.
  pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> NodeId {
    let child = self.node_mut(parent).children.remove(index);
    if self.node(child).parent == Some(parent) {
      self.node_mut(child).parent = None;
    }
    child
  }

  pub fn set_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
    let old = self.node(parent).children[index];
    if old != child && self.node(old).parent == Some(parent) {
      self.node_mut(old).parent = None;
    }
    self.node_mut(child).parent = Some(parent);
    self.node_mut(parent).children[index] = child;
  }

  pub fn position(&self, id: NodeId) -> Position {
    if self.root == Some(id) {
      return Position::Root;
    }
    match self.node(id).parent {
      Some(p) => match self.node(p).children.iter().position(|&c| c == id) {
        Some(i) => Position::Child(p, i),
        None => Position::Detached(id),
      },
      None => Position::Detached(id),
    }
  }

  /// The node currently occupying a position.
  pub fn at(&self, position: Position) -> NodeId {
    match position {
      Position::Root => self.root.unwrap_or(NodeId(0)),
      Position::Child(p, i) => self.node(p).children[i],
      Position::Detached(mut id) => {
        while let Some(&next) = self.forward.get(&id) {
          id = next;
        }
        id
      }
    }
  }

  /// Puts `new` where `old` is. `new` leaves its previous parent, which
  /// must be `old` itself or a node that is discarded; shared fragments
  /// are cloned by the caller first.
  pub fn replace_by(&mut self, old: NodeId, new: NodeId) {
    if old == new {
      return;
    }
    match self.position(old) {
      Position::Root => {
        self.root = Some(new);
        self.node_mut(new).parent = None;
      }
      Position::Child(p, i) => {
        self.node_mut(p).children[i] = new;
        self.node_mut(new).parent = Some(p);
      }
      Position::Detached(_) => {
        self.node_mut(new).parent = None;
        self.forward.insert(old, new);
      }
    }
    self.node_mut(old).parent = None;
  }

  /// Deep copy, detached.
  pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
    let children: Vec<NodeId> = self.node(id).children.clone();
    let copies = children.into_iter().map(|c| self.clone_subtree(c)).collect();
    let tag = self.node(id).tag.clone();
    let attributes = self.node(id).attributes.clone();
    let copy = self.add(tag.as_str(), copies);
    self.node_mut(copy).attributes = attributes;
    copy
  }

  /// Structural equality of two subtrees.
  pub fn same(&self, a: NodeId, b: NodeId) -> bool {
    let (x, y) = (self.node(a), self.node(b));
    x.tag == y.tag
      && x.attributes == y.attributes
      && x.children.len() == y.children.len()
      && x.children.iter().zip(&y.children).all(|(&c, &d)| self.same(c, d))
  }

  pub fn create_scope(&mut self, owner: NodeId) {
    self.scopes.push(ScopeFrame {
      owner,
      bindings: HashMap::new(),
      locked: false,
    });
  }

  fn frame_mut(&mut self, owner: NodeId) -> Option<&mut ScopeFrame> {
    self.scopes.iter_mut().rev().find(|f| f.owner == owner)
  }

  pub fn put_into_scope(&mut self, owner: NodeId, name: &str, value: NodeId) {
    if let Some(frame) = self.frame_mut(owner) {
      frame.bindings.insert(name.to_string(), value);
    }
  }

  /// A locked frame is invisible to lookups.
  pub fn lock_scope(&mut self, owner: NodeId) {
    if let Some(frame) = self.frame_mut(owner) {
      frame.locked = true;
    }
  }

  pub fn unlock_scope(&mut self, owner: NodeId) {
    if let Some(frame) = self.frame_mut(owner) {
      frame.locked = false;
    }
  }

  /// Drops the innermost frame of `owner` and everything above it.
  pub fn remove_scope(&mut self, owner: NodeId) {
    if let Some(i) = self.scopes.iter().rposition(|f| f.owner == owner) {
      self.scopes.truncate(i);
    }
  }

  pub fn scope_depth(&self) -> usize {
    self.scopes.len()
  }

  /// Innermost visible binding of `name`.
  pub fn lookup(&self, name: &str) -> Option<NodeId> {
    self
      .scopes
      .iter()
      .rev()
      .filter(|f| !f.locked)
      .find_map(|f| f.bindings.get(name).copied())
  }
}
