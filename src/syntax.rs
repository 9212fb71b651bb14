//! Surface syntax: builds expression trees from parsed formulas and prints
//! reduced trees back, as text or JSON.

use num_bigint::BigInt;
use pest::iterators::Pair;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::evaluator::Registry;
use crate::expression::{tags, Attribute, NodeId, Tag, Tree, VALUE};
use crate::functions::predicate_ast::{
  COMPARISON_EQUALS, COMPARISON_GREATER, COMPARISON_LESS,
};
use crate::number::rounding::EUCLIDEAN_TAG;
use crate::number::{Decimal, Number, RoundingMode};
use crate::{ReductionError, Rule};

/// Deepest nesting of brackets and `^` chains a formula may have; the
/// parser descends into each level recursively.
pub const MAX_NESTING: usize = 32;

/// Tags of literals that no reducer is registered for.
const LEAF_TAGS: [&str; 8] = [
  tags::INFINITY,
  tags::UNDEFINED,
  tags::TRUE,
  tags::FALSE,
  tags::NULL,
  COMPARISON_EQUALS,
  COMPARISON_LESS,
  COMPARISON_GREATER,
];

/// Name a tag is written and printed with: the last dotted segment, with
/// a `Hyperbolic` prefix for the hyperbolic family.
pub fn display_name(tag: &Tag) -> String {
  match tag.as_str().strip_prefix("Math.Hyperbolic.") {
    Some(rest) => format!("Hyperbolic{}", rest),
    None => tag.short_name().to_string(),
  }
}

fn aliases() -> &'static HashMap<String, String> {
  static ALIASES: OnceLock<HashMap<String, String>> = OnceLock::new();
  ALIASES.get_or_init(|| {
    let mut table = HashMap::new();
    let registry = Registry::with_default_rules();
    let registered = registry.tags().map(str::to_string);
    let modes = RoundingMode::ALL.iter().map(|m| m.tag());
    let leaves = LEAF_TAGS.iter().map(|t| t.to_string());
    for tag in registered
      .chain(modes)
      .chain(std::iter::once(EUCLIDEAN_TAG.to_string()))
      .chain(leaves)
    {
      if tag == tags::NUMBER || tag == tags::SYMBOL {
        continue;
      }
      let name = display_name(&Tag::new(tag.as_str()));
      table.entry(name).or_insert(tag);
    }
    table.insert("Euclidean".to_string(), EUCLIDEAN_TAG.to_string());
    table
  })
}

/// Full tag for a written name. Dotted names are tags already; unknown
/// names become tags of their own.
pub fn resolve_name(name: &str) -> String {
  if name.contains('.') {
    return name.to_string();
  }
  aliases()
    .get(name)
    .cloned()
    .unwrap_or_else(|| name.to_string())
}

fn invalid(pair: &Pair<Rule>) -> ReductionError {
  ReductionError::InvalidLiteral(pair.as_str().to_string())
}

/// Rejects formulas nested deeper than [`MAX_NESTING`] before they reach
/// the parser. Strings are skipped; a `-` right after `^` is a sign and
/// keeps the exponent chain going.
pub fn check_nesting(input: &str) -> Result<(), ReductionError> {
  let mut enclosing: Vec<usize> = Vec::new();
  let mut outer = 0;
  let mut chain = 0;
  let mut in_string = false;
  let mut escaped = false;
  let mut previous = ' ';
  for c in input.chars() {
    if in_string {
      match c {
        _ if escaped => escaped = false,
        '\\' => escaped = true,
        '"' => in_string = false,
        _ => {}
      }
      continue;
    }
    match c {
      '"' => in_string = true,
      '(' | '{' => {
        enclosing.push(chain);
        outer += chain + 1;
        chain = 0;
      }
      ')' | '}' => {
        if let Some(saved) = enclosing.pop() {
          outer -= saved + 1;
          chain = saved;
        }
      }
      '^' => chain += 1,
      '-' if matches!(previous, '^' | '-') => {}
      '+' | '-' | '*' | '/' | ',' | ';' => chain = 0,
      _ => {}
    }
    if outer + chain > MAX_NESTING {
      return Err(ReductionError::RecursionLimit(MAX_NESTING));
    }
    if !c.is_whitespace() {
      previous = c;
    }
  }
  Ok(())
}

/// Adds the tree of one parsed statement (or any inner rule) to `tree`.
pub fn build(
  tree: &mut Tree,
  pair: Pair<Rule>,
) -> Result<NodeId, ReductionError> {
  match pair.as_rule() {
    Rule::Statement => {
      let mut inner = pair.into_inner();
      let expression = inner.next().ok_or(ReductionError::EmptyInput)?;
      build(tree, expression)
    }
    Rule::Expression => build_sum(tree, pair),
    Rule::Term => build_product(tree, pair),
    Rule::Unary => {
      let mut negations = 0;
      let mut operand = None;
      for inner in pair.into_inner() {
        match inner.as_rule() {
          Rule::Negation => negations += 1,
          _ => operand = Some(build(tree, inner)?),
        }
      }
      let mut node = operand.ok_or(ReductionError::EmptyInput)?;
      for _ in 0..negations {
        node = tree.add(tags::NEGATIVE, vec![node]);
      }
      Ok(node)
    }
    Rule::Power => {
      let mut inner = pair.into_inner();
      let base = inner.next().ok_or(ReductionError::EmptyInput)?;
      let base = build(tree, base)?;
      match inner.next() {
        Some(exponent) => {
          let exponent = build(tree, exponent)?;
          Ok(tree.add(tags::EXPONENTIATION, vec![base, exponent]))
        }
        None => Ok(base),
      }
    }
    Rule::Call => {
      let mut inner = pair.into_inner();
      let name = inner.next().ok_or(ReductionError::EmptyInput)?;
      let tag = resolve_name(name.as_str());
      let children = inner
        .map(|arg| build(tree, arg))
        .collect::<Result<Vec<_>, _>>()?;
      Ok(tree.add(&tag, children))
    }
    Rule::List => {
      let children = pair
        .into_inner()
        .map(|item| build(tree, item))
        .collect::<Result<Vec<_>, _>>()?;
      Ok(tree.add(tags::LIST, children))
    }
    Rule::Name => {
      let name = pair.as_str();
      if name.starts_with(|c: char| c.is_ascii_lowercase() || c == '_') {
        Ok(tree.symbol(name))
      } else {
        Ok(tree.leaf(&resolve_name(name)))
      }
    }
    Rule::Integer => {
      let n: BigInt = pair.as_str().parse().map_err(|_| invalid(&pair))?;
      Ok(tree.number(Number::Integer(n)))
    }
    Rule::Decimal => {
      let d = Decimal::parse(pair.as_str()).ok_or_else(|| invalid(&pair))?;
      Ok(tree.number(Number::Decimal(d)))
    }
    Rule::String => {
      let text = snailquote::unescape(pair.as_str())
        .map_err(|_| invalid(&pair))?;
      Ok(tree.string(&text))
    }
    _ => Err(invalid(&pair)),
  }
}

/// `a + b - c` as one Addition, subtracted terms wrapped in Negative.
fn build_sum(
  tree: &mut Tree,
  pair: Pair<Rule>,
) -> Result<NodeId, ReductionError> {
  let mut terms = Vec::new();
  let mut subtract = false;
  for inner in pair.into_inner() {
    if inner.as_rule() == Rule::AddOperator {
      subtract = inner.as_str() == "-";
      continue;
    }
    let term = build(tree, inner)?;
    terms.push(if subtract {
      tree.add(tags::NEGATIVE, vec![term])
    } else {
      term
    });
  }
  match terms.len() {
    0 => Err(ReductionError::EmptyInput),
    1 => Ok(terms[0]),
    _ => Ok(tree.add(tags::ADDITION, terms)),
  }
}

/// `a * b * c` as one Multiplication; `/` is left-associative Division.
fn build_product(
  tree: &mut Tree,
  pair: Pair<Rule>,
) -> Result<NodeId, ReductionError> {
  let mut inner = pair.into_inner();
  let first = inner.next().ok_or(ReductionError::EmptyInput)?;
  let mut current = build(tree, first)?;
  let mut factors: Option<Vec<NodeId>> = None;
  while let Some(operator) = inner.next() {
    let operand = inner.next().ok_or_else(|| invalid(&operator))?;
    let operand = build(tree, operand)?;
    if operator.as_str() == "*" {
      factors.get_or_insert_with(|| vec![current]).push(operand);
      continue;
    }
    if let Some(factors) = factors.take() {
      current = tree.add(tags::MULTIPLICATION, factors);
    }
    current = tree.add(tags::DIVISION, vec![current, operand]);
  }
  Ok(match factors {
    Some(factors) => tree.add(tags::MULTIPLICATION, factors),
    None => current,
  })
}

fn quote(text: &str) -> String {
  format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Output form of a subtree: numbers canonically, lists in braces,
/// strings quoted, everything else as `Name(arguments)`.
pub fn expr_to_string(tree: &Tree, id: NodeId) -> String {
  if let Some(n) = tree.number_of(id) {
    return n.to_string();
  }
  if let Some(name) = tree.symbol_name(id) {
    return name.to_string();
  }
  if tree.is(id, tags::STRING) {
    return quote(tree.text(id, VALUE).unwrap_or(""));
  }
  let arguments = tree
    .children(id)
    .iter()
    .map(|&c| expr_to_string(tree, c))
    .collect::<Vec<_>>()
    .join(", ");
  if tree.is(id, tags::LIST) {
    return format!("{{{}}}", arguments);
  }
  let name = display_name(tree.tag(id));
  if tree.child_count(id) == 0 {
    name
  } else {
    format!("{}({})", name, arguments)
  }
}

/// JSON form of a subtree: the full tag, the leaf value if any, and the
/// children.
pub fn expr_to_json(tree: &Tree, id: NodeId) -> Value {
  let tag = tree.tag(id).as_str();
  if let Some(n) = tree.number_of(id) {
    return json!({ "tag": tag, "kind": n.kind(), "value": n.to_string() });
  }
  if let Some(Attribute::Text(text)) = tree
    .attribute(id, VALUE)
    .or_else(|| tree.attribute(id, crate::expression::NAME))
  {
    return json!({ "tag": tag, "value": text });
  }
  let children: Vec<Value> = tree
    .children(id)
    .iter()
    .map(|&c| expr_to_json(tree, c))
    .collect();
  if children.is_empty() {
    json!({ "tag": tag })
  } else {
    json!({ "tag": tag, "children": children })
  }
}
