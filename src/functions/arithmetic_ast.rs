//! Addition, multiplication, negation and division, with the real-number
//! helpers built on them.

use num_integer::Integer;
use num_traits::Signed;

use super::{decline_on, integer_arg, number_arg, wrap_in};
use crate::evaluator::{ReducerOptions, Registry, Session};
use crate::expression::{tags, NodeId};
use crate::number::rounding::pow10;
use crate::number::{Decimal, DecimalConfig, Number, Rational, RoundingMode};
use crate::ReductionError;

pub const COMPLEX: &str = "Math.Complex.Complex";
pub const ABSOLUTE_VALUE: &str = "Math.Arithmetic.AbsoluteValue";
pub const SIGN: &str = "Math.Arithmetic.Sign";
pub const INTEGER_PART: &str = "Math.Arithmetic.IntegerPart";
pub const FRACTIONAL_PART: &str = "Math.Arithmetic.FractionalPart";
pub const RATIONALIZE: &str = "Math.Arithmetic.Rationalize";

pub fn register(registry: &mut Registry) {
  let symbolic = ReducerOptions::symbolic();

  registry.add_reducer(
    tags::ADDITION,
    addition_numeric,
    "Addition(numerics)",
    ReducerOptions::default(),
  );
  registry.add_reducer(
    tags::ADDITION,
    addition_negative_addition,
    "Addition(Negative(Addition))",
    symbolic,
  );

  registry.add_reducer(
    tags::MULTIPLICATION,
    multiplication_numeric,
    "Multiplication(numerics)",
    ReducerOptions::default(),
  );
  registry.add_reducer(
    tags::MULTIPLICATION,
    multiplication_negatives,
    "Multiplication(Negative)",
    symbolic,
  );
  registry.add_reducer(
    tags::MULTIPLICATION,
    multiplication_distribute,
    "Multiplication(numeric, Addition)",
    symbolic,
  );

  registry.add_reducer(
    tags::NEGATIVE,
    negative,
    "Negative",
    ReducerOptions::default(),
  );

  registry.add_reducer(
    tags::DIVISION,
    division_numerics,
    "Division(numerics)",
    ReducerOptions::default().high(),
  );
  registry.add_reducer(
    tags::DIVISION,
    division_negatives,
    "Division(Negative)",
    symbolic,
  );
  registry.add_reducer(
    tags::DIVISION,
    division_zero_one,
    "Division(zero/one)",
    symbolic,
  );
  registry.add_reducer(
    tags::DIVISION,
    division_extract_numerics,
    "Division(extract numerics)",
    symbolic,
  );
  registry.add_reducer(
    tags::DIVISION,
    division_alone,
    "Division(numeric alone)",
    symbolic.low(),
  );

  registry.add_reducer(
    tags::IMAGINARY,
    imaginary,
    "Imaginary",
    ReducerOptions::default(),
  );
  registry.add_reducer(COMPLEX, complex, "Complex", ReducerOptions::default());
  registry.add_reducer(
    ABSOLUTE_VALUE,
    absolute_value,
    "AbsoluteValue",
    ReducerOptions::default(),
  );
  registry.add_reducer(SIGN, sign, "Sign", ReducerOptions::default());
  registry.add_reducer(
    INTEGER_PART,
    integer_part,
    "IntegerPart",
    ReducerOptions::default(),
  );
  registry.add_reducer(
    FRACTIONAL_PART,
    fractional_part,
    "FractionalPart",
    ReducerOptions::default(),
  );
  registry.add_reducer(
    RATIONALIZE,
    rationalize,
    "Rationalize",
    ReducerOptions::default(),
  );
}

// ---------------------------------------------------------------------------
// Addition / Multiplication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fold {
  Sum,
  Product,
}

impl Fold {
  fn tag(self) -> &'static str {
    match self {
      Fold::Sum => tags::ADDITION,
      Fold::Product => tags::MULTIPLICATION,
    }
  }

  fn identity(self) -> Number {
    match self {
      Fold::Sum => Number::zero(),
      Fold::Product => Number::one(),
    }
  }

  fn combine(self, acc: &Number, x: &Number, cfg: DecimalConfig) -> Number {
    match self {
      Fold::Sum => acc.addition(x, cfg),
      Fold::Product => acc.multiplication(x, cfg),
    }
  }

  /// Only exact identities vanish; `0.0 + x` keeps its Decimal.
  fn is_identity(self, n: &Number) -> bool {
    n.is_exact()
      && match self {
        Fold::Sum => n.is_zero(),
        Fold::Product => n.is_one(),
      }
  }
}

/// Splices children with the node's own tag into it.
fn flatten(session: &mut Session, node: NodeId, tag: &str) {
  let mut i = session.tree.child_count(node);
  while i > 0 {
    i -= 1;
    let child = session.tree.child(node, i);
    if session.tree.is(child, tag) {
      let inner = session.tree.children(child).to_vec();
      session.tree.remove_child_at(node, i);
      for (k, grandchild) in inner.into_iter().enumerate() {
        session.tree.add_child_at(node, i + k, grandchild);
      }
    }
  }
}

/// Collapses every numeric operand into one accumulator placed first.
fn fold(
  session: &mut Session,
  node: NodeId,
  kind: Fold,
) -> Result<bool, ReductionError> {
  flatten(session, node, kind.tag());
  let count = session.tree.child_count(node);
  if count == 0 {
    session.replace_by_number(node, kind.identity());
    return Ok(true);
  }
  if count == 1 {
    let only = session.tree.child(node, 0);
    session.tree.replace_by(node, only);
    return Ok(true);
  }

  let Some(pos) =
    (0..count).find(|&i| session.tree.child_number(node, i).is_some())
  else {
    return Ok(false);
  };
  let cfg = session.cfg();
  let mut acc =
    number_arg(session, node, pos).unwrap_or_else(|| kind.identity());
  let mut absorbed = false;
  for i in (pos + 1..count).rev() {
    if let Some(x) = number_arg(session, node, i) {
      acc = kind.combine(&acc, &x, cfg);
      session.tree.remove_child_at(node, i);
      absorbed = true;
    }
  }

  let others = session.tree.child_count(node) - 1;
  if others == 0 || (kind == Fold::Product && acc.is_zero()) {
    session.replace_by_number(node, acc);
    return Ok(true);
  }
  if kind.is_identity(&acc) {
    session.tree.remove_child_at(node, pos);
    if others == 1 {
      let only = session.tree.child(node, 0);
      session.tree.replace_by(node, only);
      return Ok(true);
    }
    return Ok(false);
  }
  if absorbed || pos != 0 {
    session.tree.remove_child_at(node, pos);
    let leaf = session.number(acc);
    session.tree.add_child_at(node, 0, leaf);
  }
  Ok(false)
}

/// Addition[numbers..., rest...] - numeric operands folded into one
fn addition_numeric(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  fold(session, node, Fold::Sum)
}

/// Multiplication[numbers..., rest...] - numeric operands folded into one
fn multiplication_numeric(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  fold(session, node, Fold::Product)
}

fn is_negative_of(session: &Session, id: NodeId, tag: &str) -> bool {
  session.tree.is(id, tags::NEGATIVE)
    && session.tree.child_count(id) == 1
    && session.tree.is(session.tree.child(id, 0), tag)
}

/// a + -(b + c) → a + -b + -c
fn addition_negative_addition(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let view: &Session = session;
  let targets: Vec<usize> = (0..view.tree.child_count(node))
    .filter(|&i| is_negative_of(view, view.tree.child(node, i), tags::ADDITION))
    .collect();
  if targets.is_empty() {
    return Ok(false);
  }
  for &i in targets.iter().rev() {
    let negative = session.tree.child(node, i);
    let inner = session.tree.child(negative, 0);
    let addends = session.tree.children(inner).to_vec();
    session.tree.remove_child_at(node, i);
    for (k, addend) in addends.into_iter().enumerate() {
      let negated = session.tree.add(tags::NEGATIVE, vec![addend]);
      session.tree.add_child_at(node, i + k, negated);
      session.reduce(negated)?;
    }
  }
  session.reduce(node)?;
  Ok(true)
}

/// Strips Negative wrappers off the children; returns how many there were.
fn strip_negatives(session: &mut Session, node: NodeId) -> usize {
  let mut stripped = 0;
  for i in 0..session.tree.child_count(node) {
    let child = session.tree.child(node, i);
    if session.tree.is(child, tags::NEGATIVE)
      && session.tree.child_count(child) == 1
    {
      let inner = session.tree.child(child, 0);
      session.tree.set_child(node, i, inner);
      stripped += 1;
    }
  }
  stripped
}

/// -x · y · -z → x · y · z, an odd count leaves one Negative outside
fn multiplication_negatives(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let stripped = strip_negatives(session, node);
  if stripped == 0 {
    return Ok(false);
  }
  if stripped % 2 == 1 {
    wrap_in(session, node, tags::NEGATIVE);
  }
  session.reduce(node)?;
  Ok(true)
}

/// n · (x + y) → n·x + n·y
fn multiplication_distribute(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2
    || session.tree.child_number(node, 0).is_none()
  {
    return Ok(false);
  }
  let coefficient = session.tree.child(node, 0);
  let sum = session.tree.child(node, 1);
  if !session.tree.is(sum, tags::ADDITION) {
    return Ok(false);
  }
  let addends = session.tree.children(sum).to_vec();
  let products: Vec<NodeId> = addends
    .into_iter()
    .map(|addend| {
      let factor = session.tree.clone_subtree(coefficient);
      session.tree.add(tags::MULTIPLICATION, vec![factor, addend])
    })
    .collect();
  let result = session.tree.add(tags::ADDITION, products);
  session.tree.replace_by(node, result);
  session.reduce(result)?;
  Ok(true)
}

/// Negative[x] - negated number, or the operand of a double negation
fn negative(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  if let Some(n) = number_arg(session, node, 0) {
    session.replace_by_number(node, n.negate());
    return Ok(true);
  }
  let inner = session.tree.child(node, 0);
  if session.tree.is(inner, tags::NEGATIVE)
    && session.tree.child_count(inner) == 1
  {
    let operand = session.tree.child(inner, 0);
    session.tree.replace_by(node, operand);
    return Ok(true);
  }
  Ok(false)
}

// ---------------------------------------------------------------------------
// Division
// ---------------------------------------------------------------------------

/// Division[n, d] - exact quotient of two numbers
fn division_numerics(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let (Some(n), Some(d)) =
    (number_arg(session, node, 0), number_arg(session, node, 1))
  else {
    return Ok(false);
  };
  if d.is_zero() {
    if n.is_zero() {
      session.replace_by_leaf(node, tags::UNDEFINED);
    } else if n.is_negative() {
      session.replace_by_negative_infinity(node);
    } else {
      session.replace_by_leaf(node, tags::INFINITY);
    }
    return Ok(true);
  }
  match n.division(&d, session.cfg()) {
    Ok(q) => {
      session.replace_by_number(node, q);
      Ok(true)
    }
    Err(e) => decline_on(e),
  }
}

/// -x / y → -(x / y), -x / -y → x / y
fn division_negatives(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let stripped = strip_negatives(session, node);
  if stripped == 0 {
    return Ok(false);
  }
  if stripped == 1 {
    wrap_in(session, node, tags::NEGATIVE);
  }
  session.reduce(node)?;
  Ok(true)
}

/// x / 0 → Infinity, x / 1 → x, 0 / x → 0
fn division_zero_one(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  if let Some(d) = number_arg(session, node, 1) {
    if d.is_zero() {
      session.replace_by_leaf(node, tags::INFINITY);
      return Ok(true);
    }
    if d.is_exact() && d.is_one() {
      let numerator = session.tree.child(node, 0);
      session.tree.replace_by(node, numerator);
      return Ok(true);
    }
  }
  if let Some(n) = number_arg(session, node, 0) {
    if n.is_exact() && n.is_zero() {
      session.replace_by_number(node, Number::zero());
      return Ok(true);
    }
  }
  Ok(false)
}

/// Leading numeric factor of a product.
fn coefficient_of(session: &Session, id: NodeId) -> Option<Number> {
  if session.tree.is(id, tags::MULTIPLICATION) {
    session.tree.child_number(id, 0).cloned()
  } else {
    None
  }
}

/// Removes the leading factor of a product, unwrapping a single survivor.
fn drop_coefficient(session: &mut Session, product: NodeId) {
  session.tree.remove_child_at(product, 0);
  if session.tree.child_count(product) == 1 {
    let only = session.tree.child(product, 0);
    session.tree.replace_by(product, only);
  }
}

/// (n·X) / (d·Y) → (n/d) · (X / Y)
fn division_extract_numerics(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let numerator = session.tree.child(node, 0);
  let denominator = session.tree.child(node, 1);
  let n = coefficient_of(session, numerator);
  let d = coefficient_of(session, denominator);
  if n.is_none() && d.is_none() {
    return Ok(false);
  }
  let one = Number::one();
  let top = n.as_ref().unwrap_or(&one);
  let bottom = d.as_ref().unwrap_or(&one);
  let coefficient = match top.division(bottom, session.cfg()) {
    Ok(c) => c,
    Err(e) => return decline_on(e),
  };
  if n.is_some() {
    drop_coefficient(session, numerator);
  }
  if d.is_some() {
    drop_coefficient(session, denominator);
  }
  let product = wrap_in(session, node, tags::MULTIPLICATION);
  let leaf = session.number(coefficient);
  session.tree.add_child_at(product, 0, leaf);
  session.reduce(product)?;
  Ok(true)
}

/// n / x → n · (1 / x) for n ≠ 1, and x / n → (1/n) · x
fn division_alone(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let operands = (number_arg(session, node, 0), number_arg(session, node, 1));
  let product = match operands {
    (Some(n), None) => {
      if n.is_exact() && n.is_one() {
        return Ok(false);
      }
      let one = session.number(Number::one());
      session.tree.set_child(node, 0, one);
      let product = wrap_in(session, node, tags::MULTIPLICATION);
      let leaf = session.number(n);
      session.tree.add_child_at(product, 0, leaf);
      product
    }
    (None, Some(d)) => {
      let reciprocal = match Number::one().division(&d, session.cfg()) {
        Ok(r) => r,
        Err(e) => return decline_on(e),
      };
      let numerator = session.tree.child(node, 0);
      let leaf = session.number(reciprocal);
      let product = session.tree.add(tags::MULTIPLICATION, vec![leaf]);
      session.tree.replace_by(node, product);
      session.tree.add_child(product, numerator);
      product
    }
    _ => return Ok(false),
  };
  session.reduce(product)?;
  Ok(true)
}

// ---------------------------------------------------------------------------
// Complex literals and real-number helpers
// ---------------------------------------------------------------------------

fn imaginary(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  session.replace_by_number(node, Number::imaginary_unit());
  Ok(true)
}

/// Complex[re, im] - a complex number from two real parts
fn complex(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let (Some(re), Some(im)) =
    (number_arg(session, node, 0), number_arg(session, node, 1))
  else {
    return Ok(false);
  };
  match Number::complex(re, im) {
    Some(z) => {
      session.replace_by_number(node, z);
      Ok(true)
    }
    None => Ok(false),
  }
}

/// AbsoluteValue[x] - magnitude, the modulus of a complex number
fn absolute_value(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let Some(n) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  let magnitude = n.abs(session.cfg());
  session.replace_by_number(node, magnitude);
  Ok(true)
}

/// Sign[x] - -1, 0 or 1
fn sign(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  match number_arg(session, node, 0).and_then(|n| n.sign()) {
    Some(s) => {
      session.replace_by_number(node, Number::integer(s));
      Ok(true)
    }
    None => Ok(false),
  }
}

/// IntegerPart[x] - integer part of |x|
fn integer_part(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let part = match number_arg(session, node, 0) {
    Some(Number::Integer(i)) => i.abs(),
    Some(Number::Rational(r)) => r.numerator().abs() / r.denominator(),
    Some(Number::Decimal(d)) => d.abs().truncate(),
    _ => return Ok(false),
  };
  session.replace_by_number(node, Number::Integer(part));
  Ok(true)
}

/// FractionalPart[x] - fractional part of |x|
fn fractional_part(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let part = match number_arg(session, node, 0) {
    Some(Number::Integer(_)) => Number::zero(),
    Some(Number::Rational(r)) => {
      let rest = r.numerator().abs().mod_floor(r.denominator());
      Number::from_rational(Rational::new(rest, r.denominator().clone()))
    }
    Some(Number::Decimal(d)) => {
      let magnitude = d.abs();
      let whole = Decimal::from_integer(magnitude.truncate());
      Number::Decimal(magnitude.sub(&whole, session.cfg()))
    }
    _ => return Ok(false),
  };
  session.replace_by_number(node, part);
  Ok(true)
}

/// Rationalize[x] and Rationalize[x, repeating] - exact fraction of a
/// Decimal, whose last `repeating` digits repeat forever
fn rationalize(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let count = session.tree.child_count(node);
  if !(1..=2).contains(&count) {
    return Ok(false);
  }
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  let d = match x {
    Number::Decimal(d) => d,
    Number::Complex(_) => return Ok(false),
    exact => {
      session.replace_by_number(node, exact);
      return Ok(true);
    }
  };
  if d.is_integer() {
    session.replace_by_number(node, Number::Integer(d.truncate()));
    return Ok(true);
  }
  if count == 1 {
    session.replace_by_number(node, Number::from_rational(d.to_rational()));
    return Ok(true);
  }

  let Some(repeating) =
    integer_arg(session, node, 1).and_then(|r| u64::try_from(r).ok())
  else {
    return Ok(false);
  };
  let places = d.decimal_places();
  if repeating < 1 || repeating > places {
    return Ok(false);
  }
  let offset = places - repeating;
  let scale = Rational::from_integer(pow10(offset));
  let shifted = d.abs().to_rational().mul(&scale);
  let integral = shifted.round(RoundingMode::TowardsZero);
  let tail = shifted
    .add(&Rational::from_integer(integral.clone()).neg())
    .mul(&Rational::from_integer(pow10(repeating)));
  let period = Rational::from_integer((pow10(repeating) - 1) * pow10(offset));
  let Some(repeated) = tail.div(&period) else {
    return Ok(false);
  };
  let mut value = Rational::new(integral, pow10(offset)).add(&repeated);
  if d.is_negative() {
    value = value.neg();
  }
  session.replace_by_number(node, Number::from_rational(value));
  Ok(true)
}
