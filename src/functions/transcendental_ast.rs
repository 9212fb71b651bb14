//! Logarithms, the circular and hyperbolic functions, and ArcTangent2.
//! Exact arguments stay symbolic unless numeric evaluation is on; domain
//! failures become `Undefined`.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::cmp::Ordering;

use super::number_arg;
use crate::evaluator::{ReducerOptions, Registry, Session};
use crate::expression::{tags, NodeId};
use crate::number::transcendental::{self, Function};
use crate::number::{Decimal, DecimalConfig, Number, NumericError};
use crate::ReductionError;

pub const NATURAL_LOGARITHM: &str = "Math.Transcendental.NaturalLogarithm";
pub const DECIMAL_LOGARITHM: &str = "Math.Transcendental.DecimalLogarithm";
pub const BINARY_LOGARITHM: &str = "Math.Transcendental.BinaryLogarithm";
pub const LOGARITHM: &str = "Math.Transcendental.Logarithm";
pub const ARC_TANGENT_2: &str = "Math.Trigonometric.ArcTangent2";

/// Tags of the 24 functions evaluated through [`transcendental::evaluate`].
pub const CIRCULAR_AND_HYPERBOLIC: [&str; 24] = [
  "Math.Trigonometric.Sine",
  "Math.Trigonometric.Cosine",
  "Math.Trigonometric.Tangent",
  "Math.Trigonometric.Cotangent",
  "Math.Trigonometric.Secant",
  "Math.Trigonometric.Cosecant",
  "Math.Trigonometric.ArcSine",
  "Math.Trigonometric.ArcCosine",
  "Math.Trigonometric.ArcTangent",
  "Math.Trigonometric.ArcCotangent",
  "Math.Trigonometric.ArcSecant",
  "Math.Trigonometric.ArcCosecant",
  "Math.Hyperbolic.Sine",
  "Math.Hyperbolic.Cosine",
  "Math.Hyperbolic.Tangent",
  "Math.Hyperbolic.Cotangent",
  "Math.Hyperbolic.Secant",
  "Math.Hyperbolic.Cosecant",
  "Math.Hyperbolic.ArcSine",
  "Math.Hyperbolic.ArcCosine",
  "Math.Hyperbolic.ArcTangent",
  "Math.Hyperbolic.ArcCotangent",
  "Math.Hyperbolic.ArcSecant",
  "Math.Hyperbolic.ArcCosecant",
];

pub fn register(registry: &mut Registry) {
  let plain = ReducerOptions::default();
  registry.add_reducer(
    NATURAL_LOGARITHM,
    natural_logarithm,
    "NaturalLogarithm",
    plain,
  );
  registry.add_reducer(
    DECIMAL_LOGARITHM,
    decimal_logarithm,
    "DecimalLogarithm",
    plain,
  );
  registry.add_reducer(
    BINARY_LOGARITHM,
    binary_logarithm,
    "BinaryLogarithm",
    plain,
  );
  registry.add_reducer(LOGARITHM, logarithm, "Logarithm", plain);
  for tag in CIRCULAR_AND_HYPERBOLIC {
    registry.add_reducer(tag, circular_or_hyperbolic, "Trigonometric", plain);
  }
  registry.add_reducer(ARC_TANGENT_2, arc_tangent_2, "ArcTangent2", plain);
}

/// Puts an evaluated value in place of `node`. Domain, overflow and
/// underflow failures give `Undefined`.
fn settle(
  session: &mut Session,
  node: NodeId,
  value: Result<Number, NumericError>,
) -> Result<bool, ReductionError> {
  match value {
    Ok(n) => {
      session.replace_by_number(node, n);
      Ok(true)
    }
    Err(
      NumericError::Domain | NumericError::Overflow | NumericError::Underflow,
    ) => {
      session.replace_by_leaf(node, tags::UNDEFINED);
      Ok(true)
    }
    Err(NumericError::NonNumeric) => Ok(false),
    Err(e) => Err(ReductionError::Numeric(e)),
  }
}

#[derive(Debug, Clone, Copy)]
enum Base {
  Natural,
  Fixed(i64),
  Operand,
}

fn natural_logarithm(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  logarithm_with(session, node, Base::Natural)
}

fn decimal_logarithm(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  logarithm_with(session, node, Base::Fixed(10))
}

fn binary_logarithm(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  logarithm_with(session, node, Base::Fixed(2))
}

/// Logarithm[x, base]
fn logarithm(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  logarithm_with(session, node, Base::Operand)
}

/// `k` such that `base^k = x`, for an Integer base and an exact `x`.
fn exact_logarithm(base: &Number, x: &Number) -> Option<BigInt> {
  let b = base.as_integer().filter(|b| **b >= BigInt::from(2))?;
  let r = x.to_rational()?;
  if r.is_negative() || r.is_zero() {
    return None;
  }
  let (mut rest, sign) = if r.numerator().is_one() {
    (r.denominator().clone(), -1)
  } else if r.denominator().is_one() {
    (r.numerator().clone(), 1)
  } else {
    return None;
  };
  let mut k: i64 = 0;
  while rest > BigInt::one() {
    let (q, remainder) = rest.div_rem(b);
    if !remainder.is_zero() {
      return None;
    }
    rest = q;
    k += 1;
  }
  Some(BigInt::from(k * sign))
}

fn logarithm_with(
  session: &mut Session,
  node: NodeId,
  base: Base,
) -> Result<bool, ReductionError> {
  let arity = if matches!(base, Base::Operand) { 2 } else { 1 };
  if session.tree.child_count(node) != arity {
    return Ok(false);
  }
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  let base = match base {
    Base::Natural => None,
    Base::Fixed(b) => Some(Number::integer(b)),
    Base::Operand => {
      let Some(b) = number_arg(session, node, 1) else {
        return Ok(false);
      };
      if !b.is_positive() || b.is_one() {
        let child = session.tree.child(node, 1);
        return Err(session.validation_error(child, "Invalid base"));
      }
      Some(b)
    }
  };

  if x.is_exact() && x.is_one() {
    session.replace_by_number(node, Number::zero());
    return Ok(true);
  }
  if x.is_zero() {
    let above_one = base.as_ref().map_or(true, |b| {
      b.comparison(&Number::one()) == Some(Ordering::Greater)
    });
    if above_one {
      session.replace_by_negative_infinity(node);
    } else {
      session.replace_by_leaf(node, tags::INFINITY);
    }
    return Ok(true);
  }
  if let Some(k) = base.as_ref().and_then(|b| exact_logarithm(b, &x)) {
    session.replace_by_number(node, Number::Integer(k));
    return Ok(true);
  }
  if x.is_exact() && !session.context.numeric {
    return Ok(false);
  }

  let cfg = session.cfg();
  let value = evaluate_logarithm(&x, base.as_ref(), cfg);
  settle(session, node, value)
}

/// ln|z| / ln b + i·arg(z) / ln b, real when `z` is a positive real.
fn evaluate_logarithm(
  x: &Number,
  base: Option<&Number>,
  cfg: DecimalConfig,
) -> Result<Number, NumericError> {
  let base = base
    .map(|b| b.to_decimal(cfg).ok_or(NumericError::NonNumeric))
    .transpose()?;
  if x.is_positive() {
    let d = x.to_decimal(cfg).ok_or(NumericError::NonNumeric)?;
    let value = match &base {
      Some(b) => transcendental::log(&d, b, cfg)?,
      None => transcendental::ln(&d, cfg)?,
    };
    return Ok(Number::Decimal(value));
  }
  let (re, im) = x.parts();
  let re = re.to_decimal(cfg).ok_or(NumericError::NonNumeric)?;
  let im = im.to_decimal(cfg).ok_or(NumericError::NonNumeric)?;
  let (mut real, mut angle) = transcendental::complex_ln(&re, &im, cfg)?;
  if let Some(b) = &base {
    let scale = transcendental::ln(b, cfg)?;
    real = real.div(&scale, cfg).ok_or(NumericError::Domain)?;
    angle = angle.div(&scale, cfg).ok_or(NumericError::Domain)?;
  }
  Number::complex(Number::Decimal(real), Number::Decimal(angle))
    .ok_or(NumericError::NonNumeric)
}

/// Sine[x], HyperbolicArcCosine[x], ... - dispatched on the tag
fn circular_or_hyperbolic(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(f) = Function::from_tag(session.tree.tag(node).as_str()) else {
    return Ok(false);
  };
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  if x.is_complex() {
    return Ok(false);
  }
  if x.is_exact() && x.is_zero() {
    if let Some(value) = f.at_zero() {
      session.replace_by_number(node, Number::integer(value));
      return Ok(true);
    }
  }
  if x.is_exact() && !session.context.numeric {
    return Ok(false);
  }
  let cfg = session.cfg();
  let value = x
    .to_decimal(cfg)
    .ok_or(NumericError::NonNumeric)
    .and_then(|d| transcendental::evaluate(f, &d, cfg))
    .map(Number::Decimal);
  settle(session, node, value)
}

/// ArcTangent2[y, x] - angle of the point (x, y)
fn arc_tangent_2(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let (Some(y), Some(x)) =
    (number_arg(session, node, 0), number_arg(session, node, 1))
  else {
    return Ok(false);
  };
  if y.is_complex() || x.is_complex() {
    return Ok(false);
  }
  if y.is_zero() && x.is_zero() {
    session.replace_by_leaf(node, tags::UNDEFINED);
    return Ok(true);
  }
  if y.is_exact() && x.is_exact() && !session.context.numeric {
    if y.is_zero() && x.is_positive() {
      session.replace_by_number(node, Number::zero());
      return Ok(true);
    }
    return Ok(false);
  }
  let cfg = session.cfg();
  let as_decimal = |n: &Number| -> Result<Decimal, NumericError> {
    n.to_decimal(cfg).ok_or(NumericError::NonNumeric)
  };
  let value = as_decimal(&y)
    .and_then(|y| Ok((y, as_decimal(&x)?)))
    .and_then(|(y, x)| transcendental::atan2(&y, &x, cfg))
    .map(Number::Decimal);
  settle(session, node, value)
}
