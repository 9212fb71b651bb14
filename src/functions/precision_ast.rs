//! Precision and rounding: session settings, scoped overrides, numeric
//! evaluation and the rounding functions.

use tracing::debug;

use super::{decline_on, integer_arg, number_arg, rounding_mode_arg};
use crate::evaluator::{
  valid_precision, ReducerOptions, Registry, Session, MAX_PRECISION,
};
use crate::expression::{tags, NodeId};
use crate::number::transcendental;
use crate::number::{DecimalConfig, DivisionMode, Number, RoundingMode};
use crate::ReductionError;

pub const SET_PRECISION: &str = "Math.Arithmetic.SetPrecision";
pub const GET_PRECISION: &str = "Math.Arithmetic.GetPrecision";
pub const WITH_PRECISION: &str = "Math.Arithmetic.WithPrecision";
pub const SET_ROUNDING_MODE: &str = "Math.Arithmetic.SetRoundingMode";
pub const GET_ROUNDING_MODE: &str = "Math.Arithmetic.GetRoundingMode";
pub const SET_EUCLIDEAN_DIVISION_MODE: &str =
  "Math.Arithmetic.SetEuclideanDivisionMode";
pub const GET_EUCLIDEAN_DIVISION_MODE: &str =
  "Math.Arithmetic.GetEuclideanDivisionMode";
pub const SIGNIFICANT_DIGITS: &str = "Math.Arithmetic.SignificantDigits";
pub const DECIMAL_PLACES: &str = "Math.Arithmetic.DecimalPlaces";
pub const ROUND_TO_PRECISION: &str = "Math.Arithmetic.RoundToPrecision";
pub const ROUND_TO_INTEGER: &str = "Math.Arithmetic.RoundToInteger";
pub const ROUND_TO_DECIMAL_PLACES: &str =
  "Math.Arithmetic.RoundToDecimalPlaces";
pub const ROUND_TO_MULTIPLE: &str = "Math.Arithmetic.RoundToMultiple";
pub const TRUNCATE: &str = "Math.Arithmetic.Truncate";
pub const CEILING: &str = "Math.Arithmetic.Ceiling";
pub const FLOOR: &str = "Math.Arithmetic.Floor";
pub const ROUND: &str = "Math.Arithmetic.Round";
pub const PI: &str = "Math.Constant.Pi";
pub const EULER: &str = "Math.Constant.Euler";

const PRECISION_MESSAGE: &str = "Expression must be a positive integer number";
const PLACES_MESSAGE: &str =
  "Expression must be an integer number between -1000000000 and 1000000000";

pub fn register(registry: &mut Registry) {
  let plain = ReducerOptions::default();
  registry.add_reducer(SET_PRECISION, set_precision, "SetPrecision", plain);
  registry.add_reducer(GET_PRECISION, get_precision, "GetPrecision", plain);
  registry.add_reducer(
    WITH_PRECISION,
    with_precision,
    "WithPrecision",
    ReducerOptions::special(),
  );
  registry.add_reducer(
    SET_ROUNDING_MODE,
    set_rounding_mode,
    "SetRoundingMode",
    plain,
  );
  registry.add_reducer(
    GET_ROUNDING_MODE,
    get_rounding_mode,
    "GetRoundingMode",
    plain,
  );
  registry.add_reducer(
    SET_EUCLIDEAN_DIVISION_MODE,
    set_division_mode,
    "SetEuclideanDivisionMode",
    plain,
  );
  registry.add_reducer(
    GET_EUCLIDEAN_DIVISION_MODE,
    get_division_mode,
    "GetEuclideanDivisionMode",
    plain,
  );

  registry.add_reducer(
    tags::NUMERIC,
    numeric,
    "Numeric",
    ReducerOptions::special().high(),
  );
  registry.add_reducer(PI, pi, "Pi", plain);
  registry.add_reducer(EULER, euler, "Euler", plain);

  registry.add_reducer(
    SIGNIFICANT_DIGITS,
    significant_digits,
    "SignificantDigits",
    plain,
  );
  registry.add_reducer(DECIMAL_PLACES, decimal_places, "DecimalPlaces", plain);
  registry.add_reducer(
    ROUND_TO_PRECISION,
    round_to_precision,
    "RoundToPrecision",
    plain,
  );
  registry.add_reducer(
    ROUND_TO_INTEGER,
    round_to_integer,
    "RoundToInteger",
    plain,
  );
  registry.add_reducer(
    ROUND_TO_DECIMAL_PLACES,
    round_to_decimal_places,
    "RoundToDecimalPlaces",
    plain,
  );
  registry.add_reducer(
    ROUND_TO_MULTIPLE,
    round_to_multiple,
    "RoundToMultiple",
    plain,
  );
  registry.add_reducer(TRUNCATE, truncate, "Truncate", plain);
  registry.add_reducer(CEILING, ceiling, "Ceiling", plain);
  registry.add_reducer(FLOOR, floor, "Floor", plain);
  registry.add_reducer(ROUND, round, "Round", plain);
}

/// Child `index` as a precision, or the validation error for it.
fn precision_operand(
  session: &mut Session,
  node: NodeId,
  index: usize,
) -> Result<u32, ReductionError> {
  let child = session.tree.child(node, index);
  match session.tree.number_of(child).and_then(valid_precision) {
    Some(p) => Ok(p),
    None => Err(session.validation_error(child, PRECISION_MESSAGE)),
  }
}

/// SetPrecision[p] - precision of later Decimal operations
fn set_precision(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let precision = precision_operand(session, node, 0)?;
  session.context.precision = precision;
  debug!(precision, "precision set");
  session.replace_by_leaf(node, tags::NULL);
  Ok(true)
}

fn get_precision(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 0 {
    return Ok(false);
  }
  let precision = Number::integer(session.context.precision);
  session.replace_by_number(node, precision);
  Ok(true)
}

/// WithPrecision[expr, p] - reduces `expr` under precision `p`
fn with_precision(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  session.reduce_and_get(node, 1)?;
  let precision = precision_operand(session, node, 1)?;
  {
    let mut guard = session.with_precision(precision);
    guard.reduce_and_get(node, 0)?;
  }
  let value = session.tree.child(node, 0);
  session.tree.replace_by(node, value);
  Ok(true)
}

fn set_rounding_mode(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let Some(mode) = rounding_mode_arg(session, node, 0)? else {
    return Ok(false);
  };
  session.context.rounding = mode;
  debug!(mode = mode.name(), "rounding mode set");
  session.replace_by_leaf(node, tags::NULL);
  Ok(true)
}

fn get_rounding_mode(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 0 {
    return Ok(false);
  }
  let tag = session.context.rounding.tag();
  session.replace_by_leaf(node, &tag);
  Ok(true)
}

fn set_division_mode(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let child = session.tree.child(node, 0);
  let Some(mode) = DivisionMode::from_tag(session.tree.tag(child).as_str())
  else {
    return Err(session.validation_error(
      child,
      "Expression must be a rounding mode or the euclidean mode",
    ));
  };
  session.context.division = mode;
  debug!(mode = %mode.tag(), "euclidean division mode set");
  session.replace_by_leaf(node, tags::NULL);
  Ok(true)
}

fn get_division_mode(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 0 {
    return Ok(false);
  }
  let tag = session.context.division.tag();
  session.replace_by_leaf(node, &tag);
  Ok(true)
}

/// Decimal rendition of a number at the configuration.
fn numeric_value(n: &Number, cfg: DecimalConfig) -> Number {
  match n {
    Number::Decimal(d) => Number::Decimal(d.round(cfg)),
    other => other.to_numeric(cfg),
  }
}

/// Numeric[expr] and Numeric[expr, precision] - evaluates `expr` with
/// exact operands of inexact operations turned into Decimals
fn numeric(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let count = session.tree.child_count(node);
  if !(1..=2).contains(&count) {
    return Ok(false);
  }
  let precision = if count == 2 {
    session.reduce_and_get(node, 1)?;
    Some(precision_operand(session, node, 1)?)
  } else {
    None
  };
  {
    let mut guard = session.override_context();
    guard.context.numeric = true;
    if let Some(p) = precision {
      guard.context.precision = p;
    }
    let result = guard.reduce_and_get(node, 0)?;
    if let Some(n) = guard.tree.number_of(result).cloned() {
      let cfg = guard.cfg();
      let leaf = guard.number(numeric_value(&n, cfg));
      guard.tree.replace_by(result, leaf);
    }
  }
  let value = session.tree.child(node, 0);
  session.tree.replace_by(node, value);
  Ok(true)
}

/// Pi - a Decimal under numeric evaluation
fn pi(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  if !session.context.numeric {
    return Ok(false);
  }
  match transcendental::pi(session.cfg()) {
    Ok(value) => {
      session.replace_by_number(node, Number::Decimal(value));
      Ok(true)
    }
    Err(e) => decline_on(e),
  }
}

/// Euler - a Decimal under numeric evaluation
fn euler(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  if !session.context.numeric {
    return Ok(false);
  }
  match transcendental::euler(session.cfg()) {
    Ok(value) => {
      session.replace_by_number(node, Number::Decimal(value));
      Ok(true)
    }
    Err(e) => decline_on(e),
  }
}

fn significant_digits(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  match number_arg(session, node, 0).and_then(|n| n.significant_digits()) {
    Some(digits) => {
      session.replace_by_number(node, Number::integer(digits));
      Ok(true)
    }
    None => Ok(false),
  }
}

fn decimal_places(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  match number_arg(session, node, 0).and_then(|n| n.decimal_places()) {
    Some(places) => {
      session.replace_by_number(node, Number::integer(places));
      Ok(true)
    }
    None => Ok(false),
  }
}

/// Runs `f` under the rounding mode operand at `index`, when there is one.
fn under_mode_operand<F>(
  session: &mut Session,
  node: NodeId,
  index: usize,
  f: F,
) -> Result<bool, ReductionError>
where
  F: FnOnce(&mut Session) -> Result<bool, ReductionError>,
{
  match rounding_mode_arg(session, node, index)? {
    Some(mode) => {
      let mut guard = session.with_rounding(mode);
      f(&mut *guard)
    }
    None => f(session),
  }
}

/// RoundToPrecision[x, p] and RoundToPrecision[x, p, mode]
fn round_to_precision(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if !(2..=3).contains(&session.tree.child_count(node)) {
    return Ok(false);
  }
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  let precision = precision_operand(session, node, 1)?;
  under_mode_operand(session, node, 2, |session| {
    match x.round_to_precision(precision, session.context.rounding) {
      Some(value) => {
        session.replace_by_number(node, value);
        Ok(true)
      }
      None => Ok(false),
    }
  })
}

/// RoundToInteger[x] and RoundToInteger[x, mode]
fn round_to_integer(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if !(1..=2).contains(&session.tree.child_count(node)) {
    return Ok(false);
  }
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  under_mode_operand(session, node, 1, |session| {
    match x.round_to_integer(session.context.rounding) {
      Some(value) => {
        session.replace_by_number(node, Number::Integer(value));
        Ok(true)
      }
      None => Ok(false),
    }
  })
}

/// Child `index` as a count of decimal places.
fn places_operand(
  session: &mut Session,
  node: NodeId,
  index: usize,
) -> Result<Option<i64>, ReductionError> {
  let child = session.tree.child(node, index);
  if session.tree.number_of(child).is_none() {
    return Ok(None);
  }
  let places = integer_arg(session, node, index)
    .and_then(|n| i64::try_from(n).ok())
    .filter(|p| p.unsigned_abs() <= u64::from(MAX_PRECISION));
  match places {
    Some(places) => Ok(Some(places)),
    None => Err(session.validation_error(child, PLACES_MESSAGE)),
  }
}

/// RoundToDecimalPlaces[x, n] and RoundToDecimalPlaces[x, n, mode]
fn round_to_decimal_places(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if !(2..=3).contains(&session.tree.child_count(node)) {
    return Ok(false);
  }
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  let Some(places) = places_operand(session, node, 1)? else {
    return Ok(false);
  };
  under_mode_operand(session, node, 2, |session| {
    match x.round_to_places(places, session.context.rounding) {
      Some(value) => {
        session.replace_by_number(node, value);
        Ok(true)
      }
      None => Ok(false),
    }
  })
}

/// RoundToMultiple[x, m] and RoundToMultiple[x, m, mode] - nearest
/// multiple of `m` under the mode
fn round_to_multiple(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if !(2..=3).contains(&session.tree.child_count(node)) {
    return Ok(false);
  }
  let (Some(x), Some(m)) =
    (number_arg(session, node, 0), number_arg(session, node, 1))
  else {
    return Ok(false);
  };
  if m.is_zero() || m.is_complex() {
    let child = session.tree.child(node, 1);
    return Err(session.validation_error(
      child,
      "Expression must be a non-zero real number",
    ));
  }
  under_mode_operand(session, node, 2, |session| {
    let cfg = session.cfg();
    let ratio = match x.division(&m, cfg) {
      Ok(r) => r,
      Err(e) => return decline_on(e),
    };
    let Some(q) = ratio.round_to_integer(session.context.rounding) else {
      return Ok(false);
    };
    let value = Number::Integer(q).multiplication(&m, cfg);
    session.replace_by_number(node, value);
    Ok(true)
  })
}

/// Truncate, Ceiling, Floor and Round: `x` to an Integer, or to `n`
/// decimal places.
fn round_with(
  session: &mut Session,
  node: NodeId,
  mode: RoundingMode,
) -> Result<bool, ReductionError> {
  let count = session.tree.child_count(node);
  if !(1..=2).contains(&count) {
    return Ok(false);
  }
  let Some(x) = number_arg(session, node, 0).filter(Number::is_real) else {
    return Ok(false);
  };
  let places = if count == 2 {
    match places_operand(session, node, 1)? {
      Some(p) => p,
      None => return Ok(false),
    }
  } else {
    0
  };
  if places < 0 {
    return Ok(false);
  }
  let value = if places == 0 {
    x.round_to_integer(mode).map(Number::Integer)
  } else {
    x.round_to_places(places, mode)
  };
  match value {
    Some(v) => {
      session.replace_by_number(node, v);
      Ok(true)
    }
    None => Ok(false),
  }
}

fn truncate(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  round_with(session, node, RoundingMode::TowardsZero)
}

fn ceiling(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  round_with(session, node, RoundingMode::TowardsInfinity)
}

fn floor(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  round_with(session, node, RoundingMode::TowardsMinusInfinity)
}

fn round(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  let mode = session.context.rounding;
  round_with(session, node, mode)
}
