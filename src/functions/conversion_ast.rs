//! Conversions between number kinds and between numbers and strings.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use super::{integer_arg, number_arg};
use crate::evaluator::{ReducerOptions, Registry, Session};
use crate::expression::{tags, NodeId, VALUE};
use crate::number::{Decimal, Number, Rational};
use crate::ReductionError;

pub const TO_INTEGER: &str = "Math.Arithmetic.ToInteger";
pub const TO_IF_INTEGER: &str = "Math.Arithmetic.ToIfInteger";
pub const TO_DECIMAL: &str = "Math.Arithmetic.ToDecimal";
pub const TO_NUMBER: &str = "Math.Arithmetic.ToNumber";
pub const TO_STRING: &str = "String.ToString";

pub fn register(registry: &mut Registry) {
  let plain = ReducerOptions::default();
  registry.add_reducer(TO_INTEGER, to_integer, "ToInteger", plain);
  registry.add_reducer(TO_IF_INTEGER, to_if_integer, "ToIfInteger", plain);
  registry.add_reducer(TO_DECIMAL, to_decimal, "ToDecimal", plain);
  registry.add_reducer(TO_NUMBER, to_number, "ToNumber", plain);
  registry.add_reducer(TO_STRING, to_string, "ToString", plain);
}

/// ToInteger[x] - an integral Decimal becomes an Integer; a fractional
/// one is left alone.
fn to_integer(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  let value = match &x {
    Number::Decimal(d) if d.is_integer() => Number::Integer(d.truncate()),
    Number::Decimal(_) => return Ok(false),
    _ => x,
  };
  session.replace_by_number(node, value);
  Ok(true)
}

/// ToIfInteger[x] - like ToInteger, passing fractional Decimals through
fn to_if_integer(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  let value = match &x {
    Number::Decimal(d) if d.is_integer() => Number::Integer(d.truncate()),
    _ => x,
  };
  session.replace_by_number(node, value);
  Ok(true)
}

/// ToDecimal[x] - exact reals as Decimals at the session precision
fn to_decimal(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  let value = x.to_numeric(session.cfg());
  session.replace_by_number(node, value);
  Ok(true)
}

/// Reads `[-]digits[.digits]` in `base`. Integers stay exact; a fraction
/// is accumulated exactly and rounded once.
fn parse_in_base(text: &str, base: u32) -> Option<ParsedNumber> {
  let (negative, body) = match text.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, text),
  };
  let (whole, fraction) = match body.split_once('.') {
    Some((w, f)) => (w, Some(f)),
    None => (body, None),
  };
  if whole.is_empty() {
    return None;
  }
  let radix = BigInt::from(base);
  let mut integer = BigInt::zero();
  for c in whole.chars() {
    integer = integer * &radix + c.to_digit(base)?;
  }
  let mut numerator = BigInt::zero();
  let mut denominator = BigInt::from(1);
  for c in fraction.unwrap_or("").chars() {
    numerator = numerator * &radix + c.to_digit(base)?;
    denominator *= &radix;
  }
  let sign = if negative { -1 } else { 1 };
  Some(match fraction {
    None => ParsedNumber::Integer(integer * sign),
    Some(_) => {
      let value = Rational::from_integer(integer)
        .add(&Rational::new(numerator, denominator));
      let value = if negative { value.neg() } else { value };
      ParsedNumber::Fraction(value)
    }
  })
}

enum ParsedNumber {
  Integer(BigInt),
  Fraction(Rational),
}

/// ToNumber["123.5"], ToNumber["ff", 16]
fn to_number(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let count = session.tree.child_count(node);
  if !(1..=2).contains(&count) {
    return Ok(false);
  }
  let source = session.tree.child(node, 0);
  if !session.tree.is(source, tags::STRING) {
    return Ok(false);
  }
  let Some(text) = session.tree.text(source, VALUE).map(str::to_string) else {
    return Ok(false);
  };
  let base = if count == 2 {
    match integer_arg(session, node, 1).and_then(|b| b.to_u32()) {
      Some(b) if (2..=36).contains(&b) => b,
      _ => return Ok(false),
    }
  } else {
    10
  };

  let value = if base == 10 {
    match parse_in_base(&text, 10) {
      Some(ParsedNumber::Integer(n)) => Number::Integer(n),
      Some(ParsedNumber::Fraction(_)) => match Decimal::parse(&text) {
        Some(d) => Number::Decimal(d),
        None => return Ok(false),
      },
      None => return Ok(false),
    }
  } else {
    match parse_in_base(&text, base) {
      Some(ParsedNumber::Integer(n)) => Number::Integer(n),
      Some(ParsedNumber::Fraction(r)) => {
        Number::Decimal(Decimal::from_rational(&r, session.cfg()))
      }
      None => return Ok(false),
    }
  };
  session.replace_by_number(node, value);
  Ok(true)
}

/// ToString[x [, base]] - the printed form of a number; Integers may be
/// written in any base from 2 to 36
fn to_string(
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
  let text = if count == 2 {
    let Some(base) = integer_arg(session, node, 1).and_then(|b| b.to_u32())
    else {
      return Ok(false);
    };
    match (&x, base) {
      (_, 10) => x.to_string(),
      (Number::Integer(n), 2..=36) => n.to_str_radix(base),
      _ => return Ok(false),
    }
  } else {
    x.to_string()
  };
  let string = session.tree.string(&text);
  session.tree.replace_by(node, string);
  Ok(true)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn integer(text: &str, base: u32) -> Option<BigInt> {
    match parse_in_base(text, base)? {
      ParsedNumber::Integer(n) => Some(n),
      ParsedNumber::Fraction(_) => None,
    }
  }

  #[test]
  fn parses_integers_in_any_base() {
    assert_eq!(integer("ff", 16), Some(BigInt::from(255)));
    assert_eq!(integer("-101", 2), Some(BigInt::from(-5)));
    assert_eq!(integer("Z", 36), Some(BigInt::from(35)));
    assert_eq!(integer("12", 2), None);
    assert_eq!(integer("", 10), None);
  }

  #[test]
  fn fractions_are_exact_until_rounded() {
    let Some(ParsedNumber::Fraction(r)) = parse_in_base("0.1", 2) else {
      panic!("expected a fraction");
    };
    assert_eq!(r, Rational::new(BigInt::from(1), BigInt::from(2)));
    assert!(parse_in_base("1.2.3", 10).is_none());
  }
}
