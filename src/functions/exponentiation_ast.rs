//! Exponentiation and square roots: exact roots where they exist, the
//! principal branch for negative bases, Decimals otherwise.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use super::{decline_on, number_arg};
use crate::evaluator::{ReducerOptions, Registry, Session};
use crate::expression::{tags, NodeId};
use crate::number::theory::integer_sqrt;
use crate::number::{Decimal, Number, Rational};
use crate::ReductionError;

pub fn register(registry: &mut Registry) {
  registry.add_reducer(
    tags::EXPONENTIATION,
    exponentiation_numerics,
    "Exponentiation(numerics)",
    ReducerOptions::default().high(),
  );
  registry.add_reducer(
    tags::EXPONENTIATION,
    exponentiation_specials,
    "Exponentiation(specials)",
    ReducerOptions::symbolic(),
  );
  registry.add_reducer(
    tags::EXPONENTIATION,
    exponentiation_distribute,
    "Exponentiation(distribute)",
    ReducerOptions::symbolic(),
  );
  registry.add_reducer(
    tags::SQUARE_ROOT,
    square_root,
    "SquareRoot",
    ReducerOptions::default(),
  );
}

fn one_like(exact: bool) -> Number {
  if exact {
    Number::one()
  } else {
    Number::Decimal(Decimal::one())
  }
}

/// Exponentiation[b, e] - both operands numbers
fn exponentiation_numerics(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let (Some(base), Some(exponent)) =
    (number_arg(session, node, 0), number_arg(session, node, 1))
  else {
    return Ok(false);
  };
  let cfg = session.cfg();

  if base.is_zero() {
    if exponent.is_zero() {
      session.replace_by_leaf(node, tags::UNDEFINED);
    } else if exponent.is_complex() {
      return Ok(false);
    } else if exponent.is_negative() {
      session.replace_by_leaf(node, tags::INFINITY);
    } else if base.is_integer() && exponent.is_integer() {
      session.replace_by_number(node, Number::zero());
    } else {
      session.replace_by_number(node, Number::Decimal(Decimal::zero()));
    }
    return Ok(true);
  }
  if exponent.is_zero() {
    let exact = !base.has_decimal() && !exponent.has_decimal();
    session.replace_by_number(node, one_like(exact));
    return Ok(true);
  }
  if exponent.is_one() {
    let value = if exponent.is_decimal() {
      base.to_numeric(cfg)
    } else {
      base
    };
    session.replace_by_number(node, value);
    return Ok(true);
  }
  if base.is_exact() && base.is_one() {
    session.replace_by_number(node, Number::one());
    return Ok(true);
  }

  let numeric = session.context.numeric;
  let exact_complex = base.is_complex() && base.is_exact();
  if exact_complex && exponent.is_rational() && !numeric {
    return Ok(false);
  }
  if let (true, Number::Rational(e)) = (base.is_exact(), &exponent) {
    if base.is_negative() {
      if e.denominator() == &BigInt::from(2) {
        return negative_half_power(session, node, &base, e.numerator());
      }
      if !numeric {
        return Ok(false);
      }
    } else if base.is_real() {
      if let Some(done) = positive_rational_power(session, node, &base, e)? {
        return Ok(done);
      }
      if !numeric {
        return Ok(false);
      }
    }
  }

  let base = if numeric { base.to_numeric(cfg) } else { base };
  match base.exponentiation(&exponent, cfg) {
    Ok(value) => {
      session.replace_by_number(node, value);
      Ok(true)
    }
    Err(e) => decline_on(e),
  }
}

/// (-b)^(p/2) → i^p · b^(p/2), exactly.
fn negative_half_power(
  session: &mut Session,
  node: NodeId,
  base: &Number,
  p: &BigInt,
) -> Result<bool, ReductionError> {
  let cfg = session.cfg();
  let p_number = Number::Integer(p.clone());
  let unit = match Number::imaginary_unit().exponentiation(&p_number, cfg) {
    Ok(unit) => unit,
    Err(e) => return decline_on(e),
  };
  let Some(half) = Number::rational(p.clone(), BigInt::from(2)) else {
    return Ok(false);
  };
  let magnitude = session.number(base.negate());
  let half = session.number(half);
  let power = session.tree.add(tags::EXPONENTIATION, vec![magnitude, half]);
  let unit = session.number(unit);
  let product = session.tree.add(tags::MULTIPLICATION, vec![unit, power]);
  session.tree.replace_by(node, product);
  session.reduce(product)?;
  Ok(true)
}

/// b^(p/q) for an exact positive base: the exact root when there is one,
/// else `b^k · b^(r/q)` with `p = k·q + r`. `None` when already normal.
fn positive_rational_power(
  session: &mut Session,
  node: NodeId,
  base: &Number,
  exponent: &Rational,
) -> Result<Option<bool>, ReductionError> {
  let cfg = session.cfg();
  let (p, q) = (exponent.numerator(), exponent.denominator());
  let Some(b) = base.to_rational() else {
    return Ok(None);
  };
  if let Some(root) = q.to_u32().and_then(|q| b.exact_root(q)) {
    let value = Number::from_rational(root)
      .exponentiation(&Number::Integer(p.clone()), cfg);
    return match value {
      Ok(v) => {
        session.replace_by_number(node, v);
        Ok(Some(true))
      }
      Err(e) => decline_on(e).map(Some),
    };
  }
  let (k, r) = p.div_mod_floor(q);
  if k.is_zero() {
    return Ok(None);
  }
  let whole = match base.exponentiation(&Number::Integer(k), cfg) {
    Ok(v) => v,
    Err(e) => return decline_on(e).map(Some),
  };
  let Some(fraction) = Number::rational(r, q.clone()) else {
    return Ok(None);
  };
  let base_leaf = session.number(base.clone());
  let fraction = session.number(fraction);
  let power =
    session.tree.add(tags::EXPONENTIATION, vec![base_leaf, fraction]);
  let whole = session.number(whole);
  let product = session.tree.add(tags::MULTIPLICATION, vec![whole, power]);
  session.tree.replace_by(node, product);
  session.reduce(product)?;
  Ok(Some(true))
}

/// x^0, x^1, 1^x with a symbolic other operand
fn exponentiation_specials(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  if let Some(e) = number_arg(session, node, 1) {
    if e.is_zero() {
      session.replace_by_number(node, one_like(e.is_exact()));
      return Ok(true);
    }
    if e.is_one() {
      let base = session.tree.child(node, 0);
      if e.is_decimal() {
        let wrapper = session.tree.add(tags::NUMERIC, vec![base]);
        session.tree.replace_by(node, wrapper);
        session.reduce(wrapper)?;
      } else {
        session.tree.replace_by(node, base);
      }
      return Ok(true);
    }
  }
  if let Some(b) = number_arg(session, node, 0) {
    if b.is_exact() && b.is_one() {
      session.replace_by_number(node, Number::one());
      return Ok(true);
    }
  }
  Ok(false)
}

/// (x·y)^n → x^n · y^n and (x/y)^n → x^n / y^n for an Integer n
fn exponentiation_distribute(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  if !matches!(number_arg(session, node, 1), Some(Number::Integer(_))) {
    return Ok(false);
  }
  let base = session.tree.child(node, 0);
  let tag = if session.tree.is(base, tags::MULTIPLICATION) {
    tags::MULTIPLICATION
  } else if session.tree.is(base, tags::DIVISION) {
    tags::DIVISION
  } else {
    return Ok(false);
  };
  let exponent = session.tree.child(node, 1);
  let factors = session.tree.children(base).to_vec();
  let powers: Vec<NodeId> = factors
    .into_iter()
    .map(|factor| {
      let e = session.tree.clone_subtree(exponent);
      session.tree.add(tags::EXPONENTIATION, vec![factor, e])
    })
    .collect();
  let result = session.tree.add(tag, powers);
  session.tree.replace_by(node, result);
  session.reduce(result)?;
  Ok(true)
}

/// SquareRoot[x] - exact for perfect squares, `i` attached to negatives
fn square_root(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let Some(x) = number_arg(session, node, 0) else {
    return Ok(false);
  };
  let cfg = session.cfg();
  let numeric = session.context.numeric;

  let radicand = match &x {
    Number::Complex(_) if x.has_decimal() || numeric => {
      let half = Number::Decimal(Decimal::new(BigInt::from(5), -1));
      return match x.exponentiation(&half, cfg) {
        Ok(v) => {
          session.replace_by_number(node, v);
          Ok(true)
        }
        Err(e) => decline_on(e),
      };
    }
    Number::Complex(_) => return Ok(false),
    Number::Decimal(d) => {
      let root = d.abs().sqrt(cfg).unwrap_or_else(Decimal::zero);
      let value = attach_sign(Number::Decimal(root), d.is_negative());
      session.replace_by_number(node, value);
      return Ok(true);
    }
    exact => exact
      .to_rational()
      .unwrap_or_else(|| Rational::from_integer(BigInt::zero())),
  };

  let negative = radicand.is_negative();
  let magnitude = radicand.abs();
  if let Some(root) = magnitude.exact_root(2) {
    let value = attach_sign(Number::from_rational(root), negative);
    session.replace_by_number(node, value);
    return Ok(true);
  }
  if numeric {
    let guarded = Decimal::from_rational(&magnitude, cfg.guarded(5));
    let Some(d) = guarded.sqrt(cfg) else {
      return Ok(false);
    };
    session.replace_by_number(node, attach_sign(Number::Decimal(d), negative));
    return Ok(true);
  }

  let (n_root, n_exact) = integer_sqrt(magnitude.numerator());
  let (d_root, d_exact) = integer_sqrt(magnitude.denominator());
  let result = if n_exact != d_exact && !magnitude.is_integer() {
    let numerator =
      root_or_radical(session, n_root, n_exact, magnitude.numerator());
    let denominator =
      root_or_radical(session, d_root, d_exact, magnitude.denominator());
    session.tree.add(tags::DIVISION, vec![numerator, denominator])
  } else if negative {
    let leaf = session.number(Number::from_rational(magnitude));
    session.tree.add(tags::SQUARE_ROOT, vec![leaf])
  } else {
    return Ok(false);
  };

  let result = if negative {
    let unit = session.tree.leaf(tags::IMAGINARY);
    session.tree.add(tags::MULTIPLICATION, vec![result, unit])
  } else {
    result
  };
  session.tree.replace_by(node, result);
  session.reduce(result)?;
  Ok(true)
}

fn attach_sign(root: Number, negative: bool) -> Number {
  if negative {
    Number::complex(Number::zero(), root.clone()).unwrap_or(root)
  } else {
    root
  }
}

fn root_or_radical(
  session: &mut Session,
  root: BigInt,
  exact: bool,
  radicand: &BigInt,
) -> NodeId {
  if exact {
    session.number(Number::Integer(root))
  } else {
    let leaf = session.number(Number::Integer(radicand.clone()));
    session.tree.add(tags::SQUARE_ROOT, vec![leaf])
  }
}
