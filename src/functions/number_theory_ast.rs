//! Integer division, divisibility, factorization, modular arithmetic,
//! primality and random numbers.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use super::{decline_on, integer_arg, number_arg, replace_by_list};
use crate::evaluator::{
  ReducerOptions, Registry, Session, MAX_ITERATIONS, MAX_PRECISION,
};
use crate::expression::{tags, NodeId};
use crate::number::{self, theory, Number};
use crate::ReductionError;

pub const DIV: &str = "Math.Arithmetic.Div";
pub const MOD: &str = "Math.Arithmetic.Mod";
pub const DIV_MOD: &str = "Math.Arithmetic.DivMod";
pub const GCD: &str = "Math.Arithmetic.GreatestCommonDivisor";
pub const LCM: &str = "Math.Arithmetic.LeastCommonMultiple";
pub const FACTORS: &str = "Math.Arithmetic.Factors";
pub const FACTORS_WITH_EXPONENTS: &str = "Math.Arithmetic.FactorsWithExponents";
pub const DIVISORS: &str = "Math.Arithmetic.Divisors";
pub const PROPER_DIVISORS: &str = "Math.Arithmetic.ProperDivisors";
pub const MODULAR_EXPONENTIATION: &str =
  "Math.Arithmetic.ModularExponentiation";
pub const MODULAR_INVERSE: &str =
  "Math.Arithmetic.ModularMultiplicativeInverse";
pub const IS_PRIME: &str = "Math.Arithmetic.IsPrime";
pub const FACTORIAL: &str = "Math.Arithmetic.Factorial";
pub const DIVIDES: &str = "Math.Arithmetic.Divides";
pub const DOES_NOT_DIVIDE: &str = "Math.Arithmetic.DoesNotDivide";
pub const DIGITS: &str = "Math.Arithmetic.Digits";
pub const RANDOM: &str = "Math.Arithmetic.Random";
pub const RANDOM_IN_RANGE: &str = "Math.Arithmetic.RandomInRange";

/// Largest argument `Factorial` evaluates.
const MAX_FACTORIAL: u64 = 100_000;

const NON_NEGATIVE_MESSAGE: &str =
  "Expression must be a non-negative integer number";

pub fn register(registry: &mut Registry) {
  let plain = ReducerOptions::default();
  registry.add_reducer(DIV, div, "Div", plain);
  registry.add_reducer(MOD, modulo, "Mod", plain);
  registry.add_reducer(DIV_MOD, div_mod, "DivMod", plain);
  registry.add_reducer(GCD, gcd, "GreatestCommonDivisor", plain);
  registry.add_reducer(LCM, lcm, "LeastCommonMultiple", plain);
  registry.add_reducer(FACTORS, factors, "Factors", plain);
  registry.add_reducer(
    FACTORS_WITH_EXPONENTS,
    factors_with_exponents,
    "FactorsWithExponents",
    plain,
  );
  registry.add_reducer(DIVISORS, divisors, "Divisors", plain);
  registry.add_reducer(
    PROPER_DIVISORS,
    proper_divisors,
    "ProperDivisors",
    plain,
  );
  registry.add_reducer(
    MODULAR_EXPONENTIATION,
    modular_exponentiation,
    "ModularExponentiation",
    plain,
  );
  registry.add_reducer(
    MODULAR_INVERSE,
    modular_inverse,
    "ModularMultiplicativeInverse",
    plain,
  );
  registry.add_reducer(IS_PRIME, is_prime, "IsPrime", plain);
  registry.add_reducer(FACTORIAL, factorial, "Factorial", plain);
  registry.add_reducer(DIVIDES, divides, "Divides", plain);
  registry.add_reducer(
    DOES_NOT_DIVIDE,
    does_not_divide,
    "DoesNotDivide",
    plain,
  );
  registry.add_reducer(DIGITS, digits, "Digits", plain);
  registry.add_reducer(RANDOM, random, "Random", plain);
  registry.add_reducer(
    RANDOM_IN_RANGE,
    random_in_range,
    "RandomInRange",
    plain,
  );
}

/// Integer operand at `index` satisfying `valid`. A non-numeric operand
/// declines (`None`); any other number is a validation error.
fn integer_operand(
  session: &mut Session,
  node: NodeId,
  index: usize,
  message: &str,
  valid: impl Fn(&BigInt) -> bool,
) -> Result<Option<BigInt>, ReductionError> {
  let child = session.tree.child(node, index);
  if session.tree.number_of(child).is_none() {
    return Ok(None);
  }
  match integer_arg(session, node, index).filter(|n| valid(n)) {
    Some(n) => Ok(Some(n)),
    None => Err(session.validation_error(child, message)),
  }
}

#[derive(Debug, Clone, Copy)]
enum Part {
  Quotient,
  Remainder,
  Both,
}

/// Quotient and remainder under the session's division mode.
fn divide(
  session: &mut Session,
  node: NodeId,
  part: Part,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let (Some(a), Some(b)) =
    (number_arg(session, node, 0), number_arg(session, node, 1))
  else {
    return Ok(false);
  };
  if a.is_complex() || b.is_complex() {
    return Ok(false);
  }
  if b.is_zero() {
    session.replace_by_leaf(node, tags::INFINITY);
    return Ok(true);
  }
  let mode = session.context.division;
  let (q, r) = match a.div_mod(&b, mode, session.cfg()) {
    Ok(parts) => parts,
    Err(e) => return decline_on(e),
  };
  match part {
    Part::Quotient => {
      session.replace_by_number(node, q);
    }
    Part::Remainder => {
      session.replace_by_number(node, r);
    }
    Part::Both => {
      replace_by_list(session, node, vec![q, r]);
    }
  }
  Ok(true)
}

/// Div[a, b] - integer quotient
fn div(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  divide(session, node, Part::Quotient)
}

/// Mod[a, b] - remainder
fn modulo(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  divide(session, node, Part::Remainder)
}

/// DivMod[a, b] - {quotient, remainder}
fn div_mod(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  divide(session, node, Part::Both)
}

/// Folds the Integer operands of a list (or of the node itself) into the
/// first one, removing the rest.
fn accumulate(
  session: &mut Session,
  node: NodeId,
  combine: fn(&BigInt, &BigInt) -> BigInt,
) -> Result<bool, ReductionError> {
  let first = session.tree.children(node).first().copied();
  let container = match first {
    Some(list)
      if session.tree.child_count(node) == 1
        && session.tree.is(list, tags::LIST) =>
    {
      list
    }
    _ => node,
  };
  let count = session.tree.child_count(container);
  let Some(pos) =
    (0..count).find(|&i| integer_arg(session, container, i).is_some())
  else {
    return Ok(false);
  };
  let mut acc = integer_arg(session, container, pos)
    .map(|n| n.abs())
    .unwrap_or_default();
  let mut absorbed = false;
  for i in (pos + 1..count).rev() {
    if let Some(x) = integer_arg(session, container, i) {
      acc = combine(&acc, &x);
      session.tree.remove_child_at(container, i);
      absorbed = true;
    }
  }
  if session.tree.child_count(container) == 1 {
    session.replace_by_number(node, Number::Integer(acc));
    return Ok(true);
  }
  if absorbed || pos != 0 {
    session.tree.remove_child_at(container, pos);
    let leaf = session.number(Number::Integer(acc));
    session.tree.add_child_at(container, 0, leaf);
  }
  Ok(false)
}

/// GreatestCommonDivisor[{a, b, ...}] or GreatestCommonDivisor[a, b, ...]
fn gcd(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  accumulate(session, node, theory::gcd)
}

/// LeastCommonMultiple[{a, b, ...}] or LeastCommonMultiple[a, b, ...]
fn lcm(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  accumulate(session, node, theory::lcm)
}

/// Single Integer operand at least `minimum`.
fn integer_at_least(
  session: &Session,
  node: NodeId,
  minimum: i64,
) -> Option<BigInt> {
  if session.tree.child_count(node) != 1 {
    return None;
  }
  integer_arg(session, node, 0).filter(|n| *n >= BigInt::from(minimum))
}

/// Factors[n] - prime factors with repetition, ascending
fn factors(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(n) = integer_at_least(session, node, 2) else {
    return Ok(false);
  };
  let items = theory::factors(&n).into_iter().map(Number::Integer).collect();
  replace_by_list(session, node, items);
  Ok(true)
}

/// FactorsWithExponents[n] - {{p, e}, ...}
fn factors_with_exponents(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(n) = integer_at_least(session, node, 2) else {
    return Ok(false);
  };
  let pairs: Vec<NodeId> = theory::factors_with_exponents(&n)
    .into_iter()
    .map(|(p, e)| {
      let p = session.number(Number::Integer(p));
      let e = session.number(Number::integer(e));
      session.tree.add(tags::LIST, vec![p, e])
    })
    .collect();
  let list = session.tree.add(tags::LIST, pairs);
  session.tree.replace_by(node, list);
  Ok(true)
}

/// Divisors[n] - every positive divisor, ascending
fn divisors(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(n) = integer_at_least(session, node, 1) else {
    return Ok(false);
  };
  let items = theory::divisors(&n).into_iter().map(Number::Integer).collect();
  replace_by_list(session, node, items);
  Ok(true)
}

/// ProperDivisors[n] - divisors other than `n`
fn proper_divisors(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  let Some(n) = integer_at_least(session, node, 1) else {
    return Ok(false);
  };
  let items = theory::proper_divisors(&n)
    .into_iter()
    .map(Number::Integer)
    .collect();
  replace_by_list(session, node, items);
  Ok(true)
}

/// ModularExponentiation[b, e, m] - b^e mod m
fn modular_exponentiation(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 3 {
    return Ok(false);
  }
  let Some(base) = integer_operand(
    session,
    node,
    0,
    "Base must be an integer, non-negative number",
    |n| !n.is_negative(),
  )?
  else {
    return Ok(false);
  };
  let Some(exponent) = integer_operand(
    session,
    node,
    1,
    "Exponent must be an integer, non-negative number",
    |n| !n.is_negative(),
  )?
  else {
    return Ok(false);
  };
  let Some(modulus) = integer_operand(
    session,
    node,
    2,
    "Modulo must be an integer, positive number",
    |n| n.is_positive(),
  )?
  else {
    return Ok(false);
  };
  let value = theory::mod_pow(&base, &exponent, &modulus);
  session.replace_by_number(node, Number::Integer(value));
  Ok(true)
}

/// ModularMultiplicativeInverse[a, m] - x with a·x ≡ 1 (mod m)
fn modular_inverse(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let Some(a) = integer_operand(
    session,
    node,
    0,
    "Expression must be a non-negative integer",
    |n| !n.is_negative(),
  )?
  else {
    return Ok(false);
  };
  let Some(modulus) = integer_operand(
    session,
    node,
    1,
    "Modulo must be an integer, positive number",
    |n| n.is_positive(),
  )?
  else {
    return Ok(false);
  };
  match theory::mod_inverse(&a, &modulus) {
    Some(inverse) => {
      session.replace_by_number(node, Number::Integer(inverse));
      Ok(true)
    }
    None => {
      let child = session.tree.child(node, 0);
      let message = "Number is not invertible in such base";
      Err(session.validation_error(child, message))
    }
  }
}

/// IsPrime[n] - Miller–Rabin test
fn is_prime(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let Some(n) =
    integer_operand(session, node, 0, NON_NEGATIVE_MESSAGE, |n| {
      !n.is_negative()
    })?
  else {
    return Ok(false);
  };
  let prime = theory::is_probable_prime(&n);
  session.replace_by_boolean(node, prime);
  Ok(true)
}

/// Factorial[n] - n! for a non-negative Integer
fn factorial(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 1 {
    return Ok(false);
  }
  let Some(n) =
    integer_operand(session, node, 0, NON_NEGATIVE_MESSAGE, |n| {
      !n.is_negative()
    })?
  else {
    return Ok(false);
  };
  match n.to_u64().filter(|&n| n <= MAX_FACTORIAL) {
    Some(n) => {
      session.replace_by_number(node, Number::Integer(theory::factorial(n)));
      Ok(true)
    }
    None => Ok(false),
  }
}

/// Whether `d` divides `m`; `None` unless both are Integers and `d ≠ 0`.
fn division_test(session: &Session, node: NodeId) -> Option<bool> {
  if session.tree.child_count(node) != 2 {
    return None;
  }
  let d = integer_arg(session, node, 0).filter(|d| !d.is_zero())?;
  let m = integer_arg(session, node, 1)?;
  Some(m.mod_floor(&d).is_zero())
}

/// Divides[d, m]
fn divides(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  match division_test(session, node) {
    Some(result) => {
      session.replace_by_boolean(node, result);
      Ok(true)
    }
    None => Ok(false),
  }
}

/// DoesNotDivide[d, m]
fn does_not_divide(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  match division_test(session, node) {
    Some(result) => {
      session.replace_by_boolean(node, !result);
      Ok(true)
    }
    None => Ok(false),
  }
}

/// Digits[n], Digits[n, base] and Digits[n, base, size] - digits of `n`,
/// most significant first, left-padded with zeros to `size`
fn digits(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  let count = session.tree.child_count(node);
  if !(1..=3).contains(&count) {
    return Ok(false);
  }
  let Some(n) =
    integer_operand(session, node, 0, NON_NEGATIVE_MESSAGE, |n| {
      !n.is_negative()
    })?
  else {
    return Ok(false);
  };
  let base = if count >= 2 {
    let Some(base) = integer_operand(
      session,
      node,
      1,
      "Base must be an integer greater than 1",
      |b| *b >= BigInt::from(2),
    )?
    else {
      return Ok(false);
    };
    base
  } else {
    BigInt::from(10)
  };
  let size = if count == 3 {
    let Some(size) = integer_operand(
      session,
      node,
      2,
      "Size must be a non-negative integer number up to 1000000",
      |s| s.to_usize().is_some_and(|s| s <= MAX_ITERATIONS),
    )?
    else {
      return Ok(false);
    };
    size.to_usize().unwrap_or(0)
  } else {
    0
  };

  let mut digits = Vec::new();
  let mut rest = n;
  loop {
    let (q, r) = rest.div_rem(&base);
    digits.push(Number::Integer(r));
    rest = q;
    if rest.is_zero() {
      break;
    }
  }
  while digits.len() < size {
    digits.push(Number::zero());
  }
  digits.reverse();
  replace_by_list(session, node, digits);
  Ok(true)
}

/// Random[] and Random[digits] - uniform Decimal in [0, 1)
fn random(session: &mut Session, node: NodeId) -> Result<bool, ReductionError> {
  let digits = match session.tree.child_count(node) {
    0 => session.context.precision,
    1 => {
      let Some(digits) = integer_operand(
        session,
        node,
        0,
        "Expression must be a positive integer number up to 1000000000",
        |d| {
          d.is_positive() && d.to_u32().is_some_and(|d| d <= MAX_PRECISION)
        },
      )?
      else {
        return Ok(false);
      };
      digits.to_u32().unwrap_or(1)
    }
    _ => return Ok(false),
  };
  session.replace_by_number(node, number::random(digits));
  Ok(true)
}

/// RandomInRange[a, b] - uniform Integer between `a` and `b`, inclusive
fn random_in_range(
  session: &mut Session,
  node: NodeId,
) -> Result<bool, ReductionError> {
  if session.tree.child_count(node) != 2 {
    return Ok(false);
  }
  let (Some(low), Some(high)) =
    (integer_arg(session, node, 0), integer_arg(session, node, 1))
  else {
    return Ok(false);
  };
  session.replace_by_number(node, number::random_in_range(&low, &high));
  Ok(true)
}
