use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

use super::rounding::{round_quotient, RoundingMode};

/// Exact fraction, denominator positive and coprime with the numerator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
  numerator: BigInt,
  denominator: BigInt,
}

impl Rational {
  /// Builds a normalized fraction. Panics on a zero denominator, callers
  /// check for it first.
  pub fn new(numerator: BigInt, denominator: BigInt) -> Self {
    assert!(!denominator.is_zero(), "zero denominator");
    let g = numerator.gcd(&denominator);
    let (mut n, mut d) = (numerator / &g, denominator / &g);
    if d.is_negative() {
      n = -n;
      d = -d;
    }
    Rational {
      numerator: n,
      denominator: d,
    }
  }

  pub fn from_integer(n: BigInt) -> Self {
    Rational {
      numerator: n,
      denominator: BigInt::one(),
    }
  }

  pub fn numerator(&self) -> &BigInt {
    &self.numerator
  }

  pub fn denominator(&self) -> &BigInt {
    &self.denominator
  }

  pub fn is_integer(&self) -> bool {
    self.denominator.is_one()
  }

  pub fn is_zero(&self) -> bool {
    self.numerator.is_zero()
  }

  pub fn is_negative(&self) -> bool {
    self.numerator.is_negative()
  }

  pub fn add(&self, other: &Rational) -> Rational {
    Rational::new(
      &self.numerator * &other.denominator
        + &other.numerator * &self.denominator,
      &self.denominator * &other.denominator,
    )
  }

  pub fn mul(&self, other: &Rational) -> Rational {
    Rational::new(
      &self.numerator * &other.numerator,
      &self.denominator * &other.denominator,
    )
  }

  /// `None` when `other` is zero.
  pub fn div(&self, other: &Rational) -> Option<Rational> {
    if other.is_zero() {
      return None;
    }
    Some(Rational::new(
      &self.numerator * &other.denominator,
      &self.denominator * &other.numerator,
    ))
  }

  pub fn neg(&self) -> Rational {
    Rational {
      numerator: -&self.numerator,
      denominator: self.denominator.clone(),
    }
  }

  pub fn abs(&self) -> Rational {
    Rational {
      numerator: self.numerator.abs(),
      denominator: self.denominator.clone(),
    }
  }

  /// `None` for zero.
  pub fn recip(&self) -> Option<Rational> {
    Rational::from_integer(BigInt::one()).div(self)
  }

  pub fn pow(&self, exponent: u32) -> Rational {
    Rational {
      numerator: num_traits::pow(self.numerator.clone(), exponent as usize),
      denominator: num_traits::pow(self.denominator.clone(), exponent as usize),
    }
  }

  /// Rounds to an integer with the given mode.
  pub fn round(&self, mode: RoundingMode) -> BigInt {
    round_quotient(&self.numerator, &self.denominator, false, mode)
  }

  /// Exact `q`-th root, when both parts are perfect powers.
  pub fn exact_root(&self, q: u32) -> Option<Rational> {
    if self.is_negative() {
      return None;
    }
    let n = self.numerator.nth_root(q);
    let d = self.denominator.nth_root(q);
    let exact = num_traits::pow(n.clone(), q as usize) == self.numerator
      && num_traits::pow(d.clone(), q as usize) == self.denominator;
    exact.then(|| Rational::new(n, d))
  }
}

impl PartialOrd for Rational {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Rational {
  fn cmp(&self, other: &Self) -> Ordering {
    (&self.numerator * &other.denominator)
      .cmp(&(&other.numerator * &self.denominator))
  }
}
