//! Rounding modes and the integer-quotient rounding shared by every
//! inexact operation of the tower.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

/// The nine rounding modes a session can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
  AwayFromZero,
  TowardsZero,
  TowardsInfinity,
  TowardsMinusInfinity,
  HalfAwayFromZero,
  HalfTowardsZero,
  HalfEven,
  HalfTowardsInfinity,
  HalfTowardsMinusInfinity,
}

/// Convention used by `Div`, `Mod` and `DivMod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DivisionMode {
  Rounding(RoundingMode),
  /// Remainder always in `[0, |divisor|)`.
  Euclidean,
}

const MODE_TAG_PREFIX: &str = "Math.Arithmetic.RoundingMode.";
pub const EUCLIDEAN_TAG: &str = "Math.Arithmetic.EuclideanMode";

impl RoundingMode {
  pub const ALL: [RoundingMode; 9] = [
    RoundingMode::AwayFromZero,
    RoundingMode::TowardsZero,
    RoundingMode::TowardsInfinity,
    RoundingMode::TowardsMinusInfinity,
    RoundingMode::HalfAwayFromZero,
    RoundingMode::HalfTowardsZero,
    RoundingMode::HalfEven,
    RoundingMode::HalfTowardsInfinity,
    RoundingMode::HalfTowardsMinusInfinity,
  ];

  /// Short name, as written in formulas (`HalfEven`).
  pub fn name(self) -> &'static str {
    match self {
      RoundingMode::AwayFromZero => "AwayFromZero",
      RoundingMode::TowardsZero => "TowardsZero",
      RoundingMode::TowardsInfinity => "TowardsInfinity",
      RoundingMode::TowardsMinusInfinity => "TowardsMinusInfinity",
      RoundingMode::HalfAwayFromZero => "HalfAwayFromZero",
      RoundingMode::HalfTowardsZero => "HalfTowardsZero",
      RoundingMode::HalfEven => "HalfEven",
      RoundingMode::HalfTowardsInfinity => "HalfTowardsInfinity",
      RoundingMode::HalfTowardsMinusInfinity => "HalfTowardsMinusInfinity",
    }
  }

  /// Expression tag of the mode literal.
  pub fn tag(self) -> String {
    if self.is_nearest() {
      format!("{}Nearest.{}", MODE_TAG_PREFIX, self.name())
    } else {
      format!("{}{}", MODE_TAG_PREFIX, self.name())
    }
  }

  pub fn from_name(name: &str) -> Option<RoundingMode> {
    Self::ALL.iter().copied().find(|m| m.name() == name)
  }

  pub fn from_tag(tag: &str) -> Option<RoundingMode> {
    let rest = tag.strip_prefix(MODE_TAG_PREFIX)?;
    let rest = rest.strip_prefix("Nearest.").unwrap_or(rest);
    Self::from_name(rest)
  }

  fn is_nearest(self) -> bool {
    matches!(
      self,
      RoundingMode::HalfAwayFromZero
        | RoundingMode::HalfTowardsZero
        | RoundingMode::HalfEven
        | RoundingMode::HalfTowardsInfinity
        | RoundingMode::HalfTowardsMinusInfinity
    )
  }

  /// Whether a truncated quotient must move one unit away from zero.
  fn increments(self, negative: bool, tail: Tail, odd: bool) -> bool {
    match self {
      RoundingMode::AwayFromZero => tail != Tail::Zero,
      RoundingMode::TowardsZero => false,
      RoundingMode::TowardsInfinity => tail != Tail::Zero && !negative,
      RoundingMode::TowardsMinusInfinity => tail != Tail::Zero && negative,
      RoundingMode::HalfAwayFromZero => tail >= Tail::Half,
      RoundingMode::HalfTowardsZero => tail == Tail::AboveHalf,
      RoundingMode::HalfEven => {
        tail == Tail::AboveHalf || (tail == Tail::Half && odd)
      }
      RoundingMode::HalfTowardsInfinity => {
        tail == Tail::AboveHalf || (tail == Tail::Half && !negative)
      }
      RoundingMode::HalfTowardsMinusInfinity => {
        tail == Tail::AboveHalf || (tail == Tail::Half && negative)
      }
    }
  }
}

impl DivisionMode {
  pub fn tag(self) -> String {
    match self {
      DivisionMode::Rounding(mode) => mode.tag(),
      DivisionMode::Euclidean => EUCLIDEAN_TAG.to_string(),
    }
  }

  pub fn from_tag(tag: &str) -> Option<DivisionMode> {
    if tag == EUCLIDEAN_TAG {
      return Some(DivisionMode::Euclidean);
    }
    RoundingMode::from_tag(tag).map(DivisionMode::Rounding)
  }
}

/// Magnitude of the discarded part relative to half a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tail {
  Zero,
  BelowHalf,
  Half,
  AboveHalf,
}

/// Rounds `n / d` to an integer. `d` must be positive. `sticky` marks
/// that `n` itself was already truncated (some nonzero digits below it
/// were dropped), which breaks exact ties and zero tails.
pub fn round_quotient(
  n: &BigInt,
  d: &BigInt,
  sticky: bool,
  mode: RoundingMode,
) -> BigInt {
  debug_assert!(d.is_positive());
  let (q, r) = n.div_rem(d);
  let twice = r.abs() * 2u32;
  let tail = match (twice.cmp(d), r.is_zero()) {
    (_, true) if sticky => Tail::BelowHalf,
    (_, true) => Tail::Zero,
    (Ordering::Less, _) => Tail::BelowHalf,
    (Ordering::Equal, _) if sticky => Tail::AboveHalf,
    (Ordering::Equal, _) => Tail::Half,
    (Ordering::Greater, _) => Tail::AboveHalf,
  };
  let negative = n.sign() == Sign::Minus;
  if mode.increments(negative, tail, q.is_odd()) {
    if negative { q - BigInt::one() } else { q + BigInt::one() }
  } else {
    q
  }
}

/// Drops the `k` lowest decimal digits of `m`, rounding.
pub fn round_digits(
  m: &BigInt,
  k: u64,
  sticky: bool,
  mode: RoundingMode,
) -> BigInt {
  if k == 0 {
    return m.clone();
  }
  round_quotient(m, &pow10(k), sticky, mode)
}

pub fn pow10(k: u64) -> BigInt {
  num_traits::pow(BigInt::from(10u32), k as usize)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn q(n: i64, d: i64, mode: RoundingMode) -> i64 {
    use num_traits::ToPrimitive;
    let r = round_quotient(&BigInt::from(n), &BigInt::from(d), false, mode);
    r.to_i64().unwrap()
  }

  #[test]
  fn half_modes_on_ties() {
    assert_eq!(q(5, 2, RoundingMode::HalfAwayFromZero), 3);
    assert_eq!(q(-5, 2, RoundingMode::HalfAwayFromZero), -3);
    assert_eq!(q(5, 2, RoundingMode::HalfTowardsZero), 2);
    assert_eq!(q(5, 2, RoundingMode::HalfEven), 2);
    assert_eq!(q(7, 2, RoundingMode::HalfEven), 4);
    assert_eq!(q(-5, 2, RoundingMode::HalfTowardsInfinity), -2);
    assert_eq!(q(-5, 2, RoundingMode::HalfTowardsMinusInfinity), -3);
  }

  #[test]
  fn directed_modes() {
    assert_eq!(q(7, 3, RoundingMode::TowardsInfinity), 3);
    assert_eq!(q(-7, 3, RoundingMode::TowardsInfinity), -2);
    assert_eq!(q(-7, 3, RoundingMode::TowardsMinusInfinity), -3);
    assert_eq!(q(-7, 3, RoundingMode::TowardsZero), -2);
    assert_eq!(q(-7, 3, RoundingMode::AwayFromZero), -3);
    assert_eq!(q(6, 3, RoundingMode::AwayFromZero), 2);
  }

  #[test]
  fn sticky_breaks_ties() {
    let r = round_quotient(
      &BigInt::from(5),
      &BigInt::from(10),
      true,
      RoundingMode::HalfEven,
    );
    assert_eq!(r, BigInt::from(1));
  }

  #[test]
  fn tags_round_trip() {
    for mode in RoundingMode::ALL {
      assert_eq!(RoundingMode::from_tag(&mode.tag()), Some(mode));
    }
    assert_eq!(
      RoundingMode::HalfEven.tag(),
      "Math.Arithmetic.RoundingMode.Nearest.HalfEven"
    );
    assert_eq!(
      DivisionMode::from_tag(EUCLIDEAN_TAG),
      Some(DivisionMode::Euclidean)
    );
  }
}
