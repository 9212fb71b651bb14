//! Arbitrary-precision decimal floating point: `mantissa × 10^exponent`.
//!
//! Values are kept normalized (no trailing zeros in the mantissa, zero has
//! exponent 0), so structural equality is numeric equality. Every operation
//! that can produce more digits than the active precision rounds through
//! [`DecimalConfig`].

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;

use super::rational::Rational;
use super::rounding::{pow10, round_digits, RoundingMode};

/// Precision (significant digits) and rounding mode for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalConfig {
  pub precision: u32,
  pub rounding: RoundingMode,
}

impl DecimalConfig {
  pub fn new(precision: u32, rounding: RoundingMode) -> Self {
    DecimalConfig {
      precision: precision.max(1),
      rounding,
    }
  }

  /// Same rounding, `extra` more digits. Used for intermediate results.
  pub fn guarded(self, extra: u32) -> Self {
    DecimalConfig {
      precision: self.precision.saturating_add(extra),
      rounding: self.rounding,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
  mantissa: BigInt,
  exponent: i64,
}

pub(crate) fn digit_count(m: &BigInt) -> u64 {
  if m.is_zero() {
    1
  } else {
    m.magnitude().to_str_radix(10).len() as u64
  }
}

impl Decimal {
  pub fn new(mantissa: BigInt, exponent: i64) -> Self {
    if mantissa.is_zero() {
      return Decimal::zero();
    }
    let ten = BigInt::from(10u32);
    let mut m = mantissa;
    let mut e = exponent;
    loop {
      let (q, r) = m.div_rem(&ten);
      if !r.is_zero() {
        break;
      }
      m = q;
      e += 1;
    }
    Decimal {
      mantissa: m,
      exponent: e,
    }
  }

  pub fn zero() -> Self {
    Decimal {
      mantissa: BigInt::zero(),
      exponent: 0,
    }
  }

  pub fn one() -> Self {
    Decimal::from_integer(BigInt::one())
  }

  /// Exact conversion, no rounding.
  pub fn from_integer(n: BigInt) -> Self {
    Decimal::new(n, 0)
  }

  pub fn from_i64(n: i64) -> Self {
    Decimal::from_integer(BigInt::from(n))
  }

  /// `n / d` rounded to the configuration. `d` must be nonzero.
  pub fn from_ratio(n: &BigInt, d: &BigInt, cfg: DecimalConfig) -> Self {
    Decimal::from_integer(n.clone())
      .div(&Decimal::from_integer(d.clone()), cfg)
      .unwrap_or_else(Decimal::zero)
  }

  pub fn from_rational(r: &Rational, cfg: DecimalConfig) -> Self {
    Decimal::from_ratio(r.numerator(), r.denominator(), cfg)
  }

  /// Parses a plain decimal literal (`-12.5`, `3.`, `1.5E-3`) exactly.
  pub fn parse(text: &str) -> Option<Self> {
    let text = text.trim();
    let (body, exp) = match text.find(['e', 'E']) {
      Some(i) => (&text[..i], text[i + 1..].parse::<i64>().ok()?),
      None => (text, 0),
    };
    let (negative, body) = match body.strip_prefix('-') {
      Some(rest) => (true, rest),
      None => (false, body.strip_prefix('+').unwrap_or(body)),
    };
    let (int_part, frac_part) = match body.find('.') {
      Some(i) => (&body[..i], &body[i + 1..]),
      None => (body, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
      return None;
    }
    let digits: String = format!("{}{}", int_part, frac_part);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
      return None;
    }
    let mut m: BigInt = digits.parse().ok()?;
    if negative {
      m = -m;
    }
    Some(Decimal::new(m, exp - frac_part.len() as i64))
  }

  pub fn mantissa(&self) -> &BigInt {
    &self.mantissa
  }

  pub fn exponent(&self) -> i64 {
    self.exponent
  }

  pub fn is_zero(&self) -> bool {
    self.mantissa.is_zero()
  }

  pub fn is_negative(&self) -> bool {
    self.mantissa.is_negative()
  }

  pub fn is_positive(&self) -> bool {
    self.mantissa.is_positive()
  }

  pub fn is_integer(&self) -> bool {
    self.exponent >= 0 || self.is_zero()
  }

  pub fn is_one(&self) -> bool {
    self.exponent == 0 && self.mantissa.is_one()
  }

  /// Number of significant digits; zero has none.
  pub fn significant_digits(&self) -> u64 {
    if self.is_zero() {
      0
    } else {
      digit_count(&self.mantissa)
    }
  }

  pub fn decimal_places(&self) -> u64 {
    if self.exponent < 0 {
      self.exponent.unsigned_abs()
    } else {
      0
    }
  }

  /// Position of the leading digit: `d.ddd × 10^adjusted`.
  fn adjusted_exponent(&self) -> i64 {
    digit_count(&self.mantissa) as i64 - 1 + self.exponent
  }

  pub fn neg(&self) -> Decimal {
    Decimal {
      mantissa: -&self.mantissa,
      exponent: self.exponent,
    }
  }

  pub fn abs(&self) -> Decimal {
    Decimal {
      mantissa: self.mantissa.abs(),
      exponent: self.exponent,
    }
  }

  /// Rounds to `cfg.precision` significant digits.
  pub fn round(&self, cfg: DecimalConfig) -> Decimal {
    Decimal::round_parts(&self.mantissa, self.exponent, false, cfg)
  }

  fn round_parts(
    m: &BigInt,
    e: i64,
    sticky: bool,
    cfg: DecimalConfig,
  ) -> Decimal {
    let digits = digit_count(m);
    let precision = u64::from(cfg.precision);
    if digits <= precision {
      return Decimal::new(m.clone(), e);
    }
    let k = digits - precision;
    Decimal::new(round_digits(m, k, sticky, cfg.rounding), e + k as i64)
  }

  /// Rounds to a number of digits after the point. Negative `places`
  /// round to tens, hundreds, and so on.
  pub fn round_places(&self, places: i64, mode: RoundingMode) -> Decimal {
    if self.exponent >= -places {
      return self.clone();
    }
    let k = (-places - self.exponent) as u64;
    Decimal::new(round_digits(&self.mantissa, k, false, mode), -places)
  }

  /// Rounds to an integer with the given mode.
  pub fn to_integer(&self, mode: RoundingMode) -> BigInt {
    if self.exponent >= 0 {
      &self.mantissa * pow10(self.exponent as u64)
    } else {
      round_digits(&self.mantissa, self.exponent.unsigned_abs(), false, mode)
    }
  }

  /// Drops the fractional part.
  pub fn truncate(&self) -> BigInt {
    self.to_integer(RoundingMode::TowardsZero)
  }

  pub fn to_rational(&self) -> Rational {
    if self.exponent >= 0 {
      Rational::from_integer(&self.mantissa * pow10(self.exponent as u64))
    } else {
      Rational::new(
        self.mantissa.clone(),
        pow10(self.exponent.unsigned_abs()),
      )
    }
  }

  pub fn add(&self, other: &Decimal, cfg: DecimalConfig) -> Decimal {
    if self.is_zero() {
      return other.round(cfg);
    }
    if other.is_zero() {
      return self.round(cfg);
    }
    let (big, small) = if self.adjusted_exponent() >= other.adjusted_exponent()
    {
      (self, other)
    } else {
      (other, self)
    };
    // An addend entirely below the rounding position only matters through
    // its sign, so it is replaced by a one-digit stand-in.
    let cutoff = big.adjusted_exponent() - i64::from(cfg.precision) - 2;
    let small = if small.adjusted_exponent() < cutoff.min(big.exponent) {
      let at = cutoff.min(big.exponent) - 1;
      let unit = if small.is_negative() { -1 } else { 1 };
      Decimal::new(BigInt::from(unit), at)
    } else {
      small.clone()
    };
    let e = big.exponent.min(small.exponent);
    let m = &big.mantissa * pow10((big.exponent - e) as u64)
      + &small.mantissa * pow10((small.exponent - e) as u64);
    Decimal::round_parts(&m, e, false, cfg)
  }

  pub fn sub(&self, other: &Decimal, cfg: DecimalConfig) -> Decimal {
    self.add(&other.neg(), cfg)
  }

  pub fn mul(&self, other: &Decimal, cfg: DecimalConfig) -> Decimal {
    Decimal::round_parts(
      &(&self.mantissa * &other.mantissa),
      self.exponent + other.exponent,
      false,
      cfg,
    )
  }

  /// `None` when dividing by zero.
  pub fn div(&self, other: &Decimal, cfg: DecimalConfig) -> Option<Decimal> {
    if other.is_zero() {
      return None;
    }
    if self.is_zero() {
      return Some(Decimal::zero());
    }
    let wanted = i64::from(cfg.precision) + 2;
    let shift = (wanted + digit_count(&other.mantissa) as i64
      - digit_count(&self.mantissa) as i64)
      .max(0);
    let n = &self.mantissa * pow10(shift as u64);
    let (q, r) = n.div_rem(&other.mantissa);
    Some(Decimal::round_parts(
      &q,
      self.exponent - other.exponent - shift,
      !r.is_zero(),
      cfg,
    ))
  }

  /// Square root; `None` for negative values.
  pub fn sqrt(&self, cfg: DecimalConfig) -> Option<Decimal> {
    if self.is_negative() {
      return None;
    }
    if self.is_zero() {
      return Some(Decimal::zero());
    }
    let wanted = 2 * (i64::from(cfg.precision) + 2);
    let mut shift = (wanted - digit_count(&self.mantissa) as i64).max(0);
    if (self.exponent - shift).rem_euclid(2) != 0 {
      shift += 1;
    }
    let scaled = &self.mantissa * pow10(shift as u64);
    let root = scaled.sqrt();
    let sticky = &root * &root != scaled;
    Some(Decimal::round_parts(
      &root,
      (self.exponent - shift) / 2,
      sticky,
      cfg,
    ))
  }

  /// Integer power by squaring, with guard digits on the intermediates.
  pub fn powi(&self, exponent: &BigInt, cfg: DecimalConfig) -> Option<Decimal> {
    let guarded = cfg.guarded(10);
    let mut result = Decimal::one();
    let mut base = self.clone();
    let mut e = exponent.abs();
    let two = BigInt::from(2u32);
    while !e.is_zero() {
      if e.is_odd() {
        result = result.mul(&base, guarded);
      }
      e = e / &two;
      if !e.is_zero() {
        base = base.mul(&base, guarded);
      }
    }
    if exponent.is_negative() {
      Decimal::one().div(&result, cfg)
    } else {
      Some(result.round(cfg))
    }
  }
}

impl PartialOrd for Decimal {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Decimal {
  fn cmp(&self, other: &Self) -> Ordering {
    let (sa, sb) = (self.mantissa.sign(), other.mantissa.sign());
    if sa != sb {
      return sa.cmp(&sb);
    }
    if self.is_zero() {
      return Ordering::Equal;
    }
    let adjusted = self.adjusted_exponent();
    let magnitude = match adjusted.cmp(&other.adjusted_exponent()) {
      Ordering::Equal => {
        let e = self.exponent.min(other.exponent);
        let a = self.mantissa.abs() * pow10((self.exponent - e) as u64);
        let b = other.mantissa.abs() * pow10((other.exponent - e) as u64);
        a.cmp(&b)
      }
      unequal => unequal,
    };
    if self.is_negative() {
      magnitude.reverse()
    } else {
      magnitude
    }
  }
}

impl fmt::Display for Decimal {
  /// Positional notation for moderate magnitudes (always with a point,
  /// `3.0`), scientific otherwise (`1.5E+30`).
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_zero() {
      return write!(f, "0.0");
    }
    let sign = if self.is_negative() { "-" } else { "" };
    let digits = self.mantissa.magnitude().to_str_radix(10);
    let adjusted = self.adjusted_exponent();
    if (-7..21).contains(&adjusted) {
      if self.exponent >= 0 {
        let zeros = "0".repeat(self.exponent as usize);
        write!(f, "{}{}{}.0", sign, digits, zeros)
      } else {
        let point = digits.len() as i64 + self.exponent;
        if point > 0 {
          let (int, frac) = digits.split_at(point as usize);
          write!(f, "{}{}.{}", sign, int, frac)
        } else {
          let zeros = "0".repeat((-point) as usize);
          write!(f, "{}0.{}{}", sign, zeros, digits)
        }
      }
    } else {
      let (lead, rest) = digits.split_at(1);
      let rest = if rest.is_empty() { "0" } else { rest };
      let exp_sign = if adjusted < 0 { "-" } else { "+" };
      write!(
        f,
        "{}{}.{}E{}{}",
        sign,
        lead,
        rest,
        exp_sign,
        adjusted.unsigned_abs()
      )
    }
  }
}
