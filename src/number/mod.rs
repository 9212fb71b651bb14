//! The numeric tower: Integer ⊆ Rational ⊆ Decimal, plus Complex over any
//! of the three. Exact kinds stay exact unless an operation is inherently
//! inexact; every Decimal result is rounded to the [`DecimalConfig`] in
//! force when it is produced.

pub mod decimal;
pub mod rational;
pub mod rounding;
pub mod theory;
pub mod transcendental;

use num_bigint::{BigInt, RandBigInt};
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

pub use decimal::{Decimal, DecimalConfig};
pub use rational::Rational;
pub use rounding::{DivisionMode, RoundingMode};

/// Largest result an exact power may have, in bits.
const MAX_EXACT_POWER_BITS: u64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumericError {
  #[error("argument outside of the function's domain")]
  Domain,
  #[error("numeric overflow")]
  Overflow,
  #[error("numeric underflow")]
  Underflow,
  #[error("operand is not a number")]
  NonNumeric,
  #[error("arbitrary precision backend: {0}")]
  Backend(String),
}

/// A Canonical Number. Always normalized: a Rational never has a unit
/// denominator and a Complex never has an exact-zero imaginary part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Number {
  Integer(BigInt),
  Rational(Rational),
  Decimal(Decimal),
  Complex(Box<Complex>),
}

/// Both components are real numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
  pub re: Number,
  pub im: Number,
}

impl Number {
  pub fn integer(n: impl Into<BigInt>) -> Number {
    Number::Integer(n.into())
  }

  /// `None` for a zero denominator.
  pub fn rational(n: BigInt, d: BigInt) -> Option<Number> {
    if d.is_zero() {
      return None;
    }
    Some(Number::from_rational(Rational::new(n, d)))
  }

  pub fn from_rational(r: Rational) -> Number {
    if r.is_integer() {
      Number::Integer(r.numerator().clone())
    } else {
      Number::Rational(r)
    }
  }

  pub fn decimal(d: Decimal) -> Number {
    Number::Decimal(d)
  }

  /// `None` when either component is itself complex.
  pub fn complex(re: Number, im: Number) -> Option<Number> {
    if re.is_complex() || im.is_complex() {
      return None;
    }
    Some(Number::complex_unchecked(re, im))
  }

  fn complex_unchecked(re: Number, im: Number) -> Number {
    if im.is_exact() && im.is_zero() {
      re
    } else {
      Number::Complex(Box::new(Complex { re, im }))
    }
  }

  /// The imaginary unit.
  pub fn imaginary_unit() -> Number {
    Number::complex_unchecked(Number::integer(0), Number::integer(1))
  }

  pub fn zero() -> Number {
    Number::integer(0)
  }

  pub fn one() -> Number {
    Number::integer(1)
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Number::Integer(_) => "Integer",
      Number::Rational(_) => "Rational",
      Number::Decimal(_) => "Decimal",
      Number::Complex(_) => "Complex",
    }
  }

  pub fn is_integer(&self) -> bool {
    matches!(self, Number::Integer(_))
  }

  pub fn is_rational(&self) -> bool {
    matches!(self, Number::Rational(_))
  }

  pub fn is_decimal(&self) -> bool {
    matches!(self, Number::Decimal(_))
  }

  pub fn is_complex(&self) -> bool {
    matches!(self, Number::Complex(_))
  }

  pub fn is_real(&self) -> bool {
    !self.is_complex()
  }

  /// Integer or Rational, or a Complex with two exact components.
  pub fn is_exact(&self) -> bool {
    match self {
      Number::Integer(_) | Number::Rational(_) => true,
      Number::Decimal(_) => false,
      Number::Complex(c) => c.re.is_exact() && c.im.is_exact(),
    }
  }

  /// Whether any component is a Decimal.
  pub fn has_decimal(&self) -> bool {
    match self {
      Number::Decimal(_) => true,
      Number::Complex(c) => c.re.is_decimal() || c.im.is_decimal(),
      _ => false,
    }
  }

  pub fn is_zero(&self) -> bool {
    match self {
      Number::Integer(n) => n.is_zero(),
      Number::Rational(r) => r.is_zero(),
      Number::Decimal(d) => d.is_zero(),
      Number::Complex(c) => c.re.is_zero() && c.im.is_zero(),
    }
  }

  pub fn is_one(&self) -> bool {
    match self {
      Number::Integer(n) => n.is_one(),
      Number::Decimal(d) => d.is_one(),
      _ => false,
    }
  }

  pub fn is_negative(&self) -> bool {
    match self {
      Number::Integer(n) => n.is_negative(),
      Number::Rational(r) => r.is_negative(),
      Number::Decimal(d) => d.is_negative(),
      Number::Complex(_) => false,
    }
  }

  pub fn is_positive(&self) -> bool {
    self.is_real() && !self.is_zero() && !self.is_negative()
  }

  /// Integer, or a Decimal without a fractional part.
  pub fn has_integer_value(&self) -> bool {
    match self {
      Number::Integer(_) => true,
      Number::Decimal(d) => d.is_integer(),
      _ => false,
    }
  }

  pub fn as_integer(&self) -> Option<&BigInt> {
    match self {
      Number::Integer(n) => Some(n),
      _ => None,
    }
  }

  /// The integer value of an Integer or of an integral Decimal.
  pub fn integer_value(&self) -> Option<BigInt> {
    match self {
      Number::Integer(n) => Some(n.clone()),
      Number::Decimal(d) if d.is_integer() => Some(d.truncate()),
      _ => None,
    }
  }

  /// Exact value of a real number. Decimals convert without loss.
  pub fn to_rational(&self) -> Option<Rational> {
    match self {
      Number::Integer(n) => Some(Rational::from_integer(n.clone())),
      Number::Rational(r) => Some(r.clone()),
      Number::Decimal(d) => Some(d.to_rational()),
      Number::Complex(_) => None,
    }
  }

  /// Decimal value of a real number, rounded to the configuration.
  pub fn to_decimal(&self, cfg: DecimalConfig) -> Option<Decimal> {
    match self {
      Number::Integer(n) => Some(Decimal::from_integer(n.clone()).round(cfg)),
      Number::Rational(r) => Some(Decimal::from_rational(r, cfg)),
      Number::Decimal(d) => Some(d.clone()),
      Number::Complex(_) => None,
    }
  }

  /// Converts every component to a Decimal.
  pub fn to_numeric(&self, cfg: DecimalConfig) -> Number {
    match self {
      Number::Complex(c) => {
        let re = c.re.to_numeric(cfg);
        let im = c.im.to_numeric(cfg);
        Number::Complex(Box::new(Complex { re, im }))
      }
      real => match real.to_decimal(cfg) {
        Some(d) => Number::Decimal(d),
        None => real.clone(),
      },
    }
  }

  /// Real and imaginary parts; a real number has an exact zero imaginary
  /// part.
  pub fn parts(&self) -> (Number, Number) {
    match self {
      Number::Complex(c) => (c.re.clone(), c.im.clone()),
      real => (real.clone(), Number::zero()),
    }
  }

  pub fn negate(&self) -> Number {
    match self {
      Number::Integer(n) => Number::Integer(-n),
      Number::Rational(r) => Number::Rational(r.neg()),
      Number::Decimal(d) => Number::Decimal(d.neg()),
      Number::Complex(c) => {
        Number::complex_unchecked(c.re.negate(), c.im.negate())
      }
    }
  }

  /// Absolute value; the modulus for a Complex.
  pub fn abs(&self, cfg: DecimalConfig) -> Number {
    match self {
      Number::Integer(n) => Number::Integer(n.abs()),
      Number::Rational(r) => Number::Rational(r.abs()),
      Number::Decimal(d) => Number::Decimal(d.abs()),
      Number::Complex(c) => {
        let squared = c
          .re
          .multiplication(&c.re, cfg)
          .addition(&c.im.multiplication(&c.im, cfg), cfg);
        if let Some(root) = squared
          .is_exact()
          .then(|| squared.to_rational())
          .flatten()
          .and_then(|r| r.exact_root(2))
        {
          return Number::from_rational(root);
        }
        let guarded = cfg.guarded(5);
        match squared.to_decimal(guarded).and_then(|d| d.sqrt(cfg)) {
          Some(d) => Number::Decimal(d),
          None => Number::Decimal(Decimal::zero()),
        }
      }
    }
  }

  /// -1, 0 or 1; `None` for a Complex.
  pub fn sign(&self) -> Option<i32> {
    if self.is_complex() {
      None
    } else if self.is_zero() {
      Some(0)
    } else if self.is_negative() {
      Some(-1)
    } else {
      Some(1)
    }
  }

  pub fn addition(&self, other: &Number, cfg: DecimalConfig) -> Number {
    match (self, other) {
      (Number::Complex(_), _) | (_, Number::Complex(_)) => {
        let (a, b) = self.parts();
        let (c, d) = other.parts();
        Number::complex_unchecked(a.addition(&c, cfg), b.addition(&d, cfg))
      }
      (Number::Decimal(_), _) | (_, Number::Decimal(_)) => {
        let (x, y) = (self.as_decimal(cfg), other.as_decimal(cfg));
        Number::Decimal(x.add(&y, cfg))
      }
      _ => Number::from_rational(self.exact().add(&other.exact())),
    }
  }

  pub fn subtraction(&self, other: &Number, cfg: DecimalConfig) -> Number {
    self.addition(&other.negate(), cfg)
  }

  pub fn multiplication(&self, other: &Number, cfg: DecimalConfig) -> Number {
    match (self, other) {
      (Number::Complex(_), _) | (_, Number::Complex(_)) => {
        let (a, b) = self.parts();
        let (c, d) = other.parts();
        let re = a
          .multiplication(&c, cfg)
          .subtraction(&b.multiplication(&d, cfg), cfg);
        let im = a
          .multiplication(&d, cfg)
          .addition(&b.multiplication(&c, cfg), cfg);
        Number::complex_unchecked(re, im)
      }
      (Number::Decimal(_), _) | (_, Number::Decimal(_)) => {
        let (x, y) = (self.as_decimal(cfg), other.as_decimal(cfg));
        Number::Decimal(x.mul(&y, cfg))
      }
      _ => Number::from_rational(self.exact().mul(&other.exact())),
    }
  }

  /// Division by zero is a domain error.
  pub fn division(
    &self,
    other: &Number,
    cfg: DecimalConfig,
  ) -> Result<Number, NumericError> {
    if other.is_zero() {
      return Err(NumericError::Domain);
    }
    match (self, other) {
      (_, Number::Complex(_)) => {
        let (c, d) = other.parts();
        let denominator = c
          .multiplication(&c, cfg)
          .addition(&d.multiplication(&d, cfg), cfg);
        let conjugate = Number::complex_unchecked(c, d.negate());
        let numerator = self.multiplication(&conjugate, cfg);
        let (re, im) = numerator.parts();
        Ok(Number::complex_unchecked(
          re.division(&denominator, cfg)?,
          im.division(&denominator, cfg)?,
        ))
      }
      (Number::Complex(c), _) => Ok(Number::complex_unchecked(
        c.re.division(other, cfg)?,
        c.im.division(other, cfg)?,
      )),
      (Number::Decimal(_), _) | (_, Number::Decimal(_)) => {
        let (x, y) = (self.as_decimal(cfg), other.as_decimal(cfg));
        x.div(&y, cfg).map(Number::Decimal).ok_or(NumericError::Domain)
      }
      _ => self
        .exact()
        .div(&other.exact())
        .map(Number::from_rational)
        .ok_or(NumericError::Domain),
    }
  }

  /// Exact ordering of two real numbers; `None` if either is complex.
  pub fn comparison(&self, other: &Number) -> Option<Ordering> {
    Some(self.to_rational()?.cmp(&other.to_rational()?))
  }

  /// Quotient and remainder under a division convention. The quotient is
  /// always an Integer; the remainder is a Decimal when an operand is.
  pub fn div_mod(
    &self,
    other: &Number,
    mode: DivisionMode,
    cfg: DecimalConfig,
  ) -> Result<(Number, Number), NumericError> {
    let a = self.to_rational().ok_or(NumericError::NonNumeric)?;
    let b = other.to_rational().ok_or(NumericError::NonNumeric)?;
    let ratio = a.div(&b).ok_or(NumericError::Domain)?;
    let rounding = match mode {
      DivisionMode::Rounding(m) => m,
      DivisionMode::Euclidean if b.is_negative() => {
        RoundingMode::TowardsInfinity
      }
      DivisionMode::Euclidean => RoundingMode::TowardsMinusInfinity,
    };
    let q = ratio.round(rounding);
    let r = a.add(&b.mul(&Rational::from_integer(q.clone())).neg());
    let remainder = if self.is_decimal() || other.is_decimal() {
      Number::Decimal(Decimal::from_rational(&r, cfg))
    } else {
      Number::from_rational(r)
    };
    Ok((Number::Integer(q), remainder))
  }

  pub fn exponentiation(
    &self,
    exponent: &Number,
    cfg: DecimalConfig,
  ) -> Result<Number, NumericError> {
    match exponent {
      Number::Integer(e) => self.integer_power(e, cfg),
      Number::Rational(e) => self.rational_power(e, cfg),
      Number::Decimal(e) => {
        if self.is_complex() {
          return self.complex_power(exponent, cfg);
        }
        let base = self.as_decimal(cfg);
        if e.is_integer() {
          return base
            .powi(&e.truncate(), cfg)
            .map(Number::Decimal)
            .ok_or(NumericError::Domain);
        }
        Number::real_power(&base, e, cfg)
      }
      Number::Complex(_) => self.complex_power(exponent, cfg),
    }
  }

  fn integer_power(
    &self,
    e: &BigInt,
    cfg: DecimalConfig,
  ) -> Result<Number, NumericError> {
    match self {
      Number::Integer(_) | Number::Rational(_) => {
        let base = self.exact();
        if base.is_zero() {
          return match e.sign() {
            num_bigint::Sign::Minus => Err(NumericError::Domain),
            num_bigint::Sign::NoSign => Ok(Number::one()),
            num_bigint::Sign::Plus => Ok(Number::zero()),
          };
        }
        let magnitude = e.abs().to_u32().ok_or(NumericError::Overflow)?;
        let base_bits = base.numerator().bits().max(base.denominator().bits());
        if base_bits.saturating_mul(u64::from(magnitude))
          > MAX_EXACT_POWER_BITS
        {
          return Err(NumericError::Overflow);
        }
        let power = base.pow(magnitude);
        if e.is_negative() {
          power
            .recip()
            .map(Number::from_rational)
            .ok_or(NumericError::Domain)
        } else {
          Ok(Number::from_rational(power))
        }
      }
      Number::Decimal(d) => {
        if e.bits() > 63 {
          return Err(NumericError::Overflow);
        }
        d.powi(e, cfg).map(Number::Decimal).ok_or(NumericError::Domain)
      }
      Number::Complex(_) => {
        let mut remaining = e.abs().to_u32().ok_or(NumericError::Overflow)?;
        let guarded = cfg.guarded(10);
        let mut result = Number::one();
        let mut base = self.clone();
        while remaining > 0 {
          if remaining & 1 == 1 {
            result = result.multiplication(&base, guarded);
          }
          remaining >>= 1;
          if remaining > 0 {
            base = base.multiplication(&base, guarded);
          }
        }
        if e.is_negative() {
          Number::one().division(&result, cfg)
        } else {
          Ok(result.rounded(cfg))
        }
      }
    }
  }

  fn rational_power(
    &self,
    e: &Rational,
    cfg: DecimalConfig,
  ) -> Result<Number, NumericError> {
    match self {
      Number::Integer(_) | Number::Rational(_) => {
        let base = self.exact();
        if base.is_zero() {
          return if e.is_negative() {
            Err(NumericError::Domain)
          } else {
            Ok(Number::zero())
          };
        }
        let q = e.denominator().to_u32().ok_or(NumericError::Overflow)?;
        if !base.is_negative() {
          if let Some(root) = base.exact_root(q) {
            return Number::from_rational(root)
              .integer_power(e.numerator(), cfg);
          }
        }
        let exponent = Decimal::from_rational(e, cfg.guarded(5));
        Number::real_power(&self.as_decimal(cfg.guarded(5)), &exponent, cfg)
      }
      Number::Decimal(d) => {
        if d.is_zero() {
          return if e.is_negative() {
            Err(NumericError::Domain)
          } else {
            Ok(Number::Decimal(Decimal::zero()))
          };
        }
        Number::real_power(d, &Decimal::from_rational(e, cfg.guarded(5)), cfg)
      }
      Number::Complex(_) => {
        self.complex_power(&Number::Rational(e.clone()), cfg)
      }
    }
  }

  /// `base ^ exponent` for a real base and a non-integer exponent.
  fn real_power(
    base: &Decimal,
    exponent: &Decimal,
    cfg: DecimalConfig,
  ) -> Result<Number, NumericError> {
    if base.is_zero() {
      return if exponent.is_negative() {
        Err(NumericError::Domain)
      } else {
        Ok(Number::Decimal(Decimal::zero()))
      };
    }
    if base.is_negative() {
      let (re, im) = transcendental::negative_base_pow(base, exponent, cfg)?;
      return Ok(Number::complex_unchecked(
        Number::Decimal(re),
        Number::Decimal(im),
      ));
    }
    transcendental::pow(base, exponent, cfg).map(Number::Decimal)
  }

  /// `exp(exponent · ln(self))` over the complex plane.
  fn complex_power(
    &self,
    exponent: &Number,
    cfg: DecimalConfig,
  ) -> Result<Number, NumericError> {
    if self.is_zero() {
      return Err(NumericError::Domain);
    }
    let guarded = cfg.guarded(5);
    let (re, im) = self.parts();
    let (re, im) = (re.as_decimal(guarded), im.as_decimal(guarded));
    let (ln_re, ln_im) = transcendental::complex_ln(&re, &im, guarded)?;
    let log =
      Number::complex_unchecked(Number::Decimal(ln_re), Number::Decimal(ln_im));
    let product = exponent.to_numeric(guarded).multiplication(&log, guarded);
    let (a, b) = product.parts();
    let (out_re, out_im) = transcendental::complex_exp(
      &a.as_decimal(guarded),
      &b.as_decimal(guarded),
      cfg,
    )?;
    Ok(Number::complex_unchecked(
      Number::Decimal(out_re),
      Number::Decimal(out_im),
    ))
  }

  /// Rounds the Decimal components to the configuration.
  fn rounded(&self, cfg: DecimalConfig) -> Number {
    match self {
      Number::Decimal(d) => Number::Decimal(d.round(cfg)),
      Number::Complex(c) => {
        Number::complex_unchecked(c.re.rounded(cfg), c.im.rounded(cfg))
      }
      exact => exact.clone(),
    }
  }

  /// Rounds a real number to an integer.
  pub fn round_to_integer(&self, mode: RoundingMode) -> Option<BigInt> {
    match self {
      Number::Integer(n) => Some(n.clone()),
      Number::Rational(r) => Some(r.round(mode)),
      Number::Decimal(d) => Some(d.to_integer(mode)),
      Number::Complex(_) => None,
    }
  }

  /// Rounds to `places` digits after the point (negative: to tens,
  /// hundreds...). Integers stay Integers, Rationals become Decimals.
  pub fn round_to_places(
    &self,
    places: i64,
    mode: RoundingMode,
  ) -> Option<Number> {
    match self {
      Number::Integer(n) if places >= 0 => Some(Number::Integer(n.clone())),
      Number::Integer(n) => {
        let d = Decimal::from_integer(n.clone()).round_places(places, mode);
        Some(Number::Integer(d.truncate()))
      }
      Number::Rational(r) => {
        let scale =
          Rational::from_integer(rounding::pow10(places.unsigned_abs()));
        let scaled = if places >= 0 { r.mul(&scale) } else { r.div(&scale)? };
        Some(Number::Decimal(Decimal::new(scaled.round(mode), -places)))
      }
      Number::Decimal(d) => Some(Number::Decimal(d.round_places(places, mode))),
      Number::Complex(_) => None,
    }
  }

  /// Rounds to `precision` significant digits.
  pub fn round_to_precision(
    &self,
    precision: u32,
    mode: RoundingMode,
  ) -> Option<Number> {
    let cfg = DecimalConfig::new(precision, mode);
    match self {
      Number::Integer(n) => {
        let d = Decimal::from_integer(n.clone()).round(cfg);
        Some(Number::Integer(d.truncate()))
      }
      Number::Rational(r) => {
        Some(Number::Decimal(Decimal::from_rational(r, cfg)))
      }
      Number::Decimal(d) => Some(Number::Decimal(d.round(cfg))),
      Number::Complex(_) => None,
    }
  }

  /// Number of significant digits of an Integer or Decimal.
  pub fn significant_digits(&self) -> Option<u64> {
    match self {
      Number::Integer(n) => {
        Some(Decimal::from_integer(n.clone()).significant_digits())
      }
      Number::Decimal(d) => Some(d.significant_digits()),
      _ => None,
    }
  }

  /// Digits after the point of an Integer (always 0) or Decimal.
  pub fn decimal_places(&self) -> Option<u64> {
    match self {
      Number::Integer(_) => Some(0),
      Number::Decimal(d) => Some(d.decimal_places()),
      _ => None,
    }
  }

  /// Real value as an exact fraction. Only called on exact reals.
  fn exact(&self) -> Rational {
    self
      .to_rational()
      .unwrap_or_else(|| Rational::from_integer(BigInt::zero()))
  }

  /// Real value as a Decimal. Only called on reals.
  fn as_decimal(&self, cfg: DecimalConfig) -> Decimal {
    self.to_decimal(cfg).unwrap_or_else(Decimal::zero)
  }
}

/// A uniformly distributed Decimal in `[0, 1)` with `digits` digits after
/// the point.
pub fn random(digits: u32) -> Number {
  let bound = rounding::pow10(u64::from(digits.max(1)));
  let m = crate::with_rng(|rng| rng.gen_bigint_range(&BigInt::zero(), &bound));
  Number::Decimal(Decimal::new(m, -i64::from(digits.max(1))))
}

/// A uniformly distributed Integer in `[low, high]`.
pub fn random_in_range(low: &BigInt, high: &BigInt) -> Number {
  let (low, high) = if low <= high { (low, high) } else { (high, low) };
  let upper = high + BigInt::one();
  Number::Integer(crate::with_rng(|rng| rng.gen_bigint_range(low, &upper)))
}

impl fmt::Display for Number {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Number::Integer(n) => write!(f, "{}", n),
      Number::Rational(r) => write!(f, "{}/{}", r.numerator(), r.denominator()),
      Number::Decimal(d) => write!(f, "{}", d),
      Number::Complex(c) => write!(f, "Complex({}, {})", c.re, c.im),
    }
  }
}
