//! Transcendental, trigonometric and hyperbolic functions over
//! [`Decimal`], evaluated with `astro-float` at a few guard digits above
//! the session precision and converted back exactly before the final
//! rounding.

use astro_float::{BigFloat, Consts, Radix};
use num_bigint::{BigInt, BigUint, Sign};

use super::decimal::{Decimal, DecimalConfig};
use super::NumericError;

/// The 24 circular and hyperbolic functions, with their inverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
  Sine,
  Cosine,
  Tangent,
  Cotangent,
  Secant,
  Cosecant,
  ArcSine,
  ArcCosine,
  ArcTangent,
  ArcCotangent,
  ArcSecant,
  ArcCosecant,
  HyperbolicSine,
  HyperbolicCosine,
  HyperbolicTangent,
  HyperbolicCotangent,
  HyperbolicSecant,
  HyperbolicCosecant,
  HyperbolicArcSine,
  HyperbolicArcCosine,
  HyperbolicArcTangent,
  HyperbolicArcCotangent,
  HyperbolicArcSecant,
  HyperbolicArcCosecant,
}

impl Function {
  /// Looks a function up by expression tag.
  pub fn from_tag(tag: &str) -> Option<Function> {
    use Function::*;
    let f = match tag {
      "Math.Trigonometric.Sine" => Sine,
      "Math.Trigonometric.Cosine" => Cosine,
      "Math.Trigonometric.Tangent" => Tangent,
      "Math.Trigonometric.Cotangent" => Cotangent,
      "Math.Trigonometric.Secant" => Secant,
      "Math.Trigonometric.Cosecant" => Cosecant,
      "Math.Trigonometric.ArcSine" => ArcSine,
      "Math.Trigonometric.ArcCosine" => ArcCosine,
      "Math.Trigonometric.ArcTangent" => ArcTangent,
      "Math.Trigonometric.ArcCotangent" => ArcCotangent,
      "Math.Trigonometric.ArcSecant" => ArcSecant,
      "Math.Trigonometric.ArcCosecant" => ArcCosecant,
      "Math.Hyperbolic.Sine" => HyperbolicSine,
      "Math.Hyperbolic.Cosine" => HyperbolicCosine,
      "Math.Hyperbolic.Tangent" => HyperbolicTangent,
      "Math.Hyperbolic.Cotangent" => HyperbolicCotangent,
      "Math.Hyperbolic.Secant" => HyperbolicSecant,
      "Math.Hyperbolic.Cosecant" => HyperbolicCosecant,
      "Math.Hyperbolic.ArcSine" => HyperbolicArcSine,
      "Math.Hyperbolic.ArcCosine" => HyperbolicArcCosine,
      "Math.Hyperbolic.ArcTangent" => HyperbolicArcTangent,
      "Math.Hyperbolic.ArcCotangent" => HyperbolicArcCotangent,
      "Math.Hyperbolic.ArcSecant" => HyperbolicArcSecant,
      "Math.Hyperbolic.ArcCosecant" => HyperbolicArcCosecant,
      _ => return None,
    };
    Some(f)
  }

  /// Value at exact zero, when it is a finite integer.
  pub fn at_zero(self) -> Option<i64> {
    use Function::*;
    match self {
      Sine | Tangent | ArcSine | ArcTangent => Some(0),
      HyperbolicSine | HyperbolicTangent => Some(0),
      HyperbolicArcSine | HyperbolicArcTangent => Some(0),
      Cosine | Secant | HyperbolicCosine | HyperbolicSecant => Some(1),
      _ => None,
    }
  }
}

/// Convert decimal digit precision to the nominal bit-precision, rounded
/// up to whole 64-bit words plus one guard word.
fn nominal_bits(precision: u32) -> usize {
  let base_bits =
    (f64::from(precision) * std::f64::consts::LOG2_10).ceil() as usize;
  let bits = ((base_bits + 63) & !63) + 64;
  bits.max(128)
}

const GUARD_DIGITS: u32 = 10;

struct Engine {
  cc: Consts,
  bits: usize,
  rm: astro_float::RoundingMode,
  cfg: DecimalConfig,
}

impl Engine {
  fn new(cfg: DecimalConfig) -> Result<Self, NumericError> {
    let cc = Consts::new().map_err(|e| NumericError::Backend(e.to_string()))?;
    Ok(Engine {
      cc,
      bits: nominal_bits(cfg.precision.saturating_add(GUARD_DIGITS)),
      rm: astro_float::RoundingMode::ToEven,
      cfg,
    })
  }

  fn float(&mut self, d: &Decimal) -> BigFloat {
    let text = format!("{}e{}", d.mantissa(), d.exponent());
    BigFloat::parse(&text, Radix::Dec, self.bits, self.rm, &mut self.cc)
  }

  fn int(&self, n: i32) -> BigFloat {
    BigFloat::from_i32(n, self.bits)
  }

  fn pi(&mut self) -> BigFloat {
    self.cc.pi(self.bits, self.rm)
  }

  /// Exact conversion of the binary result, then one decimal rounding.
  fn decimal(&self, bf: &BigFloat) -> Result<Decimal, NumericError> {
    if bf.is_nan() {
      return Err(NumericError::Domain);
    }
    if bf.is_inf() {
      return Err(NumericError::Overflow);
    }
    let (words, sig_bits, sign, exponent, _inexact) =
      bf.as_raw_parts().ok_or(NumericError::Domain)?;
    if sig_bits == 0 || words.iter().all(|&w| w == 0) {
      return Ok(Decimal::zero());
    }
    let magnitude = BigUint::from_bytes_le(
      &words
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect::<Vec<u8>>(),
    );
    let sign = if sign.is_negative() { Sign::Minus } else { Sign::Plus };
    let mantissa = BigInt::from_biguint(sign, magnitude);
    let shift = i64::from(exponent) - 64 * words.len() as i64;
    if shift >= 0 {
      Ok(Decimal::from_integer(mantissa << (shift as usize)).round(self.cfg))
    } else {
      let denominator = BigInt::from(1u32) << ((-shift) as usize);
      Ok(Decimal::from_ratio(&mantissa, &denominator, self.cfg))
    }
  }

  fn atan2(
    &mut self,
    y: &BigFloat,
    x: &BigFloat,
  ) -> Result<BigFloat, NumericError> {
    let (bits, rm) = (self.bits, self.rm);
    if x.is_zero() {
      if y.is_zero() {
        return Err(NumericError::Domain);
      }
      let half_pi = self.pi().div(&self.int(2), bits, rm);
      return Ok(if y.is_negative() { half_pi.neg() } else { half_pi });
    }
    let angle = y.div(x, bits, rm).atan(bits, rm, &mut self.cc);
    if x.is_negative() {
      let pi = self.pi();
      if y.is_negative() {
        Ok(angle.sub(&pi, bits, rm))
      } else {
        Ok(angle.add(&pi, bits, rm))
      }
    } else {
      Ok(angle)
    }
  }
}

fn one() -> Decimal {
  Decimal::one()
}

fn reciprocal(
  x: &BigFloat,
  bits: usize,
  rm: astro_float::RoundingMode,
) -> Result<BigFloat, NumericError> {
  if x.is_zero() {
    return Err(NumericError::Overflow);
  }
  Ok(BigFloat::from_i32(1, bits).div(x, bits, rm))
}

/// Evaluates one of the 24 circular/hyperbolic functions.
pub fn evaluate(
  f: Function,
  x: &Decimal,
  cfg: DecimalConfig,
) -> Result<Decimal, NumericError> {
  use Function::*;
  let mut en = Engine::new(cfg)?;
  let (bits, rm) = (en.bits, en.rm);
  let magnitude = x.abs();

  // Domain checks that do not need the binary value.
  match f {
    ArcSine | ArcCosine if magnitude > one() => {
      return Err(NumericError::Domain)
    }
    ArcSecant | ArcCosecant if magnitude < one() => {
      return Err(NumericError::Domain)
    }
    HyperbolicArcCosine if *x < one() => return Err(NumericError::Domain),
    HyperbolicArcTangent if magnitude > one() => {
      return Err(NumericError::Domain)
    }
    HyperbolicArcTangent if magnitude == one() => {
      return Err(NumericError::Overflow)
    }
    HyperbolicArcCotangent if magnitude < one() => {
      return Err(NumericError::Domain)
    }
    HyperbolicArcCotangent if magnitude == one() => {
      return Err(NumericError::Overflow)
    }
    HyperbolicArcSecant if x.is_negative() || *x > one() => {
      return Err(NumericError::Domain)
    }
    HyperbolicArcSecant | HyperbolicArcCosecant if x.is_zero() => {
      return Err(NumericError::Overflow)
    }
    _ => {}
  }

  let v = en.float(x);
  let result = match f {
    Sine => v.sin(bits, rm, &mut en.cc),
    Cosine => v.cos(bits, rm, &mut en.cc),
    Tangent => v.tan(bits, rm, &mut en.cc),
    Cotangent => reciprocal(&v.tan(bits, rm, &mut en.cc), bits, rm)?,
    Secant => reciprocal(&v.cos(bits, rm, &mut en.cc), bits, rm)?,
    Cosecant => reciprocal(&v.sin(bits, rm, &mut en.cc), bits, rm)?,
    ArcSine => v.asin(bits, rm, &mut en.cc),
    ArcCosine => v.acos(bits, rm, &mut en.cc),
    ArcTangent => v.atan(bits, rm, &mut en.cc),
    ArcCotangent => {
      if v.is_zero() {
        en.pi().div(&en.int(2), bits, rm)
      } else {
        reciprocal(&v, bits, rm)?.atan(bits, rm, &mut en.cc)
      }
    }
    ArcSecant => reciprocal(&v, bits, rm)?.acos(bits, rm, &mut en.cc),
    ArcCosecant => reciprocal(&v, bits, rm)?.asin(bits, rm, &mut en.cc),
    HyperbolicSine => v.sinh(bits, rm, &mut en.cc),
    HyperbolicCosine => v.cosh(bits, rm, &mut en.cc),
    HyperbolicTangent => v.tanh(bits, rm, &mut en.cc),
    HyperbolicCotangent => reciprocal(&v.tanh(bits, rm, &mut en.cc), bits, rm)?,
    HyperbolicSecant => reciprocal(&v.cosh(bits, rm, &mut en.cc), bits, rm)?,
    HyperbolicCosecant => reciprocal(&v.sinh(bits, rm, &mut en.cc), bits, rm)?,
    HyperbolicArcSine => v.asinh(bits, rm, &mut en.cc),
    HyperbolicArcCosine => v.acosh(bits, rm, &mut en.cc),
    HyperbolicArcTangent => v.atanh(bits, rm, &mut en.cc),
    HyperbolicArcCotangent => {
      reciprocal(&v, bits, rm)?.atanh(bits, rm, &mut en.cc)
    }
    HyperbolicArcSecant => {
      reciprocal(&v, bits, rm)?.acosh(bits, rm, &mut en.cc)
    }
    HyperbolicArcCosecant => {
      reciprocal(&v, bits, rm)?.asinh(bits, rm, &mut en.cc)
    }
  };
  en.decimal(&result)
}

pub fn pi(cfg: DecimalConfig) -> Result<Decimal, NumericError> {
  let mut en = Engine::new(cfg)?;
  let pi = en.pi();
  en.decimal(&pi)
}

pub fn euler(cfg: DecimalConfig) -> Result<Decimal, NumericError> {
  let mut en = Engine::new(cfg)?;
  let e = en.cc.e(en.bits, en.rm);
  en.decimal(&e)
}

pub fn exp(x: &Decimal, cfg: DecimalConfig) -> Result<Decimal, NumericError> {
  let mut en = Engine::new(cfg)?;
  let v = en.float(x);
  let r = v.exp(en.bits, en.rm, &mut en.cc);
  if r.is_zero() {
    return Err(NumericError::Underflow);
  }
  en.decimal(&r)
}

/// Natural logarithm of a positive value.
pub fn ln(x: &Decimal, cfg: DecimalConfig) -> Result<Decimal, NumericError> {
  if !x.is_positive() {
    return Err(NumericError::Domain);
  }
  let mut en = Engine::new(cfg)?;
  let v = en.float(x);
  let r = v.ln(en.bits, en.rm, &mut en.cc);
  en.decimal(&r)
}

/// Logarithm of a positive value in a positive base other than one.
pub fn log(
  x: &Decimal,
  base: &Decimal,
  cfg: DecimalConfig,
) -> Result<Decimal, NumericError> {
  if !x.is_positive() || !base.is_positive() || base.is_one() {
    return Err(NumericError::Domain);
  }
  let mut en = Engine::new(cfg)?;
  let (bits, rm) = (en.bits, en.rm);
  let lx = en.float(x).ln(bits, rm, &mut en.cc);
  let lb = en.float(base).ln(bits, rm, &mut en.cc);
  en.decimal(&lx.div(&lb, bits, rm))
}

/// `base ^ exponent` for a positive base.
pub fn pow(
  base: &Decimal,
  exponent: &Decimal,
  cfg: DecimalConfig,
) -> Result<Decimal, NumericError> {
  if !base.is_positive() {
    return Err(NumericError::Domain);
  }
  let mut en = Engine::new(cfg)?;
  let (bits, rm) = (en.bits, en.rm);
  let b = en.float(base);
  let e = en.float(exponent);
  let r = b.pow(&e, bits, rm, &mut en.cc);
  if r.is_zero() {
    return Err(NumericError::Underflow);
  }
  en.decimal(&r)
}

/// Angle of the point `(x, y)`, in `(-π, π]`.
pub fn atan2(
  y: &Decimal,
  x: &Decimal,
  cfg: DecimalConfig,
) -> Result<Decimal, NumericError> {
  let mut en = Engine::new(cfg)?;
  let (fy, fx) = (en.float(y), en.float(x));
  let r = en.atan2(&fy, &fx)?;
  en.decimal(&r)
}

/// Principal logarithm of `re + im·i`: `(ln|z|, arg z)`.
pub fn complex_ln(
  re: &Decimal,
  im: &Decimal,
  cfg: DecimalConfig,
) -> Result<(Decimal, Decimal), NumericError> {
  let mut en = Engine::new(cfg)?;
  let (bits, rm) = (en.bits, en.rm);
  let (a, b) = (en.float(re), en.float(im));
  let modulus = a
    .mul(&a, bits, rm)
    .add(&b.mul(&b, bits, rm), bits, rm)
    .sqrt(bits, rm);
  if modulus.is_zero() {
    return Err(NumericError::Domain);
  }
  let real = modulus.ln(bits, rm, &mut en.cc);
  let angle = en.atan2(&b, &a)?;
  Ok((en.decimal(&real)?, en.decimal(&angle)?))
}

/// `e^(re + im·i)` as `(real, imaginary)`.
pub fn complex_exp(
  re: &Decimal,
  im: &Decimal,
  cfg: DecimalConfig,
) -> Result<(Decimal, Decimal), NumericError> {
  let mut en = Engine::new(cfg)?;
  let (bits, rm) = (en.bits, en.rm);
  let (a, b) = (en.float(re), en.float(im));
  let magnitude = a.exp(bits, rm, &mut en.cc);
  let real = magnitude.mul(&b.cos(bits, rm, &mut en.cc), bits, rm);
  let imaginary = magnitude.mul(&b.sin(bits, rm, &mut en.cc), bits, rm);
  Ok((en.decimal(&real)?, en.decimal(&imaginary)?))
}

/// `base ^ exponent` for a negative real base, through the polar form:
/// magnitude `exp(e·ln|b|)`, angle `e·atan2(0, b)`.
pub fn negative_base_pow(
  base: &Decimal,
  exponent: &Decimal,
  cfg: DecimalConfig,
) -> Result<(Decimal, Decimal), NumericError> {
  if !base.is_negative() {
    return Err(NumericError::Domain);
  }
  let mut en = Engine::new(cfg)?;
  let (bits, rm) = (en.bits, en.rm);
  let b = en.float(base);
  let e = en.float(exponent);
  let zero = BigFloat::from_i32(0, bits);
  let angle = en.atan2(&zero, &b)?.mul(&e, bits, rm);
  let magnitude = e
    .mul(&b.abs().ln(bits, rm, &mut en.cc), bits, rm)
    .exp(bits, rm, &mut en.cc);
  let real = magnitude.mul(&angle.cos(bits, rm, &mut en.cc), bits, rm);
  let imaginary = magnitude.mul(&angle.sin(bits, rm, &mut en.cc), bits, rm);
  Ok((en.decimal(&real)?, en.decimal(&imaginary)?))
}
