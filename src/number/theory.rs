//! Integer number theory: gcd/lcm, trial-division factorization, divisor
//! enumeration, modular arithmetic and the Miller–Rabin test.

use num_bigint::{BigInt, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// Number of Miller–Rabin rounds. The test is probabilistic: a composite
/// passes all rounds with probability at most 4^-17.
pub const PRIMALITY_ROUNDS: usize = 17;

/// Non-negative greatest common divisor.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
  a.gcd(b)
}

/// Non-negative least common multiple; zero if either operand is zero.
pub fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
  if a.is_zero() || b.is_zero() {
    return BigInt::zero();
  }
  a.lcm(b)
}

/// Prime factors of `n ≥ 2` in ascending order, with repetition.
pub fn factors(n: &BigInt) -> Vec<BigInt> {
  factors_with_exponents(n)
    .into_iter()
    .flat_map(|(p, e)| std::iter::repeat(p).take(e as usize))
    .collect()
}

/// Distinct prime factors of `n ≥ 2` with their multiplicities, found by
/// trial division up to √n: 2 first, then odd candidates.
pub fn factors_with_exponents(n: &BigInt) -> Vec<(BigInt, u32)> {
  let mut result = Vec::new();
  let mut n = n.abs();
  if n < BigInt::from(2) {
    return result;
  }
  let two = BigInt::from(2);
  let mut count = 0;
  while n.is_even() {
    n /= &two;
    count += 1;
  }
  if count > 0 {
    result.push((two.clone(), count));
  }
  let mut candidate = BigInt::from(3);
  while &candidate * &candidate <= n {
    let mut count = 0;
    loop {
      let (q, r) = n.div_rem(&candidate);
      if !r.is_zero() {
        break;
      }
      n = q;
      count += 1;
    }
    if count > 0 {
      result.push((candidate.clone(), count));
    }
    candidate += &two;
  }
  if n > BigInt::one() {
    result.push((n, 1));
  }
  result
}

/// All positive divisors of `n ≥ 1`, ascending, by walking every
/// combination of prime exponents.
pub fn divisors(n: &BigInt) -> Vec<BigInt> {
  let primes = factors_with_exponents(n);
  let mut exponents = vec![0u32; primes.len()];
  let mut result = Vec::new();
  loop {
    let divisor = primes
      .iter()
      .zip(&exponents)
      .fold(BigInt::one(), |acc, ((p, _), &e)| {
        acc * num_traits::pow(p.clone(), e as usize)
      });
    result.push(divisor);

    // Odometer step over the exponent ranges.
    let mut i = 0;
    loop {
      if i == primes.len() {
        result.sort();
        return result;
      }
      if exponents[i] < primes[i].1 {
        exponents[i] += 1;
        break;
      }
      exponents[i] = 0;
      i += 1;
    }
  }
}

/// Divisors of `n` other than `n` itself.
pub fn proper_divisors(n: &BigInt) -> Vec<BigInt> {
  let mut all = divisors(n);
  all.pop();
  all
}

/// `base^exponent mod modulus` by square-and-multiply. All operands are
/// non-negative and the modulus is positive.
pub fn mod_pow(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> BigInt {
  if modulus.is_one() {
    return BigInt::zero();
  }
  let two = BigInt::from(2);
  let mut result = BigInt::one();
  let mut base = base.mod_floor(modulus);
  let mut e = exponent.clone();
  while e.is_positive() {
    if e.is_odd() {
      result = (result * &base).mod_floor(modulus);
    }
    e /= &two;
    base = (&base * &base).mod_floor(modulus);
  }
  result
}

/// Inverse of `a` modulo a positive `m`, by the extended Euclidean
/// algorithm. `None` when `gcd(a, m) ≠ 1`.
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
  let (mut t, mut new_t) = (BigInt::zero(), BigInt::one());
  let (mut r, mut new_r) = (m.clone(), a.mod_floor(m));
  while !new_r.is_zero() {
    let q = &r / &new_r;
    let next_t = &t - &q * &new_t;
    t = std::mem::replace(&mut new_t, next_t);
    let next_r = &r - &q * &new_r;
    r = std::mem::replace(&mut new_r, next_r);
  }
  if r > BigInt::one() {
    return None;
  }
  if t.is_negative() {
    t += m;
  }
  Some(t)
}

/// Miller–Rabin with [`PRIMALITY_ROUNDS`] random witnesses. `n` must be
/// non-negative.
pub fn is_probable_prime(n: &BigInt) -> bool {
  let two = BigInt::from(2);
  let three = BigInt::from(3);
  if n < &two {
    return false;
  }
  if n == &two || n == &three {
    return true;
  }
  if n.is_even() {
    return false;
  }
  let n_minus_one: BigInt = n - BigInt::one();
  let mut d = n_minus_one.clone();
  let mut s = 0u32;
  while d.is_even() {
    d /= &two;
    s += 1;
  }
  'witness: for _ in 0..PRIMALITY_ROUNDS {
    let a = crate::with_rng(|rng| rng.gen_bigint_range(&two, &n_minus_one));
    let mut x = mod_pow(&a, &d, n);
    if x.is_one() || x == n_minus_one {
      continue;
    }
    for _ in 1..s {
      x = (&x * &x).mod_floor(n);
      if x == n_minus_one {
        continue 'witness;
      }
    }
    return false;
  }
  true
}

/// `n!` for a non-negative `n`.
pub fn factorial(n: u64) -> BigInt {
  (2..=n).fold(BigInt::one(), |acc, k| acc * k)
}

/// Integer square root of a non-negative value, and whether it is exact.
pub fn integer_sqrt(n: &BigInt) -> (BigInt, bool) {
  let root = n.sqrt();
  let exact = &root * &root == *n;
  (root, exact)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn big(n: i64) -> BigInt {
    BigInt::from(n)
  }

  fn bigs(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|&v| big(v)).collect()
  }

  #[test]
  fn gcd_and_lcm() {
    assert_eq!(gcd(&big(12), &big(18)), big(6));
    assert_eq!(gcd(&big(-12), &big(18)), big(6));
    assert_eq!(lcm(&big(12), &big(18)), big(36));
    assert_eq!(lcm(&big(0), &big(5)), big(0));
  }

  #[test]
  fn factorization() {
    assert_eq!(factors(&big(360)), bigs(&[2, 2, 2, 3, 3, 5]));
    assert_eq!(factors(&big(97)), bigs(&[97]));
    assert_eq!(
      factors_with_exponents(&big(360)),
      vec![(big(2), 3), (big(3), 2), (big(5), 1)]
    );
    assert!(factors(&big(1)).is_empty());
  }

  #[test]
  fn divisor_enumeration() {
    assert_eq!(divisors(&big(12)), bigs(&[1, 2, 3, 4, 6, 12]));
    assert_eq!(proper_divisors(&big(28)), bigs(&[1, 2, 4, 7, 14]));
    assert_eq!(divisors(&big(1)), bigs(&[1]));
  }

  #[test]
  fn modular_arithmetic() {
    assert_eq!(mod_pow(&big(4), &big(13), &big(497)), big(445));
    assert_eq!(mod_pow(&big(5), &big(0), &big(7)), big(1));
    assert_eq!(mod_pow(&big(5), &big(3), &big(1)), big(0));
    assert_eq!(mod_inverse(&big(3), &big(11)), Some(big(4)));
    assert_eq!(mod_inverse(&big(10), &big(17)), Some(big(12)));
    assert_eq!(mod_inverse(&big(6), &big(9)), None);
  }

  #[test]
  fn primality() {
    crate::seed_rng(42);
    assert!(is_probable_prime(&big(97)));
    assert!(is_probable_prime(&big(2)));
    assert!(!is_probable_prime(&big(100)));
    assert!(!is_probable_prime(&big(1)));
    assert!(!is_probable_prime(&big(561)));
    let mersenne: BigInt = (BigInt::one() << 127usize) - 1;
    assert!(is_probable_prime(&mersenne));
    crate::unseed_rng();
  }

  #[test]
  fn factorials() {
    assert_eq!(factorial(0), big(1));
    assert_eq!(factorial(10), big(3_628_800));
  }
}
