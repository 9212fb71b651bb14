use super::*;

mod number_theory {
  use super::*;

  mod division {
    use super::*;

    #[test]
    fn truncating_by_default() {
      assert_eq!(interpret("Div(7, 2)").unwrap(), "3");
      assert_eq!(interpret("Mod(7, 2)").unwrap(), "1");
      assert_eq!(interpret("Div(-7, 2)").unwrap(), "-3");
      assert_eq!(interpret("Mod(-7, 2)").unwrap(), "-1");
      assert_eq!(interpret("DivMod(7, 2)").unwrap(), "{3, 1}");
    }

    #[test]
    fn euclidean_mode() {
      assert_eq!(
        interpret("SetEuclideanDivisionMode(Euclidean); Mod(-7, 2)").unwrap(),
        "1"
      );
      assert_eq!(
        interpret("SetEuclideanDivisionMode(Euclidean); Div(-7, -2)").unwrap(),
        "4"
      );
      assert_eq!(
        interpret("SetEuclideanDivisionMode(TowardsMinusInfinity); Mod(-7, 2)")
          .unwrap(),
        "1"
      );
    }

    #[test]
    fn decimal_remainder() {
      assert_eq!(interpret("Mod(7.5, 2)").unwrap(), "1.5");
    }

    #[test]
    fn by_zero() {
      assert_eq!(interpret("Div(7, 0)").unwrap(), "Infinity");
      assert_eq!(interpret("Mod(7, 0)").unwrap(), "Infinity");
    }
  }

  mod divisors {
    use super::*;

    #[test]
    fn gcd_and_lcm() {
      assert_eq!(
        interpret("GreatestCommonDivisor({12, 18, 30})").unwrap(),
        "6"
      );
      assert_eq!(interpret("GreatestCommonDivisor(12, 18)").unwrap(), "6");
      assert_eq!(
        interpret("LeastCommonMultiple({12, 18, 30})").unwrap(),
        "180"
      );
      assert_eq!(interpret("LeastCommonMultiple(4, 6)").unwrap(), "12");
    }

    #[test]
    fn gcd_keeps_symbolic_operands() {
      assert_eq!(
        interpret("GreatestCommonDivisor({12, x, 18})").unwrap(),
        "GreatestCommonDivisor({6, x})"
      );
    }

    #[test]
    fn factors() {
      assert_eq!(interpret("Factors(360)").unwrap(), "{2, 2, 2, 3, 3, 5}");
      assert_eq!(interpret("Factors(2)").unwrap(), "{2}");
      assert_eq!(interpret("Factors(1)").unwrap(), "Factors(1)");
      assert_eq!(
        interpret("FactorsWithExponents(360)").unwrap(),
        "{{2, 3}, {3, 2}, {5, 1}}"
      );
    }

    #[test]
    fn divisor_lists() {
      assert_eq!(interpret("Divisors(12)").unwrap(), "{1, 2, 3, 4, 6, 12}");
      assert_eq!(interpret("ProperDivisors(12)").unwrap(), "{1, 2, 3, 4, 6}");
      assert_eq!(interpret("ProperDivisors(1)").unwrap(), "{}");
    }

    #[test]
    fn divides() {
      assert_eq!(interpret("Divides(3, 12)").unwrap(), "True");
      assert_eq!(interpret("Divides(5, 12)").unwrap(), "False");
      assert_eq!(interpret("DoesNotDivide(5, 12)").unwrap(), "True");
      assert_eq!(interpret("Divides(0, 5)").unwrap(), "Divides(0, 5)");
    }
  }

  mod modular {
    use super::*;

    #[test]
    fn modular_exponentiation() {
      assert_eq!(
        interpret("ModularExponentiation(4, 13, 497)").unwrap(),
        "445"
      );
      assert!(interpret("ModularExponentiation(-1, 2, 5)").is_err());
      assert!(interpret("ModularExponentiation(2, 3, 0)").is_err());
    }

    #[test]
    fn modular_inverse() {
      assert_eq!(
        interpret("ModularMultiplicativeInverse(3, 11)").unwrap(),
        "4"
      );
      assert!(interpret("ModularMultiplicativeInverse(2, 4)").is_err());
    }
  }

  mod primes {
    use super::*;

    #[test]
    fn is_prime() {
      assert_eq!(interpret("IsPrime(97)").unwrap(), "True");
      assert_eq!(interpret("IsPrime(100)").unwrap(), "False");
      assert_eq!(interpret("IsPrime(2)").unwrap(), "True");
      assert_eq!(interpret("IsPrime(1)").unwrap(), "False");
      assert_eq!(interpret("IsPrime(0)").unwrap(), "False");
      assert_eq!(interpret("IsPrime(561)").unwrap(), "False");
      assert_eq!(interpret("IsPrime(2^61 - 1)").unwrap(), "True");
    }

    #[test]
    fn negative_is_rejected() {
      assert!(interpret("IsPrime(-5)").is_err());
      assert!(interpret("IsPrime(2.5)").is_err());
    }

    #[test]
    fn symbolic_operand_is_left_alone() {
      assert_eq!(interpret("IsPrime(x)").unwrap(), "IsPrime(x)");
    }
  }

  mod factorial {
    use super::*;

    #[test]
    fn small_values() {
      assert_eq!(interpret("Factorial(0)").unwrap(), "1");
      assert_eq!(interpret("Factorial(5)").unwrap(), "120");
      assert_eq!(
        interpret("Factorial(20)").unwrap(),
        "2432902008176640000"
      );
    }

    #[test]
    fn out_of_range() {
      assert!(interpret("Factorial(-1)").is_err());
      assert_eq!(
        interpret("Factorial(100001)").unwrap(),
        "Factorial(100001)"
      );
    }
  }

  mod digits {
    use super::*;

    #[test]
    fn digit_lists() {
      assert_eq!(interpret("Digits(1234)").unwrap(), "{1, 2, 3, 4}");
      assert_eq!(interpret("Digits(10, 2)").unwrap(), "{1, 0, 1, 0}");
      assert_eq!(
        interpret("Digits(5, 2, 8)").unwrap(),
        "{0, 0, 0, 0, 0, 1, 0, 1}"
      );
      assert_eq!(interpret("Digits(0)").unwrap(), "{0}");
    }

    #[test]
    fn invalid_base() {
      assert!(interpret("Digits(10, 1)").is_err());
    }

    #[test]
    fn padding_is_bounded() {
      assert!(interpret("Digits(5, 2, 100000000000)").is_err());
    }
  }

  mod random {
    use super::*;

    #[test]
    fn seeded_random_is_reproducible() {
      seed_rng(42);
      let first = interpret("Random(5)").unwrap();
      seed_rng(42);
      let second = interpret("Random(5)").unwrap();
      unseed_rng();
      assert_eq!(first, second);
      assert!(first.starts_with("0."));
    }

    #[test]
    fn random_in_range() {
      assert_eq!(interpret("RandomInRange(3, 3)").unwrap(), "3");
      let roll: i64 =
        interpret("RandomInRange(1, 6)").unwrap().parse().unwrap();
      assert!((1..=6).contains(&roll));
    }

    #[test]
    fn digit_count_is_bounded() {
      assert!(interpret("Random(0)").is_err());
      assert!(interpret("Random(5000000000)").is_err());
    }
  }
}
