use super::*;

mod arithmetic {
  use super::*;

  mod integer {
    use super::*;

    #[test]
    fn addition() {
      assert_eq!(interpret("1 + 2").unwrap(), "3");
      assert_eq!(interpret("1 + 2 + 3").unwrap(), "6");
      assert_eq!(interpret("(1 + 2) + 3").unwrap(), "6");
      assert_eq!(interpret("Addition(1, 2, 3, 4)").unwrap(), "10");
    }

    #[test]
    fn subtraction() {
      assert_eq!(interpret("3 - 1").unwrap(), "2");
      assert_eq!(interpret("7 - 3 - 1").unwrap(), "3");
      assert_eq!(interpret("-1 + 3").unwrap(), "2");
      assert_eq!(interpret("--3").unwrap(), "3");
    }

    #[test]
    fn multiplication() {
      assert_eq!(interpret("3 * 4").unwrap(), "12");
      assert_eq!(interpret("2 * 3 + 4 * 5").unwrap(), "26");
      assert_eq!(interpret("Multiplication()").unwrap(), "1");
      assert_eq!(interpret("Addition()").unwrap(), "0");
    }

    #[test]
    fn big_numbers() {
      assert_eq!(
        interpret("99999999999999999999 + 1").unwrap(),
        "100000000000000000000"
      );
    }
  }

  mod rational {
    use super::*;

    #[test]
    fn division_stays_exact() {
      assert_eq!(interpret("12 / 4").unwrap(), "3");
      assert_eq!(interpret("1 / 3").unwrap(), "1/3");
      assert_eq!(interpret("2 / 4").unwrap(), "1/2");
      assert_eq!(interpret("-6 / 4").unwrap(), "-3/2");
      assert_eq!(interpret("Division(12, 4)").unwrap(), "3");
    }

    #[test]
    fn fractions_add_exactly() {
      assert_eq!(interpret("1/2 + 1/3").unwrap(), "5/6");
      assert_eq!(interpret("1/2 + 1/2").unwrap(), "1");
      assert_eq!(interpret("2/3 * 3/4").unwrap(), "1/2");
    }

    #[test]
    fn division_by_zero() {
      assert_eq!(interpret("0 / 0").unwrap(), "Undefined");
      assert_eq!(interpret("1 / 0").unwrap(), "Infinity");
      assert_eq!(interpret("-1 / 0").unwrap(), "Negative(Infinity)");
      assert_eq!(interpret("x / 0").unwrap(), "Infinity");
    }
  }

  mod decimal {
    use super::*;

    #[test]
    fn decimal_arithmetic_is_exact_within_precision() {
      assert_eq!(interpret("0.1 + 0.2").unwrap(), "0.3");
      assert_eq!(interpret("1.5 * 2").unwrap(), "3.0");
      assert_eq!(interpret("1.5 + 1/2").unwrap(), "2.0");
    }

    #[test]
    fn inexact_division_rounds() {
      assert_eq!(interpret("1 / 3.0").unwrap(), "0.33333333333333333333");
      assert_eq!(interpret("2 / 3.0").unwrap(), "0.66666666666666666667");
    }

    #[test]
    fn decimal_zero_is_kept() {
      assert_eq!(interpret("0.0 + x").unwrap(), "Addition(0.0, x)");
    }
  }

  mod symbolic {
    use super::*;

    #[test]
    fn identities_vanish() {
      assert_eq!(interpret("x + 0").unwrap(), "x");
      assert_eq!(interpret("x * 1").unwrap(), "x");
      assert_eq!(interpret("x * 0").unwrap(), "0");
      assert_eq!(interpret("x / 1").unwrap(), "x");
      assert_eq!(interpret("0 / x").unwrap(), "0");
    }

    #[test]
    fn numbers_collect_in_front() {
      assert_eq!(interpret("x + 1 + 2").unwrap(), "Addition(3, x)");
      assert_eq!(interpret("2 * x * 3").unwrap(), "Multiplication(6, x)");
      assert_eq!(interpret("x + (y + 1)").unwrap(), "Addition(1, x, y)");
    }

    #[test]
    fn negations() {
      assert_eq!(interpret("-(-x)").unwrap(), "x");
      assert_eq!(interpret("-x * -y").unwrap(), "Multiplication(x, y)");
      assert_eq!(
        interpret("-x * y").unwrap(),
        "Negative(Multiplication(x, y))"
      );
      assert_eq!(
        interpret("x - (y + z)").unwrap(),
        "Addition(x, Negative(y), Negative(z))"
      );
    }

    #[test]
    fn negative_of_negative_and_of_zero() {
      assert_eq!(interpret("Negative(Negative(x))").unwrap(), "x");
      assert_eq!(
        interpret("Negative(Negative(Negative(x)))").unwrap(),
        "Negative(x)"
      );
      assert_eq!(interpret("Negative(0)").unwrap(), "0");
    }

    #[test]
    fn distribution() {
      assert_eq!(
        interpret("2 * (x + 3)").unwrap(),
        "Addition(6, Multiplication(2, x))"
      );
    }

    #[test]
    fn symbolic_division() {
      assert_eq!(interpret("x / 2").unwrap(), "Multiplication(1/2, x)");
      assert_eq!(
        interpret("2 / x").unwrap(),
        "Multiplication(2, Division(1, x))"
      );
      assert_eq!(
        interpret("(6 * x) / (3 * y)").unwrap(),
        "Multiplication(2, Division(x, y))"
      );
      assert_eq!(interpret("-x / y").unwrap(), "Negative(Division(x, y))");
      assert_eq!(interpret("-x / -y").unwrap(), "Division(x, y)");
    }
  }

  mod complex {
    use super::*;

    #[test]
    fn imaginary_unit() {
      assert_eq!(interpret("Imaginary").unwrap(), "Complex(0, 1)");
      assert_eq!(interpret("Imaginary * Imaginary").unwrap(), "-1");
    }

    #[test]
    fn exact_zero_imaginary_part_is_real() {
      assert_eq!(interpret("Complex(3, 0)").unwrap(), "3");
      assert_eq!(interpret("Complex(1, 2) + Complex(3, -2)").unwrap(), "4");
      assert_eq!(interpret("Complex(1, 1) * Complex(1, -1)").unwrap(), "2");
    }

    #[test]
    fn complex_division() {
      assert_eq!(
        interpret("2 / Complex(1, 1)").unwrap(),
        "Complex(1, -1)"
      );
    }
  }

  mod helpers {
    use super::*;

    #[test]
    fn absolute_value() {
      assert_eq!(interpret("AbsoluteValue(-7/2)").unwrap(), "7/2");
      assert_eq!(interpret("AbsoluteValue(Complex(3, 4))").unwrap(), "5");
      assert_eq!(interpret("AbsoluteValue(-2.5)").unwrap(), "2.5");
    }

    #[test]
    fn sign() {
      assert_eq!(interpret("Sign(-3)").unwrap(), "-1");
      assert_eq!(interpret("Sign(0.0)").unwrap(), "0");
      assert_eq!(interpret("Sign(1/3)").unwrap(), "1");
      assert_eq!(
        interpret("Sign(Complex(1, 1))").unwrap(),
        "Sign(Complex(1, 1))"
      );
    }

    #[test]
    fn integer_and_fractional_parts() {
      assert_eq!(interpret("IntegerPart(-7/2)").unwrap(), "3");
      assert_eq!(interpret("IntegerPart(2.75)").unwrap(), "2");
      assert_eq!(interpret("FractionalPart(-7/2)").unwrap(), "1/2");
      assert_eq!(interpret("FractionalPart(2.75)").unwrap(), "0.75");
      assert_eq!(interpret("FractionalPart(5)").unwrap(), "0");
    }

    #[test]
    fn rationalize() {
      assert_eq!(interpret("Rationalize(0.75)").unwrap(), "3/4");
      assert_eq!(interpret("Rationalize(2.0)").unwrap(), "2");
      assert_eq!(interpret("Rationalize(1/3)").unwrap(), "1/3");
      assert_eq!(interpret("Rationalize(0.3333, 4)").unwrap(), "1/3");
      assert_eq!(interpret("Rationalize(0.16, 1)").unwrap(), "1/6");
    }
  }
}
