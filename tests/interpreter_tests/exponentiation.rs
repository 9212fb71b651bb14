use super::*;

mod exponentiation {
  use super::*;

  #[test]
  fn exact_powers() {
    assert_eq!(interpret("2^10").unwrap(), "1024");
    assert_eq!(interpret("2^-2").unwrap(), "1/4");
    assert_eq!(interpret("(2/3)^2").unwrap(), "4/9");
    assert_eq!(interpret("Exponentiation(3, 4)").unwrap(), "81");
  }

  #[test]
  fn exact_roots() {
    assert_eq!(interpret("4^(1/2)").unwrap(), "2");
    assert_eq!(interpret("8^(2/3)").unwrap(), "4");
    assert_eq!(interpret("(4/9)^(1/2)").unwrap(), "2/3");
  }

  #[test]
  fn irrational_roots_stay_symbolic() {
    assert_eq!(interpret("2^(1/2)").unwrap(), "Exponentiation(2, 1/2)");
    assert_eq!(
      interpret("2^(3/2)").unwrap(),
      "Multiplication(2, Exponentiation(2, 1/2))"
    );
  }

  #[test]
  fn negative_base_half_powers() {
    assert_eq!(interpret("(-1)^(1/2)").unwrap(), "Complex(0, 1)");
    assert_eq!(interpret("(-4)^(1/2)").unwrap(), "Complex(0, 2)");
    assert_eq!(interpret("(-4)^(3/2)").unwrap(), "Complex(0, -8)");
  }

  #[test]
  fn zero_base() {
    assert_eq!(interpret("0^0").unwrap(), "Undefined");
    assert_eq!(interpret("0^-1").unwrap(), "Infinity");
    assert_eq!(interpret("0^2").unwrap(), "0");
    assert_eq!(interpret("0.0^2").unwrap(), "0.0");
    assert_eq!(interpret("0^(1/2)").unwrap(), "0.0");
  }

  #[test]
  fn principal_root_of_minus_one_squares_back() {
    assert_eq!(interpret("(-1)^(1/2) * (-1)^(1/2)").unwrap(), "-1");
    assert_eq!(interpret("AbsoluteValue((-1)^(1/2))^2").unwrap(), "1");
  }

  #[test]
  fn decimal_powers() {
    assert_eq!(interpret("1.5^3").unwrap(), "3.375");
    assert_eq!(interpret("2^1.0").unwrap(), "2.0");
    assert_eq!(interpret("2.0^0").unwrap(), "1.0");
    assert_eq!(interpret("Numeric(2^(1/2), 10)").unwrap(), "1.414213562");
  }

  #[test]
  fn symbolic_specials() {
    assert_eq!(interpret("x^0").unwrap(), "1");
    assert_eq!(interpret("x^0.0").unwrap(), "1.0");
    assert_eq!(interpret("x^1").unwrap(), "x");
    assert_eq!(interpret("1^x").unwrap(), "1");
  }

  #[test]
  fn integer_powers_distribute() {
    assert_eq!(
      interpret("(2 * x)^2").unwrap(),
      "Multiplication(4, Exponentiation(x, 2))"
    );
    assert_eq!(
      interpret("(x / y)^2").unwrap(),
      "Division(Exponentiation(x, 2), Exponentiation(y, 2))"
    );
    assert_eq!(
      interpret("(x * y)^(1/2)").unwrap(),
      "Exponentiation(Multiplication(x, y), 1/2)"
    );
  }

  #[test]
  fn huge_exact_power_is_left_alone() {
    assert_eq!(
      interpret("3^100000000").unwrap(),
      "Exponentiation(3, 100000000)"
    );
  }
}

mod square_root {
  use super::*;

  #[test]
  fn perfect_squares() {
    assert_eq!(interpret("SquareRoot(16)").unwrap(), "4");
    assert_eq!(interpret("SquareRoot(9/4)").unwrap(), "3/2");
    assert_eq!(interpret("SquareRoot(-4)").unwrap(), "Complex(0, 2)");
  }

  #[test]
  fn other_integers_stay_symbolic() {
    assert_eq!(interpret("SquareRoot(8)").unwrap(), "SquareRoot(8)");
    assert_eq!(
      interpret("SquareRoot(-8)").unwrap(),
      "Multiplication(Complex(0, 1), SquareRoot(8))"
    );
    assert_eq!(
      interpret("SquareRoot(8/9)").unwrap(),
      "Multiplication(1/3, SquareRoot(8))"
    );
  }

  #[test]
  fn decimals() {
    assert_eq!(interpret("SquareRoot(2.25)").unwrap(), "1.5");
    assert_eq!(interpret("SquareRoot(-2.25)").unwrap(), "Complex(0, 1.5)");
    assert_eq!(
      interpret("Numeric(SquareRoot(2), 10)").unwrap(),
      "1.414213562"
    );
  }
}
