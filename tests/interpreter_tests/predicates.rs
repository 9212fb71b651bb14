use super::*;

mod predicates {
  use super::*;

  #[test]
  fn number_kinds() {
    assert_eq!(interpret("IsInteger(4)").unwrap(), "True");
    assert_eq!(interpret("IsInteger(4.0)").unwrap(), "False");
    assert_eq!(interpret("IsIntegerValue(4.0)").unwrap(), "True");
    assert_eq!(interpret("IsDecimal(0.5)").unwrap(), "True");
    assert_eq!(interpret("IsRationalNumber(1/2)").unwrap(), "True");
    assert_eq!(interpret("IsRationalNumber(3)").unwrap(), "True");
    assert_eq!(interpret("IsRationalNumber(0.5)").unwrap(), "False");
    assert_eq!(interpret("IsRealNumber(Complex(1, 1))").unwrap(), "False");
    assert_eq!(interpret("IsNumeric(Complex(1, 1))").unwrap(), "True");
  }

  #[test]
  fn signs() {
    assert_eq!(interpret("IsNegativeNumber(-2)").unwrap(), "True");
    assert_eq!(interpret("IsPositiveNumber(0)").unwrap(), "False");
    assert_eq!(interpret("IsNumberZero(0.0)").unwrap(), "True");
  }

  #[test]
  fn parity() {
    assert_eq!(interpret("IsEven(-4)").unwrap(), "True");
    assert_eq!(interpret("IsOdd(7)").unwrap(), "True");
    assert_eq!(interpret("IsEven(6.0)").unwrap(), "True");
    assert_eq!(interpret("IsOdd(1/2)").unwrap(), "False");
  }

  #[test]
  fn non_numbers_fail_every_test() {
    assert_eq!(interpret("IsNumeric(x)").unwrap(), "False");
    assert_eq!(interpret("IsInteger(\"4\")").unwrap(), "False");
  }
}

mod comparison {
  use super::*;

  #[test]
  fn compare() {
    assert_eq!(interpret("Compare(1, 2)").unwrap(), "Less");
    assert_eq!(interpret("Compare(2, 1)").unwrap(), "Greater");
    assert_eq!(interpret("Compare(1/2, 0.5)").unwrap(), "Equals");
  }

  #[test]
  fn relations() {
    assert_eq!(interpret("Equals(1/2, 0.5)").unwrap(), "True");
    assert_eq!(interpret("NotEquals(1, 2)").unwrap(), "True");
    assert_eq!(interpret("Less(1/3, 0.3333)").unwrap(), "False");
    assert_eq!(interpret("LessOrEquals(2, 2)").unwrap(), "True");
    assert_eq!(interpret("Greater(3, 2.5)").unwrap(), "True");
    assert_eq!(interpret("GreaterOrEquals(-1, 0)").unwrap(), "False");
  }

  #[test]
  fn undecidable_operands_are_left_alone() {
    assert_eq!(interpret("Compare(x, 1)").unwrap(), "Compare(x, 1)");
    assert_eq!(
      interpret("Less(Complex(0, 1), 1)").unwrap(),
      "Less(Complex(0, 1), 1)"
    );
  }
}
