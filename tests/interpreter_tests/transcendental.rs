use super::*;

mod logarithms {
  use super::*;

  #[test]
  fn exact_logarithms() {
    assert_eq!(interpret("Logarithm(8, 2)").unwrap(), "3");
    assert_eq!(interpret("Logarithm(1/8, 2)").unwrap(), "-3");
    assert_eq!(interpret("BinaryLogarithm(1024)").unwrap(), "10");
    assert_eq!(interpret("DecimalLogarithm(1000)").unwrap(), "3");
    assert_eq!(interpret("DecimalLogarithm(1/100)").unwrap(), "-2");
    assert_eq!(interpret("NaturalLogarithm(1)").unwrap(), "0");
  }

  #[test]
  fn logarithm_of_zero() {
    assert_eq!(
      interpret("NaturalLogarithm(0)").unwrap(),
      "Negative(Infinity)"
    );
    assert_eq!(interpret("Logarithm(0, 10)").unwrap(), "Negative(Infinity)");
    assert_eq!(interpret("Logarithm(0, 1/2)").unwrap(), "Infinity");
  }

  #[test]
  fn invalid_base() {
    assert!(interpret("Logarithm(5, 1)").is_err());
    assert!(interpret("Logarithm(5, -2)").is_err());
    assert!(interpret("Logarithm(5, 0)").is_err());
  }

  #[test]
  fn inexact_logarithms_wait_for_numeric() {
    assert_eq!(
      interpret("NaturalLogarithm(2)").unwrap(),
      "NaturalLogarithm(2)"
    );
    assert_eq!(interpret("Logarithm(10, 4)").unwrap(), "Logarithm(10, 4)");
    assert_eq!(
      interpret("Numeric(NaturalLogarithm(2), 10)").unwrap(),
      "0.6931471806"
    );
  }

  #[test]
  fn negative_argument_is_complex() {
    let result = interpret("NaturalLogarithm(-1.0)").unwrap();
    assert!(result.starts_with("Complex("), "got {}", result);
  }
}

mod trigonometric {
  use super::*;

  #[test]
  fn exact_zero() {
    assert_eq!(interpret("Sine(0)").unwrap(), "0");
    assert_eq!(interpret("Cosine(0)").unwrap(), "1");
    assert_eq!(interpret("ArcTangent(0)").unwrap(), "0");
    assert_eq!(interpret("HyperbolicCosine(0)").unwrap(), "1");
    assert_eq!(interpret("ArcCosine(0)").unwrap(), "ArcCosine(0)");
  }

  #[test]
  fn exact_arguments_stay_symbolic() {
    assert_eq!(interpret("Sine(2)").unwrap(), "Sine(2)");
    assert_eq!(
      interpret("HyperbolicSine(1/2)").unwrap(),
      "HyperbolicSine(1/2)"
    );
  }

  #[test]
  fn numeric_evaluation() {
    assert_eq!(interpret("Numeric(Sine(1), 10)").unwrap(), "0.8414709848");
    assert_eq!(interpret("Numeric(Cosine(0), 10)").unwrap(), "1.0");
  }

  #[test]
  fn domain_failures_are_undefined() {
    assert_eq!(interpret("ArcSine(2.0)").unwrap(), "Undefined");
    assert_eq!(interpret("HyperbolicArcTangent(1.0)").unwrap(), "Undefined");
  }

  #[test]
  fn complex_arguments_are_left_alone() {
    assert_eq!(
      interpret("Cosine(Complex(1, 1))").unwrap(),
      "Cosine(Complex(1, 1))"
    );
  }

  #[test]
  fn arc_tangent_2() {
    assert_eq!(interpret("ArcTangent2(0, 0)").unwrap(), "Undefined");
    assert_eq!(interpret("ArcTangent2(0, 5)").unwrap(), "0");
    assert_eq!(interpret("ArcTangent2(1, 1)").unwrap(), "ArcTangent2(1, 1)");
    assert_eq!(
      interpret("Numeric(ArcTangent2(1, 1), 10)").unwrap(),
      "0.7853981634"
    );
    assert_eq!(
      interpret("WithPrecision(ArcTangent2(1.0, 0), 10)").unwrap(),
      "1.570796327"
    );
  }
}
