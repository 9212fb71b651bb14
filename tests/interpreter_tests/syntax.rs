use super::*;

mod syntax {
  use super::*;

  #[test]
  fn operator_precedence() {
    assert_eq!(interpret("1 + 2 * 3").unwrap(), "7");
    assert_eq!(interpret("(1 + 2) * 3").unwrap(), "9");
    assert_eq!(interpret("2 * 3^2").unwrap(), "18");
    assert_eq!(interpret("-2^2").unwrap(), "-4");
    assert_eq!(interpret("2^3^2").unwrap(), "512");
  }

  #[test]
  fn division_is_left_associative() {
    assert_eq!(interpret("12 / 2 / 3").unwrap(), "2");
    assert_eq!(interpret("12 / 2 * 3").unwrap(), "18");
  }

  #[test]
  fn literals() {
    assert_eq!(interpret("1.5E3").unwrap(), "1500.0");
    assert_eq!(interpret("2.5e-3").unwrap(), "0.0025");
    assert_eq!(interpret("3.").unwrap(), "3.0");
    assert_eq!(interpret("1.5E30").unwrap(), "1.5E+30");
    assert_eq!(
      interpret("\"a \\\"quoted\\\" word\"").unwrap(),
      "\"a \\\"quoted\\\" word\""
    );
    assert_eq!(interpret("2^-1").unwrap(), "1/2");
    assert_eq!(
      interpret("-x^2").unwrap(),
      "Negative(Exponentiation(x, 2))"
    );
  }

  #[test]
  fn lists() {
    assert_eq!(interpret("{1 + 1, {2, x}}").unwrap(), "{2, {2, x}}");
    assert_eq!(interpret("{}").unwrap(), "{}");
  }

  #[test]
  fn names() {
    assert_eq!(interpret("x").unwrap(), "x");
    assert_eq!(interpret("_tmp").unwrap(), "_tmp");
    assert_eq!(interpret("True").unwrap(), "True");
    assert_eq!(interpret("Infinity").unwrap(), "Infinity");
    assert_eq!(interpret("HalfEven").unwrap(), "HalfEven");
  }

  #[test]
  fn trailing_semicolon_gives_null() {
    assert_eq!(interpret("1 + 1;").unwrap(), "Null");
  }

  #[test]
  fn whitespace_is_ignored() {
    assert_eq!(interpret("  Addition( 1 ,\n 2 )  ").unwrap(), "3");
  }
}
