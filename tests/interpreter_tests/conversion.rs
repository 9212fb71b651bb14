use super::*;

mod conversion {
  use super::*;

  #[test]
  fn to_integer() {
    assert_eq!(interpret("ToInteger(4.0)").unwrap(), "4");
    assert_eq!(interpret("ToInteger(1/2)").unwrap(), "1/2");
    assert_eq!(interpret("ToInteger(4.5)").unwrap(), "ToInteger(4.5)");
    assert_eq!(interpret("ToIfInteger(4.0)").unwrap(), "4");
    assert_eq!(interpret("ToIfInteger(4.5)").unwrap(), "4.5");
  }

  #[test]
  fn to_decimal() {
    assert_eq!(interpret("ToDecimal(3)").unwrap(), "3.0");
    assert_eq!(interpret("ToDecimal(1/4)").unwrap(), "0.25");
    assert_eq!(
      interpret("SetPrecision(4); ToDecimal(2/3)").unwrap(),
      "0.6667"
    );
  }

  #[test]
  fn to_number() {
    assert_eq!(interpret("ToNumber(\"123\")").unwrap(), "123");
    assert_eq!(interpret("ToNumber(\"-12.5\")").unwrap(), "-12.5");
    assert_eq!(interpret("ToNumber(\"ff\", 16)").unwrap(), "255");
    assert_eq!(interpret("ToNumber(\"-101\", 2)").unwrap(), "-5");
    assert_eq!(interpret("ToNumber(\"0.1\", 2)").unwrap(), "0.5");
  }

  #[test]
  fn to_number_declines_on_bad_digits() {
    assert_eq!(
      interpret("ToNumber(\"12\", 2)").unwrap(),
      "ToNumber(\"12\", 2)"
    );
    assert_eq!(
      interpret("ToNumber(\"abc\")").unwrap(),
      "ToNumber(\"abc\")"
    );
  }

  #[test]
  fn to_string() {
    assert_eq!(interpret("ToString(1/2)").unwrap(), "\"1/2\"");
    assert_eq!(interpret("ToString(2.5)").unwrap(), "\"2.5\"");
    assert_eq!(interpret("ToString(255, 16)").unwrap(), "\"ff\"");
    assert_eq!(interpret("ToString(5, 2)").unwrap(), "\"101\"");
    assert_eq!(interpret("ToString(2.5, 2)").unwrap(), "ToString(2.5, 2)");
  }

  #[test]
  fn string_round_trip() {
    assert_eq!(interpret("ToNumber(ToString(42, 7), 7)").unwrap(), "42");
  }
}
