use super::*;
use formula_kernel::ReductionError;

mod precision {
  use super::*;

  #[test]
  fn default_precision() {
    assert_eq!(interpret("GetPrecision()").unwrap(), "20");
    assert_eq!(interpret("Numeric(1/3)").unwrap(), "0.33333333333333333333");
  }

  #[test]
  fn set_precision_applies_to_later_statements() {
    assert_eq!(interpret("SetPrecision(5); GetPrecision()").unwrap(), "5");
    assert_eq!(interpret("SetPrecision(5); 1 / 3.0").unwrap(), "0.33333");
    assert_eq!(
      interpret("SetPrecision(5); Numeric(1/3)").unwrap(),
      "0.33333"
    );
    assert_eq!(interpret("SetPrecision(5);").unwrap(), "Null");
  }

  #[test]
  fn invalid_precision() {
    assert!(interpret("SetPrecision(0)").is_err());
    assert!(interpret("SetPrecision(1.5)").is_err());
    assert!(interpret("SetPrecision(-3)").is_err());
    assert!(interpret("WithPrecision(1, 0)").is_err());
  }

  #[test]
  fn numeric_with_precision() {
    assert_eq!(interpret("Numeric(1/3, 5)").unwrap(), "0.33333");
    assert_eq!(interpret("Numeric(2/3, 5)").unwrap(), "0.66667");
    assert_eq!(interpret("Numeric(7)").unwrap(), "7.0");
  }

  #[test]
  fn with_precision_is_scoped() {
    assert_eq!(
      interpret("WithPrecision(Numeric(2/3), 5)").unwrap(),
      "0.66667"
    );
    assert_eq!(
      interpret("WithPrecision(Numeric(2/3), 5); Numeric(2/3)").unwrap(),
      "0.66666666666666666667"
    );
  }

  #[test]
  fn constants() {
    assert_eq!(interpret("Pi").unwrap(), "Pi");
    assert_eq!(interpret("Numeric(Pi, 10)").unwrap(), "3.141592654");
    assert_eq!(interpret("Numeric(Euler, 10)").unwrap(), "2.718281828");
  }

  #[test]
  fn introspection() {
    assert_eq!(interpret("SignificantDigits(123.450)").unwrap(), "5");
    assert_eq!(interpret("SignificantDigits(1200)").unwrap(), "2");
    assert_eq!(interpret("DecimalPlaces(123.45)").unwrap(), "2");
    assert_eq!(interpret("DecimalPlaces(7)").unwrap(), "0");
    assert_eq!(
      interpret("SignificantDigits(1/3)").unwrap(),
      "SignificantDigits(1/3)"
    );
  }
}

mod rounding_mode {
  use super::*;

  #[test]
  fn get_and_set() {
    assert_eq!(interpret("GetRoundingMode()").unwrap(), "HalfAwayFromZero");
    assert_eq!(
      interpret("SetRoundingMode(HalfEven); GetRoundingMode()").unwrap(),
      "HalfEven"
    );
    assert!(interpret("SetRoundingMode(3)").is_err());
  }

  #[test]
  fn mode_applies_to_decimal_results() {
    assert_eq!(
      interpret("SetRoundingMode(TowardsZero); Numeric(2/3, 5)").unwrap(),
      "0.66666"
    );
    assert_eq!(
      interpret("SetRoundingMode(HalfEven); Round(2.5)").unwrap(),
      "2"
    );
  }

  #[test]
  fn division_mode() {
    assert_eq!(
      interpret("GetEuclideanDivisionMode()").unwrap(),
      "TowardsZero"
    );
    assert_eq!(
      interpret("SetEuclideanDivisionMode(Euclidean); GetEuclideanDivisionMode()")
        .unwrap(),
      "EuclideanMode"
    );
    assert!(interpret("SetEuclideanDivisionMode(x)").is_err());
  }
}

mod rounding_functions {
  use super::*;

  #[test]
  fn round_to_precision() {
    assert_eq!(interpret("RoundToPrecision(12345, 2)").unwrap(), "12000");
    assert_eq!(interpret("RoundToPrecision(2/3, 3)").unwrap(), "0.667");
    assert_eq!(interpret("RoundToPrecision(2.45, 2)").unwrap(), "2.5");
    assert_eq!(
      interpret("RoundToPrecision(2.45, 2, HalfEven)").unwrap(),
      "2.4"
    );
  }

  #[test]
  fn round_to_integer() {
    assert_eq!(interpret("RoundToInteger(2.5)").unwrap(), "3");
    assert_eq!(interpret("RoundToInteger(2.5, HalfEven)").unwrap(), "2");
    assert_eq!(
      interpret("RoundToInteger(-2.5, TowardsZero)").unwrap(),
      "-2"
    );
    assert_eq!(interpret("RoundToInteger(7/2)").unwrap(), "4");
  }

  #[test]
  fn round_to_decimal_places() {
    assert_eq!(
      interpret("RoundToDecimalPlaces(2.345, 2, HalfEven)").unwrap(),
      "2.34"
    );
    assert_eq!(interpret("RoundToDecimalPlaces(2/3, 3)").unwrap(), "0.667");
    assert_eq!(interpret("RoundToDecimalPlaces(1234, -2)").unwrap(), "1200");
    assert!(interpret("RoundToDecimalPlaces(1, 1.5)").is_err());
  }

  #[test]
  fn rounding_twice_changes_nothing() {
    for x in ["2/3", "2.345", "-7.125", "1234"] {
      let once = interpret(&format!("RoundToDecimalPlaces({}, 2)", x)).unwrap();
      let twice = interpret(&format!(
        "RoundToDecimalPlaces(RoundToDecimalPlaces({}, 2), 2)",
        x
      ))
      .unwrap();
      assert_eq!(once, twice);
    }
  }

  #[test]
  fn place_and_precision_operands_are_bounded() {
    assert!(matches!(
      interpret("RoundToDecimalPlaces(1/3, 1000000000000)"),
      Err(ReductionError::Validation { .. })
    ));
    assert!(matches!(
      interpret("RoundToDecimalPlaces(1/3, -1000000000000)"),
      Err(ReductionError::Validation { .. })
    ));
    assert!(matches!(
      interpret("RoundToPrecision(1/3, 2000000000)"),
      Err(ReductionError::Validation { .. })
    ));
  }

  #[test]
  fn round_to_multiple() {
    assert_eq!(interpret("RoundToMultiple(17, 5)").unwrap(), "15");
    assert_eq!(interpret("RoundToMultiple(18, 5)").unwrap(), "20");
    assert_eq!(interpret("RoundToMultiple(2.26, 0.25)").unwrap(), "2.25");
    assert!(interpret("RoundToMultiple(1, 0)").is_err());
  }

  #[test]
  fn truncate_ceiling_floor_round() {
    assert_eq!(interpret("Truncate(-2.7)").unwrap(), "-2");
    assert_eq!(interpret("Ceiling(2.1)").unwrap(), "3");
    assert_eq!(interpret("Floor(-2.5)").unwrap(), "-3");
    assert_eq!(interpret("Floor(7/2)").unwrap(), "3");
    assert_eq!(interpret("Round(2.5)").unwrap(), "3");
    assert_eq!(interpret("Round(2.345, 2)").unwrap(), "2.35");
    assert_eq!(interpret("Ceiling(2.341, 2)").unwrap(), "2.35");
  }

  #[test]
  fn non_numbers_are_left_alone() {
    assert_eq!(interpret("Floor(x)").unwrap(), "Floor(x)");
    assert_eq!(
      interpret("Truncate(Complex(1, 1))").unwrap(),
      "Truncate(Complex(1, 1))"
    );
  }
}
