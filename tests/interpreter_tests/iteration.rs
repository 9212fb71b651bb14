use super::*;
use formula_kernel::ReductionError;

mod summation {
  use super::*;

  #[test]
  fn over_a_range() {
    assert_eq!(interpret("Summation(i, i, 1, 5)").unwrap(), "15");
    assert_eq!(interpret("Summation(i, i, 4)").unwrap(), "10");
    assert_eq!(interpret("Summation(i^2, i, 1, 3)").unwrap(), "14");
    assert_eq!(interpret("Summation(i, i, 1, 10, 3)").unwrap(), "22");
    assert_eq!(interpret("Summation(i, i, 5, 1, -2)").unwrap(), "9");
  }

  #[test]
  fn exact_fractions() {
    assert_eq!(interpret("Summation(1/i, i, 1, 3)").unwrap(), "11/6");
    assert_eq!(interpret("Summation(i, i, 1/2, 2)").unwrap(), "2");
  }

  #[test]
  fn empty_ranges_give_the_identity() {
    assert_eq!(interpret("Summation(i, i, 5, 1, 1)").unwrap(), "0");
    assert_eq!(interpret("Summation(x, -3)").unwrap(), "0");
  }

  #[test]
  fn repetition() {
    assert_eq!(interpret("Summation(2, 3)").unwrap(), "6");
    assert_eq!(
      interpret("Summation(x, 3)").unwrap(),
      "Addition(x, x, x)"
    );
    assert_eq!(interpret("Summation(x, 1)").unwrap(), "x");
  }

  #[test]
  fn over_a_list() {
    assert_eq!(interpret("Summation(i^2, i, {1, 2, 3})").unwrap(), "14");
    assert_eq!(interpret("Summation(i, i, {})").unwrap(), "0");
  }

  #[test]
  fn free_symbols_remain() {
    assert_eq!(
      interpret("Summation(x * i, i, 1, 3)").unwrap(),
      "Addition(x, Multiplication(2, x), Multiplication(3, x))"
    );
  }

  #[test]
  fn binding_does_not_leak() {
    assert_eq!(
      interpret("Summation(i, i, 1, 3); i").unwrap(),
      "i"
    );
  }

  #[test]
  fn nested() {
    assert_eq!(
      interpret("Summation(Summation(i * j, j, 1, 2), i, 1, 2)").unwrap(),
      "9"
    );
  }

  #[test]
  fn huge_counts_are_rejected() {
    assert!(matches!(
      interpret("Summation(x, 100000000000)"),
      Err(ReductionError::Validation { .. })
    ));
    assert!(matches!(
      interpret("Product(i, i, 1, 10^12)"),
      Err(ReductionError::Validation { .. })
    ));
    assert!(matches!(
      interpret("Summation(i, i, 0, 1, 1/10000000)"),
      Err(ReductionError::Validation { .. })
    ));
    assert_eq!(interpret("Summation(1, 1000)").unwrap(), "1000");
  }

  #[test]
  fn declines_on_a_zero_step() {
    assert_eq!(
      interpret("Summation(i, i, 1, 3, 0)").unwrap(),
      "Summation(i, i, 1, 3, 0)"
    );
  }
}

mod product {
  use super::*;

  #[test]
  fn over_a_range() {
    assert_eq!(interpret("Product(i, i, 1, 5)").unwrap(), "120");
    assert_eq!(interpret("Product(i, i, 5, 1, 1)").unwrap(), "1");
    assert_eq!(interpret("Product(2, 10)").unwrap(), "1024");
  }

  #[test]
  fn over_a_list() {
    assert_eq!(interpret("Product(i + 1, i, {1, 2, 3})").unwrap(), "24");
  }
}

mod piecewise {
  use super::*;

  #[test]
  fn first_true_guard_wins() {
    assert_eq!(interpret("Piecewise(1, False, 2, True, 3)").unwrap(), "2");
    assert_eq!(interpret("Piecewise(1, True, 2, True)").unwrap(), "1");
  }

  #[test]
  fn otherwise() {
    assert_eq!(interpret("Piecewise(1, False, 3)").unwrap(), "3");
    assert_eq!(interpret("Piecewise(1, False)").unwrap(), "Null");
  }

  #[test]
  fn guards_are_reduced() {
    assert_eq!(
      interpret("Piecewise(1, Less(2, 1), 2, IsPrime(7))").unwrap(),
      "2"
    );
  }

  #[test]
  fn unknown_first_guard_declines() {
    assert_eq!(interpret("Piecewise(1, x)").unwrap(), "Piecewise(1, x)");
  }

  #[test]
  fn unknown_later_guard_is_an_error() {
    assert!(interpret("Piecewise(1, False, 2, x)").is_err());
  }

  #[test]
  fn inside_a_summation() {
    assert_eq!(
      interpret("Summation(Piecewise(i, IsEven(i), 0), i, 1, 6)").unwrap(),
      "12"
    );
  }
}
