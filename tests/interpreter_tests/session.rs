use super::*;
use formula_kernel::evaluator::{Context, MAX_DEPTH};
use formula_kernel::number::{DivisionMode, RoundingMode};
use formula_kernel::syntax::MAX_NESTING;
use formula_kernel::{interpret_to_json, ReductionError};

mod context {
  use super::*;

  #[test]
  fn precision_and_rounding() {
    let context = Context {
      precision: 5,
      rounding: RoundingMode::TowardsZero,
      ..Context::default()
    };
    assert_eq!(interpret_with_context("2 / 3.0", context).unwrap(), "0.66666");
  }

  #[test]
  fn numeric_context() {
    let context = Context {
      precision: 10,
      numeric: true,
      ..Context::default()
    };
    assert_eq!(
      interpret_with_context("Sine(1)", context).unwrap(),
      "0.8414709848"
    );
  }

  #[test]
  fn euclidean_division() {
    let context = Context {
      division: DivisionMode::Euclidean,
      ..Context::default()
    };
    assert_eq!(interpret_with_context("Mod(-7, 2)", context).unwrap(), "1");
  }

  #[test]
  fn no_symbolic_keeps_numeric_folding() {
    let context = Context {
      no_symbolic: true,
      ..Context::default()
    };
    assert_eq!(interpret_with_context("1 + 2", context).unwrap(), "3");
    assert_eq!(interpret_with_context("x + 0", context).unwrap(), "x");
    assert_eq!(
      interpret_with_context("2 * (x + 3)", context).unwrap(),
      "Multiplication(2, Addition(3, x))"
    );
    assert_eq!(
      interpret_with_context("x / 2", context).unwrap(),
      "Division(x, 2)"
    );
  }
}

mod statements {
  use super::*;

  #[test]
  fn settings_carry_over() {
    assert_eq!(
      interpret("SetPrecision(3); x; Numeric(1/7)").unwrap(),
      "0.143"
    );
  }

  #[test]
  fn each_request_starts_fresh() {
    assert_eq!(interpret("SetPrecision(3)").unwrap(), "Null");
    assert_eq!(interpret("GetPrecision()").unwrap(), "20");
  }

  #[test]
  fn unknown_functions_keep_reduced_arguments() {
    assert_eq!(interpret("Foo(1 + 1, x)").unwrap(), "Foo(2, x)");
    assert_eq!(
      interpret("Math.Arithmetic.Addition(1, 2)").unwrap(),
      "3"
    );
  }
}

mod errors {
  use super::*;

  #[test]
  fn empty_input() {
    assert!(matches!(interpret(""), Err(ReductionError::EmptyInput)));
    assert!(matches!(interpret("   "), Err(ReductionError::EmptyInput)));
  }

  #[test]
  fn parse_error() {
    assert!(matches!(interpret("1 +"), Err(ReductionError::ParseError(_))));
  }

  #[test]
  fn validation_error_names_the_operand() {
    match interpret("IsPrime(-5)") {
      Err(ReductionError::Validation { expression, .. }) => {
        assert_eq!(expression, "-5");
      }
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn long_negation_chains_hit_the_walk_limit() {
    let input = format!("{}1", "-".repeat(3000));
    assert!(matches!(
      interpret(&input),
      Err(ReductionError::RecursionLimit(MAX_DEPTH))
    ));
    assert_eq!(interpret(&format!("{}x", "-".repeat(200))).unwrap(), "x");
  }

  #[test]
  fn deep_brackets_are_rejected_before_parsing() {
    let calls =
      format!("{}x{}", "Addition(1, ".repeat(400), ")".repeat(400));
    assert!(matches!(
      interpret(&calls),
      Err(ReductionError::RecursionLimit(MAX_NESTING))
    ));
    let lists = format!("{}{}", "{".repeat(100), "}".repeat(100));
    assert!(matches!(
      interpret(&lists),
      Err(ReductionError::RecursionLimit(MAX_NESTING))
    ));
    let powers = vec!["2"; 100].join("^");
    assert!(matches!(
      interpret(&powers),
      Err(ReductionError::RecursionLimit(MAX_NESTING))
    ));
  }

  #[test]
  fn nesting_within_the_limit_reduces() {
    let depth = MAX_NESTING - 2;
    let calls =
      format!("{}x{}", "Addition(1, ".repeat(depth), ")".repeat(depth));
    assert_eq!(
      interpret(&calls).unwrap(),
      format!("Addition({}, x)", depth)
    );
    let sums = vec!["x^2"; 100].join(" + ");
    assert!(interpret(&sums).is_ok());
    assert_eq!(interpret("\"((((((\"").unwrap(), "\"((((((\"");
  }
}

mod json {
  use super::*;

  #[test]
  fn numbers_carry_their_kind() {
    let value = interpret_to_json("1/2", Context::default()).unwrap();
    assert_eq!(value["tag"], "Math.Number");
    assert_eq!(value["kind"], "Rational");
    assert_eq!(value["value"], "1/2");
  }

  #[test]
  fn trees_carry_full_tags() {
    let value = interpret_to_json("x + 1", Context::default()).unwrap();
    assert_eq!(value["tag"], "Math.Arithmetic.Addition");
    assert_eq!(value["children"][0]["value"], "1");
    assert_eq!(value["children"][1]["tag"], "Symbolic.Symbol");
    assert_eq!(value["children"][1]["value"], "x");
  }
}
