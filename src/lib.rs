use pest::Parser;
use pest_derive::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

pub mod evaluator;
pub mod expression;
pub mod functions;
pub mod number;
pub mod syntax;

use evaluator::{Context, Registry, Session};
use expression::{tags, NodeId};
use number::NumericError;

#[derive(Parser)]
#[grammar = "formula.pest"]
pub struct FormulaParser;

#[derive(Error, Debug)]
pub enum ReductionError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Empty input")]
  EmptyInput,
  #[error("Invalid literal: {0}")]
  InvalidLiteral(String),
  #[error("{message}: {expression}")]
  Validation { expression: String, message: String },
  #[error("Expression nested deeper than {0} levels")]
  RecursionLimit(usize),
  #[error("Numeric error: {0}")]
  Numeric(#[from] NumericError),
}

impl FormulaParser {
  pub fn parse_formula(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

/// Raw pest pairs of a formula. Input nested deeper than
/// [`syntax::MAX_NESTING`] should go through [`syntax::check_nesting`]
/// first, as [`interpret`] does.
pub fn parse(
  input: &str,
) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>> {
  FormulaParser::parse_formula(input)
}

thread_local! {
    // Witness source of IsPrime and of the Random family; unseeded until
    // `seed_rng` is called.
    static SEEDED_RNG: RefCell<Option<ChaCha8Rng>> = const { RefCell::new(None) };
    static REGISTRY: Rc<Registry> = Rc::new(Registry::with_default_rules());
}

/// Makes IsPrime witnesses, `Random` and `RandomInRange` repeatable for
/// this thread.
pub fn seed_rng(seed: u64) {
  let rng = ChaCha8Rng::seed_from_u64(seed);
  SEEDED_RNG.with(|slot| {
    slot.replace(Some(rng));
  });
}

/// Back to fresh entropy for every draw.
pub fn unseed_rng() {
  SEEDED_RNG.with(|slot| {
    slot.replace(None);
  });
}

/// Draws from the seeded generator when there is one, from the thread's
/// entropy source otherwise.
pub fn with_rng<F, R>(f: F) -> R
where
  F: FnOnce(&mut dyn rand::RngCore) -> R,
{
  SEEDED_RNG.with(|slot| match slot.borrow_mut().as_mut() {
    Some(seeded) => f(seeded),
    None => f(&mut rand::thread_rng()),
  })
}

/// Parses and reduces every statement of `input` in one session; returns
/// the session and the result of the last statement.
fn reduce_program(
  input: &str,
  context: Context,
) -> Result<(Session, NodeId), ReductionError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(ReductionError::EmptyInput);
  }
  syntax::check_nesting(trimmed)?;
  let pairs = parse(trimmed)?;
  let mut pairs = pairs.into_iter();
  let program = pairs.next().ok_or(ReductionError::EmptyInput)?;
  if program.as_rule() != Rule::Program {
    return Err(ReductionError::EmptyInput);
  }

  let registry = REGISTRY.with(Rc::clone);
  let mut session = Session::with_registry(context, registry);
  let mut last_result = None;
  let mut trailing_semicolon = false;
  for node in program.into_inner() {
    match node.as_rule() {
      Rule::Statement => {
        let root = syntax::build(&mut session.tree, node)?;
        session.tree.set_root(root);
        last_result = Some(session.reduce(root)?);
      }
      Rule::TrailingSemicolon => {
        trailing_semicolon = true;
      }
      _ => {} // EOI
    }
  }

  let last_result = last_result.ok_or(ReductionError::EmptyInput)?;
  if trailing_semicolon {
    let null = session.tree.leaf(tags::NULL);
    return Ok((session, null));
  }
  Ok((session, last_result))
}

/// Reduces `input` under the default context and prints the result.
pub fn interpret(input: &str) -> Result<String, ReductionError> {
  interpret_with_context(input, Context::default())
}

pub fn interpret_with_context(
  input: &str,
  context: Context,
) -> Result<String, ReductionError> {
  let (session, result) = reduce_program(input, context)?;
  Ok(syntax::expr_to_string(&session.tree, result))
}

/// Like [`interpret_with_context`], returning the reduced tree as JSON.
pub fn interpret_to_json(
  input: &str,
  context: Context,
) -> Result<serde_json::Value, ReductionError> {
  let (session, result) = reduce_program(input, context)?;
  Ok(syntax::expr_to_json(&session.tree, result))
}
