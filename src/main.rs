use anyhow::Context as _;
use clap::builder::PossibleValue;
use clap::{Parser, Subcommand, ValueEnum};
use formula_kernel::evaluator::{valid_precision, Context};
use formula_kernel::number::{DivisionMode, Number, RoundingMode};
use formula_kernel::{interpret_to_json, interpret_with_context, seed_rng};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Reduce a formula and print its normal form
  Eval {
    /// The formula; `;` separates statements sharing one session
    expression: String,
    /// Significant digits of Decimal results
    #[arg(long, default_value_t = 20)]
    precision: u32,
    /// Rounding mode of Decimal results
    #[arg(long, default_value = "HalfAwayFromZero")]
    rounding: Mode,
    /// Convention of Div, Mod and DivMod
    #[arg(long, default_value = "TowardsZero")]
    division_mode: Division,
    /// Evaluate exact operands of inexact operations as Decimals
    #[arg(long)]
    numeric: bool,
    /// Only evaluate numbers, leave symbolic rewriting out
    #[arg(long)]
    no_symbolic: bool,
    /// Seed for IsPrime witnesses and the Random family
    #[arg(long)]
    seed: Option<u64>,
    /// Print the reduced tree as JSON
    #[arg(long)]
    json: bool,
  },
}

#[derive(Clone, Copy)]
struct Mode(RoundingMode);

#[derive(Clone, Copy)]
struct Division(DivisionMode);

static MODES: [Mode; 9] = [
  Mode(RoundingMode::AwayFromZero),
  Mode(RoundingMode::TowardsZero),
  Mode(RoundingMode::TowardsInfinity),
  Mode(RoundingMode::TowardsMinusInfinity),
  Mode(RoundingMode::HalfAwayFromZero),
  Mode(RoundingMode::HalfTowardsZero),
  Mode(RoundingMode::HalfEven),
  Mode(RoundingMode::HalfTowardsInfinity),
  Mode(RoundingMode::HalfTowardsMinusInfinity),
];

static DIVISIONS: [Division; 10] = [
  Division(DivisionMode::Rounding(RoundingMode::AwayFromZero)),
  Division(DivisionMode::Rounding(RoundingMode::TowardsZero)),
  Division(DivisionMode::Rounding(RoundingMode::TowardsInfinity)),
  Division(DivisionMode::Rounding(RoundingMode::TowardsMinusInfinity)),
  Division(DivisionMode::Rounding(RoundingMode::HalfAwayFromZero)),
  Division(DivisionMode::Rounding(RoundingMode::HalfTowardsZero)),
  Division(DivisionMode::Rounding(RoundingMode::HalfEven)),
  Division(DivisionMode::Rounding(RoundingMode::HalfTowardsInfinity)),
  Division(DivisionMode::Rounding(RoundingMode::HalfTowardsMinusInfinity)),
  Division(DivisionMode::Euclidean),
];

impl ValueEnum for Mode {
  fn value_variants<'a>() -> &'a [Self] {
    &MODES
  }

  fn to_possible_value(&self) -> Option<PossibleValue> {
    Some(PossibleValue::new(self.0.name()))
  }
}

impl ValueEnum for Division {
  fn value_variants<'a>() -> &'a [Self] {
    &DIVISIONS
  }

  fn to_possible_value(&self) -> Option<PossibleValue> {
    match self.0 {
      DivisionMode::Rounding(mode) => Some(PossibleValue::new(mode.name())),
      DivisionMode::Euclidean => Some(PossibleValue::new("Euclidean")),
    }
  }
}

/// Logs go to stderr, filtered by RUST_LOG, then FORMULA_LOG, then `warn`.
fn init_logging() {
  let env_filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_from_env("FORMULA_LOG"))
    .unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .init();
}

fn main() -> anyhow::Result<()> {
  init_logging();
  let cli = Cli::parse();

  match cli.command {
    Commands::Eval {
      expression,
      precision,
      rounding,
      division_mode,
      numeric,
      no_symbolic,
      seed,
      json,
    } => {
      valid_precision(&Number::integer(precision))
        .with_context(|| format!("invalid precision {}", precision))?;
      if let Some(seed) = seed {
        seed_rng(seed);
      }
      let context = Context {
        precision,
        rounding: rounding.0,
        division: division_mode.0,
        numeric,
        no_symbolic,
      };
      if json {
        let value = interpret_to_json(&expression, context)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
      } else {
        println!("{}", interpret_with_context(&expression, context)?);
      }
    }
  }
  Ok(())
}
