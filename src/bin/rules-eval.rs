//! CLI binary for trying out and testing condition operators.
//!
//! # Commands
//!
//! - `eval`: Evaluate one operator against a left and right operand
//! - `logic`: Evaluate a JSON Logic rule that uses the registered operators
//! - `test`: Run a test suite from a JSON or YAML file
//! - `operators`: List the registered operators
//!
//! Every command accepts `--config <file>` to build the registry from a
//! registry configuration instead of using every built-in operator.

use clap::{Parser, Subcommand};
use colored::Colorize;
use rules_operators::{
    all_operators, evaluate_logic, ErrorType, EvaluationResponse, Operand, OperatorFamily,
    OperatorRegistry, RegistryConfig, TestSuite,
};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// CLI for evaluating and testing rule operators
#[derive(Parser)]
#[command(name = "rules-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Registry configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single operator
    Eval {
        /// Operator name, e.g. dateBefore
        #[arg(short, long)]
        operator: String,

        /// Left operand (inline JSON or @file.json)
        #[arg(short, long)]
        lhs: String,

        /// Right operand (inline JSON or @file.json); omitted means undefined
        #[arg(short, long)]
        rhs: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Evaluate a JSON Logic rule against data
    Logic {
        /// JSON Logic rule (inline JSON or @file.json)
        #[arg(short, long)]
        rule: String,

        /// Data to evaluate against (inline JSON or @file.json)
        #[arg(short, long, default_value = "{}")]
        data: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Run a test suite from a JSON or YAML file
    Test {
        /// Path to the test suite file
        test_file: String,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List registered operators
    Operators {
        /// Only list one family (basic, numberBased, arrayBased, dateBased)
        #[arg(short, long)]
        family: Option<String>,
    },
}

/// Logs go to stderr so command output stays clean; `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load content from a file or parse as inline JSON.
/// File references use the `@` prefix (e.g., `@fixtures/range.json`).
fn load_json(input: &str) -> Result<Value, String> {
    if let Some(file_path) = input.strip_prefix('@') {
        let path = Path::new(file_path);
        if !path.exists() {
            return Err(format!("File not found: {}", file_path));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file '{}': {}", file_path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse JSON from '{}': {}", file_path, e))
    } else {
        serde_json::from_str(input).map_err(|e| format!("Failed to parse JSON: {}", e))
    }
}

fn load_registry(config: Option<&str>) -> Result<OperatorRegistry, String> {
    match config {
        Some(path) => {
            let config = RegistryConfig::from_path(path).map_err(|e| e.message)?;
            OperatorRegistry::from_config(&config).map_err(|e| e.message)
        }
        None => Ok(OperatorRegistry::with_builtins()),
    }
}

fn render(value: &Value, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    }
}

/// Print a response the same way for `eval` and `logic`.
fn report(response: EvaluationResponse, duration: Duration, pretty: bool) -> Result<(), String> {
    if response.success {
        println!("{} Evaluation succeeded", "✓".green());
        let result = response.result.unwrap_or(Value::Null);
        println!("Result: {}", render(&result, pretty).green());
        println!("Time: {:?}", duration);
        Ok(())
    } else {
        let error_msg = response
            .error
            .map(|e| e.message)
            .unwrap_or_else(|| "Unknown error".to_string());
        println!("{} Evaluation failed", "✗".red());
        println!("Error: {}", error_msg.red());
        Err(error_msg)
    }
}

/// Run the eval command.
fn run_eval(
    registry: &OperatorRegistry,
    operator: &str,
    lhs: &str,
    rhs: Option<&str>,
    pretty: bool,
) -> Result<(), String> {
    let lhs = Operand::from(load_json(lhs)?);
    let rhs = match rhs {
        Some(rhs) => Operand::from(load_json(rhs)?),
        None => Operand::Undefined,
    };

    let start = Instant::now();
    let response = EvaluationResponse::from(registry.evaluate(operator, &lhs, &rhs));
    report(response, start.elapsed(), pretty)
}

/// Run the logic command.
fn run_logic(
    registry: &OperatorRegistry,
    rule: &str,
    data: &str,
    pretty: bool,
) -> Result<(), String> {
    let rule_value = load_json(rule)?;
    let data_value = load_json(data)?;

    let start = Instant::now();
    let response = EvaluationResponse::from(evaluate_logic(
        registry,
        &rule_value.to_string(),
        &data_value.to_string(),
    ));
    report(response, start.elapsed(), pretty)
}

fn load_suite(test_file: &str) -> Result<TestSuite, String> {
    let path = Path::new(test_file);
    if !path.exists() {
        return Err(format!("Test file not found: {}", test_file));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read test file '{}': {}", test_file, e))?;

    let suite = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => TestSuite::from_yaml_str(&content),
        _ => TestSuite::from_json_str(&content),
    };
    suite.map_err(|e| format!("{} ('{}')", e.message, test_file))
}

/// The snake_case name used for error types in suite files.
fn error_name(error_type: ErrorType) -> String {
    serde_json::to_value(error_type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", error_type))
}

fn json_or_undefined(value: &Option<Value>) -> String {
    value
        .as_ref()
        .map(|v| serde_json::to_string(v).unwrap_or_default())
        .unwrap_or_else(|| "undefined".to_string())
}

/// Run the test command.
fn run_test(registry: &OperatorRegistry, test_file: &str, verbose: bool) -> Result<(), String> {
    let suite = load_suite(test_file)?;

    println!(
        "Running: {}",
        suite.name.as_deref().unwrap_or(test_file).bold()
    );
    println!();

    let mut passed = 0;
    let mut failed = 0;
    let mut total_duration = Duration::ZERO;

    for test in &suite.tests {
        let start = Instant::now();
        let outcome = test.run(registry);
        let duration = start.elapsed();
        total_duration += duration;

        let expected = match test.error {
            Some(error_type) => format!("error {}", error_name(error_type)),
            None => json_or_undefined(&test.expected),
        };
        let actual = match (&outcome.response.result, &outcome.response.error) {
            (_, Some(error)) => format!("error {}: {}", error_name(error.error_type), error.message),
            (result, None) => json_or_undefined(result),
        };

        if outcome.passed {
            passed += 1;
            println!("{} {} ({:?})", "✓".green(), test.description, duration);
            if verbose {
                println!("  Operator: {}", test.operator);
                println!("  Left: {}", json_or_undefined(&test.lhs));
                println!("  Right: {}", json_or_undefined(&test.rhs));
                println!("  Expected: {}", expected);
                println!("  Actual: {}", actual);
                println!();
            }
        } else {
            failed += 1;
            println!("{} {} ({:?})", "✗".red(), test.description, duration);
            println!("  Expected: {}", expected.green());
            println!("  Actual: {}", actual.red());
            println!();
        }
    }

    println!();
    let summary = format!(
        "Results: {} passed, {} failed ({:?})",
        passed, failed, total_duration
    );
    if failed == 0 {
        println!("{}", summary.green());
        Ok(())
    } else {
        println!("{}", summary.red());
        Err(format!("{} test(s) failed", failed))
    }
}

fn family_summary(family: OperatorFamily) -> &'static str {
    match family {
        OperatorFamily::Basic => "Equality, membership, presence and pattern checks",
        OperatorFamily::NumberBased => "Numeric comparisons",
        OperatorFamily::ArrayBased => "Quantified checks over arrays and length comparisons",
        OperatorFamily::DateBased => "Date ranges, minute offsets and calendar-day comparisons",
    }
}

/// Run the operators command.
fn run_operators(registry: &OperatorRegistry, family: Option<&str>) -> Result<(), String> {
    let families = match family {
        Some(name) => vec![OperatorFamily::parse(name)
            .ok_or_else(|| format!("Unknown operator family: {}", name))?],
        None => OperatorFamily::ALL.to_vec(),
    };

    for family in families {
        let names: Vec<String> = family
            .operators()
            .iter()
            .map(|op| op.name().to_string())
            .filter(|name| registry.contains(name))
            .collect();
        if names.is_empty() {
            continue;
        }

        println!("{} {}", family.as_str().bold(), format!("({})", names.len()).dimmed());
        println!("  {}", family_summary(family));
        for name in names {
            println!("  • {}", name.cyan());
        }
        println!();
    }

    // Operators registered under names no built-in family uses
    let builtin: HashSet<String> = all_operators()
        .iter()
        .map(|op| op.name().to_string())
        .collect();
    let custom: Vec<&str> = registry
        .names()
        .filter(|name| !builtin.contains(*name))
        .collect();
    if !custom.is_empty() {
        println!("{}", "other".bold());
        for name in custom {
            println!("  • {}", name.cyan());
        }
        println!();
    }

    println!("Total: {}", registry.len());
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = load_registry(cli.config.as_deref()).and_then(|registry| match cli.command {
        Commands::Eval {
            operator,
            lhs,
            rhs,
            pretty,
        } => run_eval(&registry, &operator, &lhs, rhs.as_deref(), pretty),
        Commands::Logic { rule, data, pretty } => run_logic(&registry, &rule, &data, pretty),
        Commands::Test { test_file, verbose } => run_test(&registry, &test_file, verbose),
        Commands::Operators { family } => run_operators(&registry, family.as_deref()),
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
