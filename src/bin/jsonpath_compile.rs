//! Command-line front end for the path expression compiler
//!
//! Compiles expressions given as an argument or on stdin and prints the
//! resulting tree, a validity verdict or the raw token stream.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonpath_compiler::diagnostics::{DiagnosticFormatter, Format};
use jsonpath_compiler::{ParseError, ParserConfig, compile_with, tokenize};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(name = "jsonpath-compile")]
#[command(about = "Compile JSONPath-style path expressions into syntax trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum nesting depth of parentheses and operands
    #[arg(long, global = true, default_value_t = jsonpath_compiler::parser::config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an expression and print its syntax tree
    Parse {
        /// Path expression (reads from stdin if not provided)
        expression: Option<String>,
        /// Output format for the tree
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Debug)]
        format: OutputFormat,
        /// Print only the tree
        #[arg(short, long)]
        quiet: bool,
    },
    /// Check expression syntax
    Validate {
        /// Path expression (reads from stdin if not provided)
        expression: Option<String>,
        /// Print only VALID or INVALID
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the token stream of an expression
    Tokens {
        /// Path expression (reads from stdin if not provided)
        expression: Option<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Rust debug representation
    Debug,
    /// Canonical expression text
    Text,
    /// JSON serialization of the tree
    Json,
}

fn main() {
    // Setup human-panic for better error messages
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ParserConfig::default().with_max_depth(cli.max_depth);
    let outcome = match cli.command {
        Commands::Parse {
            expression,
            format,
            quiet,
        } => read_expression(expression).and_then(|e| handle_parse(&e, &config, format, quiet)),
        Commands::Validate { expression, quiet } => {
            read_expression(expression).map(|e| handle_validate(&e, &config, quiet))
        }
        Commands::Tokens { expression } => read_expression(expression).map(|e| handle_tokens(&e)),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn read_expression(expression: Option<String>) -> Result<String> {
    if let Some(expression) = expression {
        return Ok(expression);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read expression from stdin")?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

fn report(error: &ParseError, expression: &str) {
    let diagnostic = error.to_diagnostic_with_source(expression);
    eprint!("{}", DiagnosticFormatter::new(Format::Text).format(&diagnostic));
}

fn handle_parse(
    expression: &str,
    config: &ParserConfig,
    format: OutputFormat,
    quiet: bool,
) -> Result<bool> {
    let ast = match compile_with(expression, config) {
        Ok(ast) => ast,
        Err(e) => {
            report(&e, expression);
            return Ok(false);
        }
    };

    if !quiet {
        eprintln!("Expression: {expression}");
    }

    let output = match format {
        OutputFormat::Debug => format!("{ast:#?}"),
        OutputFormat::Text => ast.to_string(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&ast).context("failed to serialize syntax tree")?
        }
    };
    println!("{output}");
    Ok(true)
}

fn handle_validate(expression: &str, config: &ParserConfig, quiet: bool) -> bool {
    match compile_with(expression, config) {
        Ok(_) => {
            if quiet {
                println!("VALID");
            } else {
                println!("✓ Expression is valid");
                println!("Expression: {expression}");
            }
            true
        }
        Err(e) => {
            if quiet {
                eprintln!("INVALID");
            } else {
                report(&e, expression);
            }
            false
        }
    }
}

fn handle_tokens(expression: &str) -> bool {
    match tokenize(expression) {
        Ok(tokens) => {
            for token in tokens {
                println!(
                    "{:<8} {:<16} {}",
                    token.start.to_string(),
                    token.value.kind().to_string(),
                    token.value
                );
            }
            true
        }
        Err(e) => {
            report(&e, expression);
            false
        }
    }
}
