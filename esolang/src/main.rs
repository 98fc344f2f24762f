//! esolang CLI

use clap::{Parser, Subcommand};
use esolang::config::Config;
use esolang::error::{CompileError, EvalError, report_error};
use esolang::interp::Interpreter;
use esolang::notation;
use esolang::repl::Repl;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "esolang", version, about = "Tree-walking interpreter for a tiny expression language")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./esolang.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive session (default)
    Repl,
    /// Evaluate a source file as one unit
    Run {
        /// Source file to run
        file: PathBuf,
    },
    /// Evaluate an expression given on the command line
    Eval {
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Print an expression without whitespace or redundant parentheses
    Minify {
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },
    /// Convert an arithmetic expression to Reverse Polish Notation
    Rpn {
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },
    /// Evaluate a space-separated RPN expression
    EvalRpn {
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },
}

fn main() {
    let cli = Cli::parse();
    esolang::logging::init_tracing(cli.verbose);

    if let Err(e) = try_main(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn try_main(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(cli.config.as_deref())?;
    let config = &config;

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => Ok(Repl::new(config)?.run()?),
        Command::Run { file } => run_file(&file, config),
        Command::Eval { expr } => eval_expr(&expr, config),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Minify { expr } => {
            let program = esolang::parser::parse_source("<expr>", &expr)?;
            println!("{}", notation::minify(&program));
            Ok(())
        }
        Command::Rpn { expr } => {
            let program = esolang::parser::parse_source("<expr>", &expr)?;
            println!("{}", notation::to_rpn(&program)?);
            Ok(())
        }
        Command::EvalRpn { expr } => {
            println!("{}", notation::eval_rpn(&expr)?);
            Ok(())
        }
    }
}

fn run_file(path: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path).map_err(CompileError::from)?;
    let filename = path.display().to_string();

    let mut interpreter = Interpreter::with_config(&config.interpreter);
    match interpreter.eval_source(&source) {
        Ok(value) => {
            if !value.is_none() {
                println!("{value}");
            }
            Ok(())
        }
        Err(EvalError::Compile(e)) if e.span().is_some() => {
            report_error(&filename, &source, &e)?;
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn eval_expr(expr: &str, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let value = Interpreter::with_config(&config.interpreter).eval_source(expr)?;
    if !value.is_none() {
        println!("{value}");
    }
    Ok(())
}

fn parse_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let ast = esolang::parser::parse_source(&filename, &source)?;
    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;

    let tokens = esolang::lexer::tokenize(&source)?;
    for (tok, span) in &tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }

    Ok(())
}
