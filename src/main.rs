use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use constraint_lang::cli::{self, CheckOptions, CliError, FileOptions};
use serde::Serialize;
use std::io::{self, Read};
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(name = "constraint")]
#[command(about = "Constraint - evaluate declarative constraint expressions against JSON records")]
#[command(version)]
struct Cli {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression against a JSON record (exit status 2 if it fails)
    Check {
        /// The constraint expression to evaluate
        expression: String,

        /// JSON record (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Frozen ISO-8601 instant returned by now()
        #[arg(long, value_name = "ISO-8601")]
        timestamp: Option<String>,
    },

    /// Validate expression syntax without evaluating it
    Validate {
        /// The constraint expression to validate
        expression: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Check a constraint file, and evaluate it when a record is given
    File {
        /// Path to the constraint file
        path: String,

        /// JSON record (reads from stdin if not provided and stdin is piped)
        #[arg(short, long)]
        input: Option<String>,

        /// Frozen ISO-8601 instant returned by now()
        #[arg(long, value_name = "ISO-8601")]
        timestamp: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List builtin functions
    Builtins,

    /// Show documentation for a specific builtin
    Builtin {
        /// Builtin name (use 'constraint builtins' to list them)
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let result = match cli.command {
        Commands::Check {
            expression,
            input,
            timestamp,
        } => run_check(expression, input, timestamp),
        Commands::Validate { expression, pretty } => {
            let result = cli::execute_validate(&expression);
            print_json(&result, pretty).map(|()| result.valid)
        }
        Commands::File {
            path,
            input,
            timestamp,
            pretty,
        } => run_file(path, input, timestamp, pretty),
        Commands::Builtins => {
            print!("{}", cli::builtins_overview());
            Ok(true)
        }
        Commands::Builtin { name } => cli::builtin_doc(&name).map(|doc| {
            print!("{}", doc);
            true
        }),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

fn read_stdin() -> Result<Option<String>, CliError> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_check(
    expression: String,
    input: Option<String>,
    timestamp: Option<String>,
) -> Result<bool, CliError> {
    let input = match input {
        Some(s) => Some(s),
        None => read_stdin()?,
    };

    let options = CheckOptions {
        expression,
        input,
        timestamp,
    };

    let passed = cli::execute_check(&options)?;
    println!("{}", passed);
    Ok(passed)
}

fn run_file(
    path: String,
    input: Option<String>,
    timestamp: Option<String>,
    pretty: bool,
) -> Result<bool, CliError> {
    let input = match input {
        Some(s) => Some(s),
        None => read_stdin()?,
    };

    let options = FileOptions {
        path,
        input,
        timestamp,
    };

    let report = cli::execute_file(&options)?;
    print_json(&report, pretty)?;
    Ok(report.passed())
}
