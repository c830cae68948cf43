// Veles: front end driver, prints tokens or the parsed tree of one file

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use veles::parser::{Dialect, Program, Token};
use veles::FrontendError;

/// Tokenize and parse a Veles (.vs) or WAT (.wat) source file
#[derive(Parser, Debug)]
#[command(name = "veles", version, about)]
struct Cli {
    /// Source file to read
    file: PathBuf,

    /// What to print on success
    #[arg(long, value_enum, default_value_t = Emit::Ast)]
    emit: Emit,

    /// Dialect to use instead of sniffing the file extension
    #[arg(long, value_enum)]
    dialect: Option<DialectArg>,

    /// Log parser progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// One token per line
    Tokens,
    /// Canonical rendering of the tree
    Ast,
    /// The tree as pretty-printed JSON
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DialectArg {
    Vs,
    Wat,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Vs => Dialect::Vs,
            DialectArg::Wat => Dialect::Wat,
        }
    }
}

/// Everything that can stop the driver
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot pick a dialect for '{0}': expected a .vs or .wat file, or pass --dialect")]
    UnknownDialect(String),

    #[error("{0}")]
    Frontend(#[from] FrontendError),

    #[error("cannot serialize program: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let path = cli.file.display().to_string();

    let dialect = match cli.dialect {
        Some(arg) => Dialect::from(arg),
        None => Dialect::from_path(&cli.file).ok_or_else(|| CliError::UnknownDialect(path.clone()))?,
    };

    let source = fs::read_to_string(&cli.file).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    debug!(file = %path, %dialect, bytes = source.len(), "read source");

    let tokens = veles::tokenize(&source, dialect)?;
    if cli.emit == Emit::Tokens {
        return Ok(render_tokens(&tokens));
    }

    let program = veles::parse_file(&tokens, dialect, &path).map_err(FrontendError::from)?;

    match cli.emit {
        Emit::Json => render_json(&program),
        _ => Ok(program.to_string()),
    }
}

fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| format!("{} {}\n", token.location, token))
        .collect()
}

fn render_json(program: &Program) -> Result<String, CliError> {
    let mut json = serde_json::to_string_pretty(program)?;
    json.push('\n');
    Ok(json)
}
