//! Purpose: `typenv` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit stable JSON envelopes on stdout (pretty on a terminal).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `typenv::to_exit_code`.
//! Invariants: Raw variable values never appear in errors or logs.
use std::io::{self, IsTerminal};

use clap::{CommandFactory, Parser, Subcommand, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;
use typenv::{Error, ErrorKind, ValueKind, to_exit_code};

mod command_dispatch;
mod var_json;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome { exit_code });
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `typenv --help` or `typenv <command> --help`."));
            }
        },
    };

    command_dispatch::dispatch_command(cli.command)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "typenv",
    version,
    about = "Decode environment variables by type",
    long_about = None,
    after_help = r#"EXAMPLES
  $ typenv get PORT --kind u16
  $ typenv get TIMEOUT --kind duration --default 30s
  $ typenv get PEERS --kind socket-addr --list --strict
  $ typenv kinds

Set RUST_LOG=debug to log variables that fail to parse."#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Decode one variable and print its canonical form",
        long_about = r#"Decode one variable from this process's environment.

Unset or unparsable values fall back to --default, else to the kind's zero value.
With --list the value is split on commas; blank segments are dropped when
--default is given, kept as zero values otherwise."#,
        after_help = r#"EXAMPLES
  $ ENABLED=yes typenv get ENABLED --kind bool
  {"kind":"bool","name":"ENABLED","present":true,"value":"true"}
  $ typenv get RETRY_DELAY --kind duration --default 250ms
  $ NETS=10.0.0.0/8,192.168.1.9/24 typenv get NETS --kind ip-prefix --list"#
    )]
    Get {
        #[arg(help = "Variable name")]
        name: String,
        #[arg(long, value_parser = parse_value_kind, help = "Value kind (see `typenv kinds`)")]
        kind: ValueKind,
        #[arg(long, help = "Fallback raw value (comma-separated with --list)")]
        default: Option<String>,
        #[arg(long, help = "Treat the value as a comma-separated list")]
        list: bool,
        #[arg(long, help = "Fail when the variable is set but does not parse")]
        strict: bool,
    },
    #[command(about = "List supported value kinds and their zero values")]
    Kinds,
    #[command(about = "Print version info as JSON")]
    Version,
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        after_help = r#"EXAMPLES
  $ typenv completion bash > ~/.local/share/bash-completion/completions/typenv
  $ typenv completion zsh > ~/.zfunc/_typenv
  $ typenv completion fish > ~/.config/fish/completions/typenv.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn parse_value_kind(value: &str) -> Result<ValueKind, String> {
    value.parse::<ValueKind>().map_err(|err| {
        let known = ValueKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} (expected one of: {known})", err.message().unwrap_or("unknown kind"))
    })
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .next()
        .map(|line| line.trim_start_matches("error: ").to_string())
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::InvalidName => "invalid variable name".to_string(),
        ErrorKind::InvalidValue => "invalid variable value".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(name) = err.name() {
        inner.insert("name".to_string(), json!(name));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(name) = err.name() {
        lines.push(format!("name: {name}"));
    }
    for cause in error_causes(err) {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

fn completion_script(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut out = Vec::new();
    clap_complete::aot::generate(shell, &mut cmd, "typenv", &mut out);
    out
}
