//! Purpose: Hold top-level CLI command dispatch for `typenv`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: `get` reads through `Vars::system()` so it matches library semantics exactly.
//! Invariants: `--strict` failures name the variable and kind, never the raw value.

use super::*;
use std::io::Write;
use typenv::{EnvValue, Environment, KindVisitor, SystemEnv, Vars, canonicalize};

pub(super) fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            io::stdout()
                .write_all(&completion_script(shell))
                .map_err(|err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write completion script")
                        .with_source(err)
                })?;
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_json(json!({
                "name": "typenv",
                "version": env!("CARGO_PKG_VERSION"),
            }));
            Ok(RunOutcome::ok())
        }
        Command::Kinds => {
            emit_json(var_json::kinds_json());
            Ok(RunOutcome::ok())
        }
        Command::Get {
            name,
            kind,
            default,
            list,
            strict,
        } => {
            let vars = Vars::system();
            if strict {
                check_strict(vars.env(), &name, kind, list)?;
            }
            let value = kind.visit(ReadVar {
                vars: &vars,
                name: &name,
                default: default.as_deref(),
                list,
            })?;
            emit_json(var_json::var_json(&name, kind, vars.is_set(&name), value));
            Ok(RunOutcome::ok())
        }
    }
}

struct ReadVar<'a> {
    vars: &'a Vars<SystemEnv>,
    name: &'a str,
    default: Option<&'a str>,
    list: bool,
}

impl KindVisitor for ReadVar<'_> {
    type Output = Result<Value, Error>;

    fn visit<T: EnvValue>(self) -> Result<Value, Error> {
        if self.list {
            let values: Vec<T> = match self.default {
                Some(raw) => self.vars.get_slice_or(self.name, parse_default_list(raw)?),
                None => self.vars.get_slice(self.name),
            };
            let encoded = values.iter().map(EnvValue::encode).collect::<Vec<_>>();
            return Ok(json!(encoded));
        }
        let value: T = match self.default {
            Some(raw) => self.vars.get_or(self.name, parse_default(raw)?),
            None => self.vars.get(self.name),
        };
        Ok(json!(value.encode()))
    }
}

fn parse_default<T: EnvValue>(raw: &str) -> Result<T, Error> {
    T::parse_raw(raw.trim()).ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("--default does not parse as {}", T::KIND))
            .with_hint(format!(
                "Pass a value in {}'s canonical form, e.g. `{}`.",
                T::KIND,
                T::zero().encode()
            ))
    })
}

fn parse_default_list<T: EnvValue>(raw: &str) -> Result<Vec<T>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_default::<T>)
        .collect()
}

fn check_strict(env: &SystemEnv, name: &str, kind: ValueKind, list: bool) -> Result<(), Error> {
    let Some(raw) = env.lookup(name) else {
        return Ok(());
    };
    let valid = if list {
        raw.split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .all(|segment| canonicalize(kind, segment).is_some())
    } else {
        canonicalize(kind, &raw).is_some()
    };
    if valid {
        return Ok(());
    }
    Err(Error::new(ErrorKind::InvalidValue)
        .with_message(format!("value does not parse as {kind}"))
        .with_hint("Fix the variable, or drop --strict to fall back to the default.")
        .with_name(name))
}
