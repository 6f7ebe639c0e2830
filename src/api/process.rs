//! Purpose: Free-function shortcuts over the process environment.
//! Exports: `get`, `get_or`, `lookup`, `is_set`, `set`, `unset`, `get_slice`, `get_slice_or`, `set_slice`.
//! Role: Convenience for callers that do not inject an `Environment`.
//! Invariants: Each function delegates to `Vars::system()` with no extra behavior.
//! Notes: Writes share `SystemEnv`'s thread-safety contract.

use crate::core::codec::EnvValue;
use crate::core::error::Error;
use crate::core::vars::Vars;

/// Decoded value of `name`, or the zero value when unset or unparsable.
///
/// ```
/// let workers: usize = typenv::get("TYPENV_DOC_WORKERS_UNSET");
/// assert_eq!(workers, 0);
/// ```
pub fn get<T: EnvValue>(name: &str) -> T {
    Vars::system().get(name)
}

pub fn get_or<T: EnvValue>(name: &str, default: T) -> T {
    Vars::system().get_or(name, default)
}

pub fn lookup<T: EnvValue>(name: &str) -> Option<T> {
    Vars::system().lookup(name)
}

pub fn is_set(name: &str) -> bool {
    Vars::system().is_set(name)
}

pub fn set<T: EnvValue>(name: &str, value: T) -> Result<(), Error> {
    Vars::system().set(name, value)
}

pub fn unset(name: &str) -> Result<(), Error> {
    Vars::system().unset(name)
}

pub fn get_slice<T: EnvValue>(name: &str) -> Vec<T> {
    Vars::system().get_slice(name)
}

pub fn get_slice_or<T: EnvValue>(name: &str, default: Vec<T>) -> Vec<T> {
    Vars::system().get_slice_or(name, default)
}

pub fn set_slice<T: EnvValue>(name: &str, values: &[T]) -> Result<(), Error> {
    Vars::system().set_slice(name, values)
}
