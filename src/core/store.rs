//! Purpose: Abstract the raw environment store behind a small trait.
//! Exports: `Environment`, `SystemEnv`, `MemEnv`.
//! Role: The only place that touches `std::env`; typed access layers on top of it.
//! Invariants: Names and values are validated before any write reaches `std::env`.
//! Invariants: `MemEnv` never reads or mutates the process environment.
//! Notes: Non-UTF-8 process values are read lossily.
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::core::error::{Error, ErrorKind};

/// Raw string store keyed by variable name.
///
/// Does **not** require `Send + Sync`; add the bounds at the call site when needed.
pub trait Environment {
    /// `None` when the variable is not set.
    fn lookup(&self, name: &str) -> Option<String>;

    fn set(&self, name: &str, value: &str) -> Result<(), Error>;

    fn unset(&self, name: &str) -> Result<(), Error>;
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }

    fn set(&self, name: &str, value: &str) -> Result<(), Error> {
        (**self).set(name, value)
    }

    fn unset(&self, name: &str) -> Result<(), Error> {
        (**self).unset(name)
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), Error> {
    let problem = if name.is_empty() {
        "variable name is empty"
    } else if name.contains('=') {
        "variable name contains '='"
    } else if name.contains('\0') {
        "variable name contains a NUL byte"
    } else {
        return Ok(());
    };
    Err(Error::new(ErrorKind::InvalidName)
        .with_message(problem)
        .with_name(name))
}

pub(crate) fn validate_value(name: &str, value: &str) -> Result<(), Error> {
    if value.contains('\0') {
        return Err(Error::new(ErrorKind::InvalidValue)
            .with_message("variable value contains a NUL byte")
            .with_name(name));
    }
    Ok(())
}

/// Zero-sized handle on the process environment.
///
/// # Thread Safety
///
/// Writes go through `std::env::set_var`/`remove_var`. Do not call
/// [`Environment::set`] or [`Environment::unset`] while other threads may
/// be reading the environment (including through libc).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    #[inline]
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }

    fn set(&self, name: &str, value: &str) -> Result<(), Error> {
        validate_name(name)?;
        validate_value(name, value)?;
        // SAFETY: name and value were validated above so std does not panic;
        // data races with concurrent readers are the caller's contract (see type docs).
        unsafe { std::env::set_var(name, value) };
        tracing::trace!(name, "set environment variable");
        Ok(())
    }

    fn unset(&self, name: &str) -> Result<(), Error> {
        validate_name(name)?;
        // SAFETY: as in `set`.
        unsafe { std::env::remove_var(name) };
        tracing::trace!(name, "unset environment variable");
        Ok(())
    }
}

/// Won't touch the global process environment.
///
/// Uses `RefCell` for interior mutability so all methods take `&self`.
/// Applies the same name/value validation as [`SystemEnv`].
#[derive(Debug, Default)]
pub struct MemEnv {
    vars: RefCell<BTreeMap<String, String>>,
}

impl MemEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.borrow().contains_key(name)
    }

    pub fn clear(&self) {
        self.vars.borrow_mut().clear();
    }

    /// Copy of the current contents, ordered by name.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.vars.borrow().clone()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self {
            vars: RefCell::new(vars),
        }
    }
}

impl Environment for MemEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars.borrow().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) -> Result<(), Error> {
        validate_name(name)?;
        validate_value(name, value)?;
        self.vars
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn unset(&self, name: &str) -> Result<(), Error> {
        validate_name(name)?;
        self.vars.borrow_mut().remove(name);
        Ok(())
    }
}
