//! Purpose: Define the stable public Rust API boundary for typenv.
//! Exports: Codec, store, and typed-access types plus process-environment shortcuts.
//! Role: Public, additive-only surface; hides internal module layout.
//! Invariants: This module is the only public path to core types.
//! Invariants: Shortcuts behave exactly like the same call on `Vars::system()`.

mod process;

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::codec::{EnvValue, KindVisitor, ValueKind, canonicalize, encode_list};
pub use crate::core::duration::{format_duration, parse_duration};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::net::{IpNet, IpPrefix, ParseNetError};
pub use crate::core::store::{Environment, MemEnv, SystemEnv};
pub use crate::core::vars::Vars;
pub use process::{get, get_or, get_slice, get_slice_or, is_set, lookup, set, set_slice, unset};
