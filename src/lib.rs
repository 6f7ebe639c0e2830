//! Purpose: Typed access to process environment variables with lenient defaults.
//! Exports: `api` (re-exported at the crate root) plus process-environment shortcuts.
//! Role: Library backing the `typenv` binary and embedding services.
//! Invariants: Reads never return errors; writes report store failures only.
//! Invariants: Core modules prefer an injected `Environment` over hidden global state.
//!
//! ```
//! use std::net::SocketAddr;
//! use typenv::{MemEnv, Vars};
//!
//! let vars = Vars::new(MemEnv::new());
//! vars.set_slice("PEERS", &["10.0.0.1:7000".parse::<SocketAddr>().unwrap()]).unwrap();
//! let peers: Vec<SocketAddr> = vars.get_slice_or("PEERS", Vec::new());
//! assert_eq!(peers.len(), 1);
//! assert!(!vars.get_or("VERBOSE", false));
//! ```
pub mod api;
mod core;

pub use api::*;
