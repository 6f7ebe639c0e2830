// Core modules implementing the typed codec, the store seam, and typed access.
pub mod codec;
pub mod duration;
pub mod error;
pub mod net;
pub mod store;
pub mod vars;
