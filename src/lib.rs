//! Prime Drop (workspace facade crate).
//!
//! Re-exports the member crates under one roof as
//! `prime_drop::{core,engine,input,term,types}`; the implementation lives in
//! dedicated crates under `crates/`.

pub use prime_drop_core as core;
pub use prime_drop_engine as engine;
pub use prime_drop_input as input;
pub use prime_drop_term as term;
pub use prime_drop_types as types;
