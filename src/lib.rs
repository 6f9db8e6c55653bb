//! Generate call-recording fakes of Go interfaces.
//!
//! A [`schema::Schema`] describes the interfaces; [`planning::plan`]
//! resolves every name the output will use; [`emitting::render`] writes the
//! Go source; a [`canonical::Canonicalize`] implementation formats and
//! checks it. [`generate`] runs all of these in turn.

pub mod canonical;
pub mod error;
pub mod emitting;
pub mod naming;
pub mod planning;
pub mod schema;

pub use emitting::{generate, render};
pub use error::GenerationError;
