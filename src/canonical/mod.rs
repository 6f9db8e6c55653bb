//! Post-processing of emitted source: re-indenting and syntax checking

mod gofmt;

pub use gofmt::Gofmt;

/// Trait for the different ways emitted text can be brought into canonical
/// form. An error carries a description of why the text was rejected.
pub trait Canonicalize {
    fn canonicalize(&self, text: &str) -> Result<String, String>;
}

/// Returns text unchanged, with no checking
pub struct Identity;

impl Canonicalize for Identity {
    fn canonicalize(&self, text: &str) -> Result<String, String> {
        Ok(text.to_string())
    }
}
