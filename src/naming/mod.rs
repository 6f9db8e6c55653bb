//! Identifier allocation and resolution for emitted code

mod resolver;
mod symbols;

// Re-export all public symbols
pub use resolver::*;
pub use symbols::*;
