//! Fresh local identifiers for emitted code

/// Prefix of every allocated symbol. Schema-derived names never start with
/// it; the resolver rewrites any that do.
pub const SYMBOL_PREFIX: &str = "_f";

/// Allocates `_f1`, `_f2`, ... in order. One instance lives for exactly one
/// generation run; it is never shared between runs.
#[derive(Debug)]
pub struct Symbols {
    prefix: &'static str,
    counter: usize,
}

impl Symbols {
    pub fn new() -> Symbols {
        Symbols {
            prefix: SYMBOL_PREFIX,
            counter: 0,
        }
    }

    /// Return a symbol distinct from every one returned before in this run.
    pub fn gensym(&mut self) -> String {
        self.counter += 1;
        format!("{}{}", self.prefix, self.counter)
    }

    /// How many symbols have been handed out so far.
    pub fn allocated(&self) -> usize {
        self.counter
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Symbols::new()
    }
}
