//! Names for the parameters and results of a method in emitted code

use std::collections::HashSet;

use super::symbols::SYMBOL_PREFIX;
use crate::schema::Method;

/// Identifiers the emitted method bodies rely on, including the predeclared
/// types they declare locals with. A parameter or result must never shadow
/// one of them.
pub const RESERVED: &[&str] = &[
    "append",
    "bool",
    "call",
    "count",
    "f",
    "false",
    "found",
    "int",
    "invocation",
    "len",
    "n",
    "new",
    "nil",
    "panic",
    "reflect",
    "t",
    "true",
];

/// The two spellings of one parameter or result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Naming {
    /// Identifier used in emitted signatures and bodies.
    pub local: String,
    /// Field identifier within the Parameters or Results group.
    pub field: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Names {
    pub parameters: Vec<Naming>,
    pub results: Vec<Naming>,
}

/// Assign every parameter and result of a method a local name and a field
/// name. `invocation` is the name of the method's invocation type, which
/// the wrapper body refers to and so must not be shadowed either.
///
/// Local names are unique across parameters and results together, since
/// they share one scope. Field names are unique within each group.
pub fn resolve(method: &Method, invocation: &str) -> Names {
    let declared = method
        .parameters
        .iter()
        .map(|parameter| parameter.name.as_str())
        .chain(
            method
                .results
                .iter()
                .map(|result| result.name.as_str()),
        );

    let mut locals: HashSet<String> = HashSet::new();
    let mut slots = Vec::new();

    for (i, name) in declared.enumerate() {
        let slot = i + 1;
        let base = base_name(name, slot);

        let candidate = if base.starts_with(SYMBOL_PREFIX) {
            format!("arg{}", base)
        } else {
            base.clone()
        };

        let local = disambiguate(&candidate, slot, |candidate| {
            RESERVED.contains(&candidate) || candidate == invocation || locals.contains(candidate)
        });
        locals.insert(local.clone());

        slots.push((base, local));
    }

    let results = slots.split_off(
        method
            .parameters
            .len(),
    );

    Names {
        parameters: fields(slots),
        results: fields(results),
    }
}

fn fields(slots: Vec<(String, String)>) -> Vec<Naming> {
    let mut taken: HashSet<String> = HashSet::new();

    slots
        .into_iter()
        .enumerate()
        .map(|(i, (base, local))| {
            let field = disambiguate(&capitalize(&base), i + 1, |candidate| {
                taken.contains(candidate)
            });
            taken.insert(field.clone());
            Naming { local, field }
        })
        .collect()
}

// Unnamed and blank parameters are addressed by their slot, counting
// parameters first and then results.
fn base_name(declared: &str, slot: usize) -> String {
    if declared.is_empty() || declared == "_" {
        format!("ident{}", slot)
    } else {
        declared.to_string()
    }
}

/// Return `base` if it is free, else `base` suffixed with its position, else
/// that with `_1`, `_2`, ... until something is free.
pub fn disambiguate(base: &str, position: usize, clashes: impl Fn(&str) -> bool) -> String {
    if !clashes(base) {
        return base.to_string();
    }

    let suffixed = format!("{}{}", base, position);
    if !clashes(&suffixed) {
        return suffixed;
    }

    let mut j = 1;
    loop {
        let candidate = format!("{}_{}", suffixed, j);
        if !clashes(&candidate) {
            return candidate;
        }
        j += 1;
    }
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars)
            .collect(),
        None => String::new(),
    }
}
