//! Interface schemas, as produced by an extractor and consumed by the planner

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::error::GenerationError;

mod error;
mod types;

pub use error::LoadingError;
pub use types::*;

/// Read the schema file named on the command line. The text is returned
/// unparsed so the caller owns it while parse() borrows the filename for
/// its errors.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    std::fs::read_to_string(filename).map_err(|error| {
        debug!(?error);
        let (problem, details) = match error.kind() {
            ErrorKind::NotFound => ("File not found", String::new()),
            kind => ("Failed reading", kind.to_string()),
        };
        LoadingError {
            problem: problem.to_string(),
            details,
            filename,
        }
    })
}

/// Deserialize JSON text into a Schema. Structural checks happen later, in
/// validate().
pub fn parse<'i>(filename: &'i Path, content: &str) -> Result<Schema, LoadingError<'i>> {
    match serde_json::from_str::<Schema>(content) {
        Ok(schema) => {
            debug!(
                "Found {} interface{}",
                schema
                    .interfaces
                    .len(),
                if schema
                    .interfaces
                    .len()
                    == 1
                {
                    ""
                } else {
                    "s"
                }
            );
            Ok(schema)
        }
        Err(error) => Err(LoadingError {
            problem: "Malformed schema".to_string(),
            // serde_json reports the line and column as part of the message
            details: error.to_string(),
            filename,
        }),
    }
}

/// Check that the schema is complete enough to render. The first problem
/// found aborts the run.
pub fn validate(schema: &Schema) -> Result<(), GenerationError> {
    if !is_identifier(&schema.package_name) {
        return Err(GenerationError::schema(format!(
            "package name {:?} is not an identifier",
            schema.package_name
        )));
    }

    for import in &schema.imports {
        if import
            .path
            .is_empty()
        {
            return Err(GenerationError::schema("import with empty path"));
        }
        if let Some(alias) = &import.alias {
            if !(alias == "." || alias == "_" || is_identifier(alias)) {
                return Err(GenerationError::schema(format!(
                    "import alias {:?} for {:?} is not an identifier",
                    alias, import.path
                )));
            }
        }
    }

    let mut interfaces = HashSet::new();
    for interface in &schema.interfaces {
        if !is_identifier(&interface.name) {
            return Err(GenerationError::schema(format!(
                "interface name {:?} is not an identifier",
                interface.name
            )));
        }
        if !interfaces.insert(interface.name.as_str()) {
            return Err(GenerationError::in_interface(
                &interface.name,
                "interface declared more than once",
            ));
        }
        validate_interface(interface)?;
    }

    Ok(())
}

fn validate_interface(interface: &Interface) -> Result<(), GenerationError> {
    let mut methods = HashSet::new();

    for method in &interface.methods {
        if !is_identifier(&method.name) {
            return Err(GenerationError::in_interface(
                &interface.name,
                format!("method name {:?} is not an identifier", method.name),
            ));
        }
        if !methods.insert(method.name.as_str()) {
            return Err(GenerationError::in_method(
                &interface.name,
                &method.name,
                "method declared more than once",
            ));
        }
        validate_method(&interface.name, method)?;
    }

    Ok(())
}

fn validate_method(interface: &str, method: &Method) -> Result<(), GenerationError> {
    let fail = |problem: String| GenerationError::in_method(interface, &method.name, problem);

    // Declared names must already be distinct; the blank identifier may
    // repeat.
    let mut declared = HashSet::new();
    let count = method
        .parameters
        .len();

    for (i, parameter) in method
        .parameters
        .iter()
        .enumerate()
    {
        if parameter
            .type_name
            .trim()
            .is_empty()
        {
            return Err(fail(format!("parameter {} has no type", i + 1)));
        }
        if parameter.variadic && i + 1 != count {
            return Err(fail(format!(
                "parameter {} is variadic but is not the last parameter",
                i + 1
            )));
        }
        check_declared_name(&parameter.name, &mut declared)
            .map_err(|problem| fail(format!("parameter {}: {}", i + 1, problem)))?;
    }

    for (i, result) in method
        .results
        .iter()
        .enumerate()
    {
        if result
            .type_name
            .trim()
            .is_empty()
        {
            return Err(fail(format!("result {} has no type", i + 1)));
        }
        check_declared_name(&result.name, &mut declared)
            .map_err(|problem| fail(format!("result {}: {}", i + 1, problem)))?;
    }

    // Go requires results to be either all named or all unnamed.
    let named = method
        .results
        .iter()
        .filter(|result| {
            !result
                .name
                .is_empty()
        })
        .count();
    if named != 0 && named != method.results.len() {
        return Err(fail(
            "results must be either all named or all unnamed".to_string(),
        ));
    }

    Ok(())
}

fn check_declared_name<'a>(name: &'a str, declared: &mut HashSet<&'a str>) -> Result<(), String> {
    if name.is_empty() || name == "_" {
        return Ok(());
    }
    if is_keyword(name) {
        return Err(format!("name {:?} is a keyword", name));
    }
    if !is_identifier(name) {
        return Err(format!("name {:?} is not an identifier", name));
    }
    if !declared.insert(name) {
        return Err(format!("name {:?} declared more than once", name));
    }
    Ok(())
}

static KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Letters, digits, and underscores, not starting with a digit and not a
/// keyword.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric()) && !is_keyword(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variadic() -> Schema {
        Schema::new("main").with_interface(Interface::new(
            "Variadic",
            vec![
                Method::new(
                    "SingleVariadic",
                    vec![Parameter::variadic("a", "string")],
                    vec![],
                ),
                Method::new(
                    "MixedVariadic",
                    vec![
                        Parameter::new("a", "int"),
                        Parameter::new("b", "int"),
                        Parameter::new("c", "int"),
                        Parameter::variadic("d", "string"),
                    ],
                    vec![],
                ),
            ],
        ))
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("a"));
        assert!(is_identifier("_"));
        assert!(is_identifier("ident1"));
        assert!(is_identifier("Größe"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier("range"));
        assert!(!is_identifier("func"));
        assert!(is_identifier("Range"));
    }

    #[test]
    fn keywords_rejected() {
        let schema = Schema::new("main").with_interface(Interface::new(
            "Kw",
            vec![Method::new(
                "Run",
                vec![Parameter::new("range", "int")],
                vec![Output::new("func", "error")],
            )],
        ));
        assert_eq!(
            validate(&schema),
            Err(GenerationError::in_method(
                "Kw",
                "Run",
                "parameter 1: name \"range\" is a keyword"
            ))
        );

        let schema = Schema::new("main").with_interface(Interface::new(
            "Kw",
            vec![Method::new("Run", vec![], vec![Output::new("func", "error")])],
        ));
        assert_eq!(
            validate(&schema),
            Err(GenerationError::in_method(
                "Kw",
                "Run",
                "result 1: name \"func\" is a keyword"
            ))
        );

        let schema = Schema::new("type");
        assert!(validate(&schema).is_err());

        let schema = Schema::new("main").with_interface(Interface::new(
            "Kw",
            vec![Method::new("select", vec![], vec![])],
        ));
        assert!(validate(&schema).is_err());
    }

    #[test]
    fn parsing_json() {
        let content = r#"
{
    "CommandLine": "impostor Variadic",
    "PackageName": "main",
    "Imports": [ { "Path": "net/http" }, { "Path": "io", "Alias": "stdio" } ],
    "Interfaces": [
        {
            "Name": "Variadic",
            "Methods": [
                {
                    "Name": "SingleVariadic",
                    "Parameters": [ { "Name": "a", "Type": "string", "Variadic": true } ]
                }
            ]
        }
    ]
}
        "#;

        let schema = parse(Path::new("variadic.json"), content).unwrap();

        assert_eq!(schema.command_line, "impostor Variadic");
        assert_eq!(
            schema.imports,
            vec![Import::new("net/http"), Import::aliased("io", "stdio")]
        );
        let method = &schema.interfaces[0].methods[0];
        assert_eq!(method.parameters, vec![Parameter::variadic("a", "string")]);
        assert!(method.results.is_empty());
        assert!(method.has_trailing_variadic());
    }

    #[test]
    fn parsing_malformed_json() {
        let result = parse(Path::new("broken.json"), "{ \"PackageName\": ");
        let error = result.unwrap_err();
        assert_eq!(error.problem, "Malformed schema");
        assert_eq!(error.filename, Path::new("broken.json"));
    }

    #[test]
    fn loading_missing_file() {
        let error = load(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert_eq!(error.problem, "File not found");
    }

    #[test]
    fn valid_schema_passes() {
        assert_eq!(validate(&variadic()), Ok(()));
    }

    #[test]
    fn variadic_must_be_last() {
        let schema = Schema::new("main").with_interface(Interface::new(
            "Broken",
            vec![Method::new(
                "Early",
                vec![
                    Parameter::variadic("a", "string"),
                    Parameter::new("b", "int"),
                ],
                vec![],
            )],
        ));

        let error = validate(&schema).unwrap_err();
        assert_eq!(
            error,
            GenerationError::in_method(
                "Broken",
                "Early",
                "parameter 1 is variadic but is not the last parameter"
            )
        );
    }

    #[test]
    fn empty_names_and_types_rejected() {
        let schema = Schema::new("main").with_interface(Interface::new(
            "Broken",
            vec![Method::new("", vec![], vec![])],
        ));
        assert!(matches!(
            validate(&schema),
            Err(GenerationError::Schema { .. })
        ));

        let schema = Schema::new("main").with_interface(Interface::new(
            "Broken",
            vec![Method::new("Typeless", vec![Parameter::new("a", " ")], vec![])],
        ));
        assert_eq!(
            validate(&schema),
            Err(GenerationError::in_method(
                "Broken",
                "Typeless",
                "parameter 1 has no type"
            ))
        );

        let schema = Schema::new("");
        assert!(validate(&schema).is_err());
    }

    #[test]
    fn duplicates_rejected() {
        let schema = variadic().with_interface(Interface::new("Variadic", vec![]));
        assert_eq!(
            validate(&schema),
            Err(GenerationError::in_interface(
                "Variadic",
                "interface declared more than once"
            ))
        );

        let schema = Schema::new("main").with_interface(Interface::new(
            "Twice",
            vec![
                Method::new("Run", vec![], vec![]),
                Method::new("Run", vec![], vec![]),
            ],
        ));
        assert!(validate(&schema).is_err());

        let schema = Schema::new("main").with_interface(Interface::new(
            "Twice",
            vec![Method::new(
                "Run",
                vec![Parameter::new("a", "int")],
                vec![Output::new("a", "int")],
            )],
        ));
        assert_eq!(
            validate(&schema),
            Err(GenerationError::in_method(
                "Twice",
                "Run",
                "result 1: name \"a\" declared more than once"
            ))
        );
    }

    #[test]
    fn blank_names_may_repeat() {
        let schema = Schema::new("main").with_interface(Interface::new(
            "Blank",
            vec![Method::new(
                "Run",
                vec![Parameter::new("_", "int"), Parameter::new("_", "int")],
                vec![],
            )],
        ));
        assert_eq!(validate(&schema), Ok(()));
    }

    #[test]
    fn mixed_result_naming_rejected() {
        let schema = Schema::new("main").with_interface(Interface::new(
            "Mixed",
            vec![Method::new(
                "Run",
                vec![],
                vec![Output::new("n", "int"), Output::new("", "error")],
            )],
        ));
        assert!(validate(&schema).is_err());
    }
}
