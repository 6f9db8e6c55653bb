//! Go signature fragments for a planned method

use crate::planning::{MethodPlan, Slot};

fn declaration(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(|slot| format!("{} {}", slot.local, slot.declared_type()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `a int, b int, d ...string`
pub(crate) fn parameters_declaration(method: &MethodPlan) -> String {
    declaration(&method.parameters)
}

/// `ident1 map[string]string, err error`
pub(crate) fn results_declaration(method: &MethodPlan) -> String {
    declaration(&method.results)
}

/// Named result list as it follows a parameter list, including the leading
/// space; empty when there are no results.
pub(crate) fn results_clause(method: &MethodPlan) -> String {
    if method.has_results() {
        format!(" ({})", results_declaration(method))
    } else {
        String::new()
    }
}

/// Result list for ResultsForCall, which always reports `found`.
pub(crate) fn results_found_clause(method: &MethodPlan) -> String {
    if method.has_results() {
        format!(" ({}, found bool)", results_declaration(method))
    } else {
        " (found bool)".to_string()
    }
}

/// Parameter types only: `int, int, int, ...string`
pub(crate) fn parameter_types(method: &MethodPlan) -> String {
    method
        .parameters
        .iter()
        .map(|slot| slot.declared_type())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Type of the hook field: `func(int, ...string) (int, error)`
pub(crate) fn hook_type(method: &MethodPlan) -> String {
    let results = match method
        .results
        .as_slice()
    {
        [] => String::new(),
        [single] => format!(" {}", single.type_name),
        many => format!(
            " ({})",
            many.iter()
                .map(|slot| slot
                    .type_name
                    .as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    format!("func({}){}", parameter_types(method), results)
}

/// Arguments passed on to the hook: `a, b, c, d...`
pub(crate) fn arguments(method: &MethodPlan) -> String {
    method
        .parameters
        .iter()
        .map(|slot| slot.forwarded())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Targets the hook's results are assigned to: `ident1, err`
pub(crate) fn results_reference(method: &MethodPlan) -> String {
    method
        .results
        .iter()
        .map(|slot| {
            slot.local
                .as_str()
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::plan;
    use crate::schema::{Interface, Method, Output, Parameter, Schema};

    fn planned(method: Method) -> MethodPlan {
        let schema = Schema::new("main").with_interface(Interface::new("Subject", vec![method]));
        let mut plan = plan(&schema).unwrap();
        plan.interfaces
            .remove(0)
            .methods
            .remove(0)
    }

    #[test]
    fn variadic_signatures() {
        let method = planned(Method::new(
            "MixedVariadic",
            vec![
                Parameter::new("a", "int"),
                Parameter::new("b", "int"),
                Parameter::new("c", "int"),
                Parameter::variadic("d", "string"),
            ],
            vec![],
        ));

        assert_eq!(
            parameters_declaration(&method),
            "a int, b int, c int, d ...string"
        );
        assert_eq!(hook_type(&method), "func(int, int, int, ...string)");
        assert_eq!(arguments(&method), "a, b, c, d...");
        assert_eq!(results_clause(&method), "");
        assert_eq!(results_found_clause(&method), " (found bool)");
    }

    #[test]
    fn result_signatures() {
        let method = planned(Method::new(
            "MapReturn",
            vec![],
            vec![Output::new("", "map[string]string")],
        ));

        assert_eq!(parameters_declaration(&method), "");
        assert_eq!(hook_type(&method), "func() map[string]string");
        assert_eq!(results_clause(&method), " (ident1 map[string]string)");
        assert_eq!(results_reference(&method), "ident1");

        let method = planned(Method::new(
            "Lookup",
            vec![Parameter::new("key", "string")],
            vec![Output::new("value", "int"), Output::new("err", "error")],
        ));

        assert_eq!(hook_type(&method), "func(string) (int, error)");
        assert_eq!(
            results_found_clause(&method),
            " (value int, err error, found bool)"
        );
        assert_eq!(results_reference(&method), "value, err");
    }
}
