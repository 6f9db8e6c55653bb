//! Decide the shape of every fake before any text is emitted

use std::collections::HashSet;
use tracing::debug;

use crate::error::GenerationError;
use crate::naming::{self, Naming, Symbols, RESERVED, SYMBOL_PREFIX};
use crate::schema::{self, Import, Interface, Method, Schema};

mod types;

pub use types::*;

/// Validate a schema and resolve every name the emitter will need. Symbols
/// are allocated from a fresh counter, so repeated runs over the same schema
/// give identical plans.
pub fn plan(schema: &Schema) -> Result<Plan, GenerationError> {
    schema::validate(schema)?;

    let mut symbols = Symbols::new();
    let mut interfaces = Vec::new();

    for interface in &schema.interfaces {
        let planned = plan_interface(interface, &mut symbols);
        debug!(
            "Planned Fake{} with {} method{}",
            interface.name,
            planned
                .methods
                .len(),
            if planned
                .methods
                .len()
                == 1
            {
                ""
            } else {
                "s"
            }
        );
        interfaces.push(planned);
    }

    check_top_level(&interfaces)?;
    for interface in &interfaces {
        check_members(interface)?;
    }

    let imports = plan_imports(schema, &interfaces)?;

    let plan = Plan {
        command_line: schema
            .command_line
            .clone(),
        package_name: schema
            .package_name
            .clone(),
        imports,
        interfaces,
    };

    verify(&plan)?;

    debug!("Allocated {} symbols", symbols.allocated());
    Ok(plan)
}

fn plan_interface(interface: &Interface, symbols: &mut Symbols) -> InterfacePlan {
    let methods = interface
        .methods
        .iter()
        .map(|method| plan_method(&interface.name, method, symbols))
        .collect();

    InterfacePlan {
        name: interface
            .name
            .clone(),
        fake: format!("Fake{}", interface.name),
        testing: format!("{}TestingT", interface.name),
        methods,
    }
}

fn plan_method(interface: &str, method: &Method, symbols: &mut Symbols) -> MethodPlan {
    let invocation = format!("{}{}Invocation", interface, method.name);
    let names = naming::resolve(method, &invocation);

    let parameters: Vec<Slot> = method
        .parameters
        .iter()
        .zip(names.parameters)
        .map(|(parameter, Naming { local, field })| Slot {
            local,
            field,
            type_name: parameter
                .type_name
                .clone(),
            variadic: parameter.variadic,
        })
        .collect();

    let results: Vec<Slot> = method
        .results
        .iter()
        .zip(names.results)
        .map(|(result, Naming { local, field })| Slot {
            local,
            field,
            type_name: result
                .type_name
                .clone(),
            variadic: false,
        })
        .collect();

    // A variadic parameter is compared as the whole slice it was called
    // with, so length and order both matter.
    let matching = parameters
        .iter()
        .map(|slot| {
            format!(
                "reflect.DeepEqual(call.Parameters.{}, {})",
                slot.field, slot.local
            )
        })
        .collect();

    // Allocation order follows emission order.
    let wrapper = symbols.gensym();
    let queries = if parameters.is_empty() {
        None
    } else {
        Some(QueryReceivers {
            called_with: symbols.gensym(),
            assert_called_with: symbols.gensym(),
            called_once_with: symbols.gensym(),
            assert_called_once_with: symbols.gensym(),
            results_for_call: symbols.gensym(),
            assert_results_for_call: symbols.gensym(),
        })
    };

    MethodPlan {
        interface: interface.to_string(),
        name: method
            .name
            .clone(),
        invocation,
        parameters,
        results,
        matching,
        receivers: Receivers { wrapper, queries },
    }
}

/// Names of every field and method the fake type for one method carries.
pub fn members(method: &MethodPlan) -> Vec<String> {
    let name = &method.name;
    let mut members = vec![
        method.hook(),
        method.calls(),
        name.clone(),
        format!("{}Called", name),
        format!("Assert{}Called", name),
        format!("{}NotCalled", name),
        format!("Assert{}NotCalled", name),
        format!("{}CalledOnce", name),
        format!("Assert{}CalledOnce", name),
        format!("{}CalledN", name),
        format!("Assert{}CalledN", name),
    ];
    if method.has_parameters() {
        members.extend([
            format!("{}CalledWith", name),
            format!("Assert{}CalledWith", name),
            format!("{}CalledOnceWith", name),
            format!("Assert{}CalledOnceWith", name),
            format!("{}ResultsForCall", name),
            format!("Assert{}ResultsForCall", name),
        ]);
    }
    members
}

// Two methods of one interface can produce the same member name, as with
// `Run` and `RunCalled`, and every method collides with `Reset`.
fn check_members(interface: &InterfacePlan) -> Result<(), GenerationError> {
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert("Reset".to_string());

    for method in &interface.methods {
        for member in members(method) {
            if !seen.insert(member.clone()) {
                return Err(GenerationError::in_method(
                    &interface.name,
                    &method.name,
                    format!(
                        "generated member {}.{} clashes with another generated member",
                        interface.fake, member
                    ),
                ));
            }
        }
    }

    Ok(())
}

// Package level type and function names must be distinct across the whole
// file. Interface `A` with method `BC` and interface `AB` with method `C`
// both want `ABCInvocation`.
fn check_top_level(interfaces: &[InterfacePlan]) -> Result<(), GenerationError> {
    let mut seen: HashSet<String> = HashSet::new();

    for interface in interfaces {
        let mut names = vec![interface.fake.clone(), interface.testing.clone()];
        names.extend(
            Behaviour::ALL
                .iter()
                .map(|behaviour| interface.constructor(*behaviour)),
        );

        for name in names {
            if !seen.insert(name.clone()) {
                return Err(GenerationError::in_interface(
                    &interface.name,
                    format!("generated name {} clashes with another generated name", name),
                ));
            }
        }

        for method in &interface.methods {
            if !seen.insert(method.invocation.clone()) {
                return Err(GenerationError::in_method(
                    &interface.name,
                    &method.name,
                    format!(
                        "generated name {} clashes with another generated name",
                        method.invocation
                    ),
                ));
            }
        }
    }

    Ok(())
}

fn plan_imports(
    schema: &Schema,
    interfaces: &[InterfacePlan],
) -> Result<Vec<Import>, GenerationError> {
    let matching = interfaces
        .iter()
        .flat_map(|interface| &interface.methods)
        .any(|method| method.has_parameters());

    let mut imports = Vec::new();
    if !matching {
        imports.extend(
            schema
                .imports
                .iter()
                .cloned(),
        );
        return Ok(imports);
    }

    let mut present = false;
    for import in &schema.imports {
        match &import.alias {
            None if import.path == "reflect" => present = true,
            Some(alias) if alias == "reflect" => {
                return Err(GenerationError::schema(format!(
                    "import {:?} is aliased as reflect, which the generated code needs",
                    import.path
                )));
            }
            None if import
                .path
                .ends_with("/reflect") =>
            {
                return Err(GenerationError::schema(format!(
                    "import {:?} shadows package reflect, which the generated code needs; give it an alias",
                    import.path
                )));
            }
            _ => {}
        }
    }

    if !present {
        imports.push(Import::new("reflect"));
    }
    imports.extend(
        schema
            .imports
            .iter()
            .cloned(),
    );

    Ok(imports)
}

/// Re-check the naming invariants on a finished plan. A failure here is a
/// defect in the resolver, not a problem with the input.
pub fn verify(plan: &Plan) -> Result<(), GenerationError> {
    let mut receivers: HashSet<&str> = HashSet::new();

    for interface in &plan.interfaces {
        for method in &interface.methods {
            let mut locals: HashSet<&str> = HashSet::new();

            for slot in method
                .parameters
                .iter()
                .chain(&method.results)
            {
                let local = slot
                    .local
                    .as_str();
                if RESERVED.contains(&local)
                    || local.starts_with(SYMBOL_PREFIX)
                    || local == method.invocation
                    || !locals.insert(local)
                {
                    return Err(GenerationError::rendering(format!(
                        "local name {} in {}.{} is not unique",
                        local, interface.name, method.name
                    )));
                }
            }

            for group in [&method.parameters, &method.results] {
                let mut fields: HashSet<&str> = HashSet::new();
                for slot in group {
                    if !fields.insert(slot.field.as_str()) {
                        return Err(GenerationError::rendering(format!(
                            "field name {} in {}.{} is not unique",
                            slot.field, interface.name, method.name
                        )));
                    }
                }
            }

            let mut symbols = vec![method
                .receivers
                .wrapper
                .as_str()];
            if let Some(queries) = &method
                .receivers
                .queries
            {
                symbols.extend([
                    queries
                        .called_with
                        .as_str(),
                    queries
                        .assert_called_with
                        .as_str(),
                    queries
                        .called_once_with
                        .as_str(),
                    queries
                        .assert_called_once_with
                        .as_str(),
                    queries
                        .results_for_call
                        .as_str(),
                    queries
                        .assert_results_for_call
                        .as_str(),
                ]);
            }
            for symbol in symbols {
                if !receivers.insert(symbol) {
                    return Err(GenerationError::rendering(format!(
                        "symbol {} allocated twice",
                        symbol
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Output, Parameter};

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

    fn mapper() -> Schema {
        Schema::new("main").with_interface(Interface::new(
            "Mapper",
            vec![
                Method::new(
                    "MapParameter",
                    vec![Parameter::new("", "map[string]string")],
                    vec![],
                ),
                Method::new(
                    "MapReturn",
                    vec![],
                    vec![Output::new("", "map[string]string")],
                ),
            ],
        ))
    }

    #[test]
    fn groups_follow_arity() {
        let plan = plan(&mapper()).unwrap();
        let methods = &plan.interfaces[0].methods;

        assert!(methods[0].has_parameters());
        assert!(!methods[0].has_results());
        assert!(!methods[1].has_parameters());
        assert!(methods[1].has_results());
        assert_eq!(methods[1].matching, Vec::<String>::new());
        assert_eq!(methods[1].receivers.queries, None);
    }

    #[test]
    fn matching_compares_whole_variadic_slice() {
        let plan = plan(&variadic()).unwrap();
        let mixed = &plan.interfaces[0].methods[1];

        assert!(mixed.has_trailing_variadic());
        assert_eq!(
            mixed.matching_expression(),
            "reflect.DeepEqual(call.Parameters.A, a) && \
             reflect.DeepEqual(call.Parameters.B, b) && \
             reflect.DeepEqual(call.Parameters.C, c) && \
             reflect.DeepEqual(call.Parameters.D, d)"
        );
        assert_eq!(
            mixed.parameters[3].stored_type(),
            "[]string"
        );
        assert_eq!(
            mixed.parameters[3].declared_type(),
            "...string"
        );
        assert_eq!(
            mixed.parameters[3].forwarded(),
            "d..."
        );
    }

    #[test]
    fn symbols_allocated_in_emission_order() {
        let plan = plan(&variadic()).unwrap();
        let methods = &plan.interfaces[0].methods;

        assert_eq!(methods[0].receivers.wrapper, "_f1");
        let queries = methods[0]
            .receivers
            .queries
            .as_ref()
            .unwrap();
        assert_eq!(queries.called_with, "_f2");
        assert_eq!(queries.assert_results_for_call, "_f7");
        assert_eq!(methods[1].receivers.wrapper, "_f8");
    }

    #[test]
    fn repeated_runs_identical() {
        let first = plan(&variadic()).unwrap();
        let second = plan(&variadic()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reflect_imported_only_when_needed() {
        let plan1 = plan(&mapper()).unwrap();
        assert_eq!(plan1.imports, vec![Import::new("reflect")]);

        let schema = Schema::new("main")
            .with_import(Import::new("net/http"))
            .with_interface(Interface::new(
                "Clock",
                vec![Method::new("Now", vec![], vec![Output::new("", "int64")])],
            ));
        let plan2 = plan(&schema).unwrap();
        assert_eq!(plan2.imports, vec![Import::new("net/http")]);

        let schema = mapper().with_import(Import::new("reflect"));
        let plan3 = plan(&schema).unwrap();
        assert_eq!(plan3.imports, vec![Import::new("reflect")]);
    }

    #[test]
    fn reflect_alias_clash_rejected() {
        let schema = mapper().with_import(Import::aliased("example.com/mirror", "reflect"));
        assert!(matches!(
            plan(&schema),
            Err(GenerationError::Schema { .. })
        ));

        let schema = mapper().with_import(Import::new("example.com/reflect"));
        assert!(plan(&schema).is_err());
    }

    #[test]
    fn top_level_clash_rejected() {
        let schema = Schema::new("main")
            .with_interface(Interface::new(
                "A",
                vec![Method::new("BC", vec![], vec![])],
            ))
            .with_interface(Interface::new(
                "AB",
                vec![Method::new("C", vec![], vec![])],
            ));

        assert_eq!(
            plan(&schema),
            Err(GenerationError::in_method(
                "AB",
                "C",
                "generated name ABCInvocation clashes with another generated name"
            ))
        );
    }

    #[test]
    fn member_clash_rejected() {
        let schema = Schema::new("main").with_interface(Interface::new(
            "Runner",
            vec![
                Method::new("Run", vec![], vec![]),
                Method::new("RunCalled", vec![], vec![]),
            ],
        ));
        assert_eq!(
            plan(&schema),
            Err(GenerationError::in_method(
                "Runner",
                "RunCalled",
                "generated member FakeRunner.RunCalled clashes with another generated member"
            ))
        );

        let schema = Schema::new("main").with_interface(Interface::new(
            "Resettable",
            vec![Method::new("Reset", vec![], vec![])],
        ));
        assert!(plan(&schema).is_err());
    }

    #[test]
    fn verify_catches_duplicate_fields() {
        let mut plan = plan(&variadic()).unwrap();
        plan.interfaces[0].methods[1].parameters[1].field = "A".to_string();

        assert_eq!(
            verify(&plan),
            Err(GenerationError::rendering(
                "field name A in Variadic.MixedVariadic is not unique"
            ))
        );
    }

    #[test]
    fn verify_catches_reused_symbols() {
        let mut plan = plan(&variadic()).unwrap();
        plan.interfaces[0].methods[1]
            .receivers
            .wrapper = "_f1".to_string();

        assert!(matches!(
            verify(&plan),
            Err(GenerationError::Rendering { .. })
        ));
    }
}
