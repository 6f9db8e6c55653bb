//! Fixed prose of the generated file: the header and the usage comment

use serde::Serialize;
use tinytemplate::{format_unescaped, TinyTemplate};

use super::signature;
use crate::error::GenerationError;
use crate::planning::{InterfacePlan, Plan};

static HEADER: &str = r#"// generated by "{command_line}".  DO NOT EDIT.

package {package_name}
{{ if has_imports }}
import (
{{ for item in imports }}	{{ if item.alias }}{item.alias} {{ endif }}"{item.path}"
{{ endfor }})
{{ endif }}"#;

static USAGE: &str = r#"
/*
{fake} is a mock implementation of {name} for testing.
{{ if example }}Use it in your tests as in this example:

	package example

	func TestWith{name}(t *testing.T) \{
		f := &{package_name}.{fake}\{
			{example.method}Hook: func({example.parameters}){example.results} \{
				// ensure parameters meet expectations, signal errors using t, etc
				return
			},
		}

		// test code goes here ...

		// assert state of {fake} ...
		f.Assert{example.method}CalledOnce(t)
	}

Create anonymous function implementations for only those interface methods that
should be called in the code under test.  This will force a panic if any
unexpected calls are made to {fake}.
{{ endif }}*/
"#;

#[derive(Serialize)]
struct HeaderContext<'a> {
    command_line: String,
    package_name: &'a str,
    has_imports: bool,
    imports: Vec<ImportContext<'a>>,
}

#[derive(Serialize)]
struct ImportContext<'a> {
    path: &'a str,
    alias: Option<&'a str>,
}

#[derive(Serialize)]
struct UsageContext<'a> {
    name: &'a str,
    fake: &'a str,
    package_name: &'a str,
    example: Option<Example<'a>>,
}

#[derive(Serialize)]
struct Example<'a> {
    method: &'a str,
    parameters: String,
    results: String,
}

pub(crate) struct Templates<'t> {
    tt: TinyTemplate<'t>,
}

impl<'t> Templates<'t> {
    pub(crate) fn new() -> Result<Templates<'t>, GenerationError> {
        let mut tt = TinyTemplate::new();
        // Go source, not HTML
        tt.set_default_formatter(&format_unescaped);
        tt.add_template("header", HEADER)?;
        tt.add_template("usage", USAGE)?;

        Ok(Templates { tt })
    }

    pub(crate) fn header(&self, plan: &Plan) -> Result<String, GenerationError> {
        let imports: Vec<ImportContext> = plan
            .imports
            .iter()
            .map(|import| ImportContext {
                path: &import.path,
                alias: import
                    .alias
                    .as_deref(),
            })
            .collect();

        let context = HeaderContext {
            // a newline would end the comment early
            command_line: plan
                .command_line
                .replace(['\r', '\n'], " "),
            package_name: &plan.package_name,
            has_imports: !imports.is_empty(),
            imports,
        };

        Ok(self
            .tt
            .render("header", &context)?)
    }

    /// The usage example is built around the first method; an interface
    /// without methods gets the one-line description only.
    pub(crate) fn usage(
        &self,
        plan: &Plan,
        interface: &InterfacePlan,
    ) -> Result<String, GenerationError> {
        let example = interface
            .methods
            .first()
            .map(|method| Example {
                method: &method.name,
                parameters: signature::parameters_declaration(method),
                results: signature::results_clause(method),
            });

        let context = UsageContext {
            name: &interface.name,
            fake: &interface.fake,
            package_name: &plan.package_name,
            example,
        };

        Ok(self
            .tt
            .render("usage", &context)?)
    }
}
