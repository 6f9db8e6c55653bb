//! Go source for the types and methods of each fake

use super::signature::*;
use crate::planning::{Behaviour, InterfacePlan, MethodPlan, Slot};

/// Accumulates emitted source. Every block starts with a blank line
/// separating it from the one before.
pub(crate) struct Emitter {
    buffer: String,
}

impl Emitter {
    pub(crate) fn new() -> Emitter {
        Emitter {
            buffer: String::new(),
        }
    }

    pub(crate) fn finish(self) -> String {
        self.buffer
    }

    pub(crate) fn append_str(&mut self, text: &str) {
        self.buffer
            .push_str(text);
    }

    fn append_newline(&mut self) {
        self.buffer
            .push('\n');
    }

    fn line(&mut self, text: &str) {
        self.buffer
            .push_str(text);
        self.buffer
            .push('\n');
    }

    pub(crate) fn emit_invocation(&mut self, method: &MethodPlan) {
        self.append_newline();
        self.line(&format!(
            "// {} represents a single call of Fake{}.{}",
            method.invocation, method.interface, method.name
        ));
        self.line(&format!("type {} struct {{", method.invocation));
        if method.has_parameters() {
            self.emit_group("Parameters", &method.parameters);
        }
        if method.has_results() {
            self.emit_group("Results", &method.results);
        }
        self.line("}");
    }

    fn emit_group(&mut self, label: &str, slots: &[Slot]) {
        self.line(&format!("\t{} struct {{", label));
        for slot in slots {
            self.line(&format!("\t\t{} {}", slot.field, slot.stored_type()));
        }
        self.line("\t}");
    }

    pub(crate) fn emit_testing(&mut self, interface: &InterfacePlan) {
        self.append_newline();
        self.line(&format!(
            "// {} represents the methods of \"testing\".T used by {}.  It avoids importing the testing package.",
            interface.testing, interface.fake
        ));
        self.line(&format!("type {} interface {{", interface.testing));
        self.line("\tError(...interface{})");
        self.line("\tErrorf(string, ...interface{})");
        self.line("\tFatal(...interface{})");
        self.line("\tHelper()");
        self.line("}");
    }

    /// The fake type itself. Its doc comment comes from the usage template
    /// and is already in the buffer.
    pub(crate) fn emit_fake(&mut self, interface: &InterfacePlan) {
        self.line(&format!("type {} struct {{", interface.fake));
        for method in &interface.methods {
            self.line(&format!("\t{} {}", method.hook(), hook_type(method)));
        }
        if !interface
            .methods
            .is_empty()
        {
            self.append_newline();
        }
        for method in &interface.methods {
            self.line(&format!(
                "\t{} []*{}",
                method.calls(),
                method.invocation
            ));
        }
        self.line("}");
    }

    pub(crate) fn emit_constructors(&mut self, interface: &InterfacePlan) {
        let fake = &interface.fake;

        for behaviour in Behaviour::ALL {
            let name = interface.constructor(behaviour);

            self.append_newline();
            match behaviour {
                Behaviour::Panic => {
                    self.line(&format!(
                        "// {} returns an instance of {} with all hooks configured to panic",
                        name, fake
                    ));
                    self.line(&format!("func {}() *{} {{", name, fake));
                }
                Behaviour::Fatal | Behaviour::Error => {
                    self.line(&format!(
                        "// {} returns an instance of {} with all hooks configured to call t.{}",
                        name,
                        fake,
                        behaviour.name()
                    ));
                    self.line(&format!(
                        "func {}(t {}) *{} {{",
                        name, interface.testing, fake
                    ));
                }
            }

            self.line(&format!("\treturn &{}{{", fake));
            for method in &interface.methods {
                let message = format!("\"Unexpected call to {}.{}\"", interface.name, method.name);

                self.line(&format!(
                    "\t\t{}: func({}){} {{",
                    method.hook(),
                    parameter_types(method),
                    results_clause(method)
                ));
                match behaviour {
                    Behaviour::Panic => {
                        self.line(&format!("\t\t\tpanic({})", message));
                    }
                    Behaviour::Fatal | Behaviour::Error => {
                        self.line(&format!("\t\t\tt.{}({})", behaviour.name(), message));
                        self.line("\t\t\treturn");
                    }
                }
                self.line("\t\t},");
            }
            self.line("\t}");
            self.line("}");
        }
    }

    pub(crate) fn emit_reset(&mut self, interface: &InterfacePlan) {
        self.append_newline();
        self.line(&format!(
            "// Reset clears the calls recorded by {}, leaving its hooks in place",
            interface.fake
        ));
        self.line(&format!("func (f *{}) Reset() {{", interface.fake));
        for method in &interface.methods {
            self.line(&format!(
                "\tf.{} = []*{}{{}}",
                method.calls(),
                method.invocation
            ));
        }
        self.line("}");
    }

    /// The method implementing the interface. The call is recorded before
    /// the hook runs, so a hook sees its own call in the history.
    pub(crate) fn emit_wrapper(&mut self, interface: &InterfacePlan, method: &MethodPlan) {
        let f = &method
            .receivers
            .wrapper;
        let hook = method.hook();
        let calls = method.calls();

        self.append_newline();
        self.line(&format!(
            "func ({} *{}) {}({}){} {{",
            f,
            interface.fake,
            method.name,
            parameters_declaration(method),
            results_clause(method)
        ));
        self.line(&format!("\tif {}.{} == nil {{", f, hook));
        self.line(&format!(
            "\t\tpanic(\"{}.{}() called but {}.{} is nil\")",
            interface.name, method.name, interface.fake, hook
        ));
        self.line("\t}");
        self.append_newline();

        self.line(&format!("\tinvocation := new({})", method.invocation));
        self.line(&format!(
            "\t{}.{} = append({}.{}, invocation)",
            f, calls, f, calls
        ));
        self.append_newline();

        if method.has_parameters() {
            for slot in &method.parameters {
                self.line(&format!(
                    "\tinvocation.Parameters.{} = {}",
                    slot.field, slot.local
                ));
            }
            self.append_newline();
        }

        if method.has_results() {
            self.line(&format!(
                "\t{} = {}.{}({})",
                results_reference(method),
                f,
                hook,
                arguments(method)
            ));
            self.append_newline();
            for slot in &method.results {
                self.line(&format!(
                    "\tinvocation.Results.{} = {}",
                    slot.field, slot.local
                ));
            }
        } else {
            self.line(&format!("\t{}.{}({})", f, hook, arguments(method)));
        }
        self.append_newline();

        self.line("\treturn");
        self.line("}");
    }

    /// Called, NotCalled, CalledOnce, CalledN and their assertions. None of
    /// these mention schema-derived names, so they use a fixed receiver.
    pub(crate) fn emit_counting(&mut self, interface: &InterfacePlan, method: &MethodPlan) {
        let fake = &interface.fake;
        let testing = &interface.testing;
        let name = &method.name;
        let calls = method.calls();

        self.append_newline();
        self.line(&format!(
            "// {name}Called returns true if {fake}.{name} was called"
        ));
        self.line(&format!("func (f *{fake}) {name}Called() bool {{"));
        self.line(&format!("\treturn len(f.{calls}) != 0"));
        self.line("}");

        self.append_newline();
        self.line(&format!(
            "// Assert{name}Called calls t.Error if {fake}.{name} was not called"
        ));
        self.line(&format!(
            "func (f *{fake}) Assert{name}Called(t {testing}) {{"
        ));
        self.line("\tt.Helper()");
        self.line(&format!("\tif len(f.{calls}) == 0 {{"));
        self.line(&format!(
            "\t\tt.Error(\"{fake}.{name} not called, expected at least one\")"
        ));
        self.line("\t}");
        self.line("}");

        self.append_newline();
        self.line(&format!(
            "// {name}NotCalled returns true if {fake}.{name} was not called"
        ));
        self.line(&format!("func (f *{fake}) {name}NotCalled() bool {{"));
        self.line(&format!("\treturn len(f.{calls}) == 0"));
        self.line("}");

        self.append_newline();
        self.line(&format!(
            "// Assert{name}NotCalled calls t.Error if {fake}.{name} was called"
        ));
        self.line(&format!(
            "func (f *{fake}) Assert{name}NotCalled(t {testing}) {{"
        ));
        self.line("\tt.Helper()");
        self.line(&format!("\tif len(f.{calls}) != 0 {{"));
        self.line(&format!(
            "\t\tt.Error(\"{fake}.{name} called, expected none\")"
        ));
        self.line("\t}");
        self.line("}");

        self.append_newline();
        self.line(&format!(
            "// {name}CalledOnce returns true if {fake}.{name} was called exactly once"
        ));
        self.line(&format!("func (f *{fake}) {name}CalledOnce() bool {{"));
        self.line(&format!("\treturn len(f.{calls}) == 1"));
        self.line("}");

        self.append_newline();
        self.line(&format!(
            "// Assert{name}CalledOnce calls t.Error if {fake}.{name} was not called exactly once"
        ));
        self.line(&format!(
            "func (f *{fake}) Assert{name}CalledOnce(t {testing}) {{"
        ));
        self.line("\tt.Helper()");
        self.line(&format!("\tif len(f.{calls}) != 1 {{"));
        self.line(&format!(
            "\t\tt.Errorf(\"{fake}.{name} called %d times, expected 1\", len(f.{calls}))"
        ));
        self.line("\t}");
        self.line("}");

        self.append_newline();
        self.line(&format!(
            "// {name}CalledN returns true if {fake}.{name} was called at least n times"
        ));
        self.line(&format!("func (f *{fake}) {name}CalledN(n int) bool {{"));
        self.line(&format!("\treturn len(f.{calls}) >= n"));
        self.line("}");

        self.append_newline();
        self.line(&format!(
            "// Assert{name}CalledN calls t.Error if {fake}.{name} was called less than n times"
        ));
        self.line(&format!(
            "func (f *{fake}) Assert{name}CalledN(t {testing}, n int) {{"
        ));
        self.line("\tt.Helper()");
        self.line(&format!("\tif len(f.{calls}) < n {{"));
        self.line(&format!(
            "\t\tt.Errorf(\"{fake}.{name} called %d times, expected >= %d\", len(f.{calls}), n)"
        ));
        self.line("\t}");
        self.line("}");
    }

    /// CalledWith, CalledOnceWith, ResultsForCall and their assertions, all
    /// driven by the method's matching expression. Only emitted for methods
    /// with parameters.
    pub(crate) fn emit_matching(&mut self, interface: &InterfacePlan, method: &MethodPlan) {
        let receivers = match &method
            .receivers
            .queries
        {
            Some(receivers) => receivers,
            None => return,
        };

        let fake = &interface.fake;
        let testing = &interface.testing;
        let name = &method.name;
        let parameters = parameters_declaration(method);

        let found = vec!["found = true".to_string(), "break".to_string()];
        let counted = vec!["count++".to_string()];
        let mut recovered: Vec<String> = method
            .results
            .iter()
            .map(|slot| format!("{} = call.Results.{}", slot.local, slot.field))
            .collect();
        recovered.extend(found.iter().cloned());

        // CalledWith
        let f = &receivers.called_with;
        self.append_newline();
        self.line(&format!(
            "// {name}CalledWith returns true if {fake}.{name} was called with the given values"
        ));
        self.line(&format!(
            "func ({f} *{fake}) {name}CalledWith({parameters}) (found bool) {{"
        ));
        self.emit_search(f, method, &found);
        self.append_newline();
        self.line("\treturn");
        self.line("}");

        // Assert CalledWith
        let f = &receivers.assert_called_with;
        self.append_newline();
        self.line(&format!(
            "// Assert{name}CalledWith calls t.Error if {fake}.{name} was not called with the given values"
        ));
        self.line(&format!(
            "func ({f} *{fake}) Assert{name}CalledWith(t {testing}, {parameters}) {{"
        ));
        self.line("\tt.Helper()");
        self.line("\tvar found bool");
        self.emit_search(f, method, &found);
        self.append_newline();
        self.line("\tif !found {");
        self.line(&format!(
            "\t\tt.Error(\"{fake}.{name} not called with expected parameters\")"
        ));
        self.line("\t}");
        self.line("}");

        // CalledOnceWith
        let f = &receivers.called_once_with;
        self.append_newline();
        self.line(&format!(
            "// {name}CalledOnceWith returns true if {fake}.{name} was called exactly once with the given values"
        ));
        self.line(&format!(
            "func ({f} *{fake}) {name}CalledOnceWith({parameters}) bool {{"
        ));
        self.line("\tvar count int");
        self.emit_search(f, method, &counted);
        self.append_newline();
        self.line("\treturn count == 1");
        self.line("}");

        // Assert CalledOnceWith
        let f = &receivers.assert_called_once_with;
        self.append_newline();
        self.line(&format!(
            "// Assert{name}CalledOnceWith calls t.Error if {fake}.{name} was not called exactly once with the given values"
        ));
        self.line(&format!(
            "func ({f} *{fake}) Assert{name}CalledOnceWith(t {testing}, {parameters}) {{"
        ));
        self.line("\tt.Helper()");
        self.line("\tvar count int");
        self.emit_search(f, method, &counted);
        self.append_newline();
        self.line("\tif count != 1 {");
        self.line(&format!(
            "\t\tt.Errorf(\"{fake}.{name} called %d times with expected parameters, expected one\", count)"
        ));
        self.line("\t}");
        self.line("}");

        // ResultsForCall
        let f = &receivers.results_for_call;
        self.append_newline();
        self.line(&format!(
            "// {name}ResultsForCall returns the result values for the first call to {fake}.{name} with the given values"
        ));
        self.line(&format!(
            "func ({f} *{fake}) {name}ResultsForCall({parameters}){} {{",
            results_found_clause(method)
        ));
        self.emit_search(f, method, &recovered);
        self.append_newline();
        self.line("\treturn");
        self.line("}");

        // Assert ResultsForCall
        let f = &receivers.assert_results_for_call;
        self.append_newline();
        self.line(&format!(
            "// Assert{name}ResultsForCall calls t.Error if {fake}.{name} was not called with the given values, otherwise it returns the result values of the first matching call"
        ));
        self.line(&format!(
            "func ({f} *{fake}) Assert{name}ResultsForCall(t {testing}, {parameters}){} {{",
            results_clause(method)
        ));
        self.line("\tt.Helper()");
        self.line("\tvar found bool");
        self.emit_search(f, method, &recovered);
        self.append_newline();
        self.line("\tif !found {");
        self.line(&format!(
            "\t\tt.Error(\"{fake}.{name} not called with expected parameters\")"
        ));
        self.line("\t}");
        self.append_newline();
        self.line("\treturn");
        self.line("}");
    }

    // Loop over the recorded calls, running `body` for each one that
    // matches the given arguments.
    fn emit_search(&mut self, receiver: &str, method: &MethodPlan, body: &[String]) {
        self.line(&format!(
            "\tfor _, call := range {}.{} {{",
            receiver,
            method.calls()
        ));
        self.line(&format!("\t\tif {} {{", method.matching_expression()));
        for statement in body {
            self.line(&format!("\t\t\t{}", statement));
        }
        self.line("\t\t}");
        self.line("\t}");
    }
}
