//! The resolved shape of everything that will be emitted

use crate::schema::Import;

/// One generation run, with every name decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub command_line: String,
    pub package_name: String,
    /// Final import list, `reflect` included when matching needs it.
    pub imports: Vec<Import>,
    pub interfaces: Vec<InterfacePlan>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfacePlan {
    pub name: String,
    /// Name of the fake type, `Fake<I>`.
    pub fake: String,
    /// Name of the test harness interface, `<I>TestingT`.
    pub testing: String,
    pub methods: Vec<MethodPlan>,
}

impl InterfacePlan {
    pub fn constructor(&self, behaviour: Behaviour) -> String {
        format!("New{}Default{}", self.fake, behaviour.name())
    }
}

/// What the hooks of a default-constructed fake do when called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behaviour {
    /// Abort with a diagnostic.
    Panic,
    /// Report a fatal failure to the test harness.
    Fatal,
    /// Report a non-fatal failure to the test harness.
    Error,
}

impl Behaviour {
    pub const ALL: [Behaviour; 3] = [Behaviour::Panic, Behaviour::Fatal, Behaviour::Error];

    pub fn name(self) -> &'static str {
        match self {
            Behaviour::Panic => "Panic",
            Behaviour::Fatal => "Fatal",
            Behaviour::Error => "Error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodPlan {
    /// Owning interface.
    pub interface: String,
    pub name: String,
    /// Name of the invocation record type, `<I><M>Invocation`.
    pub invocation: String,
    pub parameters: Vec<Slot>,
    pub results: Vec<Slot>,
    /// One deep-equality test per parameter against a recorded `call`,
    /// conjoined when emitted.
    pub matching: Vec<String>,
    pub receivers: Receivers,
}

impl MethodPlan {
    /// Whether the invocation record carries a Parameters group, and whether
    /// the CalledWith family is emitted at all.
    pub fn has_parameters(&self) -> bool {
        !self
            .parameters
            .is_empty()
    }

    /// Whether the invocation record carries a Results group.
    pub fn has_results(&self) -> bool {
        !self
            .results
            .is_empty()
    }

    pub fn has_trailing_variadic(&self) -> bool {
        self.parameters
            .last()
            .map(|slot| slot.variadic)
            .unwrap_or(false)
    }

    pub fn hook(&self) -> String {
        format!("{}Hook", self.name)
    }

    pub fn calls(&self) -> String {
        format!("{}Calls", self.name)
    }

    pub fn matching_expression(&self) -> String {
        self.matching
            .join(" && ")
    }
}

/// A parameter or result as it appears in emitted code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub local: String,
    pub field: String,
    /// Declared type; the element type when variadic.
    pub type_name: String,
    pub variadic: bool,
}

impl Slot {
    /// Type in a signature: `...T` for the variadic parameter.
    pub fn declared_type(&self) -> String {
        if self.variadic {
            format!("...{}", self.type_name)
        } else {
            self.type_name
                .clone()
        }
    }

    /// Type of the recorded field: the variadic parameter is kept as the
    /// whole slice it received.
    pub fn stored_type(&self) -> String {
        if self.variadic {
            format!("[]{}", self.type_name)
        } else {
            self.type_name
                .clone()
        }
    }

    /// How the value is passed on to the hook, expanding a variadic slice.
    pub fn forwarded(&self) -> String {
        if self.variadic {
            format!("{}...", self.local)
        } else {
            self.local
                .clone()
        }
    }
}

/// Receiver symbols for the methods whose bodies mention schema-derived
/// names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receivers {
    pub wrapper: String,
    /// Present iff the method has parameters.
    pub queries: Option<QueryReceivers>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryReceivers {
    pub called_with: String,
    pub assert_called_with: String,
    pub called_once_with: String,
    pub assert_called_once_with: String,
    pub results_for_call: String,
    pub assert_results_for_call: String,
}
