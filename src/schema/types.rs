//! Types describing the interfaces a fake is generated for

use serde::Deserialize;

/// Everything needed for one generation run: the package the output lives
/// in, what it imports, and the interfaces to fake.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schema {
    #[serde(default)]
    pub command_line: String,
    pub package_name: String,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

impl Schema {
    pub fn new(package_name: &str) -> Schema {
        Schema {
            command_line: String::new(),
            package_name: package_name.to_string(),
            imports: vec![],
            interfaces: vec![],
        }
    }

    pub fn with_command_line(mut self, command_line: &str) -> Schema {
        self.command_line = command_line.to_string();
        self
    }

    pub fn with_import(mut self, import: Import) -> Schema {
        self.imports
            .push(import);
        self
    }

    pub fn with_interface(mut self, interface: Interface) -> Schema {
        self.interfaces
            .push(interface);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Import {
    pub path: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl Import {
    pub fn new(path: &str) -> Import {
        Import {
            path: path.to_string(),
            alias: None,
        }
    }

    pub fn aliased(path: &str, alias: &str) -> Import {
        Import {
            path: path.to_string(),
            alias: Some(alias.to_string()),
        }
    }
}

/// An interface, with its methods in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Interface {
    pub fn new(name: &str, methods: Vec<Method>) -> Interface {
        Interface {
            name: name.to_string(),
            methods,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub results: Vec<Output>,
}

impl Method {
    pub fn new(name: &str, parameters: Vec<Parameter>, results: Vec<Output>) -> Method {
        Method {
            name: name.to_string(),
            parameters,
            results,
        }
    }

    /// True iff the last parameter accepts zero or more values of its
    /// element type.
    pub fn has_trailing_variadic(&self) -> bool {
        self.parameters
            .last()
            .map(|parameter| parameter.variadic)
            .unwrap_or(false)
    }
}

/// A method parameter. For a variadic parameter `type_name` is the element
/// type, so `...string` is described as `string` with `variadic` set.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Type")]
    pub type_name: String,
    #[serde(default)]
    pub variadic: bool,
}

impl Parameter {
    pub fn new(name: &str, type_name: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            type_name: type_name.to_string(),
            variadic: false,
        }
    }

    pub fn variadic(name: &str, element: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            type_name: element.to_string(),
            variadic: true,
        }
    }
}

/// A value returned by a method.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Type")]
    pub type_name: String,
}

impl Output {
    pub fn new(name: &str, type_name: &str) -> Output {
        Output {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }
}
