//! Parsed contract interface (JSON ABI)

use std::collections::HashMap;

use kokka_crypto::function_selector;
use serde::Deserialize;

use super::types::ParamType;
use crate::SdkError;

/// One callable contract function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub signature: String,
    /// First four bytes of keccak256(signature)
    pub selector: [u8; 4],
    /// Input types
    pub inputs: Vec<ParamType>,
    /// Output types
    pub outputs: Vec<ParamType>,
    /// `view` or `pure`
    pub read_only: bool,
}

impl Function {
    /// Build from types, deriving the signature and selector
    pub fn new(name: &str, inputs: Vec<ParamType>, outputs: Vec<ParamType>, read_only: bool) -> Self {
        let args: Vec<String> = inputs.iter().map(ParamType::to_string).collect();
        let signature = format!("{}({})", name, args.join(","));
        let selector = function_selector(&signature);
        Self {
            name: name.to_string(),
            signature,
            selector,
            inputs,
            outputs,
            read_only,
        }
    }
}

/// Function table keyed by name. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Interface {
    functions: HashMap<String, Function>,
}

#[derive(Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
    #[serde(default)]
    constant: Option<bool>,
}

#[derive(Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    kind: String,
}

// Old ABIs omit "type" for functions
fn default_entry_type() -> String {
    "function".to_string()
}

impl Interface {
    /// Parse a JSON ABI. Only `function` entries are kept. Overloaded
    /// names and unsupported types are rejected.
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        let entries: Vec<AbiEntry> = serde_json::from_str(json)
            .map_err(|e| SdkError::Configuration(format!("invalid abi json: {}", e)))?;

        let mut functions = Vec::new();
        for entry in entries.into_iter().filter(|e| e.kind == "function") {
            let parse = |params: &[AbiParam]| -> Result<Vec<ParamType>, SdkError> {
                params.iter().map(|p| p.kind.parse()).collect()
            };
            let inputs = parse(&entry.inputs)
                .map_err(|e| SdkError::Configuration(format!("{}: {}", entry.name, e)))?;
            let outputs = parse(&entry.outputs)
                .map_err(|e| SdkError::Configuration(format!("{}: {}", entry.name, e)))?;
            let read_only = matches!(entry.state_mutability.as_deref(), Some("view") | Some("pure"))
                || entry.constant == Some(true);
            functions.push(Function::new(&entry.name, inputs, outputs, read_only));
        }
        Self::from_functions(functions)
    }

    /// Build from explicit definitions
    pub fn from_functions(functions: impl IntoIterator<Item = Function>) -> Result<Self, SdkError> {
        let mut table = HashMap::new();
        for function in functions {
            if function.name.is_empty() {
                return Err(SdkError::Configuration("function without a name".to_string()));
            }
            if table.contains_key(&function.name) {
                return Err(SdkError::Configuration(format!(
                    "overloaded function {} is not supported",
                    function.name
                )));
            }
            table.insert(function.name.clone(), function);
        }
        Ok(Self { functions: table })
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Function names, sorted
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// True when no functions are defined
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
