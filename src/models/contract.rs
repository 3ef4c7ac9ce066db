use serde::{ Deserialize, Serialize };

use crate::errors::{ SynthError, SynthResult };

/// The pre/post/assignable triple bounding one synthesis problem
///
/// Clause texts are kept exactly as they appear in the proof skeleton. A
/// contract cannot be changed after extraction; build a new one instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    statement_id: String,
    precondition: String,
    postcondition: String,
    assignable: String,
    loop_update: bool,
}

impl Contract {
    pub fn new(
        statement_id: impl Into<String>,
        precondition: impl Into<String>,
        postcondition: impl Into<String>,
        assignable: impl Into<String>
    ) -> SynthResult<Self> {
        let contract = Self {
            statement_id: statement_id.into(),
            precondition: precondition.into(),
            postcondition: postcondition.into(),
            assignable: assignable.into(),
            loop_update: false,
        };

        for (name, text) in [
            ("precondition", &contract.precondition),
            ("postcondition", &contract.postcondition),
            ("assignable", &contract.assignable),
        ] {
            if text.trim().is_empty() {
                return Err(
                    SynthError::ParseError(
                        format!("empty {} clause for statement `{}`", name, contract.statement_id)
                    )
                );
            }
        }

        Ok(contract)
    }

    /// Mark the statement as the body of a loop
    pub fn with_loop_update(mut self, loop_update: bool) -> Self {
        self.loop_update = loop_update;
        self
    }

    pub fn statement_id(&self) -> &str {
        &self.statement_id
    }

    pub fn precondition(&self) -> &str {
        &self.precondition
    }

    pub fn postcondition(&self) -> &str {
        &self.postcondition
    }

    pub fn assignable(&self) -> &str {
        &self.assignable
    }

    pub fn is_loop_update(&self) -> bool {
        self.loop_update
    }
}

/// A program variable visible to the synthesized statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub modifiable: bool,
}

/// Ordered, duplicate-free set of program variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariableSet {
    variables: Vec<Variable>,
}

impl VariableSet {
    pub fn new(variables: Vec<Variable>) -> SynthResult<Self> {
        for (i, var) in variables.iter().enumerate() {
            if var.name.trim().is_empty() {
                return Err(SynthError::ModelError(format!("variable #{} has no name", i + 1)));
            }
            if variables[..i].iter().any(|other| other.name == var.name) {
                return Err(
                    SynthError::ModelError(format!("variable `{}` is declared twice", var.name))
                );
            }
        }
        Ok(Self { variables })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn modifiable(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter().filter(|v| v.modifiable)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
