use log::{ debug, info };
use serde::Deserialize;

use crate::errors::{ SynthError, SynthResult };
use crate::models::contract::{ Variable, VariableSet };

/// On-disk shape of a model description
#[derive(Debug, Deserialize)]
struct ModelDocument {
    #[serde(default)]
    components: Vec<ComponentEntry>,
}

#[derive(Debug, Deserialize)]
struct ComponentEntry {
    id: String,
    #[serde(default)]
    variables: Vec<VariableEntry>,
    #[serde(default)]
    modifiable: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VariableEntry {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

/// Turns a model description into the variable set of one component
pub struct ModelReader;

impl ModelReader {
    /// Read the variables of `component_id` from a YAML (or JSON) model description
    pub fn read(content: &str, component_id: &str) -> SynthResult<VariableSet> {
        let document: ModelDocument = serde_yaml
            ::from_str(content)
            .map_err(|e| SynthError::ModelError(format!("cannot parse model description: {}", e)))?;

        let component = document.components
            .into_iter()
            .find(|c| c.id == component_id)
            .ok_or_else(|| {
                SynthError::ModelError(format!("component `{}` not found in model", component_id))
            })?;

        if component.variables.is_empty() {
            return Err(
                SynthError::ModelError(format!("component `{}` declares no variables", component_id))
            );
        }

        for name in &component.modifiable {
            if !component.variables.iter().any(|v| &v.name == name) {
                return Err(
                    SynthError::ModelError(
                        format!(
                            "modifiable variable `{}` is not declared in component `{}`",
                            name,
                            component_id
                        )
                    )
                );
            }
        }

        let variables = component.variables
            .into_iter()
            .map(|v| Variable {
                modifiable: component.modifiable.contains(&v.name),
                name: v.name,
                ty: v.ty,
            })
            .collect();
        let set = VariableSet::new(variables)?;

        info!(
            "Read {} variables ({} modifiable) for component `{}`",
            set.len(),
            set.modifiable().count(),
            component_id
        );
        for var in set.iter() {
            debug!("  {}: {} (modifiable: {})", var.name, var.ty, var.modifiable);
        }

        Ok(set)
    }
}
