//! Schema registry of the lower level component statuses.
//!
//! Each component is described by a JSON schema of the form
//! `{"properties": {"<component>": {"properties": {...}}}}`. Only the
//! property types needed to build placeholder telemetry are interpreted.

use crate::{
    error::{MTDomeGuiError, MTDomeGuiResult},
    status::Telemetry,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

const BUNDLED_REGISTRY: &str = include_str!("../schema/registry.json");

#[derive(Debug, Clone, Deserialize)]
struct ComponentSchema {
    properties: BTreeMap<String, ObjectSchema>,
}

#[derive(Debug, Clone, Deserialize)]
struct ObjectSchema {
    #[serde(default)]
    properties: BTreeMap<String, PropertySchema>,
}

#[derive(Debug, Clone, Deserialize)]
struct PropertySchema {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    items: Vec<ItemSchema>,
    #[serde(rename = "maxItems", default)]
    max_items: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct ItemSchema {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    components: BTreeMap<String, ComponentSchema>,
}

impl SchemaRegistry {
    /// Registry shipped with the crate.
    pub fn bundled() -> MTDomeGuiResult<SchemaRegistry> {
        SchemaRegistry::from_json(BUNDLED_REGISTRY)
    }

    pub fn from_json(json: &str) -> MTDomeGuiResult<SchemaRegistry> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn has_component(&self, component: &str) -> bool {
        self.components.contains_key(component)
    }

    /// Generate telemetry shaped by the schema of a component.
    ///
    /// Numbers get `default_number`, booleans `false`, and arrays `maxItems`
    /// copies of the item default (`null` for any other item type). Other
    /// property types are left out.
    pub fn generate_dict_from_registry(
        &self,
        component: &str,
        default_number: f64,
    ) -> MTDomeGuiResult<Telemetry> {
        let properties = self
            .components
            .get(component)
            .and_then(|schema| schema.properties.get(component))
            .map(|object| &object.properties)
            .ok_or_else(|| {
                MTDomeGuiError::invalid_input(&format!(
                    "Component {component} is not in the registry."
                ))
            })?;

        let mut data = Telemetry::new();
        for (key, property) in properties {
            let value = match property.kind.as_str() {
                "array" => generate_array(property, default_number),
                "boolean" => Value::Bool(false),
                "number" => Value::from(default_number),
                _ => continue,
            };
            data.insert(key.to_owned(), value);
        }

        Ok(data)
    }
}

fn generate_array(property: &PropertySchema, default_number: f64) -> Value {
    let item = match property.items.first().map(|item| item.kind.as_str()) {
        Some("number") => Value::from(default_number),
        Some("boolean") => Value::Bool(false),
        _ => Value::Null,
    };
    Value::Array(vec![item; property.max_items])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{NUM_INTERLOCK, RAD_NUM_DOORS};

    #[test]
    fn test_bundled() {
        let registry = SchemaRegistry::bundled().unwrap();

        for component in [
            "AMCS", "ApSCS", "CBCS", "CSCS", "LCS", "LWSCS", "MonCS", "RAD", "ThCS",
        ] {
            assert!(registry.has_component(component), "{component} missing");
        }
    }

    #[test]
    fn test_generate_dict_from_registry() {
        let registry = SchemaRegistry::bundled().unwrap();

        let data = registry.generate_dict_from_registry("RAD", 1.0).unwrap();

        assert_eq!(data["powerDraw"], 1.0);
        assert_eq!(data["photoelectricSensorClear"], false);
        assert_eq!(data["positionCommanded"][0], 1.0);
        assert_eq!(data["openLimitSwitchEngaged"][0], false);
        assert_eq!(
            data["positionCommanded"].as_array().unwrap().len(),
            RAD_NUM_DOORS
        );
    }

    #[test]
    fn test_generate_dict_from_registry_monitoring() {
        let registry = SchemaRegistry::bundled().unwrap();

        let data = registry.generate_dict_from_registry("MonCS", 0.0).unwrap();

        assert_eq!(data["data"].as_array().unwrap().len(), NUM_INTERLOCK);
    }

    #[test]
    fn test_generate_dict_skips_unknown_types() {
        let registry = SchemaRegistry::from_json(
            r#"{
                "Test": {
                    "properties": {
                        "Test": {
                            "properties": {
                                "name": {"type": "string"},
                                "flags": {"type": "array", "items": [{"type": "string"}], "maxItems": 2}
                            }
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let data = registry.generate_dict_from_registry("Test", 0.0).unwrap();

        assert!(!data.contains_key("name"));
        assert_eq!(data["flags"], serde_json::json!([null, null]));
    }

    #[test]
    fn test_generate_dict_unknown_component() {
        let registry = SchemaRegistry::bundled().unwrap();

        assert!(registry.generate_dict_from_registry("ABC", 0.0).is_err());
    }
}
