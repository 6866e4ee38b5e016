use serde_json::json;
use std::collections::HashMap;

use crate::mcp::types::{Property, ToolInputSchema};

/// Builds the JSON schema a tool advertises in `tools/list`
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: HashMap<String, Property>,
    required: Vec<String>,
}

fn property(property_type: &str, description: &str) -> Property {
    Property {
        property_type: Some(property_type.to_string()),
        description: Some(description.to_string()),
        default: None,
        enum_values: None,
        items: None,
        any_of: None,
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(mut self, name: &str, property: Property, required: bool) -> Self {
        if required {
            self.required.push(name.to_string());
        }
        self.properties.insert(name.to_string(), property);
        self
    }

    pub fn required_string(self, name: &str, description: &str) -> Self {
        self.insert(name, property("string", description), true)
    }

    pub fn string(self, name: &str, description: &str) -> Self {
        self.insert(name, property("string", description), false)
    }

    pub fn required_integer(self, name: &str, description: &str) -> Self {
        self.insert(name, property("integer", description), true)
    }

    pub fn integer(self, name: &str, description: &str, default: i64) -> Self {
        let mut prop = property("integer", description);
        prop.default = Some(json!(default));
        self.insert(name, prop, false)
    }

    pub fn boolean(self, name: &str, description: &str, default: bool) -> Self {
        let mut prop = property("boolean", description);
        prop.default = Some(json!(default));
        self.insert(name, prop, false)
    }

    pub fn enumeration(self, name: &str, description: &str, options: &[&str]) -> Self {
        let mut prop = property("string", description);
        prop.enum_values = Some(options.iter().map(|o| json!(o)).collect());
        self.insert(name, prop, true)
    }

    /// Optional list of Block Kit style objects
    pub fn object_list(self, name: &str, description: &str) -> Self {
        let mut prop = property("array", description);
        prop.items = Some(json!({"type": "object"}));
        self.insert(name, prop, false)
    }

    pub fn string_list(self, name: &str, description: &str) -> Self {
        let mut prop = property("array", description);
        prop.items = Some(json!({"type": "string"}));
        self.insert(name, prop, false)
    }

    /// A string or a list of strings
    pub fn one_or_many(self, name: &str, description: &str, required: bool) -> Self {
        let prop = Property {
            property_type: None,
            description: Some(description.to_string()),
            default: None,
            enum_values: None,
            items: None,
            any_of: Some(vec![
                json!({"type": "string"}),
                json!({"type": "array", "items": {"type": "string"}}),
            ]),
        };
        self.insert(name, prop, required)
    }

    pub fn build(self) -> ToolInputSchema {
        ToolInputSchema {
            schema_type: "object".to_string(),
            properties: self.properties,
            required: self.required,
        }
    }
}

/// Schema of a tool without parameters
pub fn no_params() -> ToolInputSchema {
    SchemaBuilder::new().build()
}
