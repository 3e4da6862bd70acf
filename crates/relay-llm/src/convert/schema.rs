//! Generic schema tree -> JSON Schema

use serde_json::{Map, Value, json};

use crate::types::{Schema, SchemaType};

/// Render a generic schema node as a JSON Schema mapping
///
/// A missing schema renders as an empty object schema. Unspecified and
/// null node types fall back to `"string"`.
pub fn schema_to_json(schema: Option<&Schema>) -> Value {
    let Some(schema) = schema else {
        return json!({"type": "object", "properties": {}});
    };

    let mut out = Map::new();
    out.insert("type".to_owned(), Value::from(type_name(schema.schema_type)));

    if !schema.description.is_empty() {
        out.insert("description".to_owned(), Value::from(schema.description.clone()));
    }

    if !schema.properties.is_empty() {
        let properties = schema
            .properties
            .iter()
            .map(|(name, property)| (name.clone(), schema_to_json(Some(property))))
            .collect::<Map<_, _>>();
        out.insert("properties".to_owned(), Value::Object(properties));
    }

    if !schema.required.is_empty() {
        out.insert("required".to_owned(), Value::from(schema.required.clone()));
    }

    if let Some(items) = &schema.items {
        out.insert("items".to_owned(), schema_to_json(Some(items)));
    }

    if !schema.enum_values.is_empty() {
        out.insert("enum".to_owned(), Value::from(schema.enum_values.clone()));
    }

    Value::Object(out)
}

const fn type_name(schema_type: SchemaType) -> &'static str {
    match schema_type {
        SchemaType::Number => "number",
        SchemaType::Integer => "integer",
        SchemaType::Boolean => "boolean",
        SchemaType::Array => "array",
        SchemaType::Object => "object",
        SchemaType::String | SchemaType::Unspecified | SchemaType::Null => "string",
    }
}
