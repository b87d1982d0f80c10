//! DynamoDB operations behind a JSON-shaped interface.
//!
//! Items cross this boundary as `serde_json` maps so strategies never see
//! `AttributeValue`. Conversion covers the scalar and document types;
//! binary attributes have no JSON rendering here and map to null.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::{Map, Value};

/// Key-value access to DynamoDB tables.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch the item whose partition key `key_name` equals `key_value`.
    async fn get_item(
        &self,
        table: &str,
        key_name: &str,
        key_value: &str,
    ) -> Result<Option<Map<String, Value>>>;

    /// Write one item, replacing any existing item with the same key.
    async fn put_item(&self, table: &str, item: Map<String, Value>) -> Result<()>;
}

/// [`TableStore`] backed by the AWS SDK client.
pub struct SdkDynamo {
    client: Client,
}

impl SdkDynamo {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TableStore for SdkDynamo {
    async fn get_item(
        &self,
        table: &str,
        key_name: &str,
        key_value: &str,
    ) -> Result<Option<Map<String, Value>>> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .key(key_name, AttributeValue::S(key_value.to_string()))
            .send()
            .await?;

        Ok(output.item().map(attrs_to_json))
    }

    async fn put_item(&self, table: &str, item: Map<String, Value>) -> Result<()> {
        let attrs: HashMap<String, AttributeValue> = item
            .iter()
            .map(|(key, value)| (key.clone(), json_to_attr(value)))
            .collect();

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(attrs))
            .send()
            .await?;
        Ok(())
    }
}

fn attrs_to_json(attrs: &HashMap<String, AttributeValue>) -> Map<String, Value> {
    attrs
        .iter()
        .map(|(key, attr)| (key.clone(), attr_to_json(attr)))
        .collect()
}

fn attr_to_json(attr: &AttributeValue) -> Value {
    match attr {
        AttributeValue::S(text) => Value::String(text.clone()),
        AttributeValue::N(raw) => parse_number(raw),
        AttributeValue::Bool(flag) => Value::Bool(*flag),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(items) => Value::Array(items.iter().map(attr_to_json).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(key, nested)| (key.clone(), attr_to_json(nested)))
                .collect(),
        ),
        AttributeValue::Ss(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(items) => Value::Array(items.iter().map(|raw| parse_number(raw)).collect()),
        _ => Value::Null,
    }
}

fn json_to_attr(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(json_to_attr).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(key, nested)| (key.clone(), json_to_attr(nested)))
                .collect(),
        ),
    }
}

/// DynamoDB numbers arrive as strings; render integers without a decimal
/// point and fall back to the raw text when the value fits neither i64
/// nor f64.
fn parse_number(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}
