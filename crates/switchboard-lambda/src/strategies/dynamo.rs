//! DynamoDB lookup and store strategies.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use switchboard_core::{Rejection, Strategy};

use crate::aws::dynamo::TableStore;

/// Lookup parameters carried in the event itself rather than the
/// environment, so one deployment can serve many tables.
struct LookupParams {
    table: Option<String>,
    key_name: Option<String>,
    key_value: Option<String>,
}

impl LookupParams {
    fn from_event(event: &Value) -> Self {
        Self {
            table: string_field(event, "TABLE_NAME"),
            key_name: string_field(event, "KEY_NAME"),
            key_value: string_field(event, "KEY_VALUE"),
        }
    }

    fn missing_key_reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if self.key_name.is_none() {
            reasons.push("Missing required parameter: KEY_NAME".to_string());
        }
        if self.key_value.is_none() {
            reasons.push("Missing required parameter: KEY_VALUE".to_string());
        }
        reasons
    }

    fn require(&self) -> anyhow::Result<(&str, &str, &str)> {
        match (&self.table, &self.key_name, &self.key_value) {
            (Some(table), Some(key_name), Some(key_value)) => {
                Ok((table, key_name, key_value))
            }
            _ => anyhow::bail!("lookup parameters missing after validation"),
        }
    }
}

fn string_field(event: &Value, name: &str) -> Option<String> {
    match event.get(name) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

/// Fetches one item by partition key.
///
/// With `check_exists` set the result is wrapped in an existence report
/// instead of returning the raw item, which is what contact flows branch
/// on.
pub struct DynamoLookup {
    params: LookupParams,
    store: Arc<dyn TableStore>,
    check_exists: bool,
}

impl DynamoLookup {
    /// Fails when `TABLE_NAME` is absent so a misconfigured flow surfaces
    /// as a construction error rather than an empty lookup.
    pub fn new(event: &Value, store: Arc<dyn TableStore>) -> anyhow::Result<Self> {
        let params = LookupParams::from_event(event);
        if params.table.is_none() {
            anyhow::bail!("TABLE_NAME must be provided");
        }
        Ok(Self {
            params,
            store,
            check_exists: false,
        })
    }

    pub fn new_check(event: &Value, store: Arc<dyn TableStore>) -> anyhow::Result<Self> {
        let mut lookup = Self::new(event, store)?;
        lookup.check_exists = true;
        Ok(lookup)
    }
}

#[async_trait]
impl Strategy for DynamoLookup {
    fn validate(&self) -> Result<(), Rejection> {
        let reasons = self.params.missing_key_reasons();
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(Rejection::from_reasons(reasons))
        }
    }

    async fn operate(&self) -> anyhow::Result<Value> {
        let (table, key_name, key_value) = self.params.require()?;
        let item = self.store.get_item(table, key_name, key_value).await?;

        if self.check_exists {
            Ok(match item {
                Some(item) => json!({
                    "exists": true,
                    "message": format!("Item found for {key_name} = {key_value}"),
                    "item": item,
                }),
                None => json!({
                    "exists": false,
                    "message": format!("No item found for {key_name} = {key_value}"),
                    "item": null,
                }),
            })
        } else {
            Ok(item.map(Value::Object).unwrap_or(Value::Null))
        }
    }
}

/// Persists contact attributes emitted on the `detail.contactData` path
/// of contact event streams.
pub struct DynamoStoreAttributes {
    params: LookupParams,
    event: Value,
    store: Arc<dyn TableStore>,
}

/// Attributes copied from `detail.contactData` into the stored item.
const STORED_ATTRIBUTES: [&str; 5] = ["phone_number", "status", "timestamp", "type", "direction"];

impl DynamoStoreAttributes {
    pub fn new(event: &Value, store: Arc<dyn TableStore>) -> Self {
        Self {
            params: LookupParams::from_event(event),
            event: event.clone(),
            store,
        }
    }
}

#[async_trait]
impl Strategy for DynamoStoreAttributes {
    fn validate(&self) -> Result<(), Rejection> {
        let mut reasons = Vec::new();
        if self.params.table.is_none() {
            reasons.push("Missing required parameter: TABLE_NAME".to_string());
        }
        reasons.extend(self.params.missing_key_reasons());
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(Rejection::from_reasons(reasons))
        }
    }

    async fn operate(&self) -> anyhow::Result<Value> {
        let (table, key_name, key_value) = self.params.require()?;

        let contact = self
            .event
            .pointer("/detail/contactData")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let mut item = Map::new();
        for attribute in STORED_ATTRIBUTES {
            item.insert(
                attribute.to_string(),
                contact.get(attribute).cloned().unwrap_or(Value::Null),
            );
        }
        item.insert(key_name.to_string(), Value::String(key_value.to_string()));

        self.store.put_item(table, item.clone()).await?;
        Ok(Value::Object(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::mock::{object, MockTables};

    fn lookup_event() -> Value {
        json!({
            "TABLE_NAME": "contacts",
            "KEY_NAME": "pk",
            "KEY_VALUE": "customer-1",
        })
    }

    // ==================== DynamoLookup Tests ====================

    #[tokio::test]
    async fn test_lookup_returns_item() {
        let tables = Arc::new(MockTables::new().with_item(
            "contacts",
            "pk",
            "customer-1",
            object(json!({"pk": "customer-1", "name": "Ada"})),
        ));
        let lookup = DynamoLookup::new(&lookup_event(), tables).unwrap();

        assert!(lookup.validate().is_ok());
        let output = lookup.operate().await.unwrap();
        assert_eq!(output, json!({"pk": "customer-1", "name": "Ada"}));
    }

    #[tokio::test]
    async fn test_lookup_misses_return_null() {
        let lookup = DynamoLookup::new(&lookup_event(), Arc::new(MockTables::new())).unwrap();
        assert_eq!(lookup.operate().await.unwrap(), Value::Null);
    }

    #[test]
    fn test_construction_fails_without_table_name() {
        let event = json!({"KEY_NAME": "pk", "KEY_VALUE": "customer-1"});
        let error = DynamoLookup::new(&event, Arc::new(MockTables::new())).unwrap_err();
        assert_eq!(error.to_string(), "TABLE_NAME must be provided");
    }

    #[test]
    fn test_validate_collects_missing_keys() {
        let event = json!({"TABLE_NAME": "contacts"});
        let lookup = DynamoLookup::new(&event, Arc::new(MockTables::new())).unwrap();

        let rejection = lookup.validate().unwrap_err();
        assert_eq!(
            rejection.reasons,
            vec![
                "Missing required parameter: KEY_NAME",
                "Missing required parameter: KEY_VALUE",
            ]
        );
    }

    #[tokio::test]
    async fn test_numeric_key_value_is_stringified() {
        let event = json!({"TABLE_NAME": "contacts", "KEY_NAME": "pk", "KEY_VALUE": 42});
        let tables = Arc::new(MockTables::new().with_item(
            "contacts",
            "pk",
            "42",
            object(json!({"pk": "42"})),
        ));

        let output = DynamoLookup::new(&event, tables).unwrap().operate().await.unwrap();
        assert_eq!(output["pk"], "42");
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let tables = Arc::new(MockTables::new().failing_get());
        let lookup = DynamoLookup::new(&lookup_event(), tables).unwrap();

        let error = lookup.operate().await.unwrap_err();
        assert!(error.to_string().contains("scripted get_item failure"));
    }

    // ==================== DynamoLookupCheck Tests ====================

    #[tokio::test]
    async fn test_check_reports_existing_item() {
        let tables = Arc::new(MockTables::new().with_item(
            "contacts",
            "pk",
            "customer-1",
            object(json!({"pk": "customer-1"})),
        ));
        let check = DynamoLookup::new_check(&lookup_event(), tables).unwrap();

        let output = check.operate().await.unwrap();
        assert_eq!(output["exists"], true);
        assert_eq!(output["message"], "Item found for pk = customer-1");
        assert_eq!(output["item"], json!({"pk": "customer-1"}));
    }

    #[tokio::test]
    async fn test_check_reports_missing_item() {
        let check =
            DynamoLookup::new_check(&lookup_event(), Arc::new(MockTables::new())).unwrap();

        let output = check.operate().await.unwrap();
        assert_eq!(output["exists"], false);
        assert_eq!(output["message"], "No item found for pk = customer-1");
        assert_eq!(output["item"], Value::Null);
    }

    // ==================== DynamoStoreAttributes Tests ====================

    fn store_event() -> Value {
        json!({
            "TABLE_NAME": "contact-attributes",
            "KEY_NAME": "contact_id",
            "KEY_VALUE": "c-123",
            "detail": {
                "contactData": {
                    "phone_number": "+16502530000",
                    "status": "COMPLETED",
                    "timestamp": "2026-03-01T10:00:00Z",
                    "type": "VOICE",
                    "direction": "INBOUND",
                    "ignored_extra": "dropped",
                }
            }
        })
    }

    #[tokio::test]
    async fn test_store_writes_contact_attributes() {
        let tables = Arc::new(MockTables::new());
        let store = DynamoStoreAttributes::new(&store_event(), Arc::clone(&tables));

        assert!(store.validate().is_ok());
        let output = store.operate().await.unwrap();

        let expected = json!({
            "phone_number": "+16502530000",
            "status": "COMPLETED",
            "timestamp": "2026-03-01T10:00:00Z",
            "type": "VOICE",
            "direction": "INBOUND",
            "contact_id": "c-123",
        });
        assert_eq!(output, expected);

        let puts = tables.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, "contact-attributes");
        assert_eq!(Value::Object(puts[0].1.clone()), expected);
    }

    #[tokio::test]
    async fn test_store_fills_absent_attributes_with_null() {
        let event = json!({
            "TABLE_NAME": "contact-attributes",
            "KEY_NAME": "contact_id",
            "KEY_VALUE": "c-9",
            "detail": {"contactData": {"status": "QUEUED"}}
        });
        let store = DynamoStoreAttributes::new(&event, Arc::new(MockTables::new()));

        let output = store.operate().await.unwrap();
        assert_eq!(output["status"], "QUEUED");
        assert_eq!(output["phone_number"], Value::Null);
        assert_eq!(output["direction"], Value::Null);
    }

    #[test]
    fn test_store_validate_requires_all_parameters() {
        let store = DynamoStoreAttributes::new(&json!({}), Arc::new(MockTables::new()));

        let rejection = store.validate().unwrap_err();
        assert_eq!(
            rejection.reasons,
            vec![
                "Missing required parameter: TABLE_NAME",
                "Missing required parameter: KEY_NAME",
                "Missing required parameter: KEY_VALUE",
            ]
        );
    }
}
