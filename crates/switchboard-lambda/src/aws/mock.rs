//! Scripted adapter stubs for strategy and handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::connect::{AgentContact, ConnectOps, ContactTimeline};
use super::dynamo::TableStore;

/// [`ConnectOps`] stub that replays scripted data and records calls.
///
/// Contacts are returned for the first `active_agent_contacts` call only,
/// so batch-count assertions do not multiply the contact list.
#[derive(Default)]
pub struct MockConnect {
    routing_profiles: Vec<String>,
    contacts: Vec<AgentContact>,
    timelines: HashMap<String, ContactTimeline>,
    fail_stop_for: Vec<String>,
    pub batches: Mutex<Vec<usize>>,
    pub stopped: Mutex<Vec<String>>,
}

impl MockConnect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_routing_profiles(mut self, count: usize) -> Self {
        self.routing_profiles = (0..count)
            .map(|index| {
                format!(
                    "arn:aws:connect:eu-west-1:123456789012:instance/inst-1/routing-profile/rp-{index}"
                )
            })
            .collect();
        self
    }

    pub fn with_contact(mut self, contact: AgentContact) -> Self {
        self.contacts.push(contact);
        self
    }

    pub fn with_timeline(mut self, contact_id: &str, timeline: ContactTimeline) -> Self {
        self.timelines.insert(contact_id.to_string(), timeline);
        self
    }

    pub fn failing_stop_for(mut self, contact_id: &str) -> Self {
        self.fail_stop_for.push(contact_id.to_string());
        self
    }
}

#[async_trait]
impl ConnectOps for MockConnect {
    async fn list_routing_profile_arns(&self, _instance_id: &str) -> Result<Vec<String>> {
        Ok(self.routing_profiles.clone())
    }

    async fn active_agent_contacts(
        &self,
        _instance_id: &str,
        routing_profile_arns: &[String],
    ) -> Result<Vec<AgentContact>> {
        let mut batches = self.batches.lock().unwrap();
        batches.push(routing_profile_arns.len());
        let first_batch = batches.len() == 1;
        drop(batches);

        if first_batch {
            Ok(self.contacts.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn contact_timeline(
        &self,
        _instance_id: &str,
        contact_id: &str,
    ) -> Result<ContactTimeline> {
        self.timelines
            .get(contact_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no timeline scripted for {contact_id}"))
    }

    async fn stop_contact(&self, _instance_id: &str, contact_id: &str) -> Result<()> {
        if self.fail_stop_for.iter().any(|id| id == contact_id) {
            anyhow::bail!("stop_contact refused for {contact_id}");
        }
        self.stopped.lock().unwrap().push(contact_id.to_string());
        Ok(())
    }
}

/// [`TableStore`] stub over an in-memory map keyed by
/// `(table, key_name, key_value)`.
#[derive(Default)]
pub struct MockTables {
    items: HashMap<(String, String, String), Map<String, Value>>,
    fail_get: bool,
    pub puts: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl MockTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(
        mut self,
        table: &str,
        key_name: &str,
        key_value: &str,
        item: Map<String, Value>,
    ) -> Self {
        self.items.insert(
            (table.to_string(), key_name.to_string(), key_value.to_string()),
            item,
        );
        self
    }

    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }
}

#[async_trait]
impl TableStore for MockTables {
    async fn get_item(
        &self,
        table: &str,
        key_name: &str,
        key_value: &str,
    ) -> Result<Option<Map<String, Value>>> {
        if self.fail_get {
            anyhow::bail!("scripted get_item failure");
        }
        let key = (table.to_string(), key_name.to_string(), key_value.to_string());
        Ok(self.items.get(&key).cloned())
    }

    async fn put_item(&self, table: &str, item: Map<String, Value>) -> Result<()> {
        self.puts.lock().unwrap().push((table.to_string(), item));
        Ok(())
    }
}

/// Unwrap a `json!` object literal into the map shape adapters trade in.
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other:?}"),
    }
}
