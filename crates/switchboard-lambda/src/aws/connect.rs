//! Amazon Connect operations used by the contact sweep.

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_connect::primitives::DateTime as AwsDateTime;
use aws_sdk_connect::types::{ContactFilter, ContactState, DisconnectReason, UserDataFilters};
use aws_sdk_connect::Client;
use chrono::{DateTime, Utc};

/// One contact currently handled by an agent, as reported by the
/// user-data query.
#[derive(Debug, Clone)]
pub struct AgentContact {
    pub contact_id: String,
    /// Contact state string as reported by Connect, e.g. `CONNECTED`.
    pub state: Option<String>,
    pub connected_to_agent_at: Option<DateTime<Utc>>,
}

/// Timestamps from `DescribeContact` that decide a contact's fate.
#[derive(Debug, Clone)]
pub struct ContactTimeline {
    pub disconnected_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// The subset of the Amazon Connect API the sweep needs.
#[async_trait]
pub trait ConnectOps: Send + Sync {
    /// ARNs of every routing profile on the instance.
    async fn list_routing_profile_arns(&self, instance_id: &str) -> Result<Vec<String>>;

    /// Contacts in the `CONNECTED` state for agents on the given routing
    /// profiles.
    async fn active_agent_contacts(
        &self,
        instance_id: &str,
        routing_profile_arns: &[String],
    ) -> Result<Vec<AgentContact>>;

    /// Disconnect and last-update timestamps for one contact.
    async fn contact_timeline(
        &self,
        instance_id: &str,
        contact_id: &str,
    ) -> Result<ContactTimeline>;

    /// Force-stop a contact.
    async fn stop_contact(&self, instance_id: &str, contact_id: &str) -> Result<()>;
}

/// [`ConnectOps`] backed by the AWS SDK client.
pub struct SdkConnect {
    client: Client,
}

impl SdkConnect {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConnectOps for SdkConnect {
    async fn list_routing_profile_arns(&self, instance_id: &str) -> Result<Vec<String>> {
        let mut arns = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self.client.list_routing_profiles().instance_id(instance_id);
            if let Some(token) = &next_token {
                request = request.next_token(token);
            }
            let page = request.send().await?;

            for summary in page.routing_profile_summary_list() {
                if let Some(arn) = summary.arn() {
                    arns.push(arn.to_string());
                }
            }

            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(arns)
    }

    async fn active_agent_contacts(
        &self,
        instance_id: &str,
        routing_profile_arns: &[String],
    ) -> Result<Vec<AgentContact>> {
        let filters = UserDataFilters::builder()
            .set_routing_profiles(Some(routing_profile_arns.to_vec()))
            .contact_filter(
                ContactFilter::builder()
                    .contact_states(ContactState::Connected)
                    .build(),
            )
            .build();

        let mut contacts = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get_current_user_data()
                .instance_id(instance_id)
                .filters(filters.clone());
            if let Some(token) = &next_token {
                request = request.next_token(token);
            }
            let page = request.send().await?;

            for user_data in page.user_data_list() {
                for reference in user_data.contacts() {
                    let Some(contact_id) = reference.contact_id() else {
                        continue;
                    };
                    contacts.push(AgentContact {
                        contact_id: contact_id.to_string(),
                        state: reference
                            .agent_contact_state()
                            .map(|state| state.as_str().to_string()),
                        connected_to_agent_at: reference
                            .connected_to_agent_timestamp()
                            .and_then(to_utc),
                    });
                }
            }

            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(contacts)
    }

    async fn contact_timeline(
        &self,
        instance_id: &str,
        contact_id: &str,
    ) -> Result<ContactTimeline> {
        let output = self
            .client
            .describe_contact()
            .instance_id(instance_id)
            .contact_id(contact_id)
            .send()
            .await?;

        let contact = output.contact();
        Ok(ContactTimeline {
            disconnected_at: contact.and_then(|c| c.disconnect_timestamp()).and_then(to_utc),
            last_updated_at: contact
                .and_then(|c| c.last_update_timestamp())
                .and_then(to_utc),
        })
    }

    async fn stop_contact(&self, instance_id: &str, contact_id: &str) -> Result<()> {
        self.client
            .stop_contact()
            .instance_id(instance_id)
            .contact_id(contact_id)
            .disconnect_reason(DisconnectReason::builder().code("OTHERS").build())
            .send()
            .await?;
        Ok(())
    }
}

fn to_utc(timestamp: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}
