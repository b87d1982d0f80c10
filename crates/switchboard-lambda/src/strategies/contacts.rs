//! Sweep for Amazon Connect contacts stuck in the connected state.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use switchboard_core::{Rejection, Strategy};
use tracing::{info, warn};

use crate::aws::connect::{AgentContact, ConnectOps};

/// Contacts connected to an agent longer than this are sweep candidates.
const MAX_CONTACT_ACTIVE_HOURS: i64 = 2;

/// Routing profile ARNs per user-data query, the API's filter limit.
const ROUTING_PROFILE_BATCH: usize = 100;

/// Outcome of examining one sweep candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepOutcome {
    Disconnected,
    InProgress,
    AlreadyDisconnected,
}

impl SweepOutcome {
    fn as_str(self) -> &'static str {
        match self {
            SweepOutcome::Disconnected => "Disconnected",
            SweepOutcome::InProgress => "In_Progress",
            SweepOutcome::AlreadyDisconnected => "Already_Disconnected",
        }
    }
}

#[derive(Default)]
struct SweepSummary {
    total_contacts_processed: usize,
    disconnected: usize,
    in_progress: usize,
    already_disconnected: usize,
    failed: usize,
}

/// Disconnects contacts that have sat connected past the activity
/// threshold, typically agents who closed their workstation without
/// ending the call.
///
/// Runs from a scheduled contact flow. Per-contact failures are counted
/// and skipped so one bad contact cannot abort the sweep.
pub struct ContactCleanup {
    connect: Arc<dyn ConnectOps>,
    region: Option<String>,
    instance_id: Option<String>,
}

impl ContactCleanup {
    pub fn new(
        connect: Arc<dyn ConnectOps>,
        region: Option<String>,
        instance_id: Option<String>,
    ) -> Self {
        Self {
            connect,
            region,
            instance_id,
        }
    }

    /// Reads `REGION` and `INSTANCE_ID` from the process environment.
    pub fn from_env(connect: Arc<dyn ConnectOps>) -> Self {
        Self::new(
            connect,
            env_setting("REGION"),
            env_setting("INSTANCE_ID"),
        )
    }

    async fn sweep_contact(
        &self,
        instance_id: &str,
        contact_id: &str,
        now: DateTime<Utc>,
        threshold: Duration,
    ) -> anyhow::Result<SweepOutcome> {
        let timeline = self.connect.contact_timeline(instance_id, contact_id).await?;

        if timeline.disconnected_at.is_some() {
            return Ok(SweepOutcome::AlreadyDisconnected);
        }

        match timeline.last_updated_at {
            Some(last_updated) if now - last_updated >= threshold => {
                self.connect.stop_contact(instance_id, contact_id).await?;
                Ok(SweepOutcome::Disconnected)
            }
            Some(_) => Ok(SweepOutcome::InProgress),
            None => anyhow::bail!("contact has no last-update timestamp"),
        }
    }
}

fn env_setting(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn is_stale(contact: &AgentContact, now: DateTime<Utc>, threshold: Duration) -> bool {
    if contact.state.as_deref() != Some("CONNECTED") {
        return false;
    }
    match contact.connected_to_agent_at {
        Some(connected_at) => now - connected_at >= threshold,
        None => {
            warn!(
                contact_id = %contact.contact_id,
                "contact has no connected timestamp, skipping"
            );
            false
        }
    }
}

#[async_trait]
impl Strategy for ContactCleanup {
    fn validate(&self) -> Result<(), Rejection> {
        let mut reasons = Vec::new();
        if self.region.is_none() {
            reasons.push("REGION environment variable is not set".to_string());
        }
        if self.instance_id.is_none() {
            reasons.push("INSTANCE_ID environment variable is not set".to_string());
        }
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(Rejection::from_reasons(reasons))
        }
    }

    async fn operate(&self) -> anyhow::Result<Value> {
        let Some(instance_id) = &self.instance_id else {
            anyhow::bail!("INSTANCE_ID missing after validation");
        };

        let now = Utc::now();
        let threshold = Duration::hours(MAX_CONTACT_ACTIVE_HOURS);

        let arns = self.connect.list_routing_profile_arns(instance_id).await?;
        info!(routing_profiles = arns.len(), "listed routing profiles");

        let mut candidates = Vec::new();
        for batch in arns.chunks(ROUTING_PROFILE_BATCH) {
            let contacts = self.connect.active_agent_contacts(instance_id, batch).await?;
            candidates.extend(contacts);
        }
        info!(active_contacts = candidates.len(), "collected connected contacts");

        let mut summary = SweepSummary::default();
        let mut details = Vec::new();

        for contact in candidates
            .iter()
            .filter(|contact| is_stale(contact, now, threshold))
        {
            summary.total_contacts_processed += 1;

            match self
                .sweep_contact(instance_id, &contact.contact_id, now, threshold)
                .await
            {
                Ok(outcome) => {
                    match outcome {
                        SweepOutcome::Disconnected => summary.disconnected += 1,
                        SweepOutcome::InProgress => summary.in_progress += 1,
                        SweepOutcome::AlreadyDisconnected => {
                            summary.already_disconnected += 1
                        }
                    }
                    details.push(json!({
                        "contact_id": contact.contact_id,
                        "status": outcome.as_str(),
                    }));
                }
                Err(error) => {
                    warn!(
                        contact_id = %contact.contact_id,
                        error = %error,
                        "failed to sweep contact"
                    );
                    summary.failed += 1;
                    details.push(json!({
                        "contact_id": contact.contact_id,
                        "status": "Failed",
                        "error": format!("{error:#}"),
                    }));
                }
            }
        }

        info!(
            processed = summary.total_contacts_processed,
            disconnected = summary.disconnected,
            failed = summary.failed,
            "contact sweep finished"
        );

        Ok(json!({
            "status": "Success",
            "message": "Contact cleanup completed",
            "summary": {
                "total_contacts_processed": summary.total_contacts_processed,
                "disconnected": summary.disconnected,
                "in_progress": summary.in_progress,
                "already_disconnected": summary.already_disconnected,
                "failed": summary.failed,
            },
            "contact_details": details,
        }))
    }
}
