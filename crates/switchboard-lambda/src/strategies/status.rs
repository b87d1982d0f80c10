//! Health check strategies, one registration per invocation source.

use async_trait::async_trait;
use serde_json::{json, Value};
use switchboard_core::{Rejection, Strategy};

/// Reports the entry point as reachable for one invocation source.
///
/// The Amazon Connect variant keeps its response flat because contact
/// flows can only read first-level attributes; the other variants echo
/// the sanitized payload for debugging from the caller's side.
pub struct StatusChecker {
    service: &'static str,
    echo_event: bool,
    event: Value,
}

impl StatusChecker {
    pub fn amazon_connect(event: &Value) -> Self {
        Self {
            service: "amazon_connect",
            echo_event: false,
            event: event.clone(),
        }
    }

    pub fn api_gateway_rest(event: &Value) -> Self {
        Self::echoing("api_gateway_rest", event)
    }

    pub fn api_gateway_http(event: &Value) -> Self {
        Self::echoing("api_gateway_http", event)
    }

    pub fn function_url(event: &Value) -> Self {
        Self::echoing("function_url", event)
    }

    pub fn s3(event: &Value) -> Self {
        Self::echoing("s3", event)
    }

    fn echoing(service: &'static str, event: &Value) -> Self {
        Self {
            service,
            echo_event: true,
            event: event.clone(),
        }
    }
}

#[async_trait]
impl Strategy for StatusChecker {
    fn validate(&self) -> Result<(), Rejection> {
        Ok(())
    }

    async fn operate(&self) -> anyhow::Result<Value> {
        let mut payload = json!({
            "statusCode": 200,
            "service": self.service,
            "status": "healthy",
        });
        if self.echo_event {
            payload["event"] = self.event.clone();
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_variant_reports_healthy_without_event() {
        let checker = StatusChecker::amazon_connect(&json!({"request_type": "StatusCheckerConnect"}));

        assert!(checker.validate().is_ok());
        let output = checker.operate().await.unwrap();

        assert_eq!(
            output,
            json!({"statusCode": 200, "service": "amazon_connect", "status": "healthy"})
        );
    }

    #[tokio::test]
    async fn test_gateway_variant_echoes_event() {
        let event = json!({"request_type": "StatusCheckerApiGatewayRest", "stage": "prod"});
        let output = StatusChecker::api_gateway_rest(&event).operate().await.unwrap();

        assert_eq!(output["service"], "api_gateway_rest");
        assert_eq!(output["status"], "healthy");
        assert_eq!(output["event"], event);
    }

    #[tokio::test]
    async fn test_each_variant_carries_its_service_tag() {
        let event = json!({});
        for (checker, tag) in [
            (StatusChecker::api_gateway_http(&event), "api_gateway_http"),
            (StatusChecker::function_url(&event), "function_url"),
            (StatusChecker::s3(&event), "s3"),
        ] {
            let output = checker.operate().await.unwrap();
            assert_eq!(output["service"], tag);
        }
    }
}
