//! Phone number validation via the `phonenumber` crate.

use async_trait::async_trait;
use serde_json::{json, Value};
use switchboard_core::{Rejection, Strategy};

/// Validates `phone_number` from the event and reports its country
/// breakdown.
///
/// Numbers are expected in E.164; a missing leading `+` is tolerated and
/// prefixed before parsing. Unparseable input is still a successful
/// operation, reported as `validationResult: "Error"`.
pub struct PhoneNumberFormat {
    phone_number: Option<String>,
}

impl PhoneNumberFormat {
    pub fn new(event: &Value) -> Self {
        let phone_number = match event.get("phone_number") {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        };
        Self { phone_number }
    }
}

#[async_trait]
impl Strategy for PhoneNumberFormat {
    fn validate(&self) -> Result<(), Rejection> {
        match &self.phone_number {
            Some(number) if !number.is_empty() => Ok(()),
            _ => Err(Rejection::new("Phone number is required in event")),
        }
    }

    async fn operate(&self) -> anyhow::Result<Value> {
        let Some(raw) = &self.phone_number else {
            anyhow::bail!("phone number missing after validation");
        };

        let normalized = if raw.starts_with('+') {
            raw.clone()
        } else {
            format!("+{raw}")
        };

        match phonenumber::parse(None, &normalized) {
            Ok(parsed) => {
                let valid = phonenumber::is_valid(&parsed);
                Ok(json!({
                    "validationResult": if valid { "Valid" } else { "Invalid" },
                    "countryCode": parsed.code().value(),
                    "regionCode": parsed.country().id().map(|id| format!("{id:?}")),
                    "phoneNumber": parsed.national().value().to_string(),
                }))
            }
            Err(error) => Ok(json!({
                "validationResult": "Error",
                "failedReason": error.to_string(),
            })),
        }
    }
}
