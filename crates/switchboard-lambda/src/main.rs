//! Multi-channel AWS Lambda entry point.
//!
//! Classifies the incoming event by trigger source, sanitizes it, and
//! dispatches to the strategy named by its `request_type` field.

use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    switchboard_lambda::run().await
}
