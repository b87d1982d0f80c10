//! Per-invocation trace identifier.

use lambda_runtime::Context;
use uuid::Uuid;

/// Trace id for one invocation: the runtime's request id, or a random
/// UUID when the runtime supplies none.
///
/// The id is attached to every log line as a structured field; it never
/// appears in the response itself.
pub fn for_invocation(context: &Context) -> String {
    from_request_id(&context.request_id)
}

fn from_request_id(request_id: &str) -> String {
    if request_id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        request_id.to_string()
    }
}
