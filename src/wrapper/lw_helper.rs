use serde::de::DeserializeOwned;

use crate::types;
use crate::types::WrapperError;
use crate::wrapper::request_data::LearnResponse;

/// Processes a response from the resulting JSON. The status code is not checked, since the
/// portal reports failures through the payload itself.
///
/// # Parameters
/// - `res`: The response.
/// - `what`: What was requested, for the error message.
///
/// # Returns
/// The deserialized body, or `InvalidResponse` if the body does not have the expected shape.
pub(crate) fn process_json<T: DeserializeOwned>(
    res: &LearnResponse,
    what: &str,
) -> types::Result<T> {
    serde_json::from_str::<T>(&res.body).map_err(|e| {
        WrapperError::InvalidResponse(format!(
            "could not read {what} (status {}): {e}",
            res.status
        ))
    })
}
