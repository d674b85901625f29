use anyhow::Context as _;
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::SignupError;

/// Map a non-2xx response to `SignupError::Upstream` carrying the response body.
pub async fn ensure_success(
    resp: Response,
    context: &'static str,
) -> Result<Response, SignupError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SignupError::Upstream {
        context,
        status: status.as_u16(),
        body,
    })
}

pub async fn read_json<T>(resp: Response, context: &'static str) -> Result<T, SignupError>
where
    T: DeserializeOwned,
{
    let resp = ensure_success(resp, context).await?;
    Ok(resp.json::<T>().await.context(context)?)
}
