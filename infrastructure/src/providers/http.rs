//! Shared HTTP plumbing for the provider adapters

use panel_domain::PanelError;
use panel_domain::selection::api_key_env_var;
use panel_domain::util::excerpt;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

const BODY_EXCERPT_BYTES: usize = 300;

/// Join a base URL and a path with exactly one `/`.
pub(crate) fn build_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) fn missing_api_key(provider: &str) -> PanelError {
    let var = api_key_env_var(provider);
    PanelError::api(provider, format!("Missing API key for provider '{}'", provider))
        .with_suggestion(format!("Set the {} environment variable", var))
        .with_example(format!("export {}=<your key>", var))
}

/// POST `body` as JSON and decode the JSON answer.
pub(crate) async fn post_json<Req, Res>(
    client: &Client,
    provider: &str,
    url: &str,
    headers: HeaderMap,
    body: &Req,
) -> Result<Res, PanelError>
where
    Req: Serialize + ?Sized,
    Res: DeserializeOwned,
{
    let response = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(|e| transport_error(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(provider, status, &body));
    }

    response.json::<Res>().await.map_err(|e| {
        PanelError::api(provider, format!("Unexpected response from {}: {}", provider, e))
            .with_cause(e)
    })
}

/// Map a transport failure. Connection problems and timeouts are
/// network errors; anything else is attributed to the provider.
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> PanelError {
    if err.is_connect() || err.is_timeout() {
        PanelError::network(format!("Could not reach {}: {}", provider, err))
            .with_provider(provider)
            .with_suggestion("Check your network connection and the provider base_url")
            .with_cause(err)
    } else {
        PanelError::api(provider, format!("Request to {} failed: {}", provider, err)).with_cause(err)
    }
}

/// Map a non-2xx HTTP status.
pub(crate) fn status_error(provider: &str, status: StatusCode, body: &str) -> PanelError {
    let detail = excerpt(body, BODY_EXCERPT_BYTES);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PanelError::api(
            provider,
            format!("Authentication failed ({}): {}", status.as_u16(), detail),
        )
        .with_suggestion(format!(
            "Check that {} holds a valid key",
            api_key_env_var(provider)
        )),
        StatusCode::TOO_MANY_REQUESTS => PanelError::api(
            provider,
            format!("Rate limit exceeded ({}): {}", status.as_u16(), detail),
        )
        .with_suggestion("Wait a moment and retry, or check your plan's quota"),
        _ => PanelError::api(
            provider,
            format!("Request failed with status {}: {}", status.as_u16(), detail),
        ),
    }
}
