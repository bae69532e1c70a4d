use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};

/// HTTP client used for all detail-page requests in one run.
pub fn client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .context("failed to build HTTP client")
}

/// Fetch one detail page.
///
/// `Ok(None)` means the page does not exist (404) and the entry is skipped
/// without noise. Any other unsuccessful status is an error the driver logs
/// and continues past; there is no retry.
pub async fn page(client: &Client, url: &str) -> Result<Option<String>> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request failed for {}", url))?;

    match response.status() {
        StatusCode::NOT_FOUND => Ok(None),
        status if status.is_success() => {
            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read body of {}", url))?;
            Ok(Some(body))
        }
        status => bail!("http status {} for {}", status.as_u16(), url),
    }
}
