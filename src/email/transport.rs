use axum::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Result of one outbound send. Always data, never a propagating error:
/// callers log failures and move on.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub success: bool,
    pub id: Option<String>,
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn ok(id: Option<String>) -> Self {
        Self {
            success: true,
            id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error.into()),
        }
    }
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> SendOutcome;
}

/// Production transport: posts to a Resend-compatible HTTP API.
pub struct ResendTransport {
    client: reqwest::Client,
    api_key: String,
    from: String,
    api_url: String,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

impl ResendTransport {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
            api_url: "https://api.resend.com/emails".to_string(),
        }
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    async fn send(&self, to: &str, subject: &str, html: &str) -> SendOutcome {
        let body = json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                let id = response
                    .json::<ResendResponse>()
                    .await
                    .ok()
                    .and_then(|r| r.id);
                SendOutcome::ok(id)
            }
            Ok(response) => {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                SendOutcome::failed(format!("Mail API returned {}: {}", status, detail))
            }
            Err(e) => SendOutcome::failed(format!("Mail API request failed: {}", e)),
        }
    }
}
