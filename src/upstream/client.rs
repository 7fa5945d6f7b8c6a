use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::error::{excerpt, FetchError};
use super::MealSource;
use crate::config::UpstreamConfig;

const LOG_EXCERPT_CHARS: usize = 150;
const DETAILS_EXCERPT_CHARS: usize = 500;

/// Client for the Strava.cz `objednavky` endpoint.
#[derive(Debug, Clone)]
pub struct StravaClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl StravaClient {
    pub fn new(config: UpstreamConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout())
            .build()
            .context("build upstream http client")?;
        Ok(Self { client, config })
    }

    fn cookie(&self) -> String {
        format!(
            "NEXT_LOCALE=cs; cislo={}; jmeno={}; sid={}",
            self.config.canteen_number, self.config.user_name, self.config.sid
        )
    }

    fn request_body(&self) -> Value {
        json!({
            "cislo": self.config.canteen_number,
            "sid": self.config.sid,
            "s5url": "",
            "lang": "CZ",
            "konto": 0,
            "podminka": "",
            "ignoreCert": "false",
        })
    }
}

#[async_trait]
impl MealSource for StravaClient {
    #[instrument(skip(self), fields(url = %self.config.url))]
    async fn fetch_meals(&self) -> Result<Value, FetchError> {
        let response = self
            .client
            .post(&self.config.url)
            .header(ACCEPT, "*/*")
            .header(ACCEPT_LANGUAGE, "cs-CZ,cs;q=0.9")
            .header(CONTENT_TYPE, "text/plain;charset=UTF-8")
            .header(COOKIE, self.cookie())
            .body(self.request_body().to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %excerpt(&text, LOG_EXCERPT_CHARS),
                "upstream returned error status"
            );
            return Err(FetchError::UpstreamStatus {
                status: status.as_u16(),
                body_excerpt: excerpt(&text, DETAILS_EXCERPT_CHARS),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("application/json") {
            let text = response.text().await.unwrap_or_default();
            warn!(
                content_type = %content_type,
                preview = %excerpt(&text, LOG_EXCERPT_CHARS),
                "upstream did not return JSON"
            );
            let content_type = if content_type.is_empty() {
                "unknown".to_string()
            } else {
                content_type
            };
            return Err(FetchError::UnexpectedContentType(content_type));
        }

        let bytes = response.bytes().await?;
        let payload = serde_json::from_slice::<Value>(&bytes)?;
        debug!(bytes = bytes.len(), "upstream payload received");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(url: String) -> UpstreamConfig {
        UpstreamConfig {
            url,
            canteen_number: "1234".into(),
            user_name: "novak".into(),
            sid: "s3cr3t".into(),
            timeout_secs: 5,
        }
    }

    async fn client_against(server: &MockServer) -> StravaClient {
        StravaClient::new(config_for(format!("{}/api/objednavky", server.uri())))
            .expect("client should build")
    }

    #[test]
    fn cookie_carries_session_credentials() {
        let client = StravaClient::new(config_for("http://localhost".into())).unwrap();
        assert_eq!(
            client.cookie(),
            "NEXT_LOCALE=cs; cislo=1234; jmeno=novak; sid=s3cr3t"
        );
    }

    #[tokio::test]
    async fn fetch_returns_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/objednavky"))
            .and(header("content-type", "text/plain;charset=UTF-8"))
            .and(header_exists("cookie"))
            .and(body_partial_json(json!({
                "cislo": "1234",
                "sid": "s3cr3t",
                "lang": "CZ",
                "konto": 0
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "table0": [{ "nazev": "Guláš" }] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let payload = client_against(&server).await.fetch_meals().await.unwrap();
        assert_eq!(payload["table0"][0]["nazev"], "Guláš");
    }

    #[tokio::test]
    async fn non_success_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(800)))
            .mount(&server)
            .await;

        let err = client_against(&server).await.fetch_meals().await.unwrap_err();
        match err {
            FetchError::UpstreamStatus {
                status,
                body_excerpt,
            } => {
                assert_eq!(status, 500);
                assert_eq!(body_excerpt.len(), 500);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn html_response_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html>login</html>", "text/html"),
            )
            .mount(&server)
            .await;

        let err = client_against(&server).await.fetch_meals().await.unwrap_err();
        assert!(
            matches!(err, FetchError::UnexpectedContentType(ref ct) if ct == "text/html"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn broken_json_is_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{\"table0\": [", "application/json"),
            )
            .mount(&server)
            .await;

        let err = client_against(&server).await.fetch_meals().await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedBody(_)), "{err:?}");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_transport_error() {
        let client = StravaClient::new(config_for("http://127.0.0.1:1/api/objednavky".into()))
            .unwrap();
        let err = client.fetch_meals().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
    }
}
