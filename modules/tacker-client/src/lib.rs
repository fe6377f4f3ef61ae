pub mod error;
pub mod types;

pub use error::{Result, TackerError};
pub use types::{Vnfd, VnfdAttributes, VnfdFields, VnfdRequest, VnfdResponse};

use types::ErrorEnvelope;

const API_VERSION: &str = "v1.0";

pub struct TackerClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl TackerClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    fn vnfds_url(&self) -> String {
        format!("{}/{}/vnfds", self.base_url, API_VERSION)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => builder.header("X-Auth-Token", token),
            None => builder,
        }
    }

    /// Create a VNFD record. The catalog assigns the id.
    pub async fn create_vnfd(&self, body: &VnfdRequest) -> Result<Vnfd> {
        let url = self.vnfds_url();
        tracing::debug!(url = url.as_str(), "Creating VNFD");

        let resp = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TackerError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let text = resp.text().await?;
        let parsed: VnfdResponse = serde_json::from_str(&text)?;
        Ok(parsed.vnfd)
    }

    /// Replace attributes of an existing VNFD record. The response body is
    /// only an acknowledgement and is not parsed.
    pub async fn update_vnfd(&self, vnfd_id: &str, body: &VnfdRequest) -> Result<()> {
        let url = format!("{}/{}", self.vnfds_url(), vnfd_id);
        tracing::debug!(url = url.as_str(), "Updating VNFD");

        let resp = self
            .authorize(self.client.put(&url))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TackerError::NotFound(vnfd_id.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TackerError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(())
    }
}

/// Pull the human-readable message out of a catalog error body, falling
/// back to the raw body for anything else.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.tacker_error.message,
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn error_message_unwraps_catalog_envelope() {
        let body = r#"{"TackerError": {"type": "InvalidInput", "message": "Invalid input for vnfd", "detail": ""}}"#;
        assert_eq!(error_message(body), "Invalid input for vnfd");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("502 Bad Gateway"), "502 Bad Gateway");
    }

    #[tokio::test]
    async fn create_vnfd_posts_envelope_with_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1.0/vnfds")
            .match_header("x-auth-token", "secret")
            .match_body(Matcher::Json(json!({
                "vnfd": {"name": "fw1", "description": "", "attributes": {"vnfd": "tosca"}}
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"vnfd": {"id": "abc123", "name": "fw1"}}"#)
            .create_async()
            .await;

        let client = TackerClient::new(&format!("{}/", server.url()), Some("secret"));
        let vnfd = client
            .create_vnfd(&VnfdRequest::create("fw1", "", Some("tosca".into())))
            .await
            .expect("create should succeed");

        mock.assert_async().await;
        assert_eq!(vnfd.id.as_deref(), Some("abc123"));
        assert_eq!(vnfd.name.as_deref(), Some("fw1"));
    }

    #[tokio::test]
    async fn create_vnfd_surfaces_api_error_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1.0/vnfds")
            .with_status(400)
            .with_body(r#"{"TackerError": {"type": "InvalidInput", "message": "Invalid input", "detail": ""}}"#)
            .create_async()
            .await;

        let client = TackerClient::new(&server.url(), None);
        let err = client
            .create_vnfd(&VnfdRequest::create("fw1", "", None))
            .await
            .unwrap_err();

        match err {
            TackerError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid input");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_vnfd_rejects_non_json_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1.0/vnfds")
            .with_status(201)
            .with_body("not json")
            .create_async()
            .await;

        let client = TackerClient::new(&server.url(), None);
        let err = client
            .create_vnfd(&VnfdRequest::create("fw1", "", None))
            .await
            .unwrap_err();
        assert!(matches!(err, TackerError::Parse(_)));
    }

    #[tokio::test]
    async fn create_vnfd_tolerates_non_string_id() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1.0/vnfds")
            .with_status(201)
            .with_body(r#"{"vnfd": {"id": true, "name": "fw1"}}"#)
            .create_async()
            .await;

        let client = TackerClient::new(&server.url(), None);
        let vnfd = client
            .create_vnfd(&VnfdRequest::create("fw1", "", None))
            .await
            .expect("a non-string id is not a parse failure");
        assert!(vnfd.id.is_none());
        assert_eq!(vnfd.name.as_deref(), Some("fw1"));
    }

    #[tokio::test]
    async fn update_vnfd_puts_attributes_by_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/v1.0/vnfds/abc123")
            .match_body(Matcher::Json(json!({"vnfd": {"attributes": {"vnfd": "canonical"}}})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = TackerClient::new(&server.url(), None);
        client
            .update_vnfd("abc123", &VnfdRequest::upload("canonical".into()))
            .await
            .expect("update should succeed");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("PUT", "/v1.0/vnfds/gone")
            .with_status(404)
            .with_body(r#"{"TackerError": {"type": "VNFDNotFound", "message": "VNFD gone could not be found", "detail": ""}}"#)
            .create_async()
            .await;

        let client = TackerClient::new(&server.url(), None);
        let err = client
            .update_vnfd("gone", &VnfdRequest::upload("canonical".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, TackerError::NotFound(ref id) if id == "gone"), "{err:?}");
    }
}
