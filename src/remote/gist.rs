//! GitHub Gists backend
//!
//! Each backup becomes a new private gist holding a single file named after
//! the document (`AddressBook.bak`). The gist id is the reference.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{AuthToken, Reference, ReferenceStorage};
use crate::error::{PlannerError, PlannerResult};
use crate::models::DocumentKind;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const CLIENT_AGENT: &str = concat!("planner-cli/", env!("CARGO_PKG_VERSION"));

/// Client for the GitHub Gists REST API
#[derive(Debug, Clone)]
pub struct GistStorage {
    api_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct CreatedGist {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Gist {
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    raw_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GistStorage {
    /// Create a client for the API rooted at `api_url`
    pub fn new(api_url: &str, timeout: Duration) -> PlannerResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn authorized(&self, request: RequestBuilder, token: &AuthToken) -> PlannerResult<RequestBuilder> {
        if token.is_blank() {
            return Err(PlannerError::Auth(
                "A GitHub personal access token is required".into(),
            ));
        }
        Ok(request
            .bearer_auth(token.expose())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_AGENT))
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> PlannerResult<Response> {
        let response = request.send().await.map_err(|e| transport_error(&e))?;
        let status = response.status();
        debug!(status = %status, what, "GitHub responded");

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(status_error(status, &body, what))
        }
    }
}

#[async_trait]
impl ReferenceStorage for GistStorage {
    fn service_name(&self) -> &str {
        "GitHub Gists"
    }

    async fn save(
        &self,
        content: &str,
        name: &str,
        description: &str,
        token: &AuthToken,
    ) -> PlannerResult<Reference> {
        let url = format!("{}/gists", self.api_url);
        let request = self
            .authorized(self.http.post(&url), token)?
            .json(&gist_payload(content, name, description));

        let response = self.send(request, name).await?;
        let created: CreatedGist = response
            .json()
            .await
            .map_err(|e| PlannerError::RemoteService(format!("Unexpected gist response: {}", e)))?;

        Ok(Reference::new(created.id))
    }

    async fn read(
        &self,
        reference: &Reference,
        kind: DocumentKind,
        token: &AuthToken,
    ) -> PlannerResult<String> {
        let url = format!("{}/gists/{}", self.api_url, reference);
        let request = self.authorized(self.http.get(&url), token)?;
        let what = format!("gist {}", reference);

        let response = self.send(request, &what).await?;
        let body = response.text().await.map_err(|e| transport_error(&e))?;
        let gist: Gist = serde_json::from_str(&body)
            .map_err(|e| PlannerError::RemoteService(format!("Unexpected gist response: {}", e)))?;

        match file_content(&gist, kind)? {
            FileContent::Inline(text) => Ok(text),
            FileContent::Raw(raw_url) => {
                // Large files are truncated in the gist listing; fetch them whole
                let request = self.authorized(self.http.get(&raw_url), token)?;
                let response = self.send(request, &what).await?;
                response.text().await.map_err(|e| transport_error(&e))
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FileContent {
    Inline(String),
    Raw(String),
}

fn gist_payload(content: &str, name: &str, description: &str) -> serde_json::Value {
    let mut files = serde_json::Map::new();
    files.insert(name.to_string(), json!({ "content": content }));

    json!({
        "description": description,
        "public": false,
        "files": files,
    })
}

fn file_content(gist: &Gist, kind: DocumentKind) -> PlannerResult<FileContent> {
    let name = kind.remote_file_name();
    let file = gist
        .files
        .get(&name)
        .ok_or_else(|| PlannerError::backup_not_found(name.clone()))?;

    match (file.truncated, &file.raw_url, &file.content) {
        (true, Some(raw_url), _) => Ok(FileContent::Raw(raw_url.clone())),
        (_, _, Some(content)) => Ok(FileContent::Inline(content.clone())),
        _ => Err(PlannerError::RemoteService(format!(
            "{} has no content in the gist",
            name
        ))),
    }
}

fn status_error(status: StatusCode, body: &str, what: &str) -> PlannerError {
    let message = serde_json::from_str::<ApiError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PlannerError::Auth(message),
        StatusCode::NOT_FOUND => PlannerError::backup_not_found(what),
        _ => PlannerError::RemoteService(format!("{} ({})", message, status.as_u16())),
    }
}

fn transport_error(err: &reqwest::Error) -> PlannerError {
    if err.is_timeout() {
        PlannerError::Network(format!("Request timed out: {}", err))
    } else {
        PlannerError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gist(json: &str) -> Gist {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_payload_is_private_single_file() {
        let payload = gist_payload("{}", "AddressBook.bak", "Address Book Backup");
        assert_eq!(payload["public"], false);
        assert_eq!(payload["description"], "Address Book Backup");
        assert_eq!(payload["files"]["AddressBook.bak"]["content"], "{}");
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"message": "Bad credentials"}"#;
        assert_eq!(
            status_error(StatusCode::UNAUTHORIZED, body, "x"),
            PlannerError::Auth("Bad credentials".into())
        );
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "", "x"),
            PlannerError::Auth(_)
        ));
        assert!(status_error(StatusCode::NOT_FOUND, "", "gist abc").is_not_found());

        let err = status_error(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"Validation Failed"}"#, "x");
        assert_eq!(err, PlannerError::RemoteService("Validation Failed (422)".into()));
    }

    #[test]
    fn test_file_content_inline_and_truncated() {
        let inline = gist(r#"{"files": {"AddressBook.bak": {"content": "{\"persons\": []}"}}}"#);
        assert_eq!(
            file_content(&inline, DocumentKind::AddressBook).unwrap(),
            FileContent::Inline("{\"persons\": []}".into())
        );

        let truncated = gist(
            r#"{"files": {"ExpenseBook.bak": {"content": "{", "truncated": true, "raw_url": "https://raw/e"}}}"#,
        );
        assert_eq!(
            file_content(&truncated, DocumentKind::ExpenseBook).unwrap(),
            FileContent::Raw("https://raw/e".into())
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let other = gist(r#"{"files": {"ExpenseBook.bak": {"content": "{}"}}}"#);
        let err = file_content(&other, DocumentKind::AddressBook).unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_blank_token_fails_before_any_request() {
        let storage = GistStorage::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = storage
            .save("{}", "AddressBook.bak", "Address Book Backup", &AuthToken::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::Auth(_)));
    }
}
