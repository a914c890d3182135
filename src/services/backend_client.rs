use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::models::{
    AiChatRequest, AiReply, ChatDetail, ChatId, ChatPage, ErrorBody, ExportedChat, SaveChatRequest,
    SavedChat, SearchHit, UploadedFile, UserProfile,
};
use super::config_service::Config;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Flask's default session cookie name.
const SESSION_COOKIE_NAME: &str = "session";

/// The EchoBot REST API, as seen from the client.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn fetch_profile(&self) -> ClientResult<UserProfile>;

    async fn logout(&self) -> ClientResult<()>;

    /// `GET /api/chats`, most recent first.
    async fn list_chats(&self) -> ClientResult<ChatPage>;

    /// `GET /api/chats/search?q=`.
    async fn search_chats(&self, query: &str) -> ClientResult<Vec<SearchHit>>;

    async fn get_chat(&self, id: &ChatId) -> ClientResult<ChatDetail>;

    async fn delete_chat(&self, id: &ChatId) -> ClientResult<()>;

    async fn save_chat(&self, request: &SaveChatRequest) -> ClientResult<SavedChat>;

    /// Ask the backend's AI proxy for a reply. The backend stores the exchange.
    async fn send_ai_message(&self, request: &AiChatRequest) -> ClientResult<AiReply>;

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<UploadedFile>;

    async fn export_chats(&self) -> ClientResult<Vec<ExportedChat>>;
}

/// `ChatBackend` over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    session_cookie: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str, session_cookie: Option<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = Url::parse(base_url)?;
        // `Url::join` drops the last segment unless the path ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            session_cookie: session_cookie.filter(|cookie| !cookie.trim().is_empty()),
        })
    }

    pub fn from_config(config: &Config) -> ClientResult<Self> {
        Self::new(&config.base_url, config.session_cookie.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "backend request");

        let mut builder = self.client.request(method, url);
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(header::COOKIE, cookie_header(cookie));
        }
        Ok(builder)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> ClientResult<T> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(builder: RequestBuilder) -> ClientResult<()> {
        check_status(builder.send().await?).await?;
        Ok(())
    }
}

/// A bare cookie value is sent as the session cookie; `name=value` pairs pass through.
fn cookie_header(cookie: &str) -> String {
    if cookie.contains('=') {
        cookie.to_string()
    } else {
        format!("{}={}", SESSION_COOKIE_NAME, cookie)
    }
}

/// Turn non-success responses into `ClientError`, using the backend's
/// `{"error": "..."}` body when it sent one.
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let backend_message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error);

    tracing::debug!(status = status.as_u16(), "backend returned an error status");

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(
            backend_message.unwrap_or_else(|| "Resource not found".to_string()),
        ));
    }
    Err(ClientError::from_status(status.as_u16(), backend_message))
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn fetch_profile(&self) -> ClientResult<UserProfile> {
        Self::send_json(self.request(Method::GET, "api/profile")?).await
    }

    async fn logout(&self) -> ClientResult<()> {
        Self::send_empty(self.request(Method::POST, "api/auth/logout")?).await
    }

    async fn list_chats(&self) -> ClientResult<ChatPage> {
        Self::send_json(self.request(Method::GET, "api/chats")?).await
    }

    async fn search_chats(&self, query: &str) -> ClientResult<Vec<SearchHit>> {
        let path = format!("api/chats/search?q={}", urlencoding::encode(query));
        Self::send_json(self.request(Method::GET, &path)?).await
    }

    async fn get_chat(&self, id: &ChatId) -> ClientResult<ChatDetail> {
        let path = format!("api/chats/{}", urlencoding::encode(id.as_str()));
        Self::send_json(self.request(Method::GET, &path)?).await
    }

    async fn delete_chat(&self, id: &ChatId) -> ClientResult<()> {
        let path = format!("api/chats/{}", urlencoding::encode(id.as_str()));
        Self::send_empty(self.request(Method::DELETE, &path)?).await
    }

    async fn save_chat(&self, request: &SaveChatRequest) -> ClientResult<SavedChat> {
        Self::send_json(self.request(Method::POST, "api/chat")?.json(request)).await
    }

    async fn send_ai_message(&self, request: &AiChatRequest) -> ClientResult<AiReply> {
        Self::send_json(self.request(Method::POST, "api/ai/chat")?.json(request)).await
    }

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<UploadedFile> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        Self::send_json(self.request(Method::POST, "api/files")?.multipart(form)).await
    }

    async fn export_chats(&self) -> ClientResult<Vec<ExportedChat>> {
        Self::send_json(self.request(Method::GET, "api/chats/export")?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_the_base_path() {
        let backend = HttpBackend::new("http://localhost:5000/echobot", None).unwrap();
        assert_eq!(
            backend.endpoint("api/chats").unwrap().as_str(),
            "http://localhost:5000/echobot/api/chats"
        );
    }

    #[test]
    fn search_query_is_encoded() {
        let backend = HttpBackend::new("http://localhost:5000", None).unwrap();
        let path = format!("api/chats/search?q={}", urlencoding::encode("plan & go"));
        assert_eq!(
            backend.endpoint(&path).unwrap().as_str(),
            "http://localhost:5000/api/chats/search?q=plan%20%26%20go"
        );
    }

    #[test]
    fn bare_cookie_values_get_the_session_name() {
        assert_eq!(cookie_header("abc"), "session=abc");
        assert_eq!(cookie_header("remember_token=xyz"), "remember_token=xyz");
    }

    fn response(status: u16, body: &'static str) -> Response {
        Response::from(http::Response::builder().status(status).body(body).unwrap())
    }

    #[tokio::test]
    async fn server_errors_carry_the_backend_message() {
        let err = check_status(response(500, r#"{"error": "Search failed"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }));
        assert_eq!(err.to_string(), "Search failed");

        let err = check_status(response(502, "<html>bad gateway</html>")).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[tokio::test]
    async fn missing_resources_become_not_found() {
        let err = check_status(response(404, r#"{"error": "Chat not found"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref message) if message == "Chat not found"));

        let err = check_status(response(404, "")).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref message) if message == "Resource not found"));
    }

    #[tokio::test]
    async fn expired_sessions_are_unauthorized() {
        let err = check_status(response(401, r#"{"error": "Login required"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[tokio::test]
    async fn success_passes_the_body_through() {
        let ok = check_status(response(200, "[]")).await.unwrap();
        let hits: Vec<SearchHit> = ok.json().await.unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpBackend::new("not a url", None),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
