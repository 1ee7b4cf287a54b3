//! HTTP client for network-based API calls

use crate::{ClientConfig, ClientError, ClientResult, LoginResponse};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::client::LoginRequest;
use shared::error::{ApiResponse, ErrorCode};

/// HTTP client for making requests to the Señor Arroz backend
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    refresh_token: Option<String>,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            token: config.token.clone(),
            refresh_token: config.refresh_token.clone(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Set the authentication token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_header() {
            Some(auth) => req.header(reqwest::header::AUTHORIZATION, auth),
            None => req,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.authorize(self.client.get(self.url(path)));
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.authorize(self.client.post(self.url(path)).json(body));
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.authorize(self.client.put(self.url(path)).json(body));
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request, discarding any response body
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let req = self.authorize(self.client.delete(self.url(path)));
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(classify_failure(status, &text));
        }
        Ok(())
    }

    /// Handle the HTTP response
    ///
    /// Accepts both bare entities and entities wrapped in [`ApiResponse`].
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = %status, "Request failed");
            return Err(classify_failure(status, &text));
        }

        decode_body(&text)
    }

    // ========== Auth API ==========

    /// Login with username and password, keeping the returned tokens
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("api/auth/login", &request).await?;
        self.token = Some(response.token.clone());
        self.refresh_token = response.refresh_token.clone();
        tracing::info!(user_id = response.user.id, role = %response.user.role, "Logged in");
        Ok(response)
    }

    /// Exchange the refresh token for a new bearer token
    pub async fn refresh(&mut self) -> ClientResult<LoginResponse> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct RefreshRequest<'a> {
            refresh_token: &'a str,
        }

        let refresh_token = self
            .refresh_token
            .clone()
            .ok_or_else(|| ClientError::Unauthorized("Missing refresh token".into()))?;
        let response: LoginResponse = self
            .post(
                "api/auth/refresh",
                &RefreshRequest {
                    refresh_token: &refresh_token,
                },
            )
            .await?;
        self.token = Some(response.token.clone());
        if response.refresh_token.is_some() {
            self.refresh_token = response.refresh_token.clone();
        }
        tracing::debug!("Token refreshed");
        Ok(response)
    }

    /// Forget both tokens
    pub fn logout(&mut self) {
        self.token = None;
        self.refresh_token = None;
    }
}

/// Decode a success body, unwrapping the [`ApiResponse`] envelope when present
pub(crate) fn decode_body<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
    let value: serde_json::Value = if text.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(text)?
    };

    let is_envelope = value
        .as_object()
        .is_some_and(|obj| {
            obj.contains_key("data") && (obj.contains_key("code") || obj.contains_key("message"))
        });

    if is_envelope {
        let envelope: ApiResponse<T> = serde_json::from_value(value)?;
        return match envelope.into_result() {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(ClientError::InvalidResponse("Missing response data".into())),
            Err(err) => Err(ClientError::Api {
                code: err.code,
                message: err.message,
                details: err
                    .details
                    .map(|d| serde_json::Value::Object(d.into_iter().collect())),
            }),
        };
    }

    Ok(serde_json::from_value(value)?)
}

/// Map a failed response into a [`ClientError`]
pub(crate) fn classify_failure(status: StatusCode, text: &str) -> ClientError {
    // 尝试解析为 API 错误响应
    if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(text)
        && let Some(code) = envelope.code.and_then(|c| ErrorCode::try_from(c).ok())
        && !code.is_success()
    {
        return ClientError::Api {
            code,
            message: envelope.message,
            details: envelope
                .details
                .map(|d| serde_json::Value::Object(d.into_iter().collect())),
        };
    }

    // 降级到原来的处理方式
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(text.to_string()),
        StatusCode::FORBIDDEN => ClientError::Forbidden(text.to_string()),
        StatusCode::NOT_FOUND => ClientError::NotFound(text.to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(text.to_string())
        }
        _ => ClientError::Internal(format!("{}: {}", status, text)),
    }
}
