//! Buttery API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::models::{DeleteConfirmation, MenuItem, Order, OrderStatus, User};
use super::ButteryApi;
use crate::error::{ApiError, ConfigError, Result};

/// Default backend host
pub const DEFAULT_API_HOST: &str = "https://buttery.example.edu";

/// Name of the session cookie issued after CAS login
const SESSION_COOKIE: &str = "connect.sid";

/// Buttery REST client
pub struct ButteryClient {
    http: HttpClient,
    base_url: String,
    session: Option<String>,
}

impl ButteryClient {
    /// Create a new client for `api_host`, authenticating with a CAS session cookie.
    pub fn new(api_host: &str, session: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: format!("{}/api", api_host.trim_end_matches('/')),
            session,
        })
    }

    /// Base URL requests are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid = || ConfigError::Invalid(format!("Invalid API host: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let session = self.session.as_deref().ok_or(ApiError::Unauthorized)?;

        let url = self.endpoint(segments)?;
        log::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, url)
            .header("Cookie", format!("{}={}", SESSION_COOKIE, session))
            .header("Accept", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK | StatusCode::CREATED => {
                let data = response.json::<T>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                Ok(data)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Resource not found".to_string());
                Err(ApiError::NotFound(error_msg).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

/// Query parameters for an optional buttery filter
fn buttery_query(buttery: Option<&str>) -> Vec<(&str, &str)> {
    buttery.map(|b| vec![("buttery", b)]).unwrap_or_default()
}

#[async_trait]
impl ButteryApi for ButteryClient {
    async fn current_user(&self) -> Result<User> {
        self.request::<_, ()>(Method::GET, &["auth", "user"], &[], None)
            .await
    }

    async fn list_menu_items(&self, buttery: Option<&str>) -> Result<Vec<MenuItem>> {
        self.request::<_, ()>(Method::GET, &["menu"], &buttery_query(buttery), None)
            .await
    }

    async fn list_orders(&self, buttery: Option<&str>) -> Result<Vec<Order>> {
        self.request::<_, ()>(Method::GET, &["orders"], &buttery_query(buttery), None)
            .await
    }

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> Result<Order> {
        #[derive(Serialize)]
        struct StatusBody {
            status: OrderStatus,
        }

        let segments = ["orders", order_id, "status"];
        self.request(Method::PUT, &segments, &[], Some(&StatusBody { status }))
            .await
    }

    async fn delete_menu_item(&self, item_id: &str) -> Result<DeleteConfirmation> {
        self.request::<_, ()>(Method::DELETE, &["menu", item_id], &[], None)
            .await
    }
}
