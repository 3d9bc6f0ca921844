// src/store/blogger.rs
//! Blogger v3 REST adapter. Access tokens are minted from the configured
//! OAuth refresh token and cached until shortly before expiry.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{PostStore, StoreError};
use crate::config::BloggerConfig;
use crate::types::{ListPostsResponse, Post};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const API_BASE: &str = "https://www.googleapis.com/blogger/v3";
const REQUEST_TIMEOUT_SECS: u64 = 60;
// Refresh a minute early so an in-flight call never carries a stale token.
const TOKEN_EXPIRY_SLACK_SECS: u64 = 60;

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

pub struct BloggerStore {
    client: reqwest::Client,
    config: BloggerConfig,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expiry_secs")]
    expires_in: u64,
}

fn default_expiry_secs() -> u64 {
    3600
}

impl BloggerStore {
    pub fn new(config: BloggerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            config,
            token: Mutex::new(None),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(BloggerConfig::from_env()?)
    }

    fn posts_url(&self) -> String {
        format!("{}/blogs/{}/posts", API_BASE, self.config.blog_id)
    }

    async fn access_token(&self, operation: &'static str) -> Result<String, StoreError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.access_token.clone());
            }
        }

        debug!("refreshing blogger access token");
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", self.config.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|err| StoreError::new(operation, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(StoreError::new(
                operation,
                format!("token refresh returned {}: {}", status, body),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| StoreError::new(operation, err.to_string()))?;
        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_SLACK_SECS);
        *guard = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(token.access_token)
    }

    async fn check(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(StoreError::new(operation, format!("{}: {}", status, body)))
        }
    }
}

#[async_trait]
impl PostStore for BloggerStore {
    async fn create(
        &self,
        title: &str,
        html: &str,
        is_draft: bool,
        labels: &[String],
    ) -> Result<Post, StoreError> {
        let token = self.access_token("create").await?;
        let body = json!({
            "title": title,
            "content": html,
            "labels": labels,
        });
        let response = self
            .client
            .post(self.posts_url())
            .bearer_auth(token)
            .query(&[("isDraft", is_draft)])
            .json(&body)
            .send()
            .await
            .map_err(|err| StoreError::new("create", err.to_string()))?;
        let response = Self::check("create", response).await?;
        let post: Post = response
            .json()
            .await
            .map_err(|err| StoreError::new("create", err.to_string()))?;
        info!("created post {} ({})", post.id, post.status_or_dash());
        Ok(post)
    }

    async fn update(&self, post_id: &str, title: &str, html: &str) -> Result<Post, StoreError> {
        let token = self.access_token("update").await?;
        let body = json!({
            "title": title,
            "content": html,
        });
        let response = self
            .client
            .put(format!("{}/{}", self.posts_url(), post_id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|err| StoreError::new("update", err.to_string()))?;
        let response = Self::check("update", response).await?;
        response
            .json()
            .await
            .map_err(|err| StoreError::new("update", err.to_string()))
    }

    async fn get(&self, post_id: &str) -> Result<Post, StoreError> {
        let token = self.access_token("get").await?;
        let response = self
            .client
            .get(format!("{}/{}", self.posts_url(), post_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| StoreError::new("get", err.to_string()))?;
        let response = Self::check("get", response).await?;
        response
            .json()
            .await
            .map_err(|err| StoreError::new("get", err.to_string()))
    }

    async fn list(&self, max_results: usize) -> Result<Vec<Post>, StoreError> {
        let token = self.access_token("list").await?;
        let response = self
            .client
            .get(self.posts_url())
            .bearer_auth(token)
            .query(&[("maxResults", max_results)])
            .send()
            .await
            .map_err(|err| StoreError::new("list", err.to_string()))?;
        let response = Self::check("list", response).await?;
        let listing: ListPostsResponse = response
            .json()
            .await
            .map_err(|err| StoreError::new("list", err.to_string()))?;
        Ok(listing.items)
    }

    async fn delete(&self, post_id: &str) -> Result<(), StoreError> {
        let token = self.access_token("delete").await?;
        let response = self
            .client
            .delete(format!("{}/{}", self.posts_url(), post_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| StoreError::new("delete", err.to_string()))?;
        Self::check("delete", response).await?;
        Ok(())
    }
}
