// src/types/post.rs
use serde::{Deserialize, Serialize};

/// One blog post as the remote store reports it. The store owns the record;
/// this is a transient copy held to report an outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl Post {
    pub fn url_or_dash(&self) -> &str {
        self.url.as_deref().unwrap_or("-")
    }

    pub fn status_or_dash(&self) -> &str {
        self.status.as_deref().unwrap_or("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPostsResponse {
    #[serde(default)]
    pub items: Vec<Post>,
}
