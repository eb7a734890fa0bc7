use std::{fmt::Debug, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::FetchError;

pub const USER_AGENT: &str = concat!("weather-core/", env!("CARGO_PKG_VERSION"));

/// Issues a GET request and returns the decoded JSON body.
#[async_trait]
pub trait HttpFetch: Send + Sync + Debug {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    http: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build weather HTTP client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Appends one percent-encoded path segment to `base`.
pub fn join_segment(base: &str, segment: &str) -> Result<String, FetchError> {
    let invalid = |message: String| FetchError::InvalidUrl {
        url: base.to_string(),
        message,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot have path segments".to_string()))?
        .pop_if_empty()
        .push(segment);

    Ok(url.into())
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_segment_encodes_spaces_and_unicode() {
        let url = join_segment("https://wttr.in", "Buenos Aires").unwrap();
        assert_eq!(url, "https://wttr.in/Buenos%20Aires");

        let url = join_segment("https://wttr.in/", "Reykjavík").unwrap();
        assert_eq!(url, "https://wttr.in/Reykjav%C3%ADk");
    }

    #[test]
    fn join_segment_keeps_base_path_and_escapes_slash() {
        let url = join_segment("https://example.test/api/name", "Guinea/Bissau").unwrap();
        assert_eq!(url, "https://example.test/api/name/Guinea%2FBissau");
    }

    #[test]
    fn join_segment_rejects_unparsable_base() {
        let err = join_segment("not a url", "Oslo").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));

        let err = join_segment("mailto:someone@example.test", "Oslo").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);

        assert_eq!(truncate_body("short"), "short");
    }
}
