//! HTTP 镜像
//!
//! 把快照 PUT/GET 到一个简单的键值 HTTP 服务

use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use super::RemoteMirror;

/// HTTP 形式的远端镜像
///
/// 键映射到 `{base_url}/state/{key}`，快照 JSON 作为请求体原样传输
pub struct HttpMirror {
    base_url: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpMirror {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        // 同步是尽力而为的，超时宁短勿长，失败由上层降级处理
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}/state/{}", self.base_url, key)
    }

    fn auth(&self, request: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl RemoteMirror for HttpMirror {
    fn push(&self, key: &str, value: &str) -> Result<()> {
        let response = self
            .auth(self.client.put(self.url(key)))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(value.to_string())
            .send()
            .with_context(|| format!("push {} to {}", key, self.base_url))?;

        response
            .error_for_status()
            .map(|_| ())
            .with_context(|| format!("push {} status", key))
    }

    fn pull(&self, key: &str) -> Result<Option<String>> {
        let response = self
            .auth(self.client.get(self.url(key)))
            .send()
            .with_context(|| format!("pull {} from {}", key, self.base_url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .with_context(|| format!("pull {} status", key))?;

        let body = response.text().context("read mirror response body")?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }

    fn describe(&self) -> String {
        format!("http mirror at {}", self.base_url)
    }
}

impl std::fmt::Debug for HttpMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // token 不进日志
        f.debug_struct("HttpMirror")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}
