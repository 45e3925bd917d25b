//! Requests and responses exchanged with the transport

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Methods found in captured request logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = HttpMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HttpMethodError::Unsupported(s.to_string()))
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        method.to_reqwest()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpMethodError {
    #[error("Request log method '{0}' cannot be replayed")]
    Unsupported(String),
}

/// One request ready to be issued against the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl OutboundRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Add headers; existing names are overwritten
    pub fn with_headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }
}

/// What the worker keeps from a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayResponse {
    pub status: u16,
    pub elapsed: Duration,
}

impl ReplayResponse {
    /// 4xx or 5xx
    pub fn is_error_status(&self) -> bool {
        self.status >= 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_from_str() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert_eq!(
            "TRACE".parse::<HttpMethod>().unwrap_err(),
            HttpMethodError::Unsupported("TRACE".to_string())
        );
    }

    #[test]
    fn test_http_method_to_reqwest() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(HttpMethod::Patch), reqwest::Method::PATCH);
    }

    #[test]
    fn test_http_method_names_match_reqwest() {
        for method in HttpMethod::ALL {
            assert_eq!(method.as_str(), reqwest::Method::from(method).as_str());
            assert_eq!(method.to_string().parse::<HttpMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_request_headers_overwrite() {
        let mut first = BTreeMap::new();
        first.insert("x-reverb-replay".to_string(), "true".to_string());
        first.insert("accept".to_string(), "text/html".to_string());
        let mut second = BTreeMap::new();
        second.insert("accept".to_string(), "application/json".to_string());

        let request = OutboundRequest::new(HttpMethod::Get, "http://localhost/")
            .with_headers(&first)
            .with_headers(&second);

        assert_eq!(request.headers["accept"], "application/json");
        assert_eq!(request.headers["x-reverb-replay"], "true");
    }

    #[test]
    fn test_error_status() {
        let ok = ReplayResponse { status: 204, elapsed: Duration::ZERO };
        let missing = ReplayResponse { status: 404, elapsed: Duration::ZERO };
        assert!(!ok.is_error_status());
        assert!(missing.is_error_status());
    }
}
