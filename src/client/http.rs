use serde_json::Value as Json;
use thiserror::Error;

const AUTH_ROUTES: &[&str] = &["/login", "/signup", "/unauthorized"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// One REST call as the pages describe it.
#[derive(Debug, Default)]
pub struct RequestConfig {
    pub path: String,
    pub method: Method,
    pub body: Option<Json>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub require_auth: bool,
    pub with_credentials: bool,
}

impl RequestConfig {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            ..Self::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_body(mut self, body: Json) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn require_auth(mut self) -> Self {
        self.require_auth = true;
        self
    }

    pub fn with_credentials(mut self) -> Self {
        self.with_credentials = true;
        self
    }
}

/// Fully resolved request handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub with_credentials: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<Json>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response, carrying the status and the parsed body.
    #[error("request failed with status {status}")]
    Status { status: u16, body: Option<Json> },
    #[error("transport error: {0}")]
    Transport(String),
    /// The request required auth but no token was available.
    #[error("no auth token available")]
    MissingToken,
}

/// Async token source registered by the auth layer. Only the callback
/// shape matters here, not the backing implementation.
pub trait TokenProvider: Send {
    fn current_id_token(&self) -> Option<String>;
}

/// The injected wire seam; tests use a recording stub.
pub trait Transport: Send {
    fn send(&mut self, request: PreparedRequest) -> Result<HttpResponse, String>;
}

/// Where an auth failure should navigate, or `None` while already on an
/// auth route.
pub fn auth_redirect(status: u16, current_path: &str) -> Option<&'static str> {
    if AUTH_ROUTES
        .iter()
        .any(|route| current_path.starts_with(route))
    {
        return None;
    }
    match status {
        401 => Some("/login?expired=1"),
        403 => Some("/unauthorized"),
        _ => None,
    }
}

/// Generic REST client: resolves the base URL, injects a bearer token for
/// authenticated calls, serializes JSON bodies, and maps non-2xx responses
/// to errors. 401/403 additionally trigger the registered navigation
/// callback unless the current route is already an auth route.
pub struct ApiClient<T: Transport> {
    base_url: String,
    transport: T,
    token_provider: Option<Box<dyn TokenProvider>>,
    on_redirect: Option<Box<dyn FnMut(&str) + Send>>,
    current_path: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            transport,
            token_provider: None,
            on_redirect: None,
            current_path: "/".to_string(),
        }
    }

    pub fn with_token_provider(mut self, provider: Box<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    pub fn on_redirect(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_redirect = Some(Box::new(callback));
        self
    }

    /// Kept in sync by the router so auth redirects can be suppressed on
    /// auth routes.
    pub fn set_current_path(&mut self, path: impl Into<String>) {
        self.current_path = path.into();
    }

    pub fn request(&mut self, config: RequestConfig) -> Result<HttpResponse, ApiError> {
        let prepared = self.prepare(config)?;
        let response = self
            .transport
            .send(prepared)
            .map_err(ApiError::Transport)?;

        if (200..300).contains(&response.status) {
            return Ok(response);
        }

        tracing::warn!(status = response.status, "api request failed");
        if let Some(target) = auth_redirect(response.status, &self.current_path)
            && let Some(callback) = &mut self.on_redirect
        {
            callback(target);
        }

        Err(ApiError::Status {
            status: response.status,
            body: response.body,
        })
    }

    fn prepare(&self, config: RequestConfig) -> Result<PreparedRequest, ApiError> {
        let mut url = format!("{}{}", self.base_url, config.path);
        if !config.query.is_empty() {
            let query = config
                .query
                .iter()
                .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }

        let mut headers = config.headers;
        let body = match &config.body {
            Some(body) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(body.to_string())
            }
            None => None,
        };

        if config.require_auth {
            let token = self
                .token_provider
                .as_ref()
                .and_then(|provider| provider.current_id_token())
                .ok_or(ApiError::MissingToken)?;
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        Ok(PreparedRequest {
            url,
            method: config.method,
            headers,
            body,
            with_credentials: config.with_credentials,
        })
    }
}

fn encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
