//! Request values and the endpoint convention that produces them.

use serde_json::{Map, Value};

/// Request parameters, serialized as a query string or JSON body.
pub type Parameters = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Where the parameters go on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterEncoding {
    /// Percent-encoded query string.
    Url,
    /// JSON request body.
    Json,
}

/// A fully described HTTP call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: HttpMethod,
    pub path: String,
    pub parameters: Parameters,
    pub encoding: ParameterEncoding,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let encoding = match method {
            HttpMethod::Get | HttpMethod::Delete => ParameterEncoding::Url,
            HttpMethod::Post | HttpMethod::Put => ParameterEncoding::Json,
        };
        Self {
            method,
            path: path.into(),
            parameters: Parameters::new(),
            encoding,
            headers: Vec::new(),
        }
    }

    /// Add a parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Query string for URL-encoded requests, without the leading `?`.
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.parameters {
            match value {
                Value::String(s) => serializer.append_pair(key, s),
                other => serializer.append_pair(key, &other.to_string()),
            };
        }
        serializer.finish()
    }
}

/// Endpoint convention: one enum per resource family, one case per call,
/// four pure accessors keyed by case.
///
/// ```ignore
/// enum AccountEndpoint { Me, EmailExists(String) }
///
/// impl TargetType for AccountEndpoint {
///     fn method(&self) -> HttpMethod { HttpMethod::Get }
///     fn path(&self) -> String { /* ... */ }
///     fn parameters(&self) -> Parameters { /* ... */ }
/// }
/// ```
pub trait TargetType {
    fn method(&self) -> HttpMethod;

    fn path(&self) -> String;

    fn parameters(&self) -> Parameters {
        Parameters::new()
    }

    fn headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    fn encoding(&self) -> ParameterEncoding {
        match self.method() {
            HttpMethod::Get | HttpMethod::Delete => ParameterEncoding::Url,
            HttpMethod::Post | HttpMethod::Put => ParameterEncoding::Json,
        }
    }

    fn as_request(&self) -> Request {
        Request {
            method: self.method(),
            path: self.path(),
            parameters: self.parameters(),
            encoding: self.encoding(),
            headers: self.headers(),
        }
    }
}
