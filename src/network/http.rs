//! HttpNetwork - `reqwest` transport, one worker thread per request.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;

use super::{
    ApiConfig, ConfigError, HttpMethod, Network, NetworkError, ParameterEncoding, Request,
    ResponseCallback,
};

/// Network client talking to the configured API.
///
/// Calls never block the caller: each request runs on its own thread and the
/// completion fires from that thread.
#[derive(Clone)]
pub struct HttpNetwork {
    config: ApiConfig,
    client: Client,
}

impl HttpNetwork {
    pub fn new(config: ApiConfig) -> Result<Self, ConfigError> {
        config.base()?;
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { config, client })
    }

    fn perform(&self, request: &Request) -> Result<Vec<u8>, NetworkError> {
        let url = self
            .config
            .url_for(&request.path)
            .map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        builder = match request.encoding {
            ParameterEncoding::Url => builder.query(&request.parameters),
            ParameterEncoding::Json => builder.json(&request.parameters),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = &self.config.credentials {
            builder = builder.header("Authorization", credentials.authorization_header());
        }

        let response = builder.send().map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().map_err(map_transport_error)?.to_vec();

        if status.is_success() {
            Ok(body)
        } else {
            Err(NetworkError::Status {
                code: status.as_u16(),
                body,
            })
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> NetworkError {
    if error.is_timeout() {
        NetworkError::Timeout
    } else if error.is_connect() {
        NetworkError::NotConnected
    } else {
        NetworkError::Transport(error.to_string())
    }
}

impl Network for HttpNetwork {
    fn response_data(&self, request: Request, completion: ResponseCallback) {
        let network = self.clone();
        thread::spawn(move || {
            tracing::debug!(
                method = request.method.as_str(),
                path = %request.path,
                "sending request"
            );
            let result = network.perform(&request);
            if let Err(error) = &result {
                tracing::debug!(path = %request.path, %error, "request failed");
            }
            completion(result);
        });
    }
}
