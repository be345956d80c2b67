/*
 * Copyright (2024) Volcengine
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */
use crate::config::ConfigHolder;
use crate::enumeration::HttpMethodType;
use crate::enumeration::HttpMethodType::HttpMethodGet;
use crate::error::{CosError, GenericError};
use crate::internal::trans_header_value;
use bytes::Bytes;
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub(crate) operation: &'static str,
    pub(crate) method: HttpMethodType,
    pub(crate) url: String,
    pub(crate) header: HashMap<String, String>,
    pub(crate) body: Option<Bytes>,
}

impl Default for HttpRequest {
    fn default() -> Self {
        HttpRequest {
            operation: "Default",
            method: HttpMethodGet,
            url: "".to_string(),
            header: HashMap::with_capacity(4),
            body: None,
        }
    }
}

impl HttpRequest {
    pub fn new(method: impl Into<HttpMethodType>, url: impl Into<String>) -> Self {
        let mut request = Self::default();
        request.method = method.into();
        request.url = url.into();
        request
    }

    pub fn operation(&self) -> &str {
        self.operation
    }
    pub fn method(&self) -> &HttpMethodType {
        &self.method
    }
    pub fn url(&self) -> &str {
        &self.url
    }
    pub fn header(&self) -> &HashMap<String, String> {
        &self.header
    }
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.header, name)
    }
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HttpResponse {
    pub(crate) status_code: isize,
    pub(crate) header: HashMap<String, String>,
    pub(crate) body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status_code: isize, header: HashMap<String, String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            header,
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> isize {
        self.status_code
    }
    pub fn header(&self) -> &HashMap<String, String> {
        &self.header
    }
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.header, name)
    }
    pub fn body(&self) -> &[u8] {
        &self.body
    }
    pub fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}

fn find_header<'a>(header: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    header.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Settings handed to a transport when the client builds it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransportOptions {
    pub(crate) connection_timeout: isize,
    pub(crate) request_timeout: isize,
    pub(crate) enable_verify_ssl: bool,
    pub(crate) user_agent: String,
}

impl TransportOptions {
    pub(crate) fn from_config(config_holder: &ConfigHolder, request_timeout: isize) -> Self {
        Self {
            connection_timeout: config_holder.connection_timeout,
            request_timeout,
            enable_verify_ssl: config_holder.enable_verify_ssl,
            user_agent: config_holder.user_agent.clone(),
        }
    }

    pub fn connection_timeout(&self) -> isize {
        self.connection_timeout
    }
    pub fn request_timeout(&self) -> isize {
        self.request_timeout
    }
    pub fn enable_verify_ssl(&self) -> bool {
        self.enable_verify_ssl
    }
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Performs exactly one HTTP exchange. Retries are the caller's concern.
pub trait Transport: Send + Sync {
    fn new(options: &TransportOptions) -> Result<Self, CosError>
    where
        Self: Sized;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, CosError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl Transport for ReqwestTransport {
    fn new(options: &TransportOptions) -> Result<Self, CosError> {
        let mut client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .tcp_nodelay(true)
            .connect_timeout(Duration::from_millis(options.connection_timeout as u64));
        if options.request_timeout > 0 {
            client = client.timeout(Duration::from_millis(options.request_timeout as u64));
        }
        if !options.enable_verify_ssl {
            client = client.danger_accept_invalid_certs(true);
        }

        match client.build() {
            Ok(client) => Ok(Self { client }),
            Err(e) => Err(CosError::client_error_with_cause("build http client error", GenericError::DefaultError(e.to_string()))),
        }
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, CosError> {
        let mut rb = self.client.request(request.method.as_http_method(), request.url.as_str());
        for (k, v) in &request.header {
            rb = rb.header(k.as_str(), v.as_str());
        }
        if let Some(body) = &request.body {
            rb = rb.body(body.clone());
        }

        let response = rb.send()
            .map_err(|e| CosError::client_error_with_cause("do http request error", GenericError::HttpRequestError(e.to_string())))?;
        let status_code = response.status().as_u16() as isize;
        let mut header = HashMap::with_capacity(response.headers().len());
        for (k, v) in response.headers() {
            header.insert(k.as_str().to_string(), trans_header_value(v));
        }
        let body = response.bytes()
            .map_err(|e| CosError::client_error_with_cause("read response body error", GenericError::IoError(e.to_string())))?;
        Ok(HttpResponse {
            status_code,
            header,
            body: body.to_vec(),
        })
    }
}
