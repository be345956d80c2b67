/*
 * Copyright (c) 2025 Beijing Volcano Engine Technology Co., Ltd.
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
use crate::error::{CosError, GenericError};
use crate::http::{HttpRequest, HttpResponse, TransportOptions};
use crate::internal::trans_header_value;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Async counterpart of [`crate::http::Transport`]: one exchange per call, no retry.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    fn new(options: &TransportOptions) -> Result<Self, CosError>
    where
        Self: Sized;

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, CosError>;
}

#[derive(Debug, Clone)]
pub struct AsyncReqwestTransport {
    client: Client,
}

#[async_trait]
impl AsyncTransport for AsyncReqwestTransport {
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
            Err(e) => Err(CosError::client_error_with_cause("build async http client error", GenericError::DefaultError(e.to_string()))),
        }
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, CosError> {
        let mut rb = self.client.request(request.method.as_http_method(), request.url.as_str());
        for (k, v) in &request.header {
            rb = rb.header(k.as_str(), v.as_str());
        }
        if let Some(body) = &request.body {
            rb = rb.body(body.clone());
        }

        let response = rb.send().await
            .map_err(|e| CosError::client_error_with_cause("do http request error", GenericError::HttpRequestError(e.to_string())))?;
        let status_code = response.status().as_u16() as isize;
        let mut header = HashMap::with_capacity(response.headers().len());
        for (k, v) in response.headers() {
            header.insert(k.as_str().to_string(), trans_header_value(v));
        }
        let body = response.bytes().await
            .map_err(|e| CosError::client_error_with_cause("read response body error", GenericError::IoError(e.to_string())))?;
        Ok(HttpResponse {
            status_code,
            header,
            body: body.to_vec(),
        })
    }
}
