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
use std::time::Duration;

use async_trait::async_trait;

use cos_v2_rust_sdk::asynchronous::cos;
use cos_v2_rust_sdk::asynchronous::cos::{AsyncRuntime, CosClientImpl};
use cos_v2_rust_sdk::asynchronous::http::AsyncTransport;
use cos_v2_rust_sdk::credential::{CommonCredentials, CommonCredentialsProvider};
use cos_v2_rust_sdk::error::CosError;
use cos_v2_rust_sdk::http::{HttpRequest, HttpResponse, Transport, TransportOptions};

use crate::common::{FakeCosTransport, MockTransport, APP_ID, BUCKET, SECRET_ID, SECRET_KEY};

#[derive(Debug, Default)]
pub struct TokioRuntime {}

#[async_trait]
impl AsyncRuntime for TokioRuntime {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl AsyncTransport for MockTransport {
    fn new(_: &TransportOptions) -> Result<Self, CosError> {
        Ok(Self::default())
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, CosError> {
        tokio::task::yield_now().await;
        Transport::send(self, request)
    }
}

#[async_trait]
impl AsyncTransport for FakeCosTransport {
    fn new(_: &TransportOptions) -> Result<Self, CosError> {
        Ok(Self::default())
    }

    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, CosError> {
        tokio::task::yield_now().await;
        Transport::send(self, request)
    }
}

pub type AsyncClient<T> = CosClientImpl<CommonCredentialsProvider<CommonCredentials>, CommonCredentials, T, TokioRuntime>;

pub fn async_client<T>(transport: &T) -> AsyncClient<T>
where
    T: AsyncTransport + Clone + std::fmt::Debug,
{
    cos::builder_common()
        .app_id(APP_ID)
        .secret_id(SECRET_ID)
        .secret_key(SECRET_KEY)
        .region("sh")
        .bucket(BUCKET)
        .transport(transport.clone())
        .build()
        .unwrap()
}
