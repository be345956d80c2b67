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
use crate::asynchronous::http::{AsyncReqwestTransport, AsyncTransport};
use crate::asynchronous::object::ObjectAPI;
use crate::auth::SignContext;
use crate::config::ConfigHolder;
use crate::constant::DEFAULT_REGION;
use crate::cos::check_credentials;
use crate::credential::{CommonCredentials, CommonCredentialsProvider, Credentials, CredentialsProvider};
use crate::error::{CosError, GenericError};
use crate::http::{HttpRequest, TransportOptions};
use crate::internal::{evaluate_attempt, exceed_high_latency_log_threshold, random_retry_delay, AttemptOutcome, InputTranslator, OutputParser};
use crate::object::{UploadFileInput, UploadFileOutput};
use async_trait::async_trait;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::{Duration, Instant};
use tracing::log::{info, warn};

/// Hooks into the caller's executor. Only sleeping between retries is needed.
#[async_trait]
pub trait AsyncRuntime: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct CosClientBuilder<P, C, T, R> {
    app_id: String,
    secret_id: String,
    secret_key: String,
    region: String,
    bucket: String,
    endpoint: String,
    credentials_provider: Option<P>,
    transport: Option<T>,
    async_runtime: Option<R>,
    config_holder: ConfigHolder,
    c: PhantomData<C>,
}

impl<P, C, T, R> Default for CosClientBuilder<P, C, T, R> {
    fn default() -> Self {
        Self {
            app_id: "".to_string(),
            secret_id: "".to_string(),
            secret_key: "".to_string(),
            region: DEFAULT_REGION.to_string(),
            bucket: "".to_string(),
            endpoint: "".to_string(),
            credentials_provider: None,
            transport: None,
            async_runtime: None,
            config_holder: ConfigHolder::default(),
            c: PhantomData,
        }
    }
}

impl<P, C, T, R> CosClientBuilder<P, C, T, R>
where
    P: CredentialsProvider<C> + Debug + Send + Sync,
    C: Credentials + Debug + Send + Sync,
    T: AsyncTransport + Debug,
    R: AsyncRuntime + Default + Debug,
{
    pub fn build(mut self) -> Result<CosClientImpl<P, C, T, R>, CosError> {
        self.config_holder.check(self.endpoint, self.region, self.bucket)?;
        self.config_holder.gen_user_agent();

        let cp = match self.credentials_provider {
            Some(p) => p,
            None => {
                let c = C::new(self.app_id, self.secret_id, self.secret_key)
                    .map_err(|ex| CosError::client_error_with_cause("create credentials error", GenericError::DefaultError(ex.to_string())))?;
                P::new(c).map_err(|ex| CosError::client_error_with_cause("create credentials provider error", GenericError::DefaultError(ex.to_string())))?
            }
        };
        check_credentials(&cp)?;

        let transport = match self.transport {
            Some(t) => t,
            None => T::new(&TransportOptions::from_config(&self.config_holder, self.config_holder.async_upload_timeout))?,
        };

        Ok(CosClientImpl {
            config_holder: self.config_holder,
            credentials_provider: cp,
            transport,
            async_runtime: self.async_runtime.unwrap_or_default(),
            c: self.c,
        })
    }

    pub fn build_as_trait(self) -> Result<impl CosClient, CosError> {
        let client = self.build()?;
        Ok(client)
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn secret_id(mut self, secret_id: impl Into<String>) -> Self {
        self.secret_id = secret_id.into();
        self
    }

    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = secret_key.into();
        self
    }

    pub fn credentials_provider(mut self, p: P) -> Self {
        self.credentials_provider = Some(p);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn async_runtime(mut self, async_runtime: R) -> Self {
        self.async_runtime = Some(async_runtime);
        self
    }

    pub fn max_retry_count(mut self, max_retry_count: isize) -> Self {
        self.config_holder.max_retry_count = max_retry_count;
        self
    }

    pub fn sign_expires(mut self, sign_expires: i64) -> Self {
        if sign_expires > 0 {
            self.config_holder.sign_expires = sign_expires;
        }
        self
    }

    pub fn connection_timeout(mut self, connection_timeout: isize) -> Self {
        if connection_timeout > 0 {
            self.config_holder.connection_timeout = connection_timeout;
        }
        self
    }

    /// Whole-request timeout in milliseconds, 6000 by default.
    pub fn async_upload_timeout(mut self, async_upload_timeout: isize) -> Self {
        if async_upload_timeout > 0 {
            self.config_holder.async_upload_timeout = async_upload_timeout;
        }
        self
    }

    pub fn enable_verify_ssl(mut self, enable_verify_ssl: bool) -> Self {
        self.config_holder.enable_verify_ssl = enable_verify_ssl;
        self
    }

    pub fn high_latency_log_threshold(mut self, high_latency_log_threshold: isize) -> Self {
        self.config_holder.high_latency_log_threshold = high_latency_log_threshold;
        self
    }

    pub fn user_agent_product_name(mut self, user_agent_product_name: impl Into<String>) -> Self {
        self.config_holder.user_agent_product_name = user_agent_product_name.into();
        self
    }
}

pub fn builder<R>() -> CosClientBuilder<CommonCredentialsProvider<CommonCredentials>, CommonCredentials, AsyncReqwestTransport, R>
where
    R: AsyncRuntime + Default,
{
    CosClientBuilder::default()
}

pub fn builder_common<P, C, T, R>() -> CosClientBuilder<P, C, T, R>
where
    P: CredentialsProvider<C> + Send + Sync,
    C: Credentials + Send + Sync,
    T: AsyncTransport,
    R: AsyncRuntime + Default,
{
    CosClientBuilder::default()
}

pub trait CosClient: ObjectAPI + Debug + Send + Sync {}

#[derive(Debug)]
pub struct CosClientImpl<P, C, T, R> {
    pub(crate) config_holder: ConfigHolder,
    pub(crate) credentials_provider: P,
    pub(crate) transport: T,
    pub(crate) async_runtime: R,
    c: PhantomData<C>,
}

impl<P, C, T, R> CosClient for CosClientImpl<P, C, T, R>
where
    P: CredentialsProvider<C> + Debug + Send + Sync,
    C: Credentials + Debug + Send + Sync,
    T: AsyncTransport + Debug,
    R: AsyncRuntime + Debug,
{}

#[async_trait]
impl<P, C, T, R> ObjectAPI for CosClientImpl<P, C, T, R>
where
    P: CredentialsProvider<C> + Send + Sync,
    C: Credentials + Send + Sync,
    T: AsyncTransport,
    R: AsyncRuntime,
{
    async fn upload_file(&self, input: &UploadFileInput) -> Result<UploadFileOutput, CosError> {
        self.do_request(input).await
    }
}

impl<P, C, T, R> CosClientImpl<P, C, T, R>
where
    P: CredentialsProvider<C> + Send + Sync,
    C: Credentials + Send + Sync,
    T: AsyncTransport,
    R: AsyncRuntime,
{
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn trans<I: InputTranslator>(&self, input: &I) -> Result<HttpRequest, CosError> {
        let cred = self.credentials_provider.credentials()
            .map_err(|ex| CosError::client_error_with_cause("load credentials error", GenericError::DefaultError(ex.to_string())))?;
        let ctx = SignContext {
            config_holder: &self.config_holder,
            app_id: cred.app_id(),
            secret_id: cred.secret_id(),
            secret_key: cred.secret_key(),
        };
        input.trans(&ctx)
    }

    async fn do_request<I, O>(&self, input: &I) -> Result<O, CosError>
    where
        I: InputTranslator + Sync,
        O: OutputParser,
    {
        let request = self.trans(input)?;
        let operation = request.operation;
        let max_retry_count = self.config_holder.max_retry_count;
        let mut attempts = 0;
        let mut last_response = None;
        while attempts < max_retry_count {
            attempts += 1;
            let start = Instant::now();
            let result = self.transport.send(&request).await;
            let elapsed_ms = start.elapsed().as_millis();
            match evaluate_attempt(result) {
                AttemptOutcome::Finished(envelope) => {
                    if exceed_high_latency_log_threshold(self.config_holder.high_latency_log_threshold, elapsed_ms) {
                        warn!("high latency request {} finished, code: {}, request id: {}, cost: {} ms", operation, envelope.code, envelope.request_id, elapsed_ms);
                    } else {
                        info!("do {} finished, code: {}, request id: {}, cost: {} ms", operation, envelope.code, envelope.request_id, elapsed_ms);
                    }
                    return O::parse(&request, envelope);
                }
                AttemptOutcome::Throttled(envelope, raw) => {
                    warn!("do {} throttled, code: {}, request id: {}, attempt: {}/{}, cost: {} ms", operation, envelope.code,
                        envelope.request_id, attempts, max_retry_count, elapsed_ms);
                    last_response = Some(raw);
                    if attempts < max_retry_count {
                        self.async_runtime.sleep(random_retry_delay()).await;
                    }
                }
                AttemptOutcome::Failed(e, raw) => {
                    warn!("do {} failed, attempt: {}/{}, cost: {} ms, error: {}", operation, attempts, max_retry_count, elapsed_ms, e);
                    last_response = raw;
                }
            }
        }
        Err(CosError::retry_exhausted(request.method.as_str(), request.url.as_str(), attempts, last_response))
    }
}
