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
use crate::common::ResponseEnvelope;
use crate::constant::{DEFAULT_HIGH_LATENCY_LOG_THRESHOLD, DEFAULT_MAX_RETRY_COUNT};
use crate::error::CosError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::internal::{evaluate_attempt, exceed_high_latency_log_threshold, random_retry_delay, AttemptOutcome};
use std::thread;
use std::time::{Duration, Instant};
use tracing::log::{info, warn};

pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Default)]
pub struct ThreadSleeper {}

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}

/// Runs one call with a bounded number of attempts.
///
/// Transport failures are retried at once; the throttling codes `-71` and `-143` are retried
/// after a random pause of 1 to 3 seconds; any other envelope is handed back to the caller.
#[derive(Debug)]
pub struct RequestExecutor<T, S> {
    transport: T,
    sleeper: S,
    max_retry_count: isize,
    high_latency_log_threshold: isize,
}

impl<T, S> RequestExecutor<T, S>
where
    T: Transport,
    S: Sleeper,
{
    pub fn new(transport: T, sleeper: S) -> Self {
        Self {
            transport,
            sleeper,
            max_retry_count: DEFAULT_MAX_RETRY_COUNT,
            high_latency_log_threshold: DEFAULT_HIGH_LATENCY_LOG_THRESHOLD,
        }
    }

    pub fn max_retry_count(mut self, max_retry_count: isize) -> Self {
        if max_retry_count > 0 {
            self.max_retry_count = max_retry_count;
        }
        self
    }

    pub fn high_latency_log_threshold(mut self, high_latency_log_threshold: isize) -> Self {
        self.high_latency_log_threshold = high_latency_log_threshold;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn execute(&self, request: &HttpRequest) -> Result<ResponseEnvelope, CosError> {
        let operation = request.operation;
        let mut attempts = 0;
        let mut last_response = None;
        while attempts < self.max_retry_count {
            attempts += 1;
            let start = Instant::now();
            let result = self.transport.send(request);
            let elapsed_ms = start.elapsed().as_millis();
            match evaluate_attempt(result) {
                AttemptOutcome::Finished(envelope) => {
                    if exceed_high_latency_log_threshold(self.high_latency_log_threshold, elapsed_ms) {
                        warn!("high latency request {} finished, code: {}, request id: {}, cost: {} ms", operation, envelope.code, envelope.request_id, elapsed_ms);
                    } else {
                        info!("do {} finished, code: {}, request id: {}, cost: {} ms", operation, envelope.code, envelope.request_id, elapsed_ms);
                    }
                    return Ok(envelope);
                }
                AttemptOutcome::Throttled(envelope, raw) => {
                    warn!("do {} throttled, code: {}, request id: {}, attempt: {}/{}, cost: {} ms", operation, envelope.code,
                        envelope.request_id, attempts, self.max_retry_count, elapsed_ms);
                    last_response = Some(raw);
                    if attempts < self.max_retry_count {
                        self.sleeper.sleep(random_retry_delay());
                    }
                }
                AttemptOutcome::Failed(e, raw) => {
                    warn!("do {} failed, attempt: {}/{}, cost: {} ms, error: {}", operation, attempts, self.max_retry_count, elapsed_ms, e);
                    last_response = raw;
                }
            }
        }
        Err(CosError::retry_exhausted(request.method.as_str(), request.url.as_str(), attempts, last_response))
    }

    /// For endpoints answering with raw bytes: only transport failures are retried and a
    /// non-2xx status becomes a server error.
    pub fn execute_raw(&self, request: &HttpRequest) -> Result<HttpResponse, CosError> {
        let operation = request.operation;
        let mut attempts = 0;
        while attempts < self.max_retry_count {
            attempts += 1;
            let start = Instant::now();
            let result = self.transport.send(request);
            let elapsed_ms = start.elapsed().as_millis();
            match result {
                Ok(response) => {
                    if !response.is_success() {
                        warn!("do {} finished, http status: {}, cost: {} ms", operation, response.status_code, elapsed_ms);
                        let message = String::from_utf8_lossy(&response.body).to_string();
                        let mut e = CosError::server_error(message, response.status_code, response.header);
                        e.set_request_url(request.url.as_str());
                        return Err(e);
                    }
                    info!("do {} succeed, http status: {}, size: {}, cost: {} ms", operation, response.status_code, response.body.len(), elapsed_ms);
                    return Ok(response);
                }
                Err(e) => {
                    warn!("do {} failed, attempt: {}/{}, cost: {} ms, error: {}", operation, attempts, self.max_retry_count, elapsed_ms, e);
                }
            }
        }
        Err(CosError::retry_exhausted(request.method.as_str(), request.url.as_str(), attempts, None))
    }
}
