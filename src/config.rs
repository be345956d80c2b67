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
use url::Url;

use super::constant::*;
use super::error::{CosError, GenericError};

#[derive(Debug, Clone)]
pub(crate) struct ConfigHolder {
    pub(crate) max_retry_count: isize,
    pub(crate) request_timeout: isize,
    pub(crate) connection_timeout: isize,
    pub(crate) async_upload_timeout: isize,
    pub(crate) high_latency_log_threshold: isize,
    pub(crate) sign_expires: i64,
    pub(crate) enable_verify_ssl: bool,
    pub(crate) user_agent_product_name: String,

    pub(crate) user_agent: String,
    pub(crate) region: String,
    pub(crate) bucket: String,
    pub(crate) schema: String,
    pub(crate) domain: String,
}

impl Default for ConfigHolder {
    fn default() -> Self {
        Self {
            max_retry_count: DEFAULT_MAX_RETRY_COUNT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            async_upload_timeout: DEFAULT_ASYNC_UPLOAD_TIMEOUT,
            high_latency_log_threshold: DEFAULT_HIGH_LATENCY_LOG_THRESHOLD,
            sign_expires: DEFAULT_SIGN_EXPIRES,
            enable_verify_ssl: true,
            user_agent_product_name: "".to_string(),
            user_agent: "".to_string(),
            region: DEFAULT_REGION.to_string(),
            bucket: "".to_string(),
            schema: "".to_string(),
            domain: "".to_string(),
        }
    }
}


impl ConfigHolder {
    pub(crate) fn check(&mut self, endpoint: impl Into<String>, region: impl Into<String>, bucket: impl Into<String>) -> Result<(), CosError> {
        let region = region.into().trim().to_owned();
        if region == "" {
            return CosError::client_error_result("no region specified");
        }
        if !REGION_REGEX.is_match(region.as_str()) {
            return CosError::client_error_result("invalid region, the character set is illegal");
        }

        let bucket = bucket.into().trim().to_owned();
        if bucket == "" {
            return CosError::client_error_result("no bucket specified");
        }
        if !BUCKET_REGEX.is_match(bucket.as_str()) {
            return CosError::client_error_result("invalid bucket name, the character set is illegal");
        }

        let mut endpoint = endpoint.into().trim().to_owned().to_lowercase();
        if endpoint == "" {
            endpoint = format!("{}{}.{}", SCHEMA_HTTP, region, DEFAULT_DOMAIN_SUFFIX);
        }

        let (schema, domain) = self.split_endpoint(endpoint.as_str())?;
        if self.max_retry_count < 1 {
            self.max_retry_count = 1;
        }
        self.region = region;
        self.bucket = bucket;
        self.schema = schema;
        self.domain = domain;
        Ok(())
    }

    pub(crate) fn gen_user_agent(&mut self) {
        let mut user_agent = format!("cos-v2-rust-sdk/{} ({}/{})", env!("CARGO_PKG_VERSION"), std::env::consts::OS, std::env::consts::ARCH);
        if self.user_agent_product_name != "" {
            user_agent.push_str(" -- ");
            user_agent.push_str(self.user_agent_product_name.as_str());
        }
        self.user_agent = user_agent;
    }

    pub(crate) fn split_endpoint(&self, endpoint: &str) -> Result<(String, String), CosError> {
        let mut endpoint = endpoint.trim();
        while endpoint.len() > 0 && endpoint.ends_with("/") {
            endpoint = &endpoint[0..endpoint.len() - 1];
        }

        if endpoint.len() == 0 {
            return Err(CosError::client_error("invalid endpoint"));
        }
        let mut schema = String::with_capacity(SCHEMA_HTTPS.len());
        let domain;
        if endpoint.starts_with(SCHEMA_HTTP) {
            schema.push_str(SCHEMA_HTTP);
            domain = self.parse_domain(endpoint)?;
        } else if endpoint.starts_with(SCHEMA_HTTPS) {
            schema.push_str(SCHEMA_HTTPS);
            domain = self.parse_domain(endpoint)?;
        } else {
            schema.push_str(SCHEMA_HTTP);
            domain = self.parse_domain((SCHEMA_HTTP.to_owned() + endpoint).as_str())?;
        }

        Ok((schema, domain))
    }

    pub(crate) fn parse_domain(&self, input: &str) -> Result<String, CosError> {
        match Url::parse(input) {
            Ok(u) => {
                if let Some(host) = u.host() {
                    if let Some(port) = u.port() {
                        Ok(format!("{}:{}", host, port))
                    } else {
                        Ok(host.to_string())
                    }
                } else {
                    Err(CosError::client_error("no host error"))
                }
            }
            Err(e) => {
                Err(CosError::client_error_with_cause("parse domain error", GenericError::UrlParseError(e)))
            }
        }
    }

    /// `{schema}{domain}/files/v2/{app_id}/{bucket}`, without a trailing slash.
    pub(crate) fn get_base_url(&self, app_id: &str) -> String {
        let mut base_url = String::with_capacity(self.schema.len() + self.domain.len() + API_PATH_PREFIX.len()
            + app_id.len() + self.bucket.len() + 2);
        base_url += self.schema.as_str();
        base_url += self.domain.as_str();
        base_url += API_PATH_PREFIX;
        base_url += "/";
        base_url += app_id;
        base_url += "/";
        base_url += self.bucket.as_str();
        base_url
    }
}
