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

use crate::auth::SignContext;
use crate::common::ResponseEnvelope;
use crate::constant::{ALLOWED_IN_URL, CODE_OPERATING_TOO_FAST, CODE_SUCCESS, CODE_WRITING_TOO_FAST, CONTENT_TYPE_JSON, CONTENT_TYPE_MULTIPART, FORM_BIZ_ATTR, FORM_INSERT_ONLY, HEADER_CONTENT_TYPE, RETRY_MAX_SLEEP_SECONDS, RETRY_MIN_SLEEP_SECONDS};
use crate::error::{CosError, GenericError};
use crate::http::{HttpRequest, HttpResponse};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use rand::Rng;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha1::Sha1;
use std::time::Duration;

pub(crate) fn url_encode(input: &str) -> String {
    url_encode_with_safe(input, "")
}

pub(crate) fn url_encode_with_safe(input: &str, safe: &str) -> String {
    if input == "" {
        return "".to_string();
    }

    let mut temp = String::with_capacity(input.len() * 3);
    for i in input.as_bytes() {
        if let Some(_) = ALLOWED_IN_URL.find(*i as char) {
            temp.push(*i as char);
        } else {
            if safe != "" && i.is_ascii() {
                if let Some(_) = safe.find(*i as char) {
                    temp.push(*i as char);
                    continue;
                }
            }
            temp.push('%');
            temp.push_str(format!("{:02X}", i).as_str());
        }
    }

    temp
}

pub(crate) fn base64(data: impl AsRef<[u8]>) -> String {
    BASE64_STANDARD.encode(data)
}

pub(crate) fn base64_decode(data: impl AsRef<[u8]>) -> Result<Vec<u8>, CosError> {
    BASE64_STANDARD.decode(data)
        .map_err(|e| CosError::client_error_with_cause("decode base64 error", GenericError::DefaultError(e.to_string())))
}

pub(crate) fn new_hmac_sha1(sign_key: impl AsRef<[u8]>) -> Result<Hmac<Sha1>, CosError> {
    Hmac::<Sha1>::new_from_slice(sign_key.as_ref())
        .map_err(|e| CosError::client_error_with_cause("new hmac sha1 error", GenericError::DefaultError(e.to_string())))
}

pub(crate) fn hmac_sha1(input: impl AsRef<[u8]>, sign_key: impl AsRef<[u8]>) -> Result<impl AsRef<[u8]>, CosError> {
    let mut m = new_hmac_sha1(sign_key)?;
    m.update(input.as_ref());
    Ok(m.finalize().into_bytes())
}

pub(crate) fn trans_header_value(value: &HeaderValue) -> String {
    match value.to_str() {
        Ok(v) => v.to_string(),
        Err(_) => String::from_utf8_lossy(value.as_bytes()).to_string(),
    }
}

/// Backslashes become slashes, surrounding slashes are dropped.
pub(crate) fn normalize_folder(dir_name: &str) -> String {
    dir_name.replace('\\', "/").trim_matches('/').to_string()
}

/// Backslashes become slashes, leading slashes are dropped.
pub(crate) fn normalize_file_path(file_path: &str) -> String {
    file_path.replace('\\', "/").trim_start_matches('/').to_string()
}

/// An empty directory contributes no path segment.
pub(crate) fn join_file_path(dir_name: &str, file_name: &str) -> String {
    let dir_name = normalize_folder(dir_name);
    let file_name = normalize_file_path(file_name);
    if dir_name == "" {
        return file_name;
    }
    format!("{}/{}", dir_name, file_name)
}

pub(crate) fn build_resource_url(base_url: &str, path: &str) -> String {
    let mut url = String::with_capacity(base_url.len() + path.len() * 3 + 1);
    url += base_url;
    url += "/";
    url += url_encode_with_safe(path, "/").as_str();
    url
}

pub(crate) fn check_need_retry(code: i64) -> bool {
    code == CODE_OPERATING_TOO_FAST || code == CODE_WRITING_TOO_FAST
}

pub(crate) fn random_retry_delay() -> Duration {
    Duration::from_secs(rand::thread_rng().gen_range(RETRY_MIN_SLEEP_SECONDS..=RETRY_MAX_SLEEP_SECONDS))
}

pub(crate) fn exceed_high_latency_log_threshold(high_latency_log_threshold: isize, elapsed_ms: u128) -> bool {
    high_latency_log_threshold > 0 && elapsed_ms > high_latency_log_threshold as u128
}

pub(crate) fn parse_envelope(body: &[u8]) -> Result<ResponseEnvelope, CosError> {
    serde_json::from_slice::<ResponseEnvelope>(body)
        .map_err(|e| CosError::client_error_with_cause("parse response envelope error", GenericError::JsonError(e.to_string())))
}

pub(crate) enum AttemptOutcome {
    Finished(ResponseEnvelope),
    Throttled(ResponseEnvelope, String),
    Failed(CosError, Option<String>),
}

/// Classifies one attempt: a decodable envelope outside the throttling codes finishes the call,
/// everything else is worth another attempt.
pub(crate) fn evaluate_attempt(result: Result<HttpResponse, CosError>) -> AttemptOutcome {
    match result {
        Err(e) => AttemptOutcome::Failed(e, None),
        Ok(response) => {
            let raw = String::from_utf8_lossy(&response.body).to_string();
            match parse_envelope(&response.body) {
                Err(e) => AttemptOutcome::Failed(e, Some(raw)),
                Ok(envelope) => {
                    if check_need_retry(envelope.code) {
                        AttemptOutcome::Throttled(envelope, raw)
                    } else {
                        AttemptOutcome::Finished(envelope)
                    }
                }
            }
        }
    }
}

/// Hand-built multipart body; the boundary parameter is written unquoted.
#[derive(Debug, Clone)]
pub(crate) struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub(crate) fn new() -> Self {
        Self {
            boundary: uuid::Uuid::new_v4().simple().to_string(),
            body: Vec::with_capacity(512),
        }
    }

    pub(crate) fn add_text(&mut self, name: &str, value: impl AsRef<str>) -> &mut Self {
        self.body.extend_from_slice(format!("--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n", self.boundary, name).as_bytes());
        self.body.extend_from_slice(value.as_ref().as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub(crate) fn add_file(&mut self, name: &str, file_name: &str, content_type: &str, content: &[u8]) -> &mut Self {
        self.body.extend_from_slice(format!("--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                                            self.boundary, name, file_name, content_type).as_bytes());
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub(crate) fn content_type(&self) -> String {
        format!("{}; boundary={}", CONTENT_TYPE_MULTIPART, self.boundary)
    }

    pub(crate) fn apply(mut self, request: &mut HttpRequest) {
        self.body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        request.header.insert(HEADER_CONTENT_TYPE.to_string(), self.content_type());
        request.body = Some(Bytes::from(self.body));
    }
}

pub(crate) fn apply_json_body<T: Serialize>(request: &mut HttpRequest, body: &T) -> Result<(), CosError> {
    let body = serde_json::to_vec(body)
        .map_err(|e| CosError::client_error_with_cause("trans json error", GenericError::JsonError(e.to_string())))?;
    request.header.insert(HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string());
    request.body = Some(Bytes::from(body));
    Ok(())
}

pub(crate) fn insert_only_flag(replace: bool) -> &'static str {
    if replace {
        "0"
    } else {
        "1"
    }
}

pub(crate) fn add_upload_option<T: UploadOption>(form: &mut MultipartForm, input: &T) {
    form.add_text(FORM_BIZ_ATTR, input.biz_attr());
    form.add_text(FORM_INSERT_ONLY, insert_only_flag(input.replace()));
}

pub(crate) trait InputDescriptor {
    fn operation(&self) -> &'static str;
}

pub(crate) trait InputTranslator: InputDescriptor {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError>;
}

pub(crate) trait OutputParser: Sized {
    fn parse(request: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError>;
}

/// Typed view of `data`. A failed call may carry an arbitrary `data`, so only a successful
/// envelope insists on the expected shape.
pub(crate) fn parse_data<T>(envelope: &ResponseEnvelope) -> Result<T, CosError>
where
    T: DeserializeOwned + Default,
{
    match &envelope.data {
        None => Ok(T::default()),
        Some(data) if data.is_null() => Ok(T::default()),
        Some(data) => {
            match serde_json::from_value::<T>(data.clone()) {
                Ok(t) => Ok(t),
                Err(e) => {
                    if envelope.code == CODE_SUCCESS {
                        Err(CosError::client_error_with_cause("parse response data error", GenericError::JsonError(e.to_string())))
                    } else {
                        Ok(T::default())
                    }
                }
            }
        }
    }
}

pub(crate) trait FileLocation {
    fn dir_name(&self) -> &str;
    fn file_name(&self) -> &str;

    fn resource_path(&self) -> Result<String, CosError> {
        let file_name = normalize_file_path(self.file_name());
        if file_name == "" || file_name.ends_with('/') {
            return Err(CosError::client_error("invalid file name"));
        }
        Ok(join_file_path(self.dir_name(), file_name.as_str()))
    }
}

pub(crate) trait UploadOption {
    fn biz_attr(&self) -> &str;
    fn replace(&self) -> bool;
}
