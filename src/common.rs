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
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub fn init_tracing_log(directives: impl AsRef<str>, directory: impl AsRef<Path>,
                        file_name_prefix: impl AsRef<Path>) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(directory, file_name_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_line_number(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::new(directives))
        .with_ansi(false).init();
    guard
}

pub trait EnvelopeTrait {
    fn code(&self) -> i64;

    fn message(&self) -> &str;

    fn request_id(&self) -> &str;
}

/// Decoded JSON answer of the file API: `{"code": .., "message": .., "request_id": .., "data": ..}`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ResponseEnvelope {
    pub(crate) code: i64,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) message: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) request_id: String,
    #[serde(default)]
    pub(crate) data: Option<Value>,
}

impl ResponseEnvelope {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: "".to_string(),
            data: None,
        }
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

impl EnvelopeTrait for ResponseEnvelope {
    fn code(&self) -> i64 {
        self.code
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn request_id(&self) -> &str {
        &self.request_id
    }
}

/// Accepts `"123"`, `123` or `null`.
pub(crate) fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok("".to_string()),
        Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

/// Maps `null` to the default value.
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn deserialize_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_u64(deserializer)?.unwrap_or_default())
}

pub(crate) fn deserialize_optional_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_u64()),
        Value::String(s) => Ok(s.trim().parse::<u64>().ok()),
        _ => Ok(None),
    }
}

/// Entry of a folder listing, also the payload of a file stat.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FileInfo {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) name: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) biz_attr: String,
    #[serde(default, rename = "filesize", deserialize_with = "deserialize_optional_u64")]
    pub(crate) file_size: Option<u64>,
    #[serde(default, rename = "filelen", deserialize_with = "deserialize_optional_u64")]
    pub(crate) file_len: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) sha: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) ctime: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) mtime: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) access_url: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) source_url: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub(crate) authority: String,
    #[serde(default)]
    pub(crate) custom_headers: Option<Value>,
}

impl FileInfo {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn biz_attr(&self) -> &str {
        &self.biz_attr
    }
    pub fn file_size(&self) -> Option<u64> {
        self.file_size
    }
    pub fn file_len(&self) -> Option<u64> {
        self.file_len
    }
    pub fn sha(&self) -> &str {
        &self.sha
    }
    pub fn ctime(&self) -> &str {
        &self.ctime
    }
    pub fn mtime(&self) -> &str {
        &self.mtime
    }
    pub fn access_url(&self) -> &str {
        &self.access_url
    }
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
    pub fn authority(&self) -> &str {
        &self.authority
    }
    pub fn custom_headers(&self) -> Option<&Value> {
        self.custom_headers.as_ref()
    }
    /// Folders are listed without a size.
    pub fn is_folder(&self) -> bool {
        self.file_size.is_none()
    }
}
