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
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum GenericError {
    UrlParseError(url::ParseError),
    HttpRequestError(String),
    IoError(String),
    JsonError(String),
    DefaultError(String),
}

impl Error for GenericError {}

impl Display for GenericError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GenericError::UrlParseError(e) => {
                write!(f, "{}", e.to_string())
            }
            GenericError::DefaultError(e) => {
                write!(f, "{}", e)
            }
            GenericError::HttpRequestError(e) => {
                write!(f, "{}", e)
            }
            GenericError::IoError(e) => {
                write!(f, "{}", e)
            }
            GenericError::JsonError(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CosError {
    /// Local failure: invalid input, configuration, signing, transport or decoding.
    CosClientError {
        message: String,
        cause: Option<GenericError>,
        request_url: String,
    },
    /// Non-2xx answer from an endpoint that does not reply with a JSON envelope.
    CosServerError {
        message: String,
        status_code: isize,
        header: HashMap<String, String>,
        request_url: String,
    },
    /// Every attempt was consumed by transport failures or throttling codes.
    CosRetryExhaustedError {
        method: String,
        request_url: String,
        attempts: isize,
        last_response: Option<String>,
    },
}

impl Error for CosError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CosError::CosClientError { cause, .. } => {
                if let Some(x) = cause {
                    return Some(x);
                }
                None
            }
            CosError::CosServerError { .. } => None,
            CosError::CosRetryExhaustedError { .. } => None,
        }
    }
}

impl Display for CosError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error())
    }
}

impl CosError {
    pub fn message(&self) -> &str {
        match self {
            Self::CosClientError { message, .. } => message,
            Self::CosServerError { message, .. } => message,
            Self::CosRetryExhaustedError { .. } => "retry exhausted",
        }
    }

    pub fn request_url(&self) -> &str {
        match self {
            Self::CosClientError { request_url, .. } => request_url,
            Self::CosServerError { request_url, .. } => request_url,
            Self::CosRetryExhaustedError { request_url, .. } => request_url,
        }
    }

    pub fn is_server_error(&self) -> bool {
        match self {
            Self::CosServerError { .. } => true,
            _ => false,
        }
    }

    pub fn is_retry_exhausted(&self) -> bool {
        match self {
            Self::CosRetryExhaustedError { .. } => true,
            _ => false,
        }
    }

    pub fn status_code(&self) -> Option<isize> {
        match self {
            Self::CosServerError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn last_response(&self) -> Option<&str> {
        match self {
            Self::CosRetryExhaustedError { last_response, .. } => last_response.as_deref(),
            _ => None,
        }
    }

    pub fn error(&self) -> String {
        match self {
            Self::CosClientError { message, cause, .. } => {
                if let Some(e) = cause {
                    format!("message: {}, cause: {}", message, e)
                } else {
                    format!("message: {}", message)
                }
            }
            Self::CosServerError { status_code, message, request_url, .. } => {
                format!("status_code: {}, request_url: {}, message: {}", status_code, request_url, message)
            }
            Self::CosRetryExhaustedError { method, request_url, attempts, last_response } => {
                match last_response {
                    Some(resp) => format!("{} {} failed after {} attempts, last response: {}", method, request_url, attempts, resp),
                    None => format!("{} {} failed after {} attempts, no response", method, request_url, attempts),
                }
            }
        }
    }

    pub(crate) fn set_request_url(&mut self, url: impl Into<String>) {
        match self {
            CosError::CosClientError { request_url, .. } => {
                *request_url = url.into();
            }
            CosError::CosServerError { request_url, .. } => {
                *request_url = url.into();
            }
            CosError::CosRetryExhaustedError { request_url, .. } => {
                *request_url = url.into();
            }
        }
    }

    pub(crate) fn client_error(message: impl Into<String>) -> Self {
        Self::CosClientError {
            message: message.into(),
            request_url: "".to_string(),
            cause: None,
        }
    }

    pub(crate) fn client_error_with_cause(message: impl Into<String>, cause: GenericError) -> Self {
        Self::CosClientError {
            message: message.into(),
            request_url: "".to_string(),
            cause: Some(cause),
        }
    }

    pub(crate) fn client_error_result(message: impl Into<String>) -> Result<(), CosError> {
        Err(Self::client_error(message))
    }

    pub(crate) fn server_error(message: impl Into<String>, status_code: isize, header: HashMap<String, String>) -> Self {
        Self::CosServerError {
            message: message.into(),
            status_code,
            header,
            request_url: "".to_string(),
        }
    }

    pub(crate) fn retry_exhausted(method: impl Into<String>, request_url: impl Into<String>, attempts: isize, last_response: Option<String>) -> Self {
        Self::CosRetryExhaustedError {
            method: method.into(),
            request_url: request_url.into(),
            attempts,
            last_response,
        }
    }
}
