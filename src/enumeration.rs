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

use reqwest::Method;
use serde::{Deserialize, Serialize};

use cos_v2_generic::FromRefAndDisplay;

#[derive(Debug, Clone, PartialEq, Default, FromRefAndDisplay, Serialize, Deserialize)]
pub enum Authority {
    #[default]
    #[serde(rename = "eInvalid")]
    AuthorityInvalid,
    #[serde(rename = "eWRPrivate")]
    AuthorityWRPrivate,
    #[serde(rename = "eWPrivateRPublic")]
    AuthorityWPrivateRPublic,
}

impl Authority {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AuthorityInvalid => "eInvalid",
            Self::AuthorityWRPrivate => "eWRPrivate",
            Self::AuthorityWPrivateRPublic => "eWPrivateRPublic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "eInvalid" => Some(Self::AuthorityInvalid),
            "eWRPrivate" => Some(Self::AuthorityWRPrivate),
            "eWPrivateRPublic" => Some(Self::AuthorityWPrivateRPublic),
            _ => None,
        }
    }
}

impl From<Authority> for String {
    fn from(value: Authority) -> Self {
        value.as_str().to_string()
    }
}

/// How the signed resource is identified inside the claims.
#[derive(Debug, Clone, PartialEq, Default, FromRefAndDisplay)]
pub enum SignModeType {
    /// `/{app_id}/{bucket}/{encoded_path}`
    #[default]
    SignModeScoped,
    /// `{encoded_path}`, used by download urls.
    SignModeBare,
}

impl SignModeType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SignModeScoped => "scoped",
            Self::SignModeBare => "bare",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, FromRefAndDisplay)]
pub enum HttpMethodType {
    #[default]
    HttpMethodGet,
    HttpMethodPost,
}


impl HttpMethodType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::HttpMethodGet => "GET",
            Self::HttpMethodPost => "POST",
        }
    }

    pub fn as_http_method(&self) -> Method {
        match self {
            Self::HttpMethodGet => Method::GET,
            Self::HttpMethodPost => Method::POST,
        }
    }
}
