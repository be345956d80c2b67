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
use crate::constant::{DEFAULT_SIGN_EXPIRES, QUERY_SIGN, SIGN_DIGEST_LENGTH, SIGN_RANDOM_MAX};
use crate::enumeration::SignModeType;
use crate::enumeration::SignModeType::{SignModeBare, SignModeScoped};
use crate::error::{CosError, GenericError};
use crate::internal::{base64, base64_decode, build_resource_url, hmac_sha1, new_hmac_sha1, normalize_file_path, url_encode, url_encode_with_safe};
use chrono::Utc;
use hmac::Mac;
use rand::Rng;
use tracing::log::debug;

pub trait SignerAPI {
    /// Token valid for a single request, scoped to `path`.
    fn sign_once(&self, path: &str) -> Result<String, CosError>;
    /// Reusable token; `expires` is a duration in seconds or an absolute epoch.
    fn sign_more(&self, path: &str, expires: i64) -> Result<String, CosError>;
    fn sign_download(&self, path: &str, expires: i64) -> Result<String, CosError>;
    fn pre_signed_download_url(&self, input: &PreSignedDownloadURLInput) -> Result<PreSignedDownloadURLOutput, CosError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreSignedDownloadURLInput {
    pub(crate) file_path: String,
    pub(crate) expires: i64,
}

impl Default for PreSignedDownloadURLInput {
    fn default() -> Self {
        Self {
            file_path: "".to_string(),
            expires: 3600,
        }
    }
}

impl PreSignedDownloadURLInput {
    pub fn new(file_path: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.file_path = file_path.into();
        input
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
    pub fn expires(&self) -> i64 {
        self.expires
    }
    pub fn set_file_path(&mut self, file_path: impl Into<String>) {
        self.file_path = file_path.into();
    }
    pub fn set_expires(&mut self, expires: i64) {
        self.expires = expires;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreSignedDownloadURLOutput {
    pub(crate) signed_url: String,
    pub(crate) token: String,
}

impl PreSignedDownloadURLOutput {
    pub fn signed_url(&self) -> &str {
        &self.signed_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Claims carried in the plaintext half of a token.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureClaims {
    pub(crate) app_id: String,
    pub(crate) secret_id: String,
    pub(crate) expired: i64,
    pub(crate) issued_at: i64,
    pub(crate) rand: u64,
    pub(crate) file_id: String,
    pub(crate) bucket: String,
    pub(crate) digest: Vec<u8>,
    pub(crate) plain_text: String,
}

impl SignatureClaims {
    pub fn app_id(&self) -> &str {
        &self.app_id
    }
    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }
    pub fn expired(&self) -> i64 {
        self.expired
    }
    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }
    pub fn rand(&self) -> u64 {
        self.rand
    }
    pub fn file_id(&self) -> &str {
        &self.file_id
    }
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }
    pub fn is_single_use(&self) -> bool {
        self.expired == self.issued_at
    }
}

/// Computes `base64(hmac_sha1(secret_key, claims) || claims)`.
///
/// A non-zero `expires` smaller than the current epoch is treated as a duration, anything
/// larger is an absolute epoch. Zero yields a single-use token.
pub fn app_sign(app_id: &str, secret_id: &str, secret_key: &str, bucket: &str, path: &str,
                expires: i64, mode: &SignModeType) -> Result<String, CosError> {
    let now = Utc::now().timestamp();
    let rdm = rand::thread_rng().gen_range(0..=SIGN_RANDOM_MAX);
    let encoded_path = url_encode_with_safe(path, "/");
    let file_id = match mode {
        SignModeScoped => format!("/{}/{}/{}", app_id, bucket, encoded_path),
        SignModeBare => encoded_path,
    };

    let mut expired = expires;
    if expired != 0 && expired < now {
        expired = now + expired;
    }

    let plain_text = format!("a={}&k={}&e={}&t={}&r={}&f={}&b={}", app_id, secret_id, expired, now, rdm, file_id, bucket);
    debug!("sign {} in {} mode, expired: {}, issued at: {}", file_id, mode, expired, now);
    let digest = hmac_sha1(plain_text.as_bytes(), secret_key)?;
    let mut token = Vec::with_capacity(SIGN_DIGEST_LENGTH + plain_text.len());
    token.extend_from_slice(digest.as_ref());
    token.extend_from_slice(plain_text.as_bytes());
    Ok(base64(token))
}

pub fn sign_once(app_id: &str, secret_id: &str, secret_key: &str, bucket: &str, path: &str) -> Result<String, CosError> {
    app_sign(app_id, secret_id, secret_key, bucket, path, 0, &SignModeScoped)
}

pub fn sign_more(app_id: &str, secret_id: &str, secret_key: &str, bucket: &str, path: &str, expires: i64) -> Result<String, CosError> {
    app_sign(app_id, secret_id, secret_key, bucket, path, expires, &SignModeScoped)
}

pub fn sign_download(app_id: &str, secret_id: &str, secret_key: &str, bucket: &str, path: &str, expires: i64) -> Result<String, CosError> {
    app_sign(app_id, secret_id, secret_key, bucket, path, expires, &SignModeBare)
}

/// Splits a token into digest and claims without checking the digest.
pub fn parse_signature(token: &str) -> Result<SignatureClaims, CosError> {
    let raw = base64_decode(token.trim())?;
    if raw.len() <= SIGN_DIGEST_LENGTH {
        return Err(CosError::client_error("signature too short"));
    }

    let (digest, plain_text) = raw.split_at(SIGN_DIGEST_LENGTH);
    let plain_text = String::from_utf8(plain_text.to_vec())
        .map_err(|e| CosError::client_error_with_cause("signature claims are not utf-8", GenericError::DefaultError(e.to_string())))?;

    let mut claims = SignatureClaims {
        digest: digest.to_vec(),
        ..Default::default()
    };
    for item in plain_text.split('&') {
        let (key, value) = item.split_once('=').unwrap_or((item, ""));
        match key {
            "a" => claims.app_id = value.to_string(),
            "k" => claims.secret_id = value.to_string(),
            "e" => claims.expired = parse_claim_number(key, value)?,
            "t" => claims.issued_at = parse_claim_number(key, value)?,
            "r" => claims.rand = parse_claim_number(key, value)? as u64,
            "f" => claims.file_id = value.to_string(),
            "b" => claims.bucket = value.to_string(),
            _ => return Err(CosError::client_error(format!("unknown signature claim {}", key))),
        }
    }
    claims.plain_text = plain_text;
    Ok(claims)
}

/// Parses the token and checks its digest against `secret_key`.
pub fn verify_signature(token: &str, secret_key: &str) -> Result<SignatureClaims, CosError> {
    let claims = parse_signature(token)?;
    let mut m = new_hmac_sha1(secret_key)?;
    m.update(claims.plain_text.as_bytes());
    if m.verify_slice(&claims.digest).is_err() {
        return Err(CosError::client_error("signature digest mismatch"));
    }
    Ok(claims)
}

fn parse_claim_number(key: &str, value: &str) -> Result<i64, CosError> {
    value.parse::<i64>()
        .map_err(|e| CosError::client_error_with_cause(format!("invalid signature claim {}", key), GenericError::DefaultError(e.to_string())))
}

/// Everything an input needs to turn itself into a signed request.
pub(crate) struct SignContext<'a> {
    pub(crate) config_holder: &'a ConfigHolder,
    pub(crate) app_id: &'a str,
    pub(crate) secret_id: &'a str,
    pub(crate) secret_key: &'a str,
}

impl<'a> SignContext<'a> {
    pub(crate) fn base_url(&self) -> String {
        self.config_holder.get_base_url(self.app_id)
    }

    pub(crate) fn bucket(&self) -> &str {
        &self.config_holder.bucket
    }

    pub(crate) fn sign_once(&self, path: &str) -> Result<String, CosError> {
        sign_once(self.app_id, self.secret_id, self.secret_key, self.bucket(), path)
    }

    /// Reusable token over the whole bucket, valid for the configured lifetime.
    pub(crate) fn sign_more(&self) -> Result<String, CosError> {
        let mut expires = self.config_holder.sign_expires;
        if expires <= 0 {
            expires = DEFAULT_SIGN_EXPIRES;
        }
        sign_more(self.app_id, self.secret_id, self.secret_key, self.bucket(), "", expires)
    }

    pub(crate) fn sign_download(&self, path: &str, expires: i64) -> Result<String, CosError> {
        sign_download(self.app_id, self.secret_id, self.secret_key, self.bucket(), path, expires)
    }

    pub(crate) fn pre_signed_download_url(&self, input: &PreSignedDownloadURLInput) -> Result<PreSignedDownloadURLOutput, CosError> {
        let file_path = normalize_file_path(input.file_path.as_str());
        if file_path == "" {
            return Err(CosError::client_error("invalid file path"));
        }
        let token = self.sign_download(format!("/{}", file_path).as_str(), input.expires)?;
        let signed_url = format!("{}?{}={}", build_resource_url(self.base_url().as_str(), file_path.as_str()), QUERY_SIGN, url_encode(token.as_str()));
        Ok(PreSignedDownloadURLOutput {
            signed_url,
            token,
        })
    }
}
