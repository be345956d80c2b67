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
use serde::de::StdError;
use std::env;
use std::fmt::Debug;

pub(crate) const ENV_APP_ID: &str = "COS_APP_ID";
pub(crate) const ENV_SECRET_ID: &str = "COS_SECRET_ID";
pub(crate) const ENV_SECRET_KEY: &str = "COS_SECRET_KEY";

pub trait Credentials: Sized {
    fn app_id(&self) -> &str;
    fn secret_id(&self) -> &str;
    fn secret_key(&self) -> &str;

    fn new(app_id: impl Into<String>, secret_id: impl Into<String>, secret_key: impl Into<String>) -> Result<Self, Box<dyn StdError + Send + Sync>>;
}


pub trait CredentialsProvider<C>: Sized
where
    C: Credentials,
{
    fn credentials(&self) -> Result<&C, Box<dyn StdError + Send + Sync>>;

    fn new(c: C) -> Result<Self, Box<dyn StdError + Send + Sync>>;
}


#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommonCredentialsProvider<C> {
    pub(crate) credentials: C,
}

impl<C> CredentialsProvider<C> for CommonCredentialsProvider<C>
where
    C: Credentials,
{
    fn credentials(&self) -> Result<&C, Box<dyn StdError + Send + Sync>> {
        Ok(&self.credentials)
    }

    fn new(c: C) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(CommonCredentialsProvider {
            credentials: c,
        })
    }
}


#[derive(Clone, PartialEq, Default)]
pub struct CommonCredentials {
    pub(crate) app_id: String,
    pub(crate) secret_id: String,
    pub(crate) secret_key: String,
}

impl Debug for CommonCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommonCredentials")
            .field("app_id", &self.app_id)
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"***")
            .finish()
    }
}

impl Credentials for CommonCredentials {
    fn app_id(&self) -> &str {
        &self.app_id
    }

    fn secret_id(&self) -> &str {
        &self.secret_id
    }

    fn secret_key(&self) -> &str {
        &self.secret_key
    }

    fn new(app_id: impl Into<String>, secret_id: impl Into<String>, secret_key: impl Into<String>) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(CommonCredentials {
            app_id: app_id.into(),
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
        })
    }
}


#[derive(Debug, Default)]
pub struct StaticCredentialsProvider<C> {
    pub(crate) cred: C,
}

impl<C> StaticCredentialsProvider<C>
where
    C: Credentials,
{
    pub fn from_keys(app_id: impl Into<String>, secret_id: impl Into<String>, secret_key: impl Into<String>) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let app_id = app_id.into().trim().to_owned();
        let mut secret_id = secret_id.into().trim().to_owned();
        let mut secret_key = secret_key.into().trim().to_owned();
        if secret_id == "" {
            secret_key = "".to_owned();
        } else if secret_key == "" {
            secret_id = "".to_owned();
        }

        let cred = C::new(app_id, secret_id, secret_key)?;
        Ok(Self { cred })
    }
}

impl<C> CredentialsProvider<C> for StaticCredentialsProvider<C>
where
    C: Credentials,
{
    fn credentials(&self) -> Result<&C, Box<dyn StdError + Send + Sync>> {
        Ok(&self.cred)
    }

    fn new(cred: C) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(Self {
            cred
        })
    }
}

/// Reads `COS_APP_ID`, `COS_SECRET_ID` and `COS_SECRET_KEY` once, at construction.
#[derive(Debug, Default)]
pub struct EnvCredentialsProvider<C> {
    pub(crate) cred: C,
}

impl<C> EnvCredentialsProvider<C>
where
    C: Credentials,
{
    pub fn from_env() -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let app_id = env::var(ENV_APP_ID).map_err(|e| format!("read {} error: {}", ENV_APP_ID, e))?;
        let mut secret_id = "".to_string();
        let mut secret_key = "".to_string();
        if let Ok(_secret_id) = env::var(ENV_SECRET_ID) {
            if let Ok(_secret_key) = env::var(ENV_SECRET_KEY) {
                secret_id = _secret_id;
                secret_key = _secret_key;
            }
        }
        let cred = C::new(app_id, secret_id, secret_key)?;
        Ok(Self { cred })
    }
}


impl<C> CredentialsProvider<C> for EnvCredentialsProvider<C>
where
    C: Credentials,
{
    fn credentials(&self) -> Result<&C, Box<dyn StdError + Send + Sync>> {
        Ok(&self.cred)
    }

    fn new(cred: C) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(Self {
            cred
        })
    }
}
