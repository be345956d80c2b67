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
pub mod auth;
pub mod common;
pub mod cos;
pub mod credential;
pub mod enumeration;
pub mod error;
pub mod executor;
pub mod folder;
pub mod http;
pub mod multipart;
pub mod object;
#[cfg(feature = "asynchronous")]
pub mod asynchronous;
mod config;
mod constant;
mod internal;
