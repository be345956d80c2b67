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
use crate::error::CosError;
use crate::object::{UploadFileInput, UploadFileOutput};
use async_trait::async_trait;

/// Simple upload without blocking the caller's runtime; requests are bounded by the
/// configured `async_upload_timeout`.
#[async_trait]
pub trait ObjectAPI {
    async fn upload_file(&self, input: &UploadFileInput) -> Result<UploadFileOutput, CosError>;
}
