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
use crate::common::{deserialize_string_or_number, deserialize_u64, ResponseEnvelope};
use crate::constant::*;
use crate::enumeration::HttpMethodType::HttpMethodPost;
use crate::error::CosError;
use crate::http::HttpRequest;
use crate::internal::{add_upload_option, build_resource_url, parse_data, FileLocation, InputDescriptor, InputTranslator, MultipartForm, OutputParser};
use cos_v2_generic::{Envelope, FileLocation, UploadOption};
use serde::Deserialize;

pub trait MultipartAPI {
    fn upload_slice_init(&self, input: &UploadSliceInitInput) -> Result<UploadSliceInitOutput, CosError>;
    fn upload_slice_data(&self, input: &UploadSliceDataInput) -> Result<UploadSliceDataOutput, CosError>;
    fn upload_slice_finish(&self, input: &UploadSliceFinishInput) -> Result<UploadSliceFinishOutput, CosError>;
    /// Runs init, every data phase and finish for a local file. The first phase answering with
    /// a non-zero code ends the upload and its envelope is returned.
    fn upload_slice_file(&self, input: &UploadSliceFileInput) -> Result<UploadSliceFileOutput, CosError>;
    fn upload_slice_from_buffer(&self, input: &UploadSliceFromBufferInput) -> Result<UploadSliceFileOutput, CosError>;
}

/// Server-side state of a sliced upload, threaded through every phase.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SliceSession {
    pub(crate) url: String,
    pub(crate) session_id: String,
    pub(crate) file_size: u64,
    pub(crate) slice_size: u64,
}

impl SliceSession {
    pub fn new(url: impl Into<String>, session_id: impl Into<String>, file_size: u64, slice_size: u64) -> Self {
        Self {
            url: url.into(),
            session_id: session_id.into(),
            file_size,
            slice_size,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
    pub fn file_size(&self) -> u64 {
        self.file_size
    }
    pub fn slice_size(&self) -> u64 {
        self.slice_size
    }

    /// Offsets of the data phases, from `start` to the end of the file.
    pub fn offsets(&self, start: u64) -> Vec<u64> {
        let mut offsets = Vec::new();
        if self.slice_size == 0 {
            return offsets;
        }
        let mut offset = start;
        while offset < self.file_size {
            offsets.push(offset);
            offset += self.slice_size;
        }
        offsets
    }
}

pub(crate) fn check_slice_size(slice_size: u64) -> Result<(), CosError> {
    if slice_size == 0 {
        return CosError::client_error_result("invalid slice size, must be positive");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, FileLocation, UploadOption)]
pub struct UploadSliceInitInput {
    pub(crate) dir_name: String,
    pub(crate) file_name: String,
    pub(crate) file_size: u64,
    pub(crate) slice_size: u64,
    pub(crate) biz_attr: String,
    pub(crate) replace: bool,
}

impl Default for UploadSliceInitInput {
    fn default() -> Self {
        Self {
            dir_name: "".to_string(),
            file_name: "".to_string(),
            file_size: 0,
            slice_size: 0,
            biz_attr: "".to_string(),
            replace: true,
        }
    }
}

impl UploadSliceInitInput {
    pub fn new(file_name: impl Into<String>, file_size: u64, slice_size: u64) -> Self {
        let mut input = Self::default();
        input.file_name = file_name.into();
        input.file_size = file_size;
        input.slice_size = slice_size;
        input
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }
    pub fn slice_size(&self) -> u64 {
        self.slice_size
    }
    pub fn set_file_size(&mut self, file_size: u64) {
        self.file_size = file_size;
    }
    pub fn set_slice_size(&mut self, slice_size: u64) {
        self.slice_size = slice_size;
    }
}

impl InputDescriptor for UploadSliceInitInput {
    fn operation(&self) -> &'static str {
        UPLOAD_SLICE_INIT_OPERATION
    }
}

impl InputTranslator for UploadSliceInitInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        check_slice_size(self.slice_size)?;
        let file_path = self.resource_path()?;
        let mut request = HttpRequest::new(HttpMethodPost, build_resource_url(ctx.base_url().as_str(), file_path.as_str()));
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_more()?);

        let mut form = MultipartForm::new();
        form.add_text(FORM_OP, OP_UPLOAD_SLICE_INIT)
            .add_text(FORM_FILE_SIZE, self.file_size.to_string())
            .add_text(FORM_SLICE_SIZE, self.slice_size.to_string());
        add_upload_option(&mut form, self);
        form.apply(&mut request);
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct UploadSliceInitData {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    session: String,
    #[serde(default, deserialize_with = "deserialize_u64")]
    slice_size: u64,
    #[serde(default, deserialize_with = "deserialize_u64")]
    offset: u64,
    #[serde(default, deserialize_with = "deserialize_u64")]
    serial_upload: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct UploadSliceInitOutput {
    pub(crate) envelope: ResponseEnvelope,
    pub(crate) url: String,
    pub(crate) session_id: String,
    pub(crate) slice_size: u64,
    pub(crate) offset: u64,
    pub(crate) serial_upload: bool,
    pub(crate) session: Option<SliceSession>,
}

impl UploadSliceInitOutput {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
    /// Slice size granted by the service, zero when it kept the requested one.
    pub fn slice_size(&self) -> u64 {
        self.slice_size
    }
    pub fn offset(&self) -> u64 {
        self.offset
    }
    pub fn serial_upload(&self) -> bool {
        self.serial_upload
    }
    /// Present only when the call succeeded and the service opened a session.
    pub fn session(&self) -> Option<&SliceSession> {
        self.session.as_ref()
    }

    pub(crate) fn attach_session(&mut self, input: &UploadSliceInitInput) {
        if !self.is_success() || self.session_id == "" {
            return;
        }
        let mut slice_size = self.slice_size;
        if slice_size == 0 {
            slice_size = input.slice_size;
        }
        self.session = Some(SliceSession::new(self.url.as_str(), self.session_id.as_str(), input.file_size, slice_size));
    }
}

impl OutputParser for UploadSliceInitOutput {
    fn parse(request: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        let data = parse_data::<UploadSliceInitData>(&envelope)?;
        Ok(Self {
            envelope,
            url: request.url.clone(),
            session_id: data.session,
            slice_size: data.slice_size,
            offset: data.offset,
            serial_upload: data.serial_upload != 0,
            session: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadSliceDataInput {
    pub(crate) session: SliceSession,
    pub(crate) offset: u64,
    pub(crate) content: Vec<u8>,
}

impl UploadSliceDataInput {
    pub fn new(session: SliceSession, offset: u64, content: impl Into<Vec<u8>>) -> Self {
        Self {
            session,
            offset,
            content: content.into(),
        }
    }

    pub fn session(&self) -> &SliceSession {
        &self.session
    }
    pub fn offset(&self) -> u64 {
        self.offset
    }
    pub fn content(&self) -> &[u8] {
        &self.content
    }
    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
    }
}

impl InputDescriptor for UploadSliceDataInput {
    fn operation(&self) -> &'static str {
        UPLOAD_SLICE_DATA_OPERATION
    }
}

impl InputTranslator for UploadSliceDataInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        if self.session.session_id == "" || self.session.url == "" {
            return Err(CosError::client_error("invalid slice session"));
        }
        let mut request = HttpRequest::new(HttpMethodPost, self.session.url.as_str());
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_more()?);

        let mut form = MultipartForm::new();
        form.add_text(FORM_OP, OP_UPLOAD_SLICE_DATA)
            .add_file(FORM_FILE_CONTENT, "", DEFAULT_MIME_TYPE, &self.content)
            .add_text(FORM_SESSION, self.session.session_id.as_str())
            .add_text(FORM_OFFSET, self.offset.to_string());
        form.apply(&mut request);
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct UploadSliceDataData {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    session: String,
    #[serde(default, deserialize_with = "deserialize_u64")]
    offset: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct UploadSliceDataOutput {
    pub(crate) envelope: ResponseEnvelope,
    pub(crate) session_id: String,
    pub(crate) offset: u64,
}

impl UploadSliceDataOutput {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl OutputParser for UploadSliceDataOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        let data = parse_data::<UploadSliceDataData>(&envelope)?;
        Ok(Self {
            envelope,
            session_id: data.session,
            offset: data.offset,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadSliceFinishInput {
    pub(crate) session: SliceSession,
}

impl UploadSliceFinishInput {
    pub fn new(session: SliceSession) -> Self {
        Self {
            session,
        }
    }

    pub fn session(&self) -> &SliceSession {
        &self.session
    }
}

impl InputDescriptor for UploadSliceFinishInput {
    fn operation(&self) -> &'static str {
        UPLOAD_SLICE_FINISH_OPERATION
    }
}

impl InputTranslator for UploadSliceFinishInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        if self.session.session_id == "" || self.session.url == "" {
            return Err(CosError::client_error("invalid slice session"));
        }
        let mut request = HttpRequest::new(HttpMethodPost, self.session.url.as_str());
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_more()?);

        let mut form = MultipartForm::new();
        form.add_text(FORM_OP, OP_UPLOAD_SLICE_FINISH)
            .add_text(FORM_SESSION, self.session.session_id.as_str())
            .add_text(FORM_FILE_SIZE, self.session.file_size.to_string());
        form.apply(&mut request);
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct UploadSliceFinishData {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    access_url: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    resource_path: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    source_url: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct UploadSliceFinishOutput {
    pub(crate) envelope: ResponseEnvelope,
    pub(crate) access_url: String,
    pub(crate) resource_path: String,
    pub(crate) source_url: String,
    pub(crate) url: String,
}

impl UploadSliceFinishOutput {
    pub fn access_url(&self) -> &str {
        &self.access_url
    }
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl OutputParser for UploadSliceFinishOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        let data = parse_data::<UploadSliceFinishData>(&envelope)?;
        Ok(Self {
            envelope,
            access_url: data.access_url,
            resource_path: data.resource_path,
            source_url: data.source_url,
            url: data.url,
        })
    }
}

#[derive(Debug, Clone, PartialEq, FileLocation, UploadOption)]
pub struct UploadSliceFileInput {
    pub(crate) dir_name: String,
    pub(crate) file_name: String,
    pub(crate) file_path: String,
    pub(crate) slice_size: u64,
    pub(crate) offset: u64,
    pub(crate) biz_attr: String,
    pub(crate) replace: bool,
}

impl Default for UploadSliceFileInput {
    fn default() -> Self {
        Self {
            dir_name: "".to_string(),
            file_name: "".to_string(),
            file_path: "".to_string(),
            slice_size: 0,
            offset: 0,
            biz_attr: "".to_string(),
            replace: true,
        }
    }
}

impl UploadSliceFileInput {
    pub fn new(file_name: impl Into<String>, file_path: impl Into<String>, slice_size: u64) -> Self {
        let mut input = Self::default();
        input.file_name = file_name.into();
        input.file_path = file_path.into();
        input.slice_size = slice_size;
        input
    }

    /// Local path of the file to upload.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }
    pub fn slice_size(&self) -> u64 {
        self.slice_size
    }
    /// First byte to send, for resuming an interrupted upload.
    pub fn offset(&self) -> u64 {
        self.offset
    }
    pub fn set_file_path(&mut self, file_path: impl Into<String>) {
        self.file_path = file_path.into();
    }
    pub fn set_slice_size(&mut self, slice_size: u64) {
        self.slice_size = slice_size;
    }
    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    pub(crate) fn to_init_input(&self, file_size: u64) -> UploadSliceInitInput {
        UploadSliceInitInput {
            dir_name: self.dir_name.clone(),
            file_name: self.file_name.clone(),
            file_size,
            slice_size: self.slice_size,
            biz_attr: self.biz_attr.clone(),
            replace: self.replace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, FileLocation, UploadOption)]
pub struct UploadSliceFromBufferInput {
    pub(crate) dir_name: String,
    pub(crate) file_name: String,
    pub(crate) content: Vec<u8>,
    pub(crate) slice_size: u64,
    pub(crate) offset: u64,
    pub(crate) biz_attr: String,
    pub(crate) replace: bool,
}

impl Default for UploadSliceFromBufferInput {
    fn default() -> Self {
        Self {
            dir_name: "".to_string(),
            file_name: "".to_string(),
            content: vec![],
            slice_size: 0,
            offset: 0,
            biz_attr: "".to_string(),
            replace: true,
        }
    }
}

impl UploadSliceFromBufferInput {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>, slice_size: u64) -> Self {
        let mut input = Self::default();
        input.file_name = file_name.into();
        input.content = content.into();
        input.slice_size = slice_size;
        input
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
    pub fn slice_size(&self) -> u64 {
        self.slice_size
    }
    pub fn offset(&self) -> u64 {
        self.offset
    }
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
    }
    pub fn set_slice_size(&mut self, slice_size: u64) {
        self.slice_size = slice_size;
    }
    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    pub(crate) fn to_init_input(&self) -> UploadSliceInitInput {
        UploadSliceInitInput {
            dir_name: self.dir_name.clone(),
            file_name: self.file_name.clone(),
            file_size: self.content.len() as u64,
            slice_size: self.slice_size,
            biz_attr: self.biz_attr.clone(),
            replace: self.replace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct UploadSliceFileOutput {
    pub(crate) envelope: ResponseEnvelope,
    pub(crate) session: Option<SliceSession>,
    pub(crate) access_url: String,
    pub(crate) resource_path: String,
    pub(crate) source_url: String,
    pub(crate) url: String,
}

impl UploadSliceFileOutput {
    pub(crate) fn interrupted(envelope: ResponseEnvelope, session: Option<SliceSession>) -> Self {
        Self {
            envelope,
            session,
            ..Default::default()
        }
    }

    pub(crate) fn finished(finish: UploadSliceFinishOutput, session: SliceSession) -> Self {
        Self {
            envelope: finish.envelope,
            session: Some(session),
            access_url: finish.access_url,
            resource_path: finish.resource_path,
            source_url: finish.source_url,
            url: finish.url,
        }
    }

    /// Session used by the upload, absent when init did not succeed.
    pub fn session(&self) -> Option<&SliceSession> {
        self.session.as_ref()
    }
    pub fn access_url(&self) -> &str {
        &self.access_url
    }
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
    pub fn url(&self) -> &str {
        &self.url
    }
}
