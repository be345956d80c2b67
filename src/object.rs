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
use crate::common::{deserialize_string_or_number, FileInfo, ResponseEnvelope};
use crate::constant::*;
use crate::enumeration::Authority;
use crate::enumeration::HttpMethodType::{HttpMethodGet, HttpMethodPost};
use crate::error::CosError;
use crate::http::{HttpRequest, HttpResponse};
use crate::internal::{add_upload_option, apply_json_body, build_resource_url, normalize_file_path, parse_data, url_encode, FileLocation, InputDescriptor, InputTranslator, MultipartForm, OutputParser};
use cos_v2_generic::{Envelope, FileLocation, UploadOption};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

pub trait ObjectAPI {
    fn upload_file(&self, input: &UploadFileInput) -> Result<UploadFileOutput, CosError>;
    fn upload_file_from_file(&self, input: &UploadFileFromFileInput) -> Result<UploadFileOutput, CosError>;
    /// A failed fetch of the origin is reported in the output and no upload is attempted.
    fn upload_file_from_url(&self, input: &UploadFileFromUrlInput) -> Result<UploadFileFromUrlOutput, CosError>;
    fn move_file(&self, input: &MoveFileInput) -> Result<MoveFileOutput, CosError>;
    fn copy_file(&self, input: &CopyFileInput) -> Result<CopyFileOutput, CosError>;
    fn delete_file(&self, input: &DeleteFileInput) -> Result<DeleteFileOutput, CosError>;
    fn stat_file(&self, input: &StatFileInput) -> Result<StatFileOutput, CosError>;
    fn update_file_status(&self, input: &UpdateFileStatusInput) -> Result<UpdateFileStatusOutput, CosError>;
    fn get_file(&self, input: &GetFileInput) -> Result<GetFileOutput, CosError>;
}

fn check_file_path(file_path: &str) -> Result<String, CosError> {
    let file_path = normalize_file_path(file_path);
    if file_path == "" || file_path.ends_with('/') {
        return Err(CosError::client_error("invalid file path"));
    }
    Ok(file_path)
}

#[derive(Debug, Clone, PartialEq, FileLocation, UploadOption)]
pub struct UploadFileInput {
    pub(crate) dir_name: String,
    pub(crate) file_name: String,
    pub(crate) content: Vec<u8>,
    pub(crate) biz_attr: String,
    pub(crate) replace: bool,
    pub(crate) mime_type: String,
}

impl Default for UploadFileInput {
    fn default() -> Self {
        Self {
            dir_name: "".to_string(),
            file_name: "".to_string(),
            content: vec![],
            biz_attr: "".to_string(),
            replace: true,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
        }
    }
}

impl UploadFileInput {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let mut input = Self::default();
        input.file_name = file_name.into();
        input.content = content.into();
        input
    }

    pub fn new_with_dir(dir_name: impl Into<String>, file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let mut input = Self::new(file_name, content);
        input.dir_name = dir_name.into();
        input
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
    }
    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = mime_type.into();
    }
}

impl InputDescriptor for UploadFileInput {
    fn operation(&self) -> &'static str {
        UPLOAD_FILE_OPERATION
    }
}

impl InputTranslator for UploadFileInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        let file_path = self.resource_path()?;
        let mut request = HttpRequest::new(HttpMethodPost, build_resource_url(ctx.base_url().as_str(), file_path.as_str()));
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_more()?);

        let mut mime_type = self.mime_type.as_str();
        if mime_type == "" {
            mime_type = DEFAULT_MIME_TYPE;
        }
        let mut form = MultipartForm::new();
        form.add_text(FORM_OP, OP_UPLOAD);
        add_upload_option(&mut form, self);
        form.add_file(FORM_FILE_CONTENT, "", mime_type, &self.content);
        form.apply(&mut request);
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, FileLocation, UploadOption)]
pub struct UploadFileFromFileInput {
    pub(crate) dir_name: String,
    pub(crate) file_name: String,
    pub(crate) file_path: String,
    pub(crate) biz_attr: String,
    pub(crate) replace: bool,
    pub(crate) mime_type: String,
}

impl Default for UploadFileFromFileInput {
    fn default() -> Self {
        Self {
            dir_name: "".to_string(),
            file_name: "".to_string(),
            file_path: "".to_string(),
            biz_attr: "".to_string(),
            replace: true,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
        }
    }
}

impl UploadFileFromFileInput {
    pub fn new(file_name: impl Into<String>, file_path: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.file_name = file_name.into();
        input.file_path = file_path.into();
        input
    }

    /// Local path of the file to upload.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
    pub fn set_file_path(&mut self, file_path: impl Into<String>) {
        self.file_path = file_path.into();
    }
    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = mime_type.into();
    }

    pub(crate) fn to_upload_file_input(&self, content: Vec<u8>) -> UploadFileInput {
        UploadFileInput {
            dir_name: self.dir_name.clone(),
            file_name: self.file_name.clone(),
            content,
            biz_attr: self.biz_attr.clone(),
            replace: self.replace,
            mime_type: self.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct UploadFileData {
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
pub struct UploadFileOutput {
    pub(crate) envelope: ResponseEnvelope,
    pub(crate) access_url: String,
    pub(crate) resource_path: String,
    pub(crate) source_url: String,
    pub(crate) url: String,
}

impl UploadFileOutput {
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

impl OutputParser for UploadFileOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        let data = parse_data::<UploadFileData>(&envelope)?;
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
pub struct UploadFileFromUrlInput {
    pub(crate) url: String,
    pub(crate) dir_name: String,
    pub(crate) file_name: String,
    pub(crate) biz_attr: String,
    pub(crate) replace: bool,
}

impl Default for UploadFileFromUrlInput {
    fn default() -> Self {
        Self {
            url: "".to_string(),
            dir_name: "".to_string(),
            file_name: "".to_string(),
            biz_attr: "".to_string(),
            replace: true,
        }
    }
}

impl UploadFileFromUrlInput {
    pub fn new(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.url = url.into();
        input.file_name = file_name.into();
        input
    }

    pub fn url(&self) -> &str {
        &self.url
    }
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub(crate) fn fetch_request(&self) -> Result<HttpRequest, CosError> {
        let url = self.url.trim();
        if url == "" {
            return Err(CosError::client_error("empty fetch url"));
        }
        let mut request = HttpRequest::new(HttpMethodGet, url);
        request.operation = FETCH_URL_OPERATION;
        Ok(request)
    }

    pub(crate) fn to_upload_file_input(&self, content: Vec<u8>, mime_type: &str) -> UploadFileInput {
        UploadFileInput {
            dir_name: self.dir_name.clone(),
            file_name: self.file_name.clone(),
            content,
            biz_attr: self.biz_attr.clone(),
            replace: self.replace,
            mime_type: mime_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadFileFromUrlOutput {
    pub(crate) fetch_error: Option<String>,
    pub(crate) fetch_status_code: Option<isize>,
    pub(crate) upload: Option<UploadFileOutput>,
}

impl UploadFileFromUrlOutput {
    pub(crate) fn fetch_failed(message: impl Into<String>, status_code: Option<isize>) -> Self {
        Self {
            fetch_error: Some(message.into()),
            fetch_status_code: status_code,
            upload: None,
        }
    }

    pub(crate) fn uploaded(upload: UploadFileOutput) -> Self {
        Self {
            fetch_error: None,
            fetch_status_code: None,
            upload: Some(upload),
        }
    }

    pub fn is_fetch_failed(&self) -> bool {
        self.fetch_error.is_some()
    }
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }
    pub fn fetch_status_code(&self) -> Option<isize> {
        self.fetch_status_code
    }
    pub fn upload(&self) -> Option<&UploadFileOutput> {
        self.upload.as_ref()
    }
}

/// Body shared by move and copy; the empty file part keeps the request a multipart form.
fn trans_relocate(ctx: &SignContext, operation: &'static str, op: &str, src_file_path: &str, dest_file_path: &str,
                  overwrite: bool) -> Result<HttpRequest, CosError> {
    let src_file_path = check_file_path(src_file_path)?;
    let dest_file_path = check_file_path(dest_file_path)?;
    let mut request = HttpRequest::new(HttpMethodPost, build_resource_url(ctx.base_url().as_str(), src_file_path.as_str()));
    request.operation = operation;
    request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_once(src_file_path.as_str())?);

    let mut form = MultipartForm::new();
    form.add_text(FORM_OP, op)
        .add_text(FORM_DEST_FILE_ID, dest_file_path)
        .add_text(FORM_TO_OVER_WRITE, if overwrite { "1" } else { "0" })
        .add_file(FORM_FILE_CONTENT, "", DEFAULT_MIME_TYPE, &[]);
    form.apply(&mut request);
    Ok(request)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveFileInput {
    pub(crate) src_file_path: String,
    pub(crate) dest_file_path: String,
    pub(crate) overwrite: bool,
}

impl MoveFileInput {
    pub fn new(src_file_path: impl Into<String>, dest_file_path: impl Into<String>) -> Self {
        Self {
            src_file_path: src_file_path.into(),
            dest_file_path: dest_file_path.into(),
            overwrite: false,
        }
    }

    pub fn src_file_path(&self) -> &str {
        &self.src_file_path
    }
    pub fn dest_file_path(&self) -> &str {
        &self.dest_file_path
    }
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }
    pub fn set_src_file_path(&mut self, src_file_path: impl Into<String>) {
        self.src_file_path = src_file_path.into();
    }
    pub fn set_dest_file_path(&mut self, dest_file_path: impl Into<String>) {
        self.dest_file_path = dest_file_path.into();
    }
    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }
}

impl InputDescriptor for MoveFileInput {
    fn operation(&self) -> &'static str {
        MOVE_FILE_OPERATION
    }
}

impl InputTranslator for MoveFileInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        trans_relocate(ctx, self.operation(), OP_MOVE, &self.src_file_path, &self.dest_file_path, self.overwrite)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct MoveFileOutput {
    pub(crate) envelope: ResponseEnvelope,
}

impl OutputParser for MoveFileOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        Ok(Self { envelope })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CopyFileInput {
    pub(crate) src_file_path: String,
    pub(crate) dest_file_path: String,
    pub(crate) overwrite: bool,
}

impl CopyFileInput {
    pub fn new(src_file_path: impl Into<String>, dest_file_path: impl Into<String>) -> Self {
        Self {
            src_file_path: src_file_path.into(),
            dest_file_path: dest_file_path.into(),
            overwrite: false,
        }
    }

    pub fn src_file_path(&self) -> &str {
        &self.src_file_path
    }
    pub fn dest_file_path(&self) -> &str {
        &self.dest_file_path
    }
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }
    pub fn set_src_file_path(&mut self, src_file_path: impl Into<String>) {
        self.src_file_path = src_file_path.into();
    }
    pub fn set_dest_file_path(&mut self, dest_file_path: impl Into<String>) {
        self.dest_file_path = dest_file_path.into();
    }
    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }
}

impl InputDescriptor for CopyFileInput {
    fn operation(&self) -> &'static str {
        COPY_FILE_OPERATION
    }
}

impl InputTranslator for CopyFileInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        trans_relocate(ctx, self.operation(), OP_COPY, &self.src_file_path, &self.dest_file_path, self.overwrite)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct CopyFileOutput {
    pub(crate) envelope: ResponseEnvelope,
}

impl OutputParser for CopyFileOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        Ok(Self { envelope })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteFileInput {
    pub(crate) file_path: String,
}

impl DeleteFileInput {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
    pub fn set_file_path(&mut self, file_path: impl Into<String>) {
        self.file_path = file_path.into();
    }
}

impl InputDescriptor for DeleteFileInput {
    fn operation(&self) -> &'static str {
        DELETE_FILE_OPERATION
    }
}

impl InputTranslator for DeleteFileInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        let file_path = check_file_path(self.file_path.as_str())?;
        let mut request = HttpRequest::new(HttpMethodPost, build_resource_url(ctx.base_url().as_str(), file_path.as_str()));
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_once(file_path.as_str())?);
        apply_json_body(&mut request, &json!({
            "op": OP_DELETE,
        }))?;
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct DeleteFileOutput {
    pub(crate) envelope: ResponseEnvelope,
}

impl OutputParser for DeleteFileOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        Ok(Self { envelope })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatFileInput {
    pub(crate) file_path: String,
}

impl StatFileInput {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
    pub fn set_file_path(&mut self, file_path: impl Into<String>) {
        self.file_path = file_path.into();
    }
}

impl InputDescriptor for StatFileInput {
    fn operation(&self) -> &'static str {
        STAT_FILE_OPERATION
    }
}

impl InputTranslator for StatFileInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        let file_path = check_file_path(self.file_path.as_str())?;
        let url = format!("{}?{}={}", build_resource_url(ctx.base_url().as_str(), file_path.as_str()), QUERY_OP, OP_STAT);
        let mut request = HttpRequest::new(HttpMethodGet, url);
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_more()?);
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct StatFileOutput {
    pub(crate) envelope: ResponseEnvelope,
    pub(crate) info: FileInfo,
}

impl StatFileOutput {
    pub fn info(&self) -> &FileInfo {
        &self.info
    }
}

impl OutputParser for StatFileOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        let info = parse_data::<FileInfo>(&envelope)?;
        Ok(Self {
            envelope,
            info,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateFileStatusInput {
    pub(crate) file_path: String,
    pub(crate) authority: String,
    pub(crate) custom_headers: HashMap<String, String>,
}

impl Default for UpdateFileStatusInput {
    fn default() -> Self {
        Self {
            file_path: "".to_string(),
            authority: Authority::AuthorityInvalid.as_str().to_string(),
            custom_headers: HashMap::new(),
        }
    }
}

impl UpdateFileStatusInput {
    pub fn new(file_path: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.file_path = file_path.into();
        input
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
    pub fn authority(&self) -> &str {
        &self.authority
    }
    pub fn custom_headers(&self) -> &HashMap<String, String> {
        &self.custom_headers
    }
    pub fn set_file_path(&mut self, file_path: impl Into<String>) {
        self.file_path = file_path.into();
    }
    /// One of `eInvalid`, `eWRPrivate`, `eWPrivateRPublic`; other values fail before sending.
    pub fn set_authority(&mut self, authority: impl Into<String>) {
        self.authority = authority.into();
    }
    pub fn set_custom_headers(&mut self, custom_headers: impl Into<HashMap<String, String>>) {
        self.custom_headers = custom_headers.into();
    }
}

impl InputDescriptor for UpdateFileStatusInput {
    fn operation(&self) -> &'static str {
        UPDATE_FILE_STATUS_OPERATION
    }
}

impl InputTranslator for UpdateFileStatusInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        let authority = match Authority::parse(self.authority.as_str()) {
            Some(authority) => authority,
            None => return Err(CosError::client_error(format!("invalid authority {}", self.authority))),
        };
        let file_path = check_file_path(self.file_path.as_str())?;
        let mut request = HttpRequest::new(HttpMethodPost, build_resource_url(ctx.base_url().as_str(), file_path.as_str()));
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_once(file_path.as_str())?);
        apply_json_body(&mut request, &json!({
            "op": OP_UPDATE,
            "authority": authority,
            "custom_headers": self.custom_headers,
        }))?;
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct UpdateFileStatusOutput {
    pub(crate) envelope: ResponseEnvelope,
}

impl OutputParser for UpdateFileStatusOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        Ok(Self { envelope })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GetFileInput {
    pub(crate) file_path: String,
    pub(crate) expires: i64,
}

impl GetFileInput {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            expires: 0,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
    /// Lifetime of the download token; the configured signature lifetime when not positive.
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

impl InputDescriptor for GetFileInput {
    fn operation(&self) -> &'static str {
        GET_FILE_OPERATION
    }
}

impl InputTranslator for GetFileInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        let file_path = check_file_path(self.file_path.as_str())?;
        let mut expires = self.expires;
        if expires <= 0 {
            expires = ctx.config_holder.sign_expires;
        }
        let token = ctx.sign_download(format!("/{}", file_path).as_str(), expires)?;
        let url = format!("{}?{}={}", build_resource_url(ctx.base_url().as_str(), file_path.as_str()), QUERY_SIGN, url_encode(token.as_str()));
        let mut request = HttpRequest::new(HttpMethodGet, url);
        request.operation = self.operation();
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GetFileOutput {
    pub(crate) status_code: isize,
    pub(crate) header: HashMap<String, String>,
    pub(crate) content_type: String,
    pub(crate) content: Vec<u8>,
}

impl GetFileOutput {
    pub(crate) fn from_response(response: HttpResponse) -> Self {
        let content_type = response.header_value(HEADER_CONTENT_TYPE).unwrap_or("").to_string();
        Self {
            status_code: response.status_code,
            header: response.header,
            content_type,
            content: response.body,
        }
    }

    pub fn status_code(&self) -> isize {
        self.status_code
    }
    pub fn header(&self) -> &HashMap<String, String> {
        &self.header
    }
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
    pub fn content(&self) -> &[u8] {
        &self.content
    }
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}
