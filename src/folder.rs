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
use crate::common::{deserialize_null_default, deserialize_string_or_number, deserialize_u64, FileInfo, ResponseEnvelope};
use crate::constant::*;
use crate::enumeration::HttpMethodType::{HttpMethodGet, HttpMethodPost};
use crate::error::CosError;
use crate::http::HttpRequest;
use crate::internal::{apply_json_body, build_resource_url, normalize_folder, parse_data, url_encode, url_encode_with_safe, InputDescriptor, InputTranslator, OutputParser};
use cos_v2_generic::Envelope;
use serde::Deserialize;
use serde_json::json;

pub trait FolderAPI {
    fn create_folder(&self, input: &CreateFolderInput) -> Result<CreateFolderOutput, CosError>;
    fn list_folder(&self, input: &ListFolderInput) -> Result<ListFolderOutput, CosError>;
    fn stat_folder(&self, input: &StatFolderInput) -> Result<StatFolderOutput, CosError>;
    fn delete_folder(&self, input: &DeleteFolderInput) -> Result<DeleteFolderOutput, CosError>;
}

/// `{base}/{dir}/`, or `{base}/` for the bucket root.
fn folder_url(ctx: &SignContext, dir_name: &str) -> String {
    let base_url = ctx.base_url();
    if dir_name == "" {
        return base_url + "/";
    }
    build_resource_url(base_url.as_str(), dir_name) + "/"
}

fn check_folder_name(dir_name: &str) -> Result<(), CosError> {
    if dir_name == "" {
        return CosError::client_error_result("invalid folder name");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateFolderInput {
    pub(crate) dir_name: String,
    pub(crate) biz_attr: String,
}

impl CreateFolderInput {
    pub fn new(dir_name: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.dir_name = dir_name.into();
        input
    }

    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }
    pub fn biz_attr(&self) -> &str {
        &self.biz_attr
    }
    pub fn set_dir_name(&mut self, dir_name: impl Into<String>) {
        self.dir_name = dir_name.into();
    }
    pub fn set_biz_attr(&mut self, biz_attr: impl Into<String>) {
        self.biz_attr = biz_attr.into();
    }
}

impl InputDescriptor for CreateFolderInput {
    fn operation(&self) -> &'static str {
        CREATE_FOLDER_OPERATION
    }
}

impl InputTranslator for CreateFolderInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        let dir_name = normalize_folder(self.dir_name.as_str());
        check_folder_name(dir_name.as_str())?;
        let mut request = HttpRequest::new(HttpMethodPost, folder_url(ctx, dir_name.as_str()));
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_more()?);
        apply_json_body(&mut request, &json!({
            "op": OP_CREATE,
            "biz_attr": self.biz_attr,
        }))?;
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct CreateFolderData {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    ctime: String,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    resource_path: String,
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct CreateFolderOutput {
    pub(crate) envelope: ResponseEnvelope,
    pub(crate) ctime: String,
    pub(crate) resource_path: String,
}

impl CreateFolderOutput {
    pub fn ctime(&self) -> &str {
        &self.ctime
    }
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }
}

impl OutputParser for CreateFolderOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        let data = parse_data::<CreateFolderData>(&envelope)?;
        Ok(Self {
            envelope,
            ctime: data.ctime,
            resource_path: data.resource_path,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListFolderInput {
    pub(crate) dir_name: String,
    pub(crate) prefix: String,
    pub(crate) num: isize,
    pub(crate) context: String,
}

impl Default for ListFolderInput {
    fn default() -> Self {
        Self {
            dir_name: "".to_string(),
            prefix: "".to_string(),
            num: MAX_LIST_NUM,
            context: "".to_string(),
        }
    }
}

impl ListFolderInput {
    pub fn new(dir_name: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.dir_name = dir_name.into();
        input
    }

    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
    pub fn num(&self) -> isize {
        self.num
    }
    pub fn context(&self) -> &str {
        &self.context
    }
    pub fn set_dir_name(&mut self, dir_name: impl Into<String>) {
        self.dir_name = dir_name.into();
    }
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }
    pub fn set_num(&mut self, num: isize) {
        self.num = num;
    }
    /// Opaque cursor returned by the previous page.
    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }
}

impl InputDescriptor for ListFolderInput {
    fn operation(&self) -> &'static str {
        LIST_FOLDER_OPERATION
    }
}

impl InputTranslator for ListFolderInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        let dir_name = normalize_folder(self.dir_name.as_str());
        let mut num = self.num;
        if num <= 0 || num > MAX_LIST_NUM {
            num = MAX_LIST_NUM;
        }

        let mut url = folder_url(ctx, dir_name.as_str());
        url += url_encode_with_safe(self.prefix.as_str(), "/").as_str();
        url += format!("?{}={}&{}={}", QUERY_OP, OP_LIST, QUERY_NUM, num).as_str();
        if self.context != "" {
            url += format!("&{}={}", QUERY_CONTEXT, url_encode(self.context.as_str())).as_str();
        }

        let mut request = HttpRequest::new(HttpMethodGet, url);
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_more()?);
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct ListFolderData {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    context: String,
    #[serde(default, rename = "listover", deserialize_with = "deserialize_null_default")]
    list_over: bool,
    #[serde(default, rename = "dircount", deserialize_with = "deserialize_u64")]
    dir_count: u64,
    #[serde(default, rename = "filecount", deserialize_with = "deserialize_u64")]
    file_count: u64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    infos: Vec<FileInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct ListFolderOutput {
    pub(crate) envelope: ResponseEnvelope,
    pub(crate) context: String,
    pub(crate) list_over: bool,
    pub(crate) dir_count: u64,
    pub(crate) file_count: u64,
    pub(crate) infos: Vec<FileInfo>,
}

impl ListFolderOutput {
    /// Pass to the next [`ListFolderInput`] to continue listing.
    pub fn context(&self) -> &str {
        &self.context
    }
    pub fn list_over(&self) -> bool {
        self.list_over
    }
    pub fn dir_count(&self) -> u64 {
        self.dir_count
    }
    pub fn file_count(&self) -> u64 {
        self.file_count
    }
    pub fn infos(&self) -> &Vec<FileInfo> {
        &self.infos
    }
}

impl OutputParser for ListFolderOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        let data = parse_data::<ListFolderData>(&envelope)?;
        Ok(Self {
            envelope,
            context: data.context,
            list_over: data.list_over,
            dir_count: data.dir_count,
            file_count: data.file_count,
            infos: data.infos,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatFolderInput {
    pub(crate) dir_name: String,
}

impl StatFolderInput {
    pub fn new(dir_name: impl Into<String>) -> Self {
        Self {
            dir_name: dir_name.into(),
        }
    }

    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }
    pub fn set_dir_name(&mut self, dir_name: impl Into<String>) {
        self.dir_name = dir_name.into();
    }
}

impl InputDescriptor for StatFolderInput {
    fn operation(&self) -> &'static str {
        STAT_FOLDER_OPERATION
    }
}

impl InputTranslator for StatFolderInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        let dir_name = normalize_folder(self.dir_name.as_str());
        let url = format!("{}?{}={}", folder_url(ctx, dir_name.as_str()), QUERY_OP, OP_STAT);
        let mut request = HttpRequest::new(HttpMethodGet, url);
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_more()?);
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct StatFolderOutput {
    pub(crate) envelope: ResponseEnvelope,
    pub(crate) info: FileInfo,
}

impl StatFolderOutput {
    pub fn info(&self) -> &FileInfo {
        &self.info
    }
}

impl OutputParser for StatFolderOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        let info = parse_data::<FileInfo>(&envelope)?;
        Ok(Self {
            envelope,
            info,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteFolderInput {
    pub(crate) dir_name: String,
}

impl DeleteFolderInput {
    pub fn new(dir_name: impl Into<String>) -> Self {
        Self {
            dir_name: dir_name.into(),
        }
    }

    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }
    pub fn set_dir_name(&mut self, dir_name: impl Into<String>) {
        self.dir_name = dir_name.into();
    }
}

impl InputDescriptor for DeleteFolderInput {
    fn operation(&self) -> &'static str {
        DELETE_FOLDER_OPERATION
    }
}

impl InputTranslator for DeleteFolderInput {
    fn trans(&self, ctx: &SignContext) -> Result<HttpRequest, CosError> {
        let dir_name = normalize_folder(self.dir_name.as_str());
        check_folder_name(dir_name.as_str())?;
        let mut request = HttpRequest::new(HttpMethodPost, folder_url(ctx, dir_name.as_str()));
        request.operation = self.operation();
        request.header.insert(HEADER_AUTHORIZATION.to_string(), ctx.sign_once(format!("{}/", dir_name).as_str())?);
        apply_json_body(&mut request, &json!({
            "op": OP_DELETE,
        }))?;
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Envelope)]
pub struct DeleteFolderOutput {
    pub(crate) envelope: ResponseEnvelope,
}

impl OutputParser for DeleteFolderOutput {
    fn parse(_: &HttpRequest, envelope: ResponseEnvelope) -> Result<Self, CosError> {
        Ok(Self {
            envelope,
        })
    }
}
