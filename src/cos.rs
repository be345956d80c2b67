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
use crate::auth::{PreSignedDownloadURLInput, PreSignedDownloadURLOutput, SignContext, SignerAPI};
use crate::config::ConfigHolder;
use crate::constant::*;
use crate::credential::{CommonCredentials, CommonCredentialsProvider, Credentials, CredentialsProvider};
use crate::error::{CosError, GenericError};
use crate::executor::{RequestExecutor, Sleeper, ThreadSleeper};
use crate::folder::*;
use crate::http::{ReqwestTransport, Transport, TransportOptions};
use crate::internal::{InputTranslator, OutputParser};
use crate::multipart::*;
use crate::object::*;
use std::fmt::Debug;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::marker::PhantomData;
use tracing::log::{info, warn};

pub struct CosClientBuilder<P, C, T, S> {
    app_id: String,
    secret_id: String,
    secret_key: String,
    region: String,
    bucket: String,
    endpoint: String,
    credentials_provider: Option<P>,
    transport: Option<T>,
    sleeper: Option<S>,
    config_holder: ConfigHolder,
    c: PhantomData<C>,
}

impl<P, C, T, S> Default for CosClientBuilder<P, C, T, S> {
    fn default() -> Self {
        Self {
            app_id: "".to_string(),
            secret_id: "".to_string(),
            secret_key: "".to_string(),
            region: DEFAULT_REGION.to_string(),
            bucket: "".to_string(),
            endpoint: "".to_string(),
            credentials_provider: None,
            transport: None,
            sleeper: None,
            config_holder: ConfigHolder::default(),
            c: PhantomData,
        }
    }
}

impl<P, C, T, S> CosClientBuilder<P, C, T, S>
where
    P: CredentialsProvider<C> + Debug,
    C: Credentials + Debug,
    T: Transport + Debug,
    S: Sleeper + Default + Debug,
{
    pub fn build(mut self) -> Result<CosClientImpl<P, C, T, S>, CosError> {
        self.config_holder.check(self.endpoint, self.region, self.bucket)?;
        self.config_holder.gen_user_agent();

        let cp = match self.credentials_provider {
            Some(p) => p,
            None => {
                let c = C::new(self.app_id, self.secret_id, self.secret_key)
                    .map_err(|ex| CosError::client_error_with_cause("create credentials error", GenericError::DefaultError(ex.to_string())))?;
                P::new(c).map_err(|ex| CosError::client_error_with_cause("create credentials provider error", GenericError::DefaultError(ex.to_string())))?
            }
        };
        check_credentials(&cp)?;

        let transport = match self.transport {
            Some(t) => t,
            None => T::new(&TransportOptions::from_config(&self.config_holder, self.config_holder.request_timeout))?,
        };
        let executor = RequestExecutor::new(transport, self.sleeper.unwrap_or_default())
            .max_retry_count(self.config_holder.max_retry_count)
            .high_latency_log_threshold(self.config_holder.high_latency_log_threshold);

        Ok(CosClientImpl {
            config_holder: self.config_holder,
            credentials_provider: cp,
            executor,
            c: self.c,
        })
    }

    pub fn build_as_trait(self) -> Result<impl CosClient, CosError> {
        let client = self.build()?;
        Ok(client)
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn secret_id(mut self, secret_id: impl Into<String>) -> Self {
        self.secret_id = secret_id.into();
        self
    }

    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = secret_key.into();
        self
    }

    pub fn credentials_provider(mut self, p: P) -> Self {
        self.credentials_provider = Some(p);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn sleeper(mut self, sleeper: S) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn max_retry_count(mut self, max_retry_count: isize) -> Self {
        self.config_holder.max_retry_count = max_retry_count;
        self
    }

    /// Lifetime in seconds of the reusable tokens.
    pub fn sign_expires(mut self, sign_expires: i64) -> Self {
        if sign_expires > 0 {
            self.config_holder.sign_expires = sign_expires;
        }
        self
    }

    pub fn request_timeout(mut self, request_timeout: isize) -> Self {
        if request_timeout > 0 {
            self.config_holder.request_timeout = request_timeout;
        }
        self
    }

    pub fn connection_timeout(mut self, connection_timeout: isize) -> Self {
        if connection_timeout > 0 {
            self.config_holder.connection_timeout = connection_timeout;
        }
        self
    }

    pub fn async_upload_timeout(mut self, async_upload_timeout: isize) -> Self {
        if async_upload_timeout > 0 {
            self.config_holder.async_upload_timeout = async_upload_timeout;
        }
        self
    }

    pub fn enable_verify_ssl(mut self, enable_verify_ssl: bool) -> Self {
        self.config_holder.enable_verify_ssl = enable_verify_ssl;
        self
    }

    pub fn high_latency_log_threshold(mut self, high_latency_log_threshold: isize) -> Self {
        self.config_holder.high_latency_log_threshold = high_latency_log_threshold;
        self
    }

    pub fn user_agent_product_name(mut self, user_agent_product_name: impl Into<String>) -> Self {
        self.config_holder.user_agent_product_name = user_agent_product_name.into();
        self
    }
}

pub(crate) fn check_credentials<P, C>(cp: &P) -> Result<(), CosError>
where
    P: CredentialsProvider<C>,
    C: Credentials,
{
    let cred = cp.credentials()
        .map_err(|ex| CosError::client_error_with_cause("load credentials error", GenericError::DefaultError(ex.to_string())))?;
    if !APP_ID_REGEX.is_match(cred.app_id()) {
        return CosError::client_error_result("invalid app id, must be numeric");
    }
    if cred.secret_id() == "" || cred.secret_key() == "" {
        return CosError::client_error_result("no secret id or secret key specified");
    }
    Ok(())
}

pub fn builder() -> CosClientBuilder<CommonCredentialsProvider<CommonCredentials>, CommonCredentials, ReqwestTransport, ThreadSleeper> {
    CosClientBuilder::default()
}

pub fn builder_common<P, C, T, S>() -> CosClientBuilder<P, C, T, S> {
    CosClientBuilder::default()
}

pub trait CosClient: FolderAPI + ObjectAPI + MultipartAPI + SignerAPI + Debug {}

pub type DefaultCosClient = CosClientImpl<CommonCredentialsProvider<CommonCredentials>, CommonCredentials, ReqwestTransport, ThreadSleeper>;

#[derive(Debug)]
pub struct CosClientImpl<P, C, T, S> {
    pub(crate) config_holder: ConfigHolder,
    pub(crate) credentials_provider: P,
    pub(crate) executor: RequestExecutor<T, S>,
    c: PhantomData<C>,
}

impl<P, C, T, S> CosClient for CosClientImpl<P, C, T, S>
where
    P: CredentialsProvider<C> + Debug,
    C: Credentials + Debug,
    T: Transport + Debug,
    S: Sleeper + Debug,
{}

impl<P, C, T, S> FolderAPI for CosClientImpl<P, C, T, S>
where
    P: CredentialsProvider<C>,
    C: Credentials,
    T: Transport,
    S: Sleeper,
{
    fn create_folder(&self, input: &CreateFolderInput) -> Result<CreateFolderOutput, CosError> {
        self.do_request(input)
    }

    fn list_folder(&self, input: &ListFolderInput) -> Result<ListFolderOutput, CosError> {
        self.do_request(input)
    }

    fn stat_folder(&self, input: &StatFolderInput) -> Result<StatFolderOutput, CosError> {
        self.do_request(input)
    }

    fn delete_folder(&self, input: &DeleteFolderInput) -> Result<DeleteFolderOutput, CosError> {
        self.do_request(input)
    }
}

impl<P, C, T, S> ObjectAPI for CosClientImpl<P, C, T, S>
where
    P: CredentialsProvider<C>,
    C: Credentials,
    T: Transport,
    S: Sleeper,
{
    fn upload_file(&self, input: &UploadFileInput) -> Result<UploadFileOutput, CosError> {
        self.do_request(input)
    }

    fn upload_file_from_file(&self, input: &UploadFileFromFileInput) -> Result<UploadFileOutput, CosError> {
        let content = std::fs::read(input.file_path.as_str())
            .map_err(|e| CosError::client_error_with_cause(format!("read file {} error", input.file_path), GenericError::IoError(e.to_string())))?;
        self.do_request(&input.to_upload_file_input(content))
    }

    fn upload_file_from_url(&self, input: &UploadFileFromUrlInput) -> Result<UploadFileFromUrlOutput, CosError> {
        let request = input.fetch_request()?;
        let response = match self.executor.transport().send(&request) {
            Ok(response) => response,
            Err(e) => {
                warn!("fetch {} failed, error: {}", request.url, e);
                return Ok(UploadFileFromUrlOutput::fetch_failed(e.to_string(), None));
            }
        };
        if !response.is_success() {
            warn!("fetch {} failed, http status: {}", request.url, response.status_code);
            return Ok(UploadFileFromUrlOutput::fetch_failed(format!("unexpected http status {}", response.status_code),
                                                            Some(response.status_code)));
        }

        info!("fetch {} succeed, size: {}", request.url, response.body.len());
        let mime_type = match response.header_value(HEADER_CONTENT_TYPE) {
            Some(v) if v.trim() != "" => v.trim().to_string(),
            _ => DEFAULT_MIME_TYPE.to_string(),
        };
        let upload = self.do_request(&input.to_upload_file_input(response.body, mime_type.as_str()))?;
        Ok(UploadFileFromUrlOutput::uploaded(upload))
    }

    fn move_file(&self, input: &MoveFileInput) -> Result<MoveFileOutput, CosError> {
        self.do_request(input)
    }

    fn copy_file(&self, input: &CopyFileInput) -> Result<CopyFileOutput, CosError> {
        self.do_request(input)
    }

    fn delete_file(&self, input: &DeleteFileInput) -> Result<DeleteFileOutput, CosError> {
        self.do_request(input)
    }

    fn stat_file(&self, input: &StatFileInput) -> Result<StatFileOutput, CosError> {
        self.do_request(input)
    }

    fn update_file_status(&self, input: &UpdateFileStatusInput) -> Result<UpdateFileStatusOutput, CosError> {
        self.do_request(input)
    }

    fn get_file(&self, input: &GetFileInput) -> Result<GetFileOutput, CosError> {
        let request = self.with_context(|ctx| input.trans(ctx))?;
        let response = self.executor.execute_raw(&request)?;
        Ok(GetFileOutput::from_response(response))
    }
}

impl<P, C, T, S> MultipartAPI for CosClientImpl<P, C, T, S>
where
    P: CredentialsProvider<C>,
    C: Credentials,
    T: Transport,
    S: Sleeper,
{
    fn upload_slice_init(&self, input: &UploadSliceInitInput) -> Result<UploadSliceInitOutput, CosError> {
        let mut output: UploadSliceInitOutput = self.do_request(input)?;
        output.attach_session(input);
        Ok(output)
    }

    fn upload_slice_data(&self, input: &UploadSliceDataInput) -> Result<UploadSliceDataOutput, CosError> {
        self.do_request(input)
    }

    fn upload_slice_finish(&self, input: &UploadSliceFinishInput) -> Result<UploadSliceFinishOutput, CosError> {
        self.do_request(input)
    }

    fn upload_slice_file(&self, input: &UploadSliceFileInput) -> Result<UploadSliceFileOutput, CosError> {
        check_slice_size(input.slice_size)?;
        let mut fd = File::open(input.file_path.as_str())
            .map_err(|e| CosError::client_error_with_cause(format!("open file {} error", input.file_path), GenericError::IoError(e.to_string())))?;
        let file_size = fd.metadata()
            .map_err(|e| CosError::client_error_with_cause(format!("stat file {} error", input.file_path), GenericError::IoError(e.to_string())))?
            .len();
        self.do_upload_slice(&input.to_init_input(file_size), input.offset, &mut fd)
    }

    fn upload_slice_from_buffer(&self, input: &UploadSliceFromBufferInput) -> Result<UploadSliceFileOutput, CosError> {
        check_slice_size(input.slice_size)?;
        let mut cursor = Cursor::new(input.content.as_slice());
        self.do_upload_slice(&input.to_init_input(), input.offset, &mut cursor)
    }
}

impl<P, C, T, S> SignerAPI for CosClientImpl<P, C, T, S>
where
    P: CredentialsProvider<C>,
    C: Credentials,
    T: Transport,
    S: Sleeper,
{
    fn sign_once(&self, path: &str) -> Result<String, CosError> {
        self.with_context(|ctx| ctx.sign_once(path))
    }

    fn sign_more(&self, path: &str, expires: i64) -> Result<String, CosError> {
        self.with_context(|ctx| crate::auth::sign_more(ctx.app_id, ctx.secret_id, ctx.secret_key, ctx.bucket(), path, expires))
    }

    fn sign_download(&self, path: &str, expires: i64) -> Result<String, CosError> {
        self.with_context(|ctx| ctx.sign_download(path, expires))
    }

    fn pre_signed_download_url(&self, input: &PreSignedDownloadURLInput) -> Result<PreSignedDownloadURLOutput, CosError> {
        self.with_context(|ctx| ctx.pre_signed_download_url(input))
    }
}

impl<P, C, T, S> CosClientImpl<P, C, T, S>
where
    P: CredentialsProvider<C>,
    C: Credentials,
    T: Transport,
    S: Sleeper,
{
    pub fn bucket(&self) -> &str {
        &self.config_holder.bucket
    }

    pub fn region(&self) -> &str {
        &self.config_holder.region
    }

    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    fn with_context<R>(&self, f: impl FnOnce(&SignContext) -> Result<R, CosError>) -> Result<R, CosError> {
        let cred = self.credentials_provider.credentials()
            .map_err(|ex| CosError::client_error_with_cause("load credentials error", GenericError::DefaultError(ex.to_string())))?;
        let ctx = SignContext {
            config_holder: &self.config_holder,
            app_id: cred.app_id(),
            secret_id: cred.secret_id(),
            secret_key: cred.secret_key(),
        };
        f(&ctx)
    }

    fn do_request<I, O>(&self, input: &I) -> Result<O, CosError>
    where
        I: InputTranslator,
        O: OutputParser,
    {
        let request = self.with_context(|ctx| input.trans(ctx))?;
        match self.executor.execute(&request) {
            Ok(envelope) => O::parse(&request, envelope),
            Err(mut e) => {
                if e.request_url() == "" {
                    e.set_request_url(request.url.as_str());
                }
                Err(e)
            }
        }
    }

    fn do_upload_slice<R: Read + Seek>(&self, init: &UploadSliceInitInput, offset: u64, reader: &mut R) -> Result<UploadSliceFileOutput, CosError> {
        if offset > init.file_size {
            return Err(CosError::client_error("invalid offset, exceeds the file size"));
        }
        let init_output = self.upload_slice_init(init)?;
        let session = match init_output.session() {
            Some(session) => session.clone(),
            None => {
                if init_output.envelope.is_success() {
                    return Err(CosError::client_error("no session returned by upload slice init"));
                }
                return Ok(UploadSliceFileOutput::interrupted(init_output.envelope, None));
            }
        };

        reader.seek(SeekFrom::Start(offset))
            .map_err(|e| CosError::client_error_with_cause("seek upload source error", GenericError::IoError(e.to_string())))?;
        for slice_offset in session.offsets(offset) {
            let len = session.slice_size.min(session.file_size - slice_offset);
            let mut content = vec![0u8; len as usize];
            reader.read_exact(&mut content)
                .map_err(|e| CosError::client_error_with_cause("read upload source error", GenericError::IoError(e.to_string())))?;
            let data_output = self.upload_slice_data(&UploadSliceDataInput::new(session.clone(), slice_offset, content))?;
            if !data_output.envelope.is_success() {
                warn!("upload slice at offset {} failed, code: {}, message: {}", slice_offset, data_output.envelope.code, data_output.envelope.message);
                return Ok(UploadSliceFileOutput::interrupted(data_output.envelope, Some(session)));
            }
        }

        let finish_output = self.upload_slice_finish(&UploadSliceFinishInput::new(session.clone()))?;
        Ok(UploadSliceFileOutput::finished(finish_output, session))
    }
}
