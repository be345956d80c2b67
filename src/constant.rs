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
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) const DEFAULT_MAX_RETRY_COUNT: isize = 3;
pub(crate) const DEFAULT_CONNECTION_TIMEOUT: isize = 10000;
pub(crate) const DEFAULT_REQUEST_TIMEOUT: isize = 0;
pub(crate) const DEFAULT_ASYNC_UPLOAD_TIMEOUT: isize = 6000;
pub(crate) const DEFAULT_HIGH_LATENCY_LOG_THRESHOLD: isize = 3000;
pub(crate) const DEFAULT_SIGN_EXPIRES: i64 = 30;
pub(crate) const DEFAULT_REGION: &str = "sh";
pub(crate) const DEFAULT_DOMAIN_SUFFIX: &str = "file.myqcloud.com";
pub(crate) const MAX_LIST_NUM: isize = 1000;
pub(crate) const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
pub(crate) const API_PATH_PREFIX: &str = "/files/v2";

pub(crate) const RETRY_MIN_SLEEP_SECONDS: u64 = 1;
pub(crate) const RETRY_MAX_SLEEP_SECONDS: u64 = 3;
pub(crate) const CODE_SUCCESS: i64 = 0;
pub(crate) const CODE_OPERATING_TOO_FAST: i64 = -71;
pub(crate) const CODE_WRITING_TOO_FAST: i64 = -143;

pub(crate) const SIGN_RANDOM_MAX: u64 = 999_999_999;
pub(crate) const SIGN_DIGEST_LENGTH: usize = 20;

pub(crate) const SCHEMA_HTTP: &str = "http://";
pub(crate) const SCHEMA_HTTPS: &str = "https://";
pub(crate) const ALLOWED_IN_URL: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

pub(crate) const HEADER_AUTHORIZATION: &str = "Authorization";
pub(crate) const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";
pub(crate) const CONTENT_TYPE_MULTIPART: &str = "multipart/form-data";

pub(crate) const QUERY_OP: &str = "op";
pub(crate) const QUERY_NUM: &str = "num";
pub(crate) const QUERY_CONTEXT: &str = "context";
pub(crate) const QUERY_SIGN: &str = "sign";

pub(crate) const OP_CREATE: &str = "create";
pub(crate) const OP_LIST: &str = "list";
pub(crate) const OP_STAT: &str = "stat";
pub(crate) const OP_DELETE: &str = "delete";
pub(crate) const OP_UPDATE: &str = "update";
pub(crate) const OP_MOVE: &str = "move";
pub(crate) const OP_COPY: &str = "copy";
pub(crate) const OP_UPLOAD: &str = "upload";
pub(crate) const OP_UPLOAD_SLICE_INIT: &str = "upload_slice_init";
pub(crate) const OP_UPLOAD_SLICE_DATA: &str = "upload_slice_data";
pub(crate) const OP_UPLOAD_SLICE_FINISH: &str = "upload_slice_finish";

pub(crate) const FORM_OP: &str = "op";
pub(crate) const FORM_BIZ_ATTR: &str = "biz_attr";
pub(crate) const FORM_INSERT_ONLY: &str = "insertOnly";
pub(crate) const FORM_FILE_CONTENT: &str = "filecontent";
pub(crate) const FORM_FILE_SIZE: &str = "filesize";
pub(crate) const FORM_SLICE_SIZE: &str = "slice_size";
pub(crate) const FORM_SESSION: &str = "session";
pub(crate) const FORM_OFFSET: &str = "offset";
pub(crate) const FORM_DEST_FILE_ID: &str = "dest_fileid";
pub(crate) const FORM_TO_OVER_WRITE: &str = "to_over_write";

pub(crate) const CREATE_FOLDER_OPERATION: &str = "CreateFolder";
pub(crate) const LIST_FOLDER_OPERATION: &str = "ListFolder";
pub(crate) const STAT_FOLDER_OPERATION: &str = "StatFolder";
pub(crate) const DELETE_FOLDER_OPERATION: &str = "DeleteFolder";
pub(crate) const UPLOAD_FILE_OPERATION: &str = "UploadFile";
pub(crate) const FETCH_URL_OPERATION: &str = "FetchUrl";
pub(crate) const MOVE_FILE_OPERATION: &str = "MoveFile";
pub(crate) const COPY_FILE_OPERATION: &str = "CopyFile";
pub(crate) const DELETE_FILE_OPERATION: &str = "DeleteFile";
pub(crate) const STAT_FILE_OPERATION: &str = "StatFile";
pub(crate) const UPDATE_FILE_STATUS_OPERATION: &str = "UpdateFileStatus";
pub(crate) const GET_FILE_OPERATION: &str = "GetFile";
pub(crate) const UPLOAD_SLICE_INIT_OPERATION: &str = "UploadSliceInit";
pub(crate) const UPLOAD_SLICE_DATA_OPERATION: &str = "UploadSliceData";
pub(crate) const UPLOAD_SLICE_FINISH_OPERATION: &str = "UploadSliceFinish";

pub(crate) static BUCKET_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());
pub(crate) static APP_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());
pub(crate) static REGION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());
