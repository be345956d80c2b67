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
#![allow(
    dead_code,
)]

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use serde_json::{json, Value};

use cos_v2_rust_sdk::auth::verify_signature;
use cos_v2_rust_sdk::cos;
use cos_v2_rust_sdk::cos::CosClientImpl;
use cos_v2_rust_sdk::credential::{CommonCredentials, CommonCredentialsProvider};
use cos_v2_rust_sdk::error::{CosError, GenericError};
use cos_v2_rust_sdk::executor::Sleeper;
use cos_v2_rust_sdk::http::{HttpRequest, HttpResponse, Transport, TransportOptions};

#[cfg(feature = "asynchronous")]
pub mod asynchronous;

pub const APP_ID: &str = "1250000000";
pub const SECRET_ID: &str = "AKIDexampleSecretId";
pub const SECRET_KEY: &str = "exampleSecretKey";
pub const BUCKET: &str = "sdkbucket";
pub const BASE_URL: &str = "http://sh.file.myqcloud.com/files/v2/1250000000/sdkbucket";

pub const CODE_NOT_FOUND: i64 = -197;
pub const CODE_ALREADY_EXISTS: i64 = -4018;
pub const CODE_DIR_NOT_EMPTY: i64 = -173;
pub const CODE_SIGN_FAILED: i64 = -133;

pub fn gen_random_string(len: usize) -> String {
    let mut result = String::with_capacity(len);
    let characters = "0123456789abcdefghijklmnopqrstuvwxyz".as_bytes();
    let mut ra = rand::thread_rng();
    for _ in 0..len {
        let a = ra.gen_range(0..characters.len());
        result.push(characters[a] as char);
    }

    result
}

pub fn envelope_body(code: i64, message: &str, data: Value) -> Vec<u8> {
    json!({
        "code": code,
        "message": message,
        "request_id": gen_random_string(16),
        "data": data,
    }).to_string().into_bytes()
}

pub fn transport_error(message: &str) -> CosError {
    CosError::CosClientError {
        message: message.to_string(),
        cause: Some(GenericError::HttpRequestError("connection reset".to_string())),
        request_url: "".to_string(),
    }
}

/// Answers with a queue of scripted results and keeps every request it was handed.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, CosError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn push_envelope(&self, code: i64) -> &Self {
        self.push_envelope_with_data(code, Value::Null)
    }

    pub fn push_envelope_with_data(&self, code: i64, data: Value) -> &Self {
        self.push_response(200, HashMap::new(), envelope_body(code, "", data))
    }

    pub fn push_response(&self, status_code: isize, header: HashMap<String, String>, body: impl Into<Vec<u8>>) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse::new(status_code, header, body)));
        self
    }

    pub fn push_error(&self, message: &str) -> &Self {
        self.responses.lock().unwrap().push_back(Err(transport_error(message)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn new(_: &TransportOptions) -> Result<Self, CosError> {
        Ok(Self::default())
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, CosError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Err(transport_error("no scripted response")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl CountingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for CountingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub type MockClient = CosClientImpl<CommonCredentialsProvider<CommonCredentials>, CommonCredentials, MockTransport, CountingSleeper>;
pub type FakeClient = CosClientImpl<CommonCredentialsProvider<CommonCredentials>, CommonCredentials, FakeCosTransport, CountingSleeper>;

pub fn mock_client(transport: &MockTransport, sleeper: &CountingSleeper) -> MockClient {
    cos::builder_common()
        .app_id(APP_ID)
        .secret_id(SECRET_ID)
        .secret_key(SECRET_KEY)
        .region("sh")
        .bucket(BUCKET)
        .transport(transport.clone())
        .sleeper(sleeper.clone())
        .build()
        .unwrap()
}

pub fn fake_client(transport: &FakeCosTransport) -> FakeClient {
    cos::builder_common()
        .app_id(APP_ID)
        .secret_id(SECRET_ID)
        .secret_key(SECRET_KEY)
        .region("sh")
        .bucket(BUCKET)
        .transport(transport.clone())
        .sleeper(CountingSleeper::default())
        .build()
        .unwrap()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormPart {
    pub content_type: String,
    pub value: Vec<u8>,
}

impl FormPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.value).to_string()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Reads a `multipart/form-data` body, rejecting a quoted boundary parameter.
pub fn parse_multipart(content_type: &str, body: &[u8]) -> Result<HashMap<String, FormPart>, String> {
    let boundary = content_type.split("boundary=").nth(1).ok_or("no boundary")?.trim();
    if boundary.starts_with('"') {
        return Err("quoted boundary".to_string());
    }
    let delimiter = format!("--{}", boundary);
    let mut parts = HashMap::new();
    let mut rest = body;
    loop {
        let start = find(rest, delimiter.as_bytes()).ok_or("missing delimiter")?;
        rest = &rest[start + delimiter.len()..];
        if rest.starts_with(b"--") {
            break;
        }
        rest = rest.strip_prefix(b"\r\n").ok_or("malformed part")?;
        let header_end = find(rest, b"\r\n\r\n").ok_or("no header end")?;
        let headers = String::from_utf8_lossy(&rest[..header_end]).to_string();
        let after = &rest[header_end + 4..];
        let next = find(after, delimiter.as_bytes()).ok_or("unterminated part")?;
        let value = &after[..next];
        let value = value.strip_suffix(b"\r\n").unwrap_or(value);
        let name = headers.split("name=\"").nth(1)
            .and_then(|s| s.split('"').next())
            .ok_or("no part name")?
            .to_string();
        let content_type = headers.lines()
            .find_map(|l| l.strip_prefix("Content-Type: "))
            .unwrap_or("")
            .to_string();
        parts.insert(name, FormPart {
            content_type,
            value: value.to_vec(),
        });
        rest = &after[next..];
    }
    Ok(parts)
}

pub fn split_query(url: &str) -> (String, HashMap<String, String>) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let mut params = HashMap::new();
    for item in query.split('&').filter(|s| *s != "") {
        let (k, v) = item.split_once('=').unwrap_or((item, ""));
        params.insert(k.to_string(), urlencoding::decode(v).unwrap().to_string());
    }
    (path.to_string(), params)
}

#[derive(Debug, Clone, Default)]
pub struct FakeFile {
    pub content: Vec<u8>,
    pub mime_type: String,
    pub biz_attr: String,
    pub authority: String,
    pub custom_headers: Value,
    pub ctime: i64,
}

#[derive(Debug, Clone, Default)]
struct FakeSession {
    path: String,
    file_size: u64,
    slice_size: u64,
    biz_attr: String,
    content: Vec<u8>,
}

#[derive(Debug, Default)]
struct FakeState {
    folders: BTreeMap<String, String>,
    files: BTreeMap<String, FakeFile>,
    sessions: HashMap<String, FakeSession>,
    origins: HashMap<String, HttpResponse>,
    requests: Vec<HttpRequest>,
    slice_offsets: Vec<u64>,
    finished_sizes: Vec<u64>,
    granted_slice_size: u64,
    next_session: u64,
}

/// In-memory stand-in for the files/v2 service. Every token is checked with the shared
/// secret before a request is served.
#[derive(Debug, Clone, Default)]
pub struct FakeCosTransport {
    state: Arc<Mutex<FakeState>>,
}

type Reply = (i64, &'static str, Value);

fn ok(data: Value) -> Reply {
    (0, "SUCCESS", data)
}

fn fail(code: i64, message: &'static str) -> Reply {
    (code, message, Value::Null)
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => "",
    }
}

fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

impl FakeCosTransport {
    pub fn serve_origin(&self, url: &str, status_code: isize, content_type: &str, body: impl Into<Vec<u8>>) {
        let mut header = HashMap::new();
        if content_type != "" {
            header.insert("content-type".to_string(), content_type.to_string());
        }
        self.state.lock().unwrap().origins.insert(url.to_string(), HttpResponse::new(status_code, header, body));
    }

    /// Makes slice init answer with a slice size of its own choosing.
    pub fn grant_slice_size(&self, slice_size: u64) {
        self.state.lock().unwrap().granted_slice_size = slice_size;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn slice_offsets(&self) -> Vec<u64> {
        self.state.lock().unwrap().slice_offsets.clone()
    }

    pub fn finished_sizes(&self) -> Vec<u64> {
        self.state.lock().unwrap().finished_sizes.clone()
    }

    pub fn has_folder(&self, dir_name: &str) -> bool {
        self.state.lock().unwrap().folders.contains_key(dir_name)
    }

    pub fn file(&self, path: &str) -> Option<FakeFile> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    fn check_token(token: &str, raw_path: &str) -> bool {
        let claims = match verify_signature(token, SECRET_KEY) {
            Ok(claims) => claims,
            Err(_) => return false,
        };
        if claims.app_id() != APP_ID || claims.secret_id() != SECRET_ID || claims.bucket() != BUCKET {
            return false;
        }
        if claims.is_single_use() {
            return claims.file_id() == format!("/{}/{}/{}", APP_ID, BUCKET, raw_path);
        }
        claims.file_id() == format!("/{}/{}/", APP_ID, BUCKET) && claims.expired() > claims.issued_at()
    }

    fn download(&self, state: &FakeState, raw_path: &str, path: &str, token: &str) -> HttpResponse {
        let claims = match verify_signature(token, SECRET_KEY) {
            Ok(claims) => claims,
            Err(_) => return HttpResponse::new(403, HashMap::new(), "signature mismatch"),
        };
        if claims.file_id() != format!("/{}", raw_path) || claims.expired() < Utc::now().timestamp() {
            return HttpResponse::new(403, HashMap::new(), "signature rejected");
        }
        match state.files.get(path) {
            Some(file) => {
                let mut header = HashMap::new();
                header.insert("content-type".to_string(), file.mime_type.clone());
                HttpResponse::new(200, header, file.content.clone())
            }
            None => HttpResponse::new(404, HashMap::new(), "not found"),
        }
    }

    fn file_info(path: &str, file: &FakeFile) -> Value {
        json!({
            "name": base_name(path),
            "biz_attr": file.biz_attr,
            "filesize": file.content.len(),
            "filelen": file.content.len(),
            "sha": "",
            "ctime": file.ctime.to_string(),
            "mtime": file.ctime.to_string(),
            "access_url": format!("http://{}-{}.file.myqcloud.com/{}", BUCKET, APP_ID, path),
            "authority": file.authority,
        })
    }

    fn upload_result(path: &str) -> Value {
        json!({
            "access_url": format!("http://{}-{}.file.myqcloud.com/{}", BUCKET, APP_ID, path),
            "resource_path": format!("/{}/{}/{}", APP_ID, BUCKET, path),
            "source_url": format!("http://{}-{}.cos.myqcloud.com/{}", BUCKET, APP_ID, path),
            "url": format!("{}/{}", BASE_URL, path),
        })
    }

    fn serve_get(state: &FakeState, path: &str, params: &HashMap<String, String>) -> Reply {
        match params.get("op").map(|s| s.as_str()) {
            Some("list") => {
                let dir = parent_of(path);
                let prefix = base_name(path);
                if dir != "" && !state.folders.contains_key(dir) {
                    return fail(CODE_NOT_FOUND, "directory not exists");
                }
                let mut infos = Vec::new();
                let mut dir_count = 0;
                for (name, biz_attr) in &state.folders {
                    if parent_of(name) == dir && base_name(name).starts_with(prefix) {
                        dir_count += 1;
                        infos.push(json!({"name": base_name(name), "biz_attr": biz_attr, "ctime": "0", "mtime": "0"}));
                    }
                }
                let mut file_count = 0;
                for (name, file) in &state.files {
                    if parent_of(name) == dir && base_name(name).starts_with(prefix) {
                        file_count += 1;
                        infos.push(Self::file_info(name, file));
                    }
                }
                ok(json!({"context": "", "listover": true, "dircount": dir_count, "filecount": file_count, "infos": infos}))
            }
            Some("stat") => {
                if let Some(dir) = path.strip_suffix('/') {
                    return match state.folders.get(dir) {
                        Some(biz_attr) => ok(json!({"name": base_name(dir), "biz_attr": biz_attr, "ctime": "0", "mtime": "0"})),
                        None => fail(CODE_NOT_FOUND, "directory not exists"),
                    };
                }
                match state.files.get(path) {
                    Some(file) => ok(Self::file_info(path, file)),
                    None => fail(CODE_NOT_FOUND, "file not exists"),
                }
            }
            _ => fail(-1, "unknown op"),
        }
    }

    fn serve_json(state: &mut FakeState, path: &str, body: &Value) -> Reply {
        let op = body["op"].as_str().unwrap_or("");
        match op {
            "create" => {
                let dir = path.trim_end_matches('/');
                if state.folders.contains_key(dir) {
                    return fail(CODE_ALREADY_EXISTS, "directory already exists");
                }
                state.folders.insert(dir.to_string(), body["biz_attr"].as_str().unwrap_or("").to_string());
                ok(json!({"ctime": Utc::now().timestamp(), "resource_path": format!("/{}/{}/{}", APP_ID, BUCKET, path)}))
            }
            "delete" => {
                if let Some(dir) = path.strip_suffix('/') {
                    if !state.folders.contains_key(dir) {
                        return fail(CODE_NOT_FOUND, "directory not exists");
                    }
                    let busy = state.files.keys().any(|k| parent_of(k) == dir)
                        || state.folders.keys().any(|k| parent_of(k) == dir);
                    if busy {
                        return fail(CODE_DIR_NOT_EMPTY, "directory not empty");
                    }
                    state.folders.remove(dir);
                    return ok(Value::Null);
                }
                match state.files.remove(path) {
                    Some(_) => ok(Value::Null),
                    None => fail(CODE_NOT_FOUND, "file not exists"),
                }
            }
            "update" => {
                match state.files.get_mut(path) {
                    Some(file) => {
                        file.authority = body["authority"].as_str().unwrap_or("").to_string();
                        file.custom_headers = body["custom_headers"].clone();
                        ok(Value::Null)
                    }
                    None => fail(CODE_NOT_FOUND, "file not exists"),
                }
            }
            _ => fail(-1, "unknown op"),
        }
    }

    fn serve_form(state: &mut FakeState, path: &str, form: &HashMap<String, FormPart>) -> Reply {
        let field = |name: &str| form.get(name).map(|p| p.text()).unwrap_or_default();
        match field("op").as_str() {
            "upload" => {
                if field("insertOnly") == "1" && state.files.contains_key(path) {
                    return fail(CODE_ALREADY_EXISTS, "file already exists");
                }
                let content = form.get("filecontent").cloned().unwrap_or_default();
                state.files.insert(path.to_string(), FakeFile {
                    content: content.value,
                    mime_type: content.content_type,
                    biz_attr: field("biz_attr"),
                    authority: "eInvalid".to_string(),
                    custom_headers: Value::Null,
                    ctime: Utc::now().timestamp(),
                });
                ok(Self::upload_result(path))
            }
            "upload_slice_init" => {
                if field("insertOnly") == "1" && state.files.contains_key(path) {
                    return fail(CODE_ALREADY_EXISTS, "file already exists");
                }
                let file_size = field("filesize").parse::<u64>().unwrap_or(0);
                let mut slice_size = field("slice_size").parse::<u64>().unwrap_or(0);
                if state.granted_slice_size > 0 {
                    slice_size = state.granted_slice_size;
                }
                state.next_session += 1;
                let session_id = format!("session-{}", state.next_session);
                state.sessions.insert(session_id.clone(), FakeSession {
                    path: path.to_string(),
                    file_size,
                    slice_size,
                    biz_attr: field("biz_attr"),
                    content: vec![0u8; file_size as usize],
                });
                ok(json!({"session": session_id, "slice_size": slice_size, "offset": 0, "serial_upload": 1}))
            }
            "upload_slice_data" => {
                let session_id = field("session");
                let offset = field("offset").parse::<u64>().unwrap_or(0);
                let session = match state.sessions.get_mut(&session_id) {
                    Some(session) if session.path == path => session,
                    _ => return fail(CODE_NOT_FOUND, "session not exists"),
                };
                let content = form.get("filecontent").map(|p| p.value.clone()).unwrap_or_default();
                let end = offset as usize + content.len();
                if end > session.content.len() || content.len() as u64 > session.slice_size {
                    return fail(-1, "slice out of range");
                }
                session.content[offset as usize..end].copy_from_slice(&content);
                state.slice_offsets.push(offset);
                ok(json!({"session": session_id, "offset": offset}))
            }
            "upload_slice_finish" => {
                let session_id = field("session");
                let file_size = field("filesize").parse::<u64>().unwrap_or(0);
                let session = match state.sessions.remove(&session_id) {
                    Some(session) if session.path == path => session,
                    _ => return fail(CODE_NOT_FOUND, "session not exists"),
                };
                state.finished_sizes.push(file_size);
                if session.file_size != file_size {
                    return fail(-1, "file size mismatch");
                }
                state.files.insert(path.to_string(), FakeFile {
                    content: session.content,
                    mime_type: "application/octet-stream".to_string(),
                    biz_attr: session.biz_attr,
                    authority: "eInvalid".to_string(),
                    custom_headers: Value::Null,
                    ctime: Utc::now().timestamp(),
                });
                ok(Self::upload_result(path))
            }
            op @ ("move" | "copy") => {
                let dest = field("dest_fileid").trim_start_matches('/').to_string();
                let file = match state.files.get(path) {
                    Some(file) => file.clone(),
                    None => return fail(CODE_NOT_FOUND, "file not exists"),
                };
                if dest == path {
                    return fail(-1, "source equals destination");
                }
                if field("to_over_write") != "1" && state.files.contains_key(&dest) {
                    return fail(CODE_ALREADY_EXISTS, "destination already exists");
                }
                state.files.insert(dest, file);
                if op == "move" {
                    state.files.remove(path);
                }
                ok(Value::Null)
            }
            _ => fail(-1, "unknown op"),
        }
    }

    fn serve(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let (url, params) = split_query(request.url());
        let raw_path = match url.strip_prefix(BASE_URL).and_then(|s| s.strip_prefix('/')) {
            Some(raw_path) => raw_path.to_string(),
            None => {
                return match state.origins.get(url.as_str()) {
                    Some(response) => response.clone(),
                    None => HttpResponse::new(404, HashMap::new(), "no such origin"),
                };
            }
        };
        let path = urlencoding::decode(raw_path.as_str()).unwrap().to_string();

        if let Some(token) = params.get("sign") {
            return self.download(&state, raw_path.as_str(), path.as_str(), token);
        }

        let authorized = match request.header_value("Authorization") {
            Some(token) => Self::check_token(token, raw_path.as_str()),
            None => false,
        };
        let (code, message, data) = if !authorized {
            fail(CODE_SIGN_FAILED, "signature check failed")
        } else if request.method().as_str() == "GET" {
            Self::serve_get(&state, path.as_str(), &params)
        } else {
            let content_type = request.header_value("Content-Type").unwrap_or("").to_string();
            let body = request.body().unwrap_or(&[]);
            if content_type.starts_with("application/json") {
                match serde_json::from_slice::<Value>(body) {
                    Ok(body) => Self::serve_json(&mut state, path.as_str(), &body),
                    Err(_) => fail(-1, "bad json"),
                }
            } else {
                match parse_multipart(content_type.as_str(), body) {
                    Ok(form) => Self::serve_form(&mut state, path.as_str(), &form),
                    Err(_) => fail(-1, "bad multipart body"),
                }
            }
        };
        HttpResponse::new(200, HashMap::new(), envelope_body(code, message, data))
    }
}

impl Transport for FakeCosTransport {
    fn new(_: &TransportOptions) -> Result<Self, CosError> {
        Ok(Self::default())
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, CosError> {
        Ok(self.serve(request))
    }
}
