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
use std::collections::HashMap;

use scopeguard::defer;
use serde_json::Value;

use cos_v2_rust_sdk::auth::verify_signature;
use cos_v2_rust_sdk::enumeration::Authority;
use cos_v2_rust_sdk::object::*;

use crate::common::{fake_client, gen_random_string, mock_client, parse_multipart, split_query, CountingSleeper, FakeClient, FakeCosTransport, MockTransport, APP_ID, BASE_URL, BUCKET, CODE_ALREADY_EXISTS, CODE_NOT_FOUND, SECRET_KEY};

mod common;

#[test]
fn test_main() {
    let fake = FakeCosTransport::default();
    let client = fake_client(&fake);
    test_upload_and_stat(&client);
    test_insert_only(&client);
    test_move_and_copy(&client, &fake);
    test_update_file_status(&client, &fake);
    test_get_file(&client);
    test_upload_file_from_file(&client, &fake);
    test_upload_file_from_url(&client, &fake);
}

fn test_upload_and_stat(client: &FakeClient) {
    let mut input = UploadFileInput::new_with_dir("docs", "readme.md", "# title");
    input.set_biz_attr("v1");
    input.set_mime_type("text/markdown");
    let output = client.upload_file(&input).unwrap();
    assert!(output.is_success());
    assert_eq!(output.resource_path(), format!("/{}/{}/docs/readme.md", APP_ID, BUCKET));
    assert_ne!(output.access_url(), "");

    let output = client.stat_file(&StatFileInput::new("/docs/readme.md")).unwrap();
    assert_eq!(output.code(), 0);
    assert_eq!(output.info().file_size(), Some(7));
    assert_eq!(output.info().biz_attr(), "v1");
    assert_eq!(output.info().authority(), "eInvalid");

    let output = client.stat_file(&StatFileInput::new("docs/missing.md")).unwrap();
    assert_eq!(output.code(), CODE_NOT_FOUND);
    assert_eq!(output.message(), "file not exists");
}

fn test_insert_only(client: &FakeClient) {
    let file_name = format!("{}.txt", gen_random_string(8));
    assert_eq!(client.upload_file(&UploadFileInput::new(file_name.as_str(), "first")).unwrap().code(), 0);

    let mut input = UploadFileInput::new(file_name.as_str(), "second");
    input.set_replace(false);
    let output = client.upload_file(&input).unwrap();
    assert_eq!(output.code(), CODE_ALREADY_EXISTS);

    input.set_replace(true);
    assert_eq!(client.upload_file(&input).unwrap().code(), 0);
    assert!(client.upload_file(&UploadFileInput::new("", "x")).is_err());
    assert!(client.upload_file(&UploadFileInput::new("dir/", "x")).is_err());
}

fn test_move_and_copy(client: &FakeClient, fake: &FakeCosTransport) {
    assert_eq!(client.upload_file(&UploadFileInput::new_with_dir("m", "src.txt", "payload")).unwrap().code(), 0);

    let output = client.copy_file(&CopyFileInput::new("m/src.txt", "m/copy.txt")).unwrap();
    assert_eq!(output.code(), 0);
    assert_eq!(fake.file("m/copy.txt").unwrap().content, b"payload");
    assert!(fake.file("m/src.txt").is_some());

    let output = client.copy_file(&CopyFileInput::new("m/src.txt", "m/copy.txt")).unwrap();
    assert_eq!(output.code(), CODE_ALREADY_EXISTS);

    let mut input = CopyFileInput::new("m/src.txt", "m/copy.txt");
    input.set_overwrite(true);
    assert_eq!(client.copy_file(&input).unwrap().code(), 0);

    let output = client.move_file(&MoveFileInput::new("m/src.txt", "m/moved.txt")).unwrap();
    assert_eq!(output.code(), 0);
    assert!(fake.file("m/src.txt").is_none());
    assert_eq!(fake.file("m/moved.txt").unwrap().content, b"payload");

    let output = client.move_file(&MoveFileInput::new("m/src.txt", "m/other.txt")).unwrap();
    assert_eq!(output.code(), CODE_NOT_FOUND);
}

fn test_update_file_status(client: &FakeClient, fake: &FakeCosTransport) {
    assert_eq!(client.upload_file(&UploadFileInput::new_with_dir("u", "a.txt", "a")).unwrap().code(), 0);

    let mut input = UpdateFileStatusInput::new("u/a.txt");
    input.set_authority(Authority::AuthorityWPrivateRPublic);
    input.set_custom_headers(HashMap::from([("Cache-Control".to_string(), "no-cache".to_string())]));
    let output = client.update_file_status(&input).unwrap();
    assert_eq!(output.code(), 0);
    let file = fake.file("u/a.txt").unwrap();
    assert_eq!(file.authority, "eWPrivateRPublic");
    assert_eq!(file.custom_headers["Cache-Control"], "no-cache");

    let before = fake.requests().len();
    input.set_authority("ePublic");
    let e = client.update_file_status(&input).unwrap_err();
    assert!(e.message().contains("invalid authority"));
    assert_eq!(fake.requests().len(), before);
}

fn test_get_file(client: &FakeClient) {
    let mut input = UploadFileInput::new_with_dir("g", "中文 name.txt", "downloadable");
    input.set_mime_type("text/plain");
    assert_eq!(client.upload_file(&input).unwrap().code(), 0);

    let output = client.get_file(&GetFileInput::new("g/中文 name.txt")).unwrap();
    assert_eq!(output.status_code(), 200);
    assert_eq!(output.content_type(), "text/plain");
    assert_eq!(output.content(), b"downloadable");

    let e = client.get_file(&GetFileInput::new("g/none.txt")).unwrap_err();
    assert!(e.is_server_error());
    assert_eq!(e.status_code(), Some(404));
    assert!(e.request_url().starts_with(format!("{}/g/none.txt?sign=", BASE_URL).as_str()));
}

fn test_upload_file_from_file(client: &FakeClient, fake: &FakeCosTransport) {
    let path = std::env::temp_dir().join(format!("cos-v2-{}.bin", gen_random_string(10)));
    std::fs::write(path.as_path(), b"local file content").unwrap();
    defer! {
        let _ = std::fs::remove_file(path.as_path());
    }

    let input = UploadFileFromFileInput::new("local.bin", path.to_str().unwrap());
    let output = client.upload_file_from_file(&input).unwrap();
    assert_eq!(output.code(), 0);
    let file = fake.file("local.bin").unwrap();
    assert_eq!(file.content, b"local file content");
    assert_eq!(file.mime_type, "application/octet-stream");

    let input = UploadFileFromFileInput::new("local.bin", "/not/exists/file.bin");
    let e = client.upload_file_from_file(&input).unwrap_err();
    assert!(!e.is_server_error());
}

fn test_upload_file_from_url(client: &FakeClient, fake: &FakeCosTransport) {
    fake.serve_origin("http://origin.example.com/logo.png", 200, "image/png", "png bytes");
    fake.serve_origin("http://origin.example.com/raw", 200, "", "raw bytes");
    fake.serve_origin("http://origin.example.com/gone", 404, "text/html", "gone");

    let output = client.upload_file_from_url(&UploadFileFromUrlInput::new("http://origin.example.com/logo.png", "logo.png")).unwrap();
    assert!(!output.is_fetch_failed());
    assert_eq!(output.upload().unwrap().code(), 0);
    let file = fake.file("logo.png").unwrap();
    assert_eq!(file.content, b"png bytes");
    assert_eq!(file.mime_type, "image/png");

    let output = client.upload_file_from_url(&UploadFileFromUrlInput::new("http://origin.example.com/raw", "raw")).unwrap();
    assert_eq!(output.upload().unwrap().code(), 0);
    assert_eq!(fake.file("raw").unwrap().mime_type, "application/octet-stream");

    let before = fake.requests().len();
    let output = client.upload_file_from_url(&UploadFileFromUrlInput::new("http://origin.example.com/gone", "gone")).unwrap();
    assert!(output.is_fetch_failed());
    assert_eq!(output.fetch_status_code(), Some(404));
    assert!(output.upload().is_none());
    assert!(fake.file("gone").is_none());
    // the origin was asked once, storage never
    assert_eq!(fake.requests().len(), before + 1);

    assert!(client.upload_file_from_url(&UploadFileFromUrlInput::new("", "empty")).is_err());
}

#[test]
fn test_fetch_transport_failure() {
    let transport = MockTransport::default();
    transport.push_error("connection refused").push_envelope(0);
    let client = mock_client(&transport, &CountingSleeper::default());
    let output = client.upload_file_from_url(&UploadFileFromUrlInput::new("http://origin.example.com/a", "a")).unwrap();
    assert!(output.is_fetch_failed());
    assert_eq!(output.fetch_status_code(), None);
    assert!(output.fetch_error().unwrap().contains("connection refused"));
    // no retry for the fetch and no upload
    assert_eq!(transport.attempts(), 1);
}

#[test]
fn test_upload_request_shape() {
    let transport = MockTransport::default();
    transport.push_envelope(0).push_envelope(0).push_envelope(0);
    let client = mock_client(&transport, &CountingSleeper::default());

    let mut input = UploadFileInput::new_with_dir("\\t\\", "/a b.txt", "hello");
    input.set_biz_attr("attr");
    client.upload_file(&input).unwrap();
    input.set_replace(false);
    input.set_dir_name("");
    client.upload_file(&input).unwrap();
    client.upload_file(&UploadFileInput::new_with_dir("t", "中.txt", "x")).unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method().as_str(), "POST");
    assert_eq!(requests[0].url(), format!("{}/t/a%20b.txt", BASE_URL));
    let content_type = requests[0].header_value("Content-Type").unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert!(!content_type.contains('"'));
    let form = parse_multipart(content_type, requests[0].body().unwrap()).unwrap();
    assert_eq!(form["op"].text(), "upload");
    assert_eq!(form["biz_attr"].text(), "attr");
    assert_eq!(form["insertOnly"].text(), "0");
    assert_eq!(form["filecontent"].text(), "hello");
    assert_eq!(form["filecontent"].content_type, "application/octet-stream");
    let claims = verify_signature(requests[0].header_value("Authorization").unwrap(), SECRET_KEY).unwrap();
    assert!(!claims.is_single_use());
    assert_eq!(claims.file_id(), format!("/{}/{}/", APP_ID, BUCKET));

    assert_eq!(requests[1].url(), format!("{}/a%20b.txt", BASE_URL));
    let form = parse_multipart(requests[1].header_value("Content-Type").unwrap(), requests[1].body().unwrap()).unwrap();
    assert_eq!(form["insertOnly"].text(), "1");

    assert_eq!(requests[2].url(), format!("{}/t/%E4%B8%AD.txt", BASE_URL));
}

#[test]
fn test_relocate_request_shape() {
    let transport = MockTransport::default();
    transport.push_envelope(0).push_envelope(0);
    let client = mock_client(&transport, &CountingSleeper::default());

    client.copy_file(&CopyFileInput::new("/t/a.txt", "/t/b.txt")).unwrap();
    let mut input = MoveFileInput::new("t/a.txt", "t/c.txt");
    input.set_overwrite(true);
    client.move_file(&input).unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].url(), format!("{}/t/a.txt", BASE_URL));
    let form = parse_multipart(requests[0].header_value("Content-Type").unwrap(), requests[0].body().unwrap()).unwrap();
    assert_eq!(form["op"].text(), "copy");
    assert_eq!(form["dest_fileid"].text(), "t/b.txt");
    assert_eq!(form["to_over_write"].text(), "0");
    assert!(form["filecontent"].value.is_empty());
    let claims = verify_signature(requests[0].header_value("Authorization").unwrap(), SECRET_KEY).unwrap();
    assert!(claims.is_single_use());
    assert_eq!(claims.file_id(), format!("/{}/{}/t/a.txt", APP_ID, BUCKET));

    let form = parse_multipart(requests[1].header_value("Content-Type").unwrap(), requests[1].body().unwrap()).unwrap();
    assert_eq!(form["op"].text(), "move");
    assert_eq!(form["dest_fileid"].text(), "t/c.txt");
    assert_eq!(form["to_over_write"].text(), "1");
}

#[test]
fn test_file_request_shapes() {
    let transport = MockTransport::default();
    for _ in 0..4 {
        transport.push_envelope(0);
    }
    transport.push_response(200, HashMap::new(), "bytes");
    let client = mock_client(&transport, &CountingSleeper::default());

    client.delete_file(&DeleteFileInput::new("t/a.txt")).unwrap();
    client.stat_file(&StatFileInput::new("t/a.txt")).unwrap();
    let mut input = UpdateFileStatusInput::new("t/a.txt");
    input.set_authority("eWRPrivate");
    client.update_file_status(&input).unwrap();
    client.update_file_status(&UpdateFileStatusInput::new("t/a.txt")).unwrap();
    let mut input = GetFileInput::new("t/a.txt");
    input.set_expires(600);
    client.get_file(&input).unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method().as_str(), "POST");
    assert_eq!(requests[0].url(), format!("{}/t/a.txt", BASE_URL));
    let body: Value = serde_json::from_slice(requests[0].body().unwrap()).unwrap();
    assert_eq!(body["op"], "delete");
    let claims = verify_signature(requests[0].header_value("Authorization").unwrap(), SECRET_KEY).unwrap();
    assert!(claims.is_single_use());
    assert_eq!(claims.file_id(), format!("/{}/{}/t/a.txt", APP_ID, BUCKET));

    assert_eq!(requests[1].method().as_str(), "GET");
    assert_eq!(requests[1].url(), format!("{}/t/a.txt?op=stat", BASE_URL));

    let body: Value = serde_json::from_slice(requests[2].body().unwrap()).unwrap();
    assert_eq!(body["op"], "update");
    assert_eq!(body["authority"], "eWRPrivate");
    let body: Value = serde_json::from_slice(requests[3].body().unwrap()).unwrap();
    assert_eq!(body["authority"], "eInvalid");
    assert!(verify_signature(requests[3].header_value("Authorization").unwrap(), SECRET_KEY).unwrap().is_single_use());

    assert_eq!(requests[4].method().as_str(), "GET");
    assert!(requests[4].header_value("Authorization").is_none());
    let (url, params) = split_query(requests[4].url());
    assert_eq!(url, format!("{}/t/a.txt", BASE_URL));
    let claims = verify_signature(params["sign"].as_str(), SECRET_KEY).unwrap();
    assert_eq!(claims.file_id(), "/t/a.txt");
    assert_eq!(claims.expired() - claims.issued_at(), 600);
}
