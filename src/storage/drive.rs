// ===========================================================================
// storage/drive - Google Drive v3 REST Client
// ===========================================================================

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::http::{HeaderMap, Response};
use ureq::{Agent, Body};

use super::{Entry, Error, FolderId, Query, Result, Storage};

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

const API_BASE: &str = "https://www.googleapis.com/drive/v3";
const UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const LIST_FIELDS: &str = "nextPageToken, files(id, name)";
const PAGE_SIZE: &str = "1000";

// Drive requires every chunk except the last to be a multiple of 256 KiB
const CHUNK_ALIGN: usize = 256 * 1024;

#[derive(Serialize)]
struct FileMetadata<'a> {
    name: &'a str,

    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    mime_type: Option<&'a str>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    parents: Vec<&'a str>,
}

#[derive(Deserialize)]
struct Created {
    id: FolderId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<RemoteFile>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct RemoteFile {
    id: FolderId,
    name: String,
}

pub struct DriveClient {
    agent: Agent,
    token: String,
    chunk_size: usize,
    api_base: String,
    upload_base: String,
}

impl DriveClient {
    pub fn new(token: impl Into<String>, chunk_size: usize) -> Self {
        Self::with_endpoints(token, chunk_size, API_BASE, UPLOAD_BASE)
    }

    /// Client against other endpoints with the Drive v3 path layout
    pub(crate) fn with_endpoints(
        token: impl Into<String>,
        chunk_size: usize,
        api_base: &str,
        upload_base: &str,
    ) -> Self {
        // Redirects stay unfollowed: resumable uploads answer 308 per chunk
        let agent = Agent::new_with_config(
            ureq::config::Config::builder()
                .timeout_global(Some(Duration::from_secs(300)))
                .http_status_as_error(false)
                .max_redirects(0)
                .max_redirects_will_error(false)
                .build(),
        );

        Self {
            agent,
            token: token.into(),
            chunk_size: align_chunk_size(chunk_size),
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Open a resumable upload session and return its session URI
    fn start_session(&self, name: &str, parent: &FolderId, total: u64) -> Result<String> {
        let metadata = FileMetadata {
            name,
            mime_type: None,
            parents: vec![parent.as_str()],
        };

        let response = self
            .agent
            .post(format!("{}/files", self.upload_base))
            .query("uploadType", "resumable")
            .query("fields", "id")
            .header("Authorization", self.bearer())
            .header("X-Upload-Content-Length", total.to_string())
            .send_json(&metadata)
            .map_err(transport)?;

        let response = expect_success(response)?;
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::Response("upload session has no Location header".into()))
    }

    fn put_chunk(&self, session: &str, range: &str, chunk: &[u8]) -> Result<Response<Body>> {
        let request = self
            .agent
            .put(session)
            .header("Authorization", self.bearer())
            .header("Content-Range", range);

        if chunk.is_empty() {
            request.send_empty().map_err(transport)
        } else {
            request.send(chunk).map_err(transport)
        }
    }
}

impl Storage for DriveClient {
    fn create_folder(&self, name: &str, parent: Option<&FolderId>) -> Result<FolderId> {
        tracing::debug!(name, parent = ?parent, "creating folder");

        let metadata = FileMetadata {
            name,
            mime_type: Some(FOLDER_MIME),
            parents: parent.map(|p| vec![p.as_str()]).unwrap_or_default(),
        };

        let response = self
            .agent
            .post(format!("{}/files", self.api_base))
            .query("fields", "id")
            .header("Authorization", self.bearer())
            .send_json(&metadata)
            .map_err(transport)?;

        let created: Created = read_json(expect_success(response)?)?;
        Ok(created.id)
    }

    fn list(&self, query: &Query) -> Result<Vec<Entry>> {
        let q = drive_query(query);
        tracing::debug!(q = %q, "listing files");

        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .agent
                .get(format!("{}/files", self.api_base))
                .query("q", &q)
                .query("spaces", "drive")
                .query("fields", LIST_FIELDS)
                .query("pageSize", PAGE_SIZE)
                .header("Authorization", self.bearer());
            if let Some(token) = &page_token {
                request = request.query("pageToken", token);
            }

            let response = request.call().map_err(transport)?;
            let page: FileList = read_json(expect_success(response)?)?;

            entries.extend(page.files.into_iter().map(|f| Entry {
                id: f.id,
                name: f.name,
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(entries)
    }

    fn upload_file(&self, name: &str, parent: &FolderId, path: &Path) -> Result<FolderId> {
        let mut file = File::open(path)?;
        let total = file.metadata()?.len();
        let session = self.start_session(name, parent, total)?;
        tracing::debug!(name, total, "upload session opened");

        if total == 0 {
            let response = self.put_chunk(&session, "bytes */0", &[])?;
            let created: Created = read_json(expect_success(response)?)?;
            return Ok(created.id);
        }

        let mut buf = vec![0u8; self.chunk_size];
        let mut offset: u64 = 0;

        loop {
            let n = read_full(&mut file, &mut buf)?;
            if n == 0 {
                return Err(Error::Response(format!(
                    "'{name}' shrank to {offset} bytes during upload"
                )));
            }

            let end = offset + n as u64 - 1;
            let range = format!("bytes {offset}-{end}/{total}");
            let response = self.put_chunk(&session, &range, &buf[..n])?;

            let status = response.status().as_u16();
            match status {
                200 | 201 => {
                    let created: Created = read_json(response)?;
                    return Ok(created.id);
                }
                308 => {
                    let next = next_offset(response.headers());
                    tracing::debug!(name, next, total, "chunk accepted");
                    if next != end + 1 {
                        file.seek(SeekFrom::Start(next))?;
                    }
                    offset = next;
                }
                _ => {
                    expect_success(response)?;
                    return Err(Error::Response(format!(
                        "unexpected status {status} while uploading '{name}'"
                    )));
                }
            }
        }
    }
}

/// Round a byte count down to the 256 KiB grid Drive accepts, never below one unit
pub fn align_chunk_size(bytes: usize) -> usize {
    (bytes / CHUNK_ALIGN).max(1) * CHUNK_ALIGN
}

/// Build a Drive `q` expression from a query
fn drive_query(query: &Query) -> String {
    let mut clauses = Vec::new();
    if let Some(name) = &query.name {
        clauses.push(format!("name = '{}'", escape(name)));
    }
    if query.folders_only {
        clauses.push(format!("mimeType = '{FOLDER_MIME}'"));
    }
    if let Some(parent) = &query.parent {
        clauses.push(format!("'{}' in parents", escape(parent.as_str())));
    }
    clauses.push("trashed = false".to_string());
    clauses.join(" and ")
}

/// Escape a string literal for the Drive query language
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Offset after the last byte the server holds, from a 308 `Range: bytes=0-N` header
fn next_offset(headers: &HeaderMap) -> u64 {
    headers
        .get("range")
        .and_then(|v| v.to_str().ok())
        .and_then(parse_range_end)
        .map(|last| last + 1)
        .unwrap_or(0)
}

fn parse_range_end(range: &str) -> Option<u64> {
    range
        .trim()
        .strip_prefix("bytes=")
        .and_then(|r| r.split('-').nth(1))
        .and_then(|end| end.trim().parse().ok())
}

/// Fill `buf` from `reader`, stopping early only at EOF
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

fn transport(err: ureq::Error) -> Error {
    Error::Transport(err.to_string())
}

fn expect_success(mut response: Response<Body>) -> Result<Response<Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.body_mut().read_to_string().unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

fn read_json<T: serde::de::DeserializeOwned>(mut response: Response<Body>) -> Result<T> {
    response
        .body_mut()
        .read_json()
        .map_err(|e| Error::Response(e.to_string()))
}
