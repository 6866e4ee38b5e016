//! File uploads from a single ambiguous source string.
//!
//! The source is classified as a remote URL, an existing local path, or
//! literal text, then pushed through Slack's external upload sequence:
//! `files.getUploadURLExternal`, a multipart POST of the bytes to the
//! returned URL, and `files.completeUploadExternal`.

use reqwest::Url;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::client::SlackClient;
use super::requests::{CompleteUploadExternal, GetUploadUrlExternal, UploadedFileRef};
use super::response::SlackResponse;
use crate::error::{McpError, McpResult};
use crate::utils::non_blank;

const FALLBACK_FILENAME: &str = "downloaded_file";
const FALLBACK_PDF_FILENAME: &str = "downloaded_file.pdf";
const FALLBACK_IMAGE_FILENAME: &str = "downloaded_image.jpg";
const CONTENT_NEEDS_FILENAME: &str = "filename is required when uploading text content";

/// Where upload bytes come from, decided per call from the raw string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    Url(Url),
    Path(PathBuf),
    Content(String),
}

impl UploadSource {
    /// First match wins: absolute URL with a host, then existing path, then text
    pub fn classify(raw: &str) -> Self {
        if let Ok(url) = Url::parse(raw)
            && url.host_str().is_some_and(|host| !host.is_empty())
        {
            return UploadSource::Url(url);
        }

        let path = Path::new(raw);
        if !raw.is_empty() && path.exists() {
            return UploadSource::Path(path.to_path_buf());
        }

        UploadSource::Content(raw.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UploadSource::Url(_) => "url",
            UploadSource::Path(_) => "path",
            UploadSource::Content(_) => "content",
        }
    }
}

/// A validated upload request
#[derive(Debug, Clone)]
pub struct FileUpload {
    channels: Vec<String>,
    source: UploadSource,
    filename: Option<String>,
    title: Option<String>,
    initial_comment: Option<String>,
    thread_ts: Option<String>,
}

impl FileUpload {
    /// Classify `file_source` and check preconditions. Nothing touches the
    /// network here; a text upload without a filename is rejected outright.
    pub fn new(
        channels: Vec<String>,
        file_source: &str,
        filename: Option<String>,
    ) -> McpResult<Self> {
        let channels: Vec<String> = channels
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if channels.is_empty() {
            return Err(McpError::InvalidParameter(
                "at least one channel is required".to_string(),
            ));
        }

        let source = UploadSource::classify(file_source);
        let filename = non_blank(filename);
        if matches!(source, UploadSource::Content(_)) && filename.is_none() {
            return Err(McpError::InvalidParameter(CONTENT_NEEDS_FILENAME.to_string()));
        }

        Ok(Self {
            channels,
            source,
            filename,
            title: None,
            initial_comment: None,
            thread_ts: None,
        })
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = non_blank(title);
        self
    }

    pub fn with_initial_comment(mut self, initial_comment: Option<String>) -> Self {
        self.initial_comment = non_blank(initial_comment);
        self
    }

    pub fn with_thread_ts(mut self, thread_ts: Option<String>) -> Self {
        self.thread_ts = non_blank(thread_ts);
        self
    }
}

/// Bytes ready for Slack plus the naming derived from their source
struct PreparedFile {
    bytes: Vec<u8>,
    filename: String,
    default_title: String,
    failure_label: &'static str,
}

impl SlackClient {
    /// Resolve the source and upload it. All failures come back as envelopes.
    pub async fn upload_file(&self, upload: FileUpload) -> SlackResponse {
        let FileUpload {
            channels,
            source,
            filename,
            title,
            initial_comment,
            thread_ts,
        } = upload;

        debug!("Uploading file from {} source", source.kind());

        let prepared = match source {
            UploadSource::Url(url) => match self.download(&url, filename).await {
                Ok(prepared) => prepared,
                Err(e) => {
                    error!("Failed to download {}: {}", url, e);
                    return SlackResponse::failure(format!(
                        "Failed to download file from URL: {}",
                        e
                    ));
                }
            },
            UploadSource::Path(path) => match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let filename = filename.unwrap_or_else(|| file_name_of(&path));
                    PreparedFile {
                        bytes,
                        default_title: format!("File: {}", filename),
                        filename,
                        failure_label: "Failed to upload file from path",
                    }
                }
                Err(e) => {
                    return SlackResponse::failure(format!(
                        "Failed to upload file from path: {}",
                        e
                    ));
                }
            },
            UploadSource::Content(text) => {
                let Some(filename) = filename else {
                    return SlackResponse::failure(CONTENT_NEEDS_FILENAME);
                };
                PreparedFile {
                    bytes: text.into_bytes(),
                    default_title: format!("Text file: {}", filename),
                    filename,
                    failure_label: "Failed to upload content",
                }
            }
        };

        let title = title.unwrap_or_else(|| prepared.default_title.clone());
        self.upload_bytes(prepared, title, channels, initial_comment, thread_ts)
            .await
    }

    async fn download(
        &self,
        url: &Url,
        filename: Option<String>,
    ) -> Result<PreparedFile, reqwest::Error> {
        let response = self.http.get(url.clone()).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        let filename = filename.unwrap_or_else(|| filename_from_url(url, &content_type));
        Ok(PreparedFile {
            bytes,
            filename,
            default_title: format!("File from {}", url),
            failure_label: "Upload failed",
        })
    }

    async fn upload_bytes(
        &self,
        file: PreparedFile,
        title: String,
        channels: Vec<String>,
        initial_comment: Option<String>,
        thread_ts: Option<String>,
    ) -> SlackResponse {
        let ticket = self
            .send(&GetUploadUrlExternal {
                filename: file.filename.clone(),
                length: file.bytes.len(),
            })
            .await;
        if !ticket.ok() {
            return ticket;
        }

        let data = ticket.data();
        let (Some(upload_url), Some(file_id)) = (
            data.get("upload_url").and_then(Value::as_str),
            data.get("file_id").and_then(Value::as_str),
        ) else {
            return SlackResponse::failure(format!(
                "{}: upload ticket is missing upload_url or file_id",
                file.failure_label
            ));
        };
        let file_id = file_id.to_string();

        let part = Part::bytes(file.bytes).file_name(file.filename.clone());
        let sent = self
            .http
            .post(upload_url)
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .and_then(|response| response.error_for_status());
        if let Err(e) = sent {
            error!("Failed to push bytes for {}: {}", file.filename, e);
            return SlackResponse::failure(format!("{}: {}", file.failure_label, e));
        }

        let (channel_id, channels) = if channels.len() == 1 {
            (channels.into_iter().next(), None)
        } else {
            (None, Some(channels))
        };

        let completed = self
            .send(&CompleteUploadExternal {
                files: vec![UploadedFileRef { id: file_id, title }],
                channel_id,
                channels,
                initial_comment,
                thread_ts,
            })
            .await;

        expose_first_file(completed)
    }
}

/// `files.completeUploadExternal` answers with a `files` list; single uploads
/// also get it as `file`
fn expose_first_file(response: SlackResponse) -> SlackResponse {
    match response {
        SlackResponse::Success { mut data, warning } => {
            if !data.contains_key("file")
                && let Some(first) = data
                    .get("files")
                    .and_then(Value::as_array)
                    .and_then(|files| files.first())
                    .cloned()
            {
                data.insert("file".to_string(), first);
            }
            SlackResponse::Success { data, warning }
        }
        failure => failure,
    }
}

/// Last URL path segment when it looks like a filename, else a name picked
/// from the content type
pub fn filename_from_url(url: &Url, content_type: &str) -> String {
    let from_path = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| segment.contains('.'));

    if let Some(name) = from_path {
        return name.to_string();
    }

    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("pdf") {
        FALLBACK_PDF_FILENAME.to_string()
    } else if content_type.contains("image") {
        FALLBACK_IMAGE_FILENAME.to_string()
    } else {
        FALLBACK_FILENAME.to_string()
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}
