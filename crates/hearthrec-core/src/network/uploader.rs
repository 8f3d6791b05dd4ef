use std::io::ErrorKind;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::game::GameRecord;

/// Body of an upload request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordGameRequest {
    /// Client protocol version.
    pub version: i32,
    /// Wire value of the game mode.
    pub game_type: u8,
    /// Base64 of the compressed payload.
    pub data: String,
    pub start_time: i64,
    pub end_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
}

impl RecordGameRequest {
    pub fn new(record: &GameRecord, client_version: i32) -> Self {
        Self {
            version: client_version,
            game_type: record.mode.wire_value(),
            data: BASE64.encode(&record.payload),
            start_time: record.start_time,
            end_time: record.end_time,
            rank: record.rank,
        }
    }
}

/// Body of a successful upload response.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordGameResponse {
    pub url: Option<String>,
    pub msg: Option<String>,
    pub upgrade_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The collector accepted the game.
    Delivered {
        server_url: Option<String>,
        upgrade_required: bool,
        message: Option<String>,
    },
    /// The collector could not be reached. Worth retrying later.
    TransientFailure(String),
    /// The collector answered with an error. Retrying would not help.
    RejectedByServer(String),
}

impl UploadOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Delivers finished games to the collector.
pub trait GameUploader: Send + Sync {
    fn upload(&self, record: &GameRecord) -> UploadOutcome;
}

/// Uploads games as JSON over HTTP.
pub struct HttpUploader {
    agent: ureq::Agent,
    url: String,
    client_version: i32,
}

impl HttpUploader {
    /// `timeout` bounds the whole request; a stalled upload counts as a
    /// connectivity failure.
    pub fn new(url: impl Into<String>, client_version: i32, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        let agent: ureq::Agent = config.into();

        Self {
            agent,
            url: url.into(),
            client_version,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GameUploader for HttpUploader {
    fn upload(&self, record: &GameRecord) -> UploadOutcome {
        let request = RecordGameRequest::new(record, self.client_version);
        debug!(
            "Posting game {}..{} ({} bytes) to {}",
            record.start_time,
            record.end_time,
            record.payload.len(),
            self.url
        );

        let result = self
            .agent
            .post(&self.url)
            .header(
                "User-Agent",
                &format!("hearthrec/{}", env!("CARGO_PKG_VERSION")),
            )
            .send_json(&request);

        let outcome = match result {
            Ok(mut response) => {
                let body = response.body_mut().read_to_string().unwrap_or_default();
                let parsed: RecordGameResponse = serde_json::from_str(&body).unwrap_or_else(|e| {
                    warn!("Could not parse upload response ({}): {}", e, body);
                    RecordGameResponse::default()
                });
                UploadOutcome::Delivered {
                    server_url: parsed.url,
                    upgrade_required: parsed.upgrade_required,
                    message: parsed.msg,
                }
            }
            Err(e) => classify_error(e),
        };

        log_outcome(&outcome);
        outcome
    }
}

fn is_connectivity_error(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::AddrNotAvailable
            | ErrorKind::TimedOut
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable
    )
}

/// Split transport failures from server-side rejections.
fn classify_error(e: ureq::Error) -> UploadOutcome {
    let message = e.to_string();
    match e {
        ureq::Error::StatusCode(code) => {
            UploadOutcome::RejectedByServer(format!("server returned HTTP {}", code))
        }
        ureq::Error::Timeout(_) | ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            UploadOutcome::TransientFailure(message)
        }
        ureq::Error::Io(io) if is_connectivity_error(io.kind()) => {
            UploadOutcome::TransientFailure(message)
        }
        _ => UploadOutcome::RejectedByServer(message),
    }
}

fn log_outcome(outcome: &UploadOutcome) {
    match outcome {
        UploadOutcome::Delivered {
            server_url,
            upgrade_required,
            message,
        } => {
            if *upgrade_required {
                warn!(
                    "{}",
                    message.as_deref().unwrap_or("A client upgrade is required")
                );
            } else {
                info!("Game recorded: {}", server_url.as_deref().unwrap_or("-"));
            }
        }
        UploadOutcome::TransientFailure(reason) => {
            info!("Not able to upload the game because the server is offline: {}", reason);
        }
        UploadOutcome::RejectedByServer(reason) => {
            info!(
                "Server returned an error and will not process the game ({}). A valid game is queued for reprocessing on the server.",
                reason
            );
        }
    }
}
