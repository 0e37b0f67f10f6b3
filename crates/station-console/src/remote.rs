//! This module contains the push/pull synchronization of the keys record with
//! the backend.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::error::{Failure, RemoteError};
use crate::keys::{self, KeyField, KeysRecord, PartialKeys};
use crate::transport::Transport;

/// The backend path the keys record is synchronized with.
pub const CONFIG_ENDPOINT: &str = "/api/config/uui";

/// Result of a push or pull. Failures are values, never errors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SyncOutcome {
    Ok { data: Value },
    Unavailable { detail: String },
}

impl SyncOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, SyncOutcome::Ok { .. })
    }

    /// The keys carried by a successful pull, merged over the defaults.
    ///
    /// Returns `None` for unavailable outcomes and for responses without a
    /// well-formed `keys` object carrying at least one known field.
    pub fn keys(&self) -> Option<KeysRecord> {
        let SyncOutcome::Ok { data } = self else {
            return None;
        };
        let partial: PartialKeys = serde_json::from_value(data.get("keys")?.clone()).ok()?;
        if partial.is_empty() {
            return None;
        }
        Some(keys::merge(&KeysRecord::default(), &partial))
    }

    /// The status line the Settings panel shows after a push.
    pub fn status_text(&self) -> String {
        match self {
            SyncOutcome::Ok { data } => {
                let ok = data.get("ok").and_then(Value::as_bool).unwrap_or(false);
                format!("Saved to backend: {}", if ok { "OK" } else { "unknown" })
            }
            SyncOutcome::Unavailable { detail } => {
                Failure::RemoteUnavailable(detail.clone()).to_string()
            }
        }
    }
}

impl From<Result<Value, RemoteError>> for SyncOutcome {
    fn from(result: Result<Value, RemoteError>) -> Self {
        match result {
            Ok(data) => SyncOutcome::Ok { data },
            Err(e) => {
                warn!(error = %e, "Remote sync unavailable.");
                SyncOutcome::Unavailable {
                    detail: e.to_string(),
                }
            }
        }
    }
}

/// Pushes and pulls keys records over a [`Transport`].
///
/// Never touches the local store; the caller decides what to do with a
/// pulled record.
pub struct RemoteSync<T> {
    transport: T,
}

impl<T: Transport> RemoteSync<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Sends `{ "keys": record }` to `endpoint` in a single POST.
    #[instrument(skip(self, record))]
    pub async fn push(&self, endpoint: &str, record: &KeysRecord) -> SyncOutcome {
        info!("Pushing keys to backend...");
        let body = json!({ "keys": record });
        let edit_key = (!record.is_blank(KeyField::EditModeKey)).then(|| record.edit_mode_key.trim());
        self.transport.post_json(endpoint, &body, edit_key).await.into()
    }

    /// Reads `endpoint` in a single GET.
    #[instrument(skip(self))]
    pub async fn pull(&self, endpoint: &str) -> SyncOutcome {
        info!("Pulling keys from backend...");
        self.transport.get_json(endpoint).await.into()
    }
}
