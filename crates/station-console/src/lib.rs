//! Core of the Station console: a local-first keys store, its optional
//! synchronization with the backend, and the guarded Ops invoker.
//!
//! Every boundary call to storage or to the network resolves to a value;
//! callers render failures as status lines instead of handling errors.

pub mod api;
pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod notices;
pub mod ops;
pub mod remote;
pub mod store;
pub mod transport;

pub use api::{ApiReply, StationApi};
pub use config::StationConfig;
pub use error::{Failure, RemoteError, StoreError};
pub use keys::{KeyField, KeysRecord, PartialKeys};
pub use ops::{guard, invoke, GuardResult, OpAction, OpOutcome};
pub use remote::{RemoteSync, SyncOutcome};
pub use store::{FileMedium, KeyMedium, KeyStore, MemoryMedium};
pub use transport::{HttpTransport, Transport};
