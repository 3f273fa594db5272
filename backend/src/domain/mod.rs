//! # Domain Module
//!
//! Business logic of the synchronization core: the session monitor, the
//! snapshot loader, the view router and the record write path.

pub mod auth;
pub mod errors;
pub mod records;
pub mod router;
pub mod session;
pub mod snapshot;

pub use auth::{AuthProvider, ChannelAuthProvider, SessionEvent};
pub use errors::{LoadError, NormalizationError, SessionError};
pub use records::RecordService;
pub use router::{transition, NavEvent, RouterGuards, ViewRouter};
pub use session::{SessionMonitor, SessionSignal};
pub use snapshot::SnapshotLoader;
