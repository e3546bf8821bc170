//! Core tracking domain
//!
//! Geospatial primitives, the sample ingestion engine with its sampling
//! policy, the work-session lifecycle state machine, and the live
//! connection registry for the realtime channel.

pub mod geo;
pub mod ingestion;
pub mod registry;
pub mod session;

pub use ingestion::{IngestOutcome, LocationIngestionEngine, LocationRecord};
pub use registry::{ChannelMessage, ConnectionRegistry, SellerChannel};
pub use session::{SessionLifecycleManager, SessionView};
