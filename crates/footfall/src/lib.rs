//! Footfall — privacy-first page-view tracking engine.
//!
//! A host embeds the tracker by implementing [`BrowsingContext`] and calling
//! [`track_request`]. The engine reconciles three independent navigation
//! signals (initial load, programmatic SPA navigation, and history
//! back/forward) into one consistent pageview stream and delivers a minimal,
//! non-identifying payload to a collection endpoint. Delivery is either
//! immediate per navigation or deferred to a single best-effort beacon at
//! unload, depending on what the platform supports.
//!
//! No cookies, no identifiers, no persistence: all state lives for the
//! lifetime of one document and failing to track never breaks the host.

pub mod context;
pub mod history;
pub mod payload;
pub mod query;
pub mod track;
pub mod tracker;
pub mod transport;

pub use context::{BrowsingContext, Unavailable};
pub use history::{HistoryApi, ObservedHistory};
pub use payload::{Attribution, PageviewRecord, SessionPayload};
pub use query::QueryParams;
pub use track::track_request;
pub use tracker::Tracker;
pub use transport::Collector;
