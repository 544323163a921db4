//! Capability surface of the page being tracked.
//!
//! Everything the engine needs from its host (location, navigator flags,
//! event sources, network send) comes through [`BrowsingContext`], an
//! injected dependency rather than ambient global state. The host implements
//! it once; tests implement it with a recording mock.

use std::rc::Rc;

use crate::history::HistoryApi;

/// A platform capability the context cannot provide.
///
/// Optional features (timezone resolution, for one) collapse this to
/// `Option` at the call site. It never propagates further.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("capability unavailable: {0}")]
pub struct Unavailable(pub &'static str);

/// The injected browser surface.
///
/// All methods take `&self`: dispatch is single-threaded, and host
/// implementations use interior mutability where registration needs it.
pub trait BrowsingContext {
    /// Hostname of the current page.
    fn hostname(&self) -> String;

    /// Path component of the current location. Never includes the query
    /// string or fragment, so incidental identifying data stays out of the
    /// pageview stream.
    fn path(&self) -> String;

    /// URL scheme of the current page, e.g. `https:` or `file:`.
    fn protocol(&self) -> String;

    /// Raw query string without the leading `?`.
    fn query_string(&self) -> String;

    /// Full referrer string, empty when there is none.
    fn referrer(&self) -> String;

    /// Viewport size as `(width, height)`.
    fn viewport(&self) -> (u32, u32);

    /// Do-not-track signal, if the platform exposes one.
    fn do_not_track(&self) -> Option<String>;

    /// User-agent string, if available.
    fn user_agent(&self) -> Option<String>;

    /// IANA timezone name. Best-effort; absence is expected on some hosts
    /// and never fatal.
    fn timezone(&self) -> Result<String, Unavailable>;

    /// Fire-and-forget POST with `Content-Type: text/plain; charset=UTF-8`.
    /// The caller never observes the outcome.
    fn send_request(&self, url: &str, body: &str);

    /// Whether a non-blocking beacon primitive exists.
    fn supports_beacon(&self) -> bool;

    /// Best-effort non-blocking send, usable while the page unloads.
    fn send_beacon(&self, url: &str, body: &str);

    /// Register a handler for the unload lifecycle event.
    fn on_unload(&self, handler: Box<dyn Fn()>);

    /// Register a handler for back/forward navigation.
    fn on_pop_state(&self, handler: Box<dyn Fn()>);

    /// The history-manipulation primitive, when the platform has one.
    fn history(&self) -> Option<Rc<dyn HistoryApi>>;

    /// Replace the history primitive. The orchestrator uses this to install
    /// an observing decorator; hosts must route subsequent programmatic
    /// navigations through whatever is installed here.
    fn install_history(&self, api: Rc<dyn HistoryApi>);
}
