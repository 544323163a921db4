//! The tracking engine: payload ownership, the de-dup guard, and the
//! transport mode decision.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::context::BrowsingContext;
use crate::payload::{Attribution, PageviewRecord, SessionPayload};
use crate::query::QueryParams;

/// Owns the session payload and decides when a navigation counts as a new
/// pageview and how it is delivered.
///
/// State is shared between event handlers through `Rc<RefCell<_>>`; the
/// host's single-threaded event dispatch serializes all mutation.
pub struct Tracker<C: BrowsingContext> {
    context: Rc<C>,
    collect_url: String,
    start: Instant,
    payload: SessionPayload,
    use_send_beacon: bool,
    last_path: Option<String>,
}

impl<C: BrowsingContext> Tracker<C> {
    /// Build the engine and snapshot everything the payload reads from the
    /// entry navigation: hostname, viewport, timezone, and attribution.
    pub fn new(context: Rc<C>, endpoint: &str) -> Self {
        let params = QueryParams::parse(&context.query_string());
        // Timezone resolution is best-effort and never fatal.
        let timezone = context.timezone().ok();
        let (width, height) = context.viewport();
        let payload = SessionPayload {
            hostname: context.hostname(),
            timezone,
            width,
            height,
            source: Some(Attribution::from_entry(&params, &context.referrer())),
            pageviews: Vec::new(),
            time: None,
        };
        Self {
            collect_url: format!("{endpoint}post"),
            context,
            start: Instant::now(),
            payload,
            use_send_beacon: false,
            last_path: None,
        }
    }

    /// The accumulated payload.
    pub fn payload(&self) -> &SessionPayload {
        &self.payload
    }

    /// Whether deliveries are deferred to the unload beacon.
    pub fn beacon_mode(&self) -> bool {
        self.use_send_beacon
    }

    /// Switch to beacon transport and return the unload closure.
    ///
    /// The closure stamps the total elapsed time and hands the accumulated
    /// payload to the context's beacon primitive in one non-blocking send.
    /// Re-arming simply returns an equivalent closure.
    pub fn light_beacon(this: &Rc<RefCell<Self>>) -> Box<dyn Fn()>
    where
        C: 'static,
    {
        this.borrow_mut().use_send_beacon = true;
        let tracker = Rc::clone(this);
        Box::new(move || {
            let mut t = tracker.borrow_mut();
            t.payload.time = Some(t.start.elapsed().as_secs());
            match serde_json::to_string(&t.payload) {
                Ok(body) => t.context.send_beacon(&t.collect_url, &body),
                Err(err) => tracing::debug!("payload serialization failed: {err}"),
            }
        })
    }

    /// Record one navigation. `spa_navigation` marks in-page route changes,
    /// which permanently drop the entry attribution from the payload.
    pub fn pageview(&mut self, spa_navigation: bool) {
        let path = self.context.path();
        // De-dup guard: the same path twice in a row is one pageview.
        if self.last_path.as_deref() == Some(path.as_str()) {
            return;
        }
        let time = self.start.elapsed().as_secs();
        self.payload.pageviews.push(PageviewRecord {
            path: path.clone(),
            time,
        });
        self.last_path = Some(path);

        if self.use_send_beacon {
            // Deferred delivery: the armed unload closure sends everything
            // exactly once.
            return;
        }

        if spa_navigation {
            // Attribution answers "how did the session start". It never
            // survives an in-page route change.
            self.payload.source = None;
        }
        // The full cumulative payload goes out on every immediate-mode call.
        // That is the wire contract with the collection endpoint.
        match serde_json::to_string(&self.payload) {
            Ok(body) => self.context.send_request(&self.collect_url, &body),
            Err(err) => tracing::debug!("payload serialization failed: {err}"),
        }
    }
}
