//! Navigation orchestration: the eligibility gate, transport selection, and
//! event-source wiring.

use std::cell::RefCell;
use std::rc::Rc;

use regex::Regex;
use tracing::{debug, warn};

use crate::context::BrowsingContext;
use crate::history::ObservedHistory;
use crate::tracker::Tracker;

/// Start tracking the current document.
///
/// Runs the eligibility gate, constructs the engine, wires the unload beacon
/// and the SPA navigation sources, and records the initial pageview. Returns
/// `None` when the page is excluded from tracking. Exclusion is policy, not
/// an error, and nothing here can break the host.
pub fn track_request<C: BrowsingContext + 'static>(
    context: Rc<C>,
    endpoint: &str,
) -> Option<Rc<RefCell<Tracker<C>>>> {
    if dnt_enabled(context.do_not_track().as_deref()) {
        warn!("not tracking: do-not-track is set");
        return None;
    }
    if context.hostname() == "localhost" || context.protocol().starts_with("file") {
        warn!("not tracking: local context");
        return None;
    }
    let user_agent = match context.user_agent() {
        Some(ua) if is_bot(&ua) => {
            warn!("not tracking: bot user agent");
            return None;
        }
        Some(ua) => ua,
        None => {
            warn!("not tracking: user agent unavailable");
            return None;
        }
    };

    let tracker = Rc::new(RefCell::new(Tracker::new(Rc::clone(&context), endpoint)));

    // Beacon transport only where the primitive exists and is not known to
    // mishandle unload-time sends (iOS Safari before 13).
    if context.supports_beacon() && !beacon_broken(&user_agent) {
        context.on_unload(Tracker::light_beacon(&tracker));
    }

    // SPA detection: decorate the history primitive so programmatic route
    // changes surface as pageviews. No primitive means no SPA detection,
    // nothing more.
    match context.history() {
        Some(original) => {
            let push_tracker = Rc::clone(&tracker);
            let observed = ObservedHistory::new(
                original,
                Box::new(move || push_tracker.borrow_mut().pageview(true)),
            );
            context.install_history(Rc::new(observed));

            let pop_tracker = Rc::clone(&tracker);
            context.on_pop_state(Box::new(move || pop_tracker.borrow_mut().pageview(true)));
        }
        None => debug!("history primitive unavailable, SPA navigation not tracked"),
    }

    tracker.borrow_mut().pageview(false);
    Some(tracker)
}

fn dnt_enabled(flag: Option<&str>) -> bool {
    matches!(flag, Some("1") | Some("yes"))
}

fn is_bot(user_agent: &str) -> bool {
    Regex::new(r"(?i)(bot|crawler|spider)")
        .expect("bot regex is valid")
        .is_match(user_agent)
}

/// iOS Safari before version 13 accepts beacon sends at unload and then
/// drops them, so those versions fall back to immediate mode.
fn beacon_broken(user_agent: &str) -> bool {
    let ios = Regex::new(r"(?i)ip(hone|od|ad)").expect("ios regex is valid");
    if !ios.is_match(user_agent) {
        return false;
    }
    let version = Regex::new(r"OS (\d+)_").expect("ios version regex is valid");
    version
        .captures(user_agent)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|major| major < 13)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IOS_12: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 12_4 like Mac OS X) AppleWebKit/605.1.15";
    const IOS_14: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 14_2 like Mac OS X) AppleWebKit/605.1.15";
    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

    #[test]
    fn test_dnt_enabled_variants() {
        assert!(dnt_enabled(Some("1")));
        assert!(dnt_enabled(Some("yes")));
        assert!(!dnt_enabled(Some("0")));
        assert!(!dnt_enabled(Some("unspecified")));
        assert!(!dnt_enabled(None));
    }

    #[test]
    fn test_is_bot_signatures() {
        assert!(is_bot("Mozilla/5.0 (compatible; Googlebot/2.1)"));
        assert!(is_bot("some-CRAWLER/1.0"));
        assert!(is_bot("Spider"));
        assert!(!is_bot(DESKTOP));
    }

    #[test]
    fn test_beacon_broken_only_on_old_ios() {
        assert!(beacon_broken(IOS_12));
        assert!(!beacon_broken(IOS_14));
        assert!(!beacon_broken(DESKTOP));
        // Unparseable iOS version: assume the primitive works.
        assert!(!beacon_broken("iPad; something unusual"));
    }
}
