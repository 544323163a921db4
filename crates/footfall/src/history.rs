//! Decorating the history primitive to synthesize navigation events.
//!
//! No platform event fires when a single-page application changes routes
//! programmatically, so the orchestrator swaps the history primitive for
//! [`ObservedHistory`]: same arguments, same side effects, same return
//! value, plus an internal observer call after the original completes.

use std::rc::Rc;

use serde_json::Value;

/// The host's history-manipulation primitive (`pushState` shaped).
pub trait HistoryApi {
    /// Push a new history entry. Returns whatever the underlying primitive
    /// returns.
    fn push_state(&self, state: Value, title: &str, url: &str) -> Value;
}

/// Decorator that forwards to the wrapped primitive and then notifies an
/// observer.
///
/// The inner call completes first, so an observer reading the location sees
/// the new entry.
pub struct ObservedHistory {
    inner: Rc<dyn HistoryApi>,
    observer: Box<dyn Fn()>,
}

impl ObservedHistory {
    pub fn new(inner: Rc<dyn HistoryApi>, observer: Box<dyn Fn()>) -> Self {
        Self { inner, observer }
    }
}

impl HistoryApi for ObservedHistory {
    fn push_state(&self, state: Value, title: &str, url: &str) -> Value {
        let result = self.inner.push_state(state, title, url);
        (self.observer)();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    struct FakeHistory {
        calls: RefCell<Vec<(Value, String, String)>>,
    }

    impl HistoryApi for FakeHistory {
        fn push_state(&self, state: Value, title: &str, url: &str) -> Value {
            self.calls
                .borrow_mut()
                .push((state, title.to_string(), url.to_string()));
            json!("pushed")
        }
    }

    #[test]
    fn test_forwards_arguments_and_preserves_return_value() {
        let fake = Rc::new(FakeHistory {
            calls: RefCell::new(Vec::new()),
        });
        let observed = ObservedHistory::new(fake.clone(), Box::new(|| {}));

        let ret = observed.push_state(json!({"page": 2}), "title", "/next");

        assert_eq!(ret, json!("pushed"));
        let calls = fake.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, json!({"page": 2}));
        assert_eq!(calls[0].1, "title");
        assert_eq!(calls[0].2, "/next");
    }

    #[test]
    fn test_observer_runs_after_the_original() {
        let order = Rc::new(RefCell::new(Vec::new()));

        struct Recording {
            order: Rc<RefCell<Vec<&'static str>>>,
        }
        impl HistoryApi for Recording {
            fn push_state(&self, _: Value, _: &str, _: &str) -> Value {
                self.order.borrow_mut().push("original");
                Value::Null
            }
        }

        let inner = Rc::new(Recording {
            order: order.clone(),
        });
        let observer_order = order.clone();
        let observed = ObservedHistory::new(
            inner,
            Box::new(move || observer_order.borrow_mut().push("observer")),
        );

        observed.push_state(Value::Null, "", "/a");
        assert_eq!(*order.borrow(), vec!["original", "observer"]);
    }
}
