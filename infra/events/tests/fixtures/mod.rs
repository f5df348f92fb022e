use parking_lot::Mutex;
use relay_events::{Evented, Handler, Notifier};
use serde_json::Value;
use std::sync::Arc;

/// A chat room host, the way an application would embed a notifier.
#[derive(Debug, Default)]
pub struct ChatRoom {
    pub topic: String,
    events: Notifier<Self, Value>,
}

impl ChatRoom {
    pub fn new(topic: &str) -> Self {
        Self { topic: topic.to_owned(), ..Self::default() }
    }
}

impl Evented for ChatRoom {
    type Args = Value;

    fn notifier(&self) -> &Notifier<Self, Value> {
        &self.events
    }
}

pub type Calls = Arc<Mutex<Vec<(String, Vec<Value>)>>>;

/// A handler that records its tag and arguments into `calls`.
pub fn recording(calls: &Calls, tag: &str) -> Handler<ChatRoom, Value> {
    let calls = Arc::clone(calls);
    let tag = tag.to_owned();
    Handler::new(move |_, args| {
        calls.lock().push((tag.clone(), args.to_vec()));
        Ok(())
    })
}

pub fn tags(calls: &Calls) -> Vec<String> {
    calls.lock().iter().map(|(tag, _)| tag.clone()).collect()
}
