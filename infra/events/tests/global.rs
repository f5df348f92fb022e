use relay_events::global::{events, install, installed};
use relay_events::{Evented, GlobalEvents, Handler, NotifierConfig, NotifierError};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// Kept as a single test: the registry is process-wide.
#[test]
fn test_install_once_and_reach_from_anywhere() {
    assert!(installed().is_none());
    assert!(matches!(events().unwrap_err(), NotifierError::NotInstalled { .. }));

    let registry =
        GlobalEvents::with_config(NotifierConfig::default().with_max_dispatch_depth(8));
    let installed_ref = install(registry).unwrap();
    assert!(std::ptr::eq(installed_ref, events().unwrap()));
    assert_eq!(installed_ref.notifier().config().max_dispatch_depth, Some(8));

    let err = install(GlobalEvents::new()).unwrap_err();
    assert!(matches!(err, NotifierError::AlreadyInstalled { .. }));

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    events()
        .unwrap()
        .listen("ws:incomingMessage", None)
        .on_port(500, Handler::new(move |_, args: &[Value]| {
            assert_eq!(args[0]["author"], "Roman");
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
        .unwrap();

    events()
        .unwrap()
        .trigger("ws:incomingMessage", &[json!({ "author": "Roman", "text": "Hello world!" })])
        .unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
