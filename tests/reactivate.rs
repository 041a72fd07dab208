//! Script reactivation tests: script extraction, immediate scanning, and the
//! bounded discovery poller (run under a paused clock, so the 500ms interval
//! elapses virtually).

mod common;

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use slate::app::reactivate::{
    extract_scripts, reactivate, ScriptAttr, WidgetHost, DISCOVERY_POLL_ATTEMPTS,
};

// ===========================================================================
// Script extraction
// ===========================================================================

#[test]
fn extracts_scripts_with_attributes_and_body() {
    let html = concat!(
        r#"<blockquote class="instagram-media">post</blockquote>"#,
        r#"<script async src="https://www.instagram.com/embed.js" charset='utf-8'></script>"#,
        r#"<script>window.init({"a":1});</script>"#,
    );

    let scripts = extract_scripts(html);
    assert_eq!(scripts.len(), 2);

    assert_eq!(
        scripts[0].attrs,
        vec![
            ScriptAttr {
                name: "async".to_string(),
                value: String::new(),
            },
            ScriptAttr {
                name: "src".to_string(),
                value: "https://www.instagram.com/embed.js".to_string(),
            },
            ScriptAttr {
                name: "charset".to_string(),
                value: "utf-8".to_string(),
            },
        ]
    );
    assert_eq!(scripts[0].body, "");
    assert!(scripts[1].attrs.is_empty());
    assert_eq!(scripts[1].body, r#"window.init({"a":1});"#);
}

#[test]
fn markup_without_scripts_extracts_nothing() {
    assert!(extract_scripts("<div><a href=\"https://x\">link</a></div>").is_empty());
}

// ===========================================================================
// Widget host stub
// ===========================================================================

#[derive(Default)]
struct StubHost {
    /// Number of readiness checks before the discovery library "loads".
    /// `u32::MAX` means it never loads.
    ready_after: u32,
    checks: AtomicU32,
    scans: Mutex<Vec<String>>,
    recreated: AtomicUsize,
    widget_calls: AtomicUsize,
    widget_fails: bool,
}

impl StubHost {
    fn ready_after(checks: u32) -> Arc<Self> {
        Arc::new(Self {
            ready_after: checks,
            ..Default::default()
        })
    }

    fn never_ready() -> Arc<Self> {
        Self::ready_after(u32::MAX)
    }

    fn scans(&self) -> Vec<String> {
        self.scans.lock().unwrap().clone()
    }
}

impl WidgetHost for StubHost {
    fn recreate_script(&self, _container: &str, _script: &slate::app::reactivate::ScriptTag) {
        self.recreated.fetch_add(1, Ordering::SeqCst);
    }

    fn discovery_ready(&self) -> bool {
        let seen = self.checks.fetch_add(1, Ordering::SeqCst);
        seen >= self.ready_after
    }

    fn scan(&self, container: &str) {
        self.scans.lock().unwrap().push(container.to_string());
    }

    fn process_platform_widgets(&self, _container: &str) -> anyhow::Result<()> {
        self.widget_calls.fetch_add(1, Ordering::SeqCst);
        if self.widget_fails {
            return Err(anyhow!("widget library blew up"));
        }
        Ok(())
    }
}

// ===========================================================================
// Reactivation
// ===========================================================================

#[tokio::test]
async fn ready_library_is_scanned_immediately() {
    let host = StubHost::ready_after(0);
    let html = r#"<div><script src="https://e/x.js"></script></div>"#;

    let poller = reactivate(host.clone(), "post-1", html);

    assert!(poller.is_none());
    assert_eq!(host.recreated.load(Ordering::SeqCst), 1);
    assert_eq!(host.scans(), vec!["post-1".to_string()]);
    assert_eq!(host.widget_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn poller_scans_once_library_loads() {
    // Not ready at injection time or on the first two polls.
    let host = StubHost::ready_after(3);

    let poller = reactivate(host.clone(), "post-2", "<div></div>").expect("poller spawned");
    let scanned = poller.await.unwrap();

    assert!(scanned);
    assert_eq!(host.scans(), vec!["post-2".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn poller_gives_up_after_attempt_budget() {
    let host = StubHost::never_ready();

    let poller = reactivate(host.clone(), "post-3", "<div></div>").expect("poller spawned");
    let scanned = poller.await.unwrap();

    assert!(!scanned);
    assert!(host.scans().is_empty());
    // One check at injection plus one per polling attempt.
    assert_eq!(
        host.checks.load(Ordering::SeqCst),
        1 + DISCOVERY_POLL_ATTEMPTS
    );
}

#[tokio::test(start_paused = true)]
async fn concurrent_pollers_do_not_interfere() {
    let host = StubHost::ready_after(4);

    let a = reactivate(host.clone(), "post-a", "<div></div>").expect("poller spawned");
    let b = reactivate(host.clone(), "post-b", "<div></div>").expect("poller spawned");
    let (a, b) = tokio::join!(a, b);

    assert!(a.unwrap() && b.unwrap());
    let mut scans = host.scans();
    scans.sort();
    assert_eq!(scans, vec!["post-a".to_string(), "post-b".to_string()]);
}

#[tokio::test]
async fn widget_library_error_is_swallowed() {
    let host = Arc::new(StubHost {
        ready_after: 0,
        widget_fails: true,
        ..Default::default()
    });

    // Must not panic or propagate; the preview stays as injected.
    let poller = reactivate(host.clone(), "post-4", "<div></div>");
    assert!(poller.is_none());
    assert_eq!(host.widget_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reactivation_is_safe_to_invoke_redundantly() {
    let host = StubHost::ready_after(0);
    let html = r#"<script>window.go();</script>"#;

    reactivate(host.clone(), "post-5", html);
    reactivate(host.clone(), "post-5", html);

    assert_eq!(host.recreated.load(Ordering::SeqCst), 2);
    assert_eq!(host.scans().len(), 2);
}
