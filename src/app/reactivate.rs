//! Script reactivation: after markup is injected into a render target,
//! directly injected `<script>` tags do not execute as part of normal
//! parsing. This component re-creates them through the host and triggers the
//! optional third-party widget libraries, polling for the discovery library
//! when it loads late. Stateless and safe to invoke redundantly; independent
//! pollers for different containers may run concurrently.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DISCOVERY_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DISCOVERY_POLL_ATTEMPTS: u32 = 20;

static SCRIPT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script>").expect("script tag pattern"));

static TAG_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?"#)
        .expect("attribute pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptAttr {
    pub name: String,
    pub value: String,
}

/// A script element found in injected markup: attributes in document order
/// plus the verbatim inline body. Enough for the host to re-create an
/// element the execution environment will actually run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptTag {
    pub attrs: Vec<ScriptAttr>,
    pub body: String,
}

pub fn extract_scripts(html: &str) -> Vec<ScriptTag> {
    SCRIPT_TAG
        .captures_iter(html)
        .map(|caps| ScriptTag {
            attrs: parse_attrs(caps.get(1).map_or("", |m| m.as_str())),
            body: caps.get(2).map_or("", |m| m.as_str()).to_string(),
        })
        .collect()
}

fn parse_attrs(raw: &str) -> Vec<ScriptAttr> {
    TAG_ATTR
        .captures_iter(raw)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            ScriptAttr {
                name: caps[1].to_string(),
                value: value.to_string(),
            }
        })
        .collect()
}

/// The globally script-provided libraries, abstracted as an injected
/// capability so tests can substitute a stub. Both libraries are optional;
/// a host where neither exists degrades to the link-placeholder state.
pub trait WidgetHost: Send + Sync {
    /// Re-creates one script element inside the container so it executes.
    fn recreate_script(&self, container: &str, script: &ScriptTag);

    /// Whether the discovery/scan-and-replace library has loaded yet.
    fn discovery_ready(&self) -> bool;

    /// Scans the container for elements bearing the discovery marker
    /// attribute and replaces them with rich cards.
    fn scan(&self, container: &str);

    /// Invokes the platform widget-processing library on the container.
    fn process_platform_widgets(&self, container: &str) -> anyhow::Result<()>;
}

/// Makes freshly injected markup functional. Returns the handle of the
/// discovery poller when one was spawned (the library was not ready yet);
/// the handle resolves to whether a scan eventually ran.
pub fn reactivate(
    host: Arc<dyn WidgetHost>,
    container: &str,
    html: &str,
) -> Option<JoinHandle<bool>> {
    for script in extract_scripts(html) {
        host.recreate_script(container, &script);
    }

    let poller = if host.discovery_ready() {
        host.scan(container);
        None
    } else {
        Some(spawn_discovery_poller(host.clone(), container.to_string()))
    };

    if let Err(err) = host.process_platform_widgets(container) {
        debug!(error = %err, container, "platform widget processing failed");
    }

    poller
}

// Bounded retry: the discovery library may load asynchronously after the
// page. Re-check on a fixed interval and give up silently once the attempt
// budget is spent; the link placeholder stays visible as the final state.
fn spawn_discovery_poller(host: Arc<dyn WidgetHost>, container: String) -> JoinHandle<bool> {
    tokio::spawn(async move {
        for _ in 0..DISCOVERY_POLL_ATTEMPTS {
            tokio::time::sleep(DISCOVERY_POLL_INTERVAL).await;
            if host.discovery_ready() {
                host.scan(&container);
                return true;
            }
        }
        debug!(container = %container, "discovery library never loaded, giving up");
        false
    })
}
