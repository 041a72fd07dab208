//! Embed resolution: turns a user-pasted URL or raw embed markup into a safe,
//! platform-appropriate preview, falling through a fixed strategy chain:
//! recognized video URL, remote metadata lookup, link-only fallback, generic
//! link card, raw markup injection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use uuid::Uuid;

use crate::domain::post::Platform;
use crate::infra::iframely::RemoteResolver;

/// One regex covers every URL shape the video host hands out: canonical
/// watch pages, short links, embeds, shorts and live streams, with optional
/// scheme and www./m. host prefixes. Capture is the 11-character video id.
static VIDEO_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtu\.be/|youtube\.com/(?:embed/|v/|watch\?v=|watch\?.+&v=|shorts/|live/))([\w-]{11})(?:[?&].*)?$",
    )
    .expect("video url pattern")
});

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("bare url pattern"));

static IFRAME_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<iframe\b[^>]*>").expect("iframe tag pattern"));

// Left-anchored so attributes like data-style never match.
static STYLE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)(^|\s)style\s*=\s*("[^"]*"|'[^']*')"#).expect("style attr pattern")
});

/// A renderable resolution outcome. `Markup` is injected into the render
/// target (and then reactivated); `LinkOnly` means no safe inline preview is
/// possible and the caller shows an outbound link instead.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedOutcome {
    Markup { html: String, origin: MarkupOrigin },
    LinkOnly { platform: Platform, url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupOrigin {
    /// Deterministic responsive player built from a recognized video id.
    VideoPlayer,
    /// Markup returned by the remote resolution service.
    Remote,
    /// Local placeholder card carrying the discovery marker attribute.
    LinkCard,
    /// User-pasted markup injected verbatim (width-constrained).
    Raw,
}

impl MarkupOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkupOrigin::VideoPlayer => "video_player",
            MarkupOrigin::Remote => "remote",
            MarkupOrigin::LinkCard => "link_card",
            MarkupOrigin::Raw => "raw",
        }
    }
}

pub fn youtube_video_id(input: &str) -> Option<&str> {
    VIDEO_URL
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_bare_url(input: &str) -> bool {
    BARE_URL.is_match(input)
}

/// Responsive 16:9 padding-box player for a recognized video id. Kept
/// deliberately plain: a short allow list and no strict-origin policy avoids
/// player error 153 on some channels.
pub fn video_player_markup(video_id: &str) -> String {
    format!(
        concat!(
            r#"<div style="left: 0; width: 100%; height: 0; position: relative; padding-bottom: 56.25%;">"#,
            r#"<iframe src="https://www.youtube.com/embed/{id}" "#,
            r#"style="top: 0; left: 0; width: 100%; height: 100%; position: absolute; border: 0;" "#,
            r#"allowfullscreen "#,
            r#"allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture">"#,
            r#"</iframe></div>"#
        ),
        id = video_id
    )
}

/// Placeholder card for a bare URL. The anchor carries the discovery marker
/// attribute so the client-side library can later swap it for a rich card;
/// until then the visible link is the final state.
pub fn link_card_markup(url: &str) -> String {
    let href = escape_attr(url);
    format!(
        concat!(
            r#"<div class="iframely-embed" style="width: 100%;">"#,
            r#"<div class="iframely-responsive" style="padding-bottom: 50%; padding-top: 120px; background: #f9fafb; text-align: center; border-radius: 8px;">"#,
            r#"<a href="{href}" data-iframely-url style="color: #6b7280; text-decoration: none; font-family: sans-serif;">"#,
            "Preview loading...",
            "</a></div></div>"
        ),
        href = href
    )
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Constrains every frame element in pasted markup to the width of its
/// container so an oversized embed cannot break the layout.
pub fn constrain_iframes(html: &str) -> String {
    IFRAME_TAG
        .replace_all(html, |caps: &regex::Captures| {
            let tag = &caps[0];
            if STYLE_ATTR.is_match(tag) {
                STYLE_ATTR
                    .replace(tag, |style: &regex::Captures| {
                        let quoted = &style[2];
                        let quote = &quoted[..1];
                        let value = &quoted[1..quoted.len() - 1];
                        format!(
                            "{pre}style={q}max-width: 100%; {v}{q}",
                            pre = &style[1],
                            q = quote,
                            v = value
                        )
                    })
                    .into_owned()
            } else {
                let head = tag[..tag.len() - 1].trim_end_matches('/').trim_end();
                format!(r#"{} style="max-width: 100%;">"#, head)
            }
        })
        .into_owned()
}

/// The ordered strategy chain. First match wins:
///
/// 1. recognized video URL — manual player markup, always, regardless of
///    platform or remote availability;
/// 2. bare URL on an embeddable platform with a resolver configured — remote
///    lookup, any failure falls through with the same input;
/// 3. strict-link platform — link-only descriptor;
/// 4. bare URL — generic link card with the discovery marker;
/// 5. raw markup — verbatim, width-constrained.
pub async fn resolve_embed(
    content: &str,
    platform: Platform,
    remote: Option<&dyn RemoteResolver>,
) -> EmbedOutcome {
    let trimmed = content.trim();

    if let Some(id) = youtube_video_id(trimmed) {
        return EmbedOutcome::Markup {
            html: video_player_markup(id),
            origin: MarkupOrigin::VideoPlayer,
        };
    }

    let is_url = is_bare_url(trimmed);
    if is_url && !platform.is_strict_link() {
        if let Some(remote) = remote {
            match remote.resolve(trimmed).await {
                Ok(html) => {
                    return EmbedOutcome::Markup {
                        html,
                        origin: MarkupOrigin::Remote,
                    }
                }
                Err(err) => {
                    warn!(error = %err, "remote embed resolution failed, using local fallback");
                }
            }
        }
    }

    manual_embed(trimmed, is_url, platform)
}

fn manual_embed(trimmed: &str, is_url: bool, platform: Platform) -> EmbedOutcome {
    if platform.is_strict_link() {
        return EmbedOutcome::LinkOnly {
            platform,
            url: trimmed.to_string(),
        };
    }

    if is_url {
        return EmbedOutcome::Markup {
            html: link_card_markup(trimmed),
            origin: MarkupOrigin::LinkCard,
        };
    }

    EmbedOutcome::Markup {
        html: constrain_iframes(trimmed),
        origin: MarkupOrigin::Raw,
    }
}

/// Rendering state of one embed container.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveState {
    Idle,
    /// A lookup is outstanding; present a loading indicator.
    Pending,
    Ready(EmbedOutcome),
}

/// Identifies which resolution attempt an asynchronous result belongs to.
/// Captured at request time; a commit whose generation no longer matches the
/// pane's current one is discarded, so a slow lookup for a superseded input
/// can never overwrite the rendering of the current one.
#[derive(Debug)]
pub struct ResolveTicket {
    generation: u64,
    pub content: String,
    pub platform: Platform,
}

enum Begin {
    Reuse(EmbedOutcome),
    Run(ResolveTicket),
}

struct PaneInner {
    generation: u64,
    target: Option<(String, Platform)>,
    state: ResolveState,
}

/// One rendered embed container. Re-resolves only when `(content, platform)`
/// changes, never on every render; a ready outcome for the current pair is
/// reused as-is.
#[derive(Clone)]
pub struct EmbedPane {
    inner: Arc<Mutex<PaneInner>>,
}

impl Default for EmbedPane {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbedPane {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PaneInner {
                generation: 0,
                target: None,
                state: ResolveState::Idle,
            })),
        }
    }

    pub fn state(&self) -> ResolveState {
        self.inner.lock().expect("pane lock").state.clone()
    }

    fn begin_inner(&self, content: &str, platform: Platform) -> Begin {
        let mut inner = self.inner.lock().expect("pane lock");
        let target = (content.to_string(), platform);
        if inner.target.as_ref() == Some(&target) {
            if let ResolveState::Ready(outcome) = &inner.state {
                return Begin::Reuse(outcome.clone());
            }
        }

        inner.generation += 1;
        inner.target = Some(target);
        inner.state = ResolveState::Pending;
        Begin::Run(ResolveTicket {
            generation: inner.generation,
            content: content.to_string(),
            platform,
        })
    }

    /// Starts a resolution attempt for a new input, superseding any attempt
    /// still in flight. Returns `None` when the pane already holds a ready
    /// outcome for this exact input.
    pub fn begin(&self, content: &str, platform: Platform) -> Option<ResolveTicket> {
        match self.begin_inner(content, platform) {
            Begin::Reuse(_) => None,
            Begin::Run(ticket) => Some(ticket),
        }
    }

    /// Installs an outcome if its ticket is still current. Returns false for
    /// stale results, which leave the pane untouched. Both success and
    /// failure outcomes clear the pending state.
    pub fn commit(&self, ticket: &ResolveTicket, outcome: EmbedOutcome) -> bool {
        let mut inner = self.inner.lock().expect("pane lock");
        if ticket.generation != inner.generation {
            return false;
        }
        inner.state = ResolveState::Ready(outcome);
        true
    }

    /// Full resolve cycle for this pane. Always returns the outcome computed
    /// for the supplied input; the pane state is only updated when the
    /// attempt was not superseded in the meantime.
    pub async fn resolve(
        &self,
        content: &str,
        platform: Platform,
        remote: Option<&dyn RemoteResolver>,
    ) -> EmbedOutcome {
        let ticket = match self.begin_inner(content, platform) {
            Begin::Reuse(outcome) => return outcome,
            Begin::Run(ticket) => ticket,
        };

        let outcome = resolve_embed(&ticket.content, ticket.platform, remote).await;
        self.commit(&ticket, outcome.clone());
        outcome
    }
}

/// Per-post panes for the preview endpoint, so repeated previews of an
/// unchanged post skip the remote lookup.
#[derive(Clone, Default)]
pub struct PreviewPanes {
    panes: Arc<Mutex<HashMap<Uuid, EmbedPane>>>,
}

impl PreviewPanes {
    pub fn pane(&self, id: Uuid) -> EmbedPane {
        self.panes
            .lock()
            .expect("panes lock")
            .entry(id)
            .or_default()
            .clone()
    }

    pub fn evict(&self, id: Uuid) {
        self.panes.lock().expect("panes lock").remove(&id);
    }
}
