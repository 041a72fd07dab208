pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use std::sync::Arc;

use crate::app::embed::PreviewPanes;
use crate::infra::iframely::RemoteResolver;
use crate::infra::store::PostStore;

#[derive(Clone)]
pub struct AppState {
    pub store: PostStore,
    /// Absent when no API credential is configured; the resolver then falls
    /// straight through to its local strategies.
    pub remote: Option<Arc<dyn RemoteResolver>>,
    pub panes: PreviewPanes,
}
