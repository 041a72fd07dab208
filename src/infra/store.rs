use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::domain::post::Post;

/// The full post collection, held in memory and persisted wholesale to one
/// JSON document on every change. Corrupt or missing data on disk is treated
/// as an empty collection, never as a fatal error.
#[derive(Clone)]
pub struct PostStore {
    path: Arc<PathBuf>,
    posts: Arc<RwLock<Vec<Post>>>,
}

impl PostStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let posts = match tokio::fs::read(&path).await {
            Ok(raw) => match serde_json::from_slice::<Vec<Post>>(&raw) {
                Ok(posts) => posts,
                Err(err) => {
                    warn!(
                        error = %err,
                        path = %path.display(),
                        "stored posts are unreadable, starting empty"
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };

        Ok(Self {
            path: Arc::new(path),
            posts: Arc::new(RwLock::new(posts)),
        })
    }

    pub async fn all(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    pub async fn get(&self, id: Uuid) -> Option<Post> {
        self.posts.read().await.iter().find(|p| p.id == id).cloned()
    }

    /// A mutation that fails to persist is rolled back before the error is
    /// returned, so the in-memory collection never diverges from what the
    /// caller was told.
    pub async fn insert(&self, post: Post) -> Result<()> {
        let mut posts = self.posts.write().await;
        posts.push(post);
        if let Err(err) = self.persist(&posts).await {
            posts.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Replaces the post with the same id. Returns false when no such post
    /// exists; nothing is written in that case.
    pub async fn replace(&self, post: Post) -> Result<bool> {
        let mut posts = self.posts.write().await;
        let Some(idx) = posts.iter().position(|p| p.id == post.id) else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut posts[idx], post);
        if let Err(err) = self.persist(&posts).await {
            posts[idx] = previous;
            return Err(err);
        }
        Ok(true)
    }

    pub async fn remove(&self, id: Uuid) -> Result<bool> {
        let mut posts = self.posts.write().await;
        let Some(idx) = posts.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        let removed = posts.remove(idx);
        if let Err(err) = self.persist(&posts).await {
            posts.insert(idx, removed);
            return Err(err);
        }
        Ok(true)
    }

    // Write-then-rename so a crash mid-write never truncates the stored set.
    async fn persist(&self, posts: &[Post]) -> Result<()> {
        let payload = serde_json::to_vec_pretty(posts)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &payload)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, self.path.as_ref())
            .await
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
