use anyhow::Result;
use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};
use uuid::Uuid;

use crate::domain::brands;
use crate::domain::post::{validate_media, ContentError, MediaType, Platform, Post, PostType};
use crate::infra::store::PostStore;

/// Everything the form collaborator submits. Identity and creation time are
/// assigned here, never by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct PostDraft {
    pub platform: Platform,
    pub brand_name: String,
    pub account_name: String,
    #[serde(default)]
    pub currency: String,
    pub creator_name: String,
    #[serde(default)]
    pub posted_by: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub post_type: Option<PostType>,
    pub media_type: MediaType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub redirect_link: Option<String>,
    pub date: Date,
}

impl PostDraft {
    pub fn validate_content(&self) -> Result<(), ContentError> {
        validate_media(
            self.media_type,
            &self.content,
            self.screenshot.as_deref(),
            self.redirect_link.as_deref(),
        )
    }
}

/// One calendar cell: the posts scheduled on a day after filters.
#[derive(Debug, Clone, Serialize)]
pub struct DayMetrics {
    pub date: Date,
    pub count: usize,
    pub posts: Vec<Post>,
}

#[derive(Clone)]
pub struct PostService {
    store: PostStore,
}

impl PostService {
    pub fn new(store: PostStore) -> Self {
        Self { store }
    }

    /// Creates a post from a validated draft. The currency soft constraint is
    /// applied here: an empty currency defaults to the first option of the
    /// chosen brand; a mismatch is kept as given.
    pub async fn create(&self, draft: PostDraft) -> Result<Post> {
        draft.validate_content()?;

        let mut post = Post {
            id: Uuid::new_v4(),
            platform: draft.platform,
            brand_name: draft.brand_name,
            account_name: draft.account_name,
            currency: draft.currency,
            creator_name: draft.creator_name,
            posted_by: draft.posted_by,
            remarks: draft.remarks,
            category: draft.category,
            post_type: draft.post_type,
            media_type: draft.media_type,
            content: String::new(),
            screenshot: None,
            redirect_link: None,
            date: draft.date,
            created_at: OffsetDateTime::now_utc(),
        };

        if post.currency.is_empty() {
            if let Some(currency) = brands::default_currency_for(&post.brand_name) {
                post.currency = currency.to_string();
            }
        }

        // The unused content shape stays empty so the invariant holds.
        match post.media_type {
            MediaType::Embed => post.content = draft.content,
            MediaType::Screenshot => {
                post.screenshot = draft.screenshot;
                post.redirect_link = draft.redirect_link;
            }
        }

        self.store.insert(post.clone()).await?;
        Ok(post)
    }

    /// Updates a post in place, preserving its id and creation time. Returns
    /// `None` when the post does not exist.
    pub async fn update(&self, id: Uuid, draft: PostDraft) -> Result<Option<Post>> {
        draft.validate_content()?;

        let Some(existing) = self.store.get(id).await else {
            return Ok(None);
        };

        let mut post = Post {
            id: existing.id,
            platform: draft.platform,
            brand_name: draft.brand_name,
            account_name: draft.account_name,
            currency: draft.currency,
            creator_name: draft.creator_name,
            posted_by: draft.posted_by,
            remarks: draft.remarks,
            category: draft.category,
            post_type: draft.post_type,
            media_type: draft.media_type,
            content: String::new(),
            screenshot: None,
            redirect_link: None,
            date: draft.date,
            created_at: existing.created_at,
        };

        match post.media_type {
            MediaType::Embed => post.content = draft.content,
            MediaType::Screenshot => {
                post.screenshot = draft.screenshot;
                post.redirect_link = draft.redirect_link;
            }
        }

        if self.store.replace(post.clone()).await? {
            Ok(Some(post))
        } else {
            Ok(None)
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.store.remove(id).await
    }

    pub async fn get(&self, id: Uuid) -> Option<Post> {
        self.store.get(id).await
    }

    /// All submissions, newest creation first.
    pub async fn list_recent(&self) -> Vec<Post> {
        let mut posts = self.store.all().await;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    /// One `DayMetrics` per day of the month, in order.
    pub async fn month_days(
        &self,
        year: i32,
        month: u8,
        brand: Option<&str>,
        platform: Option<Platform>,
    ) -> Result<Vec<DayMetrics>> {
        let month = Month::try_from(month)?;
        let days_in_month = time::util::days_in_year_month(year, month);

        let posts = self.store.all().await;
        let mut days = Vec::with_capacity(days_in_month as usize);
        for day in 1..=days_in_month {
            let date = Date::from_calendar_date(year, month, day)?;
            let day_posts: Vec<Post> = posts
                .iter()
                .filter(|p| {
                    p.date == date
                        && brand.map_or(true, |b| p.brand_name == b)
                        && platform.map_or(true, |pl| p.platform == pl)
                })
                .cloned()
                .collect();
            days.push(DayMetrics {
                date,
                count: day_posts.len(),
                posts: day_posts,
            });
        }
        Ok(days)
    }
}
