//! Active-profile view derived from the post history. Groups by
//! (platform, account) pair; `last_active` deliberately tracks creation time
//! rather than the scheduling date, so it reads as "when did someone last
//! touch this account", with the creator and brand taken from that post.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::post::{Platform, Post};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountActivity {
    pub platform: Platform,
    pub account_name: String,
    pub brand_name: String,
    pub creator_name: String,
    pub post_count: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_active: OffsetDateTime,
}

pub fn active_accounts(posts: &[Post]) -> Vec<AccountActivity> {
    let mut accounts: Vec<AccountActivity> = Vec::new();

    for post in posts {
        match accounts
            .iter_mut()
            .find(|acc| acc.platform == post.platform && acc.account_name == post.account_name)
        {
            Some(acc) => {
                if post.created_at > acc.last_active {
                    acc.last_active = post.created_at;
                    acc.creator_name = post.creator_name.clone();
                    acc.brand_name = post.brand_name.clone();
                }
                acc.post_count += 1;
            }
            None => accounts.push(AccountActivity {
                platform: post.platform,
                account_name: post.account_name.clone(),
                brand_name: post.brand_name.clone(),
                creator_name: post.creator_name.clone(),
                post_count: 1,
                last_active: post.created_at,
            }),
        }
    }

    accounts.sort_by(|a, b| b.last_active.cmp(&a.last_active));
    accounts
}
