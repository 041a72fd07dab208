//! Derived analytics over the post collection. Pure, stateless recomputation
//! from the canonical store on every request; nothing here mutates posts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::domain::post::{Platform, Post};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7days")]
    Days7,
    #[serde(rename = "30days")]
    Days30,
    #[serde(rename = "90days")]
    Days90,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeRange::Days7 => Some(7),
            TimeRange::Days30 => Some(30),
            TimeRange::Days90 => Some(90),
            TimeRange::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Days7 => "7days",
            TimeRange::Days30 => "30days",
            TimeRange::Days90 => "90days",
            TimeRange::All => "all",
        }
    }
}

/// Keeps posts whose scheduling date falls on or after `today - N` days.
/// The boundary day itself is included; creation time plays no part here.
pub fn filter_by_range(posts: &[Post], range: TimeRange, today: Date) -> Vec<Post> {
    match range.days() {
        None => posts.to_vec(),
        Some(days) => {
            let cutoff = today - Duration::days(days);
            posts.iter().filter(|p| p.date >= cutoff).cloned().collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformCount {
    pub platform: Platform,
    pub count: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub date: Date,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub total: usize,
    pub top_brand: Option<GroupCount>,
    pub top_platform: Option<GroupCount>,
    pub top_creator: Option<GroupCount>,
    pub brands: Vec<GroupCount>,
    pub platforms: Vec<PlatformCount>,
    pub creators: Vec<GroupCount>,
    pub timeline: Vec<DayCount>,
}

impl Analytics {
    pub fn compute(posts: &[Post]) -> Self {
        let mut by_brand: Vec<(String, u64)> = Vec::new();
        let mut by_platform: Vec<(Platform, u64)> = Vec::new();
        let mut by_creator: Vec<(String, u64)> = Vec::new();
        let mut by_date: BTreeMap<Date, u64> = BTreeMap::new();

        for post in posts {
            bump(&mut by_brand, &post.brand_name);
            bump_platform(&mut by_platform, post.platform);
            bump(&mut by_creator, &post.creator_name);
            *by_date.entry(post.date).or_insert(0) += 1;
        }

        // Top-1 by count; a tie goes to whichever key was encountered first.
        let top_brand = top_of(&by_brand);
        let top_creator = top_of(&by_creator);
        let mut top_platform: Option<GroupCount> = None;
        for (platform, count) in &by_platform {
            if top_platform.as_ref().map_or(true, |top| *count > top.count) {
                top_platform = Some(GroupCount {
                    name: platform.as_str().to_string(),
                    count: *count,
                });
            }
        }

        let mut brands: Vec<GroupCount> = by_brand
            .into_iter()
            .map(|(name, count)| GroupCount { name, count })
            .collect();
        brands.sort_by(|a, b| b.count.cmp(&a.count));

        let mut platforms: Vec<PlatformCount> = by_platform
            .into_iter()
            .map(|(platform, count)| PlatformCount {
                platform,
                count,
                color: platform.color(),
            })
            .collect();
        platforms.sort_by(|a, b| b.count.cmp(&a.count));

        let mut creators: Vec<GroupCount> = by_creator
            .into_iter()
            .map(|(name, count)| GroupCount { name, count })
            .collect();
        creators.sort_by(|a, b| b.count.cmp(&a.count));

        let timeline = by_date
            .into_iter()
            .map(|(date, count)| DayCount { date, count })
            .collect();

        Analytics {
            total: posts.len(),
            top_brand,
            top_platform,
            top_creator,
            brands,
            platforms,
            creators,
            timeline,
        }
    }
}

// Linear accumulation keeps first-encounter order for the tie break; the
// collection is small enough that a map buys nothing.
fn bump(groups: &mut Vec<(String, u64)>, key: &str) {
    match groups.iter_mut().find(|(name, _)| name == key) {
        Some((_, count)) => *count += 1,
        None => groups.push((key.to_string(), 1)),
    }
}

fn bump_platform(groups: &mut Vec<(Platform, u64)>, key: Platform) {
    match groups.iter_mut().find(|(platform, _)| *platform == key) {
        Some((_, count)) => *count += 1,
        None => groups.push((key, 1)),
    }
}

fn top_of(groups: &[(String, u64)]) -> Option<GroupCount> {
    let mut top: Option<&(String, u64)> = None;
    for group in groups {
        if top.map_or(true, |(_, best)| group.1 > *best) {
            top = Some(group);
        }
    }
    top.map(|(name, count)| GroupCount {
        name: name.clone(),
        count: *count,
    })
}
