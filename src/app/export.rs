//! CSV export of a filtered post set. Free-form fields are double-quoted so
//! embedded commas survive a standard CSV parse; screenshot posts export
//! their redirect link, embed posts a literal placeholder.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

use crate::app::reports::TimeRange;
use crate::domain::post::{MediaType, Post};

const HEADERS: &str = "ID,Date,Brand,Platform,Creator,Currency,URL/Content";

const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub fn export_csv(posts: &[Post]) -> String {
    let mut lines = Vec::with_capacity(posts.len() + 1);
    lines.push(HEADERS.to_string());

    for post in posts {
        let link = match post.media_type {
            MediaType::Screenshot => post.redirect_link.as_deref().unwrap_or_default(),
            MediaType::Embed => "Embed Content",
        };
        lines.push(format!(
            "{},{},{},{},{},{},{}",
            post.id,
            format_date(post.date),
            quote(&post.brand_name),
            post.platform,
            quote(&post.creator_name),
            post.currency,
            quote(link),
        ));
    }

    lines.join("\n")
}

pub fn export_filename(range: TimeRange, today: Date) -> String {
    format!(
        "social_ops_report_{}_{}.csv",
        range.as_str(),
        format_date(today)
    )
}

fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
