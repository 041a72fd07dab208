pub mod accounts;
pub mod embed;
pub mod export;
pub mod posts;
pub mod reactivate;
pub mod reports;
