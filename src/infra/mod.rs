pub mod iframely;
pub mod store;
