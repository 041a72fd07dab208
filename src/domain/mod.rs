pub mod brands;
pub mod post;
