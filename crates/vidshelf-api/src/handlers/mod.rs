pub mod interactions;
pub mod sitemap;
pub mod upload;
pub mod videos;
