pub mod catalog_reader;
pub mod ingest;
pub mod interactions;

pub use catalog_reader::{render_sitemap, CatalogReader, PageLimits, PageRequest, VideoPage};
pub use ingest::{IngestService, IngestSettings, PendingUpload, VideoSource};
pub use interactions::InteractionService;
