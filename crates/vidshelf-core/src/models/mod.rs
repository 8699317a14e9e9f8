pub mod media_record;

pub use media_record::{
    CatalogEntry, CatalogPage, CounterField, MediaRecord, MediaRecordRow, NewMediaRecord,
};
