// Adapters layer: concrete implementations for external systems (object storage, path cache).

pub mod local;
pub mod memory;
pub mod s3;
