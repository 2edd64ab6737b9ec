// Private module - not exposed in public API
mod builder;
mod client;

pub(crate) use builder::QdrantContextStoreBuilder;
