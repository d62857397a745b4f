pub(crate) mod bucket_chain;
pub(crate) mod links;
pub(crate) mod slot_arena;

pub use bucket_chain::DEFAULT_BUCKET_PREALLOC;
