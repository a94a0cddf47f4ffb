//! Menu ingestion: wire records, normalization, HTTP source.

pub mod normalize;
pub mod source;
pub mod wire;

pub use normalize::normalize;
