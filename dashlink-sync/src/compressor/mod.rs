//! Compressor clients used to turn layouts into locator tokens.

pub mod http;
pub mod memory;
pub mod service;

pub use http::HttpCompressor;
pub use memory::MemoryCompressor;
pub use service::{CompressorConfig, StateCompressor};
