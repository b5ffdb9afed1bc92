mod client;

pub use client::{HttpBackend, DEFAULT_BASE_URL};
