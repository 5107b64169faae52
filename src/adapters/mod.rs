// Adapters layer: concrete implementations for external systems (http, html, sqlite).

pub mod extractor;
pub mod http;
pub mod storage;
