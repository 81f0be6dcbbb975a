// Adapters layer: concrete implementations for external systems (http, sqlite, export files).

pub mod export;
pub mod http;
pub mod sqlite;
