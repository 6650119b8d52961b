// Módulos públicos de la librería quickslot
pub mod algorithm;
pub mod api_json;
pub mod config;
pub mod export;
pub mod logging;
pub mod models;
pub mod server;
pub mod store;

pub use config::AppConfig;
pub use server::run_server;
