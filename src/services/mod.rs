pub mod backend_client;
pub mod config_service;
pub mod history_service;
pub mod search_service;
