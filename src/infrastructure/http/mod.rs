pub mod retry;
pub mod server;
pub mod stats_client;
