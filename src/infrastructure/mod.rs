pub mod clock;
pub mod http;
pub mod sqlite;
pub mod storage;
