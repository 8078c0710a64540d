pub mod assignment;
pub mod deal;
pub mod lead;
pub mod snapshot;
pub mod user;
