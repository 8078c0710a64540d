pub mod deal_status;
pub mod outcome;
pub mod role;
pub mod windows;
