pub mod crm_store;
pub mod migrations;
