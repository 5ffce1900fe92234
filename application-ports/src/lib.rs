pub mod role_mapping;
pub mod role_sync;
