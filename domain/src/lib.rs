pub mod ports;
pub mod role_diff;
pub mod role_mapping;
