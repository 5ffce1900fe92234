pub mod unavailable;
