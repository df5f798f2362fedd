pub mod config;
pub mod error;
pub mod models;
pub mod records;
pub mod routes;
pub mod slots;
pub mod storage;
