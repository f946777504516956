pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod router;
pub mod storage;
