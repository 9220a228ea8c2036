pub mod common;
pub mod config;
pub mod fdi;
pub mod routes;
