pub mod models;
pub mod styling;
pub mod views;
