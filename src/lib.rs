pub mod capture;
pub mod catalog;
pub mod config;
