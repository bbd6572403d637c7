pub mod app;
pub mod dump;
pub mod show;
pub mod tables;
