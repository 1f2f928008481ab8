pub mod engine;
pub mod repository;
