pub mod export;
pub mod scoring;
