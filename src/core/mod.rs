// src/core/mod.rs

pub mod engine;
pub mod geometry;
pub mod index;
pub mod layout;
pub mod phonetic;
pub mod scoring;
pub mod types;
pub mod vocabulary;
