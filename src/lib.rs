// src/lib.rs

pub mod c_api;
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod source;

pub use crate::config::EngineConfig;
pub use crate::core::engine::GestureEngine;
pub use crate::core::types::{CandidateResult, Gesture, Point, Size};
pub use crate::error::{GestureError, Result};
