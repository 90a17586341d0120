// src/lib.rs

//! mutube: board threads in, dated playlists out

pub mod board;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod platform;
pub mod services;
pub mod utils;

#[cfg(test)]
mod testing;
