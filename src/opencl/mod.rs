//! Модуль для работы с OpenCL
//!
//! Содержит низкоуровневые привязки; безопасная обертка лежит в
//! `backend::opencl`.

pub mod bindings;
pub mod callbacks;
pub mod types;
pub mod utils;

pub use utils::status_from_cl;
