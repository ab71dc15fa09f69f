//! Infrastructure Layer

pub mod memory;
pub mod postgres;
pub mod smtp;
