//! Business logic services

pub mod quota;
