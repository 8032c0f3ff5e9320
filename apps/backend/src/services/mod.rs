//! Backend services

pub mod seed;
