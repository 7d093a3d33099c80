pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod forms;
pub mod logging;
pub mod seed;
pub mod storage;

// Use cases and their ports
pub mod app;

// Domain data shapes shared across layers
pub mod domain;

// HTTP surface
pub mod web;
