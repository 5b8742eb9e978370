// src/lib.rs

//! Website technology fingerprinting: fetch a domain's homepage, classify it
//! against a static signature catalog, resolve the registered organization
//! and persist an idempotent website row plus append-only detection history.

pub mod config;
pub mod core;
pub mod db;
pub mod logging;
