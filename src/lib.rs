//! tmplfind library
//!
//! Exposes the cache, the template client and the CLI front end for use in
//! integration tests.

pub mod ads;
pub mod app;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod data;
