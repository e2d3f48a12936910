//! Core modules shared by both migration pipelines.
//!
//! Configuration, catalog access, the content-addressed store, identifier
//! allocation and the error type live here.

pub mod catalog;
pub mod config;
pub mod content_store;
pub mod error;
pub mod ident;
pub mod report;
