//! Bulk WordPress import — the background job pipeline.
//!
//! A job is created from an uploaded spreadsheet and a target site, processed
//! row by row on a background task, and observed through polling until it
//! reaches a terminal state. See `runner` for the per-post pipeline.

pub mod handlers;
pub mod models;
pub mod report;
pub mod runner;
pub mod spreadsheet;
pub mod store;
