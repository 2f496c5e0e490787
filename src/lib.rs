//! folio: portfolio terminal, coding-stats aggregator and assistant.

pub mod analytics;
pub mod assistant;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod stats;
pub mod terminal;
pub mod web;
