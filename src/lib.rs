//! # Marketplace Seeder Library
//!
//! Populates a marketplace schema (cities, accounts, brands, body types,
//! vehicle models, products and bids) from two spreadsheets plus generated
//! accounts and bidding activity.

pub mod config;
pub mod db;
pub mod error;
pub mod faker;
pub mod models;
pub mod pricing;
pub mod repositories;
pub mod seeds;
pub mod sequencer;
pub mod sheets;
pub mod telemetry;
pub use migration;
