//! Core types and trait definitions for the meal planner.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::PlannerStore`]; the web layer consumes
//! it together with the pure transforms in [`shopping`] and [`grid`].

pub mod error;
pub mod form;
pub mod grid;
pub mod model;
pub mod shopping;
pub mod store;

pub use error::{Error, Result};
