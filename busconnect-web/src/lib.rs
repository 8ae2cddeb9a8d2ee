//! Bus journey finder.
//!
//! A server-rendered frontend for the BusConnect REST backend: search
//! journeys between two stops, narrow them with filters, sort and page
//! through the results, and view a single journey in detail.

pub mod api;
pub mod cache;
pub mod config;
pub mod pagination;
pub mod query;
pub mod stops;
pub mod web;
