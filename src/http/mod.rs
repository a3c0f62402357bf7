//! HTTP transport layer for the dashboard
//!
//! Provides the JSON API routes over the discovery engine plus health metadata.

pub mod handlers;
