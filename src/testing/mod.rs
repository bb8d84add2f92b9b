//! Unified testing utilities for authrelay
//!
//! Consolidates test helpers, fixtures and mock implementations into a
//! single location shared by unit and integration tests.
//!
//! ## Organization
//!
//! - [`constants`] - Common test values
//! - [`fixtures`] - Pre-built test data (settings, identities, sessions)
//! - [`mock`] - Mock identity provider with scripted outcomes

pub mod constants;
pub mod fixtures;
pub mod mock;
