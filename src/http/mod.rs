//! HTTP layer for the registry proxy.
//!
//! This module provides path dispatch, the request router that talks to the
//! registry API and the document store, and the axum server surface in front
//! of it.

pub mod handler;
pub mod proxy;
pub mod route;
