// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP API surface
//!
//! Thin axum layer over the aggregation engine, consumed by the UI and
//! collaborator services.

pub mod digest;
pub mod providers;
pub mod search;
pub mod server;

pub use server::{build_router, start_server, AppState};
