// Copyright 2026 Beacon Contributors
// SPDX-License-Identifier: Apache-2.0

//! Beacon library — growth-service recommendation engine.
//!
//! This library crate exposes the core modules for integration testing.

#![allow(clippy::new_without_default)]

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod registry;
pub mod rest;
pub mod scoring;
pub mod usage;
