// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test support shared by the introspect crates.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod logging;
pub mod observer;

pub use logging::init_tracing;
pub use observer::{Counter, CountingObserver, Recorded, Recording, RecordingObserver};
