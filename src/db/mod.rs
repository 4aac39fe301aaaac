// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (local JSON snapshot).

pub mod snapshot;

pub use snapshot::SnapshotStore;
