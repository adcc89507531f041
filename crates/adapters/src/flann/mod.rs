// Copyright 2025 nnbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Adapters for the FLANN command-line executables.
//!
//! - **allknn**: all-k-nearest-neighbors with kd-trees, reporting
//!   `TreeBuilding`, `ComputingNeighbors` and `Runtime`

pub mod allknn;
pub mod config;
pub mod timer;

pub use allknn::{AllKnn, AllKnnTarget, CommandLine};
pub use config::{AllKnnConfig, ConfigError, Dataset, ExecutablePath, FLANN_PATH_ENV};
pub use timer::parse_timer;
