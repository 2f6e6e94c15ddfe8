//! Colony-level scheduling and the tick cycle.
//!
//! This crate owns the once-per-tick sequence that drives the colony:
//! reconcile persisted memory, schedule production facilities, then run
//! every agent's role state machine.
//!
//! # Modules
//!
//! - [`body`] -- Body loadouts per role and development tier, and their cost.
//! - [`config`] -- Configuration loading from `colony-config.yaml` into
//!   strongly-typed structs.
//! - [`spawn`] -- [`SpawnCoordinator`]: which role each idle facility builds.
//! - [`tick`] -- [`run_tick`] and the file-driven [`run_host_tick`].
//!
//! [`SpawnCoordinator`]: spawn::SpawnCoordinator
//! [`run_tick`]: tick::run_tick
//! [`run_host_tick`]: tick::run_host_tick

pub mod body;
pub mod config;
pub mod spawn;
pub mod tick;
