//! Multi-modal transit router.
//!
//! Finds the best route across rail, bus and feeder minivan networks,
//! changing between modes by short walks between nearby stops, under a
//! choice of objective: fastest, cheapest, fewest changes, or a balance.

pub mod domain;
pub mod dto;
pub mod fare;
pub mod geo;
pub mod network;
pub mod planner;
pub mod walkable;

#[cfg(test)]
mod fixtures;
