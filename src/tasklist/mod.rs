//! Ordered task list maintenance.
//!
//! This module implements the two cooperating components of the task list
//! core: the identity allocator, which issues globally unique and
//! monotonically increasing task identifiers, and the ordered list manager,
//! which owns each owner's dense sequence-position space across the create,
//! edit, soft-delete, and reorder operations. Same-owner mutations are
//! serialised by the adapters; different owners never contend. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
