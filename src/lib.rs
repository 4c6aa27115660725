//! Taskrank: per-user ordered task list core.
//!
//! This crate maintains one privately ordered task list per user: creating,
//! editing, soft-deleting, and reordering tasks while keeping each owner's
//! sequence positions dense and free of duplicates under concurrent
//! mutation.
//!
//! # Architecture
//!
//! Taskrank follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`tasklist`]: Task identity allocation and ordered-list maintenance

pub mod tasklist;
