#![forbid(unsafe_code)]
//! Idshift: safe range remapping of file ownership.
//!
//! Safety model highlights:
//! - Every run validates the id mapping (overflow, overlap) before touching the tree.
//! - A preflight traversal classifies every object and mutates nothing; the commit
//!   traversal only starts after a zero-error preflight and stops on the first failure.
//! - The walk is physical (symlinks are never followed) and confined to the given root.
//! - This crate forbids `unsafe` and uses `rustix` for syscalls.

pub mod adapters;
pub mod api;
pub mod classify;
pub mod constants;
pub mod fixer;
pub mod logging;
pub mod types;
pub mod walk;

pub use api::*;
