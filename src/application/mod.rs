// SPDX-License-Identifier: MPL-2.0
//! Application layer - Collaborator contracts.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The video player drives collaborators only through these ports

pub mod port;
