//! NuGet package resolution and version selection
//!
//! This module provides the core functionality for querying package indexes,
//! ordering and curating versions, and invoking the dotnet CLI.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Index    │────▶│    Dedup    │────▶│  Curation   │
//! │  (search)   │     │ (first wins)│     │ (shortlist) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │ Registries  │                         │   Semver    │
//! │(http, cli)  │                         │(precedence) │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`curation`]: Major-version bucketing and shortlist selection
//! - [`dedup`]: Order-preserving deduplication
//! - [`dotnet`]: dotnet CLI subprocess runner
//! - [`error`]: Error types for index and CLI operations
//! - [`index`]: Package index trait
//! - [`registries`]: Concrete index implementations (nuget.org, dotnet CLI, type search)
//! - [`semver`]: Version precedence
//! - [`types`]: Common types like `PackageCandidate`

pub mod curation;
pub mod dedup;
pub mod dotnet;
pub mod error;
pub mod index;
pub mod registries;
pub mod semver;
pub mod types;
