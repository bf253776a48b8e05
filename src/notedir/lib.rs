//! # Notedir Architecture
//!
//! Notedir is a **note persistence engine**: an in-memory list of notes kept
//! consistent with a directory of plain-text files while the user types.
//! The binary in this crate is one client; the engine makes no assumption
//! about the UI in front of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Presentation (main.rs + cli/)                              │
//! │  - Issues commands, renders snapshots                       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ load/create/edit/finalize/delete/view
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  NoteManager (manager.rs)                                   │
//! │  - Single writer of the collection                          │
//! │  - Filename policy (naming.rs), autosave (debounce.rs)      │
//! │  - Display projection (query.rs)                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - NoteStorage async trait                                  │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## On-disk format
//!
//! One flat directory. Every file with the note suffix (default `.txt`) is one
//! note; its filename is the note's identifier and its body is the content,
//! verbatim UTF-8. There is nothing else.
//!
//! ## Module Overview
//!
//! - [`manager`]: The engine facade: commands and snapshots
//! - [`store`]: Storage abstraction and implementations
//! - [`naming`]: Provisional and content-derived filenames
//! - [`debounce`]: Per-note autosave timers
//! - [`query`]: Sorted, filtered views
//! - [`model`]: `Note`, `Collection`, events
//! - [`clock`]: Injectable time source
//! - [`config`]: Configuration and directory resolution
//! - [`logging`]: `tracing` subscriber setup for binaries
//! - [`error`]: Error types

pub mod clock;
pub mod config;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod manager;
pub mod model;
pub mod naming;
pub mod query;
pub mod store;
