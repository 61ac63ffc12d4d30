//! Gateway: the atelier HTTP API.
//!
//! Lifecycle:
//! 1. Load config, build [`state::AppState`] (store, vault, HTTP client)
//! 2. Assemble the router (auth, projects, settings, git, nas)
//! 3. Bind and serve
//!
//! Domain logic (desc.txt parsing, media scanning, provider calls) lives
//! in other crates; this one owns HTTP shapes, sessions and credential
//! sealing.

pub mod auth;
pub mod auth_middleware;
pub mod auth_routes;
pub mod git_routes;
pub mod nas_routes;
pub mod project_routes;
pub mod server;
pub mod settings_routes;
pub mod state;

pub use {
    server::{build_router, serve},
    state::AppState,
};
