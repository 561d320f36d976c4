// src/fetch/mod.rs
// =============================================================================
// This module talks to the CVSweb site.
//
// Submodules:
// - http: The HTTP transport (timeouts, status checks, polite delay)
// - markup: Finds the file body inside a markup view page
// - strategy: Downloads a file revision, markup view first, checkout second
// - wayback: Rewrites archive replay URLs to their raw-content variant
// =============================================================================

mod http;
mod markup;
mod strategy;
mod wayback;

pub use http::Transport;
pub use strategy::FileFetcher;
