// src/layout.rs
// =============================================================================
// This module maps the remote repository onto the local disk.
//
// What it does:
// - Splits the configured root URL into the CVSweb CGI base and the
//   repository path that follows it
// - Derives a single flat directory name for the local mirror root
// - Replaces characters that are illegal in file names
//
// Example:
//   https://host/cgi-bin/cvsweb.cgi/projects/ogl-sample/
//   cgi_base        = https://host/cgi-bin/cvsweb.cgi
//   repository_path = projects/ogl-sample/
//   local_root      = projects-ogl-sample
//
// Rust concepts:
// - thiserror: Derive macro for our own error enum
// - Iterators: map() over chars to build the sanitized name
// =============================================================================

use thiserror::Error;

// Every CVSweb URL contains the CGI script name; the repository path follows it
const CGI_MARKER: &str = "cvsweb.cgi";

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid root URL '{0}': expected .../cvsweb.cgi/<repository path>")]
    InvalidRoot(String),
}

// The configured root URL, split into the pieces the crawler needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLocation {
    /// Everything up to and including `cvsweb.cgi`, no trailing slash
    pub cgi_base: String,
    /// Repository path below the CGI script, always ends with '/'
    pub repository_path: String,
    /// Flat directory name the mirror is written under
    pub local_root: String,
}

impl RootLocation {
    // Splits a root URL at the CGI marker
    //
    // Works with or without a trailing slash on the repository path.
    pub fn parse(root_url: &str) -> Result<Self, LayoutError> {
        let (head, tail) = root_url
            .split_once(CGI_MARKER)
            .ok_or_else(|| LayoutError::InvalidRoot(root_url.to_string()))?;

        let remote_path = tail.trim_start_matches('/');
        if remote_path.is_empty() {
            return Err(LayoutError::InvalidRoot(root_url.to_string()));
        }

        let local_root = to_local_root(remote_path);
        let repository_path = if remote_path.ends_with('/') {
            remote_path.to_string()
        } else {
            format!("{}/", remote_path)
        };

        Ok(Self {
            cgi_base: format!("{}{}", head, CGI_MARKER),
            repository_path,
            local_root,
        })
    }

    // URL of the listing page for the repository root
    pub fn listing_url(&self) -> String {
        format!("{}/{}", self.cgi_base.trim_end_matches('/'), self.repository_path)
    }
}

// Turns a repository path into a single directory name
//
// "projects/ogl-sample/" -> "projects-ogl-sample"
pub fn to_local_root(repository_path: &str) -> String {
    repository_path.replace('/', "-").trim_end_matches('-').to_string()
}

// Replaces characters that can't appear in a file name with '_'
//
// Covers < > : " / \ | ? * and the control characters 0x00-0x1F.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if (c as u32) < 0x20 => '_',
            c => c,
        })
        .collect()
}
