// src/crawl/queue.rs
// =============================================================================
// This module implements the repository walk with a breadth-first approach.
//
// How it works:
// 1. Start with the root directory's listing URL in a queue
// 2. Fetch the listing page and make sure the local directory exists
// 3. Parse the page into entries
// 4. Subdirectories go to the back of the queue
// 5. Files are downloaded right away (unless already on disk)
// 6. Repeat until the queue is empty
//
// Failure policy:
// - A listing that can't be fetched is recorded and skipped
// - A file that can't be downloaded is recorded and left absent, so the next
//   run will try it again
// - Only a bad root URL or an uncreatable output directory stops the run
//
// Termination relies on the remote tree being finite: every child listing URL
// extends its parent's, and the visited set turns repeats into skips.
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - Url: For resolving relative links against the current page
// =============================================================================

use super::stats::{ErrorKind, RunStatistics};
use crate::config::MirrorConfig;
use crate::fetch::{FileFetcher, Transport};
use crate::layout::RootLocation;
use crate::listing::{parse_listing, Entry, EntryKind};
use anyhow::{Context, Result};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use url::Url;

// A directory waiting in the crawl queue
#[derive(Debug, Clone)]
struct DirectoryNode {
    listing_url: String,
    repository_path: String, // Always ends with '/'
    local_path: PathBuf,     // Relative to the mirror root
}

// Mirrors one CVSweb repository
pub struct Mirror {
    config: MirrorConfig,
    transport: Transport,
}

impl Mirror {
    pub fn new(config: MirrorConfig) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self { config, transport })
    }

    // Walks the repository below `root_url` and downloads every file
    //
    // Returns the run's counters and errors. Per-item failures end up in the
    // statistics; an Err means the run could not start at all.
    pub async fn run(&self, root_url: &str) -> Result<RunStatistics> {
        let root = RootLocation::parse(root_url)?;
        let local_root = self.config.output_dir.join(&root.local_root);

        info!("CVSweb CGI base URL: {}", root.cgi_base);
        info!("Remote path: {}", root.repository_path);
        info!("Local output dir: {}", local_root.display());

        if !dir_exists(&local_root).await {
            tokio::fs::create_dir_all(&local_root)
                .await
                .with_context(|| {
                    format!("Could not create output directory {}", local_root.display())
                })?;
            info!("Created base output directory: {}", local_root.display());
        }

        let fetcher = FileFetcher::new(
            self.transport.clone(),
            root.cgi_base.clone(),
            self.config.file_timeout,
        );

        let mut queue = VecDeque::new();
        queue.push_back(DirectoryNode {
            listing_url: root.listing_url(),
            repository_path: root.repository_path.clone(),
            local_path: PathBuf::new(),
        });

        let mut visited = HashSet::new();
        let mut stats = RunStatistics::default();

        while let Some(node) = queue.pop_front() {
            // insert() returns false if the URL was already there
            if !visited.insert(node.listing_url.clone()) {
                info!("Already visited URL: {}", node.listing_url);
                continue;
            }

            self.visit(&node, &local_root, &fetcher, &mut queue, &mut stats)
                .await;
        }

        Ok(stats)
    }

    // Processes one directory: fetch, create, parse, dispatch
    async fn visit(
        &self,
        node: &DirectoryNode,
        local_root: &Path,
        fetcher: &FileFetcher,
        queue: &mut VecDeque<DirectoryNode>,
        stats: &mut RunStatistics,
    ) {
        info!("Visiting URL: {}", node.listing_url);
        info!("Full repo path: {}", node.repository_path);
        info!("Local save path: {}", node.local_path.display());

        let html = match self
            .transport
            .get_text(&node.listing_url, self.config.listing_timeout)
            .await
        {
            Ok(html) => html,
            Err(e) => {
                error!("Error fetching page {}: {}", node.listing_url, e);
                stats.record(ErrorKind::Listing, node.listing_url.as_str());
                return;
            }
        };

        let local_dir = local_root.join(&node.local_path);
        if dir_exists(&local_dir).await {
            stats.directories_skipped += 1;
        } else {
            match tokio::fs::create_dir_all(&local_dir).await {
                Ok(()) => {
                    info!("Created local dir: {}", local_dir.display());
                    stats.directories_saved += 1;
                }
                Err(e) => {
                    error!("Error creating dir {}: {}", local_dir.display(), e);
                    stats.record(ErrorKind::Directory, local_dir.display().to_string());
                    return;
                }
            }
        }

        let Some(listing) = parse_listing(&html) else {
            warn!("Could not find <menu> tag in {}", node.listing_url);
            return;
        };

        if listing.entries.is_empty() && listing.has_links {
            warn!(
                "No parseable file/directory entries found in <menu> at {}",
                node.listing_url
            );
        }

        for entry in listing.entries {
            info!(
                "Found node: name='{}', href='{}', kind={:?}",
                entry.display_name, entry.href_suffix, entry.kind
            );

            match &entry.kind {
                EntryKind::Directory => match child_directory(node, &entry) {
                    Some(child) => {
                        info!(
                            "Added to queue: url='{}', repo_path='{}', local_path='{}'",
                            child.listing_url,
                            child.repository_path,
                            child.local_path.display()
                        );
                        queue.push_back(child);
                    }
                    None => warn!(
                        "Could not resolve '{}' against {}",
                        entry.href_suffix, node.listing_url
                    ),
                },
                EntryKind::File { latest_revision } => {
                    self.save_file(
                        node,
                        &local_dir,
                        &entry,
                        latest_revision.as_deref(),
                        fetcher,
                        stats,
                    )
                    .await;
                }
            }
        }
    }

    // Downloads one file unless it is already on disk
    async fn save_file(
        &self,
        node: &DirectoryNode,
        local_dir: &Path,
        entry: &Entry,
        latest_revision: Option<&str>,
        fetcher: &FileFetcher,
        stats: &mut RunStatistics,
    ) {
        let destination = local_dir.join(&entry.display_name);
        if has_content(&destination).await {
            info!("Skipping existing file: {}", destination.display());
            stats.files_skipped += 1;
            return;
        }

        let Some(revision) = latest_revision else {
            error!(
                "Could not find latest revision for {} on directory page, skipping",
                entry.display_name
            );
            stats.record(ErrorKind::LatestRevision, entry.display_name.as_str());
            return;
        };
        info!("Latest revision: {}", revision);

        let repository_path = format!("{}{}", node.repository_path, entry.remote_name);
        let outcome = fetcher
            .fetch(repository_path.trim_matches('/'), revision)
            .await;

        let Some(content) = outcome.content else {
            error!(
                "Failed to download rev {} from: {}",
                revision, outcome.attempted_url
            );
            stats.record(ErrorKind::Download, outcome.attempted_url);
            return;
        };

        match write_whole_file(&destination, &content).await {
            Ok(()) => {
                info!("Saved {} (rev {})", destination.display(), revision);
                stats.files_saved += 1;
            }
            Err(e) => {
                error!("Error saving {}: {}", destination.display(), e);
                stats.record(ErrorKind::Save, outcome.attempted_url);
            }
        }
    }
}

// Builds the queue item for a subdirectory entry
//
// Returns None if the href can't be resolved against the current page, or
// resolves to something that isn't strictly below it.
fn child_directory(parent: &DirectoryNode, entry: &Entry) -> Option<DirectoryNode> {
    let base = Url::parse(&parent.listing_url).ok()?;
    let listing_url = base.join(&entry.href_suffix).ok()?;

    let below_parent = listing_url
        .as_str()
        .strip_prefix(parent.listing_url.as_str())
        .is_some_and(|rest| !rest.is_empty());
    if !below_parent {
        return None;
    }

    Some(DirectoryNode {
        listing_url: listing_url.to_string(),
        repository_path: format!("{}{}/", parent.repository_path, entry.remote_name),
        local_path: parent.local_path.join(&entry.display_name),
    })
}

async fn dir_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

// True for an existing regular file with at least one byte in it
async fn has_content(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file() && metadata.len() > 0)
        .unwrap_or(false)
}

// Writes to a hidden sibling first and renames it into place, so an
// interrupted write never leaves a truncated file under the real name
async fn write_whole_file(destination: &Path, content: &[u8]) -> std::io::Result<()> {
    let file_name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let partial = destination.with_file_name(format!(".{}.part", file_name));

    let result = match tokio::fs::write(&partial, content).await {
        Ok(()) => tokio::fs::rename(&partial, destination).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(&partial).await;
    }
    result
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why keep the visited set keyed by URL?
//    - The same directory can be linked twice on a page
//    - Both links get queued, but only the first one is fetched
//    - visited.insert() does "check and mark" in one step
//
// 2. What is let ... else?
//    - let Some(x) = value else { return; };
//    - Binds x if the pattern matches, otherwise runs the else block
//    - The else block must leave the function (return, continue, ...)
//
// 3. Why pass &mut stats around instead of returning it?
//    - One RunStatistics lives for the whole run
//    - Every helper adds to the same counters and error list
//    - Only one function touches it at a time, so no locks are needed
// -----------------------------------------------------------------------------
