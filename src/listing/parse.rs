// src/listing/parse.rs
// =============================================================================
// This module turns a listing page's HTML into a list of entries.
//
// How it works:
// 1. Find the <menu> block (no menu = not a listing page)
// 2. For every <img alt="..."> inside it, look at the surrounding links
// 3. Keep the candidates that have the full icon + name (+ revision) shape
// 4. Drop navigation chrome like "Parent Directory" and the Attic
//
// Candidates that don't match the expected shape are skipped silently.
// Archived pages are often slightly mangled, so a partial match is normal.
//
// Rust concepts:
// - Option and the ? operator: Every structural step can "fail" by returning
//   None, and ? bails out of read_entry() on the first missing piece
// - ElementRef: A borrowed handle to an element inside the parsed document
// =============================================================================

use crate::layout::sanitize_name;
use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;

// Names that are navigation links, not repository content.
// "attic" is CVS's area for deleted files, which we don't mirror.
// "attic/" can't match once the trailing slash is trimmed; it stays so the
// list reads the same as the link labels CVSweb prints.
const IGNORED_NAMES: [&str; 5] = [
    "parent directory",
    "[don't hide]",
    "[back]",
    "attic",
    "attic/",
];

// Relative path components that would step outside the current directory
const DOT_NAMES: [&str; 2] = [".", ".."];

// What kind of child an entry is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    /// A file, with the latest revision shown on the listing (if any)
    File { latest_revision: Option<String> },
}

// One child found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Name used on disk (percent-decoded and sanitized)
    pub display_name: String,
    /// Percent-decoded name as the repository knows it
    pub remote_name: String,
    /// The href with its "./" prefix removed, e.g. "sub/" or "a.txt"
    pub href_suffix: String,
    pub kind: EntryKind,
}

// Everything found inside a page's <menu> block
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Entries in document order
    pub entries: Vec<Entry>,
    /// Whether the menu had any links or images at all
    pub has_links: bool,
}

// Parses a listing page
//
// Returns None when the page has no <menu> block.
pub fn parse_listing(html: &str) -> Option<Listing> {
    let document = Html::parse_document(html);

    // Our selectors are constants and known to be valid, so unwrap() is fine
    let menu_selector = Selector::parse("menu").unwrap();
    let icon_selector = Selector::parse("img[alt]").unwrap();
    let link_selector = Selector::parse("a, img").unwrap();

    let menu = document.select(&menu_selector).next()?;

    let entries = menu.select(&icon_selector).filter_map(read_entry).collect();
    let has_links = menu.select(&link_selector).next().is_some();

    Some(Listing { entries, has_links })
}

// Reads one icon and the links around it
fn read_entry(icon: ElementRef) -> Option<Entry> {
    let label = icon.value().attr("alt")?.trim().to_ascii_lowercase();

    // The icon is wrapped in its own link
    let icon_link = icon.parent().and_then(ElementRef::wrap)?;
    if icon_link.value().name() != "a" {
        return None;
    }

    // The name link normally follows the icon's link. Some pages put it
    // inside the same link, right after the image and a text node.
    let name_link = next_sibling_link(icon_link).or_else(|| {
        icon.next_siblings()
            .nth(1)
            .and_then(ElementRef::wrap)
            .filter(|element| element.value().name() == "a")
    })?;

    let href_suffix = name_link.value().attr("href")?.strip_prefix("./")?;
    let trimmed = href_suffix.strip_suffix('/').unwrap_or(href_suffix);
    let remote_name = percent_decode(trimmed).into_owned();
    let display_name = sanitize_name(&remote_name);

    if display_name.is_empty()
        || DOT_NAMES.contains(&remote_name.as_str())
        || IGNORED_NAMES.contains(&display_name.to_lowercase().as_str())
    {
        return None;
    }

    let kind = match label.as_str() {
        "[dir]" | "directory" => EntryKind::Directory,
        "[txt]" | "plain file" => EntryKind::File {
            latest_revision: latest_revision(name_link),
        },
        _ => return None,
    };

    Some(Entry {
        display_name,
        remote_name,
        href_suffix: href_suffix.to_string(),
        kind,
    })
}

// The revision is the bold text inside the link after the name link.
// A blank or missing revision stays None.
fn latest_revision(name_link: ElementRef) -> Option<String> {
    let bold_selector = Selector::parse("b").unwrap();

    let revision_link = next_sibling_link(name_link)?;
    let bold = revision_link.select(&bold_selector).next()?;
    let revision = bold.text().collect::<String>().trim().to_string();

    if revision.is_empty() {
        None
    } else {
        Some(revision)
    }
}

// First <a> element among the following siblings
fn next_sibling_link(element: ElementRef) -> Option<ElementRef> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "a")
}

// Invalid UTF-8 sequences are replaced rather than rejected
fn percent_decode(input: &str) -> Cow<'_, str> {
    match urlencoding::decode(input) {
        Ok(decoded) => decoded,
        Err(_) => {
            let bytes = urlencoding::decode_binary(input.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why filter_map(read_entry)?
//    - read_entry returns Option<Entry>
//    - filter_map keeps the Some values and drops the None values
//    - So "doesn't look like an entry" never becomes an error
//
// 2. What does next_siblings() return?
//    - Every node after this one under the same parent: elements, text, comments
//    - ElementRef::wrap turns a node into an element handle, or None for text
//
// 3. Why Cow<str> in percent_decode?
//    - Cow = "clone on write"
//    - If nothing needed decoding, we can hand back the borrowed input
//    - Only when something changed do we allocate a new String
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <h1>CVS log for projects/ogl-sample/</h1>
        <menu>
          <a href="../"><img src="/icons/back.gif" alt="[DIR]"></a> <a href="../">Parent Directory</a><br>
          <a href="./Attic/"><img src="/icons/dir.gif" alt="[DIR]"></a> <a href="./Attic/">Attic/</a><br>
          <a href="./main/"><img src="/icons/dir.gif" alt="[DIR]"></a> <a href="./main/">main/</a><br>
          <a href="./GNUmakefile"><img src="/icons/text.gif" alt="[TXT]"></a> <a href="./GNUmakefile">GNUmakefile</a>
            <a href="./GNUmakefile?rev=1.3"><b>1.3</b></a> / (<a href="./GNUmakefile?rev=1.3&amp;content-type=text/x-cvsweb-markup">view</a>)<br>
          <a href="./README%20FIRST"><img src="/icons/text.gif" alt="[TXT]"></a> <a href="./README%20FIRST">README FIRST</a>
            <a href="./README%20FIRST?rev=1.1.1.1"><b>1.1.1.1</b></a><br>
        </menu>
        </body></html>
    "#;

    #[test]
    fn test_parse_finds_directories_and_files() {
        let listing = parse_listing(LISTING).unwrap();
        let names: Vec<&str> = listing.entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["main", "GNUmakefile", "README FIRST"]);
        assert!(listing.has_links);
    }

    #[test]
    fn test_directory_entry() {
        let listing = parse_listing(LISTING).unwrap();
        let dir = &listing.entries[0];
        assert_eq!(dir.kind, EntryKind::Directory);
        assert_eq!(dir.href_suffix, "main/");
        assert_eq!(dir.remote_name, "main");
    }

    #[test]
    fn test_file_entry_carries_revision() {
        let listing = parse_listing(LISTING).unwrap();
        assert_eq!(
            listing.entries[1].kind,
            EntryKind::File { latest_revision: Some("1.3".to_string()) }
        );
        assert_eq!(
            listing.entries[2].kind,
            EntryKind::File { latest_revision: Some("1.1.1.1".to_string()) }
        );
    }

    #[test]
    fn test_names_are_percent_decoded() {
        let listing = parse_listing(LISTING).unwrap();
        assert_eq!(listing.entries[2].href_suffix, "README%20FIRST");
        assert_eq!(listing.entries[2].remote_name, "README FIRST");
    }

    #[test]
    fn test_missing_revision_is_none() {
        let html = r#"<menu>
            <a href="./lonely.c"><img alt="[TXT]"></a> <a href="./lonely.c">lonely.c</a><br>
        </menu>"#;
        let listing = parse_listing(html).unwrap();
        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.entries[0].kind, EntryKind::File { latest_revision: None });
    }

    #[test]
    fn test_blank_revision_is_none() {
        let html = r#"<menu>
            <a href="./x.h"><img alt="[TXT]"></a> <a href="./x.h">x.h</a> <a href="./x.h?rev="><b> </b></a>
        </menu>"#;
        let listing = parse_listing(html).unwrap();
        assert_eq!(listing.entries[0].kind, EntryKind::File { latest_revision: None });
    }

    #[test]
    fn test_accessible_labels() {
        let html = r#"<menu>
            <a href="./docs/"><img alt="directory"></a> <a href="./docs/">docs/</a><br>
            <a href="./notes"><img alt="Plain File"></a> <a href="./notes">notes</a> <a href="./notes?rev=2.1"><b>2.1</b></a>
        </menu>"#;
        let listing = parse_listing(html).unwrap();
        assert_eq!(listing.entries[0].kind, EntryKind::Directory);
        assert_eq!(
            listing.entries[1].kind,
            EntryKind::File { latest_revision: Some("2.1".to_string()) }
        );
    }

    #[test]
    fn test_unknown_icon_is_skipped() {
        let html = r#"<menu>
            <a href="./logo.gif"><img alt="[IMG]"></a> <a href="./logo.gif">logo.gif</a>
        </menu>"#;
        let listing = parse_listing(html).unwrap();
        assert!(listing.entries.is_empty());
        assert!(listing.has_links);
    }

    #[test]
    fn test_absolute_href_is_skipped() {
        let html = r#"<menu>
            <a href="/other/"><img alt="[DIR]"></a> <a href="/other/">other/</a>
        </menu>"#;
        assert!(parse_listing(html).unwrap().entries.is_empty());
    }

    #[test]
    fn test_icon_outside_link_is_skipped() {
        let html = r#"<menu>
            <span><img alt="[DIR]"></span> <a href="./sub/">sub/</a>
        </menu>"#;
        assert!(parse_listing(html).unwrap().entries.is_empty());
    }

    #[test]
    fn test_illegal_characters_are_sanitized() {
        let html = r#"<menu>
            <a href="./what%3F"><img alt="[TXT]"></a> <a href="./what%3F">what?</a> <a href="./what%3F?rev=1.1"><b>1.1</b></a>
        </menu>"#;
        let listing = parse_listing(html).unwrap();
        assert_eq!(listing.entries[0].display_name, "what_");
        assert_eq!(listing.entries[0].remote_name, "what?");
    }

    #[test]
    fn test_dot_entries_are_skipped() {
        let html = r#"<menu>
            <a href="./../"><img alt="[DIR]"></a> <a href="./../">up</a><br>
            <a href="./."><img alt="[DIR]"></a> <a href="./.">here</a><br>
            <a href="./%2E%2E"><img alt="[TXT]"></a> <a href="./%2E%2E">up</a> <a href="./..?rev=1.1"><b>1.1</b></a><br>
            <a href="./.cvsignore"><img alt="[TXT]"></a> <a href="./.cvsignore">.cvsignore</a> <a href="./.cvsignore?rev=1.1"><b>1.1</b></a>
        </menu>"#;
        let listing = parse_listing(html).unwrap();
        let names: Vec<&str> = listing.entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec![".cvsignore"]);
    }

    #[test]
    fn test_page_without_menu() {
        assert!(parse_listing("<html><body><p>Not Found</p></body></html>").is_none());
    }
}
