// src/fetch/markup.rs
// =============================================================================
// This module pulls a file's text out of a CVSweb "markup" page.
//
// A markup page shows the revision header, a horizontal rule, the revision
// log, another rule, and then the file body inside <pre>:
//
//   <hr noshade> ...revision info... <hr noshade> <pre>file body</pre>
//
// Archived copies don't always keep that shape, so we try a list of
// matchers in order and take the first one that finds something.
// =============================================================================

use scraper::{ElementRef, Html, Selector};

// Ways of locating the <pre> element that holds the file body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreMatcher {
    /// The first <pre> following the second <hr noshade>
    AfterSecondRule,
    /// The last <pre> anywhere on the page
    LastPre,
}

// Tried in this order
pub const PRE_MATCHERS: [PreMatcher; 2] = [PreMatcher::AfterSecondRule, PreMatcher::LastPre];

impl PreMatcher {
    // Returns the <pre> element this matcher points at, or None when the
    // page doesn't have the shape it looks for
    pub fn find(self, document: &Html) -> Option<ElementRef<'_>> {
        match self {
            PreMatcher::AfterSecondRule => {
                let rule_selector = Selector::parse("hr[noshade]").unwrap();
                let second_rule = document.select(&rule_selector).nth(1)?;
                second_rule
                    .next_siblings()
                    .filter_map(ElementRef::wrap)
                    .find(|sibling| sibling.value().name() == "pre")
            }
            PreMatcher::LastPre => {
                let pre_selector = Selector::parse("pre").unwrap();
                document.select(&pre_selector).last()
            }
        }
    }
}

// Runs the matchers over a markup page and returns the text of the first
// <pre> found. Later matchers only run when earlier ones find nothing, so
// an empty body is reported as no content instead of falling through to
// some other <pre> on the page.
pub fn extract_file_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let pre = PRE_MATCHERS
        .iter()
        .find_map(|matcher| matcher.find(&document))?;

    let text: String = pre.text().collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
