// src/listing/mod.rs
// =============================================================================
// This module understands CVSweb directory listing pages.
//
// A listing page has a <menu> block with one line per child:
//
//   <a href="./sub/"><img alt="[DIR]"></a> <a href="./sub/">sub/</a>
//   <a href="./a.txt"><img alt="[TXT]"></a> <a href="./a.txt">a.txt</a>
//       <a href="./a.txt?rev=1.3"><b>1.3</b></a>
//
// The icon says what kind of child it is, the link next to it carries the
// name, and for files the link after that carries the latest revision.
//
// Submodules:
// - parse: Walks the <menu> block and yields Entry values
// =============================================================================

mod parse;

pub use parse::{parse_listing, Entry, EntryKind, Listing};
