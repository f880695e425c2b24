//! News sources.
//!
//! The site reads syndication feeds only; [`feeds`] handles both RSS 2.0 and
//! Atom through `feed-rs`.

pub mod feeds;
