//! Headless bookkeeping for lists whose sections are mirrored by a tab strip ("scrollspy").
//!
//! For the controller that wires scroll events, tab taps and scroll handles together, see the
//! `scrollspy-adapter` crate.
//!
//! This crate holds the UI-agnostic parts:
//! - per-section measured heights with prefix sums ([`SectionHeightRegistry`])
//! - scroll offset → section resolution ([`resolve_offset`], [`SectionHeightRegistry::index_at_offset`])
//!
//! A UI layer is expected to provide:
//! - the ordered section sequence
//! - each section's measured height once it has been laid out
//! - scroll offsets of the content list
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod fenwick;
mod registry;
mod resolver;
mod types;


pub use registry::SectionHeightRegistry;
pub use resolver::resolve_offset;
pub use types::{Section, SelectedSection};
