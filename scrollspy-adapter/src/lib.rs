//! Adapter utilities for the `scrollspy` crate.
//!
//! `scrollspy` keeps section heights and maps scroll offsets to sections. This crate wires that
//! bookkeeping to a UI through two capability handles and drives both directions of the sync:
//!
//! - scrolling the content list highlights (and scrolls to) the matching tab
//! - tapping a tab scrolls the content list to the section, retrying while it is unmeasured
//!
//! This crate is framework-agnostic: the UI layer implements [`ContentScroller`] and
//! [`TabStrip`] and forwards its events to a [`SyncController`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod handles;
mod options;
mod section_scroller;
mod tab_follower;

#[cfg(test)]
mod tests;

pub use controller::{OnSelectionChange, SelectionSource, SyncController, SyncPhase};
pub use handles::{ContentScroller, ScrollError, TabStrip};
pub use options::{SyncOptions, TabAlign};
pub use section_scroller::{ScrollOutcome, SectionScroller};
pub use tab_follower::TabFollower;

pub use scrollspy::{Section, SectionHeightRegistry, SelectedSection, resolve_offset};
