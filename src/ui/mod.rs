//! Terminal rendering with ratatui.
//!
//! Each view renders from an immutable `&App`; nothing here mutates state.
//!
//! - [`dashboard`]: status cards above the yield chart
//! - [`quarantine`]: the interlock quarantine log
//! - [`common`]: header, tabs, status bar and overlays

pub mod card;
pub mod chart;
pub mod common;
pub mod dashboard;
pub mod quarantine;
pub mod theme;

pub use card::{StatusCard, StatusCardWidget, CARD_HEIGHT};
pub use theme::Theme;
