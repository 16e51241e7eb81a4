//! Terminal rendering.
//!
//! The tank view is the ambient display: one fish per endpoint, posed by the
//! motion driver. The endpoints view is a conventional table for when the
//! operator wants detail. Everything here only reads state; rendering never
//! blocks on probes.

pub mod common;
pub mod endpoints;
pub mod tank;
pub mod theme;

pub use theme::Theme;
