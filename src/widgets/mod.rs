//! Concrete widget variants: a base widget plus pluggable behavior
//! strategies, composed rather than inherited.

pub mod button;
pub mod grid;
pub mod label;
pub mod panel;
pub mod tabs;
