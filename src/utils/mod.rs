//! Shared presentation helpers.

pub mod currency;

pub use currency::format_lkr;
