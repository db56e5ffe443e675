//! Shared error plumbing.
//!
//! Only the `Result` alias lives here. The gateway, task and HTTP layers each
//! own a domain error enum and wrap it in a rootcause `Report`, attaching
//! their own context with `.context()` as a failure travels outward.

use rootcause::Report;

/// A Result whose error is a rootcause `Report` carrying context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
