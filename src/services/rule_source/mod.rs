//! Rule source service.
//!
//! Fetches the current rule snapshot from the rule-management API.

mod client;
mod error;

pub use client::{HttpRuleSource, RuleSource};
pub use error::RuleSourceError;
