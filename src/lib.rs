//! Recurring maintenance tracking: derives due status from service history.

pub mod engine;
