//! Signup Wizard: registration flow core.

pub mod cli;
pub mod config;
pub mod error;
pub mod signup;
pub mod store;
