//! User statistics exposed over HTTP.

pub mod handlers;
