//! # peermatch API
//!
//! REST front end for the peermatch engine. One query record per request;
//! the engine does all the work, the API only serializes.

pub mod rest;

pub use rest::RestApi;
