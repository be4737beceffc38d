//! # API Layer
//!
//! HTTP interface of the gateway.
//!
//! - **REST**: module descriptors, paged listings and the two wallet write
//!   endpoints, plus the homepage, health check and record overview
//! - **Middleware**: request logging with request ids

pub mod middleware;
pub mod rest;
