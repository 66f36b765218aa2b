//! # IO Module
//!
//! Interface layer exposing the domain to the outside world over HTTP.

pub mod rest;
