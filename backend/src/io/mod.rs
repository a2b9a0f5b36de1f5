//! # IO Module
//!
//! The HTTP adapter between a UI and the domain services.

pub mod rest;
