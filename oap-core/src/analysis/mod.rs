//! Geometric analysis of reconstructed particle images
//!
//! Every algorithm here runs on a single reconstructed image and is
//! independently enabled through [`crate::DecodeOptions`]. Flood fills use
//! explicit work stacks; pathological images cannot exhaust the call
//! stack.

pub mod cluster;
pub mod principal;
pub mod spot;
