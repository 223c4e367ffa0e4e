//! HPS LED Common Library
//!
//! This crate provides the register layout, the UQ4.4 rate codec and the
//! configuration loading utilities shared by all HPS LED workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Register offsets, span, playback limits and default paths
//! - [`register`] - Named registers, access widths and Control bits
//! - [`fixed`] - Decimal string ⇄ UQ4.4 conversion
//! - [`num`] - Integer literals with base prefixes
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use hps_common::fixed::{decode, encode};
//!
//! assert_eq!(encode("5.4375"), 0x57);
//! assert_eq!(decode(0x57), (5, 4375));
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod consts;
pub mod fixed;
pub mod num;
pub mod prelude;
pub mod register;
