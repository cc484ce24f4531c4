#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod common;
pub use common::Common;
