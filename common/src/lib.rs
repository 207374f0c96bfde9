//! Cambio Common Types
//!
//! This crate contains the shared kernel of the Cambio quote pipeline:
//! the deadline budget, the error taxonomy, and the quote types exchanged
//! between the service and the requester.

pub mod budget;
pub mod error;
pub mod quote;
pub mod time;

pub use budget::*;
pub use error::*;
pub use quote::*;
pub use time::*;
