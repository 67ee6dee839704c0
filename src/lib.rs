//! Replabel is a tool assigning recorded game replays to the matches of a tournament bracket.
//!
//! Each match is scored against every contiguous window of replays recorded on a setup,
//! using the delays between the bracket timestamps and the replay timestamps and, when known,
//! the characters the players usually pick.
//! The best global assignment is then computed by an integer linear program.

#![warn(missing_docs)]

pub mod bracket;

pub mod candidates;

pub mod encodings;

mod error;
pub use error::LabellingError;

pub mod ilp;

pub mod io;

pub mod model;

pub mod solvers;
