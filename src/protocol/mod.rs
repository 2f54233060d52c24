//! III protocol support.
//!
//! Command parsing and the IFEN position notation used to exchange
//! positions with the external game runner.

pub mod ifen;
pub mod parser;

pub use ifen::{encode_ifen, encode_rows, parse_ifen, IfenError};
pub use parser::{parse_command, Command, GoParams};
