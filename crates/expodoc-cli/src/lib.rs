//! Expodoc command line
//!
//! ```text
//! expodoc [--config FILE] [--store FILE] [--today DATE] [--sheet NAME] <COMMAND>
//!
//!   enrich      classify shipments, merge comments, write the enriched table
//!   summary     headline counts plus status and period distributions
//!   annotate    set one comment and save the store
//!   reconcile   save the comments of an edited table
//!   show-store  list stored comments
//! ```

#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::build_cli;
pub use commands::{filter_from_args, run, Context};
