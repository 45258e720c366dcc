//! `posterdraft`: manage, render and decorate stored poster designs from
//! the command line.

pub mod app;
pub mod cli;

pub use app::App;
pub use cli::{Cli, Command, NewElement};
