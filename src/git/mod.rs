pub mod cloner;
pub mod runner;

pub use cloner::{cache_key, Checkout, CloneError, Cloner, DoNothingCloner, GitExecCloner};
pub use runner::{CommandError, CommandRunner, Invocation, ProcessRunner};
