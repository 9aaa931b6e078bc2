use clap::{Parser, Subcommand};

/// Fetches shallow, cached checkouts of git repositories.
#[derive(Debug, Parser)]
#[command(version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub cmd: Command,
    /// Location of the repofetch cache directory [default: $HOME/.repofetch/cache]
    #[arg(short, long, env = "REPOFETCH_CACHE_DIR")]
    pub cache_directory: Option<String>,
    /// Name or path of the git executable [default: git]
    #[arg(short, long, env = "REPOFETCH_GIT_PROGRAM")]
    pub git_program: Option<String>,
    /// Host used for locators of the form `org/repo` [default: https://github.com/]
    #[arg(long, env = "REPOFETCH_GIT_HOST")]
    pub default_host: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clones a repository into the cache, if needed, and prints the checkout directory
    Fetch {
        /// Repository locator, e.g. `org/repo`, `github.com/org/repo?ref=v1` or `git@host:org/repo.git`
        repo: String,
        /// Branch, tag or commit to check out [default: master]
        #[arg(short, long = "ref")]
        git_ref: Option<String>,
    },
    /// Removes every cached checkout
    ClearCache,
}
