use std::error::Error;

use log::debug;

use crate::{
    cache::RepoCache,
    cli::command_handlers::{do_clear_cache, do_fetch},
    git::{Checkout, Cloner},
};

mod builder;

pub use builder::RepofetchBuilder;

pub struct Repofetch {
    cache: RepoCache,
    cloner: Box<dyn Cloner>,
    default_host: String,
}

impl Repofetch {
    pub fn builder() -> RepofetchBuilder {
        RepofetchBuilder::default()
    }

    /// Obtains a checkout of `repo`, cloning it into the cache on first use.
    ///
    /// `git_ref` overrides any `?ref=` given in the locator.
    pub fn fetch(&self, repo: &str, git_ref: Option<&str>) -> Result<Checkout, Box<dyn Error>> {
        debug!("Fetching {}", repo);
        do_fetch(self.cloner.as_ref(), &self.default_host, repo, git_ref)
    }

    /// Removes every cached checkout.
    pub fn clear_cache(&self) -> Result<(), Box<dyn Error>> {
        do_clear_cache(&self.cache)
    }

    pub fn cache(&self) -> &RepoCache {
        &self.cache
    }
}
