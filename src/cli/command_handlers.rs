use std::error::Error;

use log::info;

use crate::{
    cache::RepoCache,
    git::{Checkout, Cloner},
    model::RepoSpec,
};

/// Handler to fetch command
/// Parses the locator, applies the ref override and runs the cloner
pub fn do_fetch(
    cloner: &dyn Cloner,
    default_host: &str,
    repo: &str,
    git_ref: Option<&str>,
) -> Result<Checkout, Box<dyn Error>> {
    let mut spec = RepoSpec::parse(repo, default_host)?;
    if let Some(git_ref) = git_ref {
        spec = spec.with_ref(git_ref);
    }

    let checkout = cloner.clone_repo(&spec)?;
    info!("{} is available at {}", checkout.spec, checkout.dir);

    Ok(checkout)
}

pub fn do_clear_cache(cache: &RepoCache) -> Result<(), Box<dyn Error>> {
    cache.clear()?;
    Ok(())
}
