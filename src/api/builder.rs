use std::{env, error::Error, path::PathBuf};

use home::home_dir;

use crate::{
    cache::RepoCache,
    git::{cloner::DEFAULT_PROGRAM, Cloner, GitExecCloner},
    model::repo_spec::DEFAULT_HOST,
    Repofetch,
};

#[derive(Default)]
pub struct RepofetchBuilder {
    root: Option<PathBuf>,
    cache_directory_path: Option<PathBuf>,
    git_program: Option<String>,
    default_host: Option<String>,
    cloner: Option<Box<dyn Cloner>>,
}

impl RepofetchBuilder {
    /// Directory relative cache paths are resolved against.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Location of the repofetch cache directory.
    ///
    /// Defaults to `$HOME/.repofetch/cache`.
    pub fn cache_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_directory_path = Some(path.into());
        self
    }

    /// Name or path of the git executable.
    ///
    /// Defaults to `git`, looked up on `PATH`.
    pub fn git_program(mut self, program: impl Into<String>) -> Self {
        self.git_program = Some(program.into());
        self
    }

    /// Host prepended to locators of the form `org/repo`.
    ///
    /// Defaults to `https://github.com/`.
    pub fn default_host(mut self, host: impl Into<String>) -> Self {
        self.default_host = Some(host.into());
        self
    }

    /// Replaces the git-backed cloner, e.g. with a
    /// [`DoNothingCloner`](crate::git::DoNothingCloner) in tests.
    pub fn cloner(mut self, cloner: impl Cloner + 'static) -> Self {
        self.cloner = Some(Box::new(cloner));
        self
    }

    pub fn try_build(self) -> Result<Repofetch, Box<dyn Error>> {
        let Self {
            root,
            cache_directory_path,
            git_program,
            default_host,
            cloner,
        } = self;
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let cache_directory = root.join(match cache_directory_path {
            Some(path) => path,
            None => default_cache_directory()?,
        });

        let cache = RepoCache::new(cache_directory)?;

        let cloner = match cloner {
            Some(cloner) => cloner,
            None => Box::new(
                GitExecCloner::new(cache.clone())
                    .with_program(git_program.unwrap_or_else(|| DEFAULT_PROGRAM.to_string())),
            ),
        };

        Ok(Repofetch {
            cache,
            cloner,
            default_host: default_host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        })
    }
}

fn default_cache_directory() -> Result<PathBuf, Box<dyn Error>> {
    let mut cache_directory =
        home_dir().ok_or("Could not find home dir. Please define $HOME env variable.")?;
    cache_directory.push(".repofetch/cache");
    Ok(cache_directory)
}
