use log::{debug, error, info};
use thiserror::Error;

use crate::{
    cache::{CacheDirectory, CacheError, ConfirmedDir, RepoCache},
    git::runner::{CommandError, CommandRunner, Invocation, ProcessRunner},
    model::RepoSpec,
};

/// Ref checked out when the spec does not name one.
pub const DEFAULT_REF: &str = "master";
pub const DEFAULT_PROGRAM: &str = "git";

const GIT_DIR: &str = ".git";

/// A local directory holding the requested ref of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    /// The spec that was acquired, with the effective ref.
    pub spec: RepoSpec,
    pub dir: ConfirmedDir,
}

#[derive(Error, Debug)]
pub enum CloneError {
    #[error("No '{program}' program on path: {source}")]
    ToolNotFound {
        program: String,
        #[source]
        source: which::Error,
    },
    #[error("Could not prepare cache directory `{key}`: {source}")]
    CacheDirectory {
        key: String,
        #[source]
        source: CacheError,
    },
    #[error("Trouble cloning git repo {clone_spec} in {dir}: {source}")]
    Clone {
        clone_spec: String,
        dir: ConfirmedDir,
        #[source]
        source: CommandError,
    },
    #[error("Trouble fetching submodules for {clone_spec}: {source}")]
    Submodule {
        clone_spec: String,
        #[source]
        source: CommandError,
    },
}

impl CloneError {
    /// Output captured from the failing git command, if it ran.
    pub fn output(&self) -> Option<&str> {
        match self {
            CloneError::Clone { source, .. } | CloneError::Submodule { source, .. } => {
                source.output()
            }
            CloneError::ToolNotFound { .. } | CloneError::CacheDirectory { .. } => None,
        }
    }
}

/// Obtains a local checkout of a repository.
pub trait Cloner {
    fn clone_repo(&self, spec: &RepoSpec) -> Result<Checkout, CloneError>;
}

impl<F> Cloner for F
where
    F: Fn(&RepoSpec) -> Result<Checkout, CloneError>,
{
    fn clone_repo(&self, spec: &RepoSpec) -> Result<Checkout, CloneError> {
        self(spec)
    }
}

/// Clones with the local `git` program into a cache directory keyed by
/// locator and ref.
///
/// An existing `.git` directory in the cache entry counts as a cache hit, even
/// if an earlier submodule update failed.
pub struct GitExecCloner<C = RepoCache, R = ProcessRunner> {
    cache: C,
    runner: R,
    program: String,
}

impl<C> GitExecCloner<C, ProcessRunner> {
    pub fn new(cache: C) -> Self {
        GitExecCloner {
            cache,
            runner: ProcessRunner,
            program: DEFAULT_PROGRAM.to_string(),
        }
    }
}

impl<C, R> GitExecCloner<C, R> {
    pub fn with_runner<T>(self, runner: T) -> GitExecCloner<C, T> {
        GitExecCloner {
            cache: self.cache,
            runner,
            program: self.program,
        }
    }

    /// Name or path of the git executable. Defaults to `git`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl<C, R> Cloner for GitExecCloner<C, R>
where
    C: CacheDirectory,
    R: CommandRunner,
{
    fn clone_repo(&self, spec: &RepoSpec) -> Result<Checkout, CloneError> {
        let program = self
            .runner
            .lookup(&self.program)
            .map_err(|source| CloneError::ToolNotFound {
                program: self.program.clone(),
                source,
            })?;

        // The key embeds the ref, so the default must be applied first.
        let spec = with_default_ref(spec);
        let git_ref = spec.git_ref().unwrap_or(DEFAULT_REF).to_string();
        let key = cache_key(&spec);
        let dir = self
            .cache
            .confirmed_dir(&key)
            .map_err(|source| CloneError::CacheDirectory {
                key: key.clone(),
                source,
            })?;

        if dir.join(GIT_DIR).exists() {
            debug!("Using cached checkout of {} at {}", spec, dir);
            return Ok(Checkout { spec, dir });
        }

        let clone_spec = spec.clone_spec();
        info!("Cloning {} at {} into {}", clone_spec, git_ref, dir);

        let clone = Invocation::new(&program)
            .args(["clone", "--depth=1", clone_spec.as_str(), "-b", git_ref.as_str()])
            .arg(dir.path());
        if let Err(source) = self.runner.run(&clone) {
            match source.output() {
                Some(output) => error!("Error cloning git repo: {}", output),
                None => error!("Error cloning git repo: {}", source),
            }
            return Err(CloneError::Clone {
                clone_spec,
                dir,
                source,
            });
        }

        let submodules = Invocation::new(&program)
            .args(["submodule", "update", "--init", "--recursive"])
            .current_dir(dir.path());
        self.runner
            .run(&submodules)
            .map_err(|source| CloneError::Submodule {
                clone_spec: clone_spec.clone(),
                source,
            })?;

        debug!("Cloned {} into {}", clone_spec, dir);
        Ok(Checkout { spec, dir })
    }
}

/// Hands out a fixed, pre-populated directory without touching git.
#[derive(Debug, Clone)]
pub struct DoNothingCloner {
    dir: ConfirmedDir,
}

impl DoNothingCloner {
    pub fn new(dir: ConfirmedDir) -> Self {
        DoNothingCloner { dir }
    }
}

impl Cloner for DoNothingCloner {
    fn clone_repo(&self, spec: &RepoSpec) -> Result<Checkout, CloneError> {
        Ok(Checkout {
            spec: spec.clone(),
            dir: self.dir.clone(),
        })
    }
}

fn with_default_ref(spec: &RepoSpec) -> RepoSpec {
    match spec.git_ref() {
        Some(_) => spec.clone(),
        None => spec.clone().with_ref(DEFAULT_REF),
    }
}

/// Cache key of a spec: locator and ref concatenated without a separator.
pub fn cache_key(spec: &RepoSpec) -> String {
    format!(
        "{}{}",
        spec.org_repo,
        spec.git_ref().unwrap_or(DEFAULT_REF)
    )
}
