use std::{
    cell::RefCell,
    collections::HashMap,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use crate::{
    cache::{CacheDirectory, CacheError, ConfirmedDir, RepoCache},
    git::runner::{CommandError, CommandRunner, Invocation},
};

/// Runner that records invocations instead of spawning processes.
///
/// A successful `clone` creates `<target>/.git` so later calls see a populated cache.
#[derive(Default)]
pub(crate) struct RecordingRunner {
    missing_tool: bool,
    failures: HashMap<String, String>,
    lookups: RefCell<Vec<String>>,
    calls: RefCell<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn succeeding() -> RecordingRunner {
        RecordingRunner::default()
    }

    pub fn missing_tool() -> RecordingRunner {
        RecordingRunner {
            missing_tool: true,
            ..RecordingRunner::default()
        }
    }

    /// Makes every invocation of `subcommand` fail with `output`.
    pub fn failing(mut self, subcommand: &str, output: &str) -> RecordingRunner {
        self.failures
            .insert(subcommand.to_string(), output.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn lookup(&self, program: &str) -> Result<PathBuf, which::Error> {
        self.lookups.borrow_mut().push(program.to_string());
        if self.missing_tool {
            Err(which::Error::CannotFindBinaryPath)
        } else {
            Ok(Path::new("/usr/bin").join(program))
        }
    }

    fn run(&self, invocation: &Invocation) -> Result<String, CommandError> {
        self.calls.borrow_mut().push(invocation.clone());

        let subcommand = invocation
            .subcommand()
            .and_then(OsStr::to_str)
            .unwrap_or_default();
        if let Some(output) = self.failures.get(subcommand) {
            return Err(CommandError::Failed {
                command: invocation.to_string(),
                status: "exit status: 128".to_string(),
                output: output.clone(),
            });
        }

        if subcommand == "clone" {
            if let Some(target) = invocation.args.last() {
                std::fs::create_dir_all(Path::new(target).join(".git")).map_err(|source| {
                    CommandError::Spawn {
                        command: invocation.to_string(),
                        source,
                    }
                })?;
            }
        }
        Ok(String::new())
    }
}

/// Cache that records the keys it was asked for.
pub(crate) struct RecordingCache {
    inner: RepoCache,
    keys: RefCell<Vec<String>>,
}

impl RecordingCache {
    pub fn new(location: &Path) -> RecordingCache {
        RecordingCache {
            inner: RepoCache::new(location.to_path_buf()).unwrap(),
            keys: RefCell::new(Vec::new()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.borrow().clone()
    }
}

impl CacheDirectory for RecordingCache {
    fn confirmed_dir(&self, key: &str) -> Result<ConfirmedDir, CacheError> {
        self.keys.borrow_mut().push(key.to_string());
        self.inner.confirmed_dir(key)
    }
}
