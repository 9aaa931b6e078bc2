use std::{
    ffi::{OsStr, OsString},
    fmt::Display,
    io,
    path::PathBuf,
    process::Command,
};

use log::{debug, trace};
use thiserror::Error;

/// A single external command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Invocation {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Invocation {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Invocation {
        self.current_dir = Some(dir.into());
        self
    }

    /// First argument, e.g. `clone` for `git clone ...`.
    pub fn subcommand(&self) -> Option<&OsStr> {
        self.args.first().map(OsString::as_os_str)
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed with {status}")]
    Failed {
        command: String,
        status: String,
        output: String,
    },
}

impl CommandError {
    /// Combined stdout and stderr of a command that ran and failed.
    pub fn output(&self) -> Option<&str> {
        match self {
            CommandError::Spawn { .. } => None,
            CommandError::Failed { output, .. } => Some(output),
        }
    }
}

/// Executes external programs on behalf of a cloner.
pub trait CommandRunner {
    /// Resolves `program` to an executable path.
    fn lookup(&self, program: &str) -> Result<PathBuf, which::Error>;

    /// Runs the invocation to completion and returns its combined output.
    fn run(&self, invocation: &Invocation) -> Result<String, CommandError>;
}

impl<R> CommandRunner for &R
where
    R: CommandRunner + ?Sized,
{
    fn lookup(&self, program: &str) -> Result<PathBuf, which::Error> {
        (**self).lookup(program)
    }

    fn run(&self, invocation: &Invocation) -> Result<String, CommandError> {
        (**self).run(invocation)
    }
}

/// Runs commands as blocking child processes, resolving programs on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn lookup(&self, program: &str) -> Result<PathBuf, which::Error> {
        let path = which::which(program)?;
        trace!("Resolved {} to {}", program, path.display());
        Ok(path)
    }

    fn run(&self, invocation: &Invocation) -> Result<String, CommandError> {
        debug!("Running {} in {}", invocation, display_dir(invocation));
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| CommandError::Spawn {
            command: invocation.to_string(),
            source,
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            Err(CommandError::Failed {
                command: invocation.to_string(),
                status: output.status.to_string(),
                output: combined,
            })
        }
    }
}

fn display_dir(invocation: &Invocation) -> String {
    invocation
        .current_dir
        .as_deref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| ".".to_string())
}
