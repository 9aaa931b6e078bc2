use thiserror::Error;

pub mod repo_spec;

pub use repo_spec::RepoSpec;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Repository locator is empty")]
    Empty,
    #[error("Missing url component `{0}` in string `{1}`")]
    MissingUrlComponent(String, String),
    #[error("Unknown parameter `{0}` in string `{1}`")]
    UnknownParameter(String, String),
}
