use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Article `{path:?}` couldn't be read. Details: {source}")]
    UnreadableArticle { path: PathBuf, source: io::Error },
    #[error("Path `{0}` is used by more than one page")]
    DuplicatePath(String),
    #[error("Topic slug `{0}` can't be used in a path (it must be non-empty and have no `/`)")]
    InvalidSlug(String),
    #[error("Page template couldn't be rendered. Details: {0}")]
    Render(#[from] askama::Error),
}
