//! Loading generated issue backlogs from JSON files.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::github::error::IntegrationError;
use crate::github::models::GeneratedIssueContent;

/// Reads a JSON array of generated issues from `path`, preserving order.
///
/// # Errors
///
/// Returns [`IntegrationError::Io`] when the file cannot be opened, read or
/// parsed.
pub fn load_backlog(path: &Utf8Path) -> Result<Vec<GeneratedIssueContent>, IntegrationError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| IntegrationError::Io {
        message: format!("invalid backlog path '{path}': no file name"),
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        IntegrationError::Io {
            message: format!("failed to open backlog directory '{parent}': {error}"),
        }
    })?;
    let content = dir
        .read_to_string(file_name)
        .map_err(|error| IntegrationError::Io {
            message: format!("failed to read backlog '{path}': {error}"),
        })?;

    serde_json::from_str(&content).map_err(|error| IntegrationError::Io {
        message: format!("failed to parse backlog '{path}': {error}"),
    })
}
