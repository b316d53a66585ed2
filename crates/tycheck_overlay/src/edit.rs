//! Edit wire format and validated edit batches.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidEditError;

/// The type of a file edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// Create a file with the given content.
    Create,
    /// Replace a file's content.
    Update,
    /// Remove a file.
    Delete,
    /// Remove a file and create another with the given content.
    Move,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditKind::Create => "create",
            EditKind::Update => "update",
            EditKind::Delete => "delete",
            EditKind::Move => "move",
        };
        f.write_str(name)
    }
}

/// An edit as received on the wire, before validation.
///
/// ```json
/// {"type": "move", "path": "src/A.tsx", "newPath": "src/B.tsx", "content": "..."}
/// ```
/// `filePath` and `newFilePath` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdit {
    /// The edit type.
    #[serde(rename = "type")]
    pub kind: EditKind,

    /// Project-relative or absolute path of the file.
    #[serde(default, alias = "filePath", skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Full text of the file after the edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Destination of a move.
    #[serde(
        default,
        rename = "newPath",
        alias = "newFilePath",
        skip_serializing_if = "Option::is_none"
    )]
    pub new_path: Option<String>,
}

impl RawEdit {
    /// A `create` edit.
    pub fn create(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Create,
            path: Some(path.into()),
            content: Some(content.into()),
            new_path: None,
        }
    }

    /// An `update` edit.
    pub fn update(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Update,
            ..Self::create(path, content)
        }
    }

    /// A `delete` edit.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            path: Some(path.into()),
            content: None,
            new_path: None,
        }
    }

    /// A `move` edit.
    pub fn move_to(
        path: impl Into<String>,
        new_path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind: EditKind::Move,
            path: Some(path.into()),
            content: Some(content.into()),
            new_path: Some(new_path.into()),
        }
    }
}

/// A validated edit. Every field its type needs is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Create a file.
    Create {
        /// Target path.
        path: String,
        /// Full text.
        content: String,
    },
    /// Replace a file's content.
    Update {
        /// Target path.
        path: String,
        /// Full text.
        content: String,
    },
    /// Remove a file.
    Delete {
        /// Target path.
        path: String,
    },
    /// Delete `path`, then create `new_path` with `content`.
    Move {
        /// Source path.
        path: String,
        /// Destination path.
        new_path: String,
        /// Full text of the destination.
        content: String,
    },
}

impl Edit {
    /// Returns the edit's type.
    pub fn kind(&self) -> EditKind {
        match self {
            Edit::Create { .. } => EditKind::Create,
            Edit::Update { .. } => EditKind::Update,
            Edit::Delete { .. } => EditKind::Delete,
            Edit::Move { .. } => EditKind::Move,
        }
    }

    /// Returns the (source) path the edit touches.
    pub fn path(&self) -> &str {
        match self {
            Edit::Create { path, .. }
            | Edit::Update { path, .. }
            | Edit::Delete { path }
            | Edit::Move { path, .. } => path,
        }
    }

    fn from_raw(index: usize, raw: &RawEdit) -> Result<Self, InvalidEditError> {
        let missing = |field| InvalidEditError {
            index,
            kind: raw.kind,
            field,
        };
        let path = raw
            .path
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| missing("path"))?;
        let edit = match raw.kind {
            EditKind::Create | EditKind::Update => {
                let content = raw.content.clone().ok_or_else(|| missing("content"))?;
                if raw.kind == EditKind::Create {
                    Edit::Create { path, content }
                } else {
                    Edit::Update { path, content }
                }
            }
            EditKind::Delete => Edit::Delete { path },
            EditKind::Move => {
                let new_path = raw
                    .new_path
                    .clone()
                    .filter(|p| !p.trim().is_empty())
                    .ok_or_else(|| missing("newPath"))?;
                let content = raw.content.clone().ok_or_else(|| missing("content"))?;
                Edit::Move {
                    path,
                    new_path,
                    content,
                }
            }
        };
        Ok(edit)
    }
}

/// An ordered batch of validated edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
    edits: Vec<Edit>,
}

impl EditBatch {
    /// Validates every edit of a wire batch.
    ///
    /// Fails on the first malformed edit; nothing is returned for partial
    /// application.
    pub fn validate(raw: &[RawEdit]) -> Result<Self, InvalidEditError> {
        let edits = raw
            .iter()
            .enumerate()
            .map(|(index, edit)| Edit::from_raw(index, edit))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { edits })
    }

    /// Returns the edits in submission order.
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Returns the number of edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns `true` if the batch holds no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

impl IntoIterator for EditBatch {
    type Item = Edit;
    type IntoIter = std::vec::IntoIter<Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.into_iter()
    }
}
