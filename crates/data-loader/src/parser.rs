//! Parser for the catalog and user-list fixture files.
//!
//! - catalog.json: `{ "genres": [...], "movies": [...], "categories": { "popular": [ids] } }`
//!   plus an optional `"credits": { "<movie id>": [cast...] }`
//! - users.json: `{ "<user id>": { "favorites": [...], "watched": [...], "watch_later": [...],
//!   "profile": { "display_name": ..., "photo_url": ... } } }`

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Contents of `catalog.json`
#[derive(Debug, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub movies: Vec<MovieRecord>,
    #[serde(default)]
    pub categories: HashMap<Category, Vec<MovieId>>,
    #[serde(default)]
    pub credits: HashMap<MovieId, Vec<CastMember>>,
}

/// One user's document in `users.json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserDocument {
    #[serde(flatten)]
    pub lists: UserLists,
    #[serde(default)]
    pub profile: Option<AccountProfile>,
}

impl From<UserLists> for UserDocument {
    fn from(lists: UserLists) -> Self {
        Self { lists, profile: None }
    }
}

/// Contents of `users.json`
pub type UsersFile = HashMap<UserId, UserDocument>;

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the catalog file
pub fn parse_catalog(path: &Path) -> Result<CatalogFile> {
    let content = read_file(path)?;
    parse_catalog_str(&content, &file_label(path))
}

/// Parse catalog JSON already in memory; `file` is used in error messages
pub fn parse_catalog_str(content: &str, file: &str) -> Result<CatalogFile> {
    serde_json::from_str(content).map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        reason: e.to_string(),
    })
}

/// Parse the user lists file.
///
/// A missing file is not an error: every user simply has empty lists.
pub fn parse_users(path: &Path) -> Result<UsersFile> {
    if !path.exists() {
        return Ok(UsersFile::new());
    }
    let content = read_file(path)?;
    parse_users_str(&content, &file_label(path))
}

/// Parse user-list JSON already in memory
pub fn parse_users_str(content: &str, file: &str) -> Result<UsersFile> {
    serde_json::from_str(content).map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        reason: e.to_string(),
    })
}
