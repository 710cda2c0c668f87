use std::path::PathBuf;

use serde::Deserialize;

use crate::storage::SqliteStorage;
use crate::store::ClassStore;

pub type WorkspaceStore = ClassStore<SqliteStorage>;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Default)]
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub store: Option<WorkspaceStore>,
}
