//! Static store documents used across harnesses.

/// The single-entry store from the end-to-end slash command scenario.
pub const TOKEN_STORE: &str = r#"{
  "prod-token": { "key": "token", "value": "abc123", "tag": "prod" }
}"#;

/// A store with one valid record surrounded by malformed ones.
pub const PARTLY_MALFORMED_STORE: &str = r#"{
  "prod-token": { "key": "token", "value": "abc123", "tag": "prod" },
  "dev-nokey":  { "value": "orphan", "tag": "dev" },
  "dev-number": { "key": "port", "value": 5432, "tag": "dev" },
  "scalar":     "just a string"
}"#;

/// An import document whose outer ids disagree with key and tag.
pub const IMPORT_DOC: &str = r#"{
  "1": { "key": "db_password", "value": "hunter2", "tag": "dev" },
  "2": { "key": "API_KEY", "value": "sk-live-123", "tag": "prod" }
}"#;

/// An import document with an item missing its tag.
pub const INVALID_IMPORT_DOC: &str = r#"{
  "1": { "key": "db_password", "value": "hunter2", "tag": "dev" },
  "2": { "key": "API_KEY", "value": "sk-live-123" }
}"#;
