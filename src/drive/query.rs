//! Drive `q` parameter construction.
//!
//! Every query excludes trashed files. Values are single-quoted Drive string
//! literals, so `\` and `'` are escaped before interpolation.

use crate::models::{FOLDER_MIME, ROOT_ID};

pub fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Children of `parent` (`None` = the Drive root), optionally filtered by name or type.
pub fn children(parent: Option<&str>, filter: Option<&str>) -> String {
    let parent = parent.unwrap_or(ROOT_ID);
    let mut q = format!("trashed=false and '{}' in parents", escape_literal(parent));
    if let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) {
        q.push_str(" and ");
        q.push_str(&name_or_type(filter));
    }
    q
}

/// Drive-wide search on name or type.
pub fn search(query: &str) -> String {
    format!("{} and trashed=false", name_or_type(query.trim()))
}

/// Non-folder files, for the recent list.
pub fn recent() -> String {
    format!("trashed=false and mimeType!='{}'", FOLDER_MIME)
}

fn name_or_type(value: &str) -> String {
    let literal = escape_literal(value);
    format!("(name contains '{literal}' or mimeType contains '{literal}')")
}
