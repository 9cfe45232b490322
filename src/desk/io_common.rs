use std::path::Path;

use election_core::*;

use crate::desk::config_reader::DeskConfig;

/// One line of a voter roster, as read from the file, before validation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RosterRow {
    /// Where the row comes from, for the logs: `file:line`.
    pub label: String,
    pub account: String,
    pub password: String,
    pub age: String,
    pub site: String,
}

impl RosterRow {
    /// Builds a row from the cells of a line. Missing trailing cells are empty.
    pub fn from_cells(label: String, cells: &[String]) -> RosterRow {
        let cell = |idx: usize| cells.get(idx).map(|s| s.trim().to_string()).unwrap_or_default();
        RosterRow {
            label,
            account: cell(0),
            password: cell(1),
            age: cell(2),
            site: cell(3),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.account.is_empty() && self.password.is_empty() && self.age.is_empty() && self.site.is_empty()
    }

    pub fn to_registration(&self, config: &DeskConfig) -> ElectionResult<Registration> {
        let age = if self.age.is_empty() {
            None
        } else {
            Some(parse_age(&self.age)?)
        };
        let site = if self.site.is_empty() {
            None
        } else {
            Some(config.parse_site(&self.site)?)
        };
        Ok(Registration {
            account: self.account.clone(),
            password: self.password.clone(),
            age,
            site,
        })
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_row_label(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}:{}", simplified_file_name, lineno)
}
