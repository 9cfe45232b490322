use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use election_core::*;

use crate::desk::*;

pub const DEFAULT_DATABASE: &str = "election.json";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub account: String,
    pub password: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SiteLabel {
    pub label: String,
    pub id: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCandidate {
    pub name: String,
    pub party: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PresetVoter {
    pub account: String,
    pub password: String,
    pub age: u32,
    pub site: u32,
}

/// The configuration file. Every key is optional.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeskConfig {
    pub database: Option<String>,
    pub admin: Option<AdminCredentials>,
    pub sites: Option<Vec<SiteLabel>>,
    pub candidates: Option<Vec<ConfigCandidate>>,
    pub voters: Option<Vec<PresetVoter>>,
}

pub fn read_config(path: &str) -> DeskResult<DeskConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DeskConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

impl DeskConfig {
    /// The database location: `--db` first, then the configuration file, then
    /// the default. Relative paths from the configuration file are taken
    /// relative to its directory.
    pub fn database_path(&self, config_path: Option<&str>, db_override: Option<&str>) -> String {
        if let Some(db) = db_override {
            return db.to_string();
        }
        let db = self.database.as_deref().unwrap_or(DEFAULT_DATABASE);
        match config_path.and_then(|p| Path::new(p).parent()) {
            Some(dir) if Path::new(db).is_relative() && !dir.as_os_str().is_empty() => {
                dir.join(db).display().to_string()
            }
            _ => db.to_string(),
        }
    }

    pub fn rules(&self) -> ElectionRules {
        match &self.admin {
            Some(admin) => ElectionRules::with_admin(&admin.account, &admin.password),
            None => ElectionRules::default(),
        }
    }

    pub fn site_labels(&self) -> Vec<SiteLabel> {
        match &self.sites {
            Some(sites) => sites.clone(),
            None => (1..=8)
                .map(|id| SiteLabel {
                    label: format!("Site {}", id),
                    id,
                })
                .collect(),
        }
    }

    /// Reads a site given either by label (`Site 3`) or by number (`3`).
    pub fn parse_site(&self, text: &str) -> ElectionResult<SiteId> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ElectionError::Validation("Site is required.".to_string()));
        }
        let sites = self.site_labels();
        let by_label = sites.iter().find(|s| s.label.eq_ignore_ascii_case(text));
        let by_id = text
            .parse::<u32>()
            .ok()
            .and_then(|id| sites.iter().find(|s| s.id == id));
        by_label
            .or(by_id)
            .map(|s| SiteId(s.id))
            .ok_or_else(|| ElectionError::Validation(format!("Unknown site {:?}.", text)))
    }

    pub fn site_label(&self, site: SiteId) -> String {
        self.site_labels()
            .into_iter()
            .find(|s| s.id == site.0)
            .map(|s| s.label)
            .unwrap_or_else(|| format!("Site {}", site.0))
    }

    pub fn candidate_list(&self) -> Vec<(String, String)> {
        match &self.candidates {
            Some(cands) => cands
                .iter()
                .map(|c| (c.name.clone(), c.party.clone()))
                .collect(),
            None => DEFAULT_CANDIDATES
                .iter()
                .map(|(name, party)| (name.to_string(), party.to_string()))
                .collect(),
        }
    }

    pub fn preset_voters(&self) -> Vec<Registration> {
        match &self.voters {
            Some(voters) => voters
                .iter()
                .map(|v| Registration::new(&v.account, &v.password, v.age, SiteId(v.site)))
                .collect(),
            None => DEFAULT_VOTERS
                .iter()
                .map(|(account, password, age, site)| {
                    Registration::new(account, password, *age, SiteId(*site))
                })
                .collect(),
        }
    }
}

const DEFAULT_CANDIDATES: [(&str, &str); 5] = [
    ("Kennedy", "Party A"),
    ("Biden", "Party B"),
    ("Trump", "Party C"),
    ("Putin", "Party D"),
    ("Macron", "Party E"),
];

// account, password, age, site
const DEFAULT_VOTERS: [(&str, &str, u32, u32); 15] = [
    ("a1", "1", 25, 1),
    ("b2", "2", 30, 2),
    ("c3", "3", 22, 3),
    ("d4", "4", 25, 5),
    ("e5", "5", 25, 1),
    ("f6", "6", 34, 2),
    ("g7", "7", 45, 4),
    ("h8", "8", 25, 1),
    ("i9", "9", 36, 7),
    ("j10", "10", 30, 8),
    ("k11", "11", 31, 1),
    ("l12", "12", 27, 1),
    ("m13", "13", 28, 3),
    ("n14", "14", 29, 6),
    ("015", "15", 36, 6),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: DeskConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DeskConfig::default());
        assert_eq!(config.candidate_list().len(), 5);
        assert_eq!(config.preset_voters().len(), 15);
        assert_eq!(config.site_labels().len(), 8);
        assert_eq!(config.rules(), ElectionRules::default());
        assert_eq!(config.database_path(None, None), DEFAULT_DATABASE);
    }

    #[test]
    fn full_config() {
        let js = r#"{
            "database": "votes/db.json",
            "admin": {"account": "chief", "password": "pw"},
            "sites": [{"label": "North", "id": 10}, {"label": "South", "id": 20}],
            "candidates": [{"name": "Alice", "party": "Blue"}],
            "voters": [{"account": "x1", "password": "p", "age": 40, "site": 10}]
        }"#;
        let config: DeskConfig = serde_json::from_str(js).unwrap();
        assert_eq!(
            config.candidate_list(),
            vec![("Alice".to_string(), "Blue".to_string())]
        );
        assert_eq!(
            config.preset_voters(),
            vec![Registration::new("x1", "p", 40, SiteId(10))]
        );
        assert_eq!(config.rules(), ElectionRules::with_admin("chief", "pw"));
        assert_eq!(config.parse_site("south"), Ok(SiteId(20)));
        assert_eq!(config.parse_site("10"), Ok(SiteId(10)));
        assert!(config.parse_site("Site 1").is_err());
        assert_eq!(config.site_label(SiteId(10)), "North");
        assert_eq!(
            config.database_path(Some("/etc/election/desk.json"), None),
            "/etc/election/votes/db.json"
        );
        assert_eq!(
            config.database_path(Some("/etc/election/desk.json"), Some("other.json")),
            "other.json"
        );
    }

    #[test]
    fn default_sites() {
        let config = DeskConfig::default();
        assert_eq!(config.parse_site("Site 4"), Ok(SiteId(4)));
        assert_eq!(config.parse_site("site 8"), Ok(SiteId(8)));
        assert_eq!(config.parse_site("3"), Ok(SiteId(3)));
        assert!(matches!(
            config.parse_site(""),
            Err(ElectionError::Validation(_))
        ));
        assert!(config.parse_site("Site 9").is_err());
        assert_eq!(config.site_label(SiteId(5)), "Site 5");
    }

    #[test]
    fn config_file_database_is_relative_to_it() {
        let config = DeskConfig::default();
        assert_eq!(
            config.database_path(Some("conf/desk.json"), None),
            "conf/election.json"
        );
        assert_eq!(config.database_path(Some("desk.json"), None), "election.json");
    }
}
