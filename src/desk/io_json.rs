// The election database: all the tables in one JSON document.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use election_core::store::{Store, StoreError, Tables};
use election_core::*;

use crate::desk::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoredVoter {
    id: u32,
    account: String,
    password: String,
    #[serde(rename = "hasVoted", default)]
    has_voted: bool,
    site: u32,
    age: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoredAdmin {
    id: u32,
    account: String,
    password: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoredCandidate {
    id: u32,
    name: String,
    party: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct StoredVote {
    id: u32,
    #[serde(rename = "voterId")]
    voter_id: u32,
    #[serde(rename = "candidateId")]
    candidate_id: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
struct StoredTables {
    #[serde(default)]
    voters: Vec<StoredVoter>,
    #[serde(default)]
    admins: Vec<StoredAdmin>,
    #[serde(default)]
    candidates: Vec<StoredCandidate>,
    #[serde(default)]
    votes: Vec<StoredVote>,
}

impl From<&Tables> for StoredTables {
    fn from(t: &Tables) -> Self {
        StoredTables {
            voters: t
                .voters
                .iter()
                .map(|v| StoredVoter {
                    id: v.id.0,
                    account: v.account.clone(),
                    password: v.password.clone(),
                    has_voted: v.has_voted,
                    site: v.site.0,
                    age: v.age,
                })
                .collect(),
            admins: t
                .admins
                .iter()
                .map(|a| StoredAdmin {
                    id: a.id.0,
                    account: a.account.clone(),
                    password: a.password.clone(),
                })
                .collect(),
            candidates: t
                .candidates
                .iter()
                .map(|c| StoredCandidate {
                    id: c.id.0,
                    name: c.name.clone(),
                    party: c.party.clone(),
                })
                .collect(),
            votes: t
                .votes
                .iter()
                .map(|v| StoredVote {
                    id: v.id.0,
                    voter_id: v.voter_id.0,
                    candidate_id: v.candidate_id.0,
                })
                .collect(),
        }
    }
}

impl From<StoredTables> for Tables {
    fn from(s: StoredTables) -> Self {
        Tables {
            voters: s
                .voters
                .into_iter()
                .map(|v| Voter {
                    id: VoterId(v.id),
                    account: v.account,
                    password: v.password,
                    has_voted: v.has_voted,
                    site: SiteId(v.site),
                    age: v.age,
                })
                .collect(),
            admins: s
                .admins
                .into_iter()
                .map(|a| Admin {
                    id: AdminId(a.id),
                    account: a.account,
                    password: a.password,
                })
                .collect(),
            candidates: s
                .candidates
                .into_iter()
                .map(|c| Candidate {
                    id: CandidateId(c.id),
                    name: c.name,
                    party: c.party,
                })
                .collect(),
            votes: s
                .votes
                .into_iter()
                .map(|v| Vote {
                    id: VoteId(v.id),
                    voter_id: VoterId(v.voter_id),
                    candidate_id: CandidateId(v.candidate_id),
                })
                .collect(),
        }
    }
}

/// A [`Store`] backed by a single JSON file.
///
/// Commits go to a temporary sibling file first, which is then renamed over
/// the database. A reader never sees a half-written file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: String,
}

impl JsonFileStore {
    pub fn new(path: &str) -> JsonFileStore {
        JsonFileStore {
            path: path.to_string(),
        }
    }

    fn read_tables(&self) -> DeskResult<Tables> {
        let path = self.path.as_str();
        if !Path::new(path).exists() {
            debug!("read_tables: {:?} does not exist yet", path);
            return Ok(Tables::default());
        }
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
        let stored: StoredTables =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
        Ok(stored.into())
    }

    fn write_tables(&self, tables: &Tables) -> DeskResult<()> {
        let path = self.path.as_str();
        let js = serde_json::to_string_pretty(&StoredTables::from(tables))
            .context(SerializingJsonSnafu {})?;
        let dir = match Path::new(path).parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).context(WritingJsonSnafu { path })?;
        let tmp_path = format!("{}.tmp", path);
        let written = write_synced(&tmp_path, js.as_bytes())
            .and_then(|_| fs::rename(&tmp_path, path).context(WritingJsonSnafu { path }));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        sync_dir(dir).context(WritingJsonSnafu { path })?;
        debug!("write_tables: {} bytes to {:?}", js.len(), path);
        Ok(())
    }
}

fn write_synced(path: &str, bytes: &[u8]) -> DeskResult<()> {
    let mut file = fs::File::create(path).context(WritingJsonSnafu { path })?;
    file.write_all(bytes).context(WritingJsonSnafu { path })?;
    file.sync_all().context(WritingJsonSnafu { path })
}

// The rename is only durable once the directory entry is on disk.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Tables, StoreError> {
        self.read_tables()
            .map_err(|e| StoreError::new(e.to_string()))
    }

    fn commit(&mut self, tables: &Tables) -> Result<(), StoreError> {
        self.write_tables(tables)
            .map_err(|e| StoreError::new(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// A fresh file name under the temporary directory.
    pub(crate) fn scratch_path(name: &str) -> String {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let p = std::env::temp_dir().join(format!(
            "electiondesk-{}-{}-{}.json",
            name,
            std::process::id(),
            n
        ));
        let _ = fs::remove_file(&p);
        p.display().to_string()
    }

    fn sample_tables() -> Tables {
        Tables {
            voters: vec![Voter {
                id: VoterId(1),
                account: "a1".to_string(),
                password: "1".to_string(),
                has_voted: true,
                site: SiteId(1),
                age: 25,
            }],
            admins: vec![Admin {
                id: AdminId(1),
                account: "clerk".to_string(),
                password: "c".to_string(),
            }],
            candidates: vec![Candidate {
                id: CandidateId(1),
                name: "Kennedy".to_string(),
                party: "Party A".to_string(),
            }],
            votes: vec![Vote {
                id: VoteId(1),
                voter_id: VoterId(1),
                candidate_id: CandidateId(1),
            }],
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let store = JsonFileStore::new(&scratch_path("missing"));
        assert_eq!(store.load().unwrap(), Tables::default());
    }

    #[test]
    fn reloads_what_was_committed() {
        let path = scratch_path("commit");
        let mut store = JsonFileStore::new(&path);
        let tables = sample_tables();
        store.commit(&tables).unwrap();
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), tables);
        assert!(!Path::new(&format!("{}.tmp", path)).exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let path = scratch_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(err.message.contains(&path), "{}", err.message);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn uses_camel_case_keys() {
        let js = serde_json::to_value(StoredTables::from(&sample_tables())).unwrap();
        assert_eq!(js["voters"][0]["hasVoted"], serde_json::json!(true));
        assert_eq!(js["votes"][0]["candidateId"], serde_json::json!(1));
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let path = scratch_path("occupied");
        // A non-empty directory cannot be replaced by a file.
        fs::create_dir_all(Path::new(&path).join("inner")).unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(store.commit(&sample_tables()).is_err());
        assert!(!Path::new(&format!("{}.tmp", path)).exists());
        assert!(Path::new(&path).is_dir());
        let _ = fs::remove_dir_all(&path);
    }

    #[test]
    fn bare_file_name_commits_in_place() {
        let name = format!("electiondesk-bare-{}.json", std::process::id());
        let mut store = JsonFileStore::new(&name);
        store.commit(&sample_tables()).unwrap();
        assert_eq!(store.load().unwrap(), sample_tables());
        let _ = fs::remove_file(&name);
    }

    #[test]
    fn unwritable_location_fails_the_commit() {
        let dir = scratch_path("blocker");
        // A plain file where a directory is expected.
        fs::write(&dir, "").unwrap();
        let mut store = JsonFileStore::new(&format!("{}/db.json", dir));
        assert!(store.commit(&sample_tables()).is_err());
        let _ = fs::remove_file(&dir);
    }
}
