/*!
Persistence seam.

The election keeps the whole state in a [`Tables`] value. A mutation builds the
next snapshot, hands it to [`Store::commit`], and only adopts it once the store
has accepted it. A store must therefore make a commit durable, and all or
nothing, before returning `Ok`.
*/

use std::error::Error;
use std::fmt::Display;

use crate::config::*;

/// The four tables of an election.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Tables {
    pub voters: Vec<Voter>,
    pub admins: Vec<Admin>,
    pub candidates: Vec<Candidate>,
    pub votes: Vec<Vote>,
}

impl Tables {
    pub fn voter(&self, account: &str) -> Option<&Voter> {
        self.voters.iter().find(|v| v.account == account)
    }

    pub(crate) fn voter_mut(&mut self, account: &str) -> Option<&mut Voter> {
        self.voters.iter_mut().find(|v| v.account == account)
    }

    pub fn voter_by_id(&self, id: VoterId) -> Option<&Voter> {
        self.voters.iter().find(|v| v.id == id)
    }

    pub fn admin(&self, account: &str) -> Option<&Admin> {
        self.admins.iter().find(|a| a.account == account)
    }

    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    // Rows are never deleted, so the largest id plus one is always fresh.

    pub(crate) fn next_voter_id(&self) -> Result<VoterId, StoreError> {
        next_id("voter", self.voters.iter().map(|v| v.id.0)).map(VoterId)
    }

    pub(crate) fn next_admin_id(&self) -> Result<AdminId, StoreError> {
        next_id("admin", self.admins.iter().map(|a| a.id.0)).map(AdminId)
    }

    pub(crate) fn next_candidate_id(&self) -> Result<CandidateId, StoreError> {
        next_id("candidate", self.candidates.iter().map(|c| c.id.0)).map(CandidateId)
    }

    pub(crate) fn next_vote_id(&self) -> Result<VoteId, StoreError> {
        next_id("vote", self.votes.iter().map(|v| v.id.0)).map(VoteId)
    }
}

fn next_id(table: &str, ids: impl Iterator<Item = u32>) -> Result<u32, StoreError> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| StoreError::new(format!("Ran out of ids in the {} table", table)))
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> StoreError {
        StoreError {
            message: message.into(),
        }
    }
}

impl Error for StoreError {}

impl Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<StoreError> for ElectionError {
    fn from(e: StoreError) -> Self {
        ElectionError::Storage(e.message)
    }
}

/// A durable home for the tables.
pub trait Store {
    /// Reads the last committed snapshot. A store that was never written to
    /// returns empty tables.
    fn load(&self) -> Result<Tables, StoreError>;

    /// Replaces the stored snapshot. Either the whole snapshot is stored or
    /// nothing changes.
    fn commit(&mut self, tables: &Tables) -> Result<(), StoreError>;
}

/// Keeps the tables in memory. Useful for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Number of successful commits so far.
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Tables, StoreError> {
        Ok(self.tables.clone())
    }

    fn commit(&mut self, tables: &Tables) -> Result<(), StoreError> {
        self.tables = tables.clone();
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), Tables::default());
        assert_eq!(store.commits(), 0);
    }

    #[test]
    fn memory_store_returns_last_commit() {
        let mut store = MemoryStore::new();
        let mut tables = Tables::default();
        tables.candidates.push(Candidate {
            id: CandidateId(1),
            name: "Kennedy".to_string(),
            party: "Party A".to_string(),
        });
        store.commit(&tables).unwrap();
        assert_eq!(store.load().unwrap(), tables);
        assert_eq!(store.commits(), 1);
    }

    #[test]
    fn fresh_ids_follow_the_largest() {
        let mut tables = Tables::default();
        assert_eq!(tables.next_voter_id(), Ok(VoterId(1)));
        tables.voters.push(Voter {
            id: VoterId(7),
            account: "g7".to_string(),
            password: "7".to_string(),
            has_voted: false,
            site: SiteId(4),
            age: 45,
        });
        assert_eq!(tables.next_voter_id(), Ok(VoterId(8)));
        assert_eq!(tables.next_vote_id(), Ok(VoteId(1)));
    }

    #[test]
    fn exhausted_ids_are_an_error() {
        let mut tables = Tables::default();
        tables.votes.push(Vote {
            id: VoteId(u32::MAX),
            voter_id: VoterId(1),
            candidate_id: CandidateId(1),
        });
        let err = tables.next_vote_id().unwrap_err();
        assert!(err.message.contains("vote"), "{}", err.message);
        assert_eq!(tables.next_candidate_id(), Ok(CandidateId(1)));
    }
}
