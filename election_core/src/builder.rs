use log::{debug, info};

pub use crate::config::*;
use crate::store::Store;
use crate::Election;

/// Opens an election and seeds it.
///
/// Candidates are matched by name and preset voters and admins by account:
/// whatever is already stored is left alone, so opening the same store
/// repeatedly never duplicates rows.
///
/// ```
/// use election_core::builder::ElectionBuilder;
/// use election_core::store::MemoryStore;
/// # use election_core::*;
///
/// let election = ElectionBuilder::new(MemoryStore::new())
///     .candidate("Kennedy", "Party A")
///     .candidate("Biden", "Party B")
///     .voter(Registration::new("a1", "1", 25, SiteId(1)))
///     .open()?;
///
/// assert_eq!(election.candidates().len(), 2);
/// assert_eq!(election.turnout().registered, 1);
/// # Ok::<(), ElectionError>(())
/// ```
pub struct ElectionBuilder<S: Store> {
    store: S,
    rules: ElectionRules,
    candidates: Vec<(String, String)>,
    voters: Vec<Registration>,
    admins: Vec<(String, String)>,
}

impl<S: Store> ElectionBuilder<S> {
    pub fn new(store: S) -> ElectionBuilder<S> {
        ElectionBuilder {
            store,
            rules: ElectionRules::default(),
            candidates: Vec::new(),
            voters: Vec::new(),
            admins: Vec::new(),
        }
    }

    pub fn rules(self, rules: ElectionRules) -> ElectionBuilder<S> {
        ElectionBuilder { rules, ..self }
    }

    pub fn candidate(mut self, name: &str, party: &str) -> ElectionBuilder<S> {
        self.candidates.push((name.to_string(), party.to_string()));
        self
    }

    pub fn candidates(mut self, cands: &[(String, String)]) -> ElectionBuilder<S> {
        self.candidates.extend(cands.iter().cloned());
        self
    }

    /// A preset voter, registered unless the account exists already.
    pub fn voter(mut self, registration: Registration) -> ElectionBuilder<S> {
        self.voters.push(registration);
        self
    }

    pub fn voters(mut self, registrations: &[Registration]) -> ElectionBuilder<S> {
        self.voters.extend(registrations.iter().cloned());
        self
    }

    pub fn admin(mut self, account: &str, password: &str) -> ElectionBuilder<S> {
        self.admins.push((account.to_string(), password.to_string()));
        self
    }

    pub fn open(self) -> ElectionResult<Election<S>> {
        let mut election = Election::open(self.store, self.rules)?;
        for (name, party) in self.candidates.iter() {
            election.seed_candidate(name, party)?;
        }
        for (account, password) in self.admins.iter() {
            if election.tables().admin(account).is_some() {
                debug!("open: admin {:?} already present", account);
                continue;
            }
            election.add_admin(account, password)?;
        }
        let mut seeded = 0;
        for reg in self.voters.iter() {
            if election.voter(&reg.account).is_some() {
                debug!("open: voter {:?} already present", reg.account);
                continue;
            }
            election.register(reg)?;
            seeded += 1;
        }
        info!(
            "open: {} candidates, {} voters ({} newly seeded)",
            election.tables().candidates.len(),
            election.tables().voters.len(),
            seeded
        );
        Ok(election)
    }
}

#[cfg(test)]
mod tests {
    use super::ElectionBuilder;
    use crate::store::MemoryStore;
    use crate::test_support::init_logs;
    use crate::*;

    fn seeded(store: MemoryStore) -> Election<MemoryStore> {
        ElectionBuilder::new(store)
            .candidate("Kennedy", "Party A")
            .candidate("Biden", "Party B")
            .admin("clerk", "c")
            .voters(&[
                Registration::new("a1", "1", 25, SiteId(1)),
                Registration::new("b2", "2", 30, SiteId(2)),
            ])
            .open()
            .unwrap()
    }

    #[test]
    fn seeding_twice_does_not_duplicate() {
        init_logs();
        let first = seeded(MemoryStore::new());
        let again = seeded(first.into_store());
        assert_eq!(again.candidates().len(), 2);
        assert_eq!(again.tables().voters.len(), 2);
        assert_eq!(again.tables().admins.len(), 1);
    }

    #[test]
    fn seeding_keeps_existing_voter_state() {
        init_logs();
        let mut first = seeded(MemoryStore::new());
        let voter = first.voter("a1").unwrap().clone();
        let kennedy = first.candidates()[0].id;
        first.cast_vote(&voter, kennedy).unwrap();
        first
            .update_profile(
                "b2",
                &ProfileUpdate {
                    password: None,
                    age: Some(31),
                },
            )
            .unwrap();

        let again = seeded(first.into_store());
        assert!(again.voter("a1").unwrap().has_voted);
        assert_eq!(again.voter("b2").unwrap().age, 31);
        assert_eq!(again.turnout().voted, 1);
    }

    #[test]
    fn candidate_ids_follow_seed_order() {
        init_logs();
        let election = seeded(MemoryStore::new());
        let names: Vec<(CandidateId, String)> = election
            .candidates()
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        assert_eq!(
            names,
            vec![
                (CandidateId(1), "Kennedy".to_string()),
                (CandidateId(2), "Biden".to_string())
            ]
        );
    }

    #[test]
    fn invalid_preset_voter_fails_the_opening() {
        init_logs();
        let res = ElectionBuilder::new(MemoryStore::new())
            .voter(Registration::new("kid", "k", 12, SiteId(1)))
            .open();
        assert!(matches!(res, Err(ElectionError::Validation(_))));
    }
}
