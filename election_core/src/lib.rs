/*!
Registry, ballot ledger and tally for a small, single-site election.

The entry point is [`Election`], usually obtained through
[`builder::ElectionBuilder`], which seeds the candidates and preset voters:

```
use election_core::builder::ElectionBuilder;
use election_core::store::MemoryStore;
use election_core::*;

let mut election = ElectionBuilder::new(MemoryStore::new())
    .candidate("Kennedy", "Party A")
    .open()?;

election.register(&Registration::new("a1", "1", 25, SiteId(1)))?;
let voter = match election.authenticate("a1", "1")? {
    Principal::Voter(v) => v,
    _ => unreachable!(),
};
let kennedy = election.candidates()[0].id;
election.cast_vote(&voter, kennedy)?;

assert_eq!(election.turnout().voted, 1);
# Ok::<(), ElectionError>(())
```
*/
mod config;
pub mod builder;
mod ledger;
pub mod manual;
mod registry;
pub mod store;
mod tally;

use log::debug;

pub use crate::config::*;
pub use crate::registry::parse_age;
pub use crate::tally::mask_name;

use crate::store::{Store, Tables};

/// An open election: the in-memory tables plus the store that persists them.
///
/// The store handle is owned by the election and passed explicitly; there is
/// no global session.
pub struct Election<S: Store> {
    store: S,
    tables: Tables,
    rules: ElectionRules,
}

impl<S: Store> Election<S> {
    /// Opens the election stored in `store`, without seeding anything.
    pub fn open(store: S, rules: ElectionRules) -> ElectionResult<Election<S>> {
        let tables = store.load()?;
        debug!(
            "open: {} voters, {} admins, {} candidates, {} votes",
            tables.voters.len(),
            tables.admins.len(),
            tables.candidates.len(),
            tables.votes.len()
        );
        Ok(Election {
            store,
            tables,
            rules,
        })
    }

    pub fn rules(&self) -> &ElectionRules {
        &self.rules
    }

    /// Read-only view of the current tables.
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gives the store back, dropping the in-memory copy.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs `change` on a copy of the tables, commits the copy, and adopts it.
    ///
    /// If `change` or the commit fails, the election is left exactly as it was.
    pub(crate) fn apply<T>(
        &mut self,
        change: impl FnOnce(&mut Tables) -> ElectionResult<T>,
    ) -> ElectionResult<T> {
        let mut next = self.tables.clone();
        let res = change(&mut next)?;
        self.store.commit(&next)?;
        self.tables = next;
        Ok(res)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::store::{MemoryStore, Store, StoreError, Tables};
    use crate::*;

    /// A store that accepts `budget` commits and refuses every later one.
    pub struct FlakyStore {
        pub inner: MemoryStore,
        pub budget: usize,
    }

    impl Store for FlakyStore {
        fn load(&self) -> Result<Tables, StoreError> {
            self.inner.load()
        }

        fn commit(&mut self, tables: &Tables) -> Result<(), StoreError> {
            if self.budget == 0 {
                return Err(StoreError::new("disk full"));
            }
            self.budget -= 1;
            self.inner.commit(tables)
        }
    }

    pub fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    pub fn empty_election() -> Election<MemoryStore> {
        init_logs();
        Election::open(MemoryStore::new(), ElectionRules::default()).unwrap()
    }

    /// An election with three candidates and no voters.
    pub fn small_election() -> Election<MemoryStore> {
        init_logs();
        crate::builder::ElectionBuilder::new(MemoryStore::new())
            .candidate("Kennedy", "Party A")
            .candidate("Biden", "Party B")
            .candidate("Trump", "Party C")
            .open()
            .unwrap()
    }

    pub fn login_voter<S: Store>(election: &Election<S>, account: &str, password: &str) -> Voter {
        match election.authenticate(account, password).unwrap() {
            Principal::Voter(v) => v,
            p => panic!("expected a voter, got {:?}", p),
        }
    }
}
