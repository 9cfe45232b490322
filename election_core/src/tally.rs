use std::collections::BTreeMap;

use log::debug;

use crate::config::*;
use crate::store::Store;
use crate::Election;

/// Keeps the first character of `name` and hides the rest with `*`.
pub fn mask_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut res = first.to_string();
            res.extend(chars.map(|_| '*'));
            res
        }
        None => String::new(),
    }
}

impl<S: Store> Election<S> {
    /// Vote counts per candidate.
    ///
    /// Only candidates that received at least one vote are listed, ordered by
    /// candidate id.
    pub fn results_by_candidate(&self) -> Vec<CandidateResult> {
        let mut counts: BTreeMap<CandidateId, u64> = BTreeMap::new();
        for vote in self.tables.votes.iter() {
            *counts.entry(vote.candidate_id).or_insert(0) += 1;
        }
        debug!("results_by_candidate: {:?}", counts);
        counts
            .into_iter()
            .filter_map(|(cid, votes)| {
                self.tables.candidate(cid).map(|c| CandidateResult {
                    candidate: c.clone(),
                    votes,
                })
            })
            .collect()
    }

    /// Registered voters and voters whose has-voted flag is set.
    pub fn turnout(&self) -> Turnout {
        let registered = self.tables.voters.len() as u64;
        let voted = self.tables.voters.iter().filter(|v| v.has_voted).count() as u64;
        Turnout { registered, voted }
    }

    /// Percentages of voters who voted and who did not. Both are zero when
    /// nobody is registered.
    pub fn vote_share(&self) -> (f64, f64) {
        let t = self.turnout();
        if t.registered == 0 {
            return (0.0, 0.0);
        }
        let voted = 100.0 * t.voted as f64 / t.registered as f64;
        (voted, 100.0 - voted)
    }

    /// Number of registered voters per site, by ascending site.
    pub fn distribution_by_site(&self) -> Vec<(SiteId, u64)> {
        let mut counts: BTreeMap<SiteId, u64> = BTreeMap::new();
        for voter in self.tables.voters.iter() {
            *counts.entry(voter.site).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// The ledger in insertion order, with voter and candidate names masked.
    pub fn vote_records(&self) -> Vec<MaskedRecord> {
        self.tables
            .votes
            .iter()
            .map(|vote| {
                let voter = self
                    .tables
                    .voter_by_id(vote.voter_id)
                    .map(|v| mask_name(&v.account))
                    .unwrap_or_default();
                let candidate = self
                    .tables
                    .candidate(vote.candidate_id)
                    .map(|c| mask_name(&c.name))
                    .unwrap_or_default();
                MaskedRecord { voter, candidate }
            })
            .collect()
    }
}
