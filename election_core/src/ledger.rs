use log::{info, warn};

use crate::config::*;
use crate::store::Store;
use crate::Election;

impl<S: Store> Election<S> {
    /// Records the vote of `voter` for `candidate_id`.
    ///
    /// The stored has-voted flag is authoritative, not the one carried by
    /// `voter`, which may be stale. The vote row and the flag are committed in
    /// the same snapshot.
    pub fn cast_vote(&mut self, voter: &Voter, candidate_id: CandidateId) -> ElectionResult<Vote> {
        let res = self.apply(|tables| {
            let stored = tables
                .voters
                .iter()
                .find(|v| v.id == voter.id)
                .ok_or_else(|| ElectionError::NotFound("Voter".to_string()))?;
            if stored.has_voted {
                return Err(ElectionError::AlreadyVoted);
            }
            if tables.candidate(candidate_id).is_none() {
                return Err(ElectionError::NotFound("Candidate".to_string()));
            }
            let vote = Vote {
                id: tables.next_vote_id()?,
                voter_id: voter.id,
                candidate_id,
            };
            tables.votes.push(vote.clone());
            if let Some(v) = tables.voters.iter_mut().find(|v| v.id == voter.id) {
                v.has_voted = true;
            }
            Ok(vote)
        });
        match &res {
            Ok(vote) => info!(
                "cast_vote: {:?} recorded for voter {:?}",
                vote.id, voter.account
            ),
            Err(e) => warn!("cast_vote: voter {:?} rejected: {}", voter.account, e),
        }
        res
    }

    /// What the ballot screen should say to this principal.
    pub fn eligibility(&self, principal: &Principal) -> Eligibility {
        match principal {
            Principal::Admin(_) => Eligibility::NotAVoter,
            Principal::Voter(v) => match self.tables.voter_by_id(v.id) {
                None => Eligibility::NotAVoter,
                Some(stored) if stored.has_voted => Eligibility::AlreadyVoted,
                Some(_) => Eligibility::Eligible,
            },
        }
    }
}
