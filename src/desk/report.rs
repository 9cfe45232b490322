use std::fmt::Write;
use std::fs;

use log::{info, warn};
use serde_json::json;
use serde_json::Value as JSValue;
use snafu::prelude::*;
use text_diff::print_diff;

use election_core::store::Store;
use election_core::*;

use crate::desk::config_reader::DeskConfig;
use crate::desk::*;

pub fn render_candidates<S: Store>(election: &Election<S>) -> String {
    let mut out = String::new();
    for c in election.candidates() {
        let _ = writeln!(out, "{}. {} - {}", c.id.0, c.name, c.party);
    }
    out
}

pub fn render_login<S: Store>(election: &Election<S>, principal: &Principal) -> String {
    let mut out = String::new();
    match principal {
        Principal::Admin(_) => {
            let _ = writeln!(out, "Welcome back, administrator");
            out.push_str(&render_turnout(election));
        }
        Principal::Voter(v) => {
            let _ = writeln!(out, "Welcome, {}", v.account);
            let status = match election.eligibility(principal) {
                Eligibility::NotAVoter => "You are not logged in as a voter.",
                Eligibility::AlreadyVoted => "You have already voted.",
                Eligibility::Eligible => "You are eligible to vote.",
            };
            let _ = writeln!(out, "{}", status);
            let _ = writeln!(out, "Candidates:");
            out.push_str(&render_candidates(election));
        }
    }
    out
}

pub fn render_results<S: Store>(election: &Election<S>) -> String {
    let results = election.results_by_candidate();
    let mut out = String::new();
    if results.is_empty() {
        let _ = writeln!(out, "No votes yet.");
    }
    for r in results.iter() {
        let _ = writeln!(
            out,
            "{} ({}): {} votes",
            r.candidate.name, r.candidate.party, r.votes
        );
    }
    out
}

pub fn render_turnout<S: Store>(election: &Election<S>) -> String {
    let t = election.turnout();
    let (voted_pct, not_voted_pct) = election.vote_share();
    format!(
        "Total registered: {}\nTotal voted: {} ({:.1}%)\nNot voted: {} ({:.1}%)\n",
        t.registered,
        t.voted,
        voted_pct,
        t.not_voted(),
        not_voted_pct
    )
}

pub fn render_sites<S: Store>(election: &Election<S>, config: &DeskConfig) -> String {
    let mut out = String::new();
    for (site, count) in election.distribution_by_site() {
        let _ = writeln!(out, "{}: {} voters", config.site_label(site), count);
    }
    out
}

pub fn render_records<S: Store>(election: &Election<S>) -> String {
    let mut out = String::new();
    for record in election.vote_records() {
        let _ = writeln!(out, "{}", record);
    }
    out
}

pub fn build_summary_js<S: Store>(election: &Election<S>, config: &DeskConfig) -> JSValue {
    let t = election.turnout();
    let results: Vec<JSValue> = election
        .results_by_candidate()
        .iter()
        .map(|r| {
            json!({
                "candidate": r.candidate.name,
                "party": r.candidate.party,
                "votes": r.votes,
            })
        })
        .collect();
    let sites: Vec<JSValue> = election
        .distribution_by_site()
        .iter()
        .map(|(site, count)| json!({"site": config.site_label(*site), "voters": count}))
        .collect();
    json!({
        "turnout": {
            "registered": t.registered,
            "voted": t.voted,
            "notVoted": t.not_voted(),
        },
        "results": results,
        "sites": sites,
    })
}

/// Reads a reference summary and normalizes its layout.
pub fn read_summary(path: &str) -> DeskResult<String> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    serde_json::to_string_pretty(&js).context(SerializingJsonSnafu {})
}

/// Fails when `pretty_summary` differs from the reference summary stored at `path`.
pub fn check_reference(pretty_summary: &str, path: &str) -> DeskResult<()> {
    let pretty_ref = read_summary(path)?;
    if pretty_ref != pretty_summary {
        warn!("Found differences with the reference summary {:?}", path);
        print_diff(pretty_ref.as_str(), pretty_summary, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    info!("Summary matches the reference {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use election_core::builder::ElectionBuilder;
    use election_core::store::MemoryStore;
    use crate::desk::io_json::tests::scratch_path;

    fn election() -> Election<MemoryStore> {
        let config = DeskConfig::default();
        let mut election = ElectionBuilder::new(MemoryStore::new())
            .candidates(&config.candidate_list())
            .voters(&config.preset_voters())
            .open()
            .unwrap();
        for (account, cid) in [("a1", 1), ("b2", 1), ("c3", 5)] {
            let voter = election.voter(account).unwrap().clone();
            election.cast_vote(&voter, CandidateId(cid)).unwrap();
        }
        election
    }

    #[test]
    fn text_reports() {
        let election = election();
        assert_eq!(
            render_results(&election),
            "Kennedy (Party A): 2 votes\nMacron (Party E): 1 votes\n"
        );
        assert_eq!(
            render_turnout(&election),
            "Total registered: 15\nTotal voted: 3 (20.0%)\nNot voted: 12 (80.0%)\n"
        );
        let sites = render_sites(&election, &DeskConfig::default());
        assert!(sites.starts_with("Site 1: 5 voters\nSite 2: 2 voters\n"), "{}", sites);
        assert_eq!(
            render_records(&election),
            "a* voted for K******\nb* voted for K******\nc* voted for M*****\n"
        );
    }

    #[test]
    fn login_messages() {
        let election = election();
        let voted = Principal::Voter(election.voter("a1").unwrap().clone());
        assert!(render_login(&election, &voted).contains("You have already voted."));
        let fresh = Principal::Voter(election.voter("d4").unwrap().clone());
        let msg = render_login(&election, &fresh);
        assert!(msg.contains("You are eligible to vote."));
        assert!(msg.contains("5. Macron - Party E"));
        assert!(render_login(&election, &Principal::Admin(None)).contains("administrator"));
    }

    #[test]
    fn summary_matches_itself_only() {
        let election = election();
        let config = DeskConfig::default();
        let js = build_summary_js(&election, &config);
        assert_eq!(js["turnout"]["notVoted"], json!(12));
        assert_eq!(js["results"][0]["votes"], json!(2));
        let pretty = serde_json::to_string_pretty(&js).unwrap();

        let path = scratch_path("reference");
        // Layout differences are not differences.
        fs::write(&path, serde_json::to_string(&js).unwrap()).unwrap();
        assert!(check_reference(&pretty, &path).is_ok());

        let mut other = js.clone();
        other["turnout"]["voted"] = json!(4);
        fs::write(&path, serde_json::to_string(&other).unwrap()).unwrap();
        assert!(check_reference(&pretty, &path).is_err());
        let _ = fs::remove_file(&path);
    }
}
