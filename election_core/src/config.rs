// ********* Records ***********

use std::error::Error;
use std::fmt::Display;

/// Identifier of a polling site.
///
/// Sites are plain positive integers. Human labels such as `Site 3` are
/// a concern of the front end.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct SiteId(pub u32);

impl Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "site {}", self.0)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct VoterId(pub u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct AdminId(pub u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(pub u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct VoteId(pub u32);

/// A registered participant.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Voter {
    pub id: VoterId,
    pub account: String,
    pub password: String,
    /// Flips from false to true exactly once, together with the insertion
    /// of the matching [`Vote`].
    pub has_voted: bool,
    pub site: SiteId,
    pub age: u32,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Admin {
    pub id: AdminId,
    pub account: String,
    pub password: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub party: String,
}

/// One entry of the ledger. Never updated nor deleted.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Vote {
    pub id: VoteId,
    pub voter_id: VoterId,
    pub candidate_id: CandidateId,
}

/// The result of a successful login.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Principal {
    Voter(Voter),
    /// The reserved administrator has no row in the admin table, hence no id.
    Admin(Option<Admin>),
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin(_))
    }
}

// ******** Inputs *********

/// A new voter, as submitted on the registration form.
///
/// Missing fields are represented with `None` or empty strings and are
/// rejected by the registry.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Registration {
    pub account: String,
    pub password: String,
    pub age: Option<u32>,
    pub site: Option<SiteId>,
}

impl Registration {
    pub fn new(account: &str, password: &str, age: u32, site: SiteId) -> Registration {
        Registration {
            account: account.to_string(),
            password: password.to_string(),
            age: Some(age),
            site: Some(site),
        }
    }
}

/// Changes requested by an administrator. Absent fields are left untouched.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub password: Option<String>,
    pub age: Option<u32>,
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateResult {
    pub candidate: Candidate,
    pub votes: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Turnout {
    pub registered: u64,
    pub voted: u64,
}

impl Turnout {
    pub fn not_voted(&self) -> u64 {
        self.registered - self.voted
    }
}

/// What the ballot screen tells a logged-in principal.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Eligibility {
    NotAVoter,
    AlreadyVoted,
    Eligible,
}

/// A vote as shown to administrators, with both names partially hidden.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MaskedRecord {
    pub voter: String,
    pub candidate: String,
}

impl Display for MaskedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} voted for {}", self.voter, self.candidate)
    }
}

// ********* Errors **********

/// Errors surfaced to the user. None of them is fatal to the process.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ElectionError {
    /// Bad input shape or range.
    Validation(String),
    /// Bad credentials.
    Auth,
    /// Unknown account or candidate.
    NotFound(String),
    /// Double-vote attempt.
    AlreadyVoted,
    /// The store could not load or commit the tables.
    Storage(String),
}

impl Error for ElectionError {}

impl Display for ElectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElectionError::Validation(msg) => write!(f, "{}", msg),
            ElectionError::Auth => write!(f, "Invalid account or password"),
            ElectionError::NotFound(what) => write!(f, "{} not found.", what),
            ElectionError::AlreadyVoted => write!(f, "You have already voted"),
            ElectionError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

pub type ElectionResult<T> = Result<T, ElectionError>;

// ********* Rules **********

/// The policy knobs of an election.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionRules {
    pub minimum_age: u32,
    /// The reserved administrator, checked before any table lookup.
    pub admin_account: String,
    pub admin_password: String,
}

impl ElectionRules {
    pub const MINIMUM_AGE: u32 = 18;
    pub const ADMIN_ACCOUNT: &'static str = "admin";
    pub const ADMIN_PASSWORD: &'static str = "admin";

    pub fn with_admin(account: &str, password: &str) -> ElectionRules {
        ElectionRules {
            admin_account: account.to_string(),
            admin_password: password.to_string(),
            ..ElectionRules::default()
        }
    }
}

impl Default for ElectionRules {
    fn default() -> Self {
        ElectionRules {
            minimum_age: ElectionRules::MINIMUM_AGE,
            admin_account: ElectionRules::ADMIN_ACCOUNT.to_string(),
            admin_password: ElectionRules::ADMIN_PASSWORD.to_string(),
        }
    }
}
