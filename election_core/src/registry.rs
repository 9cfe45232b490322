use log::{debug, info, warn};

use crate::config::*;
use crate::store::{Store, Tables};
use crate::Election;

/// Parses the age typed on a form. Only plain decimal digits are accepted.
pub fn parse_age(text: &str) -> ElectionResult<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ElectionError::Validation(
            "Age must be a valid integer.".to_string(),
        ));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ElectionError::Validation("Age must be a valid integer.".to_string()))
}

impl<S: Store> Election<S> {
    /// Registers a new voter who has not voted yet.
    pub fn register(&mut self, registration: &Registration) -> ElectionResult<Voter> {
        let minimum_age = self.rules.minimum_age;
        let reserved = self.rules.admin_account.clone();
        let res = self.apply(|tables| {
            let (age, site) = validate_registration(tables, registration, minimum_age, &reserved)?;
            let voter = Voter {
                id: tables.next_voter_id()?,
                account: registration.account.clone(),
                password: registration.password.clone(),
                has_voted: false,
                site,
                age,
            };
            tables.voters.push(voter.clone());
            Ok(voter)
        });
        match &res {
            Ok(v) => info!("register: voter {:?} registered at {}", v.account, v.site),
            Err(e) => warn!("register: {:?} rejected: {}", registration.account, e),
        }
        res
    }

    /// Adds an administrator account to the admin table.
    pub fn add_admin(&mut self, account: &str, password: &str) -> ElectionResult<Admin> {
        if account.is_empty() || password.is_empty() {
            return Err(ElectionError::Validation(
                "Account and password are required.".to_string(),
            ));
        }
        let reserved = self.rules.admin_account.clone();
        self.apply(|tables| {
            if account_taken(tables, account, &reserved) {
                return Err(ElectionError::Validation(format!(
                    "Account {} already exists.",
                    account
                )));
            }
            let admin = Admin {
                id: tables.next_admin_id()?,
                account: account.to_string(),
                password: password.to_string(),
            };
            tables.admins.push(admin.clone());
            info!("add_admin: {:?}", admin.account);
            Ok(admin)
        })
    }

    /// Checks the credentials.
    ///
    /// The reserved administrator is tried first, then the voters, then the
    /// admin table.
    pub fn authenticate(&self, account: &str, password: &str) -> ElectionResult<Principal> {
        if account == self.rules.admin_account && password == self.rules.admin_password {
            info!("authenticate: reserved administrator");
            return Ok(Principal::Admin(None));
        }
        let principal = if let Some(voter) = self.tables.voter(account) {
            (voter.password == password).then(|| Principal::Voter(voter.clone()))
        } else if let Some(admin) = self.tables.admin(account) {
            (admin.password == password).then(|| Principal::Admin(Some(admin.clone())))
        } else {
            None
        };
        match principal {
            Some(p) => {
                debug!("authenticate: {:?} -> admin: {}", account, p.is_admin());
                Ok(p)
            }
            None => {
                warn!("authenticate: failed login for {:?}", account);
                Err(ElectionError::Auth)
            }
        }
    }

    /// Changes the password and/or the age of a voter.
    ///
    /// An empty password counts as no change. When the new age is under the
    /// minimum, nothing is changed at all.
    pub fn update_profile(&mut self, account: &str, update: &ProfileUpdate) -> ElectionResult<Voter> {
        let minimum_age = self.rules.minimum_age;
        let res = self.apply(|tables| {
            let voter = tables
                .voter_mut(account)
                .ok_or_else(|| ElectionError::NotFound("User".to_string()))?;
            if let Some(age) = update.age {
                if age < minimum_age {
                    return Err(ElectionError::Validation(format!(
                        "Age must be {} or older.",
                        minimum_age
                    )));
                }
            }
            if let Some(password) = update.password.as_ref().filter(|p| !p.is_empty()) {
                voter.password = password.clone();
            }
            if let Some(age) = update.age {
                voter.age = age;
            }
            Ok(voter.clone())
        });
        match &res {
            Ok(_) => info!("update_profile: {:?} updated", account),
            Err(e) => warn!("update_profile: {:?} rejected: {}", account, e),
        }
        res
    }

    pub fn voter(&self, account: &str) -> Option<&Voter> {
        self.tables.voter(account)
    }

    /// All the candidates, by id.
    pub fn candidates(&self) -> Vec<Candidate> {
        let mut res = self.tables.candidates.clone();
        res.sort_by_key(|c| c.id);
        res
    }

    /// Adds a candidate unless one with the same name exists already.
    ///
    /// Returns the id of the new or existing candidate.
    pub fn seed_candidate(&mut self, name: &str, party: &str) -> ElectionResult<CandidateId> {
        if let Some(c) = self.tables.candidates.iter().find(|c| c.name == name) {
            debug!("seed_candidate: {:?} already present", name);
            return Ok(c.id);
        }
        if name.is_empty() || party.is_empty() {
            return Err(ElectionError::Validation(
                "Candidate name and party are required.".to_string(),
            ));
        }
        self.apply(|tables| {
            let id = tables.next_candidate_id()?;
            tables.candidates.push(Candidate {
                id,
                name: name.to_string(),
                party: party.to_string(),
            });
            info!("seed_candidate: {:?} ({}) as {:?}", name, party, id);
            Ok(id)
        })
    }
}

fn account_taken(tables: &Tables, account: &str, reserved: &str) -> bool {
    account == reserved || tables.voter(account).is_some() || tables.admin(account).is_some()
}

fn validate_registration(
    tables: &Tables,
    registration: &Registration,
    minimum_age: u32,
    reserved: &str,
) -> ElectionResult<(u32, SiteId)> {
    let missing = |field: &str| ElectionError::Validation(format!("{} is required.", field));
    if registration.account.is_empty() {
        return Err(missing("Account"));
    }
    if registration.password.is_empty() {
        return Err(missing("Password"));
    }
    let age = registration.age.ok_or_else(|| missing("Age"))?;
    let site = registration.site.ok_or_else(|| missing("Site"))?;
    if age < minimum_age {
        return Err(ElectionError::Validation(format!(
            "You must be {} years or older to register.",
            minimum_age
        )));
    }
    if account_taken(tables, &registration.account, reserved) {
        return Err(ElectionError::Validation(format!(
            "Account {} already exists.",
            registration.account
        )));
    }
    Ok((age, site))
}
