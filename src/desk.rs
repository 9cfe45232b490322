use log::{debug, info, warn};

use election_core::builder::ElectionBuilder;
use election_core::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use crate::args::{Args, Command};
use crate::desk::config_reader::*;
use crate::desk::io_common::RosterRow;
use crate::desk::io_json::JsonFileStore;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_json;
mod report;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DeskError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing to JSON"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("No worksheet named {worksheet:?} in {path}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("Unexpected cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("{source}"))]
    Election { source: ElectionError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DeskResult<T> = Result<T, DeskError>;

type DeskElection = Election<JsonFileStore>;

/// Opens the election database and seeds the configured candidates and voters.
pub fn open_election(config: &DeskConfig, db_path: &str) -> DeskResult<DeskElection> {
    ElectionBuilder::new(JsonFileStore::new(db_path))
        .rules(config.rules())
        .candidates(&config.candidate_list())
        .voters(&config.preset_voters())
        .open()
        .context(ElectionSnafu {})
}

pub fn run(args: &Args) -> DeskResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => DeskConfig::default(),
    };
    let db_path = config.database_path(args.config.as_deref(), args.db.as_deref());
    info!("Opening election database {:?}", db_path);
    let mut election = open_election(&config, &db_path)?;

    match &args.command {
        Command::Register {
            account,
            password,
            age,
            site,
        } => {
            let registration = Registration {
                account: account.clone().unwrap_or_default(),
                password: password.clone().unwrap_or_default(),
                age: age
                    .as_deref()
                    .map(parse_age)
                    .transpose()
                    .context(ElectionSnafu {})?,
                site: site
                    .as_deref()
                    .map(|s| config.parse_site(s))
                    .transpose()
                    .context(ElectionSnafu {})?,
            };
            let voter = election
                .register(&registration)
                .context(ElectionSnafu {})?;
            println!(
                "Registration Success: {} ({})",
                voter.account,
                config.site_label(voter.site)
            );
        }
        Command::Login { account, password } => {
            let principal = election
                .authenticate(account, password)
                .context(ElectionSnafu {})?;
            print!("{}", report::render_login(&election, &principal));
        }
        Command::Vote {
            account,
            password,
            candidate,
        } => {
            let voter = login_voter(&election, account, password)?;
            election
                .cast_vote(&voter, CandidateId(*candidate))
                .context(ElectionSnafu {})?;
            println!("Vote Success");
            print!("{}", report::render_results(&election));
        }
        Command::Update {
            admin_account,
            admin_password,
            account,
            password,
            age,
        } => {
            require_admin(&election, admin_account, admin_password)?;
            let update = ProfileUpdate {
                password: password.clone(),
                age: age
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .map(parse_age)
                    .transpose()
                    .context(ElectionSnafu {})?,
            };
            election
                .update_profile(account, &update)
                .context(ElectionSnafu {})?;
            println!("User profile updated successfully.");
        }
        Command::Candidates => {
            print!("{}", report::render_candidates(&election));
        }
        Command::Results => {
            print!("{}", report::render_results(&election));
        }
        Command::Turnout => {
            print!("{}", report::render_turnout(&election));
        }
        Command::Sites => {
            print!("{}", report::render_sites(&election, &config));
        }
        Command::Records {
            admin_account,
            admin_password,
        } => {
            require_admin(&election, admin_account, admin_password)?;
            print!("{}", report::render_records(&election));
        }
        Command::Report { out, reference } => {
            let summary = report::build_summary_js(&election, &config);
            let pretty = serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;
            match out.as_deref() {
                None | Some("") | Some("stdout") => println!("{}", pretty),
                Some(path) => {
                    fs::write(path, &pretty).context(WritingJsonSnafu { path })?;
                    info!("Summary written to {:?}", path);
                }
            }
            if let Some(reference_path) = reference {
                report::check_reference(&pretty, reference_path)?;
            }
        }
        Command::Import {
            input,
            input_type,
            worksheet,
        } => {
            let rows = read_roster(input, input_type.as_deref(), worksheet.as_deref())?;
            let imported = import_roster(&mut election, &config, &rows);
            println!("Imported {} of {} voters", imported, rows.len());
        }
    }
    Ok(())
}

fn login_voter(election: &DeskElection, account: &str, password: &str) -> DeskResult<Voter> {
    match election
        .authenticate(account, password)
        .context(ElectionSnafu {})?
    {
        Principal::Voter(v) => Ok(v),
        Principal::Admin(_) => {
            whatever!("You are not logged in as a voter.")
        }
    }
}

fn require_admin(election: &DeskElection, account: &str, password: &str) -> DeskResult<()> {
    let principal = election
        .authenticate(account, password)
        .context(ElectionSnafu {})?;
    if !principal.is_admin() {
        warn!("require_admin: {:?} is not an administrator", account);
        return Err(DeskError::Election {
            source: ElectionError::Auth,
        });
    }
    Ok(())
}

fn read_roster(
    path: &str,
    input_type: Option<&str>,
    worksheet: Option<&str>,
) -> DeskResult<Vec<RosterRow>> {
    let input_type = match input_type {
        Some(t) => t.to_string(),
        None if path.to_lowercase().ends_with(".xlsx") => "xlsx".to_string(),
        None => "csv".to_string(),
    };
    info!("Attempting to read roster {:?} as {}", path, input_type);
    match input_type.as_str() {
        "csv" => io_csv::read_csv_roster(path),
        "xlsx" | "excel" => io_excel::read_excel_roster(path, worksheet),
        x => {
            whatever!("Input type not implemented {:?}", x)
        }
    }
}

/// Registers every valid row. Rows that fail validation are reported and skipped.
fn import_roster(election: &mut DeskElection, config: &DeskConfig, rows: &[RosterRow]) -> usize {
    let mut imported = 0;
    for row in rows.iter() {
        let res = row
            .to_registration(config)
            .and_then(|reg| election.register(&reg));
        match res {
            Ok(voter) => {
                debug!("import_roster: {}: registered {:?}", row.label, voter.account);
                imported += 1;
            }
            Err(e) => {
                warn!("import_roster: {}: skipping row: {}", row.label, e);
            }
        }
    }
    imported
}
