use clap::{Parser, Subcommand};

/// Voter registration, ballots and turnout reports for a small election.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file with the database location, the administrator
    /// credentials, the sites, the candidates and the preset voters. Defaults are used for every missing key.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The election database. Overrides the path that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub db: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Registers a new voter. Voters must be at least 18 years old.
    Register {
        #[clap(long, value_parser)]
        account: Option<String>,
        #[clap(long, value_parser)]
        password: Option<String>,
        #[clap(long, value_parser)]
        age: Option<String>,
        /// The site label (for example "Site 3") or the site number.
        #[clap(long, value_parser)]
        site: Option<String>,
    },
    /// Checks the credentials and tells whether the account may still vote.
    Login {
        #[clap(long, value_parser)]
        account: String,
        #[clap(long, value_parser)]
        password: String,
    },
    /// Casts the vote of a voter. Every voter votes at most once.
    Vote {
        #[clap(long, value_parser)]
        account: String,
        #[clap(long, value_parser)]
        password: String,
        /// The candidate number, as listed by the `candidates` command.
        #[clap(long, value_parser)]
        candidate: u32,
    },
    /// (administrators) Changes the password and/or the age of a voter.
    Update {
        #[clap(long, value_parser)]
        admin_account: String,
        #[clap(long, value_parser)]
        admin_password: String,
        /// The voter to update.
        #[clap(long, value_parser)]
        account: String,
        #[clap(long, value_parser)]
        password: Option<String>,
        #[clap(long, value_parser)]
        age: Option<String>,
    },
    /// Lists the candidates.
    Candidates,
    /// Shows the number of votes per candidate.
    Results,
    /// Shows how many registered voters have voted.
    Turnout,
    /// Shows the number of registered voters per site.
    Sites,
    /// (administrators) Lists the votes, with voter and candidate names partially hidden.
    Records {
        #[clap(long, value_parser)]
        admin_account: String,
        #[clap(long, value_parser)]
        admin_password: String,
    },
    /// Writes a summary of the election in JSON format.
    Report {
        /// (file path, 'stdout' or empty) Where to write the summary.
        #[clap(short, long, value_parser)]
        out: Option<String>,
        /// (file path) A reference summary in JSON format. If provided, the command fails when the
        /// current summary differs from it.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
    /// Registers the voters listed in a roster file (columns: account, password, age, site).
    Import {
        #[clap(short, long, value_parser)]
        input: String,
        /// (csv or xlsx) The type of the input. Guessed from the file extension when not provided.
        #[clap(long, value_parser)]
        input_type: Option<String>,
        /// When using an Excel file, the name of the worksheet to use. Defaults to the first one.
        #[clap(long, value_parser)]
        worksheet: Option<String>,
    },
}
