/*!

This is the long-form manual for `election_core` and the `electiondesk` command.

## Concepts

* **Voters** register with an account name, a password, an age and a polling
  site. Account names are unique, and nobody under 18 may register.
* **Candidates** are seeded when the election is opened and never change.
* The **ledger** holds one vote per voter. Casting a vote and marking the voter
  as having voted happen in the same commit: either both are stored or neither.
* The **tally** is a read-only view: votes per candidate, turnout, voters per
  site and the masked list of vote records.

## Command line

Every command works on the election database given with `--db` or in the
configuration file (`election.json` by default).

```bash
# register a new voter at "Site 3"
electiondesk register --account z26 --password secret --age 26 --site "Site 3"

# log in, and see whether this account may still vote
electiondesk login --account z26 --password secret

# vote for candidate number 2
electiondesk vote --account z26 --password secret --candidate 2

# results, turnout and voters per site
electiondesk results
electiondesk turnout
electiondesk sites
```

Administrator commands take the administrator credentials:

```bash
electiondesk update --admin-account admin --admin-password admin \
    --account z26 --age 27
electiondesk records --admin-account admin --admin-password admin
```

A roster of voters can be imported in bulk from a CSV file or an Excel
workbook. The first row is a header; the columns are, in order: account,
password, age, site.

```bash
electiondesk import --input roster.xlsx --input-type xlsx --worksheet Voters
```

The `report` command writes a JSON summary. When a reference summary is passed
with `--reference`, any difference is printed and the command fails, which is
handy to check that a recount gives the expected outcome.

## Configuration

All the keys are optional:

```json
{
  "database": "election.json",
  "admin": { "account": "admin", "password": "admin" },
  "sites": [ { "label": "Site 1", "id": 1 } ],
  "candidates": [ { "name": "Kennedy", "party": "Party A" } ],
  "voters": [ { "account": "a1", "password": "1", "age": 25, "site": 1 } ]
}
```

Missing keys fall back to the defaults: eight sites, five candidates and
fifteen preset voters.

## Logging

Logging goes through the `log` facade. The command line initializes
`env_logger`: set `RUST_LOG=debug` or pass `--verbose` to see every lookup.

*/
