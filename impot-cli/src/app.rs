use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use impot_core::{BracketTable, Household, PartsPolicy, ReverseCalculator, TaxCalculator};
use impot_data::BracketTableLoader;
use tracing::{debug, info};

use crate::config::Config;
use crate::report::{BracketListing, TaxReport};
use crate::utils::parse_amount;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income-tax calculator with household parts.
///
/// Computes the tax due on a gross income, or the gross income needed to
/// keep a given net income.
#[derive(Debug, Parser)]
#[command(name = "impot", version, about)]
pub struct Cli {
    /// Configuration file (defaults to `impot.toml` if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `impot_core=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Parts policy for dependents: `capped` or `flat`.
    #[arg(long, global = true, value_parser = parse_policy)]
    pub policy: Option<PartsPolicy>,

    /// CSV bracket table to use instead of the configured one.
    #[arg(long, global = true)]
    pub brackets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Tax due on a gross income.
    Tax {
        /// Gross income. Unparsable or negative values count as 0.
        #[arg(allow_hyphen_values = true)]
        gross: String,

        #[command(flatten)]
        household: HouseholdArgs,
    },

    /// Gross income needed to keep a net income after tax.
    Net {
        /// Desired net income. Unparsable or negative values count as 0.
        #[arg(allow_hyphen_values = true)]
        desired_net: String,

        #[command(flatten)]
        household: HouseholdArgs,
    },

    /// Household parts only.
    Parts {
        #[command(flatten)]
        household: HouseholdArgs,
    },

    /// List the active bracket table.
    Brackets,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct HouseholdArgs {
    /// Married or in a civil partnership (two adult parts).
    #[arg(long)]
    pub married: bool,

    /// Number of dependents.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub dependents: i64,
}

impl From<HouseholdArgs> for Household {
    fn from(args: HouseholdArgs) -> Self {
        Household::new(args.married, args.dependents)
    }
}

fn parse_policy(s: &str) -> Result<PartsPolicy, String> {
    PartsPolicy::parse(s).ok_or_else(|| format!("unknown parts policy '{s}'; expected capped or flat"))
}

// ─── settings ────────────────────────────────────────────────────────────────

/// Everything a calculation needs, after command-line flags have been
/// layered over the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub policy: PartsPolicy,
    pub table: BracketTable,
}

impl Settings {
    /// Flags win over the configuration file.
    pub fn resolve(
        cli: &Cli,
        config: &Config,
    ) -> Result<Self> {
        let policy = cli.policy.unwrap_or(config.parts_policy);

        let table = match &cli.brackets {
            Some(path) => BracketTableLoader::load_from_file(path)
                .with_context(|| format!("Failed to load brackets: {}", path.display()))?,
            None => config
                .bracket_table()
                .context("Failed to load configured brackets")?,
        };

        debug!(policy = policy.as_str(), brackets = table.len(), "settings resolved");
        Ok(Self { policy, table })
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

/// Runs `command` and returns the text to print.
pub fn run(
    command: &Command,
    settings: &Settings,
) -> String {
    match command {
        Command::Tax { gross, household } => {
            let parts = Household::from(*household).parts(settings.policy);
            let result = TaxCalculator::new(&settings.table).calculate(parse_amount(gross), parts);
            info!(tax_due = %result.rounded_tax_due, "tax calculated");
            TaxReport::new(&settings.table, &result).to_string()
        }
        Command::Net {
            desired_net,
            household,
        } => {
            let parts = Household::from(*household).parts(settings.policy);
            let result =
                ReverseCalculator::new(&settings.table).calculate(parse_amount(desired_net), parts);
            info!(gross_income = %result.gross_income, "gross income calculated");
            TaxReport::new(&settings.table, &result).to_string()
        }
        Command::Parts { household } => {
            let parts = Household::from(*household).parts(settings.policy);
            format!("{} ({} policy)", parts.normalize(), settings.policy.as_str())
        }
        Command::Brackets => BracketListing(&settings.table).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn settings(policy: PartsPolicy) -> Settings {
        Settings {
            policy,
            table: BracketTable::france_2020(),
        }
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn parses_tax_command_with_household() {
        let cli = parse(&["impot", "tax", "30000", "--married", "--dependents", "3"]);

        match cli.command {
            Command::Tax { gross, household } => {
                assert_eq!(gross, "30000");
                assert!(household.married);
                assert_eq!(household.dependents, 3);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_negative_amount_and_dependents() {
        let cli = parse(&["impot", "net", "-500", "--dependents", "-2"]);

        match cli.command {
            Command::Net {
                desired_net,
                household,
            } => {
                assert_eq!(desired_net, "-500");
                assert_eq!(household.dependents, -2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_global_policy_flag() {
        let cli = parse(&["impot", "parts", "--policy", "flat"]);

        assert_eq!(cli.policy, Some(PartsPolicy::Flat));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["impot", "brackets", "--policy", "linear"]).is_err());
    }

    #[test]
    fn flag_overrides_config_policy() {
        let cli = parse(&["impot", "brackets", "--policy", "flat"]);
        let config = Config::default();

        let resolved = Settings::resolve(&cli, &config).unwrap();

        assert_eq!(resolved.policy, PartsPolicy::Flat);
        assert_eq!(resolved.table, BracketTable::france_2020());
    }

    #[test]
    fn missing_brackets_file_fails_to_resolve() {
        let cli = parse(&["impot", "brackets", "--brackets", "/no/such/brackets.csv"]);

        assert!(Settings::resolve(&cli, &Config::default()).is_err());
    }

    #[test]
    fn run_parts_reports_policy() {
        let command = Command::Parts {
            household: HouseholdArgs {
                married: true,
                dependents: 3,
            },
        };

        assert_eq!(run(&command, &settings(PartsPolicy::Capped)), "4 (capped policy)");
        assert_eq!(run(&command, &settings(PartsPolicy::Flat)), "3.5 (flat policy)");
    }

    #[test]
    fn run_tax_treats_garbage_as_zero() {
        let command = Command::Tax {
            gross: "not a number".to_string(),
            household: HouseholdArgs {
                married: false,
                dependents: 0,
            },
        };

        let output = run(&command, &settings(PartsPolicy::Capped));

        assert!(output.lines().next().unwrap().ends_with("0.00"));
        assert!(output.lines().last().unwrap().ends_with("0.00"));
    }

    #[test]
    fn run_net_reports_gross_income() {
        let command = Command::Net {
            desired_net: "26 982".to_string(),
            household: HouseholdArgs {
                married: false,
                dependents: 0,
            },
        };

        let output = run(&command, &settings(PartsPolicy::Capped));

        assert!(output.lines().next().unwrap().ends_with("30000.00"));
    }
}
