//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Golden-file integration test driver for the accountd REST service
#[derive(Parser, Debug)]
#[command(name = "accountd-probe")]
#[command(version = "0.1.0")]
#[command(about = "Run golden-file integration tests against an accountd instance")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the test cases against a running instance
    Test(TestArgs),

    /// List available test cases and profiles
    List(ListArgs),

    /// Manage the ephemeral container stack
    Stack(StackArgs),

    /// View stored test results
    Results(ResultsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Target host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Target port
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Specific test number to run (1-9)
    #[arg(short, long)]
    pub test: Option<u8>,

    /// Suite profile to run (smoke, errors, all, ...)
    #[arg(long)]
    pub profile: Option<String>,

    /// Number of test rounds
    #[arg(short, long, default_value = "1")]
    pub rounds: u32,

    /// Regenerate golden files instead of comparing
    #[arg(short, long)]
    pub update: bool,

    /// Provision the container stack first, tear it down afterwards
    #[arg(long)]
    pub stack: bool,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Skip specific tests (comma-separated test numbers)
    #[arg(long)]
    pub skip: Option<String>,

    /// Directory holding the .golden files
    #[arg(long, default_value = "testdata")]
    pub testdata: String,

    /// Save results to file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Do not persist the run to results storage
    #[arg(long)]
    pub no_store: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show detailed test information
    #[arg(short, long)]
    pub detailed: bool,

    /// Show stack and suite profiles
    #[arg(short, long)]
    pub profiles: bool,
}

/// Arguments for stack management
#[derive(Parser, Debug)]
pub struct StackArgs {
    #[command(subcommand)]
    pub action: StackAction,
}

#[derive(Subcommand, Debug)]
pub enum StackAction {
    /// Start the database and service containers
    Up {
        /// PostgreSQL image
        #[arg(long, default_value = "postgres:16-alpine")]
        db_image: String,

        /// accountd image
        #[arg(long, default_value = "accountd:latest")]
        service_image: String,

        /// Host port mapped to the service
        #[arg(long, default_value = "8080")]
        http_port: u16,

        /// Host port mapped to the database
        #[arg(long, default_value = "54329")]
        db_port: u16,

        /// Skip waiting for readiness after start
        #[arg(long)]
        no_wait: bool,
    },

    /// Remove the containers and network unconditionally
    Down,

    /// Show container states
    Status,

    /// Re-apply schema and seed data
    Init,

    /// Check stack health
    Health {
        /// Target host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Target port
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Run pre-flight checks
    Preflight,

    /// Emit the stack as a docker-compose manifest
    Compose {
        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Arguments for results command
#[derive(Parser, Debug)]
pub struct ResultsArgs {
    /// Filter by target (base URL)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Export latest run to file (.json, .csv, .md)
    #[arg(short, long)]
    pub export: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "./accountd-probe.yaml")]
        output: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Show environment variable configuration
        #[arg(short, long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        file: Option<String>,
    },

    /// List stack and suite profiles
    Profiles {
        /// Show stack profiles only
        #[arg(long)]
        stacks: bool,

        /// Show suite profiles only
        #[arg(long)]
        suites: bool,

        /// Show detailed profile information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show a single profile
    Profile {
        /// Profile name
        name: String,

        /// Profile type (stack, suite)
        #[arg(short = 't', long, default_value = "suite")]
        profile_type: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. app.default_host)
        key: String,

        /// New value
        value: String,

        /// Configuration file path
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,

        /// Configuration file path
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Print environment variable help
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["accountd-probe", "list", "--detailed"]);
        match args.command {
            Command::List(list_args) => {
                assert!(list_args.detailed);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_test_args() {
        let args = Args::parse_from([
            "accountd-probe",
            "test",
            "--host",
            "10.0.0.5",
            "--rounds",
            "10",
            "--update",
        ]);
        match args.command {
            Command::Test(test_args) => {
                assert_eq!(test_args.host, "10.0.0.5");
                assert_eq!(test_args.rounds, 10);
                assert!(test_args.update);
                assert!(!test_args.stack);
            }
            _ => panic!("Expected Test command"),
        }
    }

    #[test]
    fn test_stack_up_args() {
        let args = Args::parse_from([
            "accountd-probe",
            "stack",
            "up",
            "--db-image",
            "postgres:15-alpine",
        ]);
        match args.command {
            Command::Stack(stack_args) => match stack_args.action {
                StackAction::Up { db_image, .. } => {
                    assert_eq!(db_image, "postgres:15-alpine");
                }
                _ => panic!("Expected Up action"),
            },
            _ => panic!("Expected Stack command"),
        }
    }
}
