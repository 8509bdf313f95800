//! accountd-probe - Golden-file integration test driver for accountd
//!
//! A CLI tool that provisions an ephemeral database + service stack,
//! fires the fixed request table against the running instance, and
//! compares response bodies against recorded golden files.
//!
//! ## Features
//!
//! - 9 table-driven test cases covering the /users CRUD surface
//! - Golden-file comparison with an update mode for regenerating references
//! - Ephemeral PostgreSQL + accountd containers with bounded-retry bootstrap
//! - Multiple output formats (Table, JSON, CSV)
//! - Persistent run storage with reports and exports
//!
//! ## Usage
//!
//! ```bash
//! # Run all cases against a running instance
//! accountd-probe test --host 127.0.0.1 --port 8080
//!
//! # Provision containers, test, tear down
//! accountd-probe test --stack
//!
//! # Regenerate golden files
//! accountd-probe test --update
//!
//! # Run a single case
//! accountd-probe test --test 4
//!
//! # Manage the stack by hand
//! accountd-probe stack up
//! accountd-probe stack status
//! accountd-probe stack down
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod cli;
mod config;
mod executor;
mod golden;
mod http;
mod models;
mod output;
mod results;
mod stack;
mod suite;
mod utils;

use cli::Args;
use executor::{AggregateResult, SuiteRunner};
use models::{SuiteConfig, TargetConfig, TestCase, TestRoundSummary};
use output::{OutputFormat, ResultFormatter};
use stack::{HealthCheckConfig, HealthChecker, Stack, StackConfig};
use utils::LogLevel;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    utils::init_logger(level);

    match args.command {
        cli::Command::Test(test_args) => {
            run_tests(test_args).await?;
        }
        cli::Command::List(list_args) => {
            list_tests(list_args);
        }
        cli::Command::Stack(stack_args) => {
            manage_stack(stack_args).await?;
        }
        cli::Command::Results(results_args) => {
            show_results(results_args)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args)?;
        }
    }

    Ok(())
}

async fn run_tests(args: cli::TestArgs) -> Result<()> {
    let env = config::EnvConfig::load();

    let target = TargetConfig::new(env.host_or(&args.host), env.port_or(args.port));

    let mut suite_config = SuiteConfig::new(target.clone())
        .with_rounds(env.rounds_or(args.rounds))
        .with_timeout(env.timeout_or(args.timeout))
        .update_golden(env.update.unwrap_or(args.update))
        .with_testdata_dir(env.testdata.clone().unwrap_or(args.testdata.clone()));

    if let Some(skip) = &args.skip {
        for part in skip.split(',') {
            match part.trim().parse::<u8>() {
                Ok(n) => suite_config = suite_config.skip_test(n),
                Err(_) => warn!("Ignoring invalid skip entry: {part}"),
            }
        }
    }

    let format_name = env.format.clone().unwrap_or(args.format.clone());
    let formatter =
        ResultFormatter::new(OutputFormat::from_str(&format_name).unwrap_or(OutputFormat::Table));

    info!(
        "Testing accountd at {} ({} rounds{})",
        target,
        suite_config.rounds,
        if suite_config.update_golden {
            ", updating golden files"
        } else {
            ""
        }
    );

    let all_passed = if args.stack {
        let stack_config = stack_config_from_env(&env).http_port(target.port);
        let probe_stack = Stack::new(stack_config);

        // Teardown runs in every exit path once the stack started
        if let Err(e) = probe_stack.up().await {
            probe_stack.down().await;
            return Err(e);
        }

        let checker = HealthChecker::new(HealthCheckConfig::default())?;
        let status = checker.wait_ready(probe_stack.config(), &target).await?;

        if !status.healthy {
            println!("{}", status.format_table());
            if let Ok(logs) = probe_stack.service_logs(50).await {
                println!("Last service logs:\n{logs}");
            }
            probe_stack.down().await;
            anyhow::bail!("stack did not become healthy: {}", status.message);
        }

        let outcome = execute_suite(&args, suite_config, &formatter).await;
        probe_stack.down().await;
        outcome?
    } else {
        execute_suite(&args, suite_config, &formatter).await?
    };

    if !all_passed {
        std::process::exit(1);
    }

    Ok(())
}

/// Run the requested cases and report whether every round passed.
async fn execute_suite(
    args: &cli::TestArgs,
    suite_config: SuiteConfig,
    formatter: &ResultFormatter,
) -> Result<bool> {
    let rounds = suite_config.rounds;
    let runner = SuiteRunner::new(suite_config)?;

    let mut summaries: Vec<TestRoundSummary> = Vec::new();

    if let Some(test_num) = args.test {
        let test_case = TestCase::from_number(test_num)
            .ok_or_else(|| anyhow::anyhow!("Invalid test number: {test_num}"))?;
        let result = runner.run_test(test_case).await;
        println!("{}", formatter.format_result(&result));
        summaries.push(TestRoundSummary::new(
            1,
            runner.config().target.base_url(),
            vec![result],
        ));
    } else if let Some(profile_name) = &args.profile {
        let profile = config::SuiteProfile::find(profile_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown suite profile: {profile_name}"))?;
        let summary = runner.run_tests(&profile.cases()).await?;
        println!("{}", formatter.format_summary(&summary));
        summaries.push(summary);
    } else if rounds > 1 {
        let round_summaries = runner.run_rounds(rounds).await?;
        for summary in &round_summaries {
            println!("{}", formatter.format_summary(summary));
        }

        let aggregate = AggregateResult::from_summaries(&round_summaries);
        println!(
            "{}",
            formatter.format_aggregate(&aggregate, &runner.config().target.base_url())
        );
        summaries.extend(round_summaries);
    } else {
        let summary = runner.run_all().await?;
        println!("{}", formatter.format_summary(&summary));
        summaries.push(summary);
    }

    // Save results to file if requested
    if let Some(output_path) = &args.output {
        if let Some(summary) = summaries.last() {
            let format = OutputFormat::from_str(&args.format).unwrap_or(OutputFormat::Table);
            output::write_results_to_file(output_path, summary, format)?;
            println!("Results written to: {output_path}");
        }
    }

    // Persist the run
    if !args.no_store {
        store_run(&runner, &summaries)?;
    }

    Ok(summaries.iter().all(|s| s.is_all_passed()))
}

fn store_run(runner: &SuiteRunner, summaries: &[TestRoundSummary]) -> Result<()> {
    use results::{ResultsStorage, StoredTestRun, TestRunConfig};

    let config = runner.config();

    let mut run = StoredTestRun::new(config.target.base_url())
        .with_config(TestRunConfig {
            host: config.target.host.clone(),
            port: config.target.port,
            timeout_secs: config.timeout_secs,
            testdata_dir: config.testdata_dir.display().to_string(),
            skipped_tests: config.skip_tests.clone(),
        })
        .with_updated_golden(config.update_golden);

    for summary in summaries {
        run.add_round(summary.round, summary);
    }
    run.calculate_aggregate();

    let storage = ResultsStorage::default_dir()?;
    let path = storage.save(&run)?;
    info!("Run stored as {} ({})", run.id, path.display());

    Ok(())
}

fn stack_config_from_env(env: &config::EnvConfig) -> StackConfig {
    let mut config = StackConfig::new();
    if let Some(db_image) = &env.db_image {
        config = config.db_image(db_image);
    }
    if let Some(service_image) = &env.service_image {
        config = config.service_image(service_image);
    }
    config
}

fn list_tests(args: cli::ListArgs) {
    println!("\naccountd Test Cases (9 total)\n");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut current_category = "";

    for row in suite::all_cases() {
        let category = row.case.category();
        if category != current_category {
            if !current_category.is_empty() {
                println!();
            }
            println!("\n{category} Tests:");
            println!("──────────────────────────────────────────────────────────────────────");
            current_category = category;
        }

        if args.detailed {
            println!(
                "  {:2}. {:22} {:6} {:14} expect {} -> {}.golden",
                row.case.number(),
                row.case.name(),
                row.method,
                row.path,
                row.expected_status,
                row.case.golden_name()
            );
        } else {
            println!("  {:2}. {}", row.case.number(), row.case.name());
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    if args.profiles {
        let manager = config::ProfileManager::new();

        println!("Suite Profiles:\n");
        for profile in manager.list_suite_profiles() {
            println!(
                "  {:12} - {} ({} tests)",
                profile.name,
                profile.description,
                profile.tests.len()
            );
        }

        println!("\nStack Profiles:\n");
        for profile in manager.list_stack_profiles() {
            println!(
                "  {:12} - db {} / svc {}",
                profile.name, profile.db_image, profile.service_image
            );
        }
        println!();
    }
}

async fn manage_stack(args: cli::StackArgs) -> Result<()> {
    use stack::{ComposeGenerator, PreFlightChecker};

    match args.action {
        cli::StackAction::Up {
            db_image,
            service_image,
            http_port,
            db_port,
            no_wait,
        } => {
            let stack_config = StackConfig::new()
                .db_image(db_image)
                .service_image(service_image)
                .http_port(http_port)
                .db_port(db_port);

            let target = TargetConfig::new("127.0.0.1", http_port);
            let probe_stack = Stack::new(stack_config);

            if let Err(e) = probe_stack.up().await {
                println!("✗ Stack start failed: {e}");
                probe_stack.down().await;
                return Err(e);
            }

            if !no_wait {
                let checker = HealthChecker::new(HealthCheckConfig::default())?;
                let status = checker.wait_ready(probe_stack.config(), &target).await?;
                println!("{}", status.format_table());

                if !status.healthy {
                    probe_stack.down().await;
                    anyhow::bail!("stack did not become healthy: {}", status.message);
                }
            }

            println!("✓ Stack is up");
            println!("  Service: {}", target.base_url());
            println!(
                "  Database: 127.0.0.1:{}",
                probe_stack.config().db_port
            );
        }

        cli::StackAction::Down => {
            let probe_stack = Stack::new(StackConfig::new());
            probe_stack.down().await;
            println!("✓ Stack removed");
        }

        cli::StackAction::Status => {
            let probe_stack = Stack::new(StackConfig::new());
            let statuses = probe_stack.status().await;

            println!("\n┌─────────────────────────────────────────────────────────────┐");
            println!("│ Stack Containers                                            │");
            println!("├─────────────────────────┬──────────┬────────────────────────┤");
            println!("│ Name                    │ State    │ Image                  │");
            println!("├─────────────────────────┼──────────┼────────────────────────┤");

            for status in statuses {
                let state = status.state.as_deref().unwrap_or("absent");
                println!(
                    "│ {:23} │ {:8} │ {:22} │",
                    status.name, state, status.image
                );
            }

            println!("└─────────────────────────┴──────────┴────────────────────────┘\n");
        }

        cli::StackAction::Init => {
            let probe_stack = Stack::new(StackConfig::new());
            probe_stack.init_db().await?;
            println!("✓ Database schema and seed data applied");
        }

        cli::StackAction::Health { host, port } => {
            let target = TargetConfig::new(host, port);
            let checker = HealthChecker::new(HealthCheckConfig::default())?;
            let status = checker.check_stack(&StackConfig::new(), &target).await;
            println!("{}", status.format_table());
        }

        cli::StackAction::Preflight => {
            let checker = PreFlightChecker::new();
            let result = checker.run(&StackConfig::new()).await;
            println!("{}", result.format_table());

            if !result.passed {
                std::process::exit(1);
            }
        }

        cli::StackAction::Compose { format, output } => {
            let generator = ComposeGenerator::new(StackConfig::new());
            let manifest = generator.compose();

            let rendered = if format == "json" {
                ComposeGenerator::to_json(&manifest)
            } else {
                ComposeGenerator::to_yaml(&manifest)
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, &rendered)?;
                    println!("✓ Compose manifest written to: {path}");
                }
                None => println!("{rendered}"),
            }
        }
    }

    Ok(())
}

fn show_results(args: cli::ResultsArgs) -> Result<()> {
    use results::{ExportFormat, ReportFormat, ReportGenerator, ResultsStorage};
    use std::path::PathBuf;

    let storage = ResultsStorage::default_dir()?;

    // List targets if no specific target requested
    let Some(target) = &args.target else {
        let targets = storage.list_targets()?;

        if targets.is_empty() {
            println!("\nNo stored results found.");
            println!("Run tests with: accountd-probe test --host <host> --port <port>");
            return Ok(());
        }

        println!("\n┌─────────────────────────────────────────────────────────────┐");
        println!("│ Stored Test Results                                          │");
        println!("├─────────────────────────────────────────────────────────────┤");

        for target in &targets {
            let runs = storage.list_runs(target)?;
            if !runs.is_empty() {
                let latest = &runs[0];
                println!(
                    "│ {:25} │ {:3} runs │ Latest: {:5.1}% │",
                    target,
                    runs.len(),
                    latest.pass_rate * 100.0
                );
            }
        }

        println!("└─────────────────────────────────────────────────────────────┘");
        println!("\nUse --target <base-url> to view details for a specific target.\n");

        return Ok(());
    };

    let runs = storage.load_target(target)?;

    if runs.is_empty() {
        println!("No results found for target: {target}");
        return Ok(());
    }

    let latest = &runs[0];

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(latest)?);
        }
        _ => {
            println!("\n┌─────────────────────────────────────────────────────────────┐");
            println!("│ Target: {:51} │", latest.target);
            println!("├─────────────────────────────────────────────────────────────┤");
            println!("│ Run ID: {:51} │", latest.id);
            println!("│ Rounds: {:51} │", latest.rounds);

            if let Some(agg) = &latest.aggregate {
                println!("├─────────────────────────────────────────────────────────────┤");
                println!("│ Pass Rate: {:47.1}% │", agg.avg_pass_rate * 100.0);
                println!("│ Avg Duration: {:44}ms │", agg.avg_duration_ms);
                println!("├─────────────────────────────────────────────────────────────┤");
                println!("│ {:30} {:>8} {:>10}        │", "Test", "Pass%", "Avg(ms)");
                println!("├─────────────────────────────────────────────────────────────┤");

                for (name, stats) in &agg.test_stats {
                    println!(
                        "│ {:30} {:>7.1}% {:>10}        │",
                        name,
                        stats.pass_rate * 100.0,
                        stats.avg_duration_ms
                    );
                }
            }

            println!("└─────────────────────────────────────────────────────────────┘");

            // Show other runs
            if runs.len() > 1 {
                println!("\nOther runs ({}):", runs.len() - 1);
                for run in runs.iter().skip(1).take(5) {
                    let pass_rate = run
                        .aggregate
                        .as_ref()
                        .map(|a| format!("{:.1}%", a.avg_pass_rate * 100.0))
                        .unwrap_or_else(|| "N/A".to_string());
                    println!("  - {} | {} round(s) | {}", run.id, run.rounds, pass_rate);
                }
            }
        }
    }

    // Export if requested
    if let Some(export_path) = &args.export {
        let path = PathBuf::from(export_path);
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        if let Some(report_format) = ReportFormat::from_str(extension) {
            let generator = ReportGenerator::new(storage);
            let report = generator.run_report(latest, report_format);
            std::fs::write(&path, report)?;
        } else {
            let format = ExportFormat::from_extension(&path).unwrap_or(ExportFormat::Json);
            storage.export(latest, &path, format)?;
        }

        println!("\n✓ Exported to: {}", path.display());
    }

    Ok(())
}

fn manage_config(args: cli::ConfigArgs) -> Result<()> {
    use config::{ConfigFile, EnvConfig, ProfileManager, StackProfile, SuiteProfile};
    use std::path::Path;

    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = Path::new(&output);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {output}. Use --force to overwrite."
                );
            }

            let config = ConfigFile::example();
            config.save(path)?;
            println!("✓ Configuration file created: {output}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { env, format } => {
            if env {
                let env_config = EnvConfig::load();
                env_config.print_summary();
            } else {
                let config = ConfigFile::load_default()?;
                let output = if format == "json" {
                    serde_json::to_string_pretty(&config)?
                } else {
                    serde_yaml::to_string(&config)?
                };
                println!("{output}");
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file.unwrap_or_else(|| {
                ConfigFile::find()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| "./accountd-probe.yaml".to_string())
            });

            match ConfigFile::load(&path) {
                Ok(_) => {
                    println!("✓ Configuration file is valid: {path}");
                }
                Err(e) => {
                    println!("✗ Configuration file is invalid: {path}");
                    println!("  Error: {e}");
                    return Err(e);
                }
            }
        }

        cli::ConfigAction::Profiles {
            stacks,
            suites,
            detailed,
        } => {
            let manager = ProfileManager::new();

            let show_stacks = stacks || !suites;
            let show_suites = suites || !stacks;

            if show_stacks {
                println!("Stack Profiles:");
                println!("{:-<60}", "");
                for profile in manager.list_stack_profiles() {
                    if detailed {
                        println!("  {}", profile.name);
                        println!("    Database: {}", profile.db_image);
                        println!("    Service: {}", profile.service_image);
                        println!(
                            "    Ports: HTTP={}, DB={}",
                            profile.http_port, profile.db_port
                        );
                        println!();
                    } else {
                        println!("  {:20} - db {}", profile.name, profile.db_image);
                    }
                }
                println!();
            }

            if show_suites {
                println!("Suite Profiles:");
                println!("{:-<60}", "");
                for profile in manager.list_suite_profiles() {
                    if detailed {
                        println!("  {}", profile.name);
                        println!("    Description: {}", profile.description);
                        println!("    Tests: {:?}", profile.tests);
                        println!("    Rounds: {}", profile.rounds);
                        println!("    Tags: {:?}", profile.tags);
                        println!();
                    } else {
                        println!(
                            "  {:20} - {} ({} tests)",
                            profile.name,
                            profile.description,
                            profile.tests.len()
                        );
                    }
                }
            }
        }

        cli::ConfigAction::Profile { name, profile_type } => match profile_type.as_str() {
            "stack" => {
                if let Some(profile) = StackProfile::find(&name) {
                    println!("{}", serde_yaml::to_string(&profile)?);
                } else {
                    println!("Stack profile not found: {name}");
                    println!("\nAvailable profiles:");
                    for p in StackProfile::predefined() {
                        println!("  - {}", p.name);
                    }
                }
            }
            "suite" => {
                if let Some(profile) = SuiteProfile::find(&name) {
                    println!("{}", serde_yaml::to_string(&profile)?);
                } else {
                    println!("Suite profile not found: {name}");
                    println!("\nAvailable profiles:");
                    for p in SuiteProfile::predefined() {
                        println!("  - {}", p.name);
                    }
                }
            }
            _ => {
                println!("Unknown profile type: {profile_type}. Use 'stack' or 'suite'.");
            }
        },

        cli::ConfigAction::Set { key, value, file } => {
            let path = file.unwrap_or_else(|| "./accountd-probe.yaml".to_string());
            let mut config = if Path::new(&path).exists() {
                ConfigFile::load(&path)?
            } else {
                ConfigFile::default()
            };

            let value_display = value.clone();

            // Set value based on key
            match key.as_str() {
                "app.default_host" => config.app.default_host = value,
                "app.default_port" => config.app.default_port = value.parse()?,
                "app.default_rounds" => config.app.default_rounds = value.parse()?,
                "app.timeout_secs" => config.app.timeout_secs = value.parse()?,
                "app.testdata_dir" => config.app.testdata_dir = value,
                "stack.db_image" => config.app.stack.db_image = value,
                "stack.service_image" => config.app.stack.service_image = value,
                "stack.init_attempts" => config.app.stack.init_attempts = value.parse()?,
                "stack.init_interval_secs" => {
                    config.app.stack.init_interval_secs = value.parse()?
                }
                _ => {
                    anyhow::bail!("Unknown configuration key: {key}");
                }
            }

            config.save(&path)?;
            println!("✓ Set {key} = {value_display} in {path}");
        }

        cli::ConfigAction::Get { key, file } => {
            let config = if let Some(path) = file {
                ConfigFile::load(&path)?
            } else {
                ConfigFile::load_default()?
            };

            let value = match key.as_str() {
                "app.default_host" => config.app.default_host.clone(),
                "app.default_port" => config.app.default_port.to_string(),
                "app.default_rounds" => config.app.default_rounds.to_string(),
                "app.timeout_secs" => config.app.timeout_secs.to_string(),
                "app.testdata_dir" => config.app.testdata_dir.clone(),
                "stack.db_image" => config.app.stack.db_image.clone(),
                "stack.service_image" => config.app.stack.service_image.clone(),
                "stack.init_attempts" => config.app.stack.init_attempts.to_string(),
                "stack.init_interval_secs" => config.app.stack.init_interval_secs.to_string(),
                _ => {
                    anyhow::bail!("Unknown configuration key: {key}");
                }
            };

            println!("{value}");
        }

        cli::ConfigAction::Env => {
            config::env::print_env_help();
        }
    }

    Ok(())
}
