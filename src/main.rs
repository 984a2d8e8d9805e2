use std::process::ExitCode;

use anyhow::Context;

use xml_compare::checker::{CheckStatus, CheckerConfig, FieldChecker};
use xml_compare::cli::{Cli, Command};
use xml_compare::comparator::{ComparisonMode, ComparisonOutcome, ResultCache};
use xml_compare::config::ConfigManager;
use xml_compare::output::Output;
use xml_compare::{explorer, schema_loader};
use xml_compare::file_discovery::FileDiscovery;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(&cli).await {
        Ok(differences_found) => {
            if differences_found {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Run the requested subcommand. Returns whether differences were found,
/// which drives the exit code.
async fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = ConfigManager::load_config(cli).await?;
    let output = Output::new(cli.verbosity());

    match &cli.command {
        Command::Compare { file1, file2, mode } => {
            let mode = ComparisonMode::parse(mode)?;

            let doc1 = tokio::fs::read_to_string(file1)
                .await
                .with_context(|| format!("cannot read {}", file1.display()))?;
            let doc2 = tokio::fs::read_to_string(file2)
                .await
                .with_context(|| format!("cannot read {}", file2.display()))?;

            let name1 = file1.display().to_string();
            let name2 = file2.display().to_string();

            let cache = ResultCache::new(config.cache.max_entries);
            let outcome = cache
                .compare_documents(&doc1, &doc2, &name1, &name2, mode)
                .await?;

            print!("{}", output.format_outcome(&outcome, &name1, &name2));

            let differences = match outcome.as_ref() {
                ComparisonOutcome::Structural(diff) => !diff.is_complete(),
                ComparisonOutcome::Values(diff) => !diff.mismatches.is_empty(),
            };
            Ok(differences)
        }

        Command::Check {
            path,
            required_fields,
            ..
        } => {
            let required = schema_loader::load_required_fields(required_fields).await?;

            let discovery = FileDiscovery::new()
                .with_extensions(config.files.extensions.clone())
                .with_include_patterns(config.files.include_patterns.clone())?
                .with_exclude_patterns(config.files.exclude_patterns.clone())?;
            let files = discovery.discover_files(path).await?;

            if files.is_empty() {
                eprintln!("No matching files found under {}", path.display());
                return Ok(false);
            }

            let checker = FieldChecker::new(
                required,
                CheckerConfig {
                    max_concurrent_checks: config.thread_count(),
                },
            )?;
            let results = checker.check_files(files).await?;

            print!("{}", output.format_check_results(&results));

            let problems = results.iter().any(|r| match &r.status {
                CheckStatus::Checked(report) => {
                    report.missing_counts.values().any(|count| *count > 0)
                }
                CheckStatus::Error { .. } => true,
            });
            Ok(problems)
        }

        Command::Explore { file, field } => {
            let doc = tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("cannot read {}", file.display()))?;
            let doc_ref = file.display().to_string();

            match field {
                Some(field) => {
                    let analysis = explorer::analyze_field(&doc, &doc_ref, field)?;
                    print!("{}", output.format_field_analysis(&analysis));
                }
                None => {
                    let names = explorer::collect_field_names(&doc, &doc_ref)?;
                    println!("Fields in {}:", doc_ref);
                    for name in names {
                        println!("  {}", name);
                    }
                }
            }
            Ok(false)
        }
    }
}
