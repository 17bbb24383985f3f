use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kira_sabvqc::cli::{Cli, Commands, PatternsCommand, ScenariosCommand};
use kira_sabvqc::ctx::{Ctx, InputPaths};
use kira_sabvqc::io;
use kira_sabvqc::patterns::{PatternSet, load_pattern_set};
use kira_sabvqc::pipeline::{full_pipeline, validation_pipeline};
use kira_sabvqc::scenario::{ScenarioRegistry, load_registry};
use kira_sabvqc::validate::Severity;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let inputs = InputPaths {
                citations: args.citations,
                trials: args.trials,
                guidelines: args.guidelines,
            };
            let mut ctx = Ctx::new(inputs, args.out, args.json);
            ctx.pattern_path = args.patterns;
            ctx.scenario_path = args.scenarios;
            ctx.threads = args.threads;
            ctx.snippet_chars = args.snippet_chars;

            full_pipeline().run(&mut ctx)?;
            print_summary(&ctx)?;
        }
        Commands::Patterns(args) => match args.command {
            PatternsCommand::Show(show) => {
                let set = load_pattern_set(show.patterns.as_deref())?;
                print_pattern_groups(&set);
            }
        },
        Commands::Scenarios(args) => match args.command {
            ScenariosCommand::Show(show) => {
                let registry = load_registry(show.scenarios.as_deref())?;
                print_scenarios(&registry)?;
            }
        },
        Commands::Validate(args) => {
            let inputs = InputPaths {
                citations: args.citations,
                trials: args.trials,
                guidelines: args.guidelines,
            };
            let mut ctx = Ctx::new(inputs, PathBuf::from("."), false);
            validation_pipeline().run(&mut ctx)?;
            print_validate_summary(&ctx);

            let errors = ctx
                .validation
                .failed()
                .filter(|c| c.severity == Severity::Error)
                .count();
            if errors > 0 {
                bail!("validation failed: {} error check(s)", errors);
            }
        }
    }

    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) {
    let s = &ctx.summary;
    let status = if ctx.validation.has_errors() {
        "failed"
    } else {
        "ok"
    };
    println!("kira-sabvqc validate {}", status);
    println!("guidelines: {}", s.guidelines);
    println!("citations: {}", s.citations);
    println!("trials: {}", s.trials);
    println!("links: {}", s.exploded_links);
    println!("unique trials: {}", s.unique_trials);
    for check in &ctx.validation.checks {
        let mark = if check.passed { "pass" } else { "FAIL" };
        println!(
            "{}\t{}\t{}\t{}",
            mark,
            check.severity.as_str(),
            check.name,
            check.message
        );
    }
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}

fn print_pattern_groups(set: &PatternSet) {
    println!("pattern groups (version {}):", set.version);
    for group in &set.groups {
        println!(
            "{}\t{}\t{}",
            group.name,
            group.weight_class.as_str(),
            group.patterns.len()
        );
    }
}

fn print_scenarios(registry: &ScenarioRegistry) -> Result<()> {
    println!("scenarios (version {}):", registry.version);
    for def in registry.iter() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            def.name,
            def.label,
            def.data_source.as_str(),
            def.sex_verifiable,
            serde_json::to_string(&def.predicate)?
        );
    }
    Ok(())
}
