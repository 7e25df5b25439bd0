use std::path::Path;

use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use log::{info, warn};

use crate::{
    cli::SortArgs,
    definition::Definition,
    io_utils,
    milestone::SprintSchedule,
    preprocess::run_pre_process_steps,
    strategy,
};

/// Loads a definition and refuses to continue while it has violations.
pub fn load_valid_definition(path: &Path) -> Result<Definition> {
    let definition = Definition::load_file(path)
        .with_context(|| format!("Loading definition from {path:?}"))?;
    let violations = definition.validate();
    if !violations.is_empty() {
        return Err(anyhow!(
            "Definition {path:?} has {} violation(s):\n{}",
            violations.len(),
            violations
                .iter()
                .enumerate()
                .map(|(idx, violation)| format!("{}. {violation}", idx + 1))
                .join("\n")
        ));
    }
    Ok(definition)
}

pub fn execute(args: &SortArgs) -> Result<()> {
    let delimiter = io_utils::resolve_delimiter(Some(args.input.as_path()), args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output_path = args.output.as_deref();
    info!(
        "Ranking '{}' -> {} (delimiter '{}')",
        args.input.display(),
        output_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into()),
        io_utils::printable_delimiter(delimiter)
    );

    let definition = load_valid_definition(&args.definition)?;
    let schedule = match &args.schedule {
        Some(path) => Some(
            SprintSchedule::load_file(path)
                .with_context(|| format!("Loading sprint schedule from {path:?}"))?,
        ),
        None => None,
    };

    let mut backlog = io_utils::read_backlog(
        &args.input,
        &definition,
        schedule.as_ref(),
        delimiter,
        encoding,
    )?;
    let report = run_pre_process_steps(&definition, &mut backlog.stories);
    for skipped in &report.skipped {
        warn!("Pre-process step '{skipped}' was not applied");
    }

    if args.dry_run {
        let excluded = backlog
            .stories
            .iter()
            .filter(|story| !story.needs_ranking())
            .count();
        let strategies = definition
            .sort_strategies()
            .into_iter()
            .map(|strategy| strategy.name)
            .join(" -> ");
        println!(
            "{} story(ies): {} to rank, {} excluded",
            backlog.stories.len(),
            backlog.stories.len() - excluded,
            excluded
        );
        println!(
            "strategies: {}",
            if strategies.is_empty() { "none" } else { strategies.as_str() }
        );
        info!("Dry run complete; no output written");
        return Ok(());
    }

    let ranked = strategy::rank(&definition, backlog.stories)
        .with_context(|| format!("Ranking stories from {:?}", args.input))?;
    io_utils::write_backlog(output_path, &backlog.headers, &ranked, delimiter)?;
    info!("Wrote {} ranked story(ies)", ranked.len());
    Ok(())
}

pub fn validate(definition_path: &Path) -> Result<()> {
    let definition = Definition::load_file(definition_path)
        .with_context(|| format!("Loading definition from {definition_path:?}"))?;
    let violations = definition.validate();
    if violations.is_empty() {
        println!("Definition {definition_path:?} is valid");
        info!(
            "{} column(s), {} enabled strategy(ies), {} enabled pre-process step(s)",
            definition.column_count(),
            definition.sort_strategies().len(),
            definition.pre_process_steps().len()
        );
        return Ok(());
    }
    for (idx, violation) in violations.iter().enumerate() {
        println!("{}. {violation}", idx + 1);
    }
    Err(anyhow!(
        "Definition {definition_path:?} has {} violation(s)",
        violations.len()
    ))
}
