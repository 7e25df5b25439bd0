//! Definition overview for the `inspect` command.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::InspectArgs,
    definition::{ColumnDefinition, Definition},
    table,
};

fn weight(value: i64) -> String {
    if value > 0 {
        value.to_string()
    } else {
        String::new()
    }
}

fn sort_flag(required: bool, column: &ColumnDefinition, scoped: bool) -> String {
    match (required, scoped) {
        (false, _) => String::new(),
        (true, false) => column.sort_order.to_string(),
        (true, true) => column.scope_sort_order.to_string(),
    }
}

pub fn column_rows(definition: &Definition) -> Vec<Vec<String>> {
    definition
        .columns()
        .iter()
        .map(|column| {
            vec![
                column.index.to_string(),
                column.name.clone(),
                column
                    .column_type
                    .map(|ty| ty.to_string())
                    .unwrap_or_default(),
                sort_flag(column.require_sort, column, false),
                sort_flag(column.scope_require_sort, column, true),
                weight(column.inline_weights),
                weight(column.raise_ranking),
                weight(column.scope_raise_ranking),
            ]
        })
        .collect()
}

pub fn strategy_rows(definition: &Definition) -> Vec<Vec<String>> {
    definition
        .sort_strategies()
        .into_iter()
        .map(|strategy| {
            let config = strategy
                .config()
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            vec![strategy.priority.to_string(), strategy.name, config]
        })
        .collect()
}

pub fn execute(args: &InspectArgs) -> Result<()> {
    let definition_path = &args.definition;
    let definition = Definition::load_file(definition_path)
        .with_context(|| format!("Loading definition from {definition_path:?}"))?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&definition.columns())
            .context("Serializing columns")?;
        println!("{rendered}");
        return Ok(());
    }

    table::print_table(
        &["#", "name", "type", "sort", "scope sort", "weights", "raise", "scope raise"],
        &column_rows(&definition),
    );
    println!();
    table::print_table(&["priority", "strategy", "config"], &strategy_rows(&definition));
    info!(
        "Listed {} column(s) and {} enabled strategy(ies) from {:?}",
        definition.column_count(),
        definition.sort_strategies().len(),
        definition_path
    );
    Ok(())
}
