use std::{fs, io::IsTerminal, path::Path};

use chrono::{Local, NaiveDate};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::core::services::{AggregationService, SelectionQuery, SelectionService};
use crate::domain::{
    parse_date, period_title, reference_for_today, shift_period, window_for, Granularity,
    TransactionDraft, TransactionId,
};
use crate::errors::{CliError, ExpenseError};
use crate::utils::{build_info, exchange};

use super::context::CliContext;
use super::output;
use super::{AddArgs, ChartArgs, Command, ConfigAction, EditArgs, PeriodArgs, ViewArgs};

pub fn dispatch(context: &mut CliContext, command: Command) -> Result<(), CliError> {
    match command {
        Command::Add(args) => cmd_add(context, args),
        Command::Edit(args) => cmd_edit(context, args),
        Command::Delete { id, yes } => cmd_delete(context, &id, yes),
        Command::List(args) => cmd_list(context, &args),
        Command::Chart(args) => cmd_chart(context, &args),
        Command::Period(args) => cmd_period(context, &args),
        Command::Export { dir } => cmd_export(context, dir.as_deref()),
        Command::Import { file } => cmd_import(context, &file),
        Command::Config { action } => cmd_config(context, action),
        Command::Version => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
    }
}

fn cmd_add(context: &mut CliContext, args: AddArgs) -> Result<(), CliError> {
    let date = match args.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Local::now().naive_local(),
    };
    let transaction = TransactionDraft {
        title: args.title,
        description: args.description,
        amount: args.amount,
        date,
        kind: args.kind,
    }
    .into_transaction()?;
    let symbol = context.symbol().to_string();
    context.store.add(transaction.clone())?;
    println!("{} {}", "Added".green(), output::render_row(&transaction, &symbol));
    Ok(())
}

fn cmd_edit(context: &mut CliContext, args: EditArgs) -> Result<(), CliError> {
    let id = TransactionId::from(args.id);
    let existing = context
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| ExpenseError::TransactionNotFound(id.clone()))?;

    let mut draft = TransactionDraft::from_transaction(&existing);
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(amount) = args.amount {
        draft.amount = amount;
    }
    if let Some(raw) = args.date.as_deref() {
        draft.date = parse_date(raw)?;
    }
    if let Some(kind) = args.kind {
        draft.kind = kind;
    }

    let updated = draft.apply_to(&existing)?;
    let symbol = context.symbol().to_string();
    context.store.update(updated.clone())?;
    println!("{} {}", "Updated".green(), output::render_row(&updated, &symbol));
    Ok(())
}

fn cmd_delete(context: &mut CliContext, id: &str, yes: bool) -> Result<(), CliError> {
    let id = TransactionId::from(id);
    let Some(existing) = context.store.get(&id) else {
        return Err(ExpenseError::TransactionNotFound(id).into());
    };

    if !yes {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::Cancelled(
                "refusing to delete without confirmation; pass --yes".into(),
            ));
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete `{}`?", existing.title))
            .default(false)
            .interact()?;
        if !confirmed {
            return Err(CliError::Cancelled("delete aborted".into()));
        }
    }

    let removed = context.store.remove(&id)?;
    println!("{} {}", "Deleted".yellow(), removed.title);
    Ok(())
}

fn cmd_list(context: &CliContext, args: &ViewArgs) -> Result<(), CliError> {
    let query = build_query(context, args)?;
    let selection = SelectionService::select(context.store.list(), &query);
    let symbol = context.symbol();

    print_header(query.reference, query.granularity);
    for line in output::render_list(&selection, symbol) {
        println!("{line}");
    }
    println!("{}", output::render_totals(&selection.totals, symbol));
    Ok(())
}

fn cmd_chart(context: &CliContext, args: &ChartArgs) -> Result<(), CliError> {
    let query = build_query(context, &args.view)?;
    let cap = args.cap.or(context.config.chart_cap);
    if let Some(limit) = cap {
        if !limit.is_finite() || limit <= 0.0 {
            return Err(CliError::Input("--cap must be a positive number".into()));
        }
    }

    let selection = SelectionService::select(context.store.list(), &query);
    let series = AggregationService::build_buckets(
        &selection.transactions,
        &query.reference,
        query.granularity,
        query.type_filter,
    );
    let symbol = context.symbol();

    print_header(query.reference, query.granularity);
    for line in output::render_chart(&series, cap, symbol) {
        println!("{line}");
    }
    println!("Total: {}", output::format_money(series.total(), symbol));
    Ok(())
}

fn cmd_period(context: &CliContext, args: &PeriodArgs) -> Result<(), CliError> {
    let granularity = args.view.unwrap_or(context.config.default_view);
    let reference = resolve_reference(args.date.as_deref(), granularity, args.prev, args.next)?;
    let window = window_for(&reference, granularity);
    println!("{}", period_title(&reference, granularity).bold());
    println!("Start: {}", window.start.format("%Y-%m-%d"));
    println!("End:   {}", window.end.format("%Y-%m-%d"));
    println!("Days:  {}", window.days());
    Ok(())
}

fn cmd_export(context: &CliContext, dir: Option<&Path>) -> Result<(), CliError> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => context.export_dir(),
    };
    fs::create_dir_all(&dir)?;
    let path = exchange::export_to_dir(context.store.list(), &dir, Local::now().date_naive())?;
    println!(
        "Exported {} transactions to {}",
        context.store.len(),
        path.display()
    );
    Ok(())
}

fn cmd_import(context: &mut CliContext, file: &Path) -> Result<(), CliError> {
    let report = exchange::import_from_path(&mut context.store, file)?;
    println!("Imported {} transactions", report.transactions.len());
    for skipped in &report.skipped {
        println!(
            "{} record {}: {}",
            "Skipped".yellow(),
            skipped.index,
            skipped.reason
        );
    }
    Ok(())
}

fn cmd_config(context: &mut CliContext, action: ConfigAction) -> Result<(), CliError> {
    match action {
        ConfigAction::Show => {
            let config = &context.config;
            println!("currency_symbol: {}", config.currency_symbol);
            println!("default_view: {}", config.default_view);
            println!("default_type_filter: {}", config.default_type_filter);
            println!("default_sort_field: {}", config.default_sort_field);
            println!("default_sort_direction: {}", config.default_sort_direction);
            match config.chart_cap {
                Some(cap) => println!("chart_cap: {cap}"),
                None => println!("chart_cap: none"),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            context.config.set_value(&key, &value)?;
            context.save_config()?;
            println!("{} {key} = {value}", "Saved".green());
            Ok(())
        }
    }
}

fn print_header(reference: NaiveDate, granularity: Granularity) {
    let window = window_for(&reference, granularity);
    println!(
        "{} ({} .. {})",
        period_title(&reference, granularity).bold(),
        window.start.format("%b %-d, %Y"),
        window.end.format("%b %-d, %Y")
    );
}

fn build_query(context: &CliContext, args: &ViewArgs) -> Result<SelectionQuery, CliError> {
    let config = &context.config;
    let granularity = args.view.unwrap_or(config.default_view);
    let reference = resolve_reference(args.date.as_deref(), granularity, args.prev, args.next)?;
    Ok(SelectionQuery::new(reference)
        .keyword(args.keyword.clone().unwrap_or_default())
        .type_filter(args.type_filter.unwrap_or(config.default_type_filter))
        .granularity(granularity)
        .sort(
            args.sort.unwrap_or(config.default_sort_field),
            args.order.unwrap_or(config.default_sort_direction),
        ))
}

/// Explicit date, or today (moved into the next financial month from the
/// 26th on), then shifted by `next - prev` periods.
fn resolve_reference(
    date: Option<&str>,
    granularity: Granularity,
    prev: u32,
    next: u32,
) -> Result<NaiveDate, CliError> {
    let base = match date {
        Some(raw) => parse_date(raw)?.date(),
        None => {
            let today = Local::now().date_naive();
            match granularity {
                Granularity::Month => reference_for_today(today),
                Granularity::Year => today,
            }
        }
    };
    let steps = i32::try_from(i64::from(next) - i64::from(prev))
        .map_err(|_| CliError::Input("too many navigation steps".into()))?;
    Ok(shift_period(base, granularity, steps))
}
