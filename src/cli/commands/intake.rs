use crate::cli::context::{print_weekly, CommandError, CommandResult, LoopControl, ShellContext};
use crate::cli::io;
use crate::ledger::DateKey;

use super::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "date",
            "Select the day to record against",
            "date [YYYY-MM-DD|today]",
            cmd_date,
        ),
        CommandEntry::new(
            "add",
            "Add milliliters to the selected day",
            "add <ml>",
            cmd_add,
        ),
        CommandEntry::new(
            "show",
            "Show the selected day's progress",
            "show",
            cmd_show,
        ),
        CommandEntry::new(
            "week",
            "Total the seven days ending at a date",
            "week [YYYY-MM-DD]",
            cmd_week,
        ),
    ]
}

fn parse_date_arg(context: &ShellContext, raw: &str) -> Result<DateKey, CommandError> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(context.tracker.today());
    }
    Ok(DateKey::parse(raw)?)
}

fn cmd_date(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            io::print_info(format!("Selected date: {}", context.selected));
        }
        [raw] => {
            let date = parse_date_arg(context, raw)?;
            context.select_date(date)?;
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: date [YYYY-MM-DD|today]".into(),
            ))
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = match args {
        [raw] => *raw,
        _ => return Err(CommandError::InvalidArguments("usage: add <ml>".into())),
    };
    let date = context.selected;
    let summary = context.tracker.on_amount_submitted(date, raw)?;
    match summary.notice() {
        Some(notice) => io::print_success(notice),
        None => io::print_success(format!("Added {} ml.", raw.trim())),
    }
    context.show_summary(&summary);
    context.show_weekly(date)?;
    Ok(LoopControl::Continue)
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(CommandError::InvalidArguments("usage: show".into()));
    }
    let summary = context.tracker.on_date_selected(context.selected);
    context.show_summary(&summary);
    Ok(LoopControl::Continue)
}

fn cmd_week(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let anchor = match args {
        [] => context.selected,
        [raw] => parse_date_arg(context, raw)?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: week [YYYY-MM-DD]".into(),
            ))
        }
    };
    let report = context.tracker.on_weekly_report_requested(anchor)?;
    for day in report.window.iter() {
        let total = context.tracker.ledger().get_intake(day);
        io::print_info(format!("{day}  {total:>6} ml"));
    }
    print_weekly(&report);
    Ok(LoopControl::Continue)
}
