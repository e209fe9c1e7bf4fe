use crate::cli::context::{CommandError, CommandResult, LoopControl, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;

use super::{registry, CommandEntry};

const BUILD_HASH: &str = env!("HYDRATION_CORE_BUILD_HASH");
const BUILD_TIMESTAMP: &str = env!("HYDRATION_CORE_BUILD_TIMESTAMP");
const BUILD_TARGET: &str = env!("HYDRATION_CORE_BUILD_TARGET");

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "goal",
            "Show the daily goal and retention policy",
            "goal",
            cmd_goal,
        ),
        CommandEntry::new(
            "compact",
            "Drop entries older than the retention policy allows",
            "compact",
            cmd_compact,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_goal(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    io::print_info(format!("Daily goal: {}", context.tracker.goal()));
    io::print_info(format!("Retention : {}", context.config.retention.label()));
    io::print_info(format!(
        "Config    : {}",
        context.config_manager().config_path().display()
    ));
    Ok(LoopControl::Continue)
}

fn cmd_compact(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let policy = context.config.retention;
    let today = context.tracker.today();
    let removed = context
        .tracker
        .ledger()
        .store()
        .compact(policy, today)?;
    if removed == 0 {
        io::print_info(format!("Nothing to compact ({}).", policy.label()));
    } else {
        io::print_success(format!(
            "Removed {removed} expired day(s) ({}).",
            policy.label()
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section(format!("Hydration Core {}", env!("CARGO_PKG_VERSION")));
    io::print_info(format!("  Build hash : {}", BUILD_HASH));
    io::print_info(format!("  Built at   : {}", BUILD_TIMESTAMP));
    io::print_info(format!("  Target     : {}", BUILD_TARGET));
    Ok(LoopControl::Continue)
}

fn cmd_help(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output_section("Commands");
            for entry in registry() {
                io::print_info(format!("{:<28} {}", entry.usage, entry.description));
            }
        }
        [name] => {
            let entry = super::find(&name.to_ascii_lowercase()).ok_or_else(|| {
                CommandError::InvalidArguments(format!("no help for unknown command `{name}`"))
            })?;
            io::print_info(format!("{}: {}", entry.usage, entry.description));
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: help [command]".into(),
            ))
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Ok(LoopControl::Exit)
}
