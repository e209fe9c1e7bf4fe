mod intake;
mod system;

use std::sync::OnceLock;

use crate::cli::context::{CommandResult, ShellContext};

pub(crate) type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub(crate) struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

static REGISTRY: OnceLock<Vec<CommandEntry>> = OnceLock::new();

/// All commands in the order `help` lists them.
pub(crate) fn registry() -> &'static [CommandEntry] {
    REGISTRY.get_or_init(|| {
        let mut entries = intake::definitions();
        entries.extend(system::definitions());
        entries
    })
}

pub(crate) fn find(name: &str) -> Option<&'static CommandEntry> {
    let name = match name {
        "quit" => "exit",
        other => other,
    };
    registry().iter().find(|entry| entry.name == name)
}

pub(crate) fn names() -> impl Iterator<Item = &'static str> {
    registry().iter().map(|entry| entry.name)
}
