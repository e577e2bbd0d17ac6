//! `client` and `member` commands.

use crate::cli::NameCommands;
use crate::error::Result;
use crate::format::{OutputContext, OutputMode, format_client_list, format_team_member_list};
use crate::repository::Repository;

/// # Errors
///
/// Returns a validation or duplicate error from the repository.
pub fn clients(repo: &mut Repository, command: &NameCommands, ctx: &OutputContext) -> Result<()> {
    match command {
        NameCommands::Add { name } => {
            let client = repo.create_client(name)?;
            match ctx.mode() {
                OutputMode::Json => ctx.json_pretty(&client),
                OutputMode::Plain => ctx.success(&format!("Added client {}", client.name)),
                OutputMode::Quiet => {}
            }
        }
        NameCommands::List => {
            if ctx.is_json() {
                ctx.json_pretty(repo.list_clients());
            } else {
                ctx.print(&format_client_list(repo.list_clients()));
            }
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns a validation or duplicate error from the repository.
pub fn team_members(
    repo: &mut Repository,
    command: &NameCommands,
    ctx: &OutputContext,
) -> Result<()> {
    match command {
        NameCommands::Add { name } => {
            let member = repo.create_team_member(name)?;
            match ctx.mode() {
                OutputMode::Json => ctx.json_pretty(&member),
                OutputMode::Plain => ctx.success(&format!("Added team member {}", member.name)),
                OutputMode::Quiet => {}
            }
        }
        NameCommands::List => {
            if ctx.is_json() {
                ctx.json_pretty(repo.list_team_members());
            } else {
                ctx.print(&format_team_member_list(repo.list_team_members()));
            }
        }
    }
    Ok(())
}
