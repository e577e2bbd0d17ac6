//! Demand commands: list, show, create, edit and delete.

use crate::cli::{CreateArgs, EditArgs, FilterArgs};
use crate::error::{DemandError, Result};
use crate::filter::filter;
use crate::format::{OutputContext, OutputMode, format_demand_details, format_demand_table};
use crate::model::{Demand, DemandFields, Priority, Status};
use crate::repository::Repository;
use serde::Serialize;
use std::str::FromStr;

#[derive(Serialize)]
struct DeleteResult {
    deleted: i64,
}

/// Filtered and sorted demands, as `list` and `export` show them.
///
/// # Errors
///
/// Returns a validation error for bad filter or sort values.
pub fn select(repo: &Repository, args: &FilterArgs) -> Result<Vec<Demand>> {
    let predicates = args.to_filter()?;
    let sort = args.sort_key()?;
    let mut demands = filter(repo.list_demands(), &predicates);
    sort.apply(&mut demands);
    Ok(demands)
}

/// # Errors
///
/// Returns a validation error for bad filter or sort values.
pub fn list(repo: &Repository, args: &FilterArgs, ctx: &OutputContext) -> Result<()> {
    let demands = select(repo, args)?;
    if ctx.is_json() {
        ctx.json_pretty(&demands);
    } else {
        ctx.print(&format_demand_table(&demands, ctx.width()));
    }
    Ok(())
}

/// # Errors
///
/// Returns [`crate::DemandError::DemandNotFound`] if the id is absent.
pub fn show(repo: &Repository, id: i64, ctx: &OutputContext) -> Result<()> {
    let demand = repo.get_demand(id)?;
    if ctx.is_json() {
        ctx.json_pretty(demand);
    } else {
        ctx.print(&format_demand_details(demand));
    }
    Ok(())
}

/// # Errors
///
/// Returns a validation error for an empty description or bad labels.
pub fn create(repo: &mut Repository, args: &CreateArgs, ctx: &OutputContext) -> Result<()> {
    let fields = DemandFields {
        team_member: args.member.clone(),
        client: args.client.clone(),
        description: args.description.clone(),
        priority: parse_or_default::<Priority>(args.priority.as_deref())?,
        status: parse_or_default::<Status>(args.status.as_deref())?,
    };
    let demand = repo.create_demand(fields)?;
    report(&demand, "Created", ctx);
    Ok(())
}

/// Start from the stored fields and replace those given on the command line.
///
/// # Errors
///
/// Returns not-found for an absent id, or a validation error.
pub fn edit(repo: &mut Repository, args: &EditArgs, ctx: &OutputContext) -> Result<()> {
    let mut fields = repo.get_demand(args.id)?.fields();
    if let Some(member) = &args.member {
        fields.team_member.clone_from(member);
    }
    if let Some(client) = &args.client {
        fields.client.clone_from(client);
    }
    if let Some(description) = &args.description {
        fields.description.clone_from(description);
    }
    if let Some(priority) = &args.priority {
        fields.priority = priority.parse()?;
    }
    if let Some(status) = &args.status {
        fields.status = status.parse()?;
    }

    let demand = repo.update_demand(args.id, fields)?;
    report(&demand, "Updated", ctx);
    Ok(())
}

/// # Errors
///
/// Returns not-found for an absent id.
pub fn delete(repo: &mut Repository, id: i64, ctx: &OutputContext) -> Result<()> {
    repo.delete_demand(id)?;
    match ctx.mode() {
        OutputMode::Json => ctx.json_pretty(&DeleteResult { deleted: id }),
        OutputMode::Plain => ctx.success(&format!("Deleted demand {id}")),
        OutputMode::Quiet => {}
    }
    Ok(())
}

fn parse_or_default<T>(value: Option<&str>) -> Result<T>
where
    T: Default + FromStr<Err = DemandError>,
{
    value.map_or_else(|| Ok(T::default()), |v| v.parse())
}

fn report(demand: &Demand, verb: &str, ctx: &OutputContext) {
    match ctx.mode() {
        OutputMode::Json => ctx.json_pretty(demand),
        OutputMode::Plain => ctx.success(&format!(
            "{verb} demand {}: {} ({}, {})",
            demand.id, demand.description, demand.priority, demand.status
        )),
        OutputMode::Quiet => println!("{}", demand.id),
    }
}
