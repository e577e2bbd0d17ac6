//! Plain-text rendering of demands, clients and team members.

use crate::model::{Client, Demand, TeamMember};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const DEFAULT_WIDTH: usize = 100;
const MIN_DESCRIPTION_WIDTH: usize = 12;

/// Terminal width from `COLUMNS`, falling back to 100.
#[must_use]
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&value| value >= 40)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Cut `text` to at most `max` display columns, ending with `…` when cut.
/// Newlines are flattened to spaces.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.width() <= max {
        return flat;
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Left-align `text` in `width` display columns.
#[must_use]
pub fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Render demands as an aligned table that fits `width` columns.
#[must_use]
pub fn format_demand_table(demands: &[Demand], width: usize) -> String {
    if demands.is_empty() {
        return "No demands found.\n".to_string();
    }

    let column = |header: &str, cells: &mut dyn Iterator<Item = usize>| {
        cells.max().unwrap_or(0).max(header.width())
    };
    let id_w = column("ID", &mut demands.iter().map(|d| d.id.to_string().len()));
    let prio_w = column("PRIORITY", &mut demands.iter().map(|d| d.priority.as_str().len()));
    let status_w = column("STATUS", &mut demands.iter().map(|d| d.status.as_str().len()));
    let client_w = column("CLIENT", &mut demands.iter().map(|d| d.client.width())).min(24);
    let member_w = column("MEMBER", &mut demands.iter().map(|d| d.team_member.width())).min(20);

    let fixed = id_w + prio_w + status_w + client_w + member_w + 5 * 2;
    let desc_w = width.saturating_sub(fixed).max(MIN_DESCRIPTION_WIDTH);

    let row = |cells: [&str; 6]| {
        format!(
            "{}  {}  {}  {}  {}  {}",
            pad(cells[0], id_w),
            pad(cells[1], prio_w),
            pad(cells[2], status_w),
            pad(&truncate(cells[3], client_w), client_w),
            pad(&truncate(cells[4], member_w), member_w),
            truncate(cells[5], desc_w),
        )
        .trim_end()
        .to_string()
    };

    let mut out = row(["ID", "PRIORITY", "STATUS", "CLIENT", "MEMBER", "DESCRIPTION"]);
    out.push('\n');
    for demand in demands {
        let id = demand.id.to_string();
        out.push_str(&row([
            &id,
            demand.priority.as_str(),
            demand.status.as_str(),
            &demand.client,
            &demand.team_member,
            &demand.description,
        ]));
        out.push('\n');
    }
    out
}

/// Multi-line detail view of one demand.
#[must_use]
pub fn format_demand_details(demand: &Demand) -> String {
    let mut out = format!("Demand {}\n", demand.id);
    out.push_str(&format!("  Team Member: {}\n", demand.team_member));
    out.push_str(&format!("  Client:      {}\n", demand.client));
    out.push_str(&format!("  Priority:    {}\n", demand.priority));
    out.push_str(&format!("  Status:      {}\n", demand.status));
    if let Some(created_at) = demand.created_at {
        out.push_str(&format!(
            "  Created:     {}\n",
            created_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    out.push_str("  Description:\n");
    for line in demand.description.lines() {
        out.push_str(&format!("    {line}\n"));
    }
    out
}

/// One name per line, or a placeholder when empty.
#[must_use]
pub fn format_client_list(clients: &[Client]) -> String {
    format_names(clients.iter().map(|c| (c.id, c.name.as_str())), "No clients found.")
}

#[must_use]
pub fn format_team_member_list(members: &[TeamMember]) -> String {
    format_names(
        members.iter().map(|m| (m.id, m.name.as_str())),
        "No team members found.",
    )
}

fn format_names<'a>(rows: impl Iterator<Item = (i64, &'a str)>, empty: &str) -> String {
    let lines: Vec<String> = rows.map(|(id, name)| format!("{id:>4}  {name}\n")).collect();
    if lines.is_empty() {
        format!("{empty}\n")
    } else {
        lines.concat()
    }
}
