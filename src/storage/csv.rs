//! CSV directory store.
//!
//! Layout:
//! - `demands.csv`: `Cliente,Demanda,Prioridade,Status,Responsável,Id,Criado em`
//! - `clients.csv`, `team_members.csv`: `Id,Nome`
//!
//! `demands.csv` files with only the five legacy columns (the export layout)
//! are also accepted; their rows get positional ids and no creation time.

use super::{Backend, RecordStore, write_atomic};
use crate::error::{DemandError, Result};
use crate::format::csv::{self, CsvRecord};
use crate::model::{Client, Demand, Priority, Records, Status, TeamMember};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEMANDS_FILE: &str = "demands.csv";
pub const CLIENTS_FILE: &str = "clients.csv";
pub const TEAM_MEMBERS_FILE: &str = "team_members.csv";

/// Column layout shared by the export surface and legacy files.
pub const LEGACY_DEMAND_HEADER: [&str; 5] =
    ["Cliente", "Demanda", "Prioridade", "Status", "Responsável"];

/// Column layout written by the store.
pub const DEMAND_HEADER: [&str; 7] = [
    "Cliente",
    "Demanda",
    "Prioridade",
    "Status",
    "Responsável",
    "Id",
    "Criado em",
];

pub const NAME_HEADER: [&str; 2] = ["Id", "Nome"];

#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecordStore for CsvStore {
    fn backend(&self) -> Backend {
        Backend::Csv
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    fn load(&self) -> Result<Records> {
        let records = Records {
            demands: read_demands(&self.dir.join(DEMANDS_FILE))?,
            clients: read_names(&self.dir.join(CLIENTS_FILE))?
                .into_iter()
                .map(|(id, name)| Client { id, name })
                .collect(),
            team_members: read_names(&self.dir.join(TEAM_MEMBERS_FILE))?
                .into_iter()
                .map(|(id, name)| TeamMember { id, name })
                .collect(),
        };
        debug!(
            dir = %self.dir.display(),
            demands = records.demands.len(),
            clients = records.clients.len(),
            team_members = records.team_members.len(),
            "Loaded CSV store"
        );
        Ok(records)
    }

    fn save(&mut self, records: &Records) -> Result<()> {
        write_atomic(&self.dir.join(DEMANDS_FILE), |w| {
            write_demands(w, &records.demands)
        })?;
        write_atomic(&self.dir.join(CLIENTS_FILE), |w| {
            write_names(w, records.clients.iter().map(|c| (c.id, c.name.as_str())))
        })?;
        write_atomic(&self.dir.join(TEAM_MEMBERS_FILE), |w| {
            write_names(
                w,
                records.team_members.iter().map(|m| (m.id, m.name.as_str())),
            )
        })?;
        debug!(dir = %self.dir.display(), demands = records.demands.len(), "Saved CSV store");
        Ok(())
    }
}

/// Write demands in the store layout (legacy columns plus id and creation time).
fn write_demands<W: Write>(writer: &mut W, demands: &[Demand]) -> Result<()> {
    csv::write_record(writer, DEMAND_HEADER)?;
    for demand in demands {
        let id = demand.id.to_string();
        let created_at = demand
            .created_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        csv::write_record(
            writer,
            [
                demand.client.as_str(),
                demand.description.as_str(),
                demand.priority.as_str(),
                demand.status.as_str(),
                demand.team_member.as_str(),
                id.as_str(),
                created_at.as_str(),
            ],
        )?;
    }
    Ok(())
}

fn write_names<'a, W: Write>(
    writer: &mut W,
    rows: impl Iterator<Item = (i64, &'a str)>,
) -> Result<()> {
    csv::write_record(writer, NAME_HEADER)?;
    for (id, name) in rows {
        csv::write_record(writer, [id.to_string().as_str(), name])?;
    }
    Ok(())
}

/// Read a file and split it into header and data rows. Missing or empty
/// files yield `None`.
fn read_rows(path: &Path) -> Result<Option<(CsvRecord, Vec<CsvRecord>)>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    let mut records = csv::parse(&text)
        .map_err(|e| corrupt(path, e.line, e.reason))?
        .into_iter()
        .filter(|r| !r.is_blank());
    let Some(header) = records.next() else {
        return Ok(None);
    };
    Ok(Some((header, records.collect())))
}

fn header_matches(header: &CsvRecord, expected: &[&str]) -> bool {
    header.fields.len() == expected.len()
        && header
            .fields
            .iter()
            .zip(expected)
            .all(|(got, want)| got.trim() == *want)
}

/// Read `demands.csv` in either layout.
fn read_demands(path: &Path) -> Result<Vec<Demand>> {
    let Some((header, rows)) = read_rows(path)? else {
        return Ok(Vec::new());
    };

    let legacy = if header_matches(&header, &DEMAND_HEADER) {
        false
    } else if header_matches(&header, &LEGACY_DEMAND_HEADER) {
        true
    } else {
        return Err(corrupt(
            path,
            header.line,
            format!(
                "unexpected header '{}' (expected '{}')",
                header.fields.join(","),
                DEMAND_HEADER.join(",")
            ),
        ));
    };
    let width = header.fields.len();

    let mut demands = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        if row.fields.len() != width {
            return Err(corrupt(
                path,
                row.line,
                format!("expected {width} columns, found {}", row.fields.len()),
            ));
        }
        let mut fields = row.fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        let client = next();
        let description = next();
        let priority = next()
            .parse::<Priority>()
            .map_err(|e| corrupt(path, row.line, e))?;
        let status = next()
            .parse::<Status>()
            .map_err(|e| corrupt(path, row.line, e))?;
        let team_member = next();

        let (id, created_at) = if legacy {
            (i64::try_from(index).unwrap_or(i64::MAX - 1) + 1, None)
        } else {
            let id = parse_id(&next(), path, row.line)?;
            let created_at = parse_timestamp(&next(), path, row.line)?;
            (id, created_at)
        };

        demands.push(Demand {
            id,
            team_member,
            client,
            description,
            priority,
            status,
            created_at,
        });
    }
    Ok(demands)
}

fn read_names(path: &Path) -> Result<Vec<(i64, String)>> {
    let Some((header, rows)) = read_rows(path)? else {
        return Ok(Vec::new());
    };
    if !header_matches(&header, &NAME_HEADER) {
        return Err(corrupt(
            path,
            header.line,
            format!("unexpected header '{}'", header.fields.join(",")),
        ));
    }

    rows.into_iter()
        .map(|row| match row.fields.as_slice() {
            [id, name] => Ok((parse_id(id, path, row.line)?, name.clone())),
            other => Err(corrupt(
                path,
                row.line,
                format!("expected 2 columns, found {}", other.len()),
            )),
        })
        .collect()
}

fn parse_id(raw: &str, path: &Path, line: usize) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| corrupt(path, line, format!("invalid id '{raw}'")))
}

fn parse_timestamp(raw: &str, path: &Path, line: usize) -> Result<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| corrupt(path, line, format!("invalid timestamp '{raw}': {e}")))
}

fn corrupt(path: &Path, line: usize, reason: impl ToString) -> DemandError {
    DemandError::Corrupt {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample() -> Records {
        Records {
            demands: vec![
                Demand {
                    id: 1,
                    team_member: "Ana".to_string(),
                    client: "Acme, Inc.".to_string(),
                    description: "Quote \"rush\" order\nsecond line".to_string(),
                    priority: Priority::High,
                    status: Status::InProgress,
                    created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
                },
                Demand {
                    id: 4,
                    team_member: "João".to_string(),
                    client: "Globex".to_string(),
                    description: "Relatório mensal".to_string(),
                    priority: Priority::Low,
                    status: Status::NotStarted,
                    created_at: None,
                },
            ],
            clients: vec![Client {
                id: 1,
                name: "Acme, Inc.".to_string(),
            }],
            team_members: vec![
                TeamMember {
                    id: 1,
                    name: "Ana".to_string(),
                },
                TeamMember {
                    id: 2,
                    name: "João".to_string(),
                },
            ],
        }
    }

    #[test]
    fn missing_directory_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("absent"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn round_trip_through_fresh_store() {
        let dir = TempDir::new().unwrap();
        let records = sample();
        CsvStore::new(dir.path()).save(&records).unwrap();

        let loaded = CsvStore::new(dir.path()).load().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn writes_portuguese_header_first() {
        let dir = TempDir::new().unwrap();
        CsvStore::new(dir.path()).save(&sample()).unwrap();
        let text = fs::read_to_string(dir.path().join(DEMANDS_FILE)).unwrap();
        assert!(text.starts_with("Cliente,Demanda,Prioridade,Status,Responsável,Id,Criado em\n"));
    }

    #[test]
    fn legacy_layout_gets_positional_ids() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEMANDS_FILE),
            "\u{feff}Cliente,Demanda,Prioridade,Status,Responsável\n\
             Acme,Fix invoice,Alta,Em Andamento,Ana\n\
             \n\
             Globex,Call back,Low,Completed,Bruno\n",
        )
        .unwrap();

        let loaded = CsvStore::new(dir.path()).load().unwrap();
        assert_eq!(loaded.demands.len(), 2);
        assert_eq!(loaded.demands[0].id, 1);
        assert_eq!(loaded.demands[0].priority, Priority::High);
        assert_eq!(loaded.demands[0].status, Status::InProgress);
        assert_eq!(loaded.demands[1].id, 2);
        assert_eq!(loaded.demands[1].team_member, "Bruno");
        assert!(loaded.demands[1].created_at.is_none());
    }

    #[test]
    fn bad_priority_reports_line() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEMANDS_FILE),
            "Cliente,Demanda,Prioridade,Status,Responsável\nAcme,x,Urgent,Completed,Ana\n",
        )
        .unwrap();

        let err = CsvStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, DemandError::Corrupt { line: 2, .. }), "{err}");
    }

    #[test]
    fn unknown_header_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CLIENTS_FILE), "Name\nAcme\n").unwrap();
        let err = CsvStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, DemandError::Corrupt { line: 1, .. }));
    }
}
