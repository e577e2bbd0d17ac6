use chrono::{TimeZone, Utc};
use demand_tracker::model::{Client, Demand, DemandFields, Priority, Records, Status, TeamMember};

pub fn fields(member: &str, client: &str, description: &str, priority: Priority) -> DemandFields {
    DemandFields {
        team_member: member.to_string(),
        client: client.to_string(),
        description: description.to_string(),
        priority,
        status: Status::NotStarted,
    }
}

pub fn demand(id: i64, description: &str, priority: Priority, status: Status) -> Demand {
    Demand {
        id,
        team_member: "Ana Souza".to_string(),
        client: "Acme, Ltda.".to_string(),
        description: description.to_string(),
        priority,
        status,
        created_at: Some(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap() + chrono::Duration::minutes(id),
        ),
    }
}

/// A record set exercising quoting, unicode, multi-line text and a
/// missing timestamp.
pub fn sample_records() -> Records {
    let mut legacy = demand(4, "Sem data", Priority::Low, Status::Completed);
    legacy.created_at = None;

    Records {
        demands: vec![
            demand(1, "Revisar contrato", Priority::High, Status::InProgress),
            demand(2, "Linha 1\nLinha 2, com \"aspas\"", Priority::Medium, Status::NotStarted),
            demand(3, "Relatório mensal · ação", Priority::Low, Status::Completed),
            legacy,
        ],
        clients: vec![
            Client {
                id: 1,
                name: "Acme, Ltda.".to_string(),
            },
            Client {
                id: 2,
                name: "Globex".to_string(),
            },
        ],
        team_members: vec![TeamMember {
            id: 1,
            name: "Ana Souza".to_string(),
        }],
    }
}
