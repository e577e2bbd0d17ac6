//! CRUD access layer over a [`RecordStore`].
//!
//! The repository holds the loaded [`Records`] as explicit state. Every
//! mutation is computed on a copy, persisted through the store as one
//! [`Change`], and only then committed to the in-memory state, so a
//! rejected or failed operation leaves both untouched.

use crate::error::{DemandError, Result};
use crate::model::{Client, Demand, DemandFields, Records, TeamMember};
use crate::storage::{Change, RecordStore};
use chrono::Utc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Repository {
    store: Box<dyn RecordStore>,
    records: Records,
}

impl Repository {
    /// Load the store and wrap it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn open(store: Box<dyn RecordStore>) -> Result<Self> {
        let records = store.load()?;
        debug!(
            backend = %store.backend(),
            location = %store.location(),
            demands = records.demands.len(),
            "Opened repository"
        );
        Ok(Self { store, records })
    }

    /// Current state snapshot.
    #[must_use]
    pub const fn records(&self) -> &Records {
        &self.records
    }

    #[must_use]
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Re-read state from the store, discarding the cached copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn reload(&mut self) -> Result<()> {
        self.records = self.store.load()?;
        Ok(())
    }

    /// Write the current state through the store as a whole snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn flush(&mut self) -> Result<()> {
        self.store.save(&self.records)
    }

    /// All demands in store order.
    #[must_use]
    pub fn list_demands(&self) -> &[Demand] {
        &self.records.demands
    }

    /// Look up one demand.
    ///
    /// # Errors
    ///
    /// Returns [`DemandError::DemandNotFound`] if no demand has this id.
    pub fn get_demand(&self, id: i64) -> Result<&Demand> {
        self.records
            .find_demand(id)
            .ok_or(DemandError::DemandNotFound { id })
    }

    /// Create a demand with a fresh id and the current time.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the description is empty, or a storage
    /// error if persisting fails.
    pub fn create_demand(&mut self, fields: DemandFields) -> Result<Demand> {
        fields.validate()?;

        let demand = Demand::from_fields(self.records.next_demand_id()?, fields, Some(Utc::now()));
        let mut next = self.records.clone();
        next.demands.push(demand.clone());
        self.commit(&Change::InsertDemand(&demand), next)?;

        info!(id = demand.id, client = %demand.client, "Created demand");
        Ok(demand)
    }

    /// Replace every mutable field of a demand.
    ///
    /// # Errors
    ///
    /// Returns [`DemandError::DemandNotFound`] if the id is absent, a
    /// validation error if the description is empty, or a storage error.
    pub fn update_demand(&mut self, id: i64, fields: DemandFields) -> Result<Demand> {
        let index = self
            .records
            .demand_position(id)
            .ok_or(DemandError::DemandNotFound { id })?;
        fields.validate()?;

        let mut next = self.records.clone();
        next.demands[index].apply(fields);
        let updated = next.demands[index].clone();
        self.commit(&Change::UpdateDemand(&updated), next)?;

        info!(id, "Updated demand");
        Ok(updated)
    }

    /// Remove a demand permanently.
    ///
    /// # Errors
    ///
    /// Returns [`DemandError::DemandNotFound`] if the id is absent, or a
    /// storage error.
    pub fn delete_demand(&mut self, id: i64) -> Result<()> {
        let index = self
            .records
            .demand_position(id)
            .ok_or(DemandError::DemandNotFound { id })?;

        let mut next = self.records.clone();
        next.demands.remove(index);
        self.commit(&Change::DeleteDemand(id), next)?;

        info!(id, "Deleted demand");
        Ok(())
    }

    #[must_use]
    pub fn list_clients(&self) -> &[Client] {
        &self.records.clients
    }

    /// Register a client by name.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or
    /// [`DemandError::Duplicate`] if the exact name is already registered.
    pub fn create_client(&mut self, name: &str) -> Result<Client> {
        let name = required_name("client name", name)?;
        if self.records.has_client(name) {
            return Err(DemandError::Duplicate {
                entity: "Client",
                name: name.to_string(),
            });
        }

        let client = Client {
            id: self.records.next_client_id()?,
            name: name.to_string(),
        };
        let mut next = self.records.clone();
        next.clients.push(client.clone());
        self.commit(&Change::InsertClient(&client), next)?;

        info!(id = client.id, name = %client.name, "Added client");
        Ok(client)
    }

    #[must_use]
    pub fn list_team_members(&self) -> &[TeamMember] {
        &self.records.team_members
    }

    /// Register a team member by name.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or
    /// [`DemandError::Duplicate`] if the exact name is already registered.
    pub fn create_team_member(&mut self, name: &str) -> Result<TeamMember> {
        let name = required_name("team member name", name)?;
        if self.records.has_team_member(name) {
            return Err(DemandError::Duplicate {
                entity: "Team member",
                name: name.to_string(),
            });
        }

        let member = TeamMember {
            id: self.records.next_team_member_id()?,
            name: name.to_string(),
        };
        let mut next = self.records.clone();
        next.team_members.push(member.clone());
        self.commit(&Change::InsertTeamMember(&member), next)?;

        info!(id = member.id, name = %member.name, "Added team member");
        Ok(member)
    }

    fn commit(&mut self, change: &Change<'_>, next: Records) -> Result<()> {
        self.store.apply(change, &next)?;
        self.records = next;
        Ok(())
    }
}

fn required_name<'a>(field: &str, name: &'a str) -> Result<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DemandError::validation(field, format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}
