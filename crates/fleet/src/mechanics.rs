//! Mechanic operations

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use skychain_chain::{generate_private_key, generate_wallet_address};
use skychain_domain::analytics::{mechanic_statistics, MechanicStatistics};
use skychain_domain::requests::{CertificationRequest, MechanicRequest, MechanicUpdateRequest};
use skychain_domain::{Availability, Certification, Mechanic, Performance, PerformanceUpdate};
use skychain_store::{MechanicFilter, Page, PageRequest};
use tracing::info;

use crate::error::{FleetError, Result};
use crate::service::FleetService;
use crate::views::{MechanicDetail, MechanicView, PerformanceOutcome, WorkOrderView};

/// Hash a credential with Argon2id; returns the PHC string
fn hash_credential(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| FleetError::Internal(format!("Failed to encode salt: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FleetError::Internal(format!("Failed to hash credential: {e}")))
}

fn verify_credential(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| FleetError::Internal(format!("Invalid credential hash format: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl FleetService {
    /// Active mechanics, by name
    pub fn list_mechanics(&self, filter: &MechanicFilter, page: PageRequest) -> Result<Page<MechanicView>> {
        let found = self.store.read(|tx| tx.list_mechanics(filter, page))?;
        Ok(found.map(MechanicView::from))
    }

    /// Mechanic with their scheduled and in-progress work orders
    pub fn get_mechanic(&self, id: &str) -> Result<MechanicDetail> {
        let (mechanic, tasks) = self.store.read(|tx| -> Result<_> {
            let mechanic = tx.require_mechanic(id)?;
            let tasks = tx.current_tasks(id)?;
            Ok((mechanic, tasks))
        })?;
        Ok(MechanicDetail {
            mechanic: mechanic.into(),
            current_tasks: tasks.into_iter().map(WorkOrderView::from).collect(),
        })
    }

    /// Register a mechanic with a generated wallet. The credential is stored
    /// hashed and never returned.
    pub fn create_mechanic(&self, request: &MechanicRequest) -> Result<MechanicView> {
        let now = self.now();
        let draft = request.validate()?;
        let credential_hash = hash_credential(&draft.password)?;
        let private_key = generate_private_key();

        let mechanic = Mechanic {
            id: Self::new_id(),
            employee_id: draft.employee_id,
            name: draft.name,
            email: draft.email,
            certifications: draft.certifications,
            specialties: draft.specialties,
            rating: 0.0,
            tasks_completed: 0,
            tasks_in_progress: 0,
            reputation_score: 0,
            blockchain_signatures: 0,
            wallet_address: generate_wallet_address(),
            performance: Performance::default(),
            work_history: Vec::new(),
            availability: Availability::default(),
            join_date: now,
            last_active: now,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.store
            .write(|tx| tx.insert_mechanic(&mechanic, &credential_hash, private_key.as_str()))?;

        info!(mechanic_id = %mechanic.id, employee_id = %mechanic.employee_id, "Mechanic registered");
        Ok(mechanic.into())
    }

    pub fn update_mechanic(&self, id: &str, request: &MechanicUpdateRequest) -> Result<MechanicView> {
        let now = self.now();
        let update = request.validate()?;

        let mechanic = self.store.write(|tx| -> Result<Mechanic> {
            let mut mechanic = tx.require_mechanic(id)?;
            if let Some(name) = update.name.clone() {
                mechanic.name = name;
            }
            if let Some(email) = update.email.clone() {
                mechanic.email = email;
            }
            if let Some(specialties) = update.specialties.clone() {
                mechanic.specialties = specialties;
            }
            if let Some(status) = update.availability {
                mechanic.availability.status = status;
            }
            if let Some(active) = update.is_active {
                mechanic.is_active = active;
            }
            mechanic.updated_at = now;
            tx.update_mechanic(&mechanic)?;
            Ok(mechanic)
        })?;

        Ok(mechanic.into())
    }

    /// Update the performance triad and fold in a rating
    pub fn update_mechanic_performance(&self, id: &str, update: &PerformanceUpdate) -> Result<PerformanceOutcome> {
        let now = self.now();
        let mechanic = self.store.write(|tx| -> Result<Mechanic> {
            let mut mechanic = tx.require_mechanic(id)?;
            mechanic.update_performance(update, now);
            tx.update_mechanic(&mechanic)?;
            Ok(mechanic)
        })?;

        info!(
            mechanic_id = %id,
            reputation_score = mechanic.reputation_score,
            "Mechanic performance updated"
        );
        Ok(PerformanceOutcome {
            performance: mechanic.performance,
            rating: mechanic.rating,
            reputation_score: mechanic.reputation_score,
        })
    }

    /// Work orders assigned to the mechanic, most recently completed first
    pub fn mechanic_work_history(&self, id: &str, page: PageRequest) -> Result<Page<WorkOrderView>> {
        let found = self.store.read(|tx| tx.work_history_page(id, page))?;
        Ok(found.map(WorkOrderView::from))
    }

    pub fn add_certification(&self, id: &str, request: &CertificationRequest) -> Result<Vec<Certification>> {
        let now = self.now();
        let certification = request.validate()?;
        self.store.write(|tx| -> Result<Vec<Certification>> {
            let mut mechanic = tx.require_mechanic(id)?;
            mechanic.add_certification(certification, now);
            tx.update_mechanic(&mechanic)?;
            Ok(mechanic.certifications)
        })
    }

    pub fn mechanic_statistics(&self) -> Result<MechanicStatistics> {
        let mechanics = self.store.read(|tx| tx.all_mechanics())?;
        Ok(mechanic_statistics(&mechanics))
    }

    /// Check a password against the stored credential
    pub fn verify_mechanic_credential(&self, id: &str, password: &str) -> Result<bool> {
        let hash = self
            .store
            .read(|tx| tx.credential_hash(id))?
            .ok_or_else(|| FleetError::not_found("Mechanic"))?;
        verify_credential(password, &hash)
    }
}
