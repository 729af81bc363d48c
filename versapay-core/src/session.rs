//! Session/auth manager and the ledger command surface.
//!
//! [`Ledger`] owns the [`Store`]; the active [`Session`] is an explicit value
//! returned to the caller and passed back into each operation. There is no
//! process-wide state.
//!
//! Mutating operations follow copy → persist → commit: the edit is applied to
//! a clone of the session dataset, the clone is stored, and only then does it
//! replace the session dataset. A failed write leaves both the session and the
//! stored data as they were.
//!
//! Credentials are stored and compared as plain text. This is a known
//! weakness of the stored format, not a security boundary.

use std::path::Path;

use crate::error::LedgerError;
use crate::ids::{IdGenerator, EMPLOYEE_PREFIX, ORGANIZATION_PREFIX, PAYROLL_RUN_PREFIX};
use crate::payroll;
use crate::roster;
use crate::store::{dataset_key, FileStorage, Storage, Store};
use crate::types::{
    Employee, EmployeeDraft, EmployeeId, EmployeeUpdate, LoginRequest, Organization,
    OrganizationDataset, OrganizationId, PayrollRun, PayrollRunId, RegisterRequest,
    RunPayrollRequest, Settings, SettingsUpdate,
};

/// The logged-in organization and its working dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    organization: Organization,
    dataset: OrganizationDataset,
}

impl Session {
    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    pub fn org_id(&self) -> &OrganizationId {
        &self.organization.id
    }

    pub fn dataset(&self) -> &OrganizationDataset {
        &self.dataset
    }

    pub fn settings(&self) -> &Settings {
        &self.dataset.settings
    }
}

/// Entry point for every user action.
#[derive(Debug)]
pub struct Ledger<S> {
    store: Store<S>,
    ids: IdGenerator,
}

impl Ledger<FileStorage> {
    /// Open the file-backed ledger rooted at `home`.
    pub fn open_at(home: &Path) -> Result<Self, LedgerError> {
        Ok(Self::new(FileStorage::open_at(home)?))
    }

    /// `open_at` convenience wrapper using `dirs::home_dir()`.
    pub fn open() -> Result<Self, LedgerError> {
        Ok(Self::new(FileStorage::open()?))
    }
}

impl<S: Storage> Ledger<S> {
    pub fn new(storage: S) -> Self {
        Self {
            store: Store::new(storage),
            ids: IdGenerator::new(),
        }
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<S> {
        &mut self.store
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// Create an organization with the default dataset.
    ///
    /// Names are unique case-insensitively; a rejected registration writes
    /// nothing.
    pub fn register(&mut self, req: &RegisterRequest) -> Result<Organization, LedgerError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("organization name is required".into()));
        }
        if req.password.is_empty() {
            return Err(LedgerError::Validation("password is required".into()));
        }

        let mut directory = self.store.load_directory()?;
        if directory.find_by_name(name).is_some() {
            return Err(LedgerError::DuplicateOrganization(name.to_string()));
        }

        let id = OrganizationId::from(self.ids.next(ORGANIZATION_PREFIX, |candidate| {
            directory.organizations.iter().any(|o| o.id.as_str() == candidate)
        }));
        let organization = Organization {
            id: id.clone(),
            name: name.to_string(),
            password: req.password.clone(),
        };

        // Dataset first: a directory entry must never point at nothing.
        self.store.save_dataset(&id, &OrganizationDataset::default())?;
        directory.organizations.push(organization.clone());
        if let Err(err) = self.store.save_directory(&directory) {
            if let Err(cleanup) = self.store.storage_mut().remove(&dataset_key(&id)) {
                tracing::warn!(
                    org_id = %id,
                    error = %cleanup,
                    "could not remove dataset of failed registration; key is orphaned"
                );
            }
            return Err(err.into());
        }

        tracing::info!(org_id = %id, name, "organization registered");
        Ok(organization)
    }

    /// Check credentials, point the session at the organization, load its data.
    pub fn login(&mut self, req: &LoginRequest) -> Result<Session, LedgerError> {
        let directory = self.store.load_directory()?;
        let organization = directory
            .find_by_name(req.name.trim())
            .filter(|org| org.password == req.password)
            .cloned()
            .ok_or(LedgerError::InvalidCredentials)?;

        let dataset = self.store.load_dataset(&organization.id)?;
        self.store.set_session_pointer(&organization.id)?;

        tracing::info!(org_id = %organization.id, "logged in");
        Ok(Session {
            organization,
            dataset,
        })
    }

    /// Restore the session named by the stored pointer, trusting it without a
    /// password check.
    ///
    /// A pointer to an organization that no longer exists is cleared.
    pub fn resume_session(&mut self) -> Result<Option<Session>, LedgerError> {
        let Some(org_id) = self.store.session_pointer()? else {
            return Ok(None);
        };
        let directory = self.store.load_directory()?;
        let Some(organization) = directory.find_by_id(&org_id).cloned() else {
            tracing::warn!(org_id = %org_id, "session points at unknown organization, clearing");
            self.store.clear_session_pointer()?;
            return Ok(None);
        };
        let dataset = self.store.load_dataset(&organization.id)?;
        Ok(Some(Session {
            organization,
            dataset,
        }))
    }

    /// End the session and clear the stored pointer.
    pub fn logout(&mut self, session: Session) -> Result<(), LedgerError> {
        self.store.clear_session_pointer()?;
        tracing::info!(org_id = %session.organization.id, "logged out");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Roster and settings
    // -----------------------------------------------------------------------

    pub fn add_employee(
        &mut self,
        session: &mut Session,
        draft: &EmployeeDraft,
    ) -> Result<Employee, LedgerError> {
        let mut dataset = session.dataset.clone();
        let id = EmployeeId::from(self.ids.next(EMPLOYEE_PREFIX, |candidate| {
            dataset.employees.iter().any(|e| e.id.as_str() == candidate)
        }));
        let employee = roster::add_employee(&mut dataset, id, draft)?;
        self.commit(session, dataset)?;
        Ok(employee)
    }

    pub fn update_employee(
        &mut self,
        session: &mut Session,
        id: &EmployeeId,
        update: &EmployeeUpdate,
    ) -> Result<Employee, LedgerError> {
        let mut dataset = session.dataset.clone();
        let employee = roster::update_employee(&mut dataset, id, update)?;
        self.commit(session, dataset)?;
        Ok(employee)
    }

    pub fn delete_employee(
        &mut self,
        session: &mut Session,
        id: &EmployeeId,
    ) -> Result<Employee, LedgerError> {
        let mut dataset = session.dataset.clone();
        let employee = roster::delete_employee(&mut dataset, id)?;
        self.commit(session, dataset)?;
        Ok(employee)
    }

    pub fn save_settings(
        &mut self,
        session: &mut Session,
        update: &SettingsUpdate,
    ) -> Result<Settings, LedgerError> {
        let mut dataset = session.dataset.clone();
        roster::apply_settings(&mut dataset.settings, update)?;
        let settings = dataset.settings.clone();
        self.commit(session, dataset)?;
        Ok(settings)
    }

    // -----------------------------------------------------------------------
    // Payroll
    // -----------------------------------------------------------------------

    /// Compute a run for the requested period and append it to history.
    ///
    /// Not idempotent: every call records a new run with a fresh id.
    pub fn run_payroll(
        &mut self,
        session: &mut Session,
        req: &RunPayrollRequest,
    ) -> Result<PayrollRun, LedgerError> {
        if session.dataset.employees.is_empty() {
            return Err(LedgerError::EmptyRoster);
        }
        let history = &session.dataset.payroll_history;
        let run_id = PayrollRunId::from(self.ids.next(PAYROLL_RUN_PREFIX, |candidate| {
            history.iter().any(|r| r.id.as_str() == candidate)
        }));
        let run = payroll::compute_run(&session.dataset, req.period, run_id)?;

        let mut dataset = session.dataset.clone();
        dataset.payroll_history.push(run.clone());
        self.commit(session, dataset)?;

        tracing::info!(
            org_id = %session.organization.id,
            run_id = %run.id,
            period = %req.period,
            records = run.records.len(),
            total_cost = %run.total_cost,
            "payroll run recorded"
        );
        Ok(run)
    }

    fn commit(
        &mut self,
        session: &mut Session,
        dataset: OrganizationDataset,
    ) -> Result<(), LedgerError> {
        self.store.save_dataset(&session.organization.id, &dataset)?;
        session.dataset = dataset;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
