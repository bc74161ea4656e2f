//! OnboardingController — owns the aggregate and keeps the store in sync.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::error::DatabaseError;
use crate::store::SettingsStore;

use super::model::{OnboardingData, OnboardingPatch, StoredOnboarding, storage_keys};
use super::state::WizardStep;

/// Flow status exposed to the wizard shell and the landing gate.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OnboardingStatus {
    pub completed: bool,
    pub current_step: WizardStep,
    pub is_loading: bool,
}

/// Owns the in-memory onboarding aggregate for the session.
///
/// Every mutating operation writes the whole aggregate through to the store
/// before returning, so the persisted blob and memory never diverge. The
/// store never mutates the aggregate; it only mirrors it.
pub struct OnboardingController {
    store: Arc<dyn SettingsStore>,
    data: RwLock<OnboardingData>,
    loading: AtomicBool,
}

impl OnboardingController {
    /// Create the controller and rehydrate from the store.
    ///
    /// A missing blob is a first run and keeps defaults. A malformed blob
    /// (unparseable JSON, unknown envelope version, undecodable payload) also
    /// falls back to defaults — logged, never surfaced. The loading flag
    /// clears unconditionally afterward.
    pub async fn load(store: Arc<dyn SettingsStore>) -> Self {
        let controller = Self {
            store,
            data: RwLock::new(OnboardingData::default()),
            loading: AtomicBool::new(true),
        };

        match controller
            .store
            .get_setting(storage_keys::DEFAULT_USER, storage_keys::ONBOARDING_DATA)
            .await
        {
            Ok(Some(value)) => match StoredOnboarding::unwrap_value(value) {
                Some(data) => {
                    *controller.data.write().await = data;
                }
                None => {
                    tracing::warn!("Stored onboarding blob is malformed; starting from defaults");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to read onboarding blob: {e}; starting from defaults");
            }
        }

        controller.loading.store(false, Ordering::Release);
        controller
    }

    /// Whether the initial rehydration is still in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Snapshot of the current aggregate.
    pub async fn data(&self) -> OnboardingData {
        self.data.read().await.clone()
    }

    /// Flow status for the shell and gate.
    pub async fn status(&self) -> OnboardingStatus {
        let data = self.data.read().await;
        OnboardingStatus {
            completed: data.completed,
            current_step: data.current_step,
            is_loading: self.is_loading(),
        }
    }

    /// Shallow-merge a partial update and persist.
    ///
    /// Performs no validation — the step views gate their own advance.
    pub async fn update(&self, patch: OnboardingPatch) -> Result<(), DatabaseError> {
        let snapshot = {
            let mut data = self.data.write().await;
            patch.apply(&mut data);
            data.clone()
        };
        self.persist(&snapshot).await
    }

    /// Advance one step, clamped at the last step.
    pub async fn next_step(&self) -> Result<WizardStep, DatabaseError> {
        self.move_to(|step| step.next()).await
    }

    /// Go back one step, clamped at the first step.
    pub async fn prev_step(&self) -> Result<WizardStep, DatabaseError> {
        self.move_to(|step| step.prev()).await
    }

    /// Jump directly to a 1-based step index, clamped into range.
    pub async fn go_to_step(&self, index: u8) -> Result<WizardStep, DatabaseError> {
        self.move_to(|_| WizardStep::from_index_clamped(index)).await
    }

    /// Mark onboarding finished. Does not validate step data; a user may
    /// complete with everything at defaults.
    pub async fn complete(&self) -> Result<(), DatabaseError> {
        let snapshot = {
            let mut data = self.data.write().await;
            data.completed = true;
            data.clone()
        };
        self.persist(&snapshot).await
    }

    /// Delete the stored blob and restore in-memory defaults.
    pub async fn reset(&self) -> Result<(), DatabaseError> {
        self.store
            .delete_setting(storage_keys::DEFAULT_USER, storage_keys::ONBOARDING_DATA)
            .await?;
        *self.data.write().await = OnboardingData::default();
        Ok(())
    }

    async fn move_to(
        &self,
        transition: impl FnOnce(WizardStep) -> WizardStep,
    ) -> Result<WizardStep, DatabaseError> {
        let (step, snapshot) = {
            let mut data = self.data.write().await;
            data.current_step = transition(data.current_step);
            (data.current_step, data.clone())
        };
        self.persist(&snapshot).await?;
        Ok(step)
    }

    /// Write the aggregate through to the store.
    ///
    /// A failed write is surfaced to the caller; the in-memory mutation has
    /// already been applied by then (state first, then mirror).
    async fn persist(&self, data: &OnboardingData) -> Result<(), DatabaseError> {
        let value = StoredOnboarding::wrap(data)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
        self.store
            .set_setting(
                storage_keys::DEFAULT_USER,
                storage_keys::ONBOARDING_DATA,
                &value,
            )
            .await
    }
}
