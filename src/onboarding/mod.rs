//! Onboarding flow — domain model, step machine, controller, validation,
//! and the wizard's REST surface.

pub mod controller;
pub mod model;
pub mod routes;
pub mod state;
pub mod steps;

pub use controller::{OnboardingController, OnboardingStatus};
pub use model::{OnboardingData, OnboardingPatch};
pub use state::WizardStep;
