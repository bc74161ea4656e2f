//! Onboarding domain model — the aggregate collected by the five-step wizard.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::WizardStep;

/// Display currency for every amount the user enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    CNY,
    INR,
    BRL,
}

impl Default for Currency {
    fn default() -> Self {
        Self::USD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// What the user wants to get out of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialFocus {
    Saving,
    Debt,
    Investing,
    Tracking,
    All,
}

/// Kind of financial account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
    Investment,
}

/// Category of an investment account's holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentType {
    Stocks,
    Bonds,
    MutualFunds,
    Etfs,
    RealEstate,
    Crypto,
    SavingsAccounts,
    Cds,
    Reits,
    DividendStocks,
}

/// How an investment account is expected to grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthType {
    Fixed,
    Variable,
}

/// How much analytical detail the user wants in insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightLevel {
    Simple,
    Detailed,
}

impl Default for InsightLevel {
    fn default() -> Self {
        Self::Simple
    }
}

/// How often a recurring payment repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// A savings goal with a target amount and optional deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

/// Extra fields carried only by investment-typed accounts.
///
/// `fixed_growth_rate` is present only when `growth_type` is `Fixed`; the
/// draft builder drops it otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentDetails {
    pub investment_type: InvestmentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_invested: Option<Decimal>,
    pub growth_type: GrowthType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_growth_rate: Option<Decimal>,
}

/// A financial account. Balance is positive for assets; for credit accounts
/// it is the debt magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment: Option<InvestmentDetails>,
}

/// A tracked payment, either recurring or one-time.
///
/// `account_id` and `goal_id` are soft references — removing the target
/// leaves them dangling, and readers never dereference them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<Uuid>,
    /// Present iff `recurring` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<PaymentFrequency>,
}

/// Notification toggles, all opt-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub payment_reminders: bool,
    pub goal_progress: bool,
    pub investment_performance: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            payment_reminders: true,
            goal_progress: true,
            investment_performance: true,
        }
    }
}

/// Everything the wizard collects, plus flow position.
///
/// Owned exclusively by the [`OnboardingController`](super::controller::OnboardingController);
/// the store only mirrors it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingData {
    // Step 1: profile
    pub preferred_name: String,
    pub currency: Currency,
    pub country: String,

    // Step 2: financial goals
    pub financial_focus: Vec<FinancialFocus>,
    pub goals: Vec<Goal>,

    // Step 3: accounts
    pub accounts: Vec<Account>,

    // Step 4: payments
    pub track_recurring: bool,
    pub track_one_time: bool,
    pub payments: Vec<Payment>,

    // Step 5: preferences
    pub insight_level: InsightLevel,
    pub notifications: NotificationPrefs,

    // Flow position
    pub completed: bool,
    pub current_step: WizardStep,
}

impl Default for OnboardingData {
    fn default() -> Self {
        Self {
            preferred_name: String::new(),
            currency: Currency::default(),
            country: String::new(),
            financial_focus: Vec::new(),
            goals: Vec::new(),
            accounts: Vec::new(),
            track_recurring: true,
            track_one_time: true,
            payments: Vec::new(),
            insight_level: InsightLevel::default(),
            notifications: NotificationPrefs::default(),
            completed: false,
            current_step: WizardStep::default(),
        }
    }
}

/// Partial update over [`OnboardingData`] — every field optional.
///
/// Applied as a shallow merge: a present field replaces the whole field,
/// collections included. The controller does not validate patches; callers
/// (the step views) validate before submitting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingPatch {
    pub preferred_name: Option<String>,
    pub currency: Option<Currency>,
    pub country: Option<String>,
    pub financial_focus: Option<Vec<FinancialFocus>>,
    pub goals: Option<Vec<Goal>>,
    pub accounts: Option<Vec<Account>>,
    pub track_recurring: Option<bool>,
    pub track_one_time: Option<bool>,
    pub payments: Option<Vec<Payment>>,
    pub insight_level: Option<InsightLevel>,
    pub notifications: Option<NotificationPrefs>,
    pub completed: Option<bool>,
    pub current_step: Option<WizardStep>,
}

impl OnboardingPatch {
    /// Shallow-merge this patch into `data`.
    pub fn apply(self, data: &mut OnboardingData) {
        if let Some(v) = self.preferred_name {
            data.preferred_name = v;
        }
        if let Some(v) = self.currency {
            data.currency = v;
        }
        if let Some(v) = self.country {
            data.country = v;
        }
        if let Some(v) = self.financial_focus {
            data.financial_focus = v;
        }
        if let Some(v) = self.goals {
            data.goals = v;
        }
        if let Some(v) = self.accounts {
            data.accounts = v;
        }
        if let Some(v) = self.track_recurring {
            data.track_recurring = v;
        }
        if let Some(v) = self.track_one_time {
            data.track_one_time = v;
        }
        if let Some(v) = self.payments {
            data.payments = v;
        }
        if let Some(v) = self.insight_level {
            data.insight_level = v;
        }
        if let Some(v) = self.notifications {
            data.notifications = v;
        }
        if let Some(v) = self.completed {
            data.completed = v;
        }
        if let Some(v) = self.current_step {
            data.current_step = v;
        }
    }
}

/// Versioned storage envelope for the onboarding blob.
///
/// An unversioned blob would make any future shape change discard user data
/// wholesale; the envelope lets new versions add an upgrade arm in
/// [`StoredOnboarding::into_data`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredOnboarding {
    pub version: u32,
    pub data: serde_json::Value,
}

/// Current envelope version.
pub const STORAGE_VERSION: u32 = 1;

impl StoredOnboarding {
    /// Wrap the aggregate for storage at the current version.
    pub fn wrap(data: &OnboardingData) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(Self {
            version: STORAGE_VERSION,
            data: serde_json::to_value(data)?,
        })
    }

    /// Unwrap a stored value, upgrading older versions as needed.
    ///
    /// `None` means the value is unusable (unknown version or undecodable
    /// payload) and the caller should fall back to defaults.
    pub fn unwrap_value(value: serde_json::Value) -> Option<OnboardingData> {
        let envelope: Self = serde_json::from_value(value).ok()?;
        envelope.into_data()
    }

    fn into_data(self) -> Option<OnboardingData> {
        match self.version {
            STORAGE_VERSION => serde_json::from_value(self.data).ok(),
            _ => None,
        }
    }
}

/// Settings keys used for onboarding persistence.
pub mod storage_keys {
    /// Key for the onboarding envelope in the settings table.
    pub const ONBOARDING_DATA: &str = "onboarding_data";
    /// Default user ID (single-user system).
    pub const DEFAULT_USER: &str = "default";
}
