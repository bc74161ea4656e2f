//! Per-step validation contract — advance gates and draft-form builders.
//!
//! Each step view validates locally before letting the user continue; the
//! controller itself never validates. Draft types mirror the form state a
//! view holds while the user types: amounts arrive as raw strings and are
//! parsed here.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{
    Account, AccountType, FinancialFocus, Goal, GrowthType, InvestmentDetails, InvestmentType,
    OnboardingData, Payment, PaymentFrequency,
};
use super::state::WizardStep;

/// An inline, field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// What blocks the Continue action on the given step, if anything.
///
/// Empty means the step may advance. Backward navigation is never gated.
pub fn advance_blockers(step: WizardStep, data: &OnboardingData) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match step {
        WizardStep::Profile => {
            if data.preferred_name.trim().is_empty() {
                errors.push(FieldError::new("preferred_name", "Please enter your name"));
            }
            if data.country.is_empty() {
                errors.push(FieldError::new("country", "Please select your country"));
            }
            // Currency always has a valid default and never blocks.
        }
        WizardStep::Accounts => {
            if data.accounts.is_empty() {
                errors.push(FieldError::new(
                    "accounts",
                    "Add at least one account, or skip this step",
                ));
            }
        }
        // Goals, payments, and preferences never block.
        WizardStep::Goals | WizardStep::Payments | WizardStep::Preferences => {}
    }
    errors
}

/// Whether the step offers a Skip action that bypasses its Continue gate.
pub fn skip_allowed(step: WizardStep) -> bool {
    matches!(step, WizardStep::Accounts | WizardStep::Payments)
}

/// Toggle a focus selection, enforcing the `all`-vs-others exclusion.
///
/// Selecting `all` clears every other member (or clears `all` itself when
/// already selected); selecting any other member clears `all` and toggles
/// that member.
pub fn toggle_focus(current: &[FinancialFocus], choice: FinancialFocus) -> Vec<FinancialFocus> {
    if choice == FinancialFocus::All {
        if current.contains(&FinancialFocus::All) {
            Vec::new()
        } else {
            vec![FinancialFocus::All]
        }
    } else {
        let mut updated: Vec<FinancialFocus> = current
            .iter()
            .copied()
            .filter(|f| *f != FinancialFocus::All)
            .collect();
        if let Some(pos) = updated.iter().position(|f| *f == choice) {
            updated.remove(pos);
        } else {
            updated.push(choice);
        }
        updated
    }
}

fn parse_amount(field: &str, raw: &str, message: &str) -> Result<Decimal, FieldError> {
    Decimal::from_str(raw.trim()).map_err(|_| FieldError::new(field, message))
}

/// Draft state for the goal form on step 2.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoalDraft {
    pub name: String,
    pub target_amount: String,
    /// ISO date (`YYYY-MM-DD`), empty for none.
    pub target_date: String,
}

impl GoalDraft {
    /// Build a goal, or the field errors blocking it.
    pub fn build(&self) -> Result<Goal, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Please enter a goal name"));
        }
        let target_amount = match parse_amount(
            "target_amount",
            &self.target_amount,
            "Enter a valid target amount",
        ) {
            Ok(amount) if amount > Decimal::ZERO => Some(amount),
            Ok(_) => {
                errors.push(FieldError::new(
                    "target_amount",
                    "Target amount must be positive",
                ));
                None
            }
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let target_date = if self.target_date.is_empty() {
            None
        } else {
            match chrono::NaiveDate::parse_from_str(&self.target_date, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(FieldError::new("target_date", "Enter a valid date"));
                    None
                }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Goal {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            target_amount: target_amount.unwrap(),
            target_date,
        })
    }
}

/// Draft state for the account form on step 3.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccountDraft {
    pub name: String,
    pub account_type: Option<AccountType>,
    pub balance: String,
    pub investment_type: Option<InvestmentType>,
    pub amount_invested: String,
    pub growth_type: GrowthType,
    pub fixed_growth_rate: String,
}

impl Default for AccountDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            account_type: None,
            balance: String::new(),
            investment_type: None,
            amount_invested: String::new(),
            growth_type: GrowthType::Fixed,
            fixed_growth_rate: String::new(),
        }
    }
}

impl AccountDraft {
    /// Build an account, or the field errors blocking it.
    ///
    /// Investment fields are only read for investment-typed accounts. A
    /// fixed growth rate entered while growth is `Variable` is dropped, so
    /// a stale rate never outlives a growth-type switch.
    pub fn build(&self) -> Result<Account, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Please enter an account name"));
        }
        let account_type = match self.account_type {
            Some(t) => Some(t),
            None => {
                errors.push(FieldError::new("account_type", "Select an account type"));
                None
            }
        };
        let balance = match parse_amount("balance", &self.balance, "Enter a valid balance") {
            Ok(b) => Some(b),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let investment = if account_type == Some(AccountType::Investment) {
            let investment_type = match self.investment_type {
                Some(t) => Some(t),
                None => {
                    errors.push(FieldError::new(
                        "investment_type",
                        "Select an investment type",
                    ));
                    None
                }
            };
            let amount_invested = if self.amount_invested.trim().is_empty() {
                None
            } else {
                match parse_amount(
                    "amount_invested",
                    &self.amount_invested,
                    "Enter a valid invested amount",
                ) {
                    Ok(amount) => Some(amount),
                    Err(e) => {
                        errors.push(e);
                        None
                    }
                }
            };
            let fixed_growth_rate = match self.growth_type {
                GrowthType::Variable => None,
                GrowthType::Fixed if self.fixed_growth_rate.trim().is_empty() => None,
                GrowthType::Fixed => {
                    match parse_amount(
                        "fixed_growth_rate",
                        &self.fixed_growth_rate,
                        "Enter a valid growth rate",
                    ) {
                        Ok(rate) => Some(rate),
                        Err(e) => {
                            errors.push(e);
                            None
                        }
                    }
                }
            };
            investment_type.map(|investment_type| InvestmentDetails {
                investment_type,
                amount_invested,
                growth_type: self.growth_type,
                fixed_growth_rate,
            })
        } else {
            None
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Account {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            account_type: account_type.unwrap(),
            balance: balance.unwrap(),
            investment,
        })
    }
}

/// Draft state for the payment form on step 4.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaymentDraft {
    pub name: String,
    pub amount: String,
    pub recurring: bool,
    pub account_id: Option<Uuid>,
    pub goal_id: Option<Uuid>,
    pub frequency: PaymentFrequency,
}

impl Default for PaymentDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            amount: String::new(),
            recurring: true,
            account_id: None,
            goal_id: None,
            frequency: PaymentFrequency::Monthly,
        }
    }
}

impl PaymentDraft {
    /// Build a payment, or the field errors blocking it.
    ///
    /// The frequency is attached only to recurring payments. The account and
    /// goal links are soft references and are not checked for existence.
    pub fn build(&self) -> Result<Payment, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Please enter a payment name"));
        }
        let amount = match parse_amount("amount", &self.amount, "Enter a valid amount") {
            Ok(amount) if amount > Decimal::ZERO => Some(amount),
            Ok(_) => {
                errors.push(FieldError::new("amount", "Amount must be positive"));
                None
            }
            Err(e) => {
                errors.push(e);
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Payment {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            amount: amount.unwrap(),
            recurring: self.recurring,
            account_id: self.account_id,
            goal_id: self.goal_id,
            frequency: self.recurring.then_some(self.frequency),
        })
    }
}
