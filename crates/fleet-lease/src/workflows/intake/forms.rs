//! Editable drafts behind the "add lessee" and "new lease" screens.
//!
//! Setters mirror the form's input handlers: phone numbers are reformatted on every change,
//! selecting a vehicle pre-fills pricing, and picking a start date proposes an end date.
//! Validation is separate and never mutates the draft.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::workflows::fleet::{LesseeId, Vehicle, VehicleId};
use crate::workflows::leases::{suggested_end_date, suggested_terms, LeaseQuote};
use crate::workflows::validation::{format_phone_number, rules, FieldErrors, Validate};

pub const DEFAULT_MILEAGE_LIMIT: &str = "12000";

/// Mileage options offered by the lease form.
pub const MILEAGE_OPTIONS: [u32; 6] = [10_000, 12_000, 15_000, 18_000, 20_000, 25_000];

/// Standalone lessee registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LesseeForm {
    pub name: String,
    pub vehicle_id: String,
    pub email: String,
    pub phone: String,
}

/// Lessee fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LesseeDetails {
    pub name: String,
    pub vehicle_id: VehicleId,
    pub email: String,
    pub phone: String,
}

impl LesseeForm {
    pub fn set_phone(&mut self, raw: &str) {
        self.phone = format_phone_number(raw);
    }

    /// Re-apply input formatting to values that arrived in one piece.
    pub fn normalized(mut self) -> Self {
        let raw = std::mem::take(&mut self.phone);
        self.set_phone(&raw);
        self
    }

    pub fn validated(&self) -> Result<LesseeDetails, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.check("name", rules::person_name(&self.name, "Lessee name is required"));
        let vehicle_id = errors.check(
            "vehicle_id",
            rules::selection(&self.vehicle_id, "Please select a vehicle"),
        );
        let email = errors.check("email", rules::email(&self.email));
        let phone = errors.check("phone", rules::phone(&self.phone));

        match (name, vehicle_id, email, phone) {
            (Some(name), Some(vehicle_id), Some(email), Some(phone)) => {
                Ok(LesseeDetails {
                    name,
                    vehicle_id: VehicleId::from(vehicle_id),
                    email,
                    phone,
                })
            }
            _ => Err(errors),
        }
    }
}

impl Validate for LesseeForm {
    fn validate(&self) -> FieldErrors {
        self.validated().err().unwrap_or_default()
    }
}

/// Inline lessee created together with a lease.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewLesseeForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLesseeDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewLesseeForm {
    pub fn set_phone(&mut self, raw: &str) {
        self.phone = format_phone_number(raw);
    }

    pub fn validated(&self) -> Result<NewLesseeDetails, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.check("name", rules::person_name(&self.name, "Name is required"));
        let email = errors.check("email", rules::email(&self.email));
        let phone = errors.check("phone", rules::phone(&self.phone));

        match (name, email, phone) {
            (Some(name), Some(email), Some(phone)) => Ok(NewLesseeDetails { name, email, phone }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LesseeMode {
    #[default]
    Existing,
    New,
}

/// Who signs the lease once the draft is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseParty {
    Existing(LesseeId),
    New(NewLesseeDetails),
}

/// New-lease form state. Amounts stay as typed until validation parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaseDraft {
    pub vehicle_id: String,
    pub lessee_mode: LesseeMode,
    pub lessee_id: String,
    pub new_lessee: NewLesseeForm,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub monthly_payment: String,
    pub security_deposit: String,
    pub mileage_limit: String,
    pub terms: String,
    pub notes: String,
}

impl Default for LeaseDraft {
    fn default() -> Self {
        Self {
            vehicle_id: String::new(),
            lessee_mode: LesseeMode::Existing,
            lessee_id: String::new(),
            new_lessee: NewLesseeForm::default(),
            start_date: None,
            end_date: None,
            monthly_payment: String::new(),
            security_deposit: String::new(),
            mileage_limit: DEFAULT_MILEAGE_LIMIT.to_string(),
            terms: String::new(),
            notes: String::new(),
        }
    }
}

/// Parsed lease terms ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseTerms {
    pub vehicle_id: VehicleId,
    pub party: LeaseParty,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_payment: Decimal,
    pub security_deposit: Decimal,
    pub mileage_limit: u32,
    pub terms: String,
    pub notes: Option<String>,
}

impl LeaseDraft {
    /// Choose a vehicle. A known vehicle overwrites payment and deposit with its suggested
    /// pricing; an unknown one clears them. Editing the amounts afterwards keeps the edits.
    pub fn select_vehicle(&mut self, vehicle_id: &str, vehicle: Option<&Vehicle>) {
        self.vehicle_id = vehicle_id.to_string();
        match vehicle {
            Some(vehicle) => {
                let (monthly, deposit) = suggested_terms(vehicle.monthly_rate);
                self.monthly_payment = monthly.normalize().to_string();
                self.security_deposit = deposit.normalize().to_string();
            }
            None => {
                self.monthly_payment.clear();
                self.security_deposit.clear();
            }
        }
    }

    /// Set the start date, proposing an end date one year out if none is chosen yet.
    pub fn set_start_date(&mut self, start: Option<NaiveDate>) {
        self.start_date = start;
        if let (Some(start), None) = (start, self.end_date) {
            self.end_date = suggested_end_date(start);
        }
    }

    pub fn set_new_lessee_phone(&mut self, raw: &str) {
        self.new_lessee.set_phone(raw);
    }

    pub fn normalized(mut self) -> Self {
        let raw = std::mem::take(&mut self.new_lessee.phone);
        self.set_new_lessee_phone(&raw);
        self
    }

    pub fn quote(&self) -> LeaseQuote {
        let monthly = Decimal::from_str(self.monthly_payment.trim()).ok();
        LeaseQuote::new(self.start_date, self.end_date, monthly)
    }

    pub fn validated(&self) -> Result<LeaseTerms, FieldErrors> {
        let mut errors = FieldErrors::new();

        let vehicle_id = errors.check(
            "vehicle_id",
            rules::selection(&self.vehicle_id, "Please select a vehicle"),
        );

        let party = match self.lessee_mode {
            LesseeMode::Existing => errors
                .check(
                    "lessee_id",
                    rules::selection(&self.lessee_id, "Please select a lessee"),
                )
                .map(|id| LeaseParty::Existing(LesseeId::from(id))),
            LesseeMode::New => match self.new_lessee.validated() {
                Ok(details) => Some(LeaseParty::New(details)),
                Err(nested) => {
                    errors.nest("new_lessee", nested);
                    None
                }
            },
        };

        let start_date = errors.check("start_date", rules::start_date(self.start_date));
        let end_date = errors.check("end_date", rules::end_date(self.start_date, self.end_date));
        let monthly_payment =
            errors.check("monthly_payment", rules::monthly_payment(&self.monthly_payment));
        let security_deposit = errors.check(
            "security_deposit",
            rules::security_deposit(&self.security_deposit),
        );
        let mileage_limit =
            errors.check("mileage_limit", rules::mileage_limit(&self.mileage_limit));
        let terms = errors.check("terms", rules::terms(&self.terms));

        match (
            vehicle_id,
            party,
            start_date,
            end_date,
            monthly_payment,
            security_deposit,
            mileage_limit,
            terms,
        ) {
            (
                Some(vehicle_id),
                Some(party),
                Some(start_date),
                Some(end_date),
                Some(monthly_payment),
                Some(security_deposit),
                Some(mileage_limit),
                Some(terms),
            ) => {
                let notes = self.notes.trim();
                Ok(LeaseTerms {
                    vehicle_id: VehicleId::from(vehicle_id),
                    party,
                    start_date,
                    end_date,
                    monthly_payment,
                    security_deposit,
                    mileage_limit,
                    terms,
                    notes: (!notes.is_empty()).then(|| notes.to_string()),
                })
            }
            _ => Err(errors),
        }
    }
}

impl Validate for LeaseDraft {
    fn validate(&self) -> FieldErrors {
        self.validated().err().unwrap_or_default()
    }
}
