//! InsuredPerson entity and registration form
//!
//! An insured person is registered once and may then back any number of
//! policies. Deleting one removes every policy that references it; that
//! cascade lives in the store adapters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use core_kernel::{ChoiceCode, FieldErrors, FieldMap, FieldReader, InsuredId};

/// Submitted field names for an insured person
pub mod field {
    pub const NAME: &str = "nome";
    pub const BIRTH_DATE: &str = "nascimento";
    pub const PHONE: &str = "telefone";
    pub const EMAIL: &str = "email";
    pub const CPF: &str = "cpf";
    pub const ADDRESS: &str = "endereco";
    pub const MARITAL_STATUS: &str = "estado_civil";
}

/// Marital status of an insured person
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    #[serde(rename = "SL")]
    Single,
    #[serde(rename = "CS")]
    Married,
    #[serde(rename = "DV")]
    Divorced,
    #[serde(rename = "UE")]
    StableUnion,
    #[default]
    #[serde(rename = "NI")]
    NotInformed,
}

impl MaritalStatus {
    /// Display label shown to brokers
    pub fn label(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "Solteiro",
            MaritalStatus::Married => "Casado",
            MaritalStatus::Divorced => "Divorciado",
            MaritalStatus::StableUnion => "União Estável",
            MaritalStatus::NotInformed => "Não informado",
        }
    }
}

impl ChoiceCode for MaritalStatus {
    const ALL: &'static [Self] = &[
        MaritalStatus::Single,
        MaritalStatus::Married,
        MaritalStatus::Divorced,
        MaritalStatus::StableUnion,
        MaritalStatus::NotInformed,
    ];

    fn code(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "SL",
            MaritalStatus::Married => "CS",
            MaritalStatus::Divorced => "DV",
            MaritalStatus::StableUnion => "UE",
            MaritalStatus::NotInformed => "NI",
        }
    }
}

/// A registered insured person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuredPerson {
    pub id: InsuredId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub phone: String,
    pub email: Option<String>,
    pub cpf: String,
    pub address: String,
    pub marital_status: MaritalStatus,
}

impl InsuredPerson {
    /// Builds the stored record from a validated draft and its assigned id
    pub fn from_draft(id: InsuredId, draft: InsuredDraft) -> Self {
        Self {
            id,
            name: draft.name,
            birth_date: draft.birth_date,
            phone: draft.phone,
            email: draft.email,
            cpf: draft.cpf,
            address: draft.address,
            marital_status: draft.marital_status,
        }
    }

    /// Replaces every field except the id
    pub fn apply(&mut self, draft: InsuredDraft) {
        *self = Self::from_draft(self.id, draft);
    }

    /// Canonical path of this record
    pub fn resource_path(&self) -> String {
        format!("/segurado/{}", self.id)
    }
}

impl fmt::Display for InsuredPerson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The validated content of an insured registration or edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct InsuredDraft {
    #[validate(length(max = 50))]
    pub name: String,
    pub birth_date: NaiveDate,
    #[validate(length(max = 14))]
    pub phone: String,
    #[validate(email, length(max = 75))]
    pub email: Option<String>,
    #[validate(length(max = 12))]
    pub cpf: String,
    #[validate(length(max = 50))]
    pub address: String,
    pub marital_status: MaritalStatus,
}

/// Struct fields paired with the form fields they are read from
const FORM_NAMES: &[(&str, &str)] = &[
    ("name", field::NAME),
    ("phone", field::PHONE),
    ("email", field::EMAIL),
    ("cpf", field::CPF),
    ("address", field::ADDRESS),
];

impl InsuredDraft {
    /// Parses and validates a submitted form
    ///
    /// Every field is checked even when an earlier one fails, so the caller
    /// gets the full set of messages in one pass.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(fields);
        let name = reader.required_text(field::NAME);
        let birth_date = reader.required_date(field::BIRTH_DATE);
        let phone = reader.required_text(field::PHONE);
        let email = reader.optional_text(field::EMAIL);
        let cpf = reader.required_text(field::CPF);
        let address = reader.required_text(field::ADDRESS);
        let marital_status = reader.choice_or(field::MARITAL_STATUS, MaritalStatus::default());
        let mut errors = reader.finish();

        let draft = InsuredDraft {
            name: name.unwrap_or_default(),
            birth_date: birth_date.unwrap_or(NaiveDate::MIN),
            phone: phone.unwrap_or_default(),
            email,
            cpf: cpf.unwrap_or_default(),
            address: address.unwrap_or_default(),
            marital_status: marital_status.unwrap_or_default(),
        };
        if let Err(invalid) = draft.validate() {
            errors.merge(FieldErrors::from_validation(invalid, FORM_NAMES));
        }
        errors.into_result(draft)
    }
}
