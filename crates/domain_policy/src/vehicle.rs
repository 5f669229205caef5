//! Vehicle entity and form
//!
//! A vehicle is created together with the policy that covers it and is
//! replaced whenever that policy is edited.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use core_kernel::{FieldErrors, FieldMap, FieldReader, VehicleId};

/// Latest model year a vehicle may declare
pub const MAX_MODEL_YEAR: u32 = 2099;

/// Submitted field names for a vehicle
pub mod field {
    pub const MODEL: &str = "modelo";
    pub const PLATE: &str = "placa";
    pub const CHASSIS: &str = "chassi";
    pub const MODEL_YEAR: &str = "ano_modelo";
    pub const LIEN: &str = "alienado";
}

/// An insured vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub model: String,
    pub plate: String,
    pub chassis: String,
    pub model_year: u32,
    /// Whether the vehicle is encumbered by a lender; `None` when unknown
    pub lien: Option<bool>,
}

impl Vehicle {
    pub fn from_draft(id: VehicleId, draft: VehicleDraft) -> Self {
        Self {
            id,
            model: draft.model,
            plate: draft.plate,
            chassis: draft.chassis,
            model_year: draft.model_year,
            lien: draft.lien,
        }
    }

    /// Replaces every field except the id
    pub fn apply(&mut self, draft: VehicleDraft) {
        *self = Self::from_draft(self.id, draft);
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plate)
    }
}

/// The validated vehicle half of a policy form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VehicleDraft {
    #[validate(length(max = 50))]
    pub model: String,
    #[validate(length(max = 7))]
    pub plate: String,
    #[validate(length(max = 17))]
    pub chassis: String,
    #[validate(range(max = 2099))]
    pub model_year: u32,
    pub lien: Option<bool>,
}

const FORM_NAMES: &[(&str, &str)] = &[
    ("model", field::MODEL),
    ("plate", field::PLATE),
    ("chassis", field::CHASSIS),
    ("model_year", field::MODEL_YEAR),
];

impl VehicleDraft {
    /// Parses and validates the vehicle fields of a submitted form
    ///
    /// A missing `alienado` field means `false`; an explicit `unknown`,
    /// `null` or blank value stores "not known".
    pub fn from_fields(fields: &FieldMap) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(fields);
        let model = reader.required_text(field::MODEL);
        let plate = reader.required_text(field::PLATE);
        let chassis = reader.required_text(field::CHASSIS);
        let model_year = reader.required_unsigned(field::MODEL_YEAR);
        let lien = reader.nullable_bool(field::LIEN, Some(false));
        let mut errors = reader.finish();

        let draft = VehicleDraft {
            model: model.unwrap_or_default(),
            plate: plate.unwrap_or_default(),
            chassis: chassis.unwrap_or_default(),
            model_year: model_year.unwrap_or_default(),
            lien: lien.flatten(),
        };
        if let Err(invalid) = draft.validate() {
            errors.merge(FieldErrors::from_validation(invalid, FORM_NAMES));
        }
        errors.into_result(draft)
    }
}
