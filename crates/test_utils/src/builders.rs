//! Test Data Builders
//!
//! Builders for submitted forms. Tests set only the fields they care about
//! and take the fixture values for the rest; `without` drops a field to
//! simulate an incomplete submission.

use core_kernel::FieldMap;
use domain_insured::InsuredDraft;
use domain_policy::PolicySubmission;

use crate::fixtures::FormFixtures;

/// Builder for insured registration forms
#[derive(Debug, Clone)]
pub struct InsuredFormBuilder {
    fields: FieldMap,
}

impl Default for InsuredFormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InsuredFormBuilder {
    /// Starts from the reference insured form
    pub fn new() -> Self {
        Self {
            fields: FormFixtures::insured(),
        }
    }

    pub fn with_name(self, name: &str) -> Self {
        self.with("nome", name)
    }

    pub fn with_birth_date(self, date: &str) -> Self {
        self.with("nascimento", date)
    }

    pub fn with_email(self, email: &str) -> Self {
        self.with("email", email)
    }

    pub fn with_cpf(self, cpf: &str) -> Self {
        self.with("cpf", cpf)
    }

    pub fn with_marital_status(self, code: &str) -> Self {
        self.with("estado_civil", code)
    }

    /// Sets any field by name
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.fields.insert(field.to_string(), value.to_string());
        self
    }

    /// Removes a field from the submission
    pub fn without(mut self, field: &str) -> Self {
        self.fields.remove(field);
        self
    }

    /// Returns the raw form
    pub fn build(self) -> FieldMap {
        self.fields
    }

    /// Parses the form, panicking if it does not validate
    pub fn build_draft(self) -> InsuredDraft {
        InsuredDraft::from_fields(&self.fields).expect("insured form should validate")
    }
}

/// Builder for policy registration and edit forms (vehicle fields included)
#[derive(Debug, Clone)]
pub struct PolicyFormBuilder {
    fields: FieldMap,
}

impl Default for PolicyFormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyFormBuilder {
    /// Starts from the reference policy form
    pub fn new() -> Self {
        Self {
            fields: FormFixtures::policy(),
        }
    }

    pub fn with_code(self, code: &str) -> Self {
        self.with("codigo", code)
    }

    pub fn with_insurer(self, code: &str) -> Self {
        self.with("seguradora", code)
    }

    pub fn with_effective_date(self, date: &str) -> Self {
        self.with("vigencia", date)
    }

    pub fn with_premium(self, premium: &str) -> Self {
        self.with("premio", premium)
    }

    pub fn with_commission_percentage(self, percentage: &str) -> Self {
        self.with("perc_comissao", percentage)
    }

    pub fn with_plate(self, plate: &str) -> Self {
        self.with("placa", plate)
    }

    pub fn with_model_year(self, year: &str) -> Self {
        self.with("ano_modelo", year)
    }

    pub fn with_lien(self, lien: &str) -> Self {
        self.with("alienado", lien)
    }

    /// Sets any field by name
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.fields.insert(field.to_string(), value.to_string());
        self
    }

    /// Removes a field from the submission
    pub fn without(mut self, field: &str) -> Self {
        self.fields.remove(field);
        self
    }

    /// Returns the raw form
    pub fn build(self) -> FieldMap {
        self.fields
    }

    /// Parses both halves of the form, panicking if either does not validate
    pub fn build_submission(self) -> PolicySubmission {
        PolicySubmission::from_fields(&self.fields).expect("policy form should validate")
    }
}
