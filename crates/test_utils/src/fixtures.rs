//! Pre-built Test Fixtures
//!
//! The reference records used across the test suite: an insured person
//! named "TesteNome", a vehicle with plate "Placa1" and a policy
//! "TesteCodigo" worth R$ 2000.00 at 10% commission, effective in May 2022.

use chrono::NaiveDate;
use core_kernel::FieldMap;
use domain_insured::InsuredDraft;
use domain_policy::{PolicyDraft, VehicleDraft};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Builds a field map from literal pairs
pub fn form(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Fixture for submitted forms
pub struct FormFixtures;

impl FormFixtures {
    /// A complete insured registration form
    pub fn insured() -> FieldMap {
        Self::insured_named("TesteNome")
    }

    /// A complete insured registration form with the given name
    pub fn insured_named(name: &str) -> FieldMap {
        form(&[
            ("nome", name),
            ("nascimento", "2000-01-01"),
            ("telefone", "TesteTelefone"),
            ("email", "teste@exemplo.com"),
            ("cpf", "TesteCPF"),
            ("endereco", "TesteEndereço"),
            ("estado_civil", "NI"),
        ])
    }

    /// A complete policy registration form, vehicle fields included
    pub fn policy() -> FieldMap {
        Self::policy_with("TesteCodigo", "2022-05-10", "2000.00", "10")
    }

    /// A policy registration form with the fields reports care about
    pub fn policy_with(code: &str, effective_date: &str, premium: &str, percentage: &str) -> FieldMap {
        let mut fields = Self::vehicle();
        fields.extend(form(&[
            ("codigo", code),
            ("seguradora", "BR"),
            ("vigencia", effective_date),
            ("premio", premium),
            ("perc_comissao", percentage),
        ]));
        fields
    }

    /// The vehicle half of a policy form
    pub fn vehicle() -> FieldMap {
        form(&[
            ("modelo", "TestModelo1"),
            ("placa", "Placa1"),
            ("chassi", "TestChassi1"),
            ("ano_modelo", "2000"),
            ("alienado", "false"),
        ])
    }
}

/// Fixture for validated drafts, for tests that talk to a store directly
pub struct DraftFixtures;

impl DraftFixtures {
    pub fn insured() -> InsuredDraft {
        Self::insured_named("TesteNome")
    }

    pub fn insured_named(name: &str) -> InsuredDraft {
        InsuredDraft::from_fields(&FormFixtures::insured_named(name))
            .expect("insured fixture should be valid")
    }

    pub fn policy() -> PolicyDraft {
        Self::policy_with("TesteCodigo", DateFixtures::report_day(), dec!(2000.00), 10)
    }

    pub fn policy_with(
        code: &str,
        effective_date: NaiveDate,
        premium: Decimal,
        percentage: u32,
    ) -> PolicyDraft {
        let fields = FormFixtures::policy_with(
            code,
            &effective_date.format("%Y-%m-%d").to_string(),
            &premium.to_string(),
            &percentage.to_string(),
        );
        PolicyDraft::from_fields(&fields).expect("policy fixture should be valid")
    }

    pub fn vehicle() -> VehicleDraft {
        VehicleDraft::from_fields(&FormFixtures::vehicle()).expect("vehicle fixture should be valid")
    }
}

/// Fixture for dates around the reference report month
pub struct DateFixtures;

impl DateFixtures {
    /// A day inside the reference month (May 2022)
    pub fn report_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 5, 10).expect("valid date")
    }

    /// The last day before the reference month
    pub fn before_report_month() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 4, 30).expect("valid date")
    }

    /// The first day after the reference month
    pub fn after_report_month() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 6, 1).expect("valid date")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid() {
        let _ = DraftFixtures::insured();
        let _ = DraftFixtures::vehicle();
        let policy = DraftFixtures::policy();
        assert_eq!(policy.code, "TesteCodigo");
        assert_eq!(policy.net_premium, dec!(2000.00));
    }

    #[test]
    fn test_policy_form_contains_vehicle_fields() {
        let fields = FormFixtures::policy();
        assert_eq!(fields.get("placa").map(String::as_str), Some("Placa1"));
        assert_eq!(fields.get("codigo").map(String::as_str), Some("TesteCodigo"));
    }
}
