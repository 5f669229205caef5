//! Property-Based and Fake Data Generators
//!
//! Proptest strategies that only produce values a form would accept, plus
//! `fake`-backed helpers for realistic-looking insured persons.

use chrono::NaiveDate;
use core_kernel::{ChoiceCode, FieldMap};
use domain_insured::MaritalStatus;
use domain_policy::{Insurer, ReportPeriod};
use fake::faker::address::en::StreetName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for premiums that fit the stored precision (0.00 to 999999.99)
pub fn premium_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for accepted commission percentages
pub fn commission_percentage_strategy() -> impl Strategy<Value = u32> {
    0u32..=50u32
}

/// Strategy for policy codes of up to 25 characters
pub fn policy_code_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9-]{1,25}"
}

/// Strategy for insurers
pub fn insurer_strategy() -> impl Strategy<Value = Insurer> {
    proptest::sample::select(Insurer::ALL)
}

/// Strategy for marital statuses
pub fn marital_status_strategy() -> impl Strategy<Value = MaritalStatus> {
    proptest::sample::select(MaritalStatus::ALL)
}

/// Strategy for report periods between 2000 and 2099
pub fn report_period_strategy() -> impl Strategy<Value = ReportPeriod> {
    (2000i32..2100i32, 1u32..=12u32).prop_map(|(year, month)| ReportPeriod::new(year, month))
}

/// Strategy for a day inside the given period
pub fn date_in_period_strategy(period: ReportPeriod) -> impl Strategy<Value = NaiveDate> {
    let (start, end) = period
        .date_range()
        .expect("strategy needs a calendar month");
    let days = (end - start).num_days();
    (0..days).prop_map(move |offset| start + chrono::Duration::days(offset))
}

/// A random but valid insured registration form
pub fn fake_insured_form() -> FieldMap {
    let name: String = Name().fake();
    let address: String = StreetName().fake();
    let email: String = SafeEmail().fake();
    let phone: String = NumberWithFormat("(##)#####-####").fake();
    let cpf: String = NumberWithFormat("###########").fake();
    let birth_year: i32 = (1940..2005).fake();
    let marital_status = MaritalStatus::ALL[(0..MaritalStatus::ALL.len()).fake::<usize>()];

    [
        ("nome", truncate(&name, 50)),
        ("nascimento", format!("{}-06-15", birth_year)),
        ("telefone", phone),
        ("email", email),
        ("cpf", cpf),
        ("endereco", truncate(&address, 50)),
        ("estado_civil", marital_status.code().to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_insured::InsuredDraft;

    #[test]
    fn test_fake_insured_forms_validate() {
        for _ in 0..20 {
            let fields = fake_insured_form();
            assert!(
                InsuredDraft::from_fields(&fields).is_ok(),
                "fake form rejected: {:?}",
                fields
            );
        }
    }

    proptest! {
        #[test]
        fn generated_premiums_fit_the_column(premium in premium_strategy()) {
            prop_assert!(core_kernel::Money::premium(premium).is_ok());
        }

        #[test]
        fn generated_dates_fall_in_their_period(
            (period, date) in report_period_strategy()
                .prop_flat_map(|p| (Just(p), date_in_period_strategy(p)))
        ) {
            prop_assert!(period.contains(date));
        }
    }
}
