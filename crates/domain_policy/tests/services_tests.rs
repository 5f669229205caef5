//! Brokerage Service Tests
//!
//! Exercises `BrokerageService` end to end against the in-memory store.
//!
//! # Test Organization
//!
//! - `insured` - registration, edit, lookup and listing of insured persons
//! - `policy_registration` - the new-policy flow
//! - `policy_edit` - the edit flow and the immutable code
//! - `deletion` - cascades
//! - `search` - listing filters and ordering
//! - `report` - the monthly commission report
//! - `store_failures` - errors unrelated to the request

use std::sync::Arc;

use chrono::NaiveDate;
use core_kernel::{ChoiceCode, FieldMap, InsuredId, PolicyCode, VehicleId};
use domain_policy::{
    BrokerageError, BrokerageService, MockBrokerageStore, PolicyDraft, ReportPeriod,
};
use rust_decimal_macros::dec;
use test_utils::{
    assert_field_error, assert_field_message, assert_policy_codes, assert_total_commission, form,
    FormFixtures,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn insured_form(name: &str) -> FieldMap {
    FormFixtures::insured_named(name)
}

fn policy_form(code: &str, effective_date: &str, premium: &str, percentage: &str) -> FieldMap {
    FormFixtures::policy_with(code, effective_date, premium, percentage)
}

fn setup() -> (BrokerageService, MockBrokerageStore) {
    let store = MockBrokerageStore::new();
    let service = BrokerageService::new(Arc::new(store.clone()));
    (service, store)
}

async fn register(service: &BrokerageService, name: &str) -> InsuredId {
    service.register_insured(&insured_form(name)).await.unwrap().id
}

// ============================================================================
// INSURED PERSONS
// ============================================================================

mod insured {
    use super::*;

    #[tokio::test]
    async fn test_register_assigns_sequential_ids() {
        let (service, _) = setup();
        let first = register(&service, "TesteNome").await;
        let second = register(&service, "SeguradoBusca").await;

        assert_eq!(first, InsuredId::new(1));
        assert_eq!(second, InsuredId::new(2));
    }

    #[tokio::test]
    async fn test_register_round_trips_fields() {
        let (service, _) = setup();
        let id = register(&service, "TesteNome").await;

        let details = service.get_insured(id).await.unwrap();
        assert_eq!(details.insured.name, "TesteNome");
        assert_eq!(details.insured.birth_date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(details.insured.resource_path(), "/segurado/1");
        assert!(details.policies.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_registration_stores_nothing() {
        let (service, _) = setup();
        let mut fields = insured_form("TesteNome");
        fields.remove("cpf");

        let err = service.register_insured(&fields).await.unwrap_err();
        assert_field_error(err.field_errors().unwrap(), "cpf");
        assert!(service.list_insured(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_replaces_fields() {
        let (service, _) = setup();
        let id = register(&service, "TesteNome").await;

        let mut fields = insured_form("Nome Editado");
        fields.insert("estado_civil".to_string(), "CS".to_string());
        let edited = service.edit_insured(id, &fields).await.unwrap();

        assert_eq!(edited.id, id);
        assert_eq!(edited.name, "Nome Editado");
        assert_eq!(edited.marital_status.code(), "CS");
    }

    #[tokio::test]
    async fn test_edit_unknown_insured() {
        let (service, _) = setup();
        let err = service
            .edit_insured(InsuredId::new(99), &insured_form("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_insured_lists_policies_by_code() {
        let (service, _) = setup();
        let id = register(&service, "TesteNome").await;
        for code in ["B-2", "A-1"] {
            service
                .register_policy(id, &policy_form(code, "2022-04-01", "100.00", "10"))
                .await
                .unwrap();
        }

        let details = service.get_insured(id).await.unwrap();
        assert_policy_codes(&details.policies, &["A-1", "B-2"]);
    }
}

// ============================================================================
// POLICY REGISTRATION
// ============================================================================

mod policy_registration {
    use super::*;

    #[tokio::test]
    async fn test_register_creates_policy_and_vehicle() {
        let (service, store) = setup();
        let id = register(&service, "TesteNome").await;

        let details = service
            .register_policy(id, &policy_form("codigoteste", "2022-05-22", "2000.00", "10"))
            .await
            .unwrap();

        assert_eq!(store.policy_count().await, 1);
        assert_eq!(store.vehicle_count().await, 1);
        assert_eq!(details.policy.insured_id, id);
        assert_eq!(details.policy.vehicle_id, details.vehicle.id);
        assert_eq!(details.insured.id, id);
        assert_eq!(details.policy.net_premium, dec!(2000.00));
        assert_eq!(details.policy.total_commission(), dec!(200.00));
        assert_eq!(details.vehicle.lien, Some(false));
    }

    #[tokio::test]
    async fn test_unknown_insured_is_not_found() {
        let (service, store) = setup();
        let err = service
            .register_policy(InsuredId::new(1), &policy_form("X", "2022-05-22", "1.00", "1"))
            .await
            .unwrap_err();

        assert!(matches!(err, BrokerageError::NotFound { ref entity, .. } if entity == "InsuredPerson"));
        assert_eq!(store.vehicle_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_vehicle_fields_store_nothing() {
        let (service, store) = setup();
        let id = register(&service, "TesteNome").await;
        let fields = form(&[
            ("codigo", "codnovoteste"),
            ("seguradora", "BR"),
            ("vigencia", "2022-05-22"),
            ("premio", "2000.00"),
            ("perc_comissao", "10"),
        ]);

        let err = service.register_policy(id, &fields).await.unwrap_err();
        assert_field_error(err.field_errors().unwrap(), "placa");
        assert_eq!(store.policy_count().await, 0);
        assert_eq!(store.vehicle_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let (service, store) = setup();
        let id = register(&service, "TesteNome").await;
        let fields = policy_form("TesteCodigo", "2022-05-22", "2000.00", "10");
        service.register_policy(id, &fields).await.unwrap();

        let err = service.register_policy(id, &fields).await.unwrap_err();
        assert!(matches!(err, BrokerageError::DuplicateKey(ref code) if code.as_str() == "TesteCodigo"));
        assert_eq!(store.policy_count().await, 1);
        assert_eq!(store.vehicle_count().await, 1);
    }
}

// ============================================================================
// POLICY EDIT
// ============================================================================

mod policy_edit {
    use super::*;

    async fn with_policy() -> (BrokerageService, MockBrokerageStore, PolicyCode) {
        let (service, store) = setup();
        let id = register(&service, "TesteNome").await;
        service
            .register_policy(id, &policy_form("TesteCodigo", "2022-04-01", "2000.00", "10"))
            .await
            .unwrap();
        (service, store, PolicyCode::from("TesteCodigo"))
    }

    #[tokio::test]
    async fn test_edit_updates_policy_and_vehicle() {
        let (service, _, code) = with_policy().await;
        let mut fields = policy_form("TesteCodigo", "2022-06-01", "1500.50", "20");
        fields.insert("placa".to_string(), "NEW0001".to_string());

        let details = service.edit_policy(&code, &fields).await.unwrap();
        assert_eq!(details.policy.net_premium, dec!(1500.50));
        assert_eq!(details.policy.commission_percentage, 20);
        assert_eq!(details.vehicle.plate, "NEW0001");

        let reloaded = service.get_policy(&code).await.unwrap();
        assert_eq!(reloaded, details);
    }

    #[tokio::test]
    async fn test_changed_code_is_rejected_and_nothing_changes() {
        let (service, _, code) = with_policy().await;
        let before = service.get_policy(&code).await.unwrap();

        // the vehicle half is invalid too; the code check must win
        let mut fields = policy_form("OutroCodigo", "2023-01-01", "10.00", "5");
        fields.insert("ano_modelo".to_string(), "3000".to_string());

        let err = service.edit_policy(&code, &fields).await.unwrap_err();
        match err {
            BrokerageError::CodeImmutable { stored, submitted } => {
                assert_eq!(stored, code);
                assert_eq!(submitted, "OutroCodigo");
            }
            other => panic!("expected CodeImmutable, got {:?}", other),
        }
        assert_eq!(service.get_policy(&code).await.unwrap(), before);
        assert!(service.get_policy(&PolicyCode::from("OutroCodigo")).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_policy_fields_come_before_code_check() {
        let (service, _, code) = with_policy().await;
        let fields = policy_form("OutroCodigo", "2023-01-01", "10.00", "51");

        let err = service.edit_policy(&code, &fields).await.unwrap_err();
        assert_field_message(
            err.field_errors().unwrap(),
            "perc_comissao",
            "Ensure this value is less than or equal to 50.",
        );
    }

    #[tokio::test]
    async fn test_invalid_vehicle_leaves_policy_unchanged() {
        let (service, _, code) = with_policy().await;
        let before = service.get_policy(&code).await.unwrap();
        let mut fields = policy_form("TesteCodigo", "2023-01-01", "10.00", "5");
        fields.insert("ano_modelo".to_string(), "3000".to_string());

        let err = service.edit_policy(&code, &fields).await.unwrap_err();
        assert_field_error(err.field_errors().unwrap(), "ano_modelo");
        assert_eq!(service.get_policy(&code).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_edit_unknown_policy() {
        let (service, _, _) = with_policy().await;
        let err = service
            .edit_policy(&PolicyCode::from("nope"), &policy_form("nope", "2022-01-01", "1.00", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerageError::NotFound { .. }));
    }
}

// ============================================================================
// DELETION
// ============================================================================

mod deletion {
    use super::*;

    #[tokio::test]
    async fn test_delete_insured_cascades() {
        let (service, store) = setup();
        let owner = register(&service, "TesteNome").await;
        let other = register(&service, "Outro").await;
        service
            .register_policy(owner, &policy_form("X", "2022-05-01", "100.00", "10"))
            .await
            .unwrap();
        service
            .register_policy(other, &policy_form("Y", "2022-05-01", "100.00", "10"))
            .await
            .unwrap();

        service.delete_insured(owner).await.unwrap();

        assert!(service.get_insured(owner).await.is_err());
        assert!(service.get_policy(&PolicyCode::from("X")).await.is_err());
        let remaining = service.list_policies(None).await.unwrap();
        assert!(remaining.iter().all(|p| p.insured_id != owner));
        assert_eq!(remaining.len(), 1);
        assert_eq!(store.vehicle_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_insured() {
        let (service, _) = setup();
        let err = service.delete_insured(InsuredId::new(5)).await.unwrap_err();
        assert!(matches!(err, BrokerageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_policy_removes_vehicle() {
        let (service, store) = setup();
        let id = register(&service, "TesteNome").await;
        service
            .register_policy(id, &policy_form("X", "2022-05-01", "100.00", "10"))
            .await
            .unwrap();

        service.delete_policy(&PolicyCode::from("X")).await.unwrap();

        assert_eq!(store.policy_count().await, 0);
        assert_eq!(store.vehicle_count().await, 0);
        assert!(service.get_insured(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_shared_vehicle_survives_until_last_policy_goes() {
        let (service, store) = setup();
        let id = register(&service, "TesteNome").await;
        let details = service
            .register_policy(id, &policy_form("TesteCodigo", "2022-04-01", "2000.00", "10"))
            .await
            .unwrap();
        let extra = PolicyDraft::from_fields(&policy_form("TesteBusca", "2022-01-01", "1000.00", "10"))
            .unwrap();
        store
            .attach_policy(id, details.vehicle.id, extra)
            .await
            .unwrap();

        service.delete_policy(&PolicyCode::from("TesteCodigo")).await.unwrap();
        assert_eq!(store.vehicle_count().await, 1);
        let survivor = service.get_policy(&PolicyCode::from("TesteBusca")).await.unwrap();
        assert_eq!(survivor.vehicle.id, details.vehicle.id);

        service.delete_policy(&PolicyCode::from("TesteBusca")).await.unwrap();
        assert_eq!(store.vehicle_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_policy() {
        let (service, _) = setup();
        let err = service.delete_policy(&PolicyCode::from("X")).await.unwrap_err();
        assert!(matches!(err, BrokerageError::NotFound { ref entity, .. } if entity == "Policy"));
    }

    #[tokio::test]
    async fn test_attach_to_unknown_vehicle() {
        let (service, store) = setup();
        let id = register(&service, "TesteNome").await;
        let draft = PolicyDraft::from_fields(&policy_form("Z", "2022-01-01", "1.00", "1")).unwrap();
        assert!(store.attach_policy(id, VehicleId::new(42), draft).await.is_err());
    }
}

// ============================================================================
// SEARCH
// ============================================================================

mod search {
    use super::*;

    /// Two insured persons, each owning one policy
    async fn seeded() -> BrokerageService {
        let (service, _) = setup();
        let alfa = register(&service, "Segurado Alfa").await;
        let beta = register(&service, "Cliente Beta").await;
        service
            .register_policy(alfa, &policy_form("TesteCodigo", "2022-04-01", "2000.00", "10"))
            .await
            .unwrap();
        service
            .register_policy(beta, &policy_form("TesteBusca", "2022-01-01", "1000.00", "10"))
            .await
            .unwrap();
        service
    }

    #[tokio::test]
    async fn test_policies_ordered_by_code() {
        let service = seeded().await;
        let policies = service.list_policies(None).await.unwrap();
        assert_policy_codes(&policies, &["TesteBusca", "TesteCodigo"]);
    }

    #[tokio::test]
    async fn test_policy_search_by_code() {
        let service = seeded().await;
        let found = service.list_policies(Some("busca")).await.unwrap();
        assert_policy_codes(&found, &["TesteBusca"]);
    }

    #[tokio::test]
    async fn test_policy_search_by_insured_name() {
        let service = seeded().await;

        let found = service.list_policies(Some("alfa")).await.unwrap();
        assert_policy_codes(&found, &["TesteCodigo"]);

        let found = service.list_policies(Some("CLIENTE")).await.unwrap();
        assert_policy_codes(&found, &["TesteBusca"]);
    }

    #[tokio::test]
    async fn test_policy_search_without_match() {
        let service = seeded().await;
        assert!(service.list_policies(Some("gama")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_is_no_filter() {
        let service = seeded().await;
        assert_eq!(service.list_policies(Some("   ")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_insured_ordered_by_name_then_id() {
        let (service, _) = setup();
        for name in ["TesteNome", "SeguradoBusca", "Ana", "Ana"] {
            register(&service, name).await;
        }

        let listed = service.list_insured(None).await.unwrap();
        let order: Vec<(String, i64)> = listed
            .into_iter()
            .map(|i| (i.name, i.id.value()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Ana".to_string(), 3),
                ("Ana".to_string(), 4),
                ("SeguradoBusca".to_string(), 2),
                ("TesteNome".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_insured_search() {
        let (service, _) = setup();
        register(&service, "TesteNome").await;
        register(&service, "SeguradoBusca").await;

        let found = service.list_insured(Some(" BUSCA ")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "SeguradoBusca");
    }
}

// ============================================================================
// COMMISSION REPORT
// ============================================================================

mod report {
    use super::*;

    async fn seeded() -> BrokerageService {
        let (service, _) = setup();
        let id = register(&service, "TesteNome").await;
        for (code, date, premium, pct) in [
            ("B", "2022-05-01", "2000.00", "10"),
            ("A", "2022-05-01", "1000.00", "15"),
            ("C", "2022-04-30", "500.00", "10"),
            ("D", "2022-05-31", "0.00", "50"),
        ] {
            service
                .register_policy(id, &policy_form(code, date, premium, pct))
                .await
                .unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_month_total() {
        let service = seeded().await;
        let report = service.report(Some(ReportPeriod::new(2022, 5))).await.unwrap();

        assert_policy_codes(&report.policies, &["A", "B", "D"]);
        assert_total_commission(&report, Some(dec!(350.00)));
    }

    #[tokio::test]
    async fn test_no_period_is_empty_view() {
        let service = seeded().await;
        let report = service.report(None).await.unwrap();
        assert!(report.policies.is_empty());
        assert_eq!(report.total_commission, None);
        assert_eq!(report.period, None);
    }

    #[tokio::test]
    async fn test_empty_month_has_no_total() {
        let service = seeded().await;
        let report = service.report(Some(ReportPeriod::new(2021, 5))).await.unwrap();
        assert!(report.is_empty());
        assert_total_commission(&report, None);
    }

    #[tokio::test]
    async fn test_out_of_range_month_matches_nothing() {
        let service = seeded().await;
        let report = service.report(Some(ReportPeriod::new(2022, 13))).await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_zero_commission_month_totals_zero() {
        let (service, _) = setup();
        let id = register(&service, "TesteNome").await;
        service
            .register_policy(id, &policy_form("Z", "2022-07-10", "100.00", "0"))
            .await
            .unwrap();

        let report = service.report(Some(ReportPeriod::new(2022, 7))).await.unwrap();
        assert_total_commission(&report, Some(dec!(0)));
    }
}

// ============================================================================
// STORE FAILURES
// ============================================================================

mod store_failures {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_store_surfaces_as_store_error() {
        let (service, store) = setup();
        store.set_unavailable(true);

        let err = service.list_policies(None).await.unwrap_err();
        assert!(matches!(err, BrokerageError::Store(_)));
        assert!(!service.health().await.is_healthy());

        store.set_unavailable(false);
        assert!(service.health().await.is_healthy());
    }
}
