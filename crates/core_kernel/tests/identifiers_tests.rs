//! Unit tests for the Identifiers module

use core_kernel::{InsuredId, PolicyCode, VehicleId};
use std::collections::HashSet;

mod serial_id_tests {
    use super::*;

    #[test]
    fn test_value_round_trips_through_i64() {
        let id = InsuredId::new(17);
        let raw: i64 = id.into();
        assert_eq!(raw, 17);
        assert_eq!(InsuredId::from(raw), id);
    }

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(VehicleId::new(3).to_string(), "3");
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        assert_eq!("INS-5".parse::<InsuredId>().unwrap(), InsuredId::new(5));
        assert_eq!("5".parse::<InsuredId>().unwrap(), InsuredId::new(5));
        assert_eq!("VEH-9".parse::<VehicleId>().unwrap(), VehicleId::new(9));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<InsuredId>().is_err());
        assert!("VEH-x".parse::<VehicleId>().is_err());
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(InsuredId::prefix(), "INS");
        assert_eq!(VehicleId::prefix(), "VEH");
    }

    #[test]
    fn test_ordering_follows_value() {
        assert!(InsuredId::new(1) < InsuredId::new(2));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&InsuredId::new(12)).unwrap();
        assert_eq!(json, "12");
    }
}

mod policy_code_tests {
    use super::*;

    #[test]
    fn test_codes_hash_by_text() {
        let mut set = HashSet::new();
        set.insert(PolicyCode::from("A-1"));
        set.insert(PolicyCode::new("A-1".to_string()));
        set.insert(PolicyCode::from("A-2"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_codes_order_lexicographically() {
        let mut codes = vec![PolicyCode::from("B"), PolicyCode::from("A10"), PolicyCode::from("A2")];
        codes.sort();
        let ordered: Vec<&str> = codes.iter().map(PolicyCode::as_str).collect();
        assert_eq!(ordered, vec!["A10", "A2", "B"]);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&PolicyCode::from("TesteCodigo")).unwrap();
        assert_eq!(json, "\"TesteCodigo\"");
    }
}
