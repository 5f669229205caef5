//! Tests for field-map reading and validator integration

use chrono::NaiveDate;
use core_kernel::validation::{INVALID_DATE, INVALID_EMAIL, INVALID_NUMBER, REQUIRED};
use core_kernel::{ChoiceCode, FieldErrors, FieldMap, FieldReader};
use rust_decimal_macros::dec;
use validator::Validate;

fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Colour {
    Red,
    Blue,
}

impl ChoiceCode for Colour {
    const ALL: &'static [Self] = &[Colour::Red, Colour::Blue];

    fn code(&self) -> &'static str {
        match self {
            Colour::Red => "RD",
            Colour::Blue => "BL",
        }
    }
}

mod reader {
    use super::*;

    #[test]
    fn test_text_is_trimmed() {
        let map = fields(&[("nome", "  Maria  ")]);
        let mut reader = FieldReader::new(&map);
        assert_eq!(reader.required_text("nome").as_deref(), Some("Maria"));
        assert!(reader.finish().is_empty());
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        let map = fields(&[("endereco", "   ")]);
        let mut reader = FieldReader::new(&map);
        assert_eq!(reader.optional_text("endereco"), None);
        assert!(reader.finish().is_empty());
    }

    #[test]
    fn test_dates() {
        let map = fields(&[("ok", "2024-02-29"), ("bad", "29/02/2024"), ("impossible", "2023-02-29")]);
        let mut reader = FieldReader::new(&map);
        assert_eq!(
            reader.required_date("ok"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(reader.required_date("bad").is_none());
        assert!(reader.required_date("impossible").is_none());
        assert!(reader.required_date("missing").is_none());

        let errors = reader.finish();
        assert_eq!(errors.get("bad"), Some(&[INVALID_DATE.to_string()][..]));
        assert_eq!(errors.get("impossible"), Some(&[INVALID_DATE.to_string()][..]));
        assert_eq!(errors.get("missing"), Some(&[REQUIRED.to_string()][..]));
        assert!(!errors.contains("ok"));
    }

    #[test]
    fn test_decimal_parsing() {
        let map = fields(&[("premio", "1234.57"), ("perc", "abc")]);
        let mut reader = FieldReader::new(&map);
        assert_eq!(reader.required_decimal("premio"), Some(dec!(1234.57)));
        assert!(reader.required_decimal("perc").is_none());
        assert_eq!(reader.finish().get("perc"), Some(&[INVALID_NUMBER.to_string()][..]));
    }

    #[test]
    fn test_premium_precision_reported_on_field() {
        let map = fields(&[("premio", "10.123")]);
        let mut reader = FieldReader::new(&map);
        assert!(reader.required_premium("premio").is_none());
        assert_eq!(
            reader.finish().get("premio"),
            Some(&["Ensure that there are no more than 2 decimal places.".to_string()][..])
        );
    }

    #[test]
    fn test_unsigned_rejects_fraction() {
        let map = fields(&[("ano_modelo", "2020.5")]);
        let mut reader = FieldReader::new(&map);
        assert!(reader.required_unsigned("ano_modelo").is_none());
        assert!(reader.finish().contains("ano_modelo"));
    }

    #[test]
    fn test_nullable_bool_rejects_garbage() {
        let map = fields(&[("alienado", "maybe")]);
        let mut reader = FieldReader::new(&map);
        assert!(reader.nullable_bool("alienado", Some(false)).is_none());
        assert!(reader.finish().contains("alienado"));
    }

    #[test]
    fn test_choices() {
        let map = fields(&[("a", "BL"), ("b", "XX")]);
        let mut reader = FieldReader::new(&map);
        assert_eq!(reader.required_choice::<Colour>("a"), Some(Colour::Blue));
        assert!(reader.required_choice::<Colour>("b").is_none());
        assert_eq!(reader.choice_or("c", Colour::Red), Some(Colour::Red));

        let errors = reader.finish();
        assert_eq!(
            errors.get("b"),
            Some(&["Select a valid choice. XX is not one of the available choices.".to_string()][..])
        );
    }
}

mod validator_messages {
    use super::*;

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(length(max = 7))]
        plate: String,
        #[validate(email)]
        email: String,
        #[validate(range(max = 50))]
        percentage: u32,
        #[validate(length(max = 3, message = "Too long."))]
        custom: String,
    }

    #[test]
    fn test_messages_follow_form_conventions() {
        let sample = Sample {
            plate: "ABC12345".to_string(),
            email: "not-an-email".to_string(),
            percentage: 51,
            custom: "abcd".to_string(),
        };
        let errors: FieldErrors = sample.validate().unwrap_err().into();

        assert_eq!(
            errors.get("plate"),
            Some(&["Ensure this value has at most 7 characters.".to_string()][..])
        );
        assert_eq!(errors.get("email"), Some(&[INVALID_EMAIL.to_string()][..]));
        assert_eq!(
            errors.get("percentage"),
            Some(&["Ensure this value is less than or equal to 50.".to_string()][..])
        );
        assert_eq!(errors.get("custom"), Some(&["Too long.".to_string()][..]));
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("codigo", REQUIRED);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "codigo": [REQUIRED] }));
    }
}
