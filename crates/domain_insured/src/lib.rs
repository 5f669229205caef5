//! Insured Person Domain
//!
//! This crate holds the people a brokerage insures: their registration data,
//! their marital status and the rules a submitted registration form must
//! satisfy.
//!
//! # Examples
//!
//! ```rust
//! use domain_insured::{InsuredDraft, MaritalStatus};
//! use core_kernel::FieldMap;
//!
//! let mut form = FieldMap::new();
//! form.insert("nome".into(), "Maria Souza".into());
//! form.insert("nascimento".into(), "1990-03-14".into());
//! form.insert("telefone".into(), "11987654321".into());
//! form.insert("cpf".into(), "12345678901".into());
//! form.insert("endereco".into(), "Rua das Flores, 10".into());
//!
//! let draft = InsuredDraft::from_fields(&form).unwrap();
//! assert_eq!(draft.marital_status, MaritalStatus::NotInformed);
//! ```

pub mod insured;

pub use insured::{InsuredPerson, InsuredDraft, MaritalStatus};
