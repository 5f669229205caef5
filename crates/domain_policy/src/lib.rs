//! Policy and Brokerage Domain
//!
//! This crate holds vehicles, policies and everything built on top of them:
//! form validation, listing and search, the monthly commission report, the
//! storage port and the service that ties them together.
//!
//! # Architecture
//!
//! - **Entities**: `Policy`, `Vehicle` (and `InsuredPerson` from `domain_insured`)
//! - **Drafts**: validated form contents ready to be stored
//! - **Port**: `BrokerageStore`, implemented in `infra_db` and by the mock
//! - **Service**: `BrokerageService`, one method per brokerage operation
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{BrokerageService, ReportPeriod};
//!
//! let service = BrokerageService::new(store);
//! let report = service.report(Some(ReportPeriod::new(2022, 5))).await?;
//! println!("{:?}", report.total_commission);
//! ```

pub mod vehicle;
pub mod policy;
pub mod search;
pub mod commission;
pub mod ports;
pub mod error;
pub mod services;

pub use vehicle::{Vehicle, VehicleDraft};
pub use policy::{Insurer, Policy, PolicyDraft, PolicySubmission};
pub use search::SearchTerm;
pub use commission::{CommissionReport, ReportPeriod};
pub use ports::{BrokerageStore, InsuredDetails, PolicyDetails};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockBrokerageStore;
pub use error::BrokerageError;
pub use services::BrokerageService;
