//! Rust client for the Mediaocean PATS advertising-order API.
//!
//! PATS connects agencies (buyers) and publishers (sellers) for the
//! booking of print and digital advertising. This crate wraps the REST
//! API behind two façades, [`PatsBuyer`] and [`PatsSeller`], sharing one
//! blocking HTTP transport with a bounded gateway-timeout retry and
//! uniform response classification.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use pats_sdk::{CampaignDetails, PatsBuyer};
//!
//! fn main() -> pats_sdk::Result<()> {
//!     let buyer = PatsBuyer::builder("35-IDSDKAD-7", "my-api-key")
//!         .company_id("PATS3")
//!         .person_id("amh1")
//!         .build()?;
//!
//!     let campaign = CampaignDetails::builder(
//!         "Monday test campaign",
//!         NaiveDate::from_ymd_opt(2015, 2, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2015, 2, 28).unwrap(),
//!         "DEM",
//!     )
//!     .external_id("MONDAYTEST1")
//!     .campaign_budget(1_000_000.0)
//!     .build()?;
//!
//!     let campaign_id = buyer.create_campaign(&campaign)?;
//!     println!("created campaign {}", campaign_id);
//!     Ok(())
//! }
//! ```
//!
//! Every failure surfaces as a [`PatsError`]; value objects validate at
//! construction, so a bad payload never consumes a request attempt.

pub mod buyer;
pub mod config;
pub mod error;
pub mod models;
pub mod seller;
pub mod transport;

pub use buyer::{PatsBuyer, PatsBuyerBuilder};
pub use error::{PatsError, Result};
pub use models::campaign::{CampaignDetails, CampaignDetailsBuilder};
pub use models::line_item::{
    BuyType, DigitalDetail, Flight, LineItem, LineItemBuilder, MediaDetail, MediaKind, Operation,
    PackageType, PrintDetail, PrintSize, Role, WireProfile,
};
pub use models::order::{InsertionOrderDetails, InsertionOrderDetailsBuilder, TermsAndConditions};
pub use seller::{PatsSeller, PatsSellerBuilder};
pub use transport::{ApiResponse, CaptureSink, RawCapture, RetryPolicy, Transport};
