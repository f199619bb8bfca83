//! Shared fixtures for the PATS SDK integration tests.
//!
//! Provides clients pointed at an `httpmock` server with a zero-delay
//! retry policy, plus small sample value objects used across the suite.

#![allow(dead_code)]

use std::time::Duration;

use chrono::NaiveDate;
use httpmock::MockServer;
use pats_sdk::{
    DigitalDetail, LineItem, PatsBuyer, PatsSeller, PrintDetail, PrintSize, RetryPolicy, Transport,
};

pub const API_KEY: &str = "test-api-key";
pub const AGENCY_ID: &str = "35-IDSDKAD-7";
pub const VENDOR_ID: &str = "VENDOR-9";

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Retry policy that never sleeps, so 504 tests run instantly.
pub fn zero_delay_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay: Duration::ZERO,
    }
}

/// A bare transport with the zero-delay retry policy.
pub fn transport() -> Transport {
    Transport::builder(API_KEY)
        .retry(zero_delay_retry())
        .build()
        .unwrap()
}

/// A buyer client pointed at the mock server, with default company and
/// person ids.
pub fn buyer_for(server: &MockServer) -> PatsBuyer {
    PatsBuyer::builder(AGENCY_ID, API_KEY)
        .company_id("PATS3")
        .person_id("amh1")
        .base_url(server.base_url())
        .retry(zero_delay_retry())
        .build()
        .unwrap()
}

/// A seller client pointed at the mock server.
pub fn seller_for(server: &MockServer) -> PatsSeller {
    PatsSeller::builder(VENDOR_ID, API_KEY)
        .base_url(server.base_url())
        .retry(zero_delay_retry())
        .build()
        .unwrap()
}

/// A fully-populated standalone digital line item.
pub fn digital_line_item() -> LineItem {
    LineItem::digital(
        "DIGITAL-LINE-1",
        "Homepage takeover",
        DigitalDetail {
            flight_start: Some(date(2015, 2, 1)),
            flight_end: Some(date(2015, 2, 28)),
            served_by: Some("3rd party".to_string()),
            dimensions: Some("300x250".to_string()),
            ..Default::default()
        },
    )
    .sub_media_type("DISPLAY_DIGITAL")
    .subsection("Sport")
    .buy_category("Standard")
    .units(10_000, "impressions")
    .cost_method("CPM")
    .rate(15.0)
    .planned_cost(30_000.0)
    .build()
    .unwrap()
}

/// A fully-populated standalone print line item.
pub fn print_line_item() -> LineItem {
    LineItem::print(
        "PRINT-LINE-1",
        "Front page strip",
        PrintDetail {
            color: Some("4 colour".to_string()),
            cover_date: Some(date(2015, 2, 10)),
            position: Some("Front Half".to_string()),
            position_guaranteed: true,
            size: Some(PrintSize {
                size_type: "25x4".to_string(),
                units: Some(25),
                columns: Some(4),
            }),
            region: Some("National".to_string()),
            ..Default::default()
        },
    )
    .section("News")
    .buy_category("Display")
    .units(1, "insertions")
    .cost_method("gross")
    .rate(5_000.0)
    .planned_cost(5_000.0)
    .build()
    .unwrap()
}
