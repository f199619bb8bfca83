//! Buyer façade integration tests against a mock PATS endpoint.

mod common;

use httpmock::prelude::*;
use pats_sdk::{InsertionOrderDetails, MediaKind, PatsBuyer, PatsError};
use serde_json::json;

// ---------------------------------------------------------------------------
// create_campaign
// ---------------------------------------------------------------------------

fn sample_campaign() -> pats_sdk::CampaignDetails {
    pats_sdk::CampaignDetails::builder(
        "Monday test campaign",
        common::date(2015, 2, 1),
        common::date(2015, 2, 28),
        "DEM",
    )
    .external_id("MONDAYTEST1")
    .campaign_budget(1_000_000.0)
    .build()
    .unwrap()
}

#[test]
fn create_campaign_posts_with_identity_headers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/campaigns")
            .header("accept", "application/vnd.mediaocean.prisma-v1.0+json")
            .header("x-mo-organization-id", common::AGENCY_ID)
            .header("x-mo-company-id", "PATS3")
            .header("x-mo-person-id", "amh1");
        then.status(200).json_body(json!({"campaignId": "CAMP-123"}));
    });

    let buyer = common::buyer_for(&server);
    let id = buyer.create_campaign(&sample_campaign()).unwrap();

    mock.assert();
    assert_eq!(id, "CAMP-123");
}

#[test]
fn create_campaign_takes_the_id_from_a_location_uri() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/campaigns");
        then.status(201)
            .header("Location", "https://host/campaigns/CAMP-456");
    });

    let buyer = common::buyer_for(&server);
    let id = buyer.create_campaign(&sample_campaign()).unwrap();

    assert_eq!(id, "CAMP-456");
}

#[test]
fn create_campaign_without_a_person_id_fails_before_sending() {
    let server = MockServer::start();
    let buyer = PatsBuyer::builder(common::AGENCY_ID, common::API_KEY)
        .company_id("PATS3")
        .base_url(server.base_url())
        .build()
        .unwrap();

    let err = buyer.create_campaign(&sample_campaign()).unwrap_err();
    assert!(matches!(err, PatsError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// create_order
// ---------------------------------------------------------------------------

#[test]
fn create_order_sends_the_order_envelope() {
    let server = MockServer::start();
    let order = InsertionOrderDetails::builder("ORDER-1", "PUB-35")
        .build()
        .unwrap();
    let mock = server.mock(|when, then| {
        when.method(PUT).path("/order/send").json_body(json!({
            "externalCampaignId": "MONDAYTEST1",
            "mediaType": "PRINT",
            "insertionOrder": {
                "orderId": "ORDER-1",
                "publisherId": "PUB-35",
                "recipientEmails": [],
                "notifyEmails": [],
                "termsAndConditions": [],
                "currencyCode": "GBP"
            }
        }));
        then.status(201)
            .header("Location", "https://host/orders/O-1/versions/0");
    });

    let buyer = common::buyer_for(&server);
    let uri = buyer
        .create_order(Some("MONDAYTEST1"), MediaKind::Print, &order, &[])
        .unwrap();

    mock.assert();
    assert_eq!(uri, "https://host/orders/O-1/versions/0");
}

#[test]
fn create_order_serializes_line_items_buyer_role() {
    let server = MockServer::start();
    let order = InsertionOrderDetails::builder("ORDER-2", "PUB-35")
        .build()
        .unwrap();
    let mock = server.mock(|when, then| {
        when.method(PUT).path("/order/send").json_body(json!({
            "mediaType": "DIGITAL",
            "insertionOrder": {
                "orderId": "ORDER-2",
                "publisherId": "PUB-35",
                "recipientEmails": [],
                "notifyEmails": [],
                "termsAndConditions": [],
                "currencyCode": "GBP"
            },
            "lineItems": [{
                "externalPlacementId": "DIGITAL-LINE-1",
                "placementName": "Homepage takeover",
                "subMediaType": "DISPLAY_DIGITAL",
                "subsection": "Sport",
                "buyType": "Standard",
                "buyCategory": "Standard",
                "unitType": "impressions",
                "unitAmount": 10_000,
                "costMethod": "CPM",
                "rate": "15.0000",
                "plannedCost": "30000.00",
                "packageType": "Standalone",
                "target": false,
                "flightStart": "2015-02-01",
                "flightEnd": "2015-02-28",
                "servedBy": "3rd party",
                "dimensions": "300x250"
            }]
        }));
        then.status(200).json_body(json!({"orderId": "O-77"}));
    });

    let buyer = common::buyer_for(&server);
    let id = buyer
        .create_order(
            None,
            MediaKind::Digital,
            &order,
            &[common::digital_line_item()],
        )
        .unwrap();

    mock.assert();
    assert_eq!(id, "O-77");
}

#[test]
fn create_order_rejects_media_kind_mismatch_before_sending() {
    let server = MockServer::start();
    let order = InsertionOrderDetails::builder("ORDER-3", "PUB-35")
        .build()
        .unwrap();

    let buyer = common::buyer_for(&server);
    let err = buyer
        .create_order(
            None,
            MediaKind::Print,
            &order,
            &[common::digital_line_item()],
        )
        .unwrap_err();

    assert!(matches!(err, PatsError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// send_rfp
// ---------------------------------------------------------------------------

#[test]
fn send_rfp_posts_under_the_campaign() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/campaigns/CAMP-1/rfps")
            .header("accept", "application/vnd.mediaocean.rfps-v1+json")
            .json_body(json!({
                "vendorPublicIds": ["PUB-35", "PUB-36"],
                "mediaType": "DIGITAL",
                "budget": 50_000.0,
                "respondByDate": "2015-01-20",
                "comments": "Spring burst"
            }));
        then.status(200).json_body(json!({"rfpId": "RFP-9"}));
    });

    let buyer = common::buyer_for(&server);
    let js = buyer
        .send_rfp(
            "CAMP-1",
            &["PUB-35", "PUB-36"],
            Some(50_000.0),
            Some(common::date(2015, 1, 20)),
            Some("Spring burst"),
            MediaKind::Digital,
        )
        .unwrap();

    mock.assert();
    assert_eq!(js["rfpId"], "RFP-9");
}

#[test]
fn send_rfp_requires_at_least_one_vendor() {
    let server = MockServer::start();
    let buyer = common::buyer_for(&server);

    let err = buyer
        .send_rfp("CAMP-1", &[], None, None, None, MediaKind::Print)
        .unwrap_err();

    assert!(matches!(err, PatsError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// list_products
// ---------------------------------------------------------------------------

#[test]
fn list_products_builds_the_paged_query_string() {
    let server = MockServer::start();
    let path = format!("/agencies/{}/vendors/PUB-35/products/", common::AGENCY_ID);
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(&path)
            .header("accept", "application/vnd.mediaocean.catalog-v1+json")
            .query_param("start_index", "5")
            .query_param("max_results", "10")
            .query_param("include_logo", "true");
        then.status(200).json_body(json!({"products": []}));
    });

    let buyer = common::buyer_for(&server);
    let js = buyer.list_products("PUB-35", Some(5), Some(10), true).unwrap();

    mock.assert();
    assert_eq!(js["products"], json!([]));
}

#[test]
fn list_products_relays_validation_results() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!({
            "products": [],
            "validationResults": [
                {"productId": "P1", "message": "bad category"}
            ]
        }));
    });

    let buyer = common::buyer_for(&server);
    let err = buyer.list_products("PUB-35", None, None, false).unwrap_err();

    assert!(matches!(err, PatsError::Validation { .. }));
    assert_eq!(err.to_string(), "Product ID P1: bad category");
}
