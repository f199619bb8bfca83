//! Line-item wire-matrix tests: the three serialization axes (media kind,
//! role, package role), numeric profiles, and construction validation.

mod common;

use pats_sdk::{
    BuyType, DigitalDetail, Flight, LineItem, Operation, PackageType, PatsError, PrintDetail, Role,
    WireProfile,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Role divergence
// ---------------------------------------------------------------------------

#[test]
fn buyer_role_emits_placement_fields_top_level() {
    let wire = common::digital_line_item().to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert_eq!(wire["placementName"], "Homepage takeover");
    assert_eq!(wire["subMediaType"], "DISPLAY_DIGITAL");
    assert_eq!(wire["subsection"], "Sport");
    assert!(wire.get("name").is_none());
    assert!(wire.get("customColumns").is_none());
}

#[test]
fn seller_role_renames_and_folds_into_custom_columns() {
    let wire = common::digital_line_item().to_wire(Role::Seller, WireProfile::FixedPointStrings);

    assert_eq!(wire["name"], "Homepage takeover");
    assert!(wire.get("placementName").is_none());
    assert!(wire.get("subMediaType").is_none());
    assert!(wire.get("subsection").is_none());
    assert_eq!(
        wire["customColumns"],
        json!([
            {"name": "subMediaType", "value": "DISPLAY_DIGITAL"},
            {"name": "subsection", "value": "Sport"}
        ])
    );
}

#[test]
fn roles_agree_on_every_other_field() {
    let item = common::digital_line_item();
    let mut buyer = item.to_wire(Role::Buyer, WireProfile::FixedPointStrings);
    let mut seller = item.to_wire(Role::Seller, WireProfile::FixedPointStrings);

    let divergent = ["placementName", "subMediaType", "subsection", "name", "customColumns"];
    for key in divergent {
        buyer.as_object_mut().unwrap().remove(key);
        seller.as_object_mut().unwrap().remove(key);
    }
    assert_eq!(buyer, seller);
}

// ---------------------------------------------------------------------------
// Package-role field inclusion
// ---------------------------------------------------------------------------

#[test]
fn standalone_line_carries_commercial_fields() {
    let wire = common::digital_line_item().to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert_eq!(wire["buyType"], "Standard");
    assert_eq!(wire["buyCategory"], "Standard");
    assert_eq!(wire["unitType"], "impressions");
    assert_eq!(wire["unitAmount"], 10_000);
    assert_eq!(wire["costMethod"], "CPM");
    assert_eq!(wire["rate"], "15.0000");
    assert_eq!(wire["plannedCost"], "30000.00");
    assert_eq!(wire["packageType"], "Standalone");
    assert_eq!(wire["target"], false);
}

#[test]
fn package_header_omits_buy_type_and_category() {
    let item = LineItem::digital("PKG-1", "Takeover package", DigitalDetail::default())
        .package_type(PackageType::Package)
        .package_name("Homepage bundle")
        .units(50_000, "impressions")
        .planned_cost(12_000.0)
        .build()
        .unwrap();
    let wire = item.to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert!(wire.get("buyType").is_none());
    assert!(wire.get("buyCategory").is_none());
    assert_eq!(wire["packageType"], "Package");
    assert_eq!(wire["packageName"], "Homepage bundle");
    // The header still carries the package's commercial totals.
    assert_eq!(wire["plannedCost"], "12000.00");
}

#[test]
fn roadblock_header_omits_buy_type_and_category() {
    let item = LineItem::digital("RB-1", "Homepage roadblock", DigitalDetail::default())
        .package_type(PackageType::Roadblock)
        .build()
        .unwrap();
    let wire = item.to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert!(wire.get("buyType").is_none());
    assert_eq!(wire["packageType"], "Roadblock");
}

#[test]
fn child_line_omits_unit_cost_and_rate() {
    let item = LineItem::digital(
        "CHILD-1",
        "MPU inside bundle",
        DigitalDetail {
            parent_external_id: Some("PKG-1".to_string()),
            ..Default::default()
        },
    )
    .package_type(PackageType::Child)
    .units(10_000, "impressions")
    .cost_method("CPM")
    .rate(5.0)
    .planned_cost(50.0)
    .build()
    .unwrap();
    let wire = item.to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert!(wire.get("unitType").is_none());
    assert!(wire.get("unitAmount").is_none());
    assert!(wire.get("costMethod").is_none());
    assert!(wire.get("rate").is_none());
    assert!(wire.get("plannedCost").is_none());
    // Children still carry their buy type and the parent link.
    assert_eq!(wire["buyType"], "Standard");
    assert_eq!(wire["parentExternalPlacementId"], "PKG-1");
}

#[test]
fn flat_fee_omits_rate_but_keeps_planned_cost() {
    let item = LineItem::digital("FLAT-1", "Sponsorship", DigitalDetail::default())
        .buy_type(BuyType::FlatFee)
        .rate(99.0)
        .planned_cost(4_000.0)
        .build()
        .unwrap();
    let wire = item.to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert_eq!(wire["buyType"], "Flat Fee");
    assert!(wire.get("rate").is_none());
    assert_eq!(wire["plannedCost"], "4000.00");
}

// ---------------------------------------------------------------------------
// Numeric profiles
// ---------------------------------------------------------------------------

#[test]
fn fixed_point_profile_emits_strings() {
    let wire = common::digital_line_item().to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert_eq!(wire["rate"], json!("15.0000"));
    assert_eq!(wire["plannedCost"], json!("30000.00"));
}

#[test]
fn numbers_profile_emits_rounded_numbers() {
    let item = LineItem::digital("NUM-1", "MPU", DigitalDetail::default())
        .rate(15.123_456)
        .planned_cost(30_000.018)
        .build()
        .unwrap();
    let wire = item.to_wire(Role::Buyer, WireProfile::Numbers);

    assert_eq!(wire["rate"], json!(15.1235));
    assert_eq!(wire["plannedCost"], json!(30_000.02));
}

// ---------------------------------------------------------------------------
// Media payloads
// ---------------------------------------------------------------------------

#[test]
fn print_detail_serializes_dates_position_and_size() {
    let wire = common::print_line_item().to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert_eq!(wire["color"], "4 colour");
    assert_eq!(wire["coverDate"], "2015-02-10");
    assert_eq!(wire["printPosition"], "Front Half");
    assert_eq!(wire["isPositionGuaranteed"], true);
    assert_eq!(wire["size"], json!({"type": "25x4", "units": 25, "columns": 4}));
    assert_eq!(wire["region"], "National");
}

#[test]
fn digital_flight_range_serializes_as_dates() {
    let wire = common::digital_line_item().to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert_eq!(wire["flightStart"], "2015-02-01");
    assert_eq!(wire["flightEnd"], "2015-02-28");
    assert!(wire.get("flighting").is_none());
}

#[test]
fn flighting_schedule_serializes_period_entries() {
    let item = LineItem::digital(
        "FLIGHTS-1",
        "Phased MPU",
        DigitalDetail {
            flighting: vec![
                Flight {
                    start_date: common::date(2015, 2, 1),
                    end_date: common::date(2015, 2, 14),
                    unit_amount: 5_000,
                    planned_cost: 100.0,
                },
                Flight {
                    start_date: common::date(2015, 2, 15),
                    end_date: common::date(2015, 2, 28),
                    unit_amount: 7_000,
                    planned_cost: 140.0,
                },
            ],
            ..Default::default()
        },
    )
    .build()
    .unwrap();
    let wire = item.to_wire(Role::Buyer, WireProfile::FixedPointStrings);

    assert_eq!(
        wire["flighting"],
        json!([
            {"startDate": "2015-02-01", "endDate": "2015-02-14", "unitAmount": 5_000, "plannedCost": "100.00"},
            {"startDate": "2015-02-15", "endDate": "2015-02-28", "unitAmount": 7_000, "plannedCost": "140.00"}
        ])
    );
    assert!(wire.get("flightStart").is_none());
}

#[test]
fn operation_is_emitted_once_set() {
    let mut item = common::digital_line_item();
    assert!(item
        .to_wire(Role::Buyer, WireProfile::FixedPointStrings)
        .get("operation")
        .is_none());

    item.set_operation(Operation::Update);
    let wire = item.to_wire(Role::Buyer, WireProfile::FixedPointStrings);
    assert_eq!(wire["operation"], "Update");
}

// ---------------------------------------------------------------------------
// Construction-time validation
// ---------------------------------------------------------------------------

#[test]
fn buy_category_is_checked_against_the_media_allow_list() {
    let err = LineItem::print("BAD-CAT", "Strip", PrintDetail::default())
        .buy_category("Takeover")
        .build()
        .unwrap_err();

    assert!(matches!(err, PatsError::InvalidArgument(_)));
    assert!(err.to_string().contains("Takeover"));
}

#[test]
fn buy_category_on_a_package_header_is_rejected() {
    let err = LineItem::digital("PKG-CAT", "Bundle", DigitalDetail::default())
        .package_type(PackageType::Package)
        .buy_category("Standard")
        .build()
        .unwrap_err();

    assert!(matches!(err, PatsError::InvalidArgument(_)));
}

#[test]
fn digital_child_rejects_premium_categories() {
    let err = LineItem::digital("CHILD-CAT", "MPU", DigitalDetail::default())
        .package_type(PackageType::Child)
        .buy_category("Sponsorship")
        .build()
        .unwrap_err();

    assert!(matches!(err, PatsError::InvalidArgument(_)));
}

#[test]
fn sub_media_type_is_checked_against_the_media_kind() {
    let err = LineItem::print("BAD-SUB", "Strip", PrintDetail::default())
        .sub_media_type("DISPLAY_DIGITAL")
        .build()
        .unwrap_err();

    assert!(matches!(err, PatsError::InvalidArgument(_)));
    assert!(err.to_string().contains("DISPLAY_DIGITAL"));
}

#[test]
fn served_by_is_checked_against_the_allow_list() {
    let err = LineItem::digital(
        "BAD-SERVE",
        "MPU",
        DigitalDetail {
            served_by: Some("2nd party".to_string()),
            ..Default::default()
        },
    )
    .build()
    .unwrap_err();

    assert!(matches!(err, PatsError::InvalidArgument(_)));
    assert!(err.to_string().contains("2nd party"));
}

#[test]
fn overlong_external_id_is_rejected_at_build() {
    let err = LineItem::digital("E".repeat(33), "MPU", DigitalDetail::default())
        .build()
        .unwrap_err();

    assert!(matches!(err, PatsError::InvalidArgument(_)));
}

#[test]
fn flight_range_and_schedule_are_mutually_exclusive() {
    let err = LineItem::digital(
        "BOTH-1",
        "MPU",
        DigitalDetail {
            flight_start: Some(common::date(2015, 2, 1)),
            flighting: vec![Flight {
                start_date: common::date(2015, 2, 1),
                end_date: common::date(2015, 2, 14),
                unit_amount: 1,
                planned_cost: 1.0,
            }],
            ..Default::default()
        },
    )
    .build()
    .unwrap_err();

    assert!(matches!(err, PatsError::InvalidArgument(_)));
}
