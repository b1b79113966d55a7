// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::{json, Value};

use super::{reconcile, reconcile_at, reconcile_with_report, Migration, RowKind};
use crate::model::{default_state_at, Address, Contact, Driver, Tab, Vehicle, MAX_ROWS};

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 2, 13, 0, 0).unwrap()
}

fn migrated(from: &str, to: &str) -> Migration {
    Migration {
        from: from.to_owned(),
        to: to.to_owned(),
    }
}

fn v1_document() -> Value {
    json!({
        "customer": {"name": "Dana Reyes", "phone": "512-555-0101"},
        "counts": {"drivers": 2, "vehicles": 1},
        "drivers": [
            {"name": "Dana Reyes", "dob": "1984-02-11", "licenseState": "TX", "license": "D1"},
            {"name": "Sam Reyes"}
        ],
        "vehicles": [{"vin": "1hgcm82633a004352", "decoded": "2003 HONDA Accord"}],
        "lastActiveTab": "auto"
    })
}

fn v2_document() -> Value {
    json!({
        "customer": {
            "name": "Dana Reyes",
            "address": {"street": "1 Main St", "city": "Austin", "state": "TX", "zip": "78701"}
        },
        "auto": {"driverCount": 1, "vehicleCount": 0, "drivers": [{"name": "Dana"}], "vehicles": []},
        "home": {
            "propertyAddress": "9 Oak Ln",
            "city": "Round Rock",
            "state": "TX",
            "zip": "78664",
            "dwellingCoverage": "350000",
            "priorCarrierExpiration": "2026-09-01",
            "securityAlarms": "central station",
            "yearBuilt": 1998
        },
        "business": {
            "businessName": "Reyes Roofing",
            "address": "44 Industrial Blvd",
            "city": "Austin",
            "state": "TX",
            "zip": "78744",
            "contactName": "Dana",
            "contactPhone": "512-555-0199",
            "contactEmail": "dana@example.com",
            "workersComp": {"numberOfEmployees": "12", "priorCarrierExpiration": "2026-10-01"},
            "generalLiability": {
                "salesRevenueEstimate": "900000",
                "descriptionOfOperations": "Residential roofing",
                "priorCarrierExpiration": "2026-11-01"
            }
        },
        "meta": {"version": 2, "updatedAt": "2025-01-01T00:00:00.000Z"},
        "lastActiveTab": "business"
    })
}

#[rstest]
#[case(json!(null))]
#[case(json!([]))]
#[case(json!("quote"))]
#[case(json!(42))]
#[case(json!({}))]
fn non_documents_reconcile_to_defaults(now: DateTime<Utc>, #[case] document: Value) {
    let (state, report) = reconcile_with_report(&document, now);
    assert_eq!(state, default_state_at(now));
    assert!(report.is_clean());
}

#[rstest]
fn default_output_is_a_fixed_point(now: DateTime<Utc>) {
    let default = default_state_at(now);
    let document = serde_json::to_value(&default).unwrap();

    let (state, report) = reconcile_with_report(&document, now);

    assert_eq!(state, default);
    assert!(report.is_clean());
}

#[rstest]
fn reconciling_twice_is_deterministic(now: DateTime<Utc>) {
    let first = reconcile_at(&v2_document(), now);
    let second = reconcile_at(&v2_document(), now);
    assert_eq!(first, second);

    let again = reconcile_at(&serde_json::to_value(&first).unwrap(), now);
    assert_eq!(again, first);
}

#[rstest]
fn v1_root_lists_move_under_auto(now: DateTime<Utc>) {
    let (state, report) = reconcile_with_report(&v1_document(), now);

    assert_eq!(state.customer.name, "Dana Reyes");
    assert_eq!(state.customer.address, Address::default());
    assert_eq!(state.auto.counts.drivers, 2);
    assert_eq!(state.auto.counts.vehicles, 1);
    assert_eq!(state.auto.drivers[0].license_state, "TX");
    assert_eq!(
        state.auto.drivers[1],
        Driver {
            name: "Sam Reyes".to_owned(),
            ..Driver::default()
        }
    );
    assert_eq!(state.auto.vehicles[0].vin, "1HGCM82633A004352");
    assert_eq!(state.meta.version, 3);

    assert!(report.migrations.contains(&migrated("drivers", "auto.drivers")));
    assert!(report.migrations.contains(&migrated("vehicles", "auto.vehicles")));
    assert!(report
        .migrations
        .contains(&migrated("counts.drivers", "auto.counts.drivers")));
    assert_eq!(report.declared_version, None);
}

#[rstest]
fn v2_flat_groups_are_nested_and_renamed(now: DateTime<Utc>) {
    let (state, report) = reconcile_with_report(&v2_document(), now);

    assert_eq!(state.customer.address.city, "Austin");
    assert_eq!(state.auto.counts.drivers, 1);
    assert_eq!(state.auto.counts.vehicles, 0);
    assert_eq!(state.auto.drivers[0].name, "Dana");

    assert_eq!(
        state.home.property_address,
        Address {
            street: "9 Oak Ln".to_owned(),
            city: "Round Rock".to_owned(),
            state: "TX".to_owned(),
            zip: "78664".to_owned(),
        }
    );
    assert_eq!(state.home.dwelling_coverage_a, "350000");
    assert_eq!(state.home.expiration_date, "2026-09-01");
    assert_eq!(state.home.security_notes, "central station");
    assert_eq!(state.home.year_built, "1998");

    assert_eq!(state.business.address.street, "44 Industrial Blvd");
    assert_eq!(state.business.address.zip, "78744");
    assert_eq!(
        state.business.contact,
        Contact {
            name: "Dana".to_owned(),
            phone: "512-555-0199".to_owned(),
            email: "dana@example.com".to_owned(),
        }
    );
    assert_eq!(state.business.workers_comp.num_employees, "12");
    assert_eq!(state.business.workers_comp.expiration_date, "2026-10-01");
    assert_eq!(state.business.general_liability.sales_estimate, "900000");
    assert_eq!(
        state.business.general_liability.operations_description,
        "Residential roofing"
    );
    assert_eq!(state.business.general_liability.expiration_date, "2026-11-01");

    assert_eq!(state.last_active_tab, Tab::Business);
    assert_eq!(state.meta.version, 3);
    assert_eq!(state.meta.updated_at, now);

    assert!(report
        .migrations
        .contains(&migrated("auto.driverCount", "auto.counts.drivers")));
    assert!(report
        .migrations
        .contains(&migrated("home.propertyAddress", "home.propertyAddress.street")));
    assert!(report
        .migrations
        .contains(&migrated("business.contactEmail", "business.contact.email")));
    assert!(report.migrations.contains(&migrated(
        "business.workersComp.numberOfEmployees",
        "business.workersComp.numEmployees"
    )));
    assert_eq!(report.declared_version, Some(2));
    assert!(!report.is_newer_schema());
}

#[rstest]
fn new_name_wins_over_old_name(now: DateTime<Utc>) {
    let document = json!({
        "home": {"dwellingCoverage": "old", "dwellingCoverageA": "new"},
        "business": {
            "contact": {"name": "Nested"},
            "contactName": "Flat",
            "workersComp": {"numberOfEmployees": "3", "numEmployees": "4"}
        }
    });

    let (state, report) = reconcile_with_report(&document, now);

    assert_eq!(state.home.dwelling_coverage_a, "new");
    assert_eq!(state.business.contact.name, "Nested");
    assert_eq!(state.business.workers_comp.num_employees, "4");
    assert!(report.migrations.is_empty());
}

#[rstest]
fn nested_address_wins_over_flat_fields(now: DateTime<Utc>) {
    let document = json!({
        "home": {
            "propertyAddress": {"street": "1 New St", "city": "Nested"},
            "city": "Flat",
            "zip": "78000"
        }
    });

    let state = reconcile_at(&document, now);

    assert_eq!(state.home.property_address.street, "1 New St");
    assert_eq!(state.home.property_address.city, "Nested");
    assert_eq!(state.home.property_address.zip, "78000");
}

#[rstest]
fn counts_are_derived_from_list_length(now: DateTime<Utc>) {
    let document = json!({
        "auto": {"drivers": [{"name": "A"}, {"name": "B"}, {"name": "C"}], "vehicles": []}
    });

    let (state, report) = reconcile_with_report(&document, now);

    assert_eq!(state.auto.counts.drivers, 3);
    assert_eq!(state.auto.counts.vehicles, 0);
    assert_eq!(report.derived_counts, vec![RowKind::Drivers]);
}

#[rstest]
fn oversized_counts_are_clamped_and_rows_kept(now: DateTime<Utc>) {
    let drivers: Vec<Value> = (0..12).map(|i| json!({"name": format!("D{i}")})).collect();
    let document = json!({"auto": {"counts": {"drivers": 12, "vehicles": "40"}, "drivers": drivers}});

    let (state, report) = reconcile_with_report(&document, now);

    assert_eq!(state.auto.counts.drivers, MAX_ROWS);
    assert_eq!(state.auto.counts.vehicles, MAX_ROWS);
    assert_eq!(state.auto.drivers.len(), 12);
    assert_eq!(state.auto.active_drivers().len(), MAX_ROWS as usize);
    assert_eq!(state.auto.vehicles.len(), MAX_ROWS as usize);
    assert_eq!(
        report.clamped_counts,
        vec![RowKind::Drivers, RowKind::Vehicles]
    );
}

#[rstest]
fn declared_count_larger_than_list_pads_rows(now: DateTime<Utc>) {
    let document = json!({"auto": {"counts": {"drivers": 2, "vehicles": 1}, "drivers": [{"name": "A"}]}});

    let state = reconcile_at(&document, now);

    assert_eq!(state.auto.drivers.len(), 2);
    assert_eq!(state.auto.drivers[1], Driver::default());
    assert_eq!(state.auto.vehicles, vec![Vehicle::default()]);
}

#[rstest]
fn corrupt_leaves_fall_back_to_defaults(now: DateTime<Utc>) {
    let document = json!({
        "customer": {"name": {"first": "Dana"}, "phone": true, "address": ["x"]},
        "auto": {"counts": {"drivers": -2}, "drivers": "not a list", "vehicles": [7, null, {"vin": 12}]},
        "home": "not an object",
        "business": {"workersComp": []},
        "meta": {"version": "three"}
    });

    let (state, report) = reconcile_with_report(&document, now);

    assert_eq!(state.customer.name, "");
    assert_eq!(state.customer.phone, "");
    assert_eq!(state.customer.address, Address::default());
    assert_eq!(state.auto.counts.drivers, 0);
    assert!(state.auto.drivers.is_empty());
    assert_eq!(state.auto.counts.vehicles, 3);
    assert_eq!(state.auto.vehicles[0], Vehicle::default());
    assert_eq!(state.auto.vehicles[2].vin, "12");
    assert_eq!(state.home, default_state_at(now).home);
    assert_eq!(report.declared_version, None);
}

#[rstest]
fn unknown_fields_are_dropped(now: DateTime<Utc>) {
    let document = json!({
        "customer": {"name": "Dana", "nickname": "D"},
        "extension": {"anything": 1},
        "meta": {"version": 3, "updatedAt": "1999-01-01T00:00:00Z", "source": "import"}
    });

    let value = serde_json::to_value(reconcile_at(&document, now)).unwrap();

    assert!(value.get("extension").is_none());
    assert!(value["customer"].get("nickname").is_none());
    assert!(value["meta"].get("source").is_none());
    assert_eq!(value["meta"]["updatedAt"], json!(now));
}

#[rstest]
#[case(json!("home"), Tab::Home)]
#[case(json!("business"), Tab::Business)]
#[case(json!("Business"), Tab::Auto)]
#[case(json!("life"), Tab::Auto)]
#[case(json!(1), Tab::Auto)]
fn last_active_tab_is_exact_or_auto(
    now: DateTime<Utc>,
    #[case] tab: Value,
    #[case] expected: Tab,
) {
    let state = reconcile_at(&json!({"lastActiveTab": tab}), now);
    assert_eq!(state.last_active_tab, expected);
}

#[rstest]
fn newer_schema_is_accepted_and_flagged(now: DateTime<Utc>) {
    let document = json!({
        "customer": {"name": "Dana"},
        "meta": {"version": 4},
        "lastActiveTab": "home"
    });

    let (state, report) = reconcile_with_report(&document, now);

    assert!(report.is_newer_schema());
    assert_eq!(report.declared_version, Some(4));
    assert_eq!(state.customer.name, "Dana");
    assert_eq!(state.meta.version, 3);
}

#[rstest]
fn undecoded_placeholder_becomes_empty(now: DateTime<Utc>) {
    let document = json!({"auto": {"vehicles": [{"vin": "abc", "decoded": "\u{2014}"}]}});
    let state = reconcile_at(&document, now);
    assert_eq!(state.auto.vehicles[0].decoded, "");
}

#[test]
fn reconcile_stamps_current_time() {
    let before = Utc::now();
    let state = reconcile(&json!({"meta": {"updatedAt": "1999-01-01T00:00:00Z"}}));
    assert!(state.meta.updated_at >= before);
}
