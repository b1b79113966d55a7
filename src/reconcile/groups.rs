// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-group field resolution.
//!
//! Each group reads its current shape first and falls back to the prior shapes:
//! root-level `counts`/`drivers`/`vehicles`, `auto.driverCount`/`auto.vehicleCount`, flat
//! `city`/`state`/`zip` beside a street string, flat `contact*` fields, and renamed leaves.

use serde_json::Value;

use super::lookup::{child, leaf, object, text, At, Object};
use super::resolve::Resolver;
use super::RowKind;
use crate::model::{
    sanitize_vin, Address, Auto, Business, Contact, Counts, Customer, Driver, GeneralLiability,
    Home, Vehicle, WorkersComp, MAX_ROWS,
};

/// Placeholder the intake form showed for a vehicle that was never decoded.
const UNDECODED_PLACEHOLDER: &str = "\u{2014}";

/// Street: nested `street`, then `<key>` as a plain string, then a flat `street` sibling.
/// City/state/zip: nested, then flat siblings.
fn address(r: &mut Resolver<'_>, group: Option<&Object>, scope: &str, key: &str) -> Address {
    let nested_scope = format!("{scope}.{key}");
    let nested_scope = nested_scope.as_str();
    let nested = child(group, key);
    let at = move |name| At::new(nested, nested_scope, name);
    let flat = move |name| At::new(group, scope, name);

    Address {
        street: r.text(at("street"), &[flat(key), flat("street")]),
        city: r.text(at("city"), &[flat("city")]),
        state: r.text(at("state"), &[flat("state")]),
        zip: r.text(at("zip"), &[flat("zip")]),
    }
}

pub(super) fn customer(r: &mut Resolver<'_>, root: Option<&Object>) -> Customer {
    let group = child(root, "customer");
    let at = move |name| At::new(group, "customer", name);

    Customer {
        name: leaf(at("name")),
        phone: leaf(at("phone")),
        email: leaf(at("email")),
        address: address(r, group, "customer", "address"),
    }
}

pub(super) fn auto(r: &mut Resolver<'_>, root: Option<&Object>) -> Auto {
    let group = child(root, "auto");

    let drivers: Vec<Driver> = rows(r, root, group, "drivers")
        .iter()
        .map(driver)
        .collect();
    let vehicles: Vec<Vehicle> = rows(r, root, group, "vehicles")
        .iter()
        .map(vehicle)
        .collect();

    let counts = Counts {
        drivers: declared_count(r, root, group, RowKind::Drivers, drivers.len()),
        vehicles: declared_count(r, root, group, RowKind::Vehicles, vehicles.len()),
    };

    Auto {
        counts,
        drivers,
        vehicles,
    }
}

fn rows<'a>(
    r: &mut Resolver<'_>,
    root: Option<&'a Object>,
    group: Option<&'a Object>,
    key: &'static str,
) -> &'a [Value] {
    let current = At::new(group, "auto", key);
    let prior = [At::new(root, "", key)];
    r.first(current, &prior, Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// `auto.counts.X`, then `auto.<x>Count`, then root `counts.X`, then the list length.
fn declared_count(
    r: &mut Resolver<'_>,
    root: Option<&Object>,
    group: Option<&Object>,
    kind: RowKind,
    listed: usize,
) -> u32 {
    let key = kind.key();
    let legacy_key = match kind {
        RowKind::Drivers => "driverCount",
        RowKind::Vehicles => "vehicleCount",
    };

    let declared = r.count(
        At::new(child(group, "counts"), "auto.counts", key),
        &[
            At::new(group, "auto", legacy_key),
            At::new(child(root, "counts"), "counts", key),
        ],
    );

    let count = match declared {
        Some(count) => count,
        None if listed > 0 => {
            r.report().derived_counts.push(kind);
            listed as u64
        }
        None => 0,
    };

    if count > u64::from(MAX_ROWS) {
        r.report().clamped_counts.push(kind);
        MAX_ROWS
    } else {
        count as u32
    }
}

fn driver(value: &Value) -> Driver {
    let row = object(value);
    let at = move |name| At::new(row, "", name);
    Driver {
        name: leaf(at("name")),
        dob: leaf(at("dob")),
        license_state: leaf(at("licenseState")),
        license: leaf(at("license")),
    }
}

fn vehicle(value: &Value) -> Vehicle {
    let row = object(value);
    let at = move |name| At::new(row, "", name);
    let decoded = leaf(at("decoded"));
    Vehicle {
        vin: at("vin").value().and_then(text).map(|raw| sanitize_vin(&raw)).unwrap_or_default(),
        decoded: if decoded == UNDECODED_PLACEHOLDER {
            String::new()
        } else {
            decoded
        },
    }
}

pub(super) fn home(r: &mut Resolver<'_>, root: Option<&Object>) -> Home {
    let group = child(root, "home");
    let at = move |name| At::new(group, "home", name);

    Home {
        property_address: address(r, group, "home", "propertyAddress"),
        year_built: leaf(at("yearBuilt")),
        square_feet: leaf(at("squareFeet")),
        construction_type: leaf(at("constructionType")),
        roof_type: leaf(at("roofType")),
        roof_age: leaf(at("roofAge")),
        number_of_stories: leaf(at("numberOfStories")),
        dwelling_coverage_a: r.text(at("dwellingCoverageA"), &[at("dwellingCoverage")]),
        deductible: leaf(at("deductible")),
        prior_carrier: leaf(at("priorCarrier")),
        expiration_date: r.text(at("expirationDate"), &[at("priorCarrierExpiration")]),
        claims_last_5_years: leaf(at("claimsLast5Years")),
        claims_notes: leaf(at("claimsNotes")),
        occupancy: leaf(at("occupancy")),
        security_notes: r.text(at("securityNotes"), &[at("securityAlarms")]),
        hydrant_distance: leaf(at("hydrantDistance")),
        fire_station_distance: leaf(at("fireStationDistance")),
        mortgagee_name: leaf(at("mortgageeName")),
        mortgagee_loan_number: leaf(at("mortgageeLoanNumber")),
    }
}

pub(super) fn business(r: &mut Resolver<'_>, root: Option<&Object>) -> Business {
    let group = child(root, "business");
    let at = move |name| At::new(group, "business", name);

    Business {
        business_name: leaf(at("businessName")),
        entity_type: leaf(at("entityType")),
        tax_id: leaf(at("taxId")),
        years_in_business: leaf(at("yearsInBusiness")),
        naics: leaf(at("naics")),
        sic: leaf(at("sic")),
        address: address(r, group, "business", "address"),
        contact: contact(r, group),
        workers_comp: workers_comp(r, group),
        general_liability: general_liability(r, group),
    }
}

fn contact(r: &mut Resolver<'_>, business: Option<&Object>) -> Contact {
    let nested = child(business, "contact");
    let at = move |name| At::new(nested, "business.contact", name);
    let flat = move |name| At::new(business, "business", name);

    Contact {
        name: r.text(at("name"), &[flat("contactName")]),
        phone: r.text(at("phone"), &[flat("contactPhone")]),
        email: r.text(at("email"), &[flat("contactEmail")]),
    }
}

fn workers_comp(r: &mut Resolver<'_>, business: Option<&Object>) -> WorkersComp {
    let group = child(business, "workersComp");
    let at = move |name| At::new(group, "business.workersComp", name);

    WorkersComp {
        payroll_estimate: leaf(at("payrollEstimate")),
        num_employees: r.text(at("numEmployees"), &[at("numberOfEmployees")]),
        class_codes: leaf(at("classCodes")),
        prior_carrier: leaf(at("priorCarrier")),
        expiration_date: r.text(at("expirationDate"), &[at("priorCarrierExpiration")]),
        claims: leaf(at("claims")),
        claims_notes: leaf(at("claimsNotes")),
    }
}

fn general_liability(r: &mut Resolver<'_>, business: Option<&Object>) -> GeneralLiability {
    let group = child(business, "generalLiability");
    let at = move |name| At::new(group, "business.generalLiability", name);

    GeneralLiability {
        sales_estimate: r.text(at("salesEstimate"), &[at("salesRevenueEstimate")]),
        subcontractors_used: leaf(at("subcontractorsUsed")),
        operations_description: r.text(
            at("operationsDescription"),
            &[at("descriptionOfOperations")],
        ),
        prior_carrier: leaf(at("priorCarrier")),
        expiration_date: r.text(at("expirationDate"), &[at("priorCarrierExpiration")]),
    }
}

