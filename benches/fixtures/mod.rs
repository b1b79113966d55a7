// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark documents (no RNG).

use serde_json::{json, Value};

fn drivers(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "name": format!("Driver {i}"),
                "dob": format!("19{:02}-0{}-1{}", 60 + i, 1 + i % 9, i % 10),
                "licenseState": "TX",
                "license": format!("D{:08}", i * 7919)
            })
        })
        .collect()
}

fn vehicles(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({"vin": format!("1hg-cm8 2633a00{:04}", i), "decoded": "\u{2014}"}))
        .collect()
}

/// Root-level counts and lists, customer without nested address.
pub fn v1_document(rows: usize) -> Value {
    json!({
        "customer": {"name": "Dana Reyes", "phone": "512-555-0101", "email": "dana@example.com"},
        "counts": {"drivers": rows, "vehicles": rows},
        "drivers": drivers(rows),
        "vehicles": vehicles(rows),
        "lastActiveTab": "auto"
    })
}

/// Flat addresses and contacts, old leaf names.
pub fn v2_document(rows: usize) -> Value {
    json!({
        "customer": {
            "name": "Dana Reyes",
            "address": {"street": "1 Main St", "city": "Austin", "state": "TX", "zip": "78701"}
        },
        "auto": {
            "driverCount": rows,
            "vehicleCount": rows,
            "drivers": drivers(rows),
            "vehicles": vehicles(rows)
        },
        "home": {
            "propertyAddress": "9 Oak Ln",
            "city": "Round Rock",
            "state": "TX",
            "zip": "78664",
            "yearBuilt": "1998",
            "dwellingCoverage": "350000",
            "priorCarrierExpiration": "2026-09-01",
            "securityAlarms": "central station"
        },
        "business": {
            "businessName": "Reyes Roofing",
            "address": "44 Industrial Blvd",
            "city": "Austin",
            "state": "TX",
            "zip": "78744",
            "contactName": "Dana",
            "contactPhone": "512-555-0199",
            "contactEmail": "ops@example.com",
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

/// Current shape, produced by reconciling the v2 document.
pub fn v3_document(rows: usize) -> Value {
    let state = quote_intake::reconcile(&v2_document(rows));
    serde_json::to_value(state).expect("serialize canonical state")
}
