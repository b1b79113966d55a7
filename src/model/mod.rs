// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canonical intake schema.
//!
//! One `CanonicalState` holds every form value. Leaves are strings (absent means `""`) except the
//! declared driver/vehicle counts.

pub mod fields;
pub mod schema;
pub mod state;
pub mod vin;

pub use fields::FieldError;
pub use schema::canonical_json_schema;
pub use state::{
    default_state, default_state_at, Address, Auto, Business, CanonicalState, Contact, Counts,
    Customer, Driver, GeneralLiability, Home, Meta, ParseTabError, Tab, Vehicle, WorkersComp,
    MAX_ROWS, SCHEMA_VERSION,
};
pub use vin::{is_complete_vin, sanitize_vin, VIN_LEN};
