// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::vin::sanitize_vin;

/// Version stamped into `meta.version` of every reconciled document.
pub const SCHEMA_VERSION: u32 = 3;

/// Upper bound for the declared number of driver and vehicle rows.
pub const MAX_ROWS: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Counts {
    pub drivers: u32,
    pub vehicles: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub name: String,
    pub dob: String,
    pub license_state: String,
    pub license: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Vehicle {
    /// Upper-cased, alphanumeric only. May be a partial entry shorter than 17 characters.
    pub vin: String,
    /// Human-readable decode result written by the view's VIN lookup.
    pub decoded: String,
}

impl Vehicle {
    pub fn set_vin(&mut self, raw: &str) {
        self.vin = sanitize_vin(raw);
    }
}

/// Auto quote data.
///
/// `counts` is the declared cardinality. The lists may hold more entries than declared (extra
/// rows are kept but inactive); `normalize` pads them with empty records up to the count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Auto {
    pub counts: Counts,
    pub drivers: Vec<Driver>,
    pub vehicles: Vec<Vehicle>,
}

impl Auto {
    pub fn active_drivers(&self) -> &[Driver] {
        let len = (self.counts.drivers as usize).min(self.drivers.len());
        &self.drivers[..len]
    }

    pub fn active_vehicles(&self) -> &[Vehicle] {
        let len = (self.counts.vehicles as usize).min(self.vehicles.len());
        &self.vehicles[..len]
    }

    pub fn set_driver_count(&mut self, count: u32) {
        self.counts.drivers = count.min(MAX_ROWS);
        self.materialize_rows();
    }

    pub fn set_vehicle_count(&mut self, count: u32) {
        self.counts.vehicles = count.min(MAX_ROWS);
        self.materialize_rows();
    }

    fn materialize_rows(&mut self) {
        let drivers = self.counts.drivers as usize;
        if self.drivers.len() < drivers {
            self.drivers.resize_with(drivers, Driver::default);
        }
        let vehicles = self.counts.vehicles as usize;
        if self.vehicles.len() < vehicles {
            self.vehicles.resize_with(vehicles, Vehicle::default);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Home {
    pub property_address: Address,
    pub year_built: String,
    pub square_feet: String,
    pub construction_type: String,
    pub roof_type: String,
    pub roof_age: String,
    pub number_of_stories: String,
    pub dwelling_coverage_a: String,
    pub deductible: String,
    pub prior_carrier: String,
    pub expiration_date: String,
    #[serde(rename = "claimsLast5Years")]
    pub claims_last_5_years: String,
    pub claims_notes: String,
    pub occupancy: String,
    pub security_notes: String,
    pub hydrant_distance: String,
    pub fire_station_distance: String,
    pub mortgagee_name: String,
    pub mortgagee_loan_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkersComp {
    pub payroll_estimate: String,
    pub num_employees: String,
    pub class_codes: String,
    pub prior_carrier: String,
    pub expiration_date: String,
    pub claims: String,
    pub claims_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralLiability {
    pub sales_estimate: String,
    pub subcontractors_used: String,
    pub operations_description: String,
    pub prior_carrier: String,
    pub expiration_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub business_name: String,
    pub entity_type: String,
    pub tax_id: String,
    pub years_in_business: String,
    pub naics: String,
    pub sic: String,
    pub address: Address,
    pub contact: Contact,
    pub workers_comp: WorkersComp,
    pub general_liability: GeneralLiability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub version: u32,
    #[schemars(with = "String")]
    pub updated_at: DateTime<Utc>,
}

/// The form tab the operator last worked on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Auto,
    Home,
    Business,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Auto, Tab::Home, Tab::Business];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Home => "home",
            Self::Business => "business",
        }
    }

    /// Exact, case-sensitive match against the three tab identifiers.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.as_str() == value)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTabError {
    value: String,
}

impl fmt::Display for ParseTabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tab {:?} (expected auto, home or business)", self.value)
    }
}

impl std::error::Error for ParseTabError {}

impl FromStr for Tab {
    type Err = ParseTabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseTabError {
            value: s.to_owned(),
        })
    }
}

/// The single authoritative in-memory representation of all intake data.
///
/// Every leaf is always present; absent input is represented as `""` (or `0` for counts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalState {
    pub customer: Customer,
    pub auto: Auto,
    pub home: Home,
    pub business: Business,
    pub meta: Meta,
    pub last_active_tab: Tab,
}

/// Returns a fresh, fully populated default state stamped with the current time.
pub fn default_state() -> CanonicalState {
    default_state_at(Utc::now())
}

pub fn default_state_at(now: DateTime<Utc>) -> CanonicalState {
    CanonicalState {
        customer: Customer::default(),
        auto: Auto::default(),
        home: Home::default(),
        business: Business::default(),
        meta: Meta {
            version: SCHEMA_VERSION,
            updated_at: now,
        },
        last_active_tab: Tab::Auto,
    }
}

impl CanonicalState {
    /// Re-establishes the row and VIN invariants after in-place edits.
    pub fn normalize(&mut self) {
        self.auto.counts.drivers = self.auto.counts.drivers.min(MAX_ROWS);
        self.auto.counts.vehicles = self.auto.counts.vehicles.min(MAX_ROWS);
        self.auto.materialize_rows();
        for vehicle in &mut self.auto.vehicles {
            let vin = sanitize_vin(&vehicle.vin);
            if vin != vehicle.vin {
                vehicle.vin = vin;
            }
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.meta.updated_at = now;
    }

    /// Structural equality that ignores `meta.updatedAt`.
    pub fn same_content(&self, other: &Self) -> bool {
        self.customer == other.customer
            && self.auto == other.auto
            && self.home == other.home
            && self.business == other.business
            && self.meta.version == other.meta.version
            && self.last_active_tab == other.last_active_tab
    }

    /// Indented document form used for file artifacts.
    pub fn to_document_string(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}
