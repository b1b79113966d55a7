// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dotted-path edits against the canonical state.
//!
//! Paths use the serialized (camelCase) field names, with list indices as plain segments:
//! `customer.address.city`, `auto.drivers.0.licenseState`, `business.workersComp.numEmployees`.

use std::fmt;

use smallvec::SmallVec;

use super::state::{
    Address, Business, CanonicalState, Contact, Customer, Driver, GeneralLiability, Home, Tab,
    Vehicle, WorkersComp,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    UnknownPath { path: String },
    InvalidCount { path: String, value: String },
    RowOutOfRange { path: String, index: usize, count: u32 },
    InvalidTab { value: String },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPath { path } => write!(f, "unknown field path {path:?}"),
            Self::InvalidCount { path, value } => {
                write!(f, "invalid count for {path}: {value:?} (expected 0 or more)")
            }
            Self::RowOutOfRange { path, index, count } => write!(
                f,
                "row {index} in {path:?} is outside the declared count of {count}"
            ),
            Self::InvalidTab { value } => {
                write!(f, "unknown tab {value:?} (expected auto, home or business)")
            }
        }
    }
}

impl std::error::Error for FieldError {}

impl CanonicalState {
    /// Writes `value` into the leaf addressed by `path`.
    ///
    /// Count edits resize the declared cardinality (clamped to `MAX_ROWS`) and materialize rows.
    /// VIN edits are sanitized. Row edits must address a row inside the declared count.
    pub fn set_field(&mut self, path: &str, value: &str) -> Result<(), FieldError> {
        let segments: SmallVec<[&str; 4]> = path.split('.').collect();
        let unknown = || FieldError::UnknownPath {
            path: path.to_owned(),
        };

        match segments.as_slice() {
            ["lastActiveTab"] => {
                self.last_active_tab = Tab::parse(value).ok_or_else(|| FieldError::InvalidTab {
                    value: value.to_owned(),
                })?;
            }
            ["customer", "address", leaf] => {
                assign(self.customer.address.field_mut(leaf), value).ok_or_else(unknown)?
            }
            ["customer", leaf] => assign(self.customer.field_mut(leaf), value).ok_or_else(unknown)?,
            ["auto", "counts", kind] => {
                let count = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| FieldError::InvalidCount {
                        path: path.to_owned(),
                        value: value.to_owned(),
                    })?;
                match *kind {
                    "drivers" => self.auto.set_driver_count(count),
                    "vehicles" => self.auto.set_vehicle_count(count),
                    _ => return Err(unknown()),
                }
            }
            ["auto", "drivers", index, leaf] => {
                let count = self.auto.counts.drivers;
                let index = row_index(path, index, count)?;
                let row = self.auto.drivers.get_mut(index).ok_or_else(unknown)?;
                assign(row.field_mut(leaf), value).ok_or_else(unknown)?
            }
            ["auto", "vehicles", index, leaf] => {
                let count = self.auto.counts.vehicles;
                let index = row_index(path, index, count)?;
                let row = self.auto.vehicles.get_mut(index).ok_or_else(unknown)?;
                match *leaf {
                    "vin" => row.set_vin(value),
                    _ => assign(row.field_mut(leaf), value).ok_or_else(unknown)?,
                }
            }
            ["home", "propertyAddress", leaf] => {
                assign(self.home.property_address.field_mut(leaf), value).ok_or_else(unknown)?
            }
            ["home", leaf] => assign(self.home.field_mut(leaf), value).ok_or_else(unknown)?,
            ["business", "address", leaf] => {
                assign(self.business.address.field_mut(leaf), value).ok_or_else(unknown)?
            }
            ["business", "contact", leaf] => {
                assign(self.business.contact.field_mut(leaf), value).ok_or_else(unknown)?
            }
            ["business", "workersComp", leaf] => {
                assign(self.business.workers_comp.field_mut(leaf), value).ok_or_else(unknown)?
            }
            ["business", "generalLiability", leaf] => {
                assign(self.business.general_liability.field_mut(leaf), value)
                    .ok_or_else(unknown)?
            }
            ["business", leaf] => {
                assign(self.business.field_mut(leaf), value).ok_or_else(unknown)?
            }
            _ => return Err(unknown()),
        }

        Ok(())
    }
}

fn assign(slot: Option<&mut String>, value: &str) -> Option<()> {
    let slot = slot?;
    value.clone_into(slot);
    Some(())
}

fn row_index(path: &str, raw: &str, count: u32) -> Result<usize, FieldError> {
    let index = raw.parse::<usize>().map_err(|_| FieldError::UnknownPath {
        path: path.to_owned(),
    })?;
    if index >= count as usize {
        return Err(FieldError::RowOutOfRange {
            path: path.to_owned(),
            index,
            count,
        });
    }
    Ok(index)
}

impl Address {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "street" => Some(&mut self.street),
            "city" => Some(&mut self.city),
            "state" => Some(&mut self.state),
            "zip" => Some(&mut self.zip),
            _ => None,
        }
    }
}

impl Customer {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "phone" => Some(&mut self.phone),
            "email" => Some(&mut self.email),
            _ => None,
        }
    }
}

impl Driver {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "dob" => Some(&mut self.dob),
            "licenseState" => Some(&mut self.license_state),
            "license" => Some(&mut self.license),
            _ => None,
        }
    }
}

impl Vehicle {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "decoded" => Some(&mut self.decoded),
            _ => None,
        }
    }
}

impl Home {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "yearBuilt" => Some(&mut self.year_built),
            "squareFeet" => Some(&mut self.square_feet),
            "constructionType" => Some(&mut self.construction_type),
            "roofType" => Some(&mut self.roof_type),
            "roofAge" => Some(&mut self.roof_age),
            "numberOfStories" => Some(&mut self.number_of_stories),
            "dwellingCoverageA" => Some(&mut self.dwelling_coverage_a),
            "deductible" => Some(&mut self.deductible),
            "priorCarrier" => Some(&mut self.prior_carrier),
            "expirationDate" => Some(&mut self.expiration_date),
            "claimsLast5Years" => Some(&mut self.claims_last_5_years),
            "claimsNotes" => Some(&mut self.claims_notes),
            "occupancy" => Some(&mut self.occupancy),
            "securityNotes" => Some(&mut self.security_notes),
            "hydrantDistance" => Some(&mut self.hydrant_distance),
            "fireStationDistance" => Some(&mut self.fire_station_distance),
            "mortgageeName" => Some(&mut self.mortgagee_name),
            "mortgageeLoanNumber" => Some(&mut self.mortgagee_loan_number),
            _ => None,
        }
    }
}

impl Contact {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "phone" => Some(&mut self.phone),
            "email" => Some(&mut self.email),
            _ => None,
        }
    }
}

impl WorkersComp {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "payrollEstimate" => Some(&mut self.payroll_estimate),
            "numEmployees" => Some(&mut self.num_employees),
            "classCodes" => Some(&mut self.class_codes),
            "priorCarrier" => Some(&mut self.prior_carrier),
            "expirationDate" => Some(&mut self.expiration_date),
            "claims" => Some(&mut self.claims),
            "claimsNotes" => Some(&mut self.claims_notes),
            _ => None,
        }
    }
}

impl GeneralLiability {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "salesEstimate" => Some(&mut self.sales_estimate),
            "subcontractorsUsed" => Some(&mut self.subcontractors_used),
            "operationsDescription" => Some(&mut self.operations_description),
            "priorCarrier" => Some(&mut self.prior_carrier),
            "expirationDate" => Some(&mut self.expiration_date),
            _ => None,
        }
    }
}

impl Business {
    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "businessName" => Some(&mut self.business_name),
            "entityType" => Some(&mut self.entity_type),
            "taxId" => Some(&mut self.tax_id),
            "yearsInBusiness" => Some(&mut self.years_in_business),
            "naics" => Some(&mut self.naics),
            "sic" => Some(&mut self.sic),
            _ => None,
        }
    }
}
