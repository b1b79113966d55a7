// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::Value;

use super::state::CanonicalState;

/// JSON Schema of the canonical document, for validating exported files.
pub fn canonical_json_schema() -> Value {
    let schema = schemars::schema_for!(CanonicalState);
    serde_json::to_value(schema).unwrap_or(Value::Null)
}
