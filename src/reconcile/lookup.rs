// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lenient reads from untrusted JSON.

use serde_json::{Map, Value};

pub(super) type Object = Map<String, Value>;

pub(super) fn object(value: &Value) -> Option<&Object> {
    value.as_object()
}

/// A nested object under `key`. Any other value type is absent.
pub(super) fn child<'a>(parent: Option<&'a Object>, key: &str) -> Option<&'a Object> {
    parent?.get(key).and_then(object)
}

/// Strings verbatim, numbers rendered as text. Everything else is absent.
pub(super) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-negative integers, integral floats and numeric strings.
pub(super) fn count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            let f = n.as_f64()?;
            (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64)
                .then_some(f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// One candidate location of a field: `key` inside the object found at document path `scope`.
#[derive(Debug, Clone, Copy)]
pub(super) struct At<'a> {
    object: Option<&'a Object>,
    scope: &'a str,
    key: &'a str,
}

impl<'a> At<'a> {
    pub(super) fn new(object: Option<&'a Object>, scope: &'a str, key: &'a str) -> Self {
        Self { object, scope, key }
    }

    pub(super) fn value(&self) -> Option<&'a Value> {
        self.object?.get(self.key)
    }

    pub(super) fn path(&self) -> String {
        if self.scope.is_empty() {
            self.key.to_owned()
        } else {
            format!("{}.{}", self.scope, self.key)
        }
    }
}

/// Reads a leaf that has no prior names.
pub(super) fn leaf(at: At<'_>) -> String {
    at.value().and_then(text).unwrap_or_default()
}
