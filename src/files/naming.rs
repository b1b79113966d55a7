// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

const FALLBACK_STEM: &str = "intake";

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    // Constant pattern; compiling it cannot fail.
    UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\- ]+").expect("filename pattern"))
}

/// `<customer name>_<YYYY-MM-DD>.json`, keeping only letters, digits, `_`, `-` and spaces.
pub fn suggested_filename(customer_name: &str, date: NaiveDate) -> String {
    let stem = unsafe_chars().replace_all(customer_name.trim(), "");
    let stem = stem.trim();
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{stem}_{}.json", date.format("%Y-%m-%d"))
}
