// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Length of a complete vehicle identification number.
pub const VIN_LEN: usize = 17;

/// Upper-cases and strips everything that is not an ASCII letter or digit.
pub fn sanitize_vin(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}

/// Whether a sanitized VIN is long enough to be sent to a decoder.
pub fn is_complete_vin(vin: &str) -> bool {
    vin.len() == VIN_LEN
}
