//! GSTIN and transporter ID format validation.

use std::fmt;

/// Characters of the GSTIN check-digit alphabet, in code-point order.
const CODE_POINT_CHARS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Prefix of transporter IDs issued by the e-waybill system.
pub const TRANSPORTER_ID_PREFIX: &str = "88";

/// Error returned when a GSTIN fails format or check-digit validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GstinFormatError {
    /// The invalid input value.
    pub value: String,
    /// Why the value failed validation.
    pub reason: String,
}

impl fmt::Display for GstinFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid GSTIN '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for GstinFormatError {}

/// Kind of registration a GSTIN shape belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GstinCategory {
    /// Regular or composition taxpayer (PAN based).
    Regular,
    /// Tax deductor at source (TAN based, `D` at position 14).
    TaxDeductor,
    /// E-commerce operator collecting tax at source (`C` at position 14).
    TaxCollector,
    /// Non-resident online information and database access provider.
    NonResidentOnline,
    /// UN body, embassy or other notified person.
    UnBody,
}

fn is_state_code(s: &[u8]) -> bool {
    match (s[0], s[1]) {
        (b'0'..=b'2', b'0'..=b'9') => true,
        (b'3', b'0'..=b'8') => true,
        _ => false,
    }
}

fn all_alpha(s: &[u8]) -> bool {
    s.iter().all(|c| c.is_ascii_uppercase())
}

fn all_digit(s: &[u8]) -> bool {
    s.iter().all(|c| c.is_ascii_digit())
}

fn all_alnum(s: &[u8]) -> bool {
    s.iter().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Detect the registration category of an upper-case, 15-character GSTIN.
///
/// Returns `None` if the value matches none of the known shapes.
pub fn gstin_category(gstin: &str) -> Option<GstinCategory> {
    let s = gstin.as_bytes();
    if s.len() != 15 {
        return None;
    }

    type ShapeCheck = fn(&[u8]) -> bool;
    let shapes: &[(GstinCategory, ShapeCheck)] = &[
        (GstinCategory::Regular, |s| {
            is_state_code(s)
                && all_alpha(&s[2..5])
                && b"ABCFGHLJPTK".contains(&s[5])
                && s[6].is_ascii_uppercase()
                && all_digit(&s[7..11])
                && s[11].is_ascii_uppercase()
                && all_alnum(&s[12..13])
                && s[13] == b'Z'
                && all_alnum(&s[14..])
        }),
        (GstinCategory::TaxDeductor, |s| {
            is_state_code(s)
                && all_alpha(&s[2..6])
                && all_digit(&s[6..11])
                && s[11].is_ascii_uppercase()
                && s[12].is_ascii_digit()
                && s[13] == b'D'
                && all_alnum(&s[14..])
        }),
        (GstinCategory::TaxCollector, |s| {
            is_state_code(s)
                && all_alpha(&s[2..7])
                && all_digit(&s[7..11])
                && s[11].is_ascii_uppercase()
                && all_alnum(&s[12..13])
                && s[13] == b'C'
                && all_alnum(&s[14..])
        }),
        (GstinCategory::NonResidentOnline, |s| {
            &s[..2] == b"99"
                && all_digit(&s[2..4])
                && all_alpha(&s[4..7])
                && all_digit(&s[7..12])
                && &s[12..14] == b"OS"
                && all_alnum(&s[14..])
        }),
        (GstinCategory::UnBody, |s| {
            all_digit(&s[..4])
                && all_alpha(&s[4..7])
                && all_digit(&s[7..12])
                && (s[12] == b'U' || s[12] == b'O')
                && s[13] == b'N'
                && all_alnum(&s[14..])
        }),
    ];

    shapes
        .iter()
        .find(|(_, check)| check(s))
        .map(|&(category, _)| category)
}

/// Validate a GSTIN by length, shape and check digit (no network call).
///
/// The input is trimmed and upper-cased. Returns the normalized GSTIN.
pub fn validate_gstin(gstin: &str) -> Result<String, GstinFormatError> {
    let gstin = gstin.trim().to_uppercase();

    if gstin.len() != 15 {
        return Err(GstinFormatError {
            reason: format!("must have 15 characters, got {}", gstin.len()),
            value: gstin,
        });
    }

    if gstin_category(&gstin).is_none() {
        return Err(GstinFormatError {
            value: gstin,
            reason: "does not match any known GSTIN format".into(),
        });
    }

    validate_gstin_check_digit(&gstin)?;
    Ok(gstin)
}

/// Compute the expected check character for the first 14 characters of a GSTIN.
///
/// Returns `None` if the body contains characters outside `0-9A-Z`.
pub fn gstin_check_char(body: &str) -> Option<char> {
    let modulus = CODE_POINT_CHARS.len() as u32;
    let mut total = 0u32;
    let mut factor = 1u32;

    for c in body.bytes() {
        let code_point = CODE_POINT_CHARS.iter().position(|&p| p == c)? as u32;
        let product = factor * code_point;
        total += product / modulus + product % modulus;
        factor = if factor == 1 { 2 } else { 1 };
    }

    let check = (modulus - total % modulus) % modulus;
    Some(CODE_POINT_CHARS[check as usize] as char)
}

/// Verify the last character of a GSTIN against its mod-36 check digit.
pub fn validate_gstin_check_digit(gstin: &str) -> Result<(), GstinFormatError> {
    let gstin = gstin.trim().to_uppercase();
    if gstin.len() != 15 || !gstin.is_ascii() {
        return Err(GstinFormatError {
            value: gstin,
            reason: "must have 15 characters".into(),
        });
    }

    let (body, last) = gstin.split_at(14);
    match gstin_check_char(body) {
        Some(expected) if last.starts_with(expected) => Ok(()),
        Some(_) => Err(GstinFormatError {
            value: gstin,
            reason: "invalid check digit, please check the GSTIN".into(),
        }),
        None => Err(GstinFormatError {
            value: gstin,
            reason: "contains characters outside 0-9 and A-Z".into(),
        }),
    }
}

/// Whether a value has the shape of a transporter ID (15 upper-case alphanumerics).
pub fn is_transporter_id_format(id: &str) -> bool {
    id.len() == 15 && all_alnum(id.as_bytes())
}

/// Whether a transporter ID must be resolved through the e-waybill
/// transporter API rather than the GSTIN APIs.
pub fn needs_transporter_api(id: &str) -> bool {
    id.starts_with(TRANSPORTER_ID_PREFIX) || validate_gstin_check_digit(id).is_err()
}
