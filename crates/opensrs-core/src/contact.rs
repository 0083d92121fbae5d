// ── Contact normalization ──
//
// Registries are strict about contact formatting: phone numbers must be
// `+CC.NNNNNNNN`, country and state codes uppercase. Normalization runs
// before validation so obvious formatting slips are fixed rather than
// rejected.

use opensrs_api::models::{Contact, ContactSet};

use crate::error::CoreError;

/// Dialing codes for countries whose numbers are commonly entered without one.
const DIALING_CODES: &[(&str, &str)] = &[
    ("US", "1"),
    ("CA", "1"),
    ("GB", "44"),
    ("IE", "353"),
    ("AU", "61"),
    ("NZ", "64"),
    ("DE", "49"),
    ("FR", "33"),
    ("ES", "34"),
    ("IT", "39"),
    ("NL", "31"),
    ("BE", "32"),
    ("CH", "41"),
    ("AT", "43"),
    ("SE", "46"),
    ("NO", "47"),
    ("DK", "45"),
    ("FI", "358"),
    ("JP", "81"),
    ("IN", "91"),
    ("BR", "55"),
    ("MX", "52"),
];

fn dialing_code(country: &str) -> Option<&'static str> {
    DIALING_CODES
        .iter()
        .find(|(iso, _)| iso.eq_ignore_ascii_case(country))
        .map(|(_, code)| *code)
}

/// ITU-T E.164 country calling codes. The set is prefix-free, so at most
/// one entry matches the front of an international number.
const CALLING_CODES: &[&str] = &[
    "1", "7", "20", "27", "30", "31", "32", "33", "34", "36", "39", "40", "41", "43", "44",
    "45", "46", "47", "48", "49", "51", "52", "53", "54", "55", "56", "57", "58", "60", "61",
    "62", "63", "64", "65", "66", "81", "82", "84", "86", "90", "91", "92", "93", "94", "95",
    "98", "211", "212", "213", "216", "218", "220", "221", "222", "223", "224", "225", "226",
    "227", "228", "229", "230", "231", "232", "233", "234", "235", "236", "237", "238", "239",
    "240", "241", "242", "243", "244", "245", "246", "247", "248", "249", "250", "251", "252",
    "253", "254", "255", "256", "257", "258", "260", "261", "262", "263", "264", "265", "266",
    "267", "268", "269", "290", "291", "297", "298", "299", "350", "351", "352", "353", "354",
    "355", "356", "357", "358", "359", "370", "371", "372", "373", "374", "375", "376", "377",
    "378", "379", "380", "381", "382", "383", "385", "386", "387", "389", "420", "421", "423",
    "500", "501", "502", "503", "504", "505", "506", "507", "508", "509", "590", "591", "592",
    "593", "594", "595", "596", "597", "598", "599", "670", "672", "673", "674", "675", "676",
    "677", "678", "679", "680", "681", "682", "683", "685", "686", "687", "688", "689", "690",
    "691", "692", "850", "852", "853", "855", "856", "880", "886", "960", "961", "962", "963",
    "964", "965", "966", "967", "968", "970", "971", "972", "973", "974", "975", "976", "977",
    "992", "993", "994", "995", "996", "998",
];

/// Split an international number (digits only, `+` already removed) into
/// calling code and subscriber number.
fn split_calling_code(all: &str) -> Option<(&str, &str)> {
    (1..=3)
        .rev()
        .filter(|&len| len < all.len())
        .map(|len| all.split_at(len))
        .find(|(cc, _)| CALLING_CODES.contains(cc))
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Format a phone number as `+CC.NNNN`.
///
/// A number starting with `+` is international: its calling code comes
/// from its own digits, whatever the contact's country. Other numbers get
/// the country's dialing code (stripped from the front if already present,
/// along with a trunk `0`). Input with no digits is returned trimmed.
pub fn normalize_phone(field: &str, phone: &str, country: &str) -> Result<String, CoreError> {
    let raw = phone.trim();
    let all = digits(raw);
    if all.is_empty() {
        return Ok(raw.to_owned());
    }

    if raw.starts_with('+') {
        let (cc, number) = split_calling_code(&all).ok_or_else(|| {
            CoreError::validation(field, format!("'{raw}' has no known country calling code"))
        })?;
        return Ok(format!("+{cc}.{number}"));
    }

    Ok(match dialing_code(country) {
        Some(cc) => {
            let national = if cc == "1" && all.len() == 11 {
                all.strip_prefix(cc).unwrap_or(&all)
            } else {
                all.strip_prefix('0').unwrap_or(&all)
            };
            format!("+{cc}.{national}")
        }
        None => raw.to_owned(),
    })
}

fn trim_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Upper-case a value when it looks like a two-letter code.
fn code_upper(value: &str) -> String {
    let v = value.trim();
    if v.len() == 2 && v.chars().all(|c| c.is_ascii_alphabetic()) {
        v.to_ascii_uppercase()
    } else {
        v.to_owned()
    }
}

/// Trim every field, uppercase country/state codes and format phone/fax.
pub fn normalize_contact(contact: Contact) -> Result<Contact, CoreError> {
    let country = code_upper(&contact.country);
    let phone = normalize_phone("phone", &contact.phone, &country)?;
    let fax = trim_opt(contact.fax)
        .map(|f| normalize_phone("fax", &f, &country))
        .transpose()?;
    Ok(Contact {
        first_name: contact.first_name.trim().to_owned(),
        last_name: contact.last_name.trim().to_owned(),
        org_name: trim_opt(contact.org_name),
        address1: contact.address1.trim().to_owned(),
        address2: trim_opt(contact.address2),
        address3: trim_opt(contact.address3),
        city: contact.city.trim().to_owned(),
        state: code_upper(&contact.state),
        postal_code: contact.postal_code.trim().to_owned(),
        phone,
        fax,
        email: contact.email.trim().to_ascii_lowercase(),
        country,
    })
}

pub fn normalize_contact_set(set: ContactSet) -> Result<ContactSet, CoreError> {
    Ok(ContactSet {
        owner: normalize_contact(set.owner)?,
        admin: normalize_contact(set.admin)?,
        tech: normalize_contact(set.tech)?,
        billing: normalize_contact(set.billing)?,
    })
}
