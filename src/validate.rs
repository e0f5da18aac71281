//! Pure validation and display formatting for client records.
//!
//! Everything here is side-effect free; the form calls `validate` on submit
//! and the formatting helpers on every keystroke and when rendering.

use std::collections::BTreeMap;

use crate::app::form::ClientDraft;

/// Form field a validation error is attached to. `Ord` keeps the error
/// list in a stable field order when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Cpf,
    Email,
    Address(AddressField),
    Phone(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AddressField {
    State,
    City,
    Neighborhood,
    Street,
    Number,
    PostalCode,
}

impl AddressField {
    pub const ALL: [AddressField; 6] = [
        AddressField::State,
        AddressField::City,
        AddressField::Neighborhood,
        AddressField::Street,
        AddressField::Number,
        AddressField::PostalCode,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AddressField::State => "State",
            AddressField::City => "City",
            AddressField::Neighborhood => "Neighborhood",
            AddressField::Street => "Street",
            AddressField::Number => "Number",
            AddressField::PostalCode => "Postal code",
        }
    }
}

/// Validate a draft before submit. An empty map means it may be sent.
pub fn validate(draft: &ClientDraft) -> BTreeMap<Field, String> {
    let mut errors = BTreeMap::new();

    if draft.name.trim().is_empty() {
        errors.insert(Field::Name, "Name is required".to_string());
    }

    let digits = cpf_digits(&draft.cpf);
    if digits.is_empty() {
        errors.insert(Field::Cpf, "CPF is required".to_string());
    } else if digits.len() != 11 {
        errors.insert(Field::Cpf, "CPF must contain 11 digits".to_string());
    }

    // Email is optional; only a non-empty value is checked for shape.
    if !draft.email.is_empty() && !is_valid_email(&draft.email) {
        errors.insert(Field::Email, "Invalid email".to_string());
    }

    for field in AddressField::ALL {
        if draft.address.field(field).trim().is_empty() {
            errors.insert(
                Field::Address(field),
                format!("{} is required", field.label()),
            );
        }
    }

    for (i, phone) in draft.phones.iter().enumerate() {
        if phone.area_code.trim().is_empty() || phone.number.trim().is_empty() {
            errors.insert(
                Field::Phone(i),
                "area code and number are required".to_string(),
            );
        }
    }

    errors
}

/// Keep only the digits of a CPF, however it was typed.
pub fn cpf_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a CPF as `XXX.XXX.XXX-XX` while it is being typed. Digits beyond
/// the eleventh are dropped. Applying it to its own output is a no-op.
pub fn format_cpf(value: &str) -> String {
    let mut out = String::with_capacity(14);
    for (i, c) in value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(11)
        .enumerate()
    {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Permissive structural email check: non-empty local part, an `@`, and a
/// dot somewhere inside the domain. No whitespace anywhere.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some(at) = value.find('@') else {
        return false;
    };
    if at == 0 {
        return false;
    }
    let domain = &value[at + 1..];
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Display form for a phone: `(11) 98765-4321`. Numbers too short to split
/// are shown after the area code as-is.
pub fn format_phone(area_code: &str, number: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > 4 {
        let split = digits.len() - 4;
        format!("({}) {}-{}", area_code, &digits[..split], &digits[split..])
    } else if digits.is_empty() {
        format!("({}) {}", area_code, number)
    } else {
        format!("({}) {}", area_code, digits)
    }
}
