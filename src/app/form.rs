//! Client form state: the editable draft, row navigation, and submit
//! plumbing for the create/edit modal.

use std::collections::BTreeMap;

use crate::api::ApiError;
use crate::model::{Address, AddressPayload, Client, ClientPayload, PhonePayload};
use crate::validate::{self, AddressField, Field};

/// Editable shape of a client while the form modal is open. Everything is a
/// plain string; conversion to the wire shape happens at submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientDraft {
    pub id: Option<i64>,
    pub name: String,
    pub social_name: String,
    pub email: String,
    /// Kept display-formatted (`XXX.XXX.XXX-XX`) at all times.
    pub cpf: String,
    pub address: AddressDraft,
    pub phones: Vec<PhoneDraft>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressDraft {
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub number: String,
    pub postal_code: String,
    pub additional_info: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneDraft {
    pub area_code: String,
    pub number: String,
}

impl ClientDraft {
    /// Empty draft for a new client, with the single phone entry the form
    /// always starts from.
    pub fn new() -> Self {
        Self {
            phones: vec![PhoneDraft::default()],
            ..Default::default()
        }
    }

    /// Draft prefilled from a server record. Absent phones become one empty
    /// entry and an absent address becomes an empty address draft, so the
    /// form always has something to edit.
    pub fn from_client(client: &Client) -> Self {
        Self {
            id: Some(client.id),
            name: client.name.clone(),
            social_name: client.social_name.clone().unwrap_or_default(),
            email: client.email.clone().unwrap_or_default(),
            cpf: validate::format_cpf(&client.cpf),
            address: client
                .address
                .as_ref()
                .map(AddressDraft::from_address)
                .unwrap_or_default(),
            phones: if client.phones.is_empty() {
                vec![PhoneDraft::default()]
            } else {
                client
                    .phones
                    .iter()
                    .map(|p| PhoneDraft {
                        area_code: p.area_code.clone(),
                        number: p.number.clone(),
                    })
                    .collect()
            },
        }
    }

    /// Wire shape for submit: trimmed, empty optionals omitted, CPF reduced
    /// to digits, phones with a blank part dropped.
    pub fn to_payload(&self) -> ClientPayload {
        ClientPayload {
            name: self.name.trim().to_string(),
            social_name: none_if_empty(&self.social_name),
            email: none_if_empty(&self.email),
            cpf: validate::cpf_digits(&self.cpf),
            address: self.address.to_payload(),
            phones: self
                .phones
                .iter()
                .filter(|p| !p.area_code.trim().is_empty() && !p.number.trim().is_empty())
                .map(|p| PhonePayload {
                    area_code: p.area_code.trim().to_string(),
                    number: p.number.trim().to_string(),
                })
                .collect(),
        }
    }
}

impl AddressDraft {
    pub fn from_address(address: &Address) -> Self {
        Self {
            state: address.state.clone(),
            city: address.city.clone(),
            neighborhood: address.neighborhood.clone(),
            street: address.street.clone(),
            number: address.number.clone(),
            postal_code: address.postal_code.clone(),
            additional_info: address.additional_info.clone().unwrap_or_default(),
        }
    }

    pub fn field(&self, field: AddressField) -> &str {
        match field {
            AddressField::State => &self.state,
            AddressField::City => &self.city,
            AddressField::Neighborhood => &self.neighborhood,
            AddressField::Street => &self.street,
            AddressField::Number => &self.number,
            AddressField::PostalCode => &self.postal_code,
        }
    }

    pub fn field_mut(&mut self, field: AddressField) -> &mut String {
        match field {
            AddressField::State => &mut self.state,
            AddressField::City => &mut self.city,
            AddressField::Neighborhood => &mut self.neighborhood,
            AddressField::Street => &mut self.street,
            AddressField::Number => &mut self.number,
            AddressField::PostalCode => &mut self.postal_code,
        }
    }

    fn to_payload(&self) -> AddressPayload {
        AddressPayload {
            state: self.state.trim().to_string(),
            city: self.city.trim().to_string(),
            neighborhood: self.neighborhood.trim().to_string(),
            street: self.street.trim().to_string(),
            number: self.number.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            additional_info: none_if_empty(&self.additional_info),
        }
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One selectable row in the form modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Name,
    SocialName,
    Email,
    Cpf,
    Address(AddressField),
    AdditionalInfo,
    Phone(usize, PhonePart),
    AddPhone,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonePart {
    AreaCode,
    Number,
}

/// Which validation error a row's input clears, if any.
pub fn field_for_row(row: FormRow) -> Option<Field> {
    match row {
        FormRow::Name => Some(Field::Name),
        FormRow::Email => Some(Field::Email),
        FormRow::Cpf => Some(Field::Cpf),
        FormRow::Address(field) => Some(Field::Address(field)),
        FormRow::Phone(i, _) => Some(Field::Phone(i)),
        FormRow::SocialName | FormRow::AdditionalInfo | FormRow::AddPhone | FormRow::Submit => None,
    }
}

/// State of the create/edit modal. Idle while editable; `submitting` while
/// the save request is in flight, during which all input is ignored.
#[derive(Debug, Clone)]
pub struct FormState {
    pub draft: ClientDraft,
    pub errors: BTreeMap<Field, String>,
    pub server_error: Option<String>,
    pub cursor: usize,
    pub submitting: bool,
}

impl FormState {
    pub fn create() -> Self {
        Self::with_draft(ClientDraft::new())
    }

    pub fn edit(client: &Client) -> Self {
        Self::with_draft(ClientDraft::from_client(client))
    }

    fn with_draft(draft: ClientDraft) -> Self {
        Self {
            draft,
            errors: BTreeMap::new(),
            server_error: None,
            cursor: 0,
            submitting: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.id.is_some()
    }

    /// Row list in display order. Recomputed on demand because the phone
    /// rows grow and shrink with the draft.
    pub fn rows(&self) -> Vec<FormRow> {
        let mut rows = vec![
            FormRow::Name,
            FormRow::SocialName,
            FormRow::Email,
            FormRow::Cpf,
        ];
        rows.extend(AddressField::ALL.iter().copied().map(FormRow::Address));
        rows.push(FormRow::AdditionalInfo);
        for i in 0..self.draft.phones.len() {
            rows.push(FormRow::Phone(i, PhonePart::AreaCode));
            rows.push(FormRow::Phone(i, PhonePart::Number));
        }
        rows.push(FormRow::AddPhone);
        rows.push(FormRow::Submit);
        rows
    }

    pub fn selected_row(&self) -> FormRow {
        let rows = self.rows();
        rows[self.cursor.min(rows.len() - 1)]
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rows().len() {
            self.cursor += 1;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        match self.selected_row() {
            FormRow::Name => self.draft.name.push(c),
            FormRow::SocialName => self.draft.social_name.push(c),
            FormRow::Email => self.draft.email.push(c),
            FormRow::Cpf => {
                self.draft.cpf.push(c);
                self.draft.cpf = validate::format_cpf(&self.draft.cpf);
            }
            FormRow::Address(field) => self.draft.address.field_mut(field).push(c),
            FormRow::AdditionalInfo => self.draft.address.additional_info.push(c),
            FormRow::Phone(i, part) => {
                if let Some(phone) = self.draft.phones.get_mut(i) {
                    match part {
                        PhonePart::AreaCode => phone.area_code.push(c),
                        PhonePart::Number => phone.number.push(c),
                    }
                }
            }
            FormRow::AddPhone | FormRow::Submit => return,
        }
        self.clear_row_error();
    }

    pub fn backspace(&mut self) {
        match self.selected_row() {
            FormRow::Name => {
                self.draft.name.pop();
            }
            FormRow::SocialName => {
                self.draft.social_name.pop();
            }
            FormRow::Email => {
                self.draft.email.pop();
            }
            FormRow::Cpf => {
                // Pop through separators so backspace always removes a digit.
                loop {
                    match self.draft.cpf.pop() {
                        Some(c) if !c.is_ascii_digit() => continue,
                        _ => break,
                    }
                }
                self.draft.cpf = validate::format_cpf(&self.draft.cpf);
            }
            FormRow::Address(field) => {
                self.draft.address.field_mut(field).pop();
            }
            FormRow::AdditionalInfo => {
                self.draft.address.additional_info.pop();
            }
            FormRow::Phone(i, part) => {
                if let Some(phone) = self.draft.phones.get_mut(i) {
                    match part {
                        PhonePart::AreaCode => phone.area_code.pop(),
                        PhonePart::Number => phone.number.pop(),
                    };
                }
            }
            FormRow::AddPhone | FormRow::Submit => return,
        }
        self.clear_row_error();
    }

    /// Editing a field clears its error and any server banner.
    fn clear_row_error(&mut self) {
        self.server_error = None;
        if let Some(field) = field_for_row(self.selected_row()) {
            self.errors.remove(&field);
        }
    }

    pub fn add_phone(&mut self) {
        self.draft.phones.push(PhoneDraft::default());
        // land on the new phone's area code row
        let last = self.draft.phones.len() - 1;
        if let Some(pos) = self
            .rows()
            .iter()
            .position(|r| matches!(r, FormRow::Phone(i, PhonePart::AreaCode) if *i == last))
        {
            self.cursor = pos;
        }
    }

    /// Remove a phone entry. At least one must remain; error keys for later
    /// phones shift down to follow their entries.
    pub fn remove_phone(&mut self, index: usize) {
        if self.draft.phones.len() <= 1 || index >= self.draft.phones.len() {
            return;
        }
        self.draft.phones.remove(index);

        let mut shifted = BTreeMap::new();
        for (field, message) in std::mem::take(&mut self.errors) {
            match field {
                Field::Phone(i) if i == index => {}
                Field::Phone(i) if i > index => {
                    shifted.insert(Field::Phone(i - 1), message);
                }
                other => {
                    shifted.insert(other, message);
                }
            }
        }
        self.errors = shifted;

        let rows_len = self.rows().len();
        if self.cursor >= rows_len {
            self.cursor = rows_len - 1;
        }
    }

    /// Run client-side validation; true means the draft may be submitted.
    pub fn validate(&mut self) -> bool {
        self.errors = validate::validate(&self.draft);
        self.errors.is_empty()
    }

    /// Attach a failed submit to the form: duplicate email/CPF messages land
    /// on their field, anything else becomes a banner.
    pub fn apply_server_error(&mut self, error: &ApiError) {
        match error {
            ApiError::Server { message, .. } if message.contains("Email") => {
                self.errors
                    .insert(Field::Email, "Email already registered".to_string());
            }
            ApiError::Server { message, .. } if message.contains("CPF") => {
                self.errors
                    .insert(Field::Cpf, "CPF already registered".to_string());
            }
            other => {
                self.server_error = Some(format!("Could not save client: {other}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Phone;

    fn client_without_contact() -> Client {
        Client {
            id: 5,
            name: "Bia Lima".to_string(),
            social_name: None,
            email: None,
            cpf: "11122233344".to_string(),
            address: None,
            phones: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn new_draft_starts_with_one_empty_phone() {
        let draft = ClientDraft::new();
        assert_eq!(draft.phones.len(), 1);
        assert_eq!(draft.phones[0], PhoneDraft::default());
        assert!(draft.id.is_none());
    }

    #[test]
    fn from_client_substitutes_missing_address_and_phones() {
        let draft = ClientDraft::from_client(&client_without_contact());
        assert_eq!(draft.id, Some(5));
        assert_eq!(draft.address, AddressDraft::default());
        assert_eq!(draft.phones, vec![PhoneDraft::default()]);
        assert_eq!(draft.cpf, "111.222.333-44");
    }

    #[test]
    fn from_client_keeps_existing_phones() {
        let mut client = client_without_contact();
        client.phones = vec![Phone {
            id: Some(9),
            area_code: "11".to_string(),
            number: "987654321".to_string(),
        }];
        let draft = ClientDraft::from_client(&client);
        assert_eq!(draft.phones.len(), 1);
        assert_eq!(draft.phones[0].area_code, "11");
    }

    #[test]
    fn to_payload_normalizes() {
        let mut draft = ClientDraft::new();
        draft.name = "  Ana  ".to_string();
        draft.social_name = "   ".to_string();
        draft.email = "ana@example.com".to_string();
        draft.cpf = "123.456.789-01".to_string();
        draft.phones = vec![
            PhoneDraft {
                area_code: "11".to_string(),
                number: "987654321".to_string(),
            },
            PhoneDraft {
                area_code: "21".to_string(),
                number: String::new(),
            },
        ];
        let payload = draft.to_payload();
        assert_eq!(payload.name, "Ana");
        assert!(payload.social_name.is_none());
        assert_eq!(payload.email.as_deref(), Some("ana@example.com"));
        assert_eq!(payload.cpf, "12345678901");
        // the incomplete phone is dropped
        assert_eq!(payload.phones.len(), 1);
    }

    #[test]
    fn cpf_typing_formats_and_backspace_removes_digits() {
        let mut form = FormState::create();
        // move cursor to the CPF row
        while form.selected_row() != FormRow::Cpf {
            form.move_down();
        }
        for c in "12345678901".chars() {
            form.insert_char(c);
        }
        assert_eq!(form.draft.cpf, "123.456.789-01");

        form.backspace();
        assert_eq!(form.draft.cpf, "123.456.789-0");
        form.backspace();
        // the '-' separator is skipped along with the digit
        assert_eq!(form.draft.cpf, "123.456.789");
        form.backspace();
        assert_eq!(form.draft.cpf, "123.456.78");
    }

    #[test]
    fn typing_clears_the_fields_error() {
        let mut form = FormState::create();
        assert!(!form.validate());
        assert!(form.errors.contains_key(&Field::Name));

        assert_eq!(form.selected_row(), FormRow::Name);
        form.insert_char('A');
        assert!(!form.errors.contains_key(&Field::Name));
        // untouched fields keep their errors
        assert!(form.errors.contains_key(&Field::Cpf));
    }

    #[test]
    fn remove_phone_shifts_error_keys() {
        let mut form = FormState::create();
        form.add_phone();
        form.add_phone();
        assert_eq!(form.draft.phones.len(), 3);
        form.errors
            .insert(Field::Phone(1), "area code and number are required".into());
        form.errors
            .insert(Field::Phone(2), "area code and number are required".into());

        form.remove_phone(1);
        assert_eq!(form.draft.phones.len(), 2);
        assert!(form.errors.contains_key(&Field::Phone(1)));
        assert!(!form.errors.contains_key(&Field::Phone(2)));
    }

    #[test]
    fn last_phone_cannot_be_removed() {
        let mut form = FormState::create();
        form.remove_phone(0);
        assert_eq!(form.draft.phones.len(), 1);
    }

    #[test]
    fn add_phone_moves_cursor_to_new_entry() {
        let mut form = FormState::create();
        form.add_phone();
        assert_eq!(form.selected_row(), FormRow::Phone(1, PhonePart::AreaCode));
    }

    #[test]
    fn server_errors_map_to_fields_by_substring() {
        let mut form = FormState::create();
        form.apply_server_error(&ApiError::Server {
            status: 409,
            message: "Email already in use".to_string(),
        });
        assert!(form.errors.contains_key(&Field::Email));
        assert!(form.server_error.is_none());

        form.apply_server_error(&ApiError::Server {
            status: 409,
            message: "CPF duplicated".to_string(),
        });
        assert!(form.errors.contains_key(&Field::Cpf));

        form.apply_server_error(&ApiError::Transport("connection refused".to_string()));
        assert!(form.server_error.is_some());
    }
}
