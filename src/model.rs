//! Wire types for the customer registry API.
//!
//! Field names are English on the Rust side; serde renames map them onto the
//! API's Portuguese JSON keys. Response types (`Client`, `Address`, `Phone`)
//! carry server-assigned ids and timestamps; the `*Payload` types are the
//! request shape and never include them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client as returned by the registry API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nomeSocial", default, skip_serializing_if = "Option::is_none")]
    pub social_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub cpf: String,
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(rename = "telefones", default)]
    pub phones: Vec<Phone>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "rua")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "codigoPostal")]
    pub postal_code: String,
    #[serde(
        rename = "informacoesAdicionais",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "ddd")]
    pub area_code: String,
    #[serde(rename = "numero")]
    pub number: String,
}

/// Request body for `POST /clientes` and `PUT /clientes/{id}`.
///
/// Optional fields left empty in the form are omitted from the JSON rather
/// than sent as empty strings; `cpf` holds digits only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nomeSocial", skip_serializing_if = "Option::is_none")]
    pub social_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub cpf: String,
    #[serde(rename = "endereco")]
    pub address: AddressPayload,
    #[serde(rename = "telefones")]
    pub phones: Vec<PhonePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressPayload {
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "rua")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "codigoPostal")]
    pub postal_code: String,
    #[serde(rename = "informacoesAdicionais", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhonePayload {
    #[serde(rename = "ddd")]
    pub area_code: String,
    #[serde(rename = "numero")]
    pub number: String,
}
