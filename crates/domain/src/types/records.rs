//! Contact, group and contact-detail records
//!
//! Mapping between DreamFactory table rows and domain records. Rows are
//! read leniently: a missing or non-string text column becomes an empty
//! string, but a row without its identifying columns is rejected.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A row of the `contact` table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactRecord {
    /// `None` until the server has assigned an id
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub notes: String,
    pub skype: String,
    pub twitter: String,
    pub image_url: Option<String>,
}

impl ContactRecord {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self { first_name: first_name.into(), last_name: last_name.into(), ..Self::default() }
    }

    /// Build from a table row; `None` if the row has no numeric `id`
    pub fn from_json(json: &Value) -> Option<Self> {
        let id = json.get("id")?.as_i64()?;
        Some(Self {
            id: Some(id),
            first_name: string_field(json, "first_name"),
            last_name: string_field(json, "last_name"),
            notes: string_field(json, "notes"),
            skype: string_field(json, "skype"),
            twitter: string_field(json, "twitter"),
            image_url: json.get("image_url").and_then(Value::as_str).map(str::to_string),
        })
    }

    /// Map every valid row, silently skipping rows without an id
    pub fn from_json_array(rows: &[Value]) -> Vec<Self> {
        rows.iter().filter_map(Self::from_json).collect()
    }

    /// Row representation; `id` is omitted for new records
    pub fn to_json(&self) -> Value {
        let mut row = Map::new();
        if let Some(id) = self.id {
            row.insert("id".into(), json!(id));
        }
        row.insert("first_name".into(), json!(self.first_name));
        row.insert("last_name".into(), json!(self.last_name));
        row.insert("notes".into(), json!(self.notes));
        row.insert("skype".into(), json!(self.skype));
        row.insert("twitter".into(), json!(self.twitter));
        if let Some(image_url) = &self.image_url {
            row.insert("image_url".into(), json!(image_url));
        }
        Value::Object(row)
    }

    /// "Last, First", used for display and sorting
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// A row of the `contact_group` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: i64,
    pub name: String,
}

impl GroupRecord {
    /// Build from a table row; both `id` and `name` are required
    pub fn from_json(json: &Value) -> Option<Self> {
        let id = json.get("id")?.as_i64()?;
        let name = json.get("name")?.as_str()?.to_string();
        Some(Self { id, name })
    }
}

/// A row of the `contact_info` table (phone, email and postal address)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetailRecord {
    pub id: Option<i64>,
    pub contact_id: i64,
    /// Upper-case label such as `WORK` or `HOME`
    pub info_type: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl ContactDetailRecord {
    /// A new, unsaved `WORK` detail for the given contact
    pub fn new(contact_id: i64) -> Self {
        Self {
            id: None,
            contact_id,
            info_type: "WORK".to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: String::new(),
        }
    }

    /// Build from a table row; `id` and `contact_id` are required
    pub fn from_json(json: &Value) -> Option<Self> {
        let id = json.get("id")?.as_i64()?;
        let contact_id = json.get("contact_id")?.as_i64()?;
        Some(Self {
            id: Some(id),
            contact_id,
            info_type: string_field(json, "info_type").to_uppercase(),
            phone: string_field(json, "phone"),
            email: string_field(json, "email"),
            address: string_field(json, "address"),
            city: string_field(json, "city"),
            state: string_field(json, "state"),
            zip: string_field(json, "zip"),
            country: string_field(json, "country"),
        })
    }

    pub fn to_json(&self) -> Value {
        let mut row = Map::new();
        if let Some(id) = self.id {
            row.insert("id".into(), json!(id));
        }
        row.insert("contact_id".into(), json!(self.contact_id));
        row.insert("info_type".into(), json!(self.info_type.to_lowercase()));
        row.insert("phone".into(), json!(self.phone));
        row.insert("email".into(), json!(self.email));
        row.insert("address".into(), json!(self.address));
        row.insert("city".into(), json!(self.city));
        row.insert("state".into(), json!(self.state));
        row.insert("zip".into(), json!(self.zip));
        row.insert("country".into(), json!(self.country));
        Value::Object(row)
    }

    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Multi-line display text, skipping empty parts
    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for part in [&self.phone, &self.email, &self.address] {
            if !part.is_empty() {
                lines.push(part.clone());
            }
        }
        if !self.city.is_empty() || !self.state.is_empty() || !self.zip.is_empty() {
            lines.push(format!("{}, {} {}", self.city, self.state, self.zip));
        }
        if !self.country.is_empty() {
            lines.push(self.country.clone());
        }
        lines.join("\n")
    }
}

fn string_field(json: &Value, key: &str) -> String {
    json.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}
