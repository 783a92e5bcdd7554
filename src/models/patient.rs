use serde::{Deserialize, Serialize};

use crate::table::{Column, Columns, TableRow};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub state: String,
    pub city: String,
    pub avenue: String,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub original_name: String,
    pub url: String,
    pub filename: String,
    #[serde(rename = "_id")]
    pub id: String,
}

/// Patient record as returned by the API. Unknown fields (`__v`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub surname: String,
    #[serde(deserialize_with = "crate::serde_utils::string_or_number")]
    pub phone_number: String,
    pub address: Address,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

impl TableRow for Patient {
    fn row_id(&self) -> &str {
        &self.id
    }
}

/// Body of the add and edit patient endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPatient {
    pub name: String,
    pub surname: String,
    pub phone_number: u64,
    pub address: Address,
}

/// Data columns of the patients table. Keys double as the API's `sortBy`
/// values.
pub fn patient_columns() -> Columns<Patient> {
    let columns = vec![
        Column::new("Name", "name", |p: &Patient| p.name.clone()).sortable(),
        Column::new("Surname", "surname", |p: &Patient| p.surname.clone()).sortable(),
        Column::new("Phone number", "phoneNumber", |p: &Patient| {
            p.phone_number.clone()
        })
        .sortable(),
        Column::new("State", "address.state", |p: &Patient| {
            p.address.state.clone()
        })
        .sortable(),
        Column::new("City", "address.city", |p: &Patient| p.address.city.clone()).sortable(),
        Column::new("Avenue", "address.avenue", |p: &Patient| {
            p.address.avenue.clone()
        })
        .sortable(),
    ];
    Columns::new(columns).expect("patient column keys are unique")
}
