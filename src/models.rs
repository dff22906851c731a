use serde::{Deserialize, Serialize};

/// A registered collector as stored in the `people` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    pub id: i64,
    pub tax_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub street: Option<String>,
    pub postal_code: i32,
    pub number: i32,
    pub complement: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
    pub state: Option<String>,
}

impl Person {
    pub fn new(name: &str, postal_code: i32) -> Self {
        Self {
            name: name.to_string(),
            postal_code,
            ..Default::default()
        }
    }
}
