use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    binding::{FormModel, parse_field},
    validation::{ModelState, Validate, required, string_length},
};

pub const NAME_REQUIRED: &str = "Campo requerido";
pub const NAME_LENGTH: &str = "Nome da pessoa deve ter entre 5 e 45 caracteres";
const NAME_MIN: usize = 5;
const NAME_MAX: usize = 45;
const ADDRESS_LINE_MAX: usize = 30;

/// Form shape of a [`Person`](crate::models::Person).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonViewModel {
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

/// A submitted person exactly as the client sent it, before conversion.
///
/// Blank inputs arrive as `None`, whether they come from an untouched form
/// field or an empty CSV cell.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonForm {
    #[serde(deserialize_with = "empty_as_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub tax_id: Option<String>,
    pub name: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub street: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub number: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub complement: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub city: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub neighborhood: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub state: Option<String>,
}

impl FormModel for PersonViewModel {
    type Form = PersonForm;

    fn from_form(form: PersonForm, model_state: &mut ModelState) -> Self {
        Self {
            id: parse_field(model_state, "id", form.id),
            tax_id: form.tax_id,
            name: form.name,
            email: form.email,
            street: form.street,
            postal_code: parse_field(model_state, "postal_code", form.postal_code),
            number: parse_field(model_state, "number", form.number),
            complement: form.complement,
            city: form.city,
            neighborhood: form.neighborhood,
            state: form.state,
        }
    }
}

impl Validate for PersonViewModel {
    fn validate(&self) -> ModelState {
        let mut state = ModelState::new();

        if required(&mut state, "name", Some(self.name.as_str()), NAME_REQUIRED) {
            string_length(
                &mut state,
                "name",
                Some(self.name.as_str()),
                NAME_MIN,
                NAME_MAX,
                NAME_LENGTH,
            );
        }

        for (field, label, value) in [
            ("street", "Rua", &self.street),
            ("complement", "Complemento", &self.complement),
            ("neighborhood", "Bairro", &self.neighborhood),
        ] {
            string_length(
                &mut state,
                field,
                value.as_deref(),
                0,
                ADDRESS_LINE_MAX,
                &format!("{label} deve ter no máximo {ADDRESS_LINE_MAX} caracteres"),
            );
        }

        state
    }
}

/// Browsers submit untouched inputs as empty strings; treat those, and
/// whitespace-only values, as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}
