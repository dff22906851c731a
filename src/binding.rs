//! Form model binding.
//!
//! A form body is first decoded into a raw shape made of strings, then
//! converted into the view-model. Conversion failures are recorded in the
//! [`ModelState`] next to validation failures instead of rejecting the request.

use std::str::FromStr;

use axum::{
    Form,
    extract::{FromRequest, Request, rejection::FormRejection},
};
use serde::de::DeserializeOwned;

use crate::validation::{ModelState, Validate};

/// A view-model that can be bound from a raw submitted form.
pub trait FormModel: Validate + Sized {
    type Form: DeserializeOwned;

    /// Converts the raw form, recording a model error for every field that
    /// cannot be converted and leaving that field at its default.
    fn from_form(form: Self::Form, model_state: &mut ModelState) -> Self;
}

/// Parses a submitted value, recording a model error when it is not a `T`.
/// Absent values become `T::default()`.
pub fn parse_field<T>(model_state: &mut ModelState, field: &str, raw: Option<String>) -> T
where
    T: FromStr + Default,
{
    let Some(raw) = raw else {
        return T::default();
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            model_state.add_model_error(field, format!("O valor '{raw}' não é válido para {field}"));
            T::default()
        }
    }
}

/// A form body decoded into `T` together with the result of validating it.
///
/// Validation failures do not reject the request; the handler decides what to
/// do with an invalid [`ModelState`].
#[derive(Debug, Clone)]
pub struct BoundForm<T> {
    pub model: T,
    pub model_state: ModelState,
}

impl<T: Validate> BoundForm<T> {
    pub fn bind(model: T) -> Self {
        let model_state = model.validate();
        Self { model, model_state }
    }
}

impl<T: FormModel> BoundForm<T> {
    pub fn from_form(form: T::Form) -> Self {
        let mut model_state = ModelState::new();
        let model = T::from_form(form, &mut model_state);
        model_state.merge(model.validate());
        Self { model, model_state }
    }
}

impl<T, S> FromRequest<S> for BoundForm<T>
where
    T: FormModel,
    S: Send + Sync,
{
    type Rejection = FormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(form) = Form::<T::Form>::from_request(req, state).await?;
        Ok(Self::from_form(form))
    }
}
