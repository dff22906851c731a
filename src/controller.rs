//! Controller actions.
//!
//! Actions return an [`ActionResult`] describing what to send back (a view
//! with its model, a redirect, or not-found) and leave HTTP encoding to the
//! router. That keeps them callable directly from tests.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    binding::BoundForm, error::Result, models::Person, service::PersonService,
    view_models::PersonViewModel,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    View(ViewResult),
    RedirectToAction(RedirectToAction),
    NotFound,
}

impl ActionResult {
    fn view(view_name: &'static str, model: ViewData) -> Self {
        ActionResult::View(ViewResult { view_name, model })
    }

    /// Redirect to another action of the same controller.
    fn redirect(action_name: &'static str) -> Self {
        ActionResult::RedirectToAction(RedirectToAction {
            action_name,
            controller_name: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult {
    pub view_name: &'static str,
    pub model: ViewData,
}

/// The model handed to a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewData {
    Empty,
    Person(PersonViewModel),
    People(Vec<PersonViewModel>),
    Error(ErrorViewModel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectToAction {
    pub action_name: &'static str,
    /// `None` targets the controller that produced the redirect.
    pub controller_name: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorViewModel {
    pub request_id: Option<String>,
}

/// Landing and error pages.
pub struct HomeController;

impl HomeController {
    pub const NAME: &'static str = "Home";

    pub fn index(&self) -> ActionResult {
        ActionResult::view("Index", ViewData::Empty)
    }

    pub fn error(&self, request_id: Option<String>) -> ActionResult {
        ActionResult::view("Error", ViewData::Error(ErrorViewModel { request_id }))
    }
}

/// Registration of collectors.
pub struct PersonController {
    service: Arc<dyn PersonService>,
}

impl PersonController {
    pub const NAME: &'static str = "Person";

    pub fn new(service: Arc<dyn PersonService>) -> Self {
        Self { service }
    }

    pub async fn index(&self) -> Result<ActionResult> {
        let people = self
            .service
            .get_all()
            .await?
            .into_iter()
            .map(PersonViewModel::from)
            .collect();

        Ok(ActionResult::view("Index", ViewData::People(people)))
    }

    pub async fn details(&self, id: i64) -> Result<ActionResult> {
        self.person_view("Details", id).await
    }

    pub fn create_form(&self) -> ActionResult {
        ActionResult::view("Create", ViewData::Person(PersonViewModel::default()))
    }

    /// Inserts the submitted person when the form is valid. Either way the
    /// client is sent back to the listing.
    pub async fn create(&self, form: BoundForm<PersonViewModel>) -> Result<ActionResult> {
        if form.model_state.is_valid() {
            self.service.insert(Person::from(form.model)).await?;
        } else {
            tracing::warn!(
                error_count = form.model_state.error_count(),
                errors = ?form.model_state.errors(),
                "Discarding invalid create submission"
            );
        }

        Ok(ActionResult::redirect("Index"))
    }

    pub async fn edit_form(&self, id: i64) -> Result<ActionResult> {
        self.person_view("Edit", id).await
    }

    /// The id in the route wins over any id in the submitted form.
    pub async fn edit(&self, id: i64, form: BoundForm<PersonViewModel>) -> Result<ActionResult> {
        if form.model_state.is_valid() {
            let mut person = Person::from(form.model);
            person.id = id;
            self.service.edit(person).await?;
        } else {
            tracing::warn!(
                id,
                error_count = form.model_state.error_count(),
                errors = ?form.model_state.errors(),
                "Discarding invalid edit submission"
            );
        }

        Ok(ActionResult::redirect("Index"))
    }

    /// Confirmation page for a deletion.
    pub async fn delete_form(&self, id: i64) -> Result<ActionResult> {
        self.person_view("Delete", id).await
    }

    pub async fn delete(&self, id: i64) -> Result<ActionResult> {
        self.service.remove(id).await?;
        Ok(ActionResult::redirect("Index"))
    }

    async fn person_view(&self, view_name: &'static str, id: i64) -> Result<ActionResult> {
        Ok(match self.service.get(id).await? {
            Some(person) => {
                ActionResult::view(view_name, ViewData::Person(PersonViewModel::from(person)))
            }
            None => ActionResult::NotFound,
        })
    }
}
