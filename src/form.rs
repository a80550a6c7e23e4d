//! Entity form controller
//!
//! Opening with an id loads the entity and switches to update mode; without
//! one the form starts from defaults in create mode. Submitting validates
//! locally first, and only a valid form reaches the API.

use std::marker::PhantomData;

use crate::api::{EntityApi, Resource};
use crate::models::{FieldError, Validate};
use crate::notice::Notice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(String),
}

/// Result of opening a form
pub enum FormOpen<R: Resource, A: EntityApi<R>> {
    Ready(FormController<R, A>),
    /// Loading the entity failed; leave for `to` instead of showing a form
    Redirect { to: String, notice: Notice },
}

impl<R: Resource, A: EntityApi<R>> FormOpen<R, A> {
    pub fn ready(self) -> Option<FormController<R, A>> {
        match self {
            FormOpen::Ready(form) => Some(form),
            FormOpen::Redirect { .. } => None,
        }
    }
}

/// Result of submitting a form
#[derive(Debug)]
pub enum SubmitOutcome<E> {
    /// Local validation failed; nothing was sent
    Invalid { errors: Vec<FieldError>, notice: Notice },
    /// Saved; navigate to `redirect`
    Saved { entity: E, notice: Notice, redirect: String },
    /// The server refused or could not be reached; stay on the form
    Failed { notice: Notice },
}

impl<E> SubmitOutcome<E> {
    pub fn notice(&self) -> &Notice {
        match self {
            SubmitOutcome::Invalid { notice, .. }
            | SubmitOutcome::Saved { notice, .. }
            | SubmitOutcome::Failed { notice } => notice,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }
}

pub struct FormController<R: Resource, A: EntityApi<R>> {
    api: A,
    mode: FormMode,
    form: R::Form,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, A: EntityApi<R>> FormController<R, A> {
    /// Open for `id` (update) or blank (create)
    pub async fn open(api: A, id: Option<&str>) -> FormOpen<R, A> {
        let id = match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => return FormOpen::Ready(Self::create(api, R::Form::default())),
        };

        match api.get(id).await {
            Ok(entity) => FormOpen::Ready(Self {
                form: R::to_form(&entity),
                mode: FormMode::Update(id.to_string()),
                api,
                _resource: PhantomData,
            }),
            Err(e) => {
                log::warn!("Could not load {} {}: {}", R::LABEL, id, e);
                FormOpen::Redirect {
                    to: format!("/{}", R::PATH),
                    notice: Notice::from_api_error(&e),
                }
            }
        }
    }

    /// Create mode with a pre-filled form (e.g. the parent id of a child)
    pub fn create(api: A, form: R::Form) -> Self {
        Self {
            api,
            mode: FormMode::Create,
            form,
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn form(&self) -> &R::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut R::Form {
        &mut self.form
    }

    pub fn set_form(&mut self, form: R::Form) {
        self.form = form;
    }

    pub fn validate(&self) -> Vec<FieldError> {
        self.form.validate()
    }

    pub async fn submit(&mut self) -> SubmitOutcome<R::Entity> {
        let errors = self.form.validate();
        if let Some(first) = errors.first() {
            let notice = if errors.len() == 1 {
                Notice::error(first.message.clone())
            } else {
                Notice::error(format!("{} (and {} more)", first.message, errors.len() - 1))
            };
            log::debug!("{} form invalid: {} field error(s)", R::LABEL, errors.len());
            return SubmitOutcome::Invalid { errors, notice };
        }

        let (result, verb) = match &self.mode {
            FormMode::Create => (self.api.create(&self.form).await, "created"),
            FormMode::Update(id) => (self.api.update(id, &self.form).await, "updated"),
        };

        match result {
            Ok(entity) => SubmitOutcome::Saved {
                redirect: R::destination(&self.form),
                notice: Notice::success(format!("{} {} successfully", R::LABEL, verb)),
                entity,
            },
            Err(e) => {
                log::warn!("Saving {} failed: {}", R::LABEL, e);
                SubmitOutcome::Failed {
                    notice: Notice::from_api_error(&e),
                }
            }
        }
    }
}
