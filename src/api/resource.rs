//! Generic paginated resource client
//!
//! Every entity exposes the same five calls. A [`Resource`] describes the
//! path and types once, and [`ResourceClient`] does the rest.

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::client::ApiClient;
use super::envelope::Page;
use super::error::ApiError;
use super::query::ListQuery;
use crate::models::validation::Validate;

/// Description of one REST resource
pub trait Resource: Send + Sync + 'static {
    /// Path below `/api/`, e.g. `lessons`
    const PATH: &'static str;
    /// Human-readable singular name, e.g. `Lesson`
    const LABEL: &'static str;

    type Entity: DeserializeOwned + Serialize + Clone + Debug + Send + Sync;
    /// Create/update payload, also the state of an edit form
    type Form: DeserializeOwned + Serialize + Clone + Debug + Default + Validate + Send + Sync;

    fn id(entity: &Self::Entity) -> &str;

    /// Populate an edit form from a fetched entity
    fn to_form(entity: &Self::Entity) -> Self::Form;

    /// Where to go after a successful save
    fn destination(_form: &Self::Form) -> String {
        format!("/{}", Self::PATH)
    }
}

/// A resource that belongs to a parent through a foreign key
pub trait ChildResource: Resource {
    /// Foreign-key column, e.g. `lessonId`
    const PARENT_FIELD: &'static str;
    /// Path of the parent resource, e.g. `lessons`
    const PARENT_PATH: &'static str;

    fn parent_id(entity: &Self::Entity) -> &str;

    fn form_parent_id(form: &Self::Form) -> &str;

    /// `/parent/{parentId}`, falling back to the parent list when unset
    fn parent_destination(form: &Self::Form) -> String {
        let parent_id = Self::form_parent_id(form);
        if parent_id.is_empty() {
            format!("/{}", Self::PARENT_PATH)
        } else {
            format!("/{}/{}", Self::PARENT_PATH, parent_id)
        }
    }
}

/// Anything a list view can page through
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Clone + Send + Sync;

    async fn list(&self, query: &ListQuery) -> Result<Page<Self::Item>, ApiError>;
}

/// Single-entity operations used by forms and detail views
#[async_trait]
pub trait EntityApi<R: Resource>: Send + Sync {
    async fn get(&self, id: &str) -> Result<R::Entity, ApiError>;

    async fn create(&self, form: &R::Form) -> Result<R::Entity, ApiError>;

    async fn update(&self, id: &str, form: &R::Form) -> Result<R::Entity, ApiError>;

    async fn delete(&self, id: &str) -> Result<Option<String>, ApiError>;
}

/// REST client for one resource type
pub struct ResourceClient<R: Resource> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self::new(self.api.clone())
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", R::PATH, urlencoding::encode(id))
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<R::Entity>, ApiError> {
        self.api.get_json(R::PATH, &query.to_pairs()).await
    }

    pub async fn get(&self, id: &str) -> Result<R::Entity, ApiError> {
        self.api.get_json(&Self::item_path(id), &[] as &[(&str, &str)]).await
    }

    pub async fn create(&self, form: &R::Form) -> Result<R::Entity, ApiError> {
        let entity: R::Entity = self.api.post_json(R::PATH, form).await?;
        log::info!("Created {} {}", R::LABEL, R::id(&entity));
        Ok(entity)
    }

    pub async fn update(&self, id: &str, form: &R::Form) -> Result<R::Entity, ApiError> {
        let entity = self.api.put_json(&Self::item_path(id), form).await?;
        log::info!("Updated {} {}", R::LABEL, id);
        Ok(entity)
    }

    pub async fn delete(&self, id: &str) -> Result<Option<String>, ApiError> {
        let message = self.api.delete(&Self::item_path(id)).await?;
        log::info!("Deleted {} {}", R::LABEL, id);
        Ok(message)
    }
}

impl<R: ChildResource> ResourceClient<R> {
    /// List children of one parent: filtered on the server by the foreign
    /// key, then again locally in case the server ignores the filter
    ///
    /// The API takes a single filter, so a query that already filters on
    /// anything other than this parent fails with
    /// [`ApiError::ParentFilterConflict`].
    pub async fn list_for_parent(&self, parent_id: &str, query: &ListQuery) -> Result<Page<R::Entity>, ApiError> {
        check_parent_filter::<R>(parent_id, query)?;
        let query = query.clone().filtered(R::PARENT_FIELD, parent_id);
        let mut page = self.list(&query).await?;
        page.retain(|e| R::parent_id(e) == parent_id);
        Ok(page)
    }

    /// A list source scoped to one parent
    pub fn for_parent(&self, parent_id: impl Into<String>) -> ParentScoped<R> {
        ParentScoped {
            client: self.clone(),
            parent_id: parent_id.into(),
        }
    }
}

fn check_parent_filter<R: ChildResource>(parent_id: &str, query: &ListQuery) -> Result<(), ApiError> {
    let same_field = query.filter_on.as_deref().map_or(true, |f| f == R::PARENT_FIELD);
    let same_value = query.filter_query.as_deref().map_or(true, |q| q == parent_id);
    if same_field && same_value {
        return Ok(());
    }
    Err(ApiError::ParentFilterConflict {
        field: query
            .filter_on
            .clone()
            .unwrap_or_else(|| R::PARENT_FIELD.to_string()),
    })
}

#[async_trait]
impl<R: Resource> ListSource for ResourceClient<R> {
    type Item = R::Entity;

    async fn list(&self, query: &ListQuery) -> Result<Page<Self::Item>, ApiError> {
        ResourceClient::list(self, query).await
    }
}

#[async_trait]
impl<R: Resource> EntityApi<R> for ResourceClient<R> {
    async fn get(&self, id: &str) -> Result<R::Entity, ApiError> {
        ResourceClient::get(self, id).await
    }

    async fn create(&self, form: &R::Form) -> Result<R::Entity, ApiError> {
        ResourceClient::create(self, form).await
    }

    async fn update(&self, id: &str, form: &R::Form) -> Result<R::Entity, ApiError> {
        ResourceClient::update(self, id, form).await
    }

    async fn delete(&self, id: &str) -> Result<Option<String>, ApiError> {
        ResourceClient::delete(self, id).await
    }
}

/// Children of one parent, as a list source
pub struct ParentScoped<R: ChildResource> {
    client: ResourceClient<R>,
    parent_id: String,
}

impl<R: ChildResource> ParentScoped<R> {
    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }
}

#[async_trait]
impl<R: ChildResource> ListSource for ParentScoped<R> {
    type Item = R::Entity;

    async fn list(&self, query: &ListQuery) -> Result<Page<Self::Item>, ApiError> {
        self.client.list_for_parent(&self.parent_id, query).await
    }
}
