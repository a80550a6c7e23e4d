//! REST API access
//!
//! - [`ApiClient`]: shared HTTP client with bearer auth and envelope unwrapping
//! - [`ResourceClient`]: list/get/create/update/delete for any [`Resource`]
//! - [`ListQuery`]: pagination, filter and sort parameters

pub mod client;
pub mod envelope;
pub mod error;
pub mod query;
pub mod resource;

pub use client::ApiClient;
pub use envelope::{Envelope, Page, PageMeta};
pub use error::{ApiError, ErrorKind, FALLBACK_MESSAGE};
pub use query::{ListQuery, SortOrder};
pub use resource::{ChildResource, EntityApi, ListSource, ParentScoped, Resource, ResourceClient};

#[cfg(test)]
pub(crate) mod test_support {
    use super::ApiClient;
    use crate::auth::SharedSession;
    use crate::config::Config;

    /// Serve `router` on an ephemeral local port, returning its base URL
    pub async fn serve(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    pub fn client(base_url: &str, session: SharedSession) -> ApiClient {
        let config = Config {
            api_base_url: base_url.to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 5,
            ..Config::default()
        };
        ApiClient::new(&config, session).unwrap()
    }
}
