use anyhow::Result;

use tutorly_lib::api::Resource;
use tutorly_lib::notice::Notice;

use super::with_resource;
use crate::app::App;
use crate::render::terminal::print_notice;
use crate::ResourceKind;

pub async fn run(app: &App, kind: ResourceKind, id: &str, use_color: bool) -> Result<()> {
    with_resource!(kind, R => delete::<R>(app, id, use_color).await)
}

async fn delete<R: Resource>(app: &App, id: &str, use_color: bool) -> Result<()> {
    match app.client::<R>().delete(id).await {
        Ok(message) => {
            let message = message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("{} deleted successfully", R::LABEL));
            print_notice(&Notice::success(message), use_color);
            Ok(())
        }
        Err(e) => {
            print_notice(&Notice::from_api_error(&e), use_color);
            Err(e.into())
        }
    }
}
