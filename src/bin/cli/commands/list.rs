use anyhow::{anyhow, bail, Result};
use serde::Serialize;

use tutorly_lib::api::query::{FILTER_ON, FILTER_QUERY, PAGE_NUMBER, PAGE_SIZE, SORT_BY};
use tutorly_lib::api::{ListSource, SortOrder};
use tutorly_lib::list::ListController;
use tutorly_lib::notice::Notice;
use tutorly_lib::params::{update_params, QueryParams};

use super::{with_child_resource, with_resource};
use crate::app::App;
use crate::render::table::{print_list, Tabular};
use crate::render::terminal::print_notice;
use crate::{OutputFormat, ResourceKind};

#[derive(Debug, Default)]
pub struct ListArgs {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub filter_on: Option<String>,
    pub filter_query: Option<String>,
    pub sort: Option<String>,
    pub params: Option<String>,
    pub parent: Option<String>,
}

/// URL state for the list: `--params` first, then the individual flags
fn url_state(args: &ListArgs) -> Result<QueryParams> {
    let start = QueryParams::parse(args.params.as_deref().unwrap_or(""));

    let mut updates: Vec<(&str, String)> = Vec::new();
    if let Some(page) = args.page {
        updates.push((PAGE_NUMBER, page.to_string()));
    }
    if let Some(size) = args.size {
        updates.push((PAGE_SIZE, size.to_string()));
    }
    if let Some(field) = &args.filter_on {
        updates.push((FILTER_ON, field.clone()));
    }
    if let Some(query) = &args.filter_query {
        updates.push((FILTER_QUERY, query.clone()));
    }
    if let Some(sort) = &args.sort {
        let order: SortOrder = sort.parse().map_err(|e: String| anyhow!(e))?;
        updates.push((SORT_BY, order.to_string()));
    }

    Ok(update_params(&start, updates))
}

/// Parent-scoped lists already use the one filter the API takes
fn check_parent_filter(params: &QueryParams, parent: Option<&str>) -> Result<()> {
    let filtered = [FILTER_ON, FILTER_QUERY]
        .iter()
        .any(|key| params.get(key).is_some_and(|v| !v.is_empty()));
    if parent.is_some() && filtered {
        bail!("--parent cannot be combined with a filter; list without --parent to filter");
    }
    Ok(())
}

pub async fn run(
    app: &App,
    kind: ResourceKind,
    args: ListArgs,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let params = url_state(&args)?;
    check_parent_filter(&params, args.parent.as_deref())?;
    let page_size = app.config.default_page_size;
    log::debug!("Listing {} with ?{}", kind, params);

    match args.parent {
        Some(parent) => with_child_resource!(kind, R => {
            let source = app.client::<R>().for_parent(parent);
            show(source, params, page_size, format, use_color).await
        }, else => bail!("{} do not belong to a parent; drop --parent", kind)),
        None => with_resource!(kind, R => {
            show(app.client::<R>(), params, page_size, format, use_color).await
        }),
    }
}

async fn show<S>(source: S, params: QueryParams, page_size: u32, format: &OutputFormat, use_color: bool) -> Result<()>
where
    S: ListSource,
    S::Item: Tabular + Serialize,
{
    let mut controller = ListController::with_default_page_size(source, params, page_size);
    if let Err(e) = controller.refresh().await {
        print_notice(&Notice::from_api_error(&e), use_color);
        return Err(e.into());
    }

    let view = controller.view();
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "params": controller.params().to_query_string(),
                "items": view.items,
                "pagination": view.pagination,
                "emptyMessage": view.empty_message,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => print_list(&view, use_color),
    }
    Ok(())
}
