use shared::{
    domain::ViewId,
    protocol::{CreateViewParams, CreateViewRequest, View},
};
use tracing::debug;

pub const DEFAULT_VIEW_DATA: &str = "";

const DUPLICATE_NAME_SUFFIX: &str = " (copy)";

/// Name and description are not validated here.
pub struct ViewParamsBuilder;

impl ViewParamsBuilder {
    pub fn build(request: CreateViewRequest) -> CreateViewParams {
        Self::build_with_id(request, ViewId::generate())
    }

    pub fn build_with_id(request: CreateViewRequest, view_id: ViewId) -> CreateViewParams {
        debug!(
            view_id = %view_id,
            belong_to_id = %request.belong_to_id,
            "building create-view params"
        );
        CreateViewParams {
            belong_to_id: request.belong_to_id,
            name: request.name,
            description: request.description,
            thumbnail: request.thumbnail.unwrap_or_default(),
            view_type: request.view_type,
            view_data: DEFAULT_VIEW_DATA.to_string(),
            view_id,
        }
    }

    pub fn duplicate(view: &View, view_data: impl Into<String>) -> CreateViewParams {
        let view_id = ViewId::generate();
        debug!(source = %view.id, view_id = %view_id, "building duplicate-view params");
        CreateViewParams {
            belong_to_id: view.belong_to_id.clone(),
            name: format!("{}{DUPLICATE_NAME_SUFFIX}", view.name),
            description: view.description.clone(),
            thumbnail: String::new(),
            view_type: view.view_type,
            view_data: view_data.into(),
            view_id,
        }
    }
}

#[cfg(test)]
#[path = "../tests/view_params_tests.rs"]
mod tests;
