use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitForm {
    pub name: String,
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
}

impl Validate for UnitForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .required("name", "Name", &self.name)
            .required("level", "Level", &self.level)
            .finish()
    }
}

pub struct Units;

impl Resource for Units {
    const PATH: &'static str = "units";
    const LABEL: &'static str = "Unit";

    type Entity = Unit;
    type Form = UnitForm;

    fn id(entity: &Unit) -> &str {
        &entity.id
    }

    fn to_form(entity: &Unit) -> UnitForm {
        UnitForm {
            name: entity.name.clone(),
            level: entity.level.clone(),
            description: entity.description.clone(),
            status: entity.status,
        }
    }
}
