//! Custom request extractors.

mod organization;
mod params;
mod validated_json;

pub use organization::{selected_organization, MaybeOrgContext, OrgContext};
pub use params::{Path, Query};
pub use validated_json::{OptionalValidatedJson, ValidatedJson};
