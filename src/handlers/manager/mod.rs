pub mod department_models;
pub mod issue;
pub mod lookups;

pub use department_models::{department_model_devices, department_models};
pub use issue::{issue_form, issue_post, revoke_post};
pub use lookups::{
    department_employees, device_inventory, employees_with_no_devices, model_devices,
};

use crate::database::catalog;
use crate::database::manager::DatabaseError;
use crate::database::models::ModelAllocation;

/// Model allocations across every department the manager runs, concatenated
/// in department order.
pub(crate) async fn allocations_for(
    departments: &[String],
) -> Result<Vec<ModelAllocation>, DatabaseError> {
    let mut allocations = Vec::new();
    for department in departments {
        allocations.extend(catalog::department_models(department).await?);
    }
    Ok(allocations)
}
