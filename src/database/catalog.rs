//! Model catalog queries: listings, department allocations, and the
//! description / weight-bucket searches.

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{EmployeeDeviceCount, Model, ModelAllocation};

/// Full model table scan.
pub async fn all_models() -> Result<Vec<Model>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let models = sqlx::query_as::<_, Model>(
        r#"
        SELECT manufacturer, description, modelnumber AS model_number, weight
        FROM model
        ORDER BY manufacturer, modelnumber
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(models)
}

/// Model allocations for one department.
pub async fn department_models(department: &str) -> Result<Vec<ModelAllocation>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let allocations = sqlx::query_as::<_, ModelAllocation>(
        r#"
        SELECT m.manufacturer, m.modelnumber AS model_number, ma.maxnumber AS max_number
        FROM department d
             JOIN modelallocations ma ON d.name = ma.department
             JOIN model m ON m.modelnumber = ma.modelnumber
                         AND m.manufacturer = ma.manufacturer
        WHERE d.name = $1
        ORDER BY m.manufacturer, m.modelnumber
        "#,
    )
    .bind(department)
    .fetch_all(&pool)
    .await?;

    Ok(allocations)
}

/// Per-employee count of issued devices of a model within a department.
/// An empty grouping means nothing matches; surfaced as NotFound so the
/// caller renders "no model/manufacturer matching department".
pub async fn employee_device_counts(
    department: &str,
    manufacturer: &str,
    model_number: &str,
) -> Result<Vec<EmployeeDeviceCount>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let counts = sqlx::query_as::<_, EmployeeDeviceCount>(
        r#"
        SELECT e.empid AS emp_id, e.name, COUNT(d.deviceid) AS device_count
        FROM employee e
             JOIN device d ON e.empid = d.issuedto
             JOIN employeedepartments ed ON ed.empid = e.empid
        WHERE ed.department = $1 AND d.modelnumber = $2 AND d.manufacturer = $3
        GROUP BY e.empid, e.name
        ORDER BY e.empid
        "#,
    )
    .bind(department)
    .bind(model_number)
    .bind(manufacturer)
    .fetch_all(&pool)
    .await?;

    if counts.is_empty() {
        return Err(DatabaseError::NotFound(format!(
            "no {} {} devices issued in {}",
            manufacturer, model_number, department
        )));
    }

    Ok(counts)
}

/// Case-insensitive substring search over model descriptions. An empty
/// result is a valid answer, not an error.
pub async fn search_models(description: &str) -> Result<Vec<Model>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let pattern = format!("%{}%", description);
    let models = sqlx::query_as::<_, Model>(
        r#"
        SELECT manufacturer, description, modelnumber AS model_number, weight
        FROM model
        WHERE upper(description) LIKE upper($1)
        ORDER BY manufacturer
        "#,
    )
    .bind(pattern)
    .fetch_all(&pool)
    .await?;

    Ok(models)
}

/// Inclusive weight range covered by one bucket: bucket 0 spans [0, 20],
/// every other bucket w spans [w, w + 19].
fn bucket_range(weight: i32) -> (i32, i32) {
    if weight == 0 {
        (0, 20)
    } else {
        (weight, weight + 19)
    }
}

/// Weight-bucket filter over the description search: one range query per
/// requested bucket, results concatenated in bucket order. Overlapping
/// buckets yield duplicate rows; that is the legacy contract and is kept.
pub async fn search_models_by_weight(
    weights: &[i32],
    description: &str,
) -> Result<Vec<Model>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let pattern = format!("%{}%", description);
    let mut models = Vec::new();

    for &weight in weights {
        let (low, high) = bucket_range(weight);
        let mut bucket = sqlx::query_as::<_, Model>(
            r#"
            SELECT manufacturer, description, modelnumber AS model_number, weight
            FROM model
            WHERE weight BETWEEN $1 AND $2 AND upper(description) LIKE upper($3)
            ORDER BY manufacturer
            "#,
        )
        .bind(low)
        .bind(high)
        .bind(&pattern)
        .fetch_all(&pool)
        .await?;

        models.append(&mut bucket);
    }

    Ok(models)
}
