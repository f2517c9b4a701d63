//! Device queries: listings, single-device views, and the guarded
//! issue/revoke updates.

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Device, DeviceAssignmentFlag, DeviceDetail, DeviceEmployeeAssignment, IssuedDevice,
    RepairDetail, RepairSummary, UsedDevice,
};
use crate::database::models::repair::RepairDetailRow;
use crate::database::models::model::Model;

/// Devices the employee uses, via the many-to-many used-by relation.
pub async fn devices_used_by(emp_id: i32) -> Result<Vec<UsedDevice>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let devices = sqlx::query_as::<_, UsedDevice>(
        r#"
        SELECT d.deviceid AS device_id, d.manufacturer, d.modelnumber AS model_number
        FROM device d
             INNER JOIN deviceusedby du ON d.deviceid = du.deviceid
        WHERE du.empid = $1
        ORDER BY d.deviceid
        "#,
    )
    .bind(emp_id)
    .fetch_all(&pool)
    .await?;

    Ok(devices)
}

/// Devices currently issued to the employee.
pub async fn issued_devices(emp_id: i32) -> Result<Vec<IssuedDevice>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let devices = sqlx::query_as::<_, IssuedDevice>(
        r#"
        SELECT deviceid AS device_id, purchasedate AS purchase_date,
               manufacturer, modelnumber AS model_number
        FROM device
        WHERE issuedto = $1
        ORDER BY deviceid
        "#,
    )
    .bind(emp_id)
    .fetch_all(&pool)
    .await?;

    Ok(devices)
}

/// Full device table scan.
pub async fn all_devices() -> Result<Vec<Device>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let devices = sqlx::query_as::<_, Device>(
        r#"
        SELECT deviceid AS device_id, serialnumber AS serial_number,
               purchasedate AS purchase_date, purchasecost AS purchase_cost,
               manufacturer, modelnumber AS model_number, issuedto AS issued_to
        FROM device
        ORDER BY deviceid
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(devices)
}

/// Single device joined with its model row.
pub async fn device_detail(device_id: i32) -> Result<DeviceDetail, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let detail = sqlx::query_as::<_, DeviceDetail>(
        r#"
        SELECT d.deviceid AS device_id, d.serialnumber AS serial_number,
               d.purchasedate AS purchase_date, d.purchasecost AS purchase_cost,
               d.manufacturer, d.modelnumber AS model_number, d.issuedto AS issued_to
        FROM device d
             JOIN model m ON m.manufacturer = d.manufacturer
                         AND m.modelnumber = d.modelnumber
        WHERE d.deviceid = $1
        "#,
    )
    .bind(device_id)
    .fetch_optional(&pool)
    .await?;

    detail.ok_or_else(|| DatabaseError::NotFound(format!("device {}", device_id)))
}

/// Repair history for a device, including who performed each repair.
pub async fn device_repairs(device_id: i32) -> Result<Vec<RepairSummary>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let repairs = sqlx::query_as::<_, RepairSummary>(
        r#"
        SELECT r.repairid AS repair_id, r.faultreport AS fault_report,
               r.startdate AS start_date, r.enddate AS end_date, r.cost,
               s.servicename AS service_name
        FROM repair r
             INNER JOIN service s ON r.doneby = s.abn
        WHERE r.doneto = $1
        ORDER BY r.startdate
        "#,
    )
    .bind(device_id)
    .fetch_all(&pool)
    .await?;

    Ok(repairs)
}

/// Model information for a device.
pub async fn model_of_device(device_id: i32) -> Result<Model, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let model = sqlx::query_as::<_, Model>(
        r#"
        SELECT m.manufacturer, m.description, m.modelnumber AS model_number, m.weight
        FROM device d
             JOIN model m ON m.manufacturer = d.manufacturer
                         AND m.modelnumber = d.modelnumber
        WHERE d.deviceid = $1
        "#,
    )
    .bind(device_id)
    .fetch_optional(&pool)
    .await?;

    model.ok_or_else(|| DatabaseError::NotFound(format!("device {}", device_id)))
}

/// Single repair with its service provider.
pub async fn repair_detail(repair_id: i32) -> Result<RepairDetail, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let row = sqlx::query_as::<_, RepairDetailRow>(
        r#"
        SELECT r.repairid AS repair_id, r.faultreport AS fault_report,
               r.startdate AS start_date, r.enddate AS end_date, r.cost,
               s.abn, s.servicename AS service_name, s.email,
               r.doneto AS done_to
        FROM repair r
             JOIN service s ON r.doneby = s.abn
        WHERE r.repairid = $1
        "#,
    )
    .bind(repair_id)
    .fetch_optional(&pool)
    .await?;

    row.map(RepairDetail::from)
        .ok_or_else(|| DatabaseError::NotFound(format!("repair {}", repair_id)))
}

/// Every issued device of the given model, flagged by whether it is issued
/// to this employee. Unassigned devices do not appear; the manager reaches
/// those through [`unassigned_devices_for_model`].
pub async fn devices_with_assignment_flag(
    model_number: &str,
    manufacturer: &str,
    emp_id: i32,
) -> Result<Vec<DeviceAssignmentFlag>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let flags = sqlx::query_as::<_, DeviceAssignmentFlag>(
        r#"
        SELECT d.deviceid AS device_id,
               COALESCE(d.issuedto = $1, FALSE) AS issued_to_employee
        FROM device d
             INNER JOIN employee e ON e.empid = d.issuedto
        WHERE d.manufacturer = $2 AND d.modelnumber = $3
        ORDER BY d.deviceid
        "#,
    )
    .bind(emp_id)
    .bind(manufacturer)
    .bind(model_number)
    .fetch_all(&pool)
    .await?;

    Ok(flags)
}

/// Device ids of the given model with no current owner.
pub async fn unassigned_devices_for_model(
    model_number: &str,
    manufacturer: &str,
) -> Result<Vec<i32>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let devices = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT deviceid
        FROM device
        WHERE issuedto IS NULL AND modelnumber = $1 AND manufacturer = $2
        ORDER BY deviceid
        "#,
    )
    .bind(model_number)
    .bind(manufacturer)
    .fetch_all(&pool)
    .await?;

    Ok(devices)
}

/// Devices of a model and who holds them, restricted to one department.
pub async fn device_employee_assignments(
    manufacturer: &str,
    model_number: &str,
    department: &str,
) -> Result<Vec<DeviceEmployeeAssignment>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let assignments = sqlx::query_as::<_, DeviceEmployeeAssignment>(
        r#"
        SELECT d.deviceid AS device_id, d.serialnumber AS serial_number,
               e.empid AS emp_id, e.name
        FROM device d
             JOIN employee e ON d.issuedto = e.empid
             JOIN employeedepartments ed ON ed.empid = e.empid
        WHERE d.manufacturer = $1 AND d.modelnumber = $2 AND ed.department = $3
        ORDER BY d.deviceid
        "#,
    )
    .bind(manufacturer)
    .bind(model_number)
    .bind(department)
    .fetch_all(&pool)
    .await?;

    Ok(assignments)
}

/// Issue a device to an employee.
///
/// The availability check and the write are one conditional UPDATE, so two
/// managers racing for the same device produce exactly one winner; the
/// loser's statement affects zero rows and maps to a conflict.
pub async fn issue_device(emp_id: i32, device_id: i32) -> Result<(), DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query(
        "UPDATE device SET issuedto = $1 WHERE deviceid = $2 AND issuedto IS NULL",
    )
    .bind(emp_id)
    .bind(device_id)
    .execute(&pool)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(());
    }

    // Zero rows affected: either the device does not exist, or someone
    // already holds it. One diagnostic read picks the reason.
    let current = sqlx::query_scalar::<_, Option<i32>>(
        "SELECT issuedto FROM device WHERE deviceid = $1",
    )
    .bind(device_id)
    .fetch_optional(&pool)
    .await?;

    match current {
        None => Err(DatabaseError::NotFound(format!("device {}", device_id))),
        Some(_) => Err(DatabaseError::Conflict("device already issued".to_string())),
    }
}

/// Revoke a device from the employee it is issued to.
///
/// Same single-conditional-UPDATE shape as [`issue_device`]. On zero rows
/// affected the diagnostic read distinguishes "already revoked" (no holder)
/// from "not assigned to this employee" (held by someone else).
pub async fn revoke_device(emp_id: i32, device_id: i32) -> Result<(), DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let result = sqlx::query(
        "UPDATE device SET issuedto = NULL WHERE deviceid = $2 AND issuedto = $1",
    )
    .bind(emp_id)
    .bind(device_id)
    .execute(&pool)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(());
    }

    let current = sqlx::query_scalar::<_, Option<i32>>(
        "SELECT issuedto FROM device WHERE deviceid = $1",
    )
    .bind(device_id)
    .fetch_optional(&pool)
    .await?;

    match current {
        None => Err(DatabaseError::NotFound(format!("device {}", device_id))),
        Some(None) => Err(DatabaseError::Conflict("device already revoked".to_string())),
        Some(Some(_)) => Err(DatabaseError::Conflict(
            "device not assigned to employee".to_string(),
        )),
    }
}
