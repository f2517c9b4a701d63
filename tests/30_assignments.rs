//! Data-path tests for the guarded issue/revoke updates and the detail
//! edits. These seed their own rows against the configured DATABASE_URL
//! and skip themselves when no database is reachable, in line with the
//! rest of the suite tolerating a missing database.

use anyhow::Result;
use sqlx::PgPool;

use device_desk_api::database::manager::{DatabaseError, DatabaseManager};
use device_desk_api::database::models::EmployeeUpdate;
use device_desk_api::database::{devices, employees};

// Fixture ids chosen well clear of any seeded data
const MANUFACTURER: &str = "zz-testco";
const MODEL_NUMBER: &str = "dd-assign-1";
const DEPARTMENT: &str = "zz-assignments";
const HOLDER: i32 = 960_001;
const OTHER: i32 = 960_002;
const PHONE_EMP: i32 = 960_011;
const DEVICE: i32 = 960_001;
const MISSING_DEVICE: i32 = 960_999;

// The library caches its pool in a process-wide static, so every test in
// this binary must drive it from the same runtime: a pool created on one
// `#[tokio::test]` runtime is unusable once that runtime is dropped.
fn rt() -> &'static tokio::runtime::Runtime {
    static RT: once_cell::sync::Lazy<tokio::runtime::Runtime> =
        once_cell::sync::Lazy::new(|| {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("test runtime")
        });
    &RT
}

async fn test_pool() -> Option<PgPool> {
    let _ = dotenvy::dotenv();
    match DatabaseManager::pool().await {
        Ok(pool) => Some(pool),
        Err(e) => {
            eprintln!("skipping data-path test, database unavailable: {}", e);
            None
        }
    }
}

async fn remove_assignment_fixture(pool: &PgPool) -> Result<()> {
    sqlx::query("DELETE FROM device WHERE deviceid = $1")
        .bind(DEVICE)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM model WHERE manufacturer = $1 AND modelnumber = $2")
        .bind(MANUFACTURER)
        .bind(MODEL_NUMBER)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM employeedepartments WHERE department = $1")
        .bind(DEPARTMENT)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM department WHERE name = $1")
        .bind(DEPARTMENT)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM employee WHERE empid IN ($1, $2)")
        .bind(HOLDER)
        .bind(OTHER)
        .execute(pool)
        .await?;
    Ok(())
}

async fn seed_assignment_fixture(pool: &PgPool) -> Result<()> {
    remove_assignment_fixture(pool).await?;

    for (emp_id, name) in [(HOLDER, "Test Holder"), (OTHER, "Test Bystander")] {
        sqlx::query(
            "INSERT INTO employee (empid, name, homeaddress, dateofbirth, password)
             VALUES ($1, $2, '1 Test St', '1990-01-01', 'fixture-password')",
        )
        .bind(emp_id)
        .bind(name)
        .execute(pool)
        .await?;
    }
    sqlx::query("INSERT INTO department (name, manager) VALUES ($1, $2)")
        .bind(DEPARTMENT)
        .bind(HOLDER)
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO employeedepartments (empid, department) VALUES ($1, $2)")
        .bind(HOLDER)
        .bind(DEPARTMENT)
        .execute(pool)
        .await?;
    sqlx::query(
        "INSERT INTO model (manufacturer, modelnumber, description, weight)
         VALUES ($1, $2, 'fixture model', 10)",
    )
    .bind(MANUFACTURER)
    .bind(MODEL_NUMBER)
    .execute(pool)
    .await?;
    sqlx::query(
        "INSERT INTO device (deviceid, serialnumber, purchasedate, purchasecost,
                             manufacturer, modelnumber, issuedto)
         VALUES ($1, 'SN-960001', '2024-01-01', 100.00, $2, $3, NULL)",
    )
    .bind(DEVICE)
    .bind(MANUFACTURER)
    .bind(MODEL_NUMBER)
    .execute(pool)
    .await?;

    Ok(())
}

fn conflict_reason(result: Result<(), DatabaseError>) -> String {
    match result {
        Err(DatabaseError::Conflict(reason)) => reason,
        other => panic!("expected a conflict, got {:?}", other),
    }
}

#[test]
fn issue_and_revoke_keep_a_single_holder() -> Result<()> {
    rt().block_on(issue_and_revoke_keep_a_single_holder_inner())
}

async fn issue_and_revoke_keep_a_single_holder_inner() -> Result<()> {
    let Some(pool) = test_pool().await else {
        return Ok(());
    };
    seed_assignment_fixture(&pool).await?;

    devices::issue_device(HOLDER, DEVICE).await?;

    let issued = devices::issued_devices(HOLDER).await?;
    assert!(issued.iter().any(|d| d.device_id == DEVICE));

    // The assignment-flag view reflects who holds the device
    let flags = devices::devices_with_assignment_flag(MODEL_NUMBER, MANUFACTURER, HOLDER).await?;
    assert!(flags
        .iter()
        .any(|f| f.device_id == DEVICE && f.issued_to_employee));
    let flags = devices::devices_with_assignment_flag(MODEL_NUMBER, MANUFACTURER, OTHER).await?;
    assert!(flags
        .iter()
        .any(|f| f.device_id == DEVICE && !f.issued_to_employee));

    // So does the per-department holder listing
    let holders =
        devices::device_employee_assignments(MANUFACTURER, MODEL_NUMBER, DEPARTMENT).await?;
    assert!(holders
        .iter()
        .any(|a| a.device_id == DEVICE && a.emp_id == HOLDER));

    // A held device cannot be issued again, and only its holder can lose it
    assert_eq!(
        conflict_reason(devices::issue_device(OTHER, DEVICE).await),
        "device already issued"
    );
    assert_eq!(
        conflict_reason(devices::revoke_device(OTHER, DEVICE).await),
        "device not assigned to employee"
    );

    devices::revoke_device(HOLDER, DEVICE).await?;
    assert!(devices::issued_devices(HOLDER).await?.is_empty());

    assert_eq!(
        conflict_reason(devices::revoke_device(HOLDER, DEVICE).await),
        "device already revoked"
    );

    // Once free, the device can be issued to someone else
    devices::issue_device(OTHER, DEVICE).await?;
    devices::revoke_device(OTHER, DEVICE).await?;

    remove_assignment_fixture(&pool).await?;
    Ok(())
}

#[test]
fn unknown_device_maps_to_not_found() -> Result<()> {
    rt().block_on(unknown_device_maps_to_not_found_inner())
}

async fn unknown_device_maps_to_not_found_inner() -> Result<()> {
    let Some(pool) = test_pool().await else {
        return Ok(());
    };
    sqlx::query("DELETE FROM device WHERE deviceid = $1")
        .bind(MISSING_DEVICE)
        .execute(&pool)
        .await?;

    let err = devices::issue_device(HOLDER, MISSING_DEVICE)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)), "got {:?}", err);

    let err = devices::revoke_device(HOLDER, MISSING_DEVICE)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)), "got {:?}", err);

    Ok(())
}

#[test]
fn first_contact_number_is_inserted() -> Result<()> {
    rt().block_on(first_contact_number_is_inserted_inner())
}

async fn first_contact_number_is_inserted_inner() -> Result<()> {
    let Some(pool) = test_pool().await else {
        return Ok(());
    };
    sqlx::query("DELETE FROM employeephonenumbers WHERE empid = $1")
        .bind(PHONE_EMP)
        .execute(&pool)
        .await?;
    sqlx::query("DELETE FROM employee WHERE empid = $1")
        .bind(PHONE_EMP)
        .execute(&pool)
        .await?;
    sqlx::query(
        "INSERT INTO employee (empid, name, homeaddress, dateofbirth, password)
         VALUES ($1, 'Test Phoneless', '2 Test St', '1992-02-02', 'fixture-password')",
    )
    .bind(PHONE_EMP)
    .execute(&pool)
    .await?;

    // No phone row yet: the edit creates one instead of silently matching
    // zero rows
    let update = EmployeeUpdate {
        phone: Some("0400123456".to_string()),
        ..Default::default()
    };
    employees::edit_details(PHONE_EMP, &update).await?;

    let numbers = sqlx::query_scalar::<_, String>(
        "SELECT phonenumber FROM employeephonenumbers WHERE empid = $1",
    )
    .bind(PHONE_EMP)
    .fetch_all(&pool)
    .await?;
    assert_eq!(numbers, vec!["0400123456".to_string()]);

    // A second edit updates the existing row rather than adding another
    let update = EmployeeUpdate {
        phone: Some("0400999888".to_string()),
        ..Default::default()
    };
    employees::edit_details(PHONE_EMP, &update).await?;

    let numbers = sqlx::query_scalar::<_, String>(
        "SELECT phonenumber FROM employeephonenumbers WHERE empid = $1",
    )
    .bind(PHONE_EMP)
    .fetch_all(&pool)
    .await?;
    assert_eq!(numbers, vec!["0400999888".to_string()]);

    sqlx::query("DELETE FROM employeephonenumbers WHERE empid = $1")
        .bind(PHONE_EMP)
        .execute(&pool)
        .await?;
    sqlx::query("DELETE FROM employee WHERE empid = $1")
        .bind(PHONE_EMP)
        .execute(&pool)
        .await?;
    Ok(())
}
