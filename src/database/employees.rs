//! Employee queries: login, department membership, and detail edits.

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Employee, EmployeeRef, EmployeeUpdate, EmployeeWithAddress};

/// Check the login credentials and return the employee's public record.
///
/// Passwords are stored in cleartext in this schema and compared directly;
/// this is a known weakness of the system being modeled, kept on purpose.
/// Do not reuse this scheme anywhere that matters.
pub async fn authenticate(emp_id: i32, password: &str) -> Result<Employee, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT empid AS emp_id, name, homeaddress AS home_address,
               dateofbirth AS date_of_birth
        FROM employee
        WHERE empid = $1 AND password = $2
        "#,
    )
    .bind(emp_id)
    .bind(password)
    .fetch_optional(&pool)
    .await?;

    employee.ok_or_else(|| DatabaseError::NotFound("invalid employee id or password".to_string()))
}

/// Departments this employee manages. Empty means "not a manager".
pub async fn manager_departments(emp_id: i32) -> Result<Vec<String>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let departments = sqlx::query_scalar::<_, String>(
        "SELECT name FROM department WHERE manager = $1 ORDER BY name",
    )
    .bind(emp_id)
    .fetch_all(&pool)
    .await?;

    Ok(departments)
}

/// Departments the employee works in (membership, not management).
pub async fn departments_for(emp_id: i32) -> Result<Vec<String>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let departments = sqlx::query_scalar::<_, String>(
        "SELECT department FROM employeedepartments WHERE empid = $1 ORDER BY department",
    )
    .bind(emp_id)
    .fetch_all(&pool)
    .await?;

    Ok(departments)
}

/// All employees working in the given department.
pub async fn employees_in_department(
    department: &str,
) -> Result<Vec<EmployeeRef>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let employees = sqlx::query_as::<_, EmployeeRef>(
        r#"
        SELECT empid AS emp_id, name
        FROM employeedepartments JOIN employee USING (empid)
        WHERE department = $1
        ORDER BY name
        "#,
    )
    .bind(department)
    .fetch_all(&pool)
    .await?;

    Ok(employees)
}

/// Apply the provided fields (and only those) to the employee's record, then
/// re-authenticate with the stored password and return the refreshed record.
///
/// The contact number lives in its own table (employeephonenumbers), so it
/// gets a separate statement. All writes happen in one transaction.
pub async fn edit_details(
    emp_id: i32,
    update: &EmployeeUpdate,
) -> Result<Employee, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let mut tx = pool.begin().await?;

    if let Some(name) = &update.name {
        sqlx::query("UPDATE employee SET name = $1 WHERE empid = $2")
            .bind(name)
            .bind(emp_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(address) = &update.address {
        sqlx::query("UPDATE employee SET homeaddress = $1 WHERE empid = $2")
            .bind(address)
            .bind(emp_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(dob) = &update.date_of_birth {
        sqlx::query("UPDATE employee SET dateofbirth = $1 WHERE empid = $2")
            .bind(dob)
            .bind(emp_id)
            .execute(&mut *tx)
            .await?;
    }
    if let Some(phone) = &update.phone {
        let updated =
            sqlx::query("UPDATE employeephonenumbers SET phonenumber = $1 WHERE empid = $2")
                .bind(phone)
                .bind(emp_id)
                .execute(&mut *tx)
                .await?;
        // First contact number for an employee with no phone row yet
        if updated.rows_affected() == 0 {
            sqlx::query("INSERT INTO employeephonenumbers (empid, phonenumber) VALUES ($1, $2)")
                .bind(emp_id)
                .bind(phone)
                .execute(&mut *tx)
                .await?;
        }
    }
    if let Some(password) = &update.password {
        sqlx::query("UPDATE employee SET password = $1 WHERE empid = $2")
            .bind(password)
            .bind(emp_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    let password = sqlx::query_scalar::<_, String>(
        "SELECT password FROM employee WHERE empid = $1",
    )
    .bind(emp_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound(format!("employee {}", emp_id)))?;

    authenticate(emp_id, &password).await
}

/// Employees in the manager's departments with no rows in the used-by
/// relation, i.e. people who use no devices at all.
pub async fn employees_with_no_devices(
    manager_id: i32,
) -> Result<Vec<EmployeeWithAddress>, DatabaseError> {
    let pool = DatabaseManager::pool().await?;

    let employees = sqlx::query_as::<_, EmployeeWithAddress>(
        r#"
        SELECT DISTINCT e.empid AS emp_id, e.name, e.homeaddress AS home_address
        FROM employee e
             JOIN employeedepartments ed USING (empid)
             JOIN department d ON d.name = ed.department
        WHERE d.manager = $1
          AND NOT EXISTS (SELECT 1 FROM deviceusedby du WHERE du.empid = e.empid)
        ORDER BY e.empid
        "#,
    )
    .bind(manager_id)
    .fetch_all(&pool)
    .await?;

    Ok(employees)
}
