//! Integration tests for the employees vertical slice
//!
//! Tests employee operations including:
//! - Manager-only creation with validation and unique employee IDs
//! - Visibility for managers (per reporting scope) and for the employee themselves
//! - Global manager edit/delete privilege
//! - Atomic delete of an employee together with its feedback

mod test_helpers;

use roster_core::{FeedbackForm, ReportingScope, RosterError};
use roster_storage::{employees, feedback};
use test_helpers::*;

#[tokio::test]
async fn test_manager_creates_employee_and_becomes_default_manager() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;

    let employee = employees::create(pool, employee_form("Ravi Kumar", "EMP001"), &manager)
        .await
        .expect("Failed to create employee");

    assert_eq!(employee.full_name, "Ravi Kumar");
    assert_eq!(employee.external_id, "EMP001");
    assert_eq!(employee.manager_id, Some(manager.id));
    assert_eq!(employee.joining_date.to_string(), "2023-01-16");
}

#[tokio::test]
async fn test_non_manager_cannot_create_employee() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let member = create_test_user(pool, "ravi", false).await;

    let result = employees::create(pool, employee_form("Someone", "EMP009"), &member).await;
    assert!(matches!(result, Err(RosterError::Forbidden(_))));
    assert!(employees::get_all(pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_external_id_is_conflict() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    employees::create(pool, employee_form("First", "EMP001"), &manager)
        .await
        .unwrap();

    let result = employees::create(pool, employee_form("Second", "EMP001"), &manager).await;
    assert!(matches!(result, Err(RosterError::Conflict(_))));
    assert_eq!(employees::get_all(pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_field_and_bad_date_are_validation_errors() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;

    let mut form = employee_form("No Location", "EMP002");
    form.location = None;
    let result = employees::create(pool, form, &manager).await;
    assert!(
        matches!(result, Err(RosterError::Validation { ref field, .. }) if field == "location")
    );

    let mut form = employee_form("Bad Date", "EMP003");
    form.joining_date = Some("2023-02-30".to_string());
    let result = employees::create(pool, form, &manager).await;
    assert!(
        matches!(result, Err(RosterError::Validation { ref field, .. }) if field == "joining_date")
    );
}

#[tokio::test]
async fn test_manager_id_must_reference_a_manager() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    let member = create_test_user(pool, "ravi", false).await;

    let mut form = employee_form("Meera", "EMP004");
    form.manager_id = Some(member.id);
    let result = employees::create(pool, form, &manager).await;
    assert!(
        matches!(result, Err(RosterError::Validation { ref field, .. }) if field == "manager_id")
    );

    let mut form = employee_form("Meera", "EMP004");
    form.manager_id = Some(9999);
    assert!(employees::create(pool, form, &manager).await.is_err());
}

#[tokio::test]
async fn test_list_is_everything_for_managers_and_self_for_employees() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    let member = create_test_user(pool, "ravi", false).await;
    let outsider = create_test_user(pool, "nobody", false).await;

    create_test_employee(pool, "Ravi Kumar", "EMP001", Some(manager.id), Some(member.id)).await;
    create_test_employee(pool, "Meera Nair", "EMP002", Some(manager.id), None).await;

    assert_eq!(employees::list(pool, &manager).await.unwrap().len(), 2);

    let own = employees::list(pool, &member).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].external_id, "EMP001");

    assert!(employees::list(pool, &outsider).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_checks_visibility() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    let other_manager = create_test_user(pool, "vikram", true).await;
    let member = create_test_user(pool, "ravi", false).await;
    let colleague = create_test_user(pool, "meera", false).await;

    let employee =
        create_test_employee(pool, "Ravi Kumar", "EMP001", Some(manager.id), Some(member.id))
            .await;

    let seen = employees::get(pool, employee.id, &manager, ReportingScope::Direct)
        .await
        .unwrap();
    assert_eq!(seen.id, employee.id);

    // Self-view
    assert!(employees::get(pool, employee.id, &member, ReportingScope::Direct)
        .await
        .is_ok());

    let result = employees::get(pool, employee.id, &colleague, ReportingScope::Extended).await;
    assert!(matches!(result, Err(RosterError::Forbidden(_))));

    let result = employees::get(pool, employee.id, &other_manager, ReportingScope::Extended).await;
    assert!(matches!(result, Err(RosterError::Forbidden(_))));

    let result = employees::get(pool, 4242, &manager, ReportingScope::Extended).await;
    assert!(matches!(result, Err(RosterError::NotFound { .. })));
}

#[tokio::test]
async fn test_extended_scope_reaches_reports_of_sub_managers() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let director = create_test_user(pool, "asha", true).await;
    let lead = create_test_user(pool, "vikram", true).await;

    create_test_employee(pool, "Vikram Rao", "EMP010", Some(director.id), Some(lead.id)).await;
    let grandchild = create_test_employee(pool, "Neha Iyer", "EMP011", Some(lead.id), None).await;

    let result = employees::get(pool, grandchild.id, &director, ReportingScope::Direct).await;
    assert!(matches!(result, Err(RosterError::Forbidden(_))));

    assert!(
        employees::get(pool, grandchild.id, &director, ReportingScope::Extended)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_any_manager_can_update_and_omitted_manager_is_kept() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    let other_manager = create_test_user(pool, "vikram", true).await;
    let member = create_test_user(pool, "ravi", false).await;

    let employee = create_test_employee(pool, "Ravi Kumar", "EMP001", Some(manager.id), None).await;

    let mut form = employee_form("Ravi K.", "EMP001");
    form.team = Some("Payments".to_string());
    let updated = employees::update(pool, employee.id, form, &other_manager)
        .await
        .expect("Any manager may edit");

    assert_eq!(updated.full_name, "Ravi K.");
    assert_eq!(updated.team, "Payments");
    assert_eq!(updated.manager_id, Some(manager.id));

    let result = employees::update(pool, employee.id, employee_form("X", "EMP001"), &member).await;
    assert!(matches!(result, Err(RosterError::Forbidden(_))));
}

#[tokio::test]
async fn test_update_to_taken_external_id_is_conflict() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    create_test_employee(pool, "First", "EMP001", Some(manager.id), None).await;
    let second = create_test_employee(pool, "Second", "EMP002", Some(manager.id), None).await;

    let result =
        employees::update(pool, second.id, employee_form("Second", "EMP001"), &manager).await;
    assert!(matches!(result, Err(RosterError::Conflict(_))));

    let unchanged = employees::get_by_id(pool, second.id).await.unwrap().unwrap();
    assert_eq!(unchanged.external_id, "EMP002");
}

#[tokio::test]
async fn test_delete_removes_employee_and_feedback() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    let employee = create_test_employee(pool, "Ravi Kumar", "EMP001", Some(manager.id), None).await;

    for rating in [3, 4] {
        feedback::create(
            pool,
            employee.id,
            FeedbackForm {
                rating: Some(rating),
                feedback_text: Some("steady work".to_string()),
                period: None,
            },
            &manager,
        )
        .await
        .unwrap();
    }
    assert_eq!(count_feedback(pool, employee.id).await, 2);

    employees::delete(pool, employee.id, &manager).await.unwrap();

    assert!(employees::get_by_id(pool, employee.id).await.unwrap().is_none());
    assert_eq!(count_feedback(pool, employee.id).await, 0);
}

#[tokio::test]
async fn test_delete_is_atomic_when_employee_delete_fails() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    let employee = create_test_employee(pool, "Ravi Kumar", "EMP001", Some(manager.id), None).await;

    feedback::create(
        pool,
        employee.id,
        FeedbackForm {
            rating: Some(3),
            feedback_text: Some("ok".to_string()),
            period: None,
        },
        &manager,
    )
    .await
    .unwrap();

    // Fail the second statement of the delete, after feedback rows are gone
    sqlx::query(
        "CREATE TRIGGER block_employee_delete BEFORE DELETE ON employees \
         BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
    )
    .execute(pool)
    .await
    .unwrap();

    let result = employees::delete(pool, employee.id, &manager).await;
    assert!(result.is_err());

    assert!(employees::get_by_id(pool, employee.id).await.unwrap().is_some());
    assert_eq!(count_feedback(pool, employee.id).await, 1);
}

#[tokio::test]
async fn test_non_manager_cannot_delete() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    let member = create_test_user(pool, "ravi", false).await;
    let employee =
        create_test_employee(pool, "Ravi Kumar", "EMP001", Some(manager.id), Some(member.id))
            .await;

    let result = employees::delete(pool, employee.id, &member).await;
    assert!(matches!(result, Err(RosterError::Forbidden(_))));
    assert!(employees::get_by_id(pool, employee.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_scoped() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let manager = create_test_user(pool, "asha", true).await;
    let member = create_test_user(pool, "ravi", false).await;

    create_test_employee(pool, "Ravi Kumar", "EMP001", Some(manager.id), Some(member.id)).await;
    create_test_employee(pool, "Meera Nair", "EMP002", Some(manager.id), None).await;

    let hits = employees::search(pool, "MEERA", &manager).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].external_id, "EMP002");

    assert_eq!(employees::search(pool, "platform", &manager).await.unwrap().len(), 2);

    // Employees only ever find themselves
    assert!(employees::search(pool, "meera", &member).await.unwrap().is_empty());
}
