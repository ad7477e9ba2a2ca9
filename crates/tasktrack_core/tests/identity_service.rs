use rusqlite::Connection;
use tasktrack_core::db::open_db_in_memory;
use tasktrack_core::repo::employee_repo::SqliteEmployeeRepository;
use tasktrack_core::{
    open_session, Caller, DenyReason, EntityKind, HashedRegistration, IdentityService,
    NewEmployee, Role, ServiceError, SessionError, SessionService, ValidationError,
};

fn sessions() -> SessionService {
    SessionService::new("identity-secret", 24)
}

fn new_employee(name: &str, email: &str, role: Role) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        email: email.to_string(),
        password: "hunter2".to_string(),
        role,
    }
}

fn service(conn: &Connection) -> IdentityService<SqliteEmployeeRepository<'_>> {
    IdentityService::open(conn, sessions()).unwrap()
}

#[test]
fn register_allocates_sequential_ids_and_rejects_duplicate_email() {
    let conn = open_db_in_memory().unwrap();
    let identity = service(&conn);

    assert_eq!(
        identity
            .register(new_employee("Alice", "alice@example.com", Role::Employee))
            .unwrap(),
        1
    );
    assert_eq!(
        identity
            .register(new_employee("Mona", "mona@example.com", Role::Manager))
            .unwrap(),
        2
    );
    assert!(matches!(
        identity.register(new_employee("Again", "alice@example.com", Role::Employee)),
        Err(ServiceError::Duplicate(EntityKind::Employee))
    ));
}

#[test]
fn register_rejects_empty_password_and_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let identity = service(&conn);

    let mut request = new_employee("Alice", "alice@example.com", Role::Employee);
    request.password.clear();
    assert!(matches!(
        identity.register(request),
        Err(ServiceError::Validation(ValidationError::EmptyPassword))
    ));
    assert!(matches!(
        identity.register(new_employee(" ", "alice@example.com", Role::Employee)),
        Err(ServiceError::Validation(ValidationError::BlankName))
    ));
}

#[test]
fn authenticate_issues_a_token_that_resolves_to_the_caller() {
    let conn = open_db_in_memory().unwrap();
    let identity = service(&conn);
    identity
        .register(new_employee("Mona", "mona@example.com", Role::Manager))
        .unwrap();

    let session = identity.authenticate("mona@example.com", "hunter2").unwrap();
    assert_eq!(session.employee.id, 1);
    assert_eq!(session.employee.role, Role::Manager);

    let caller = identity.resolve_session(&session.token).unwrap();
    assert_eq!(caller, Caller::new(1, Role::Manager));
}

#[test]
fn authenticate_failures_are_indistinguishable() {
    let conn = open_db_in_memory().unwrap();
    let identity = service(&conn);
    identity
        .register(new_employee("Alice", "alice@example.com", Role::Employee))
        .unwrap();

    let wrong_password = identity
        .authenticate("alice@example.com", "nope")
        .unwrap_err();
    let unknown_email = identity
        .authenticate("bob@example.com", "hunter2")
        .unwrap_err();
    assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
    assert!(matches!(unknown_email, ServiceError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[test]
fn garbage_token_is_unauthorized() {
    let conn = open_db_in_memory().unwrap();
    let identity = service(&conn);
    assert!(matches!(
        identity.resolve_session("abc.def.ghi"),
        Err(ServiceError::Unauthorized(SessionError::Malformed(_)))
    ));
}

#[test]
fn employee_views_follow_role() {
    let conn = open_db_in_memory().unwrap();
    let identity = service(&conn);
    identity
        .register(new_employee("Alice", "alice@example.com", Role::Employee))
        .unwrap();
    identity
        .register(new_employee("Mona", "mona@example.com", Role::Manager))
        .unwrap();
    let alice = Caller::new(1, Role::Employee);
    let mona = Caller::new(2, Role::Manager);

    assert_eq!(identity.current_employee(&alice).unwrap().name, "Alice");
    assert!(matches!(
        identity.list_employees(&alice),
        Err(ServiceError::Forbidden(DenyReason::ManagerRequired))
    ));
    assert!(matches!(
        identity.get_employee(&alice, 1),
        Err(ServiceError::Forbidden(DenyReason::ManagerRequired))
    ));

    assert_eq!(identity.list_employees(&mona).unwrap().len(), 2);
    assert_eq!(identity.get_employee(&mona, 1).unwrap().email, "alice@example.com");
    assert!(matches!(
        identity.get_employee(&mona, 5),
        Err(ServiceError::NotFound {
            entity: EntityKind::Employee,
            id: 5
        })
    ));

    let ghost = Caller::new(9, Role::Employee);
    assert!(matches!(
        identity.current_employee(&ghost),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn hashed_registration_and_split_login_match_the_one_step_calls() {
    let conn = open_db_in_memory().unwrap();
    let identity = service(&conn);

    let mut empty = new_employee("Alice", "alice@example.com", Role::Employee);
    empty.password.clear();
    assert!(matches!(
        HashedRegistration::hash(empty),
        Err(ServiceError::Validation(ValidationError::EmptyPassword))
    ));

    let registration =
        HashedRegistration::hash(new_employee("Alice", "alice@example.com", Role::Employee))
            .unwrap();
    assert!(registration.password_hash.starts_with("$argon2id$"));
    assert_eq!(identity.register_hashed(registration).unwrap(), 1);

    let credentials = identity.credentials_for("alice@example.com").unwrap();
    assert!(matches!(
        open_session(&sessions(), credentials.clone(), "wrong"),
        Err(ServiceError::InvalidCredentials)
    ));
    let session = open_session(&sessions(), credentials, "hunter2").unwrap();
    assert_eq!(
        identity.resolve_session(&session.token).unwrap(),
        Caller::new(1, Role::Employee)
    );
    assert!(matches!(
        identity.credentials_for("nobody@example.com"),
        Err(ServiceError::InvalidCredentials)
    ));
}
