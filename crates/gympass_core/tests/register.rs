use gympass_core::{
    InMemoryUserRepository, ManualClock, RegisterRequest, UserRepository, UserService,
    UserServiceError,
};
use uuid::Uuid;

fn john(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "John Doe".to_string(),
        email: email.to_string(),
        password: "123456".to_string(),
    }
}

#[test]
fn register_creates_user_with_generated_id() {
    let repo = InMemoryUserRepository::new();
    let service = UserService::new(&repo);

    let user = service.register(&john("johndoe@example.com")).unwrap();

    assert!(!user.id.is_nil());
    assert_eq!(repo.items().len(), 1);
    assert_eq!(repo.items()[0].id, user.id);
}

#[test]
fn register_hashes_password() {
    let repo = InMemoryUserRepository::new();
    let service = UserService::new(&repo);

    let user = service.register(&john("johndoe@example.com")).unwrap();

    assert_ne!(user.password_hash, "123456");
    assert!(bcrypt::verify("123456", &user.password_hash).unwrap());
}

#[test]
fn register_twice_with_same_email_fails() {
    let repo = InMemoryUserRepository::new();
    let service = UserService::new(&repo);

    service.register(&john("johndoe@example.com")).unwrap();
    let err = service
        .register(&john("  JohnDoe@Example.com "))
        .unwrap_err();

    assert!(matches!(err, UserServiceError::UserAlreadyExists(email) if email == "johndoe@example.com"));
    assert_eq!(repo.items().len(), 1);
}

#[test]
fn register_rejects_short_password_and_invalid_email() {
    let repo = InMemoryUserRepository::new();
    let service = UserService::new(&repo);

    let mut short = john("short@example.com");
    short.password = "12345".to_string();
    assert!(matches!(
        service.register(&short).unwrap_err(),
        UserServiceError::PasswordTooShort { min_len: 6 }
    ));

    let err = service.register(&john("not-an-email")).unwrap_err();
    assert!(matches!(err, UserServiceError::Validation(_)));
    assert!(repo.items().is_empty());
}

#[test]
fn register_stamps_creation_time_from_clock() {
    let repo = InMemoryUserRepository::new();
    let clock = ManualClock::new(1_700_000_000_000);
    let service = UserService::with_clock(&repo, &clock);

    let user = service.register(&john("clock@example.com")).unwrap();
    assert_eq!(user.created_at, 1_700_000_000_000);
}

#[test]
fn authenticate_accepts_correct_password_only() {
    let repo = InMemoryUserRepository::new();
    let service = UserService::new(&repo);
    let registered = service.register(&john("auth@example.com")).unwrap();

    let user = service.authenticate("AUTH@example.com", "123456").unwrap();
    assert_eq!(user.id, registered.id);

    assert!(matches!(
        service.authenticate("auth@example.com", "654321").unwrap_err(),
        UserServiceError::InvalidCredentials
    ));
    assert!(matches!(
        service.authenticate("nobody@example.com", "123456").unwrap_err(),
        UserServiceError::InvalidCredentials
    ));
}

#[test]
fn get_user_profile_returns_user_or_not_found() {
    let repo = InMemoryUserRepository::new();
    let service = UserService::new(&repo);
    let registered = service.register(&john("profile@example.com")).unwrap();

    let profile = service.get_user_profile(registered.id).unwrap();
    assert_eq!(profile.email, "profile@example.com");

    let err = service.get_user_profile(Uuid::new_v4()).unwrap_err();
    assert!(err.is_resource_not_found());
}

#[test]
fn serialized_user_omits_password_hash() {
    let repo = InMemoryUserRepository::new();
    let service = UserService::new(&repo);
    let user = service.register(&john("json@example.com")).unwrap();

    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["email"], "json@example.com");
    assert!(repo.find_user_by_id(user.id).unwrap().is_some());
}
