use super::support::*;

#[tokio::test]
async fn register_then_login_round_trip() {
    let backend = backend().await;
    let message = backend
        .users
        .register(register_input("alice"))
        .await
        .expect("register");
    assert_eq!(message, "alice has been registered");

    let session = backend.users.login(login_input("alice")).await.expect("login");
    assert!(!session.token.is_empty());

    let viewer = backend
        .users
        .viewer_from_token(&session.token)
        .await
        .expect("viewer");
    assert_eq!(viewer.username, "alice");
    assert_eq!(viewer.id, session.user_id);
}

#[tokio::test]
async fn login_accepts_email_as_handle() {
    let backend = backend().await;
    backend
        .users
        .register(register_input("bob"))
        .await
        .expect("register");

    let session = backend
        .users
        .login(login_input("bob@example.com"))
        .await
        .expect("login by email");
    assert!(!session.token.is_empty());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let backend = backend().await;
    backend
        .users
        .register(register_input("carol"))
        .await
        .expect("first register");

    let err = backend
        .users
        .register(register_input_with("carol", "other@example.com"))
        .await
        .expect_err("duplicate username");
    assert_eq!(err.to_string(), "Username already taken");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let backend = backend().await;
    backend
        .users
        .register(register_input("dave"))
        .await
        .expect("first register");

    let err = backend
        .users
        .register(register_input_with("dave2", "dave@example.com"))
        .await
        .expect_err("duplicate email");
    assert_eq!(err.to_string(), "Email already taken");
}

#[tokio::test]
async fn uniqueness_is_case_insensitive() {
    let backend = backend().await;
    backend
        .users
        .register(register_input("erin"))
        .await
        .expect("first register");

    let err = backend
        .users
        .register(register_input_with("Erin", "upper@example.com"))
        .await
        .expect_err("case-folded duplicate");
    assert_eq!(err.to_string(), "Username already taken");
}

#[tokio::test]
async fn register_validates_input_fields() {
    let backend = backend().await;

    let mut input = register_input("frank");
    input.username = None;
    let err = backend.users.register(input).await.expect_err("no username");
    assert_eq!(err.to_string(), "Username is required");

    let mut input = register_input("frank");
    input.email = Some("not-an-email".to_string());
    let err = backend.users.register(input).await.expect_err("bad email");
    assert_eq!(err.to_string(), "Invalid email format");

    let mut input = register_input("frank");
    input.password = None;
    let err = backend.users.register(input).await.expect_err("no password");
    assert_eq!(err.to_string(), "Password is required");

    let mut input = register_input("frank");
    input.password = Some("abcd".to_string());
    let err = backend.users.register(input).await.expect_err("weak password");
    assert_eq!(err.to_string(), "Password is not strong enough");
}

#[tokio::test]
async fn login_failure_modes_share_one_message() {
    let backend = backend().await;
    backend
        .users
        .register(register_input("grace"))
        .await
        .expect("register");

    let unknown = backend
        .users
        .login(login_input("nobody"))
        .await
        .expect_err("unknown user");
    let wrong_password = backend
        .users
        .login(LoginInput {
            username: Some("grace".to_string()),
            password: Some("wrong-password".to_string()),
        })
        .await
        .expect_err("wrong password");
    assert_eq!(unknown.to_string(), "Invalid username/email or password");
    assert_eq!(wrong_password.to_string(), unknown.to_string());
}

#[tokio::test]
async fn find_by_name_is_case_insensitive_substring() {
    let backend = backend().await;
    signup(&backend, "heidi").await;
    signup(&backend, "ivan").await;

    let hits = backend.users.find_by_name("EID").await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].username, "heidi");

    let all = backend.users.find_all().await.expect("all users");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn find_by_id_rejects_unknown_users() {
    let backend = backend().await;
    let err = backend
        .users
        .find_by_id("no-such-user")
        .await
        .expect_err("missing user");
    assert_eq!(err.to_string(), "User not found");
}

#[tokio::test]
async fn garbage_token_is_rejected_flatly() {
    let backend = backend().await;
    let err = backend
        .users
        .viewer_from_token("not.a.token")
        .await
        .expect_err("bad token");
    assert_eq!(err.to_string(), "Invalid token");
}
