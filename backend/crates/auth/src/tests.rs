//! Unit and integration tests for the auth crate

#[cfg(test)]
mod store_tests {
    use crate::application::{AuthConfig, LoginInput, LoginUseCase, RefreshUseCase};
    use crate::domain::entity::user::User;
    use crate::domain::repository::{RefreshTokenRepository, RotationOutcome, UserRepository};
    use crate::domain::value_object::{
        email::Email, role::Role, verification_status::VerificationStatus,
    };
    use crate::error::AuthError;
    use crate::infra::sqlite::SqliteAuthRepository;
    use chrono::{Duration, Utc};
    use kernel::id::UserId;
    use platform::client::DeviceMeta;
    use platform::password::ClearTextPassword;
    use platform::token;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::Arc;

    async fn setup_repo() -> SqliteAuthRepository {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::migrate!("../../../database/migrations")
            .run(&pool)
            .await
            .unwrap();

        SqliteAuthRepository::new(pool)
    }

    async fn create_citizen(repo: &SqliteAuthRepository, email: &str, password: &str) -> User {
        let now_ms = Utc::now().timestamp_millis();
        let user = User {
            id: UserId::from_i64(0), // assigned by the store
            email: Email::from_db(email),
            display_name: "Test Citizen".to_string(),
            password_hash: ClearTextPassword::new_unchecked(password.to_string())
                .hash()
                .unwrap(),
            role: Role::Citizen,
            verification_status: VerificationStatus::None,
            rejection_reason: None,
            rejected_at_ms: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        repo.create_user(&user).await.unwrap()
    }

    async fn open_session(repo: &SqliteAuthRepository, user_id: UserId) -> String {
        let secret = token::generate_opaque_secret();
        let draft = crate::domain::entity::refresh_token::NewRefreshToken::new(
            token::hash_secret(&secret),
            user_id,
            &DeviceMeta::default(),
            Duration::days(7),
        );
        repo.create_token(&draft).await.unwrap();
        secret
    }

    #[tokio::test]
    async fn test_login_success_and_uniform_failures() {
        let repo = Arc::new(setup_repo().await);
        create_citizen(&repo, "resident@example.com", "CorrectHorse1!").await;

        let config = Arc::new(AuthConfig::development());
        let use_case = LoginUseCase::new(repo.clone(), config);
        let device = DeviceMeta::default();

        let output = use_case
            .execute(
                LoginInput {
                    email: "resident@example.com".to_string(),
                    password: "CorrectHorse1!".to_string(),
                },
                &device,
            )
            .await
            .unwrap();
        assert!(!output.access_token.is_empty());
        assert_eq!(output.refresh_secret.len(), 64);

        // Wrong password and unknown email are indistinguishable
        let wrong_password = use_case
            .execute(
                LoginInput {
                    email: "resident@example.com".to_string(),
                    password: "WrongPassword1!".to_string(),
                },
                &device,
            )
            .await;
        let unknown_email = use_case
            .execute(
                LoginInput {
                    email: "nobody@example.com".to_string(),
                    password: "CorrectHorse1!".to_string(),
                },
                &device,
            )
            .await;
        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_raw_secret_never_persisted() {
        let repo = setup_repo().await;
        let user = create_citizen(&repo, "resident@example.com", "CorrectHorse1!").await;
        let secret = open_session(&repo, user.id).await;

        let tokens = repo.list_active_for_user(user.id).await.unwrap();
        assert_eq!(tokens.len(), 1);
        assert_ne!(tokens[0].token_hash, secret);
        assert_eq!(tokens[0].token_hash, token::hash_secret(&secret));
        // Hex SHA-256 digest
        assert_eq!(tokens[0].token_hash.len(), 64);
        assert!(tokens[0].token_hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_find_valid_excludes_revoked_and_expired() {
        let repo = setup_repo().await;
        let user = create_citizen(&repo, "resident@example.com", "CorrectHorse1!").await;

        let secret = open_session(&repo, user.id).await;
        let hash = token::hash_secret(&secret);

        let found = repo.find_valid(&hash).await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);

        assert!(repo.find_valid("no-such-digest").await.unwrap().is_none());

        repo.revoke_token(&hash).await.unwrap();
        assert!(repo.find_valid(&hash).await.unwrap().is_none());

        // An expired row never comes back even while unrevoked
        let expired_secret = token::generate_opaque_secret();
        let expired_hash = token::hash_secret(&expired_secret);
        let draft = crate::domain::entity::refresh_token::NewRefreshToken::new(
            expired_hash.clone(),
            user.id,
            &DeviceMeta::default(),
            Duration::days(-1),
        );
        repo.create_token(&draft).await.unwrap();
        assert!(repo.find_valid(&expired_hash).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rotation_revokes_and_detects_replay() {
        let repo = setup_repo().await;
        let user = create_citizen(&repo, "resident@example.com", "CorrectHorse1!").await;
        let secret = open_session(&repo, user.id).await;
        let presented_hash = token::hash_secret(&secret);

        let successor_secret = token::generate_opaque_secret();
        let outcome = repo
            .rotate_token(
                &presented_hash,
                &token::hash_secret(&successor_secret),
                &DeviceMeta::default(),
                Duration::days(7),
            )
            .await
            .unwrap();
        let RotationOutcome::Rotated { user_id, successor } = outcome else {
            panic!("first rotation must succeed");
        };
        assert_eq!(user_id, user.id);
        assert!(successor.revoked_at_ms.is_none());

        // Presenting the same secret again is a replay
        let replay = repo
            .rotate_token(
                &presented_hash,
                &token::hash_secret(&token::generate_opaque_secret()),
                &DeviceMeta::default(),
                Duration::days(7),
            )
            .await
            .unwrap();
        assert!(matches!(
            replay,
            RotationOutcome::Replayed { user_id } if user_id == user.id
        ));

        // The successor chain continues normally
        let next = repo
            .rotate_token(
                &token::hash_secret(&successor_secret),
                &token::hash_secret(&token::generate_opaque_secret()),
                &DeviceMeta::default(),
                Duration::days(7),
            )
            .await
            .unwrap();
        assert!(matches!(next, RotationOutcome::Rotated { .. }));
    }

    #[tokio::test]
    async fn test_rotation_single_winner_under_contention() {
        let repo = Arc::new(setup_repo().await);
        let user = create_citizen(&repo, "resident@example.com", "CorrectHorse1!").await;
        let secret = open_session(&repo, user.id).await;
        let presented_hash = token::hash_secret(&secret);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            let presented_hash = presented_hash.clone();
            handles.push(tokio::spawn(async move {
                repo.rotate_token(
                    &presented_hash,
                    &token::hash_secret(&token::generate_opaque_secret()),
                    &DeviceMeta::default(),
                    Duration::days(7),
                )
                .await
                .unwrap()
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), RotationOutcome::Rotated { .. }) {
                wins += 1;
            }
        }
        assert_eq!(wins, 1, "exactly one concurrent rotation may succeed");
    }

    #[tokio::test]
    async fn test_expired_token_does_not_rotate() {
        let repo = setup_repo().await;
        let user = create_citizen(&repo, "resident@example.com", "CorrectHorse1!").await;

        let secret = token::generate_opaque_secret();
        let draft = crate::domain::entity::refresh_token::NewRefreshToken::new(
            token::hash_secret(&secret),
            user.id,
            &DeviceMeta::default(),
            Duration::milliseconds(-1), // already expired
        );
        repo.create_token(&draft).await.unwrap();

        let outcome = repo
            .rotate_token(
                &token::hash_secret(&secret),
                &token::hash_secret(&token::generate_opaque_secret()),
                &DeviceMeta::default(),
                Duration::days(7),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, RotationOutcome::Invalid));
    }

    #[tokio::test]
    async fn test_refresh_use_case_rejects_replay() {
        let repo = Arc::new(setup_repo().await);
        let user = create_citizen(&repo, "resident@example.com", "CorrectHorse1!").await;
        let secret = open_session(&repo, user.id).await;

        let config = Arc::new(AuthConfig::development());
        let use_case = RefreshUseCase::new(repo.clone(), config);
        let device = DeviceMeta::default();

        let output = use_case.execute(&secret, &device).await.unwrap();
        assert!(!output.refresh_secret.is_empty());
        assert_ne!(output.refresh_secret, secret);

        let replay = use_case.execute(&secret, &device).await;
        assert!(matches!(replay, Err(AuthError::SessionInvalid)));

        // A garbage secret is just invalid
        let garbage = use_case.execute("not-a-real-secret", &device).await;
        assert!(matches!(garbage, Err(AuthError::SessionInvalid)));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_and_logout_all_counts() {
        let repo = setup_repo().await;
        let user = create_citizen(&repo, "resident@example.com", "CorrectHorse1!").await;
        let secret_a = open_session(&repo, user.id).await;
        let _secret_b = open_session(&repo, user.id).await;
        let _secret_c = open_session(&repo, user.id).await;

        let hash_a = token::hash_secret(&secret_a);
        assert!(repo.revoke_token(&hash_a).await.unwrap());
        assert!(!repo.revoke_token(&hash_a).await.unwrap());
        assert!(!repo.revoke_token("unknown-digest").await.unwrap());

        let revoked = repo.revoke_all_for_user(user.id).await.unwrap();
        assert_eq!(revoked, 2);
        assert!(repo.list_active_for_user(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_revoke_by_id_is_owner_scoped() {
        let repo = setup_repo().await;
        let alice = create_citizen(&repo, "alice@example.com", "CorrectHorse1!").await;
        let mallory = create_citizen(&repo, "mallory@example.com", "CorrectHorse1!").await;
        open_session(&repo, alice.id).await;

        let alice_sessions = repo.list_active_for_user(alice.id).await.unwrap();
        let session_id = alice_sessions[0].id;

        // Someone else cannot revoke Alice's session
        assert!(!repo.revoke_by_id(mallory.id, session_id).await.unwrap());
        assert!(repo.revoke_by_id(alice.id, session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_and_revoked() {
        let repo = setup_repo().await;
        let user = create_citizen(&repo, "resident@example.com", "CorrectHorse1!").await;

        // live
        open_session(&repo, user.id).await;
        // revoked
        let revoked_secret = open_session(&repo, user.id).await;
        repo.revoke_token(&token::hash_secret(&revoked_secret))
            .await
            .unwrap();
        // expired
        let draft = crate::domain::entity::refresh_token::NewRefreshToken::new(
            token::hash_secret(&token::generate_opaque_secret()),
            user.id,
            &DeviceMeta::default(),
            Duration::milliseconds(-1),
        );
        repo.create_token(&draft).await.unwrap();

        let swept = repo.sweep_expired().await.unwrap();
        assert_eq!(swept, 2);
        assert_eq!(repo.list_active_for_user(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_default_admin_seeded_once() {
        let repo = setup_repo().await;
        let email = Email::from_db("admin@example.com");
        let hash = ClearTextPassword::new_unchecked("ChangeMe123!".to_string())
            .hash()
            .unwrap();

        assert!(repo
            .ensure_default_admin(&email, &hash, "Administrator")
            .await
            .unwrap());
        assert!(!repo
            .ensure_default_admin(&email, &hash, "Administrator")
            .await
            .unwrap());

        let admin = repo.find_user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.verification_status, VerificationStatus::Approved);
    }
}

#[cfg(test)]
mod http_tests {
    use crate::application::AuthConfig;
    use crate::infra::sqlite::SqliteAuthRepository;
    use crate::presentation::csrf::{CSRF_HEADER_NAME, CsrfState, csrf_guard, mint_csrf_token};
    use crate::presentation::router::auth_router_generic;
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::{Router, routing::post};
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn setup_app() -> (Router, SqliteAuthRepository, Arc<AuthConfig>) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("../../../database/migrations")
            .run(&pool)
            .await
            .unwrap();

        let repo = SqliteAuthRepository::new(pool);
        let config = Arc::new(AuthConfig::development());
        let app = Router::new()
            .nest("/auth", auth_router_generic(repo.clone(), config.clone()))
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 52000))));
        (app, repo, config)
    }

    async fn seed_user(repo: &SqliteAuthRepository, email: &str, password: &str) {
        use crate::domain::entity::user::User;
        use crate::domain::repository::UserRepository;
        use crate::domain::value_object::{
            email::Email, role::Role, verification_status::VerificationStatus,
        };
        use platform::password::ClearTextPassword;

        let now_ms = Utc::now().timestamp_millis();
        repo.create_user(&User {
            id: kernel::id::UserId::from_i64(0),
            email: Email::from_db(email),
            display_name: "Test Citizen".to_string(),
            password_hash: ClearTextPassword::new_unchecked(password.to_string())
                .hash()
                .unwrap(),
            role: Role::Citizen,
            verification_status: VerificationStatus::None,
            rejection_reason: None,
            rejected_at_ms: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        })
        .await
        .unwrap();
    }

    fn set_cookies(response: &axum::response::Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_sets_both_session_cookies() {
        let (app, repo, _) = setup_app().await;
        seed_user(&repo, "resident@example.com", "CorrectHorse1!").await;

        let response = app
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"resident@example.com","password":"CorrectHorse1!"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookies(&response);
        let access = cookies
            .iter()
            .find(|c| c.starts_with("access_token="))
            .expect("access cookie");
        let refresh = cookies
            .iter()
            .find(|c| c.starts_with("refresh_token="))
            .expect("refresh cookie");
        assert!(access.contains("HttpOnly"));
        assert!(access.contains("SameSite=Lax"));
        assert!(access.contains("Max-Age=3600"));
        assert!(refresh.contains("HttpOnly"));
        assert!(refresh.contains("Max-Age=604800"));

        let json = body_json(response).await;
        assert_eq!(json["user"]["email"], "resident@example.com");
        assert!(json["token"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_login_failure_is_uniform_401() {
        let (app, repo, _) = setup_app().await;
        seed_user(&repo, "resident@example.com", "CorrectHorse1!").await;

        for body in [
            r#"{"email":"resident@example.com","password":"wrong-password"}"#,
            r#"{"email":"nobody@example.com","password":"CorrectHorse1!"}"#,
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::post("/auth/login")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let json = body_json(response).await;
            assert_eq!(json["detail"], "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_me_accepts_bearer_token() {
        let (app, repo, _) = setup_app().await;
        seed_user(&repo, "resident@example.com", "CorrectHorse1!").await;

        let login = app
            .clone()
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"resident@example.com","password":"CorrectHorse1!"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let token = body_json(login).await["token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::get("/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["email"], "resident@example.com");
        assert_eq!(json["verificationStatus"], "none");
    }

    #[tokio::test]
    async fn test_me_without_token_is_401() {
        let (app, _, _) = setup_app().await;

        let response = app
            .oneshot(Request::get("/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_rotates_cookie_and_rejects_replay() {
        let (app, repo, _) = setup_app().await;
        seed_user(&repo, "resident@example.com", "CorrectHorse1!").await;

        let login = app
            .clone()
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"resident@example.com","password":"CorrectHorse1!"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let refresh_cookie = set_cookies(&login)
            .iter()
            .find(|c| c.starts_with("refresh_token="))
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(
                Request::post("/auth/refresh")
                    .header(header::COOKIE, &refresh_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rotated_cookie = set_cookies(&response)
            .iter()
            .find(|c| c.starts_with("refresh_token="))
            .unwrap()
            .to_string();
        assert!(!rotated_cookie.starts_with(&format!("{refresh_cookie};")));

        // Replaying the old cookie fails and clears both cookies
        let replay = app
            .oneshot(
                Request::post("/auth/refresh")
                    .header(header::COOKIE, &refresh_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
        let cleared = set_cookies(&replay);
        assert!(cleared.iter().any(|c| c.starts_with("access_token=;")));
        assert!(cleared.iter().any(|c| c.starts_with("refresh_token=;")));
    }

    #[tokio::test]
    async fn test_session_records_peer_or_forwarded_ip() {
        let (app, repo, _) = setup_app().await;
        seed_user(&repo, "resident@example.com", "CorrectHorse1!").await;

        let login_body = r#"{"email":"resident@example.com","password":"CorrectHorse1!"}"#;

        // Direct connection: the peer address is stored
        let direct = app
            .clone()
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(login_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(direct.status(), StatusCode::OK);

        // Behind a proxy: X-Forwarded-For takes precedence
        let proxied = app
            .clone()
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-forwarded-for", "203.0.113.9")
                    .body(Body::from(login_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(proxied.status(), StatusCode::OK);
        let token = body_json(proxied).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::get("/auth/sessions")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let ips: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["ip"].as_str().unwrap())
            .collect();
        assert_eq!(ips.len(), 2);
        assert!(ips.contains(&"127.0.0.1"));
        assert!(ips.contains(&"203.0.113.9"));
    }

    #[tokio::test]
    async fn test_seeded_admin_login_me_refresh_replay() {
        use crate::domain::value_object::email::Email;
        use platform::password::ClearTextPassword;

        let (app, repo, _) = setup_app().await;

        let email = Email::new("admin@example.com").unwrap();
        let hash = ClearTextPassword::new_unchecked("ChangeMe123!".to_string())
            .hash()
            .unwrap();
        assert!(
            repo.ensure_default_admin(&email, &hash, "Portal Admin")
                .await
                .unwrap()
        );

        let login = app
            .clone()
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"admin@example.com","password":"ChangeMe123!"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
        let refresh_cookie = set_cookies(&login)
            .iter()
            .find(|c| c.starts_with("refresh_token="))
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        let json = body_json(login).await;
        assert_eq!(json["user"]["role"], "admin");
        let token = json["token"].as_str().unwrap().to_string();

        let me = app
            .clone()
            .oneshot(
                Request::get("/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(body_json(me).await["email"], "admin@example.com");

        let refreshed = app
            .clone()
            .oneshot(
                Request::post("/auth/refresh")
                    .header(header::COOKIE, &refresh_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(refreshed.status(), StatusCode::OK);

        let replay = app
            .oneshot(
                Request::post("/auth/refresh")
                    .header(header::COOKIE, &refresh_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_clears_cookies_even_without_session() {
        let (app, _, _) = setup_app().await;

        let response = app
            .oneshot(Request::post("/auth/logout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(set_cookies(&response).len(), 2);
    }

    #[tokio::test]
    async fn test_csrf_token_endpoint_sets_readable_cookie() {
        let (app, _, _) = setup_app().await;

        let response = app
            .oneshot(
                Request::get("/auth/csrf-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookies(&response);
        let csrf = cookies
            .iter()
            .find(|c| c.starts_with("csrf_token="))
            .expect("csrf cookie");
        assert!(!csrf.contains("HttpOnly"));
        assert!(csrf.contains("SameSite=Strict"));

        let json = body_json(response).await;
        let token = json["csrfToken"].as_str().unwrap();
        assert!(token.contains('.'));
    }

    fn csrf_test_app(config: Arc<AuthConfig>) -> Router {
        Router::new()
            .route("/mutate", post(|| async { StatusCode::OK }))
            .layer(from_fn_with_state(CsrfState { config }, csrf_guard))
    }

    #[tokio::test]
    async fn test_csrf_guard_enforces_double_submit() {
        let config = Arc::new(AuthConfig::development());
        let token = mint_csrf_token();

        // Cookie + matching header passes
        let response = csrf_test_app(config.clone())
            .oneshot(
                Request::post("/mutate")
                    .header(header::COOKIE, format!("csrf_token={token}"))
                    .header(CSRF_HEADER_NAME, &token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Missing header fails
        let response = csrf_test_app(config.clone())
            .oneshot(
                Request::post("/mutate")
                    .header(header::COOKIE, format!("csrf_token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Mismatched header fails
        let other = mint_csrf_token();
        let response = csrf_test_app(config.clone())
            .oneshot(
                Request::post("/mutate")
                    .header(header::COOKIE, format!("csrf_token={token}"))
                    .header(CSRF_HEADER_NAME, &other)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_csrf_guard_skips_safe_methods() {
        let config = Arc::new(AuthConfig::development());
        let app = Router::new()
            .route("/read", axum::routing::get(|| async { StatusCode::OK }))
            .layer(from_fn_with_state(CsrfState { config }, csrf_guard));

        let response = app
            .oneshot(Request::get("/read").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_csrf_guard_rejects_expired_token_and_clears_cookie() {
        let config = Arc::new(AuthConfig::development());

        // Hand-build a token stamped five hours in the past
        let stale_ms = Utc::now().timestamp_millis() - 5 * 3600 * 1000;
        let stamp = {
            // base36, matching the minting format
            let mut n = stale_ms;
            let mut out = Vec::new();
            while n > 0 {
                out.push(b"0123456789abcdefghijklmnopqrstuvwxyz"[(n % 36) as usize]);
                n /= 36;
            }
            out.reverse();
            String::from_utf8(out).unwrap()
        };
        let token = format!("stale-secret.{stamp}");

        let response = csrf_test_app(config)
            .oneshot(
                Request::post("/mutate")
                    .header(header::COOKIE, format!("csrf_token={token}"))
                    .header(CSRF_HEADER_NAME, &token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert!(cookies.iter().any(|c| c.starts_with("csrf_token=;")));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::AuthError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AuthError::SessionInvalid, StatusCode::UNAUTHORIZED),
            (AuthError::Forbidden, StatusCode::FORBIDDEN),
            (AuthError::CsrfRejected, StatusCode::FORBIDDEN),
            (AuthError::SessionNotFound, StatusCode::NOT_FOUND),
            (
                AuthError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_credential_errors_share_a_message() {
        // User enumeration guard: same display text either way
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
    }
}
