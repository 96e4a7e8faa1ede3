use siteapp_core::db::{open_db_in_memory, DbError};
use siteapp_core::{
    allocate_username, AccountRepository, AccountService, LoginError, NewAccount, RegisterError,
    RegisterRequest, SharedAccountRepository, SharedConnection, SqliteAccountRepository,
};
use std::thread;
use std::time::{Duration, Instant};

fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password1: password.to_string(),
        password2: password.to_string(),
    }
}

fn account_count(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM accounts;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn register_with_email_only_allocates_local_part() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteAccountRepository::new(&conn));

    let account = service
        .register(&request("", "Ana.Silva@example.com", "segredo"))
        .unwrap();

    assert_eq!(account.username, "ana.silva");
    assert_eq!(account.email.as_deref(), Some("Ana.Silva@example.com"));
    assert!(!account.is_staff);
    assert!(!account.is_superuser);
    assert_ne!(account.password_hash, "segredo");
}

#[test]
fn register_rejects_duplicate_email_ignoring_case() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteAccountRepository::new(&conn));

    service
        .register(&request("", "Ana.Silva@example.com", "segredo"))
        .unwrap();
    let err = service
        .register(&request("", "ana.silva@EXAMPLE.com", "outra"))
        .unwrap_err();

    assert!(matches!(err, RegisterError::DuplicateEmail));
    assert_eq!(err.user_message(), "Já existe uma conta com este e-mail.");
    assert_eq!(account_count(&conn), 1);
}

#[test]
fn register_without_password_or_with_mismatch_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteAccountRepository::new(&conn));

    let cases = [
        ("", ""),
        ("abc", ""),
        ("", "abc"),
        ("abc", "abd"),
        ("abc", "ABC"),
    ];
    for (password1, password2) in cases {
        let req = RegisterRequest {
            username: "carlos".to_string(),
            email: String::new(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        };
        let err = service.register(&req).unwrap_err();
        assert!(matches!(
            err,
            RegisterError::MissingPassword | RegisterError::PasswordMismatch
        ));
    }

    assert_eq!(account_count(&conn), 0);
}

#[test]
fn register_without_username_or_email_uses_fallback() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteAccountRepository::new(&conn));

    let first = service.register(&request("", "", "x")).unwrap();
    let second = service.register(&request("", "  ", "x")).unwrap();

    assert_eq!(first.username, "user");
    assert_eq!(second.username, "user1");
    assert_eq!(second.email, None);
}

#[test]
fn colliding_usernames_get_numeric_suffixes() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteAccountRepository::new(&conn));

    let names: Vec<String> = ["Pedro", "pedro", "PEDRO!", "pedro"]
        .into_iter()
        .map(|name| service.register(&request(name, "", "x")).unwrap().username)
        .collect();

    assert_eq!(names, ["pedro", "pedro1", "pedro2", "pedro3"]);
}

#[test]
fn allocator_always_returns_an_unused_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::new(&conn);

    for existing in ["rita", "RITA1", "rita3"] {
        repo.create_account(&NewAccount {
            username: existing.to_string(),
            email: None,
            password_hash: "x".to_string(),
        })
        .unwrap();
    }

    let allocated = allocate_username(&repo, "rita").unwrap();
    assert_eq!(allocated, "rita2");
    assert!(!repo.username_exists_ci(&allocated).unwrap());
    assert_eq!(allocate_username(&repo, "livre").unwrap(), "livre");
}

#[test]
fn login_accepts_username_or_email() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteAccountRepository::new(&conn));

    let registered = service
        .register(&request("bruno", "Bruno@Example.com", "senha1"))
        .unwrap();
    assert_eq!(registered.last_login_at, None);

    let by_name = service.authenticate("bruno", "senha1").unwrap();
    assert_eq!(by_name.id, registered.id);
    assert!(by_name.last_login_at.is_some());

    let by_email = service.authenticate(" bruno@example.COM ", "senha1").unwrap();
    assert_eq!(by_email.id, registered.id);
}

#[test]
fn login_distinguishes_unknown_identifier_from_wrong_password() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteAccountRepository::new(&conn));

    service
        .register(&request("bruno", "bruno@example.com", "senha1"))
        .unwrap();

    let err = service.authenticate("bruno", "errada").unwrap_err();
    assert!(matches!(err, LoginError::IncorrectPassword));
    assert_eq!(err.user_message(), "Senha incorreta.");

    let err = service.authenticate("bruno@example.com", "errada").unwrap_err();
    assert!(matches!(err, LoginError::IncorrectPassword));

    // Username existence is checked ignoring case.
    let err = service.authenticate("BRUNO", "errada").unwrap_err();
    assert!(matches!(err, LoginError::IncorrectPassword));

    let err = service.authenticate("ninguem", "senha1").unwrap_err();
    assert!(matches!(err, LoginError::IdentifierNotFound));
    assert_eq!(err.user_message(), "Usuário/E-mail não encontrado.");
}

#[test]
fn login_requires_both_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteAccountRepository::new(&conn));

    assert!(matches!(
        service.authenticate("   ", "x"),
        Err(LoginError::MissingCredentials)
    ));
    assert!(matches!(
        service.authenticate("bruno", ""),
        Err(LoginError::MissingCredentials)
    ));
}

#[test]
fn login_with_corrupted_hash_fails_as_wrong_password() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::new(&conn);
    repo.create_account(&NewAccount {
        username: "legado".to_string(),
        email: None,
        password_hash: "not-a-phc-string".to_string(),
    })
    .unwrap();

    let service = AccountService::new(repo);
    let err = service.authenticate("legado", "qualquer").unwrap_err();
    assert!(matches!(err, LoginError::IncorrectPassword));
}

#[test]
fn shared_repository_registers_and_logs_in() {
    let db = SharedConnection::new(open_db_in_memory().unwrap());
    let service = AccountService::new(SharedAccountRepository::new(db.clone()));

    let registered = service
        .register(&request("", "Carla@example.com", "senha"))
        .unwrap();
    let logged_in = service.authenticate("carla@example.com", "senha").unwrap();
    assert_eq!(logged_in.id, registered.id);

    let count = db
        .with(|conn| Ok::<_, DbError>(account_count(conn)))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn password_hashing_does_not_hold_the_shared_connection() {
    let db = SharedConnection::new(open_db_in_memory().unwrap());
    let service = AccountService::new(SharedAccountRepository::new(db.clone()));

    let mut max_wait = Duration::ZERO;
    let started_at = Instant::now();
    let total = thread::scope(|scope| {
        let worker = scope.spawn(|| {
            service
                .register(&request("dora", "", "uma-senha-longa"))
                .unwrap();
            service.authenticate("dora", "uma-senha-longa").unwrap();
            started_at.elapsed()
        });

        while !worker.is_finished() {
            let waited_from = Instant::now();
            db.with(|_| Ok::<_, DbError>(())).unwrap();
            max_wait = max_wait.max(waited_from.elapsed());
            thread::sleep(Duration::from_millis(1));
        }
        worker.join().unwrap()
    });

    assert!(
        max_wait < total / 2,
        "waited {max_wait:?} for the connection during a {total:?} register+login"
    );
}
