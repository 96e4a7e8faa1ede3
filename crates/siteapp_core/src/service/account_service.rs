//! Account login and registration use-cases.
//!
//! # Responsibility
//! - Resolve a username-or-email identifier plus password to an account.
//! - Register self-service accounts with an allocated username.
//!
//! # Invariants
//! - Failed logins report either "identifier not found" or "password
//!   incorrect". The existence check behind that split reveals whether a
//!   username is registered; this is a known weakness of the login form.
//! - No account is created unless both password fields are present and equal.
//! - Registered accounts never carry staff or superuser flags.

use crate::model::account::{Account, NewAccount};
use crate::password::{hash_password, verify_password, PasswordError};
use crate::repo::account_repo::AccountRepository;
use crate::repo::RepoError;
use crate::service::username::{allocate_username, username_base};
use log::{info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failed login outcome.
#[derive(Debug)]
pub enum LoginError {
    /// Identifier or password left blank.
    MissingCredentials,
    /// No account matches the identifier as username or email.
    IdentifierNotFound,
    /// An account matches but the password does not.
    IncorrectPassword,
    Repo(RepoError),
}

impl LoginError {
    /// Message shown inline on the login form.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredentials => "Preencha usuário/e-mail e senha.".to_string(),
            Self::IdentifierNotFound => "Usuário/E-mail não encontrado.".to_string(),
            Self::IncorrectPassword => "Senha incorreta.".to_string(),
            Self::Repo(err) => format!("Erro ao autenticar: {err}"),
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::IdentifierNotFound => "identifier_not_found",
            Self::IncorrectPassword => "password_incorrect",
            Self::Repo(_) => "repo_error",
        }
    }
}

impl Display for LoginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "identifier and password are required"),
            Self::IdentifierNotFound => write!(f, "no account matches the identifier"),
            Self::IncorrectPassword => write!(f, "incorrect password"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoginError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LoginError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Failed registration outcome.
#[derive(Debug)]
pub enum RegisterError {
    /// One of the two password fields is blank.
    MissingPassword,
    PasswordMismatch,
    /// Another account already uses this email (ignoring case).
    DuplicateEmail,
    Password(PasswordError),
    Repo(RepoError),
    /// The account row vanished between insert and read-back.
    InconsistentState(&'static str),
}

impl RegisterError {
    /// Message shown inline on the registration form.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingPassword => "Informe e confirme a senha.".to_string(),
            Self::PasswordMismatch => "As senhas não conferem.".to_string(),
            Self::DuplicateEmail => "Já existe uma conta com este e-mail.".to_string(),
            other => format!("Erro ao criar conta: {other}"),
        }
    }
}

impl Display for RegisterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPassword => write!(f, "password and confirmation are required"),
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::DuplicateEmail => write!(f, "email already registered"),
            Self::Password(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent account state: {details}"),
        }
    }
}

impl Error for RegisterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Password(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RegisterError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PasswordError> for RegisterError {
    fn from(value: PasswordError) -> Self {
        Self::Password(value)
    }
}

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    /// Optional; derived from the email when blank.
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

impl RegisterRequest {
    fn normalized_email(&self) -> Option<&str> {
        Some(self.email.trim()).filter(|email| !email.is_empty())
    }
}

/// Account use-cases over a repository implementation.
pub struct AccountService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Resolves `identifier` (username or email) and `password` to an account.
    ///
    /// Tries the identifier as an exact username first, then as an email
    /// (ignoring case). Records the login time on success.
    pub fn authenticate(&self, identifier: &str, password: &str) -> Result<Account, LoginError> {
        let result = self.resolve(identifier.trim(), password);
        match &result {
            Ok(account) => info!(
                "event=login module=account status=ok account_id={}",
                account.id
            ),
            Err(err) => warn!(
                "event=login module=account status=error reason={}",
                err.reason()
            ),
        }
        result
    }

    fn resolve(&self, identifier: &str, password: &str) -> Result<Account, LoginError> {
        if identifier.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        if let Some(account) = self.repo.find_by_username(identifier)? {
            if password_matches(&account, password) {
                return self.complete_login(account);
            }
        }

        match self.repo.find_by_email_ci(identifier)? {
            Some(account) if password_matches(&account, password) => self.complete_login(account),
            Some(_) => Err(LoginError::IncorrectPassword),
            None if self.repo.username_exists_ci(identifier)? => {
                Err(LoginError::IncorrectPassword)
            }
            None => Err(LoginError::IdentifierNotFound),
        }
    }

    fn complete_login(&self, mut account: Account) -> Result<Account, LoginError> {
        self.repo.record_login(account.id)?;
        if let Some(refreshed) = self.repo.get_account(account.id)? {
            account = refreshed;
        }
        Ok(account)
    }

    /// Registers a new account and returns it.
    ///
    /// The username comes from `request.username`, else the email's local
    /// part, else the fallback literal, made unique with a numeric suffix.
    pub fn register(&self, request: &RegisterRequest) -> Result<Account, RegisterError> {
        if request.password1.is_empty() || request.password2.is_empty() {
            return Err(RegisterError::MissingPassword);
        }
        if request.password1 != request.password2 {
            return Err(RegisterError::PasswordMismatch);
        }

        let email = request.normalized_email();
        let base = username_base(&request.username, email);
        let username = allocate_username(&self.repo, &base)?;

        if let Some(email) = email {
            if self.repo.email_exists_ci(email)? {
                warn!("event=register module=account status=error reason=duplicate_email");
                return Err(RegisterError::DuplicateEmail);
            }
        }

        let new_account = NewAccount {
            username,
            email: email.map(str::to_string),
            password_hash: hash_password(&request.password1)?,
        };
        let id = self.repo.create_account(&new_account)?;

        info!(
            "event=register module=account status=ok account_id={} username={}",
            id, new_account.username
        );

        self.repo
            .get_account(id)?
            .ok_or(RegisterError::InconsistentState(
                "created account not found in read-back",
            ))
    }
}

fn password_matches(account: &Account, password: &str) -> bool {
    match verify_password(password, &account.password_hash) {
        Ok(()) => true,
        Err(PasswordError::Mismatch) => false,
        Err(err) => {
            warn!(
                "event=password_verify module=account status=error account_id={} error={}",
                account.id, err
            );
            false
        }
    }
}
