//! Account and session use-case service.
//!
//! # Responsibility
//! - Register accounts and verify credentials.
//! - Issue, restore and invalidate explicit `Session` values.
//! - Keep the persisted current-user cache in sync with profile edits.
//!
//! # Invariants
//! - Unknown email and wrong password fail with the same error.
//! - Nothing is written when login fails.
//! - Password hashes never leave this module; callers only see `PublicUser`.
//!
//! # See also
//! - `crate::crypto` for hashing and token format.

use super::log_failure;
use crate::crypto::{hash_password, issue_auth_token, verify_password};
use crate::logging::mask_email;
use crate::model::user::{ProfileUpdate, PublicUser, User};
use crate::model::validation::{
    validate_email, validate_name, validate_new_password, ValidationError,
};
use crate::model::RecordId;
use crate::repo::collection_repo::{CollectionRepository, RepoError};
use crate::store::{
    get_item, get_secure_item, remove_secure_item, set_item, set_secure_item, KeyValueStore,
    SecureStore, StoreError, AUTH_TOKEN_KEY, CURRENT_USER_KEY,
};
use chrono::Utc;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug)]
pub enum AuthError {
    Validation(ValidationError),
    /// Another account already uses this email (case-insensitive).
    DuplicateEmail,
    /// Unknown email or wrong password; deliberately indistinguishable.
    InvalidCredentials,
    UserNotFound(RecordId),
    Store(StoreError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateEmail => write!(f, "email already registered"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::DuplicateEmail | Self::InvalidCredentials | Self::UserNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { id, .. } => Self::UserNotFound(id),
            RepoError::Store(err) => Self::Store(err),
        }
    }
}

/// Authenticated session state owned by the caller.
///
/// Dropping a session does not log out; call [`AuthService::logout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

pub struct AuthService<'s, S: ?Sized, K: ?Sized> {
    store: &'s S,
    secure: &'s K,
    users: CollectionRepository<'s, S, User>,
}

impl<'s, S, K> AuthService<'s, S, K>
where
    S: KeyValueStore + ?Sized,
    K: SecureStore + ?Sized,
{
    pub fn new(store: &'s S, secure: &'s K) -> Self {
        Self {
            store,
            secure,
            users: CollectionRepository::new(store),
        }
    }

    /// Creates a `user`-role account.
    ///
    /// # Errors
    /// - `Validation` for a blank name, malformed email or short password.
    /// - `DuplicateEmail` when the email is taken; storage is untouched.
    pub fn register(&self, name: &str, email: &str, password: &str) -> AuthResult<PublicUser> {
        log_failure("auth_register", self.register_inner(name, email, password))
    }

    fn register_inner(&self, name: &str, email: &str, password: &str) -> AuthResult<PublicUser> {
        validate_name(name)?;
        validate_email(email)?;
        validate_new_password(password)?;

        let mut users = self.users.load_for_write()?;
        if users.iter().any(|user| user.email_matches(email)) {
            return Err(AuthError::DuplicateEmail);
        }

        let user = User::new(name.trim(), email.trim(), hash_password(password));
        let public = user.to_public();
        users.push(user);
        self.users.save_all(&users)?;

        info!(
            "event=auth_register module=service status=ok user_id={} email={}",
            public.id,
            mask_email(&public.email)
        );
        Ok(public)
    }

    /// Verifies credentials, stores the token and current-user cache, and
    /// returns the new session.
    pub fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        log_failure("auth_login", self.login_inner(email, password))
    }

    fn login_inner(&self, email: &str, password: &str) -> AuthResult<Session> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        let user = self
            .users
            .find(|user| user.email_matches(email))
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or(AuthError::InvalidCredentials)?;

        let token = issue_auth_token(user.id, Utc::now());
        set_secure_item(self.secure, AUTH_TOKEN_KEY, &token)?;

        let public = user.to_public();
        if let Err(err) = set_item(self.store, CURRENT_USER_KEY, &public) {
            if let Err(rollback_err) = remove_secure_item(self.secure, AUTH_TOKEN_KEY) {
                warn!(
                    "event=auth_login module=service status=rollback_failed error={rollback_err}"
                );
            }
            return Err(err.into());
        }

        info!(
            "event=auth_login module=service status=ok user_id={}",
            public.id
        );
        Ok(Session {
            user: public,
            token,
        })
    }

    /// Invalidates `session`: removes the token and clears the cache.
    pub fn logout(&self, session: Session) -> AuthResult<()> {
        let result = remove_secure_item(self.secure, AUTH_TOKEN_KEY)
            .and_then(|()| set_item(self.store, CURRENT_USER_KEY, &None::<PublicUser>))
            .map_err(AuthError::from);
        log_failure("auth_logout", result)?;

        info!(
            "event=auth_logout module=service status=ok user_id={}",
            session.user.id
        );
        Ok(())
    }

    /// Rebuilds the session persisted by the last login.
    ///
    /// Returns `None` unless both the token and the cached user exist.
    pub fn restore_session(&self) -> Option<Session> {
        let token = get_secure_item(self.secure, AUTH_TOKEN_KEY)?;
        let user = get_item::<PublicUser, _>(self.store, CURRENT_USER_KEY)?;
        Some(Session { user, token })
    }

    /// Applies `update` to the account.
    ///
    /// The persisted current-user cache is rewritten when it holds this
    /// user, and `session` is refreshed in place when it belongs to them.
    pub fn update_profile(
        &self,
        user_id: RecordId,
        update: ProfileUpdate,
        session: Option<&mut Session>,
    ) -> AuthResult<PublicUser> {
        log_failure(
            "auth_update_profile",
            self.update_profile_inner(user_id, update, session),
        )
    }

    fn update_profile_inner(
        &self,
        user_id: RecordId,
        update: ProfileUpdate,
        session: Option<&mut Session>,
    ) -> AuthResult<PublicUser> {
        if let Some(name) = update.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(email) = update.email.as_deref() {
            validate_email(email)?;
        }

        let updated = self.users.update(user_id, |user| {
            if let Some(name) = update.name {
                user.name = name.trim().to_string();
            }
            if let Some(email) = update.email {
                user.email = email.trim().to_string();
            }
            if let Some(role) = update.role {
                user.role = role;
            }
            user.updated_at = Utc::now();
        })?;
        let public = updated.to_public();

        let cached = get_item::<PublicUser, _>(self.store, CURRENT_USER_KEY);
        if cached.is_some_and(|cached| cached.id == user_id) {
            set_item(self.store, CURRENT_USER_KEY, &public)?;
        }
        if let Some(session) = session.filter(|session| session.user.id == user_id) {
            session.user = public.clone();
        }

        Ok(public)
    }

    /// Replaces the password after checking the current one.
    pub fn change_password(
        &self,
        user_id: RecordId,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        log_failure(
            "auth_change_password",
            self.change_password_inner(user_id, current_password, new_password),
        )
    }

    fn change_password_inner(
        &self,
        user_id: RecordId,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        let user = self
            .users
            .get(user_id)
            .ok_or(AuthError::UserNotFound(user_id))?;
        if !verify_password(current_password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        validate_new_password(new_password)?;

        let new_hash = hash_password(new_password);
        self.users.update(user_id, |user| {
            user.password_hash = new_hash;
            user.updated_at = Utc::now();
        })?;

        info!("event=auth_change_password module=service status=ok user_id={user_id}");
        Ok(())
    }
}
