//! User service for registration and credential verification

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::domain::user::{
    normalize_email, require_credentials, validate_email, validate_password, NewUser, User,
    UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Message returned when an email is already taken
pub const ALREADY_REGISTERED: &str = "User already registered";

/// Hashed once and verified against when the email is unknown
const PLACEHOLDER_PASSWORD: &str = "placeholder-password-for-unknown-users";

/// User service for registration and authentication
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    placeholder_hash: OnceCell<String>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            repository,
            hasher,
            placeholder_hash: OnceCell::new(),
        }
    }

    /// Register a new user
    ///
    /// Fields are optional so that an absent field is reported as a
    /// validation failure rather than a malformed request.
    pub async fn register(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, DomainError> {
        let (email, password) =
            require_credentials(email, password).map_err(|e| DomainError::validation(e.to_string()))?;

        let email = normalize_email(email);
        validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(&email).await? {
            return Err(DomainError::validation(ALREADY_REGISTERED));
        }

        let password_hash = self.hasher.hash(password)?;

        // The store has the final word when two registrations race
        match self.repository.create(NewUser::new(email, password_hash)).await {
            Err(DomainError::Conflict { .. }) => Err(DomainError::validation(ALREADY_REGISTERED)),
            other => other,
        }
    }

    /// Authenticate a user with email and password
    ///
    /// Returns `Ok(None)` for an unknown email and for a wrong password alike.
    /// An unknown email still pays for one password verification so both
    /// outcomes take the same time.
    pub async fn authenticate(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<User>, DomainError> {
        let (Some(email), Some(password)) = (email, password) else {
            return Ok(None);
        };

        let user = match self.repository.get_by_email(&normalize_email(email)).await? {
            Some(u) => u,
            None => {
                let placeholder = self
                    .placeholder_hash
                    .get_or_try_init(|| self.hasher.hash(PLACEHOLDER_PASSWORD))?;
                self.hasher.verify(password, placeholder);
                return Ok(None);
            }
        };

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());
        UserService::new(repository, hasher)
    }

    #[tokio::test]
    async fn test_register_user() {
        let service = create_service();

        let user = service.register(Some("a@x.com"), Some("pw123")).await.unwrap();

        assert_eq!(user.email(), "a@x.com");
        assert_ne!(user.password_hash(), "pw123");
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_trims_email() {
        let service = create_service();

        let user = service.register(Some("  a@x.com "), Some("pw123")).await.unwrap();
        assert_eq!(user.email(), "a@x.com");

        let found = service
            .authenticate(Some("a@x.com"), Some("pw123"))
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let service = create_service();

        for (email, password) in [
            (None, Some("pw123")),
            (Some("a@x.com"), None),
            (Some(""), Some("pw123")),
            (Some("a@x.com"), Some("")),
        ] {
            let err = service.register(email, password).await.unwrap_err();
            match err {
                DomainError::Validation { message } => {
                    assert_eq!(message, "Email and password are required")
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let service = create_service();

        let result = service.register(Some("not-an-email"), Some("pw123")).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_password_too_long() {
        let service = create_service();
        let password = "p".repeat(129);

        let result = service.register(Some("a@x.com"), Some(&password)).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_service();

        service.register(Some("a@x.com"), Some("pw123")).await.unwrap();
        let err = service
            .register(Some("a@x.com"), Some("other"))
            .await
            .unwrap_err();

        match err {
            DomainError::Validation { message } => assert_eq!(message, ALREADY_REGISTERED),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = create_service();
        let registered = service.register(Some("a@x.com"), Some("pw123")).await.unwrap();

        let user = service
            .authenticate(Some("a@x.com"), Some("pw123"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.id(), registered.id());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_and_unknown_email() {
        let service = create_service();
        service.register(Some("a@x.com"), Some("pw123")).await.unwrap();

        let wrong_password = service
            .authenticate(Some("a@x.com"), Some("wrong"))
            .await
            .unwrap();
        let unknown_email = service
            .authenticate(Some("b@x.com"), Some("pw123"))
            .await
            .unwrap();
        let missing = service.authenticate(None, Some("pw123")).await.unwrap();

        assert!(wrong_password.is_none());
        assert!(unknown_email.is_none());
        assert!(missing.is_none());
    }

    /// Cheap hasher that records every verification
    #[derive(Debug, Default)]
    struct RecordingHasher {
        hashes: AtomicUsize,
        verifications: Mutex<Vec<(String, String)>>,
    }

    impl PasswordHasher for RecordingHasher {
        fn hash(&self, password: &str) -> Result<String, DomainError> {
            self.hashes.fetch_add(1, Ordering::SeqCst);
            Ok(format!("hashed:{}", password))
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            self.verifications
                .lock()
                .unwrap()
                .push((password.to_string(), hash.to_string()));
            hash == format!("hashed:{}", password)
        }
    }

    #[tokio::test]
    async fn test_unknown_email_still_verifies_a_password() {
        let hasher = Arc::new(RecordingHasher::default());
        let service = UserService::new(Arc::new(InMemoryUserRepository::new()), hasher.clone());

        for _ in 0..2 {
            let user = service
                .authenticate(Some("ghost@x.com"), Some("pw123"))
                .await
                .unwrap();
            assert!(user.is_none());
        }

        let verifications = hasher.verifications.lock().unwrap();
        assert_eq!(verifications.len(), 2);
        assert!(verifications.iter().all(|(password, _)| password == "pw123"));
        // The placeholder hash is computed once and reused
        assert_eq!(hasher.hashes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_placeholder_never_authenticates() {
        let service = create_service();

        let user = service
            .authenticate(Some("ghost@x.com"), Some(PLACEHOLDER_PASSWORD))
            .await
            .unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let repository = Arc::new(MockUserRepository::new());
        repository.set_should_fail(true).await;
        let service = UserService::new(repository, Arc::new(Argon2Hasher::new()));

        let register = service.register(Some("a@x.com"), Some("pw123")).await;
        let login = service.authenticate(Some("a@x.com"), Some("pw123")).await;

        assert!(matches!(register, Err(DomainError::Storage { .. })));
        assert!(matches!(login, Err(DomainError::Storage { .. })));
    }
}
