//! Account service.
//!
//! Sign-up, sign-in, and profile management. Authentication is an opaque
//! bearer token stored on the user row; passwords are Argon2 hashes kept
//! on the profile row.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use echocity_common::{AppError, AppResult, IdGenerator};
use echocity_db::{
    entities::{profile, profile::AppRole, user},
    repositories::{ProfileRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 256))]
    pub full_name: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 2048))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub city: String,

    #[validate(length(min = 1, max = 128))]
    pub state: String,

    #[validate(length(max = 16))]
    pub pincode: Option<String>,
}

/// Input for signing in.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Input for updating a profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 256))]
    pub full_name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 2048))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub state: Option<String>,

    #[validate(length(max = 16))]
    pub pincode: Option<String>,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(user_repo: UserRepository, profile_repo: ProfileRepository) -> Self {
        Self {
            user_repo,
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new citizen account.
    pub async fn sign_up(&self, input: SignUpInput) -> AppResult<(user::Model, profile::Model)> {
        input.validate()?;

        // Check if username is taken
        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }

        // Hash password
        let password_hash = hash_password(&input.password)?;

        // Generate token and user ID
        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();

        // Create user
        let user_model = user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            token: Set(Some(token)),
            ..Default::default()
        };

        let user = self.user_repo.create(user_model).await?;

        // Create profile with password hash; accounts always start as citizens
        let profile_model = profile::ActiveModel {
            user_id: Set(user_id),
            password: Set(Some(password_hash)),
            full_name: Set(input.full_name),
            phone: Set(input.phone),
            address: Set(input.address),
            city: Set(input.city),
            state: Set(input.state),
            pincode: Set(input.pincode),
            role: Set(AppRole::Citizen),
            ..Default::default()
        };

        let profile = self.profile_repo.create(profile_model).await?;

        Ok((user, profile))
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Get a user's profile.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<profile::Model> {
        self.profile_repo.get_by_user_id(user_id).await
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Authenticate a user by username and password.
    pub async fn authenticate(&self, input: SignInInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let profile = self
            .profile_repo
            .find_by_user_id(&user.id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let password_hash = profile.password.ok_or(AppError::Unauthorized)?;
        if !verify_password(&input.password, &password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Regenerate a user's authentication token.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;

        Ok(new_token)
    }

    /// Update a user's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<profile::Model> {
        input.validate()?;

        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let mut active: profile::ActiveModel = profile.into();

        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(city) = input.city {
            active.city = Set(city);
        }
        if let Some(state) = input.state {
            active.state = Set(state);
        }
        if let Some(pincode) = input.pincode {
            active.pincode = Set(Some(pincode));
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.profile_repo.update(active).await
    }

    /// Set a user's role.
    pub async fn set_role(&self, user_id: &str, role: AppRole) -> AppResult<profile::Model> {
        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let mut active: profile::ActiveModel = profile.into();
        active.role = Set(role);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.profile_repo.update(active).await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
