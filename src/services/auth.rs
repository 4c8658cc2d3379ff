//! Registration and login.
//!
//! Registration creates the User and its Profile and Settings records in a
//! single transaction, so a mid-sequence failure never leaves partial state.
//! Conflict pre-checks are best-effort; the partial unique indexes are the
//! final authority and their violations map to the same conflict errors.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::auth::jwt::JwtManager;
use crate::auth::password;
use crate::error::ServiceError;
use crate::models::{
    age_on, valid_email, valid_username, NewUserIdentity, PublicUser, User, UserIdentity,
};

#[derive(Debug)]
pub struct RegisterInput {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub interested_in: Vec<String>,
}

pub async fn register(
    pool: &PgPool,
    jwt: &JwtManager,
    input: RegisterInput,
) -> Result<(PublicUser, String), ServiceError> {
    let fullname = input.fullname.trim().to_string();
    let username = input.username.trim().to_lowercase();
    let email = input.email.trim().to_lowercase();
    let gender = input.gender.trim().to_string();

    if fullname.is_empty() {
        return Err(ServiceError::missing_field("fullname"));
    }
    if input.password.is_empty() {
        return Err(ServiceError::missing_field("password"));
    }
    if gender.is_empty() {
        return Err(ServiceError::missing_field("gender"));
    }
    if !valid_username(&username) {
        return Err(ServiceError::validation(
            "INVALID_USERNAME",
            "Username must be 3-30 characters: lowercase letters, digits, '-', '_' or '.'",
        ));
    }
    if !valid_email(&email) {
        return Err(ServiceError::validation(
            "INVALID_EMAIL",
            "Invalid email address",
        ));
    }
    if age_on(input.dob, Utc::now().date_naive()) < 18 {
        return Err(ServiceError::underage());
    }

    // Best-effort pre-checks for friendlier conflict reporting under no
    // contention; the unique indexes still win any race.
    let email_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(&email)
            .fetch_one(pool)
            .await?;
    if email_exists {
        return Err(ServiceError::email_taken());
    }

    let username_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(&username)
            .fetch_one(pool)
            .await?;
    if username_exists {
        return Err(ServiceError::username_taken());
    }

    let identity = NewUserIdentity::Email {
        email,
        password_hash: password::hash_password(&input.password)?,
    };
    let (email_col, password_col, wallet_col) = identity.columns();

    // User + Profile + Settings are created atomically.
    let mut tx = pool.begin().await?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (fullname, username, email, password_hash, wallet_address)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&fullname)
    .bind(&username)
    .bind(email_col)
    .bind(password_col)
    .bind(wallet_col)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_unique_violation)?;

    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, name, dob, gender, interested_in)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user.id)
    .bind(&fullname)
    .bind(input.dob)
    .bind(&gender)
    .bind(&input.interested_in)
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO settings (user_id) VALUES ($1)")
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Registered new user");

    let token = jwt.generate_token(user.id)?;
    Ok((PublicUser::from(user), token))
}

/// The failure is identical for an unknown email and a wrong password, so
/// the response never reveals whether an account exists.
pub async fn login(
    pool: &PgPool,
    jwt: &JwtManager,
    email: &str,
    password_input: &str,
) -> Result<String, ServiceError> {
    let email = email.trim().to_lowercase();

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    let Some(user) = user else {
        return Err(ServiceError::invalid_credentials());
    };

    let verified = match user.identity() {
        Some(UserIdentity::Email {
            password_hash: Some(hash),
            ..
        }) => password::verify_password(password_input, hash),
        _ => false,
    };

    if !verified {
        return Err(ServiceError::invalid_credentials());
    }

    jwt.generate_token(user.id)
}

fn map_unique_violation(e: sqlx::Error) -> ServiceError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            match db.constraint() {
                Some("users_email_key") => return ServiceError::email_taken(),
                Some("users_username_key") => return ServiceError::username_taken(),
                Some("users_wallet_key") => return ServiceError::wallet_taken(),
                _ => {}
            }
        }
    }
    ServiceError::Store(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_input_validation_order() {
        // Pure validation failures are detectable without a pool; exercise
        // the field rules the service applies before touching the store.
        assert!(!valid_username("Jane"));
        assert!(valid_username("jane"));
        assert!(!valid_email("jane"));

        let today = Utc::now().date_naive();
        let seventeen = today
            .checked_sub_months(chrono::Months::new(12 * 17))
            .unwrap();
        assert!(age_on(seventeen, today) < 18);

        let eighteen = today
            .checked_sub_months(chrono::Months::new(12 * 18))
            .unwrap();
        assert!(age_on(eighteen, today) >= 18);
    }
}
