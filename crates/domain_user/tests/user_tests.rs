//! Tests for the user aggregate

use chrono::{Duration, Utc};

use core_kernel::{Email, Role};
use domain_user::{NewUser, ProfileUpdate, User, UserError, RESET_TOKEN_TTL_MINUTES};

fn registration() -> NewUser {
    NewUser {
        email: Email::parse("budi@kampus.ac.id").unwrap(),
        name: "  Budi Santoso ".to_string(),
        password_hash: "$argon2id$stub".to_string(),
        phone: Some("081234567890".to_string()),
        address: Some("  ".to_string()),
    }
}

mod registration_tests {
    use super::*;

    #[test]
    fn test_register_creates_unverified_user() {
        let user = User::register(registration()).unwrap();

        assert_eq!(user.role, Role::User);
        assert!(!user.is_verified);
        assert!(user.verification_token.is_some());
        assert_eq!(user.name, "Budi Santoso");
        assert_eq!(user.address, None);
    }

    #[test]
    fn test_register_rejects_blank_name() {
        let mut new = registration();
        new.name = "   ".to_string();
        assert!(matches!(User::register(new), Err(UserError::InvalidData(_))));
    }

    #[test]
    fn test_register_rejects_bad_phone() {
        let mut new = registration();
        new.phone = Some("12ab".to_string());
        assert!(matches!(User::register(new), Err(UserError::InvalidData(_))));
    }

    #[test]
    fn test_admin_is_verified() {
        let admin = User::admin(Email::parse("admin@kampus.ac.id").unwrap(), "Admin", "h".into());
        assert!(admin.is_admin());
        assert!(admin.is_verified);
    }
}

mod verification_tests {
    use super::*;

    #[test]
    fn test_verify_with_correct_token() {
        let mut user = User::register(registration()).unwrap();
        let token = user.verification_token.clone().unwrap();

        user.verify_email(&token).unwrap();

        assert!(user.is_verified);
        assert!(user.verification_token.is_none());
    }

    #[test]
    fn test_verify_with_wrong_token() {
        let mut user = User::register(registration()).unwrap();
        assert_eq!(user.verify_email("wrong"), Err(UserError::InvalidToken));
        assert!(!user.is_verified);
    }

    #[test]
    fn test_verify_twice_is_a_no_op() {
        let mut user = User::register(registration()).unwrap();
        let token = user.verification_token.clone().unwrap();
        user.verify_email(&token).unwrap();

        assert!(user.verify_email(&token).is_ok());
    }
}

mod reset_tests {
    use super::*;

    #[test]
    fn test_reset_password_within_window() {
        let mut user = User::register(registration()).unwrap();
        let now = Utc::now();
        let token = user.issue_reset_token(now);

        user.reset_password(&token, "new-hash".into(), now + Duration::minutes(5))
            .unwrap();

        assert_eq!(user.password_hash, "new-hash");
        assert!(user.reset_token.is_none());
    }

    #[test]
    fn test_reset_password_after_expiry() {
        let mut user = User::register(registration()).unwrap();
        let now = Utc::now();
        let token = user.issue_reset_token(now);
        let later = now + Duration::minutes(RESET_TOKEN_TTL_MINUTES + 1);

        assert_eq!(
            user.reset_password(&token, "new-hash".into(), later),
            Err(UserError::TokenExpired)
        );
        assert!(user.reset_token.is_none());
        assert_eq!(user.password_hash, "$argon2id$stub");
    }

    #[test]
    fn test_new_reset_token_invalidates_previous() {
        let mut user = User::register(registration()).unwrap();
        let now = Utc::now();
        let first = user.issue_reset_token(now);
        let _second = user.issue_reset_token(now);

        assert_eq!(
            user.reset_password(&first, "x".into(), now),
            Err(UserError::InvalidToken)
        );
    }
}

mod profile_tests {
    use super::*;

    #[test]
    fn test_apply_profile_returns_replaced_photo() {
        let mut user = User::register(registration()).unwrap();

        let first = user
            .apply_profile(ProfileUpdate {
                photo: Some("profiles/a.png".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(first, None);

        let replaced = user
            .apply_profile(ProfileUpdate {
                name: Some("Budi S.".into()),
                photo: Some("profiles/b.png".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(replaced.as_deref(), Some("profiles/a.png"));
        assert_eq!(user.photo.as_deref(), Some("profiles/b.png"));
        assert_eq!(user.name, "Budi S.");
    }

    #[test]
    fn test_apply_profile_clears_phone_with_blank_value() {
        let mut user = User::register(registration()).unwrap();
        user.apply_profile(ProfileUpdate {
            phone: Some("".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(user.phone, None);
    }

    #[test]
    fn test_apply_profile_rejects_invalid_phone() {
        let mut user = User::register(registration()).unwrap();
        let result = user.apply_profile(ProfileUpdate {
            phone: Some("abc".into()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(user.phone.as_deref(), Some("081234567890"));
    }
}
