//! Tests for roles and actors

use core_kernel::{Actor, CoreError, Email, Role};

#[test]
fn test_role_round_trips_through_str() {
    assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
    assert_eq!(Role::Admin.to_string(), "admin");
}

#[test]
fn test_unknown_role_is_rejected() {
    assert_eq!(
        "superuser".parse::<Role>(),
        Err(CoreError::UnknownRole("superuser".to_string()))
    );
}

#[test]
fn test_actor_ownership() {
    let owner = Email::parse("budi@kampus.ac.id").unwrap();
    let actor = Actor::user(owner.clone());
    assert!(actor.owns(&owner));
    assert!(!actor.is_admin());

    let admin = Actor::admin(Email::parse("admin@kampus.ac.id").unwrap());
    assert!(admin.is_admin());
    assert!(!admin.owns(&owner));
}

#[test]
fn test_role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
}
