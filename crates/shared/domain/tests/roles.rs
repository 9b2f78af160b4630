use lms_domain::roles::UserRoles;

#[test]
fn role_lists_parse_leniently() {
    let roles = UserRoles::parse_list("staff, beta_tester,unknown,,");
    assert_eq!(roles, UserRoles::STAFF | UserRoles::BETA_TESTER);
    assert!(roles.is_staff());

    assert!(UserRoles::parse_list("").is_empty());
    assert!(!UserRoles::parse_list("beta").is_staff());
    assert!(UserRoles::parse_list("SUPERUSER").is_staff());
}

#[test]
fn roles_serialize_as_bits() {
    let json = serde_json::to_string(&(UserRoles::STAFF | UserRoles::SUPERUSER)).unwrap();
    assert_eq!(json, "3");

    let parsed: UserRoles = serde_json::from_str("255").unwrap();
    assert_eq!(parsed, UserRoles::ALL);
}
