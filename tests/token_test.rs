use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rusty_creds::auth::token::{extract_bearer_token, AccessToken, TokenManager};
use rusty_creds::error::RustyCredsError;
use serde::Serialize;
use serde_json::{Map, Value};

const SIGNING_KEY: &str = "integration-signing-key-7f3a9c21e4b8d605";

#[test]
fn test_jwt_token_creation_and_validation() {
    let token_manager = TokenManager::new(SIGNING_KEY);

    let token = token_manager.issue("jane@example.edu", Map::new()).unwrap();
    assert!(!token.is_empty());
    assert_eq!(token.split('.').count(), 3);

    let claims = token_manager.validate(&token).unwrap();
    assert_eq!(claims.sub, "jane@example.edu");
    assert_eq!(claims.exp - claims.iat, 30 * 60);
    assert_eq!(
        token_manager.validate_and_get_subject(&token).unwrap(),
        "jane@example.edu"
    );
}

#[test]
fn test_extra_claims_round_trip() {
    let token_manager = TokenManager::new(SIGNING_KEY);
    let mut extra = Map::new();
    extra.insert("role".to_string(), Value::from("advisor"));
    extra.insert("aud".to_string(), Value::from("activities-api"));

    let token = token_manager.issue("jane@example.edu", extra).unwrap();
    let claims = token_manager.validate(&token).unwrap();
    assert_eq!(claims.extra["role"], "advisor");
    assert_eq!(claims.extra["aud"], "activities-api");
}

#[test]
fn test_expired_token() {
    let token_manager = TokenManager::new(SIGNING_KEY);

    let token = token_manager
        .issue_with_ttl("jane@example.edu", Map::new(), chrono::Duration::hours(-1))
        .unwrap();
    let result = token_manager.validate(&token);
    assert!(matches!(result, Err(RustyCredsError::ExpiredToken)));
}

#[test]
fn test_token_dies_at_expiry() {
    let token_manager = TokenManager::new(SIGNING_KEY);

    let token = token_manager
        .issue_with_ttl("jane@example.edu", Map::new(), chrono::Duration::zero())
        .unwrap();
    assert!(matches!(
        token_manager.validate(&token),
        Err(RustyCredsError::ExpiredToken)
    ));
}

#[test]
fn test_tampered_signature_is_invalid() {
    let token_manager = TokenManager::new(SIGNING_KEY);
    let forger = TokenManager::new("some-other-deployment-key-19c0e2d7aa41");

    let genuine = token_manager.issue("jane@example.edu", Map::new()).unwrap();
    let forged = forger.issue("jane@example.edu", Map::new()).unwrap();

    // Genuine header and payload with a signature made under another key
    let (body, _) = genuine.rsplit_once('.').unwrap();
    let (_, foreign_signature) = forged.rsplit_once('.').unwrap();
    let spliced = format!("{}.{}", body, foreign_signature);

    assert!(matches!(
        token_manager.validate(&spliced),
        Err(RustyCredsError::InvalidToken(_))
    ));
    assert!(matches!(
        token_manager.validate(&forged),
        Err(RustyCredsError::InvalidToken(_))
    ));
}

#[test]
fn test_tampered_payload_is_invalid() {
    let token_manager = TokenManager::new(SIGNING_KEY);

    let jane = token_manager.issue("jane@example.edu", Map::new()).unwrap();
    let admin = token_manager.issue("admin@example.edu", Map::new()).unwrap();

    // Admin payload under Jane's signature
    let jane_parts: Vec<&str> = jane.split('.').collect();
    let admin_parts: Vec<&str> = admin.split('.').collect();
    let spliced = format!("{}.{}.{}", jane_parts[0], admin_parts[1], jane_parts[2]);

    assert!(matches!(
        token_manager.validate(&spliced),
        Err(RustyCredsError::InvalidToken(_))
    ));
}

#[test]
fn test_malformed_tokens_are_invalid() {
    let token_manager = TokenManager::new(SIGNING_KEY);

    for token in ["", "invalid.token.here", "invalid.token", "a.b.c.d"] {
        let result = token_manager.validate(token);
        assert!(
            matches!(result, Err(RustyCredsError::InvalidToken(_))),
            "{:?} should be rejected as invalid",
            token
        );
    }
}

#[derive(Serialize)]
struct ExpOnly {
    exp: i64,
}

#[derive(Serialize)]
struct SubOnly {
    sub: String,
}

#[derive(Serialize)]
struct SubAndExp {
    sub: String,
    exp: i64,
}

#[test]
fn test_missing_required_claims_are_invalid() {
    let token_manager = TokenManager::new(SIGNING_KEY);
    let key = EncodingKey::from_secret(SIGNING_KEY.as_bytes());
    let later = chrono::Utc::now().timestamp() + 600;

    let no_subject = encode(&Header::default(), &ExpOnly { exp: later }, &key).unwrap();
    assert!(matches!(
        token_manager.validate(&no_subject),
        Err(RustyCredsError::InvalidToken(_))
    ));

    let no_expiry = encode(
        &Header::default(),
        &SubOnly { sub: "jane@example.edu".to_string() },
        &key,
    )
    .unwrap();
    assert!(matches!(
        token_manager.validate(&no_expiry),
        Err(RustyCredsError::InvalidToken(_))
    ));

    let empty_subject = encode(
        &Header::default(),
        &SubAndExp { sub: String::new(), exp: later },
        &key,
    )
    .unwrap();
    assert!(matches!(
        token_manager.validate(&empty_subject),
        Err(RustyCredsError::InvalidToken(ref reason)) if reason.contains("empty")
    ));
    assert!(token_manager.validate_and_get_subject(&empty_subject).is_err());
}

#[test]
fn test_other_algorithms_are_invalid() {
    let token_manager = TokenManager::new(SIGNING_KEY);
    let key = EncodingKey::from_secret(SIGNING_KEY.as_bytes());
    let later = chrono::Utc::now().timestamp() + 600;

    let hs512 = encode(
        &Header::new(Algorithm::HS512),
        &SubAndExp { sub: "jane@example.edu".to_string(), exp: later },
        &key,
    )
    .unwrap();
    assert!(matches!(
        token_manager.validate(&hs512),
        Err(RustyCredsError::InvalidToken(_))
    ));
}

#[test]
fn test_access_token_shape() {
    let access = AccessToken::bearer("abc.def.ghi".to_string());
    let json = serde_json::to_value(&access).unwrap();
    assert_eq!(json["access_token"], "abc.def.ghi");
    assert_eq!(json["token_type"], "bearer");
}

#[test]
fn test_bearer_header_round_trip() {
    let token_manager = TokenManager::new(SIGNING_KEY);
    let token = token_manager.issue("jane@example.edu", Map::new()).unwrap();

    let header = format!("Bearer {}", token);
    let extracted = extract_bearer_token(&header).unwrap();
    assert_eq!(token_manager.validate(&extracted).unwrap().sub, "jane@example.edu");
}
