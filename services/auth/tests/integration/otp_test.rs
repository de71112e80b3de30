use chrono::{Duration, Utc};

use chambers_auth::domain::types::{OTP_TTL_SECS, OtpPurpose, OtpRecord};
use chambers_auth::error::AuthServiceError;
use chambers_auth::usecase::otp::{
    RequestOtpInput, RequestOtpUseCase, VerifyOtpInput, VerifyOtpUseCase,
};
use chambers_auth_types::token::validate_access_token;

use crate::helpers::{
    MockIdentityProvider, MockMailer, MockOtpStore, MockRefreshTokenStore, TEST_ACCESS_SECRET,
    test_secrets, test_subject,
};

fn live_record(code: &str, purpose: OtpPurpose) -> OtpRecord {
    OtpRecord {
        code: code.to_owned(),
        purpose,
        expires_at: Utc::now() + Duration::seconds(OTP_TTL_SECS),
    }
}

// ── RequestOtpUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_code_and_deliver_it() {
    let store = MockOtpStore::empty();
    let mailer = MockMailer::working();
    let records = store.records_handle();
    let sent = mailer.sent_handle();

    let uc = RequestOtpUseCase {
        otps: store,
        mailer,
    };

    uc.execute(RequestOtpInput {
        email: "a@x.com".to_owned(),
        purpose: OtpPurpose::Register,
    })
    .await
    .unwrap();

    let records = records.lock().unwrap();
    let record = records.get("a@x.com").expect("record should be stored");
    assert_eq!(record.code.len(), 6, "otp should be 6 digits");
    assert!(record.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(record.purpose, OtpPurpose::Register);
    assert!(
        record.expires_at > Utc::now(),
        "code should expire in the future"
    );

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "a@x.com");
    assert_eq!(sent[0].1, record.code, "delivered code should match stored");
}

#[tokio::test]
async fn should_overwrite_prior_code_on_reissue() {
    let store = MockOtpStore::empty();
    let mailer = MockMailer::working();
    let records = store.records_handle();
    let sent = mailer.sent_handle();

    let uc = RequestOtpUseCase {
        otps: store,
        mailer,
    };

    for _ in 0..2 {
        uc.execute(RequestOtpInput {
            email: "a@x.com".to_owned(),
            purpose: OtpPurpose::Login,
        })
        .await
        .unwrap();
    }

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1, "at most one live record per email");
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        records.get("a@x.com").unwrap().code,
        sent[1].1,
        "only the most recently delivered code should be live"
    );
}

#[tokio::test]
async fn should_roll_back_stored_code_when_delivery_fails() {
    let store = MockOtpStore::empty();
    let records = store.records_handle();

    let uc = RequestOtpUseCase {
        otps: store,
        mailer: MockMailer::failing(),
    };

    let result = uc
        .execute(RequestOtpInput {
            email: "a@x.com".to_owned(),
            purpose: OtpPurpose::Login,
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::DeliveryFailed)),
        "expected DeliveryFailed, got {result:?}"
    );
    assert!(
        records.lock().unwrap().is_empty(),
        "no live code may linger after a failed delivery"
    );
}

// ── VerifyOtpUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_identity_and_mint_session_for_register_purpose() {
    let store = MockOtpStore::with("a@x.com", live_record("123456", OtpPurpose::Register));
    let identity = MockIdentityProvider::empty();
    let refresh_store = MockRefreshTokenStore::empty();
    let otp_records = store.records_handle();
    let subjects = identity.subjects_handle();
    let refresh_records = refresh_store.records_handle();

    let uc = VerifyOtpUseCase {
        otps: store,
        identity,
        refresh_tokens: refresh_store,
        secrets: test_secrets(),
    };

    let tokens = uc
        .execute(VerifyOtpInput {
            email: "a@x.com".to_owned(),
            code: "123456".to_owned(),
        })
        .await
        .unwrap();

    // Identity was created at the provider.
    let subjects = subjects.lock().unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].email, "a@x.com");

    // The code is consumed.
    assert!(otp_records.lock().unwrap().is_empty());

    // The pair is usable: access token validates, refresh record is live.
    let info = validate_access_token(&tokens.access_token, TEST_ACCESS_SECRET).unwrap();
    assert_eq!(info.subject_id, subjects[0].id);
    assert_eq!(info.email, "a@x.com");

    let refresh_records = refresh_records.lock().unwrap();
    let record = refresh_records
        .get(&tokens.refresh_token)
        .expect("refresh record should be stored under the token value");
    assert_eq!(record.subject_id, subjects[0].id);
}

#[tokio::test]
async fn should_resolve_existing_identity_for_login_purpose() {
    let subject = test_subject();
    let store = MockOtpStore::with(&subject.email, live_record("654321", OtpPurpose::Login));

    let uc = VerifyOtpUseCase {
        otps: store,
        identity: MockIdentityProvider::new(vec![subject.clone()]),
        refresh_tokens: MockRefreshTokenStore::empty(),
        secrets: test_secrets(),
    };

    let tokens = uc
        .execute(VerifyOtpInput {
            email: subject.email.clone(),
            code: "654321".to_owned(),
        })
        .await
        .unwrap();

    let info = validate_access_token(&tokens.access_token, TEST_ACCESS_SECRET).unwrap();
    assert_eq!(info.subject_id, subject.id);
}

#[tokio::test]
async fn should_fail_login_purpose_when_identity_missing() {
    let store = MockOtpStore::with("ghost@x.com", live_record("111111", OtpPurpose::Login));
    let otp_records = store.records_handle();

    let uc = VerifyOtpUseCase {
        otps: store,
        identity: MockIdentityProvider::empty(),
        refresh_tokens: MockRefreshTokenStore::empty(),
        secrets: test_secrets(),
    };

    let result = uc
        .execute(VerifyOtpInput {
            email: "ghost@x.com".to_owned(),
            code: "111111".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::IdentityNotFound)),
        "expected IdentityNotFound, got {result:?}"
    );
    // The code was deleted before identity resolution — no replay after a
    // provider-side failure.
    assert!(otp_records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_surface_identity_creation_rejection() {
    let store = MockOtpStore::with("a@x.com", live_record("222222", OtpPurpose::Register));
    let otp_records = store.records_handle();

    let uc = VerifyOtpUseCase {
        otps: store,
        identity: MockIdentityProvider::empty().rejecting_creation(),
        refresh_tokens: MockRefreshTokenStore::empty(),
        secrets: test_secrets(),
    };

    let result = uc
        .execute(VerifyOtpInput {
            email: "a@x.com".to_owned(),
            code: "222222".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::IdentityCreationFailed)),
        "expected IdentityCreationFailed, got {result:?}"
    );
    assert!(otp_records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_wrong_code_without_consuming_it() {
    let subject = test_subject();
    let store = MockOtpStore::with(&subject.email, live_record("123456", OtpPurpose::Login));

    let uc = VerifyOtpUseCase {
        otps: store,
        identity: MockIdentityProvider::new(vec![subject.clone()]),
        refresh_tokens: MockRefreshTokenStore::empty(),
        secrets: test_secrets(),
    };

    let result = uc
        .execute(VerifyOtpInput {
            email: subject.email.clone(),
            code: "999999".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidOrExpiredOtp)),
        "expected InvalidOrExpiredOtp, got {result:?}"
    );

    // The correct code still works afterwards.
    uc.execute(VerifyOtpInput {
        email: subject.email.clone(),
        code: "123456".to_owned(),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn should_reject_second_use_of_same_code() {
    let subject = test_subject();
    let store = MockOtpStore::with(&subject.email, live_record("123456", OtpPurpose::Login));

    let uc = VerifyOtpUseCase {
        otps: store,
        identity: MockIdentityProvider::new(vec![subject.clone()]),
        refresh_tokens: MockRefreshTokenStore::empty(),
        secrets: test_secrets(),
    };

    uc.execute(VerifyOtpInput {
        email: subject.email.clone(),
        code: "123456".to_owned(),
    })
    .await
    .unwrap();

    let result = uc
        .execute(VerifyOtpInput {
            email: subject.email.clone(),
            code: "123456".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidOrExpiredOtp)),
        "a verified code must be unusable for a second request, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_record_and_drop_it() {
    let subject = test_subject();
    let expired = OtpRecord {
        code: "123456".to_owned(),
        purpose: OtpPurpose::Login,
        expires_at: Utc::now() - Duration::seconds(1),
    };
    let store = MockOtpStore::with(&subject.email, expired);
    let otp_records = store.records_handle();

    let uc = VerifyOtpUseCase {
        otps: store,
        identity: MockIdentityProvider::new(vec![subject.clone()]),
        refresh_tokens: MockRefreshTokenStore::empty(),
        secrets: test_secrets(),
    };

    let result = uc
        .execute(VerifyOtpInput {
            email: subject.email.clone(),
            code: "123456".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidOrExpiredOtp)),
        "expected InvalidOrExpiredOtp, got {result:?}"
    );
    assert!(otp_records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_verify_when_no_code_was_requested() {
    let uc = VerifyOtpUseCase {
        otps: MockOtpStore::empty(),
        identity: MockIdentityProvider::empty(),
        refresh_tokens: MockRefreshTokenStore::empty(),
        secrets: test_secrets(),
    };

    let result = uc
        .execute(VerifyOtpInput {
            email: "nobody@x.com".to_owned(),
            code: "123456".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidOrExpiredOtp)),
        "expected InvalidOrExpiredOtp, got {result:?}"
    );
}
