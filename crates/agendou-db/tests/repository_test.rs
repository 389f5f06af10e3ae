//! Integration tests for tenant, user, service, availability, and
//! access-code repositories using in-memory SurrealDB.

use agendou_core::error::AgendouError;
use agendou_core::models::access_code::CreateAccessCode;
use agendou_core::models::availability::CreateAvailabilityWindow;
use agendou_core::models::service::CreateService;
use agendou_core::models::tenant::{CreateTenant, PaymentStatus, PlanTier, UpdateTenant};
use agendou_core::models::user::{CreateUser, Role};
use agendou_core::repository::{
    AccessCodeRepository, AvailabilityRepository, Pagination, ServiceRepository, TenantRepository,
    UserRepository,
};
use agendou_db::repository::{
    SurrealAccessCodeRepository, SurrealAvailabilityRepository, SurrealServiceRepository,
    SurrealTenantRepository, SurrealUserRepository,
};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agendou_db::run_migrations(&db).await.unwrap();
    db
}

fn tenant_input(slug: &str) -> CreateTenant {
    CreateTenant {
        name: "Studio Glow".into(),
        slug: slug.into(),
        custom_domain: None,
        plan: PlanTier::Basic,
        payment_status: PaymentStatus::Active,
        grace_days: None,
        limits: None,
    }
}

// -----------------------------------------------------------------------
// Tenant tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_business() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo.create(tenant_input("studio-glow")).await.unwrap();
    assert_eq!(tenant.slug, "studio-glow");
    assert!(tenant.active);
    assert_eq!(tenant.grace_days, 5);
    assert_eq!(tenant.limits.max_professionals, 5);
    assert_eq!(tenant.payment_status, PaymentStatus::Active);
    assert!(tenant.blocked_at.is_none());

    let fetched = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(fetched.id, tenant.id);
    assert_eq!(fetched.name, tenant.name);

    let by_slug = repo.get_by_slug("studio-glow").await.unwrap();
    assert_eq!(by_slug.id, tenant.id);
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    repo.create(tenant_input("studio-glow")).await.unwrap();
    let err = repo.create(tenant_input("studio-glow")).await.unwrap_err();
    assert!(matches!(err, AgendouError::AlreadyExists { .. }));
}

#[tokio::test]
async fn manual_block_stamps_blocked_at() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);
    let tenant = repo.create(tenant_input("studio-glow")).await.unwrap();

    let blocked = repo
        .update(
            tenant.id,
            UpdateTenant {
                payment_status: Some(PaymentStatus::Blocked),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(blocked.payment_status, PaymentStatus::Blocked);
    assert!(blocked.blocked_at.is_some());

    // Reactivating clears the timestamp.
    let reactivated = repo
        .update(
            tenant.id,
            UpdateTenant {
                payment_status: Some(PaymentStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reactivated.payment_status, PaymentStatus::Active);
    assert!(reactivated.blocked_at.is_none());
}

#[tokio::test]
async fn mark_blocked_and_register_payment_round_trip() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);
    let tenant = repo.create(tenant_input("studio-glow")).await.unwrap();

    let blocked_at = Utc::now();
    let blocked = repo.mark_blocked(tenant.id, blocked_at).await.unwrap();
    assert_eq!(blocked.payment_status, PaymentStatus::Blocked);
    assert!(blocked.blocked_at.is_some());

    let paid_at = Utc::now();
    let reopened = repo.register_payment(tenant.id, paid_at).await.unwrap();
    assert_eq!(reopened.payment_status, PaymentStatus::Active);
    assert!(reopened.blocked_at.is_none());
    assert!(reopened.last_payment_at.is_some());
    let due = reopened.due_date.unwrap();
    assert_eq!((due - paid_at).num_days(), 30);
}

#[tokio::test]
async fn list_businesses_with_pagination() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    for slug in ["one", "two", "three"] {
        repo.create(tenant_input(slug)).await.unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);

    let rest = repo
        .list(Pagination {
            offset: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
}

// -----------------------------------------------------------------------
// User tests
// -----------------------------------------------------------------------

fn user_input(tenant_id: Uuid, email: &str, role: Role) -> CreateUser {
    CreateUser {
        tenant_id: Some(tenant_id),
        name: "Ana Souza".into(),
        email: email.into(),
        password_hash: "argon2-hash-placeholder".into(),
        role,
        phone: None,
        instagram: None,
        public_message: None,
    }
}

#[tokio::test]
async fn create_and_find_user_by_email() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant = tenants.create(tenant_input("studio-glow")).await.unwrap();
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(user_input(tenant.id, "ana@example.com", Role::Client))
        .await
        .unwrap();
    assert_eq!(user.tenant_id, Some(tenant.id));

    let fetched = repo.get_by_email("ana@example.com").await.unwrap();
    assert_eq!(fetched.id, user.id);

    let by_id = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(by_id.email, "ana@example.com");
}

#[tokio::test]
async fn email_is_globally_unique() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let first = tenants.create(tenant_input("studio-one")).await.unwrap();
    let second = tenants.create(tenant_input("studio-two")).await.unwrap();
    let repo = SurrealUserRepository::new(db);

    repo.create(user_input(first.id, "ana@example.com", Role::Client))
        .await
        .unwrap();
    // Same email under another tenant still collides.
    let err = repo
        .create(user_input(second.id, "ana@example.com", Role::Client))
        .await
        .unwrap_err();
    assert!(matches!(err, AgendouError::AlreadyExists { .. }));
}

#[tokio::test]
async fn platform_admin_has_no_tenant() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let admin = repo
        .create(CreateUser {
            tenant_id: None,
            name: "Root".into(),
            email: "root@example.com".into(),
            password_hash: "argon2-hash-placeholder".into(),
            role: Role::Admin,
            phone: None,
            instagram: None,
            public_message: None,
        })
        .await
        .unwrap();
    assert_eq!(admin.tenant_id, None);

    let fetched = repo.get_by_id(admin.id).await.unwrap();
    assert_eq!(fetched.tenant_id, None);
}

#[tokio::test]
async fn count_by_role_scopes_to_tenant() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let first = tenants.create(tenant_input("studio-one")).await.unwrap();
    let second = tenants.create(tenant_input("studio-two")).await.unwrap();
    let repo = SurrealUserRepository::new(db);

    repo.create(user_input(first.id, "p1@example.com", Role::Professional))
        .await
        .unwrap();
    repo.create(user_input(first.id, "p2@example.com", Role::Professional))
        .await
        .unwrap();
    repo.create(user_input(first.id, "c1@example.com", Role::Client))
        .await
        .unwrap();
    repo.create(user_input(second.id, "p3@example.com", Role::Professional))
        .await
        .unwrap();

    assert_eq!(
        repo.count_by_role(first.id, Role::Professional).await.unwrap(),
        2
    );
    assert_eq!(repo.count_by_role(first.id, Role::Client).await.unwrap(), 1);
    assert_eq!(
        repo.count_by_role(second.id, Role::Professional)
            .await
            .unwrap(),
        1
    );
}

// -----------------------------------------------------------------------
// Service tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn services_soft_disable_instead_of_deleting() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant = tenants.create(tenant_input("studio-glow")).await.unwrap();
    let repo = SurrealServiceRepository::new(db);
    let professional_id = Uuid::new_v4();

    let service = repo
        .create(CreateService {
            tenant_id: tenant.id,
            professional_id,
            name: "Corte".into(),
            price: Decimal::new(5000, 2),
            duration_minutes: 30,
        })
        .await
        .unwrap();
    assert!(service.active);
    assert_eq!(service.price, Decimal::new(5000, 2));

    let listed = repo
        .list_active_by_professional(tenant.id, professional_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    repo.deactivate(tenant.id, service.id).await.unwrap();

    // Gone from the active listing, still fetchable for history.
    let listed = repo
        .list_active_by_professional(tenant.id, professional_id)
        .await
        .unwrap();
    assert!(listed.is_empty());

    let fetched = repo.get_by_id(tenant.id, service.id).await.unwrap();
    assert!(!fetched.active);
}

#[tokio::test]
async fn service_lookup_is_tenant_scoped() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant = tenants.create(tenant_input("studio-glow")).await.unwrap();
    let repo = SurrealServiceRepository::new(db);

    let service = repo
        .create(CreateService {
            tenant_id: tenant.id,
            professional_id: Uuid::new_v4(),
            name: "Corte".into(),
            price: Decimal::new(5000, 2),
            duration_minutes: 30,
        })
        .await
        .unwrap();

    let err = repo
        .get_by_id(Uuid::new_v4(), service.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AgendouError::NotFound { .. }));
}

// -----------------------------------------------------------------------
// Availability tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn availability_windows_filter_by_date() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant = tenants.create(tenant_input("studio-glow")).await.unwrap();
    let repo = SurrealAvailabilityRepository::new(db);
    let professional_id = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    for (start, end, day) in [(540u16, 720u16, 15u32), (780, 1080, 15), (540, 720, 16)] {
        repo.create(CreateAvailabilityWindow {
            tenant_id: tenant.id,
            professional_id,
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            start_minute: start,
            end_minute: end,
            available: true,
        })
        .await
        .unwrap();
    }

    let windows = repo
        .list_for_date(tenant.id, professional_id, date)
        .await
        .unwrap();
    assert_eq!(windows.len(), 2);
    // Ordered by start offset.
    assert_eq!(windows[0].start_minute, 540);
    assert_eq!(windows[1].start_minute, 780);
    assert!(windows.iter().all(|w| w.date == date));
}

// -----------------------------------------------------------------------
// Access code tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn access_codes_are_unique_per_tenant() {
    let db = setup().await;
    let tenants = SurrealTenantRepository::new(db.clone());
    let first = tenants.create(tenant_input("studio-one")).await.unwrap();
    let second = tenants.create(tenant_input("studio-two")).await.unwrap();
    let repo = SurrealAccessCodeRepository::new(db);

    let code = repo
        .create(CreateAccessCode {
            tenant_id: first.id,
            code: "TEAM-2025".into(),
            expires_at: Some(Utc::now() + Duration::days(30)),
            description: Some("staff onboarding".into()),
        })
        .await
        .unwrap();
    assert!(code.active);

    let fetched = repo.get_by_code(first.id, "TEAM-2025").await.unwrap();
    assert_eq!(fetched.id, code.id);

    // Same code within the same tenant collides.
    let err = repo
        .create(CreateAccessCode {
            tenant_id: first.id,
            code: "TEAM-2025".into(),
            expires_at: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AgendouError::AlreadyExists { .. }));

    // Another tenant can reuse it.
    assert!(
        repo.create(CreateAccessCode {
            tenant_id: second.id,
            code: "TEAM-2025".into(),
            expires_at: None,
            description: None,
        })
        .await
        .is_ok()
    );

    // Unknown codes are a not-found, never a silent pass.
    let err = repo.get_by_code(first.id, "NOPE").await.unwrap_err();
    assert!(matches!(err, AgendouError::NotFound { .. }));
}
