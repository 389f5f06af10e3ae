//! Integration tests for revenue aggregation.

use agendou_booking::{Period, RevenueService};
use agendou_core::clock::FixedClock;
use agendou_core::models::appointment::{AppointmentStatus, CreateAppointment};
use agendou_core::models::service::CreateService;
use agendou_core::models::tenant::{CreateTenant, PaymentStatus, PlanTier};
use agendou_core::models::user::{CreateUser, Role};
use agendou_core::repository::{
    AppointmentRepository, ServiceRepository, TenantRepository, UserRepository,
};
use agendou_db::repository::{
    SurrealAppointmentRepository, SurrealServiceRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

struct Fixture {
    appointments: SurrealAppointmentRepository<Db>,
    services: SurrealServiceRepository<Db>,
    tenant_id: Uuid,
    professional_id: Uuid,
    client_id: Uuid,
    corte_id: Uuid,
    barba_id: Uuid,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agendou_db::run_migrations(&db).await.unwrap();

    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant = tenants
        .create(CreateTenant {
            name: "Barbearia Central".into(),
            slug: "barbearia-central".into(),
            custom_domain: None,
            plan: PlanTier::Pro,
            payment_status: PaymentStatus::Active,
            grace_days: None,
            limits: None,
        })
        .await
        .unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let professional = users
        .create(CreateUser {
            tenant_id: Some(tenant.id),
            name: "Bruno Lima".into(),
            email: "bruno@example.com".into(),
            password_hash: "argon2-hash-placeholder".into(),
            role: Role::Professional,
            phone: None,
            instagram: None,
            public_message: None,
        })
        .await
        .unwrap();
    let client = users
        .create(CreateUser {
            tenant_id: Some(tenant.id),
            name: "Ana Souza".into(),
            email: "ana@example.com".into(),
            password_hash: "argon2-hash-placeholder".into(),
            role: Role::Client,
            phone: None,
            instagram: None,
            public_message: None,
        })
        .await
        .unwrap();

    let services = SurrealServiceRepository::new(db.clone());
    let corte = services
        .create(CreateService {
            tenant_id: tenant.id,
            professional_id: professional.id,
            name: "Corte".into(),
            price: Decimal::new(5000, 2),
            duration_minutes: 30,
        })
        .await
        .unwrap();
    let barba = services
        .create(CreateService {
            tenant_id: tenant.id,
            professional_id: professional.id,
            name: "Barba".into(),
            price: Decimal::new(3000, 2),
            duration_minutes: 15,
        })
        .await
        .unwrap();

    Fixture {
        appointments: SurrealAppointmentRepository::new(db),
        services,
        tenant_id: tenant.id,
        professional_id: professional.id,
        client_id: client.id,
        corte_id: corte.id,
        barba_id: barba.id,
    }
}

/// Book a slot and drive it to the given status.
async fn seed_appointment(
    fx: &Fixture,
    service_id: Uuid,
    date: (i32, u32, u32),
    time: (u32, u32),
    status: AppointmentStatus,
) {
    let appointment = fx
        .appointments
        .create_pending(CreateAppointment {
            tenant_id: fx.tenant_id,
            client_id: fx.client_id,
            professional_id: fx.professional_id,
            service_id,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
        })
        .await
        .unwrap();
    if status != AppointmentStatus::Pending {
        fx.appointments
            .set_status(appointment.id, status)
            .await
            .unwrap();
    }
}

fn revenue(fx: &Fixture, now: (i32, u32, u32)) -> RevenueService<
    SurrealAppointmentRepository<Db>,
    SurrealServiceRepository<Db>,
    FixedClock,
> {
    let now = Utc
        .with_ymd_and_hms(now.0, now.1, now.2, 12, 0, 0)
        .unwrap();
    RevenueService::new(fx.appointments.clone(), fx.services.clone(), FixedClock(now))
}

#[tokio::test]
async fn summary_counts_only_completed_appointments() {
    let fx = setup().await;
    seed_appointment(&fx, fx.corte_id, (2025, 1, 2), (9, 0), AppointmentStatus::Done).await;
    seed_appointment(&fx, fx.barba_id, (2025, 1, 2), (10, 0), AppointmentStatus::Done).await;
    // Neither of these contributes revenue.
    seed_appointment(&fx, fx.corte_id, (2025, 1, 3), (9, 0), AppointmentStatus::Pending).await;
    seed_appointment(
        &fx,
        fx.corte_id,
        (2025, 1, 4),
        (9, 0),
        AppointmentStatus::Cancelled,
    )
    .await;

    let summary = revenue(&fx, (2025, 1, 15))
        .summarize(fx.tenant_id, fx.professional_id, Period::All)
        .await
        .unwrap();

    assert_eq!(summary.count, 2);
    assert_eq!(summary.total_revenue, Decimal::new(8000, 2));
    assert_eq!(summary.line_items.len(), 2);
}

#[tokio::test]
async fn by_service_groups_name_and_sums() {
    let fx = setup().await;
    seed_appointment(&fx, fx.corte_id, (2025, 1, 2), (9, 0), AppointmentStatus::Done).await;
    seed_appointment(&fx, fx.corte_id, (2025, 1, 3), (9, 0), AppointmentStatus::Done).await;
    seed_appointment(&fx, fx.barba_id, (2025, 1, 2), (10, 0), AppointmentStatus::Done).await;

    let summary = revenue(&fx, (2025, 1, 15))
        .summarize(fx.tenant_id, fx.professional_id, Period::All)
        .await
        .unwrap();

    assert_eq!(summary.by_service.len(), 2);
    // Name-ordered: Barba before Corte.
    assert_eq!(summary.by_service[0].service_name, "Barba");
    assert_eq!(summary.by_service[0].count, 1);
    assert_eq!(summary.by_service[0].total, Decimal::new(3000, 2));
    assert_eq!(summary.by_service[1].service_name, "Corte");
    assert_eq!(summary.by_service[1].count, 2);
    assert_eq!(summary.by_service[1].total, Decimal::new(10000, 2));
}

#[tokio::test]
async fn by_month_sorts_numerically_across_year_boundary() {
    let fx = setup().await;
    seed_appointment(
        &fx,
        fx.corte_id,
        (2024, 12, 30),
        (9, 0),
        AppointmentStatus::Done,
    )
    .await;
    seed_appointment(&fx, fx.corte_id, (2025, 1, 2), (9, 0), AppointmentStatus::Done).await;
    seed_appointment(&fx, fx.barba_id, (2025, 1, 2), (10, 0), AppointmentStatus::Done).await;

    let summary = revenue(&fx, (2025, 1, 15))
        .summarize(fx.tenant_id, fx.professional_id, Period::All)
        .await
        .unwrap();

    // String order would put 01/2025 first; numeric (year, month)
    // order must not.
    let months: Vec<&str> = summary.by_month.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["12/2024", "01/2025"]);
    assert_eq!(summary.by_month[0].total, Decimal::new(5000, 2));
    assert_eq!(summary.by_month[1].total, Decimal::new(8000, 2));
}

#[tokio::test]
async fn by_date_is_ascending() {
    let fx = setup().await;
    seed_appointment(&fx, fx.corte_id, (2025, 1, 5), (9, 0), AppointmentStatus::Done).await;
    seed_appointment(&fx, fx.corte_id, (2025, 1, 2), (9, 0), AppointmentStatus::Done).await;

    let summary = revenue(&fx, (2025, 1, 15))
        .summarize(fx.tenant_id, fx.professional_id, Period::All)
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = summary.by_date.iter().map(|d| d.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        ]
    );
}

#[tokio::test]
async fn year_period_excludes_the_previous_december() {
    let fx = setup().await;
    seed_appointment(
        &fx,
        fx.corte_id,
        (2024, 12, 30),
        (9, 0),
        AppointmentStatus::Done,
    )
    .await;
    seed_appointment(&fx, fx.corte_id, (2025, 1, 2), (9, 0), AppointmentStatus::Done).await;

    let summary = revenue(&fx, (2025, 1, 15))
        .summarize(fx.tenant_id, fx.professional_id, Period::Year)
        .await
        .unwrap();

    assert_eq!(summary.count, 1);
    assert_eq!(summary.total_revenue, Decimal::new(5000, 2));
    assert_eq!(summary.by_month.len(), 1);
    assert_eq!(summary.by_month[0].month, "01/2025");
}

#[tokio::test]
async fn empty_period_produces_a_zero_summary() {
    let fx = setup().await;

    let summary = revenue(&fx, (2025, 1, 15))
        .summarize(fx.tenant_id, fx.professional_id, Period::Day)
        .await
        .unwrap();

    assert_eq!(summary.count, 0);
    assert_eq!(summary.total_revenue, Decimal::ZERO);
    assert!(summary.by_service.is_empty());
    assert!(summary.by_date.is_empty());
    assert!(summary.by_month.is_empty());
    assert!(summary.line_items.is_empty());
}
