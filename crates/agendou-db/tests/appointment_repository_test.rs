//! Integration tests for the appointment repository, focused on the
//! transactional slot-conflict guarantee.

use agendou_core::error::AgendouError;
use agendou_core::models::appointment::{AppointmentStatus, CreateAppointment};
use agendou_core::repository::AppointmentRepository;
use agendou_db::repository::SurrealAppointmentRepository;
use chrono::{NaiveDate, NaiveTime};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

struct Fixture {
    repo: SurrealAppointmentRepository<surrealdb::engine::local::Db>,
    tenant_id: Uuid,
    client_id: Uuid,
    professional_id: Uuid,
    service_id: Uuid,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agendou_db::run_migrations(&db).await.unwrap();

    Fixture {
        repo: SurrealAppointmentRepository::new(db),
        tenant_id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        professional_id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
    }
}

fn slot(fx: &Fixture, day: u32, hour: u32, minute: u32) -> CreateAppointment {
    CreateAppointment {
        tenant_id: fx.tenant_id,
        client_id: fx.client_id,
        professional_id: fx.professional_id,
        service_id: fx.service_id,
        date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
    }
}

#[tokio::test]
async fn create_pending_round_trips() {
    let fx = setup().await;

    let appointment = fx.repo.create_pending(slot(&fx, 15, 9, 0)).await.unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.date, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    assert_eq!(appointment.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());

    let fetched = fx.repo.get_by_id(appointment.id).await.unwrap();
    assert_eq!(fetched.id, appointment.id);
    assert_eq!(fetched.client_id, fx.client_id);
}

#[tokio::test]
async fn same_slot_inserts_exactly_once() {
    let fx = setup().await;

    fx.repo.create_pending(slot(&fx, 15, 9, 0)).await.unwrap();
    let err = fx.repo.create_pending(slot(&fx, 15, 9, 0)).await.unwrap_err();
    assert!(matches!(err, AgendouError::BusinessRule { .. }));

    // Exactly one row holds the slot.
    let day = fx
        .repo
        .list_active_for_date(
            fx.tenant_id,
            fx.professional_id,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(day.len(), 1);
}

#[tokio::test]
async fn different_times_do_not_conflict() {
    let fx = setup().await;

    fx.repo.create_pending(slot(&fx, 15, 9, 0)).await.unwrap();
    assert!(fx.repo.create_pending(slot(&fx, 15, 9, 30)).await.is_ok());
    assert!(fx.repo.create_pending(slot(&fx, 16, 9, 0)).await.is_ok());
}

#[tokio::test]
async fn other_professionals_are_unaffected() {
    let fx = setup().await;

    fx.repo.create_pending(slot(&fx, 15, 9, 0)).await.unwrap();

    let mut other = slot(&fx, 15, 9, 0);
    other.professional_id = Uuid::new_v4();
    assert!(fx.repo.create_pending(other).await.is_ok());
}

#[tokio::test]
async fn cancelled_slot_can_be_rebooked() {
    let fx = setup().await;

    let appointment = fx.repo.create_pending(slot(&fx, 15, 9, 0)).await.unwrap();
    fx.repo
        .set_status(appointment.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    // Only non-cancelled appointments hold slots.
    assert!(fx.repo.create_pending(slot(&fx, 15, 9, 0)).await.is_ok());
}

#[tokio::test]
async fn active_listing_excludes_cancelled() {
    let fx = setup().await;

    let kept = fx.repo.create_pending(slot(&fx, 15, 9, 0)).await.unwrap();
    let dropped = fx.repo.create_pending(slot(&fx, 15, 10, 0)).await.unwrap();
    fx.repo
        .set_status(dropped.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    let day = fx
        .repo
        .list_active_for_date(
            fx.tenant_id,
            fx.professional_id,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].id, kept.id);
}

#[tokio::test]
async fn done_listing_filters_status_and_start_date() {
    let fx = setup().await;

    let before = fx.repo.create_pending(slot(&fx, 10, 9, 0)).await.unwrap();
    let after = fx.repo.create_pending(slot(&fx, 20, 9, 0)).await.unwrap();
    let pending = fx.repo.create_pending(slot(&fx, 21, 9, 0)).await.unwrap();

    for id in [before.id, after.id] {
        fx.repo
            .set_status(id, AppointmentStatus::Done)
            .await
            .unwrap();
    }

    let since = fx
        .repo
        .list_done_since(
            fx.tenant_id,
            fx.professional_id,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(since.len(), 1);
    assert_eq!(since[0].id, after.id);
    assert!(since.iter().all(|a| a.id != pending.id));
}

#[tokio::test]
async fn client_listing_is_ordered_by_date_and_time() {
    let fx = setup().await;

    fx.repo.create_pending(slot(&fx, 20, 9, 0)).await.unwrap();
    fx.repo.create_pending(slot(&fx, 15, 10, 0)).await.unwrap();
    fx.repo.create_pending(slot(&fx, 15, 9, 0)).await.unwrap();

    let mine = fx
        .repo
        .list_by_client(fx.tenant_id, fx.client_id)
        .await
        .unwrap();
    assert_eq!(mine.len(), 3);
    assert!(
        mine.windows(2)
            .all(|pair| (pair[0].date, pair[0].time) <= (pair[1].date, pair[1].time))
    );
}

#[tokio::test]
async fn missing_appointment_is_not_found() {
    let fx = setup().await;
    let err = fx.repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AgendouError::NotFound { .. }));
}
