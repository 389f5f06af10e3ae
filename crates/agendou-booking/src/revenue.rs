//! Revenue aggregation over completed appointments.

use std::collections::{BTreeMap, HashMap};

use agendou_core::clock::Clock;
use agendou_core::error::AgendouResult;
use agendou_core::models::service::Service;
use agendou_core::repository::{AppointmentRepository, ServiceRepository};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Reporting period shorthand, parsed from the `periodo` query
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Month,
    Year,
    All,
}

impl Period {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "day" => Some(Self::Day),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// First calendar date included in the period.
    pub fn start(self, now: DateTime<Utc>) -> NaiveDate {
        let today = now.date_naive();
        match self {
            Self::Day => today,
            Self::Month => today.with_day(1).unwrap_or(today),
            Self::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            // Epoch: effectively unbounded.
            Self::All => NaiveDate::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRevenue {
    pub service_name: String,
    pub count: u64,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateRevenue {
    pub date: NaiveDate,
    pub count: u64,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthRevenue {
    /// `MM/YYYY`.
    pub month: String,
    pub count: u64,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueLine {
    pub appointment_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service_name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueSummary {
    pub total_revenue: Decimal,
    pub count: u64,
    pub by_service: Vec<ServiceRevenue>,
    pub by_date: Vec<DateRevenue>,
    pub by_month: Vec<MonthRevenue>,
    pub line_items: Vec<RevenueLine>,
}

pub struct RevenueService<P, S, C>
where
    P: AppointmentRepository,
    S: ServiceRepository,
    C: Clock,
{
    appointments: P,
    services: S,
    clock: C,
}

impl<P, S, C> RevenueService<P, S, C>
where
    P: AppointmentRepository,
    S: ServiceRepository,
    C: Clock,
{
    pub fn new(appointments: P, services: S, clock: C) -> Self {
        Self {
            appointments,
            services,
            clock,
        }
    }

    /// Fold a professional's `Done` appointments since the period start
    /// into totals by service, by calendar date, and by month.
    ///
    /// Months are keyed by `(year, month)` so December always sorts
    /// before the following January. The `MM/YYYY` display string is
    /// produced only after ordering.
    pub async fn summarize(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
        period: Period,
    ) -> AgendouResult<RevenueSummary> {
        let start = period.start(self.clock.now());
        let mut appointments = self
            .appointments
            .list_done_since(tenant_id, professional_id, start)
            .await?;
        appointments.sort_by_key(|a| (a.date, a.time));

        let mut services: HashMap<Uuid, Service> = HashMap::new();
        for appointment in &appointments {
            if !services.contains_key(&appointment.service_id) {
                let service = self
                    .services
                    .get_by_id(tenant_id, appointment.service_id)
                    .await?;
                services.insert(service.id, service);
            }
        }

        let mut total_revenue = Decimal::ZERO;
        let mut by_service: BTreeMap<String, (u64, Decimal)> = BTreeMap::new();
        let mut by_date: BTreeMap<NaiveDate, (u64, Decimal)> = BTreeMap::new();
        let mut by_month: BTreeMap<(i32, u32), (u64, Decimal)> = BTreeMap::new();
        let mut line_items = Vec::with_capacity(appointments.len());

        for appointment in &appointments {
            let Some(service) = services.get(&appointment.service_id) else {
                continue;
            };
            let price = service.price;
            total_revenue += price;

            let service_entry = by_service.entry(service.name.clone()).or_default();
            service_entry.0 += 1;
            service_entry.1 += price;

            let date_entry = by_date.entry(appointment.date).or_default();
            date_entry.0 += 1;
            date_entry.1 += price;

            let month_key = (appointment.date.year(), appointment.date.month());
            let month_entry = by_month.entry(month_key).or_default();
            month_entry.0 += 1;
            month_entry.1 += price;

            line_items.push(RevenueLine {
                appointment_id: appointment.id,
                date: appointment.date,
                time: appointment.time,
                service_name: service.name.clone(),
                price,
            });
        }

        Ok(RevenueSummary {
            total_revenue,
            count: appointments.len() as u64,
            by_service: by_service
                .into_iter()
                .map(|(service_name, (count, total))| ServiceRevenue {
                    service_name,
                    count,
                    total,
                })
                .collect(),
            by_date: by_date
                .into_iter()
                .map(|(date, (count, total))| DateRevenue { date, count, total })
                .collect(),
            by_month: by_month
                .into_iter()
                .map(|((year, month), (count, total))| MonthRevenue {
                    month: format!("{month:02}/{year}"),
                    count,
                    total,
                })
                .collect(),
            line_items,
        })
    }
}
