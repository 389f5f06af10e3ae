//! SurrealDB implementation of [`TenantRepository`].

use agendou_core::error::{AgendouError, AgendouResult};
use agendou_core::models::tenant::{
    CreateTenant, PaymentStatus, PlanTier, Tenant, UpdateTenant, UsageLimits,
};
use agendou_core::repository::{PaginatedResult, Pagination, TenantRepository};
use chrono::{DateTime, Duration, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Days added to the due date when a payment is registered.
const PAYMENT_CYCLE_DAYS: i64 = 30;

fn parse_plan(s: &str) -> Result<PlanTier, DbError> {
    match s {
        "Basic" => Ok(PlanTier::Basic),
        "Pro" => Ok(PlanTier::Pro),
        "Enterprise" => Ok(PlanTier::Enterprise),
        other => Err(DbError::Data(format!("unknown plan tier: {other}"))),
    }
}

fn plan_to_string(p: PlanTier) -> &'static str {
    match p {
        PlanTier::Basic => "Basic",
        PlanTier::Pro => "Pro",
        PlanTier::Enterprise => "Enterprise",
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, DbError> {
    match s {
        "Active" => Ok(PaymentStatus::Active),
        "Overdue" => Ok(PaymentStatus::Overdue),
        "Blocked" => Ok(PaymentStatus::Blocked),
        "Cancelled" => Ok(PaymentStatus::Cancelled),
        "Pending" => Ok(PaymentStatus::Pending),
        other => Err(DbError::Data(format!("unknown payment status: {other}"))),
    }
}

fn payment_status_to_string(s: PaymentStatus) -> &'static str {
    match s {
        PaymentStatus::Active => "Active",
        PaymentStatus::Overdue => "Overdue",
        PaymentStatus::Blocked => "Blocked",
        PaymentStatus::Cancelled => "Cancelled",
        PaymentStatus::Pending => "Pending",
    }
}

#[derive(Debug, SurrealValue)]
struct LimitsRow {
    max_professionals: u32,
    max_services: u32,
}

impl From<LimitsRow> for UsageLimits {
    fn from(row: LimitsRow) -> Self {
        Self {
            max_professionals: row.max_professionals,
            max_services: row.max_services,
        }
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    name: String,
    slug: String,
    custom_domain: Option<String>,
    active: bool,
    plan: String,
    payment_status: String,
    due_date: Option<DateTime<Utc>>,
    last_payment_at: Option<DateTime<Utc>>,
    blocked_at: Option<DateTime<Utc>>,
    grace_days: i64,
    limits: LimitsRow,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Result<Tenant, DbError> {
        Ok(Tenant {
            id,
            name: self.name,
            slug: self.slug,
            custom_domain: self.custom_domain,
            active: self.active,
            plan: parse_plan(&self.plan)?,
            payment_status: parse_payment_status(&self.payment_status)?,
            due_date: self.due_date,
            last_payment_at: self.last_payment_at,
            blocked_at: self.blocked_at,
            grace_days: self.grace_days,
            limits: self.limits.into(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: String,
    name: String,
    slug: String,
    custom_domain: Option<String>,
    active: bool,
    plan: String,
    payment_status: String,
    due_date: Option<DateTime<Utc>>,
    last_payment_at: Option<DateTime<Utc>>,
    blocked_at: Option<DateTime<Utc>>,
    grace_days: i64,
    limits: LimitsRow,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRowWithId {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Data(format!("invalid UUID: {e}")))?;
        Ok(Tenant {
            id,
            name: self.name,
            slug: self.slug,
            custom_domain: self.custom_domain,
            active: self.active,
            plan: parse_plan(&self.plan)?,
            payment_status: parse_payment_status(&self.payment_status)?,
            due_date: self.due_date,
            last_payment_at: self.last_payment_at,
            blocked_at: self.blocked_at,
            grace_days: self.grace_days,
            limits: self.limits.into(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Tenant, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('business', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<TenantRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "business".into(),
            id: id_str,
        })?;

        row.into_tenant(id)
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> AgendouResult<Tenant> {
        // Slug is the public identity of a business; reject duplicates
        // up front.
        match self.get_by_slug(&input.slug).await {
            Ok(_) => {
                return Err(AgendouError::AlreadyExists {
                    entity: "business".into(),
                });
            }
            Err(AgendouError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let limits = input.limits.unwrap_or_default();

        let result = self
            .db
            .query(
                "CREATE type::record('business', $id) SET \
                 name = $name, slug = $slug, \
                 custom_domain = $custom_domain, \
                 active = true, \
                 plan = $plan, \
                 payment_status = $payment_status, \
                 grace_days = $grace_days, \
                 limits = $limits",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("custom_domain", input.custom_domain))
            .bind(("plan", plan_to_string(input.plan)))
            .bind((
                "payment_status",
                payment_status_to_string(input.payment_status),
            ))
            .bind(("grace_days", input.grace_days.unwrap_or(5)))
            .bind((
                "limits",
                serde_json::json!({
                    "max_professionals": limits.max_professionals,
                    "max_services": limits.max_services,
                }),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "business".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AgendouResult<Tenant> {
        Ok(self.fetch(id).await?)
    }

    async fn get_by_slug(&self, slug: &str) -> AgendouResult<Tenant> {
        let slug_owned = slug.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM business \
                 WHERE slug = $slug",
            )
            .bind(("slug", slug_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "business".into(),
            id: format!("slug={slug}"),
        })?;

        Ok(row.try_into_tenant()?)
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> AgendouResult<Tenant> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        if input.plan.is_some() {
            sets.push("plan = $plan");
        }
        if let Some(status) = input.payment_status {
            sets.push("payment_status = $payment_status");
            // Blocked implies blocked_at; reactivation clears it.
            match status {
                PaymentStatus::Blocked => sets.push("blocked_at = time::now()"),
                PaymentStatus::Active => sets.push("blocked_at = NONE"),
                _ => {}
            }
        }
        match input.due_date {
            Some(Some(_)) => sets.push("due_date = $due_date"),
            Some(None) => sets.push("due_date = NONE"),
            None => {}
        }
        if input.grace_days.is_some() {
            sets.push("grace_days = $grace_days");
        }
        if input.limits.is_some() {
            sets.push("limits = $limits");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('business', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }
        if let Some(plan) = input.plan {
            builder = builder.bind(("plan", plan_to_string(plan)));
        }
        if let Some(status) = input.payment_status {
            builder = builder.bind(("payment_status", payment_status_to_string(status)));
        }
        if let Some(Some(due_date)) = input.due_date {
            builder = builder.bind(("due_date", due_date));
        }
        if let Some(grace_days) = input.grace_days {
            builder = builder.bind(("grace_days", grace_days));
        }
        if let Some(limits) = input.limits {
            builder = builder.bind((
                "limits",
                serde_json::json!({
                    "max_professionals": limits.max_professionals,
                    "max_services": limits.max_services,
                }),
            ));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "business".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn mark_blocked(&self, id: Uuid, blocked_at: DateTime<Utc>) -> AgendouResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('business', $id) SET \
                 payment_status = 'Blocked', \
                 blocked_at = $blocked_at, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("blocked_at", blocked_at))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "business".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn register_payment(&self, id: Uuid, paid_at: DateTime<Utc>) -> AgendouResult<Tenant> {
        let id_str = id.to_string();
        let next_due = paid_at + Duration::days(PAYMENT_CYCLE_DAYS);

        let mut result = self
            .db
            .query(
                "UPDATE type::record('business', $id) SET \
                 payment_status = 'Active', \
                 last_payment_at = $paid_at, \
                 due_date = $next_due, \
                 blocked_at = NONE, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("paid_at", paid_at))
            .bind(("next_due", next_due))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "business".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn list(&self, pagination: Pagination) -> AgendouResult<PaginatedResult<Tenant>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM business GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM business \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_tenant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
