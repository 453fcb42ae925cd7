//! SurrealDB implementation of [`RecordStore`].
//!
//! Contracts, invoices, and subscriptions are owned elsewhere in the
//! application; this store only lists them. Business dates are stored
//! as `YYYY-MM-DD` strings (date-only semantics).

use chrono::NaiveDate;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vantage_core::error::VantageResult;
use vantage_core::models::record::{Contract, Invoice, RecordStatus, Subscription};
use vantage_core::repository::RecordStore;

use crate::error::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, DbError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT)
                .map_err(|e| DbError::Migration(format!("invalid date '{s}': {e}")))
        })
        .transpose()
}

fn parse_status(value: &str) -> Result<RecordStatus, DbError> {
    RecordStatus::parse(value)
        .ok_or_else(|| DbError::Migration(format!("invalid status: {value}")))
}

#[derive(Debug, SurrealValue)]
struct ContractRowWithId {
    record_id: String,
    tenant_id: String,
    title: String,
    end_date: Option<String>,
    status: String,
}

impl ContractRowWithId {
    fn try_into_contract(self) -> Result<Contract, DbError> {
        Ok(Contract {
            id: parse_uuid(&self.record_id, "contract")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            title: self.title,
            end_date: parse_date(self.end_date)?,
            status: parse_status(&self.status)?,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct InvoiceRowWithId {
    record_id: String,
    tenant_id: String,
    number: String,
    due_date: Option<String>,
    status: String,
}

impl InvoiceRowWithId {
    fn try_into_invoice(self) -> Result<Invoice, DbError> {
        Ok(Invoice {
            id: parse_uuid(&self.record_id, "invoice")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            number: self.number,
            due_date: parse_date(self.due_date)?,
            status: parse_status(&self.status)?,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct SubscriptionRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    next_billing_date: Option<String>,
    status: String,
}

impl SubscriptionRowWithId {
    fn try_into_subscription(self) -> Result<Subscription, DbError> {
        Ok(Subscription {
            id: parse_uuid(&self.record_id, "subscription")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            name: self.name,
            next_billing_date: parse_date(self.next_billing_date)?,
            status: parse_status(&self.status)?,
        })
    }
}

/// SurrealDB implementation of the record store.
#[derive(Clone)]
pub struct SurrealRecordStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRecordStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RecordStore for SurrealRecordStore<C> {
    async fn list_contracts(&self, tenant_id: Uuid) -> VantageResult<Vec<Contract>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM contract \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ContractRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| row.try_into_contract())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn list_invoices(&self, tenant_id: Uuid) -> VantageResult<Vec<Invoice>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM invoice \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvoiceRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| row.try_into_invoice())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn list_subscriptions(&self, tenant_id: Uuid) -> VantageResult<Vec<Subscription>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM subscription \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubscriptionRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| row.try_into_subscription())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}
