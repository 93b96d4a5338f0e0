//! In-memory procedure store for tests.
//!
//! [`FakeProcedureStore`] understands the entity procedure shapes used by
//! the SQL DAOs (`Insert_<E>`, `Get_<E>s_With_Limit`, ...) and keeps one
//! table per entity. Any other procedure must be scripted with
//! [`FakeProcedureStore::script`]. Every call is recorded when the store
//! acts on it, so a stream that is never polled records nothing.

use crate::store::{ProcedureCall, ProcedureStore, RowStream, SqlValue, StoreRow};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::Stream;
use northwind_core::{NorthwindError, NorthwindResult};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct TableShape {
    singular: &'static str,
    plural: &'static str,
    key: &'static str,
    name: &'static str,
}

const SHAPES: [TableShape; 3] = [
    TableShape {
        singular: "Product",
        plural: "Products",
        key: "ProductID",
        name: "ProductName",
    },
    TableShape {
        singular: "Category",
        plural: "Categories",
        key: "CategoryID",
        name: "CategoryName",
    },
    TableShape {
        singular: "Employee",
        plural: "Employees",
        key: "EmployeeID",
        name: "LastName",
    },
];

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, StoreRow>,
}

enum Outcome {
    Affected(u64),
    Rows(Vec<StoreRow>),
}

#[derive(Default)]
struct FakeState {
    tables: HashMap<&'static str, Table>,
    scripted: HashMap<String, Vec<StoreRow>>,
    failures: VecDeque<String>,
    calls: Vec<ProcedureCall>,
    rows_yielded: usize,
}

/// Stateful in-memory stand-in for a stored-procedure database.
#[derive(Clone, Default)]
pub struct FakeProcedureStore {
    state: Arc<Mutex<FakeState>>,
}

impl std::fmt::Debug for FakeProcedureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeProcedureStore")
            .field("calls", &self.call_count())
            .finish_non_exhaustive()
    }
}

fn lock(state: &Mutex<FakeState>) -> MutexGuard<'_, FakeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeProcedureStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `procedure` return `rows`, overriding any built-in behaviour.
    pub fn script(&self, procedure: &str, rows: Vec<StoreRow>) {
        lock(&self.state).scripted.insert(procedure.to_string(), rows);
    }

    /// Fails the next call with a database error.
    pub fn fail_next(&self, message: &str) {
        lock(&self.state).failures.push_back(message.to_string());
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ProcedureCall> {
        lock(&self.state).calls.clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.state).calls.len()
    }

    /// Forgets recorded calls, keeping table contents.
    pub fn clear_calls(&self) {
        lock(&self.state).calls.clear();
    }

    /// Rows handed to consumers across all query streams.
    #[must_use]
    pub fn rows_yielded(&self) -> usize {
        lock(&self.state).rows_yielded
    }
}

impl FakeState {
    fn dispatch(&mut self, call: ProcedureCall) -> NorthwindResult<Outcome> {
        self.calls.push(call.clone());

        if let Some(message) = self.failures.pop_front() {
            return Err(NorthwindError::Database(message));
        }
        if let Some(rows) = self.scripted.get(call.name()) {
            return Ok(Outcome::Rows(rows.clone()));
        }

        let name = call.name();
        for shape in &SHAPES {
            if let Some(outcome) = self.entity_procedure(shape, name, &call)? {
                return Ok(outcome);
            }
        }
        Err(NorthwindError::Database(format!("PROCEDURE {name} does not exist")))
    }

    fn entity_procedure(
        &mut self,
        shape: &TableShape,
        name: &str,
        call: &ProcedureCall,
    ) -> NorthwindResult<Option<Outcome>> {
        let table = self.tables.entry(shape.singular).or_default();
        let (s, p) = (shape.singular, shape.plural);

        let outcome = if name == format!("Insert_{s}") {
            table.next_id += 1;
            let id = table.next_id;
            let mut row = StoreRow::new().with(shape.key, SqlValue::Int(id));
            for parameter in call.parameters() {
                row.push(parameter.name, parameter.value.clone());
            }
            table.rows.insert(id, row);
            Outcome::Affected(1)
        } else if name == format!("Delete_{s}") {
            let id = int_param(call, shape.key)?;
            Outcome::Affected(u64::from(table.rows.remove(&id).is_some()))
        } else if name == format!("Update_{s}") {
            let id = int_param(call, shape.key)?;
            match table.rows.get_mut(&id) {
                Some(row) => {
                    for parameter in call.parameters() {
                        row.push(parameter.name, parameter.value.clone());
                    }
                    Outcome::Affected(1)
                }
                None => Outcome::Affected(0),
            }
        } else if name == format!("Get_{s}_By_Id") {
            let id = int_param(call, shape.key)?;
            Outcome::Rows(table.rows.get(&id).cloned().into_iter().collect())
        } else if name == format!("Get_{p}") {
            Outcome::Rows(table.rows.values().cloned().collect())
        } else if name == format!("Get_{p}_With_Limit") {
            let offset = usize::try_from(int_param(call, "Offset")?).unwrap_or(0);
            let count = usize::try_from(int_param(call, "RowCount")?).unwrap_or(0);
            Outcome::Rows(table.rows.values().skip(offset).take(count).cloned().collect())
        } else if name == format!("Get_{p}_By_Names") {
            // Mirrors the case-insensitive column collation.
            let names: Vec<String> = json_param::<Vec<String>>(call, "Names")?
                .iter()
                .map(|n| n.to_lowercase())
                .collect();
            Outcome::Rows(filter_rows(table, |row| {
                row.get::<String>(shape.name)
                    .is_ok_and(|value| names.contains(&value.to_lowercase()))
            }))
        } else if name == "Get_Products_By_Categories" && s == "Product" {
            let ids: Vec<i64> = json_param(call, "CategoryIDs")?;
            Outcome::Rows(filter_rows(table, |row| in_category(row, &ids)))
        } else if name == "Get_Products_Count" && s == "Product" {
            Outcome::Rows(vec![count_row(table.rows.len())])
        } else if name == "Get_Products_Count_By_Category" && s == "Product" {
            let ids = [int_param(call, "CategoryID")?];
            let count = table.rows.values().filter(|row| in_category(row, &ids)).count();
            Outcome::Rows(vec![count_row(count)])
        } else {
            return Ok(None);
        };
        Ok(Some(outcome))
    }
}

fn int_param(call: &ProcedureCall, name: &str) -> NorthwindResult<i64> {
    match call.parameter(name).map(|p| &p.value) {
        Some(SqlValue::Int(v)) => Ok(*v),
        other => Err(NorthwindError::Database(format!(
            "{}: parameter @{name} expected an integer, got {other:?}",
            call.name()
        ))),
    }
}

fn json_param<T: serde::de::DeserializeOwned>(call: &ProcedureCall, name: &str) -> NorthwindResult<T> {
    match call.parameter(name).map(|p| &p.value) {
        Some(SqlValue::Text(json)) => Ok(serde_json::from_str(json)?),
        other => Err(NorthwindError::Database(format!(
            "{}: parameter @{name} expected JSON text, got {other:?}",
            call.name()
        ))),
    }
}

fn filter_rows(table: &Table, keep: impl Fn(&StoreRow) -> bool) -> Vec<StoreRow> {
    table.rows.values().filter(|row| keep(row)).cloned().collect()
}

fn in_category(row: &StoreRow, ids: &[i64]) -> bool {
    matches!(row.get_opt::<i64>("CategoryID"), Ok(Some(id)) if ids.contains(&id))
}

fn count_row(count: usize) -> StoreRow {
    StoreRow::new().with("ProductCount", SqlValue::Int(i64::try_from(count).unwrap_or(i64::MAX)))
}

fn fake_rows(
    state: Arc<Mutex<FakeState>>,
    call: ProcedureCall,
) -> impl Stream<Item = NorthwindResult<StoreRow>> + Send + 'static {
    try_stream! {
        let outcome = lock(&state).dispatch(call);
        let rows = match outcome? {
            Outcome::Rows(rows) => rows,
            Outcome::Affected(_) => Vec::new(),
        };
        for row in rows {
            lock(&state).rows_yielded += 1;
            yield row;
        }
    }
}

#[async_trait]
impl ProcedureStore for FakeProcedureStore {
    async fn execute(&self, call: ProcedureCall) -> NorthwindResult<u64> {
        match lock(&self.state).dispatch(call)? {
            Outcome::Affected(count) => Ok(count),
            Outcome::Rows(rows) => Ok(rows.len() as u64),
        }
    }

    fn query(&self, call: ProcedureCall) -> RowStream {
        Box::pin(fake_rows(Arc::clone(&self.state), call))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqlType;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_unknown_procedure_is_database_error() {
        let store = FakeProcedureStore::new();
        let err = store
            .execute(ProcedureCall::new("Drop_Everything"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_rows_win() {
        let store = FakeProcedureStore::new();
        store.script(
            "Most_Expensive_Products",
            vec![StoreRow::new().with("TenMostExpensiveProducts", "Côte de Blaye")],
        );

        let rows: Vec<StoreRow> = store
            .query(ProcedureCall::new("Most_Expensive_Products").param("Count", SqlType::Int, 1))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.rows_yielded(), 1);
    }

    #[tokio::test]
    async fn test_unpolled_query_records_nothing() {
        let store = FakeProcedureStore::new();
        let stream = store.query(ProcedureCall::new("Get_Products"));
        drop(stream);
        assert_eq!(store.call_count(), 0);
    }
}
