//! Chainable, lazily-evaluated queries over a [`TableStore`].
//!
//! A [`Query`] accumulates filters, sort keys, and an operation into an
//! immutable [`QueryRequest`] descriptor; nothing touches storage until the
//! descriptor reaches the single [`execute`] entry point. The builder is
//! consumed by every chain call, so no mutable state is shared between
//! chains and a request runs exactly once.

use std::cmp::Ordering;

use serde_json::Value;

use crate::record::Record;
use crate::store::{StoreError, TableStore};

/// Comparison operator for one filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Field equals the value.
    Eq,
    /// Field differs from the value.
    Neq,
}

/// One conjunctive filter predicate. Multiple predicates AND together; there
/// is no OR and no nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Field the predicate reads.
    pub column: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Value compared against, by JSON equality.
    pub value: Value,
}

/// One sort key. Keys compare in declaration order, first key primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field the key reads. Missing fields sort as null.
    pub column: String,
    /// Ascending when true.
    pub ascending: bool,
}

/// The operation a request performs when executed. Exactly one applies.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Return the filtered rows.
    Read,
    /// Append the payload rows; filters are ignored entirely.
    Insert(Vec<Record>),
    /// Merge the patch into every row matching the filters.
    Update(Record),
    /// Remove every row matching the filters.
    Delete,
}

/// Immutable descriptor of one storage request.
///
/// Built incrementally by [`Query`], owned solely by the caller, and
/// consumed exactly once by [`execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Table the request is bound to.
    pub table: String,
    /// What the request does.
    pub operation: Operation,
    /// Conjunctive predicates.
    pub filters: Vec<Filter>,
    /// Sort keys, declaration order.
    pub sort: Vec<SortKey>,
    /// Result cap, applied after filtering and sorting.
    pub limit: Option<usize>,
    /// Exactly-one-row expectation.
    pub single: bool,
}

/// Errors that can occur executing a query.
///
/// Expected conditions are successes: an empty read, a zero-row update, and
/// a zero-row delete all return `Ok`. Only the single-row violation, payload
/// validation, and storage faults surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A `single()` request matched no rows.
    #[error("row not found")]
    NotFound,

    /// The caller-supplied payload is unusable.
    #[error("invalid payload: {0}")]
    Validation(String),

    /// The underlying table store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fluent builder for [`QueryRequest`] descriptors.
///
/// ```
/// use meridian_core::query::Query;
///
/// let request = Query::table("transactions")
///     .filter_eq("status", "PENDING")
///     .sort_by("date", false)
///     .limit(20)
///     .into_request();
/// assert_eq!(request.table, "transactions");
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    request: QueryRequest,
}

impl Query {
    /// Start a READ request bound to `table`.
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            request: QueryRequest {
                table: table.into(),
                operation: Operation::Read,
                filters: Vec::new(),
                sort: Vec::new(),
                limit: None,
                single: false,
            },
        }
    }

    /// Require `column == value`. A missing field never matches.
    #[must_use]
    pub fn filter_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request.filters.push(Filter {
            column: column.into(),
            op: FilterOp::Eq,
            value: value.into(),
        });
        self
    }

    /// Require `column != value`. A missing field always matches.
    #[must_use]
    pub fn filter_neq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request.filters.push(Filter {
            column: column.into(),
            op: FilterOp::Neq,
            value: value.into(),
        });
        self
    }

    /// Append a sort key. Earlier keys take precedence.
    #[must_use]
    pub fn sort_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.request.sort.push(SortKey {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Cap the result count, applied after filtering and sorting.
    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.request.limit = Some(n);
        self
    }

    /// Expect exactly one row. An empty result fails with
    /// [`QueryError::NotFound`] instead of returning an empty success.
    #[must_use]
    pub fn single(mut self) -> Self {
        self.request.single = true;
        self
    }

    /// Switch the operation to INSERT with the given rows.
    #[must_use]
    pub fn insert(mut self, rows: Vec<Record>) -> Self {
        self.request.operation = Operation::Insert(rows);
        self
    }

    /// Switch the operation to INSERT with a single row.
    #[must_use]
    pub fn insert_one(self, row: Record) -> Self {
        self.insert(vec![row])
    }

    /// Switch the operation to UPDATE with the given partial payload.
    #[must_use]
    pub fn update(mut self, patch: Record) -> Self {
        self.request.operation = Operation::Update(patch);
        self
    }

    /// Switch the operation to DELETE.
    #[must_use]
    pub fn delete(mut self) -> Self {
        self.request.operation = Operation::Delete;
        self
    }

    /// Finish building and hand back the immutable descriptor.
    #[must_use]
    pub fn into_request(self) -> QueryRequest {
        self.request
    }

    /// Execute against `store` and return the materialized rows.
    ///
    /// # Errors
    ///
    /// See [`execute`].
    pub async fn fetch<S>(self, store: &S) -> Result<Vec<Record>, QueryError>
    where
        S: TableStore + ?Sized,
    {
        execute(self.request, store).await
    }

    /// Execute against `store`, expecting exactly one row.
    ///
    /// # Errors
    ///
    /// Fails with [`QueryError::NotFound`] when no row matches, plus the
    /// failure modes of [`execute`].
    pub async fn fetch_one<S>(self, store: &S) -> Result<Record, QueryError>
    where
        S: TableStore + ?Sized,
    {
        let rows = execute(self.single().request, store).await?;
        rows.into_iter().next().ok_or(QueryError::NotFound)
    }
}

/// Execute a request against a table store.
///
/// Filters apply to the pre-existing table state for UPDATE and DELETE
/// targeting; INSERT ignores them entirely. Sort, limit, and the single-row
/// expectation shape only the materialized result, never the mutation scope.
/// DELETE surfaces no content.
///
/// # Errors
///
/// - [`QueryError::NotFound`] when a `single()` request matches no rows.
/// - [`QueryError::Validation`] for an empty insert payload or a patch that
///   tries to rewrite the immutable `id` field.
/// - [`QueryError::Store`] when the underlying store fails.
pub async fn execute<S>(request: QueryRequest, store: &S) -> Result<Vec<Record>, QueryError>
where
    S: TableStore + ?Sized,
{
    let QueryRequest {
        table,
        operation,
        filters,
        sort,
        limit,
        single,
    } = request;

    let rows = store.read_table(&table).await?;

    let result = match operation {
        Operation::Read => rows
            .into_iter()
            .filter(|row| matches(row, &filters))
            .collect(),
        Operation::Insert(payloads) => {
            if payloads.is_empty() {
                return Err(QueryError::Validation(
                    "insert requires at least one row".into(),
                ));
            }
            let mut all = rows;
            let mut inserted = Vec::with_capacity(payloads.len());
            for mut row in payloads {
                row.ensure_id();
                inserted.push(row.clone());
                all.push(row);
            }
            store.write_table(&table, &all).await?;
            tracing::debug!(table = %table, rows = inserted.len(), "inserted rows");
            inserted
        }
        Operation::Update(patch) => {
            if patch.get("id").is_some() {
                return Err(QueryError::Validation("the id field is immutable".into()));
            }
            let mut all = rows;
            let mut updated = Vec::new();
            for row in &mut all {
                if matches(row, &filters) {
                    row.merge(&patch);
                    updated.push(row.clone());
                }
            }
            store.write_table(&table, &all).await?;
            tracing::debug!(table = %table, rows = updated.len(), "updated rows");
            updated
        }
        Operation::Delete => {
            let before = rows.len();
            let kept: Vec<Record> = rows
                .into_iter()
                .filter(|row| !matches(row, &filters))
                .collect();
            store.write_table(&table, &kept).await?;
            tracing::debug!(table = %table, rows = before - kept.len(), "deleted rows");
            // Deletion results are not surfaced.
            return Ok(Vec::new());
        }
    };

    materialize(result, &sort, limit, single)
}

/// Whether a row satisfies every predicate.
fn matches(row: &Record, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| {
        let equal = row.get(&filter.column) == Some(&filter.value);
        match filter.op {
            FilterOp::Eq => equal,
            FilterOp::Neq => !equal,
        }
    })
}

/// Apply sort keys, the row cap, and the single-row expectation.
fn materialize(
    mut rows: Vec<Record>,
    sort: &[SortKey],
    limit: Option<usize>,
    single: bool,
) -> Result<Vec<Record>, QueryError> {
    if !sort.is_empty() {
        rows.sort_by(|a, b| {
            for key in sort {
                let ord = json_cmp(a.get(&key.column), b.get(&key.column));
                let ord = if key.ascending { ord } else { ord.reverse() };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    if let Some(n) = limit {
        rows.truncate(n);
    }

    if single {
        if rows.is_empty() {
            return Err(QueryError::NotFound);
        }
        rows.truncate(1);
    }

    Ok(rows)
}

/// Total order over JSON values for sorting.
///
/// Same-type scalars compare naturally; anything else falls back to a type
/// rank (null < bool < number < string < array < object). Missing fields
/// compare as null.
fn json_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&y.as_f64().unwrap_or_default()),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    use crate::session::Session;

    /// Bare map-backed store: no seeds, no durability. Exercises the trait
    /// contract without pulling in a real backend.
    #[derive(Default)]
    struct MapStore {
        tables: Mutex<HashMap<String, Vec<Record>>>,
    }

    #[async_trait]
    impl TableStore for MapStore {
        async fn read_table(&self, table: &str) -> Result<Vec<Record>, StoreError> {
            Ok(self
                .tables
                .lock()
                .await
                .get(table)
                .cloned()
                .unwrap_or_default())
        }

        async fn write_table(&self, table: &str, rows: &[Record]) -> Result<(), StoreError> {
            self.tables
                .lock()
                .await
                .insert(table.to_string(), rows.to_vec());
            Ok(())
        }

        async fn read_session(&self) -> Result<Option<Session>, StoreError> {
            Ok(None)
        }

        async fn write_session(&self, _session: &Session) -> Result<(), StoreError> {
            Ok(())
        }

        async fn clear_session(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn row(value: serde_json::Value) -> Record {
        Record::from_value(value).unwrap()
    }

    async fn seeded_transactions() -> MapStore {
        let store = MapStore::default();
        let rows = vec![
            row(json!({ "id": "t1", "status": "PENDING", "amount": 100, "date": "2024-01-01" })),
            row(json!({ "id": "t2", "status": "SUCCESS", "amount": 50, "date": "2024-01-02" })),
            row(json!({ "id": "t3", "status": "PENDING", "amount": 300, "date": "2024-01-03" })),
            row(json!({ "id": "t4", "status": "REJECTED", "amount": 10, "date": "2024-01-04" })),
            row(json!({ "id": "t5", "status": "PENDING", "amount": 200, "date": "2024-01-05" })),
        ];
        store.write_table("transactions", &rows).await.unwrap();
        store
    }

    #[tokio::test]
    async fn read_filters_conjunctively() {
        let store = seeded_transactions().await;
        let rows = Query::table("transactions")
            .filter_eq("status", "PENDING")
            .filter_neq("id", "t1")
            .fetch(&store)
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id().unwrap().to_string()).collect();
        assert_eq!(ids, ["t3", "t5"]);
    }

    #[tokio::test]
    async fn eq_never_matches_missing_fields_and_neq_always_does() {
        let store = MapStore::default();
        store
            .write_table("rows", &[row(json!({ "id": "a" }))])
            .await
            .unwrap();

        let eq = Query::table("rows")
            .filter_eq("flag", Value::Null)
            .fetch(&store)
            .await
            .unwrap();
        assert!(eq.is_empty());

        let neq = Query::table("rows")
            .filter_neq("flag", true)
            .fetch(&store)
            .await
            .unwrap();
        assert_eq!(neq.len(), 1);
    }

    #[tokio::test]
    async fn sort_keys_apply_in_declaration_order() {
        let store = MapStore::default();
        let rows = vec![
            row(json!({ "id": "a", "group": 2, "rank": 1 })),
            row(json!({ "id": "b", "group": 1, "rank": 2 })),
            row(json!({ "id": "c", "group": 1, "rank": 1 })),
        ];
        store.write_table("rows", &rows).await.unwrap();

        let sorted = Query::table("rows")
            .sort_by("group", true)
            .sort_by("rank", false)
            .fetch(&store)
            .await
            .unwrap();
        let ids: Vec<_> = sorted.iter().map(|r| r.id().unwrap().to_string()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn missing_sort_fields_order_as_null() {
        let store = MapStore::default();
        let rows = vec![
            row(json!({ "id": "a", "rank": 5 })),
            row(json!({ "id": "b" })),
        ];
        store.write_table("rows", &rows).await.unwrap();

        let sorted = Query::table("rows")
            .sort_by("rank", true)
            .fetch(&store)
            .await
            .unwrap();
        assert_eq!(sorted[0].id(), Some("b"));
    }

    #[tokio::test]
    async fn limit_caps_after_sort() {
        let store = seeded_transactions().await;
        let rows = Query::table("transactions")
            .sort_by("amount", false)
            .limit(2)
            .fetch(&store)
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id().unwrap().to_string()).collect();
        assert_eq!(ids, ["t3", "t5"]);
    }

    #[tokio::test]
    async fn single_on_empty_result_is_not_found() {
        let store = seeded_transactions().await;
        let result = Query::table("transactions")
            .filter_eq("status", "CANCELLED")
            .single()
            .fetch(&store)
            .await;
        assert!(matches!(result, Err(QueryError::NotFound)));
    }

    #[tokio::test]
    async fn single_returns_only_the_first_row() {
        let store = seeded_transactions().await;
        let rows = Query::table("transactions")
            .filter_eq("status", "PENDING")
            .sort_by("amount", true)
            .single()
            .fetch(&store)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id(), Some("t1"));
    }

    #[tokio::test]
    async fn insert_appends_and_generates_ids() {
        let store = MapStore::default();
        let inserted = Query::table("rows")
            .insert(vec![
                row(json!({ "id": "fixed", "n": 1 })),
                row(json!({ "n": 2 })),
            ])
            .fetch(&store)
            .await
            .unwrap();

        assert_eq!(inserted[0].id(), Some("fixed"));
        let generated = inserted[1].id().unwrap().to_string();
        assert!(!generated.is_empty());

        let read_back = Query::table("rows")
            .filter_eq("id", generated.as_str())
            .fetch(&store)
            .await
            .unwrap();
        assert_eq!(read_back.len(), 1);
        assert_eq!(read_back[0].get("n"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn insert_ignores_filters() {
        let store = MapStore::default();
        let inserted = Query::table("rows")
            .filter_eq("status", "NOPE")
            .insert_one(row(json!({ "n": 1 })))
            .fetch(&store)
            .await
            .unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(store.read_table("rows").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_insert_is_a_validation_error() {
        let store = MapStore::default();
        let result = Query::table("rows").insert(Vec::new()).fetch(&store).await;
        assert!(matches!(result, Err(QueryError::Validation(_))));
    }

    #[tokio::test]
    async fn update_mutates_exactly_the_matching_rows() {
        let store = seeded_transactions().await;
        let updated = Query::table("transactions")
            .filter_eq("status", "PENDING")
            .update(row(json!({ "status": "SUCCESS" })))
            .fetch(&store)
            .await
            .unwrap();

        // Three pending rows mutate; the other two stay untouched.
        assert_eq!(updated.len(), 3);
        assert!(updated
            .iter()
            .all(|r| r.get("status") == Some(&json!("SUCCESS"))));

        let all = store.read_table("transactions").await.unwrap();
        let success = all
            .iter()
            .filter(|r| r.get("status") == Some(&json!("SUCCESS")))
            .count();
        let rejected = all
            .iter()
            .filter(|r| r.get("status") == Some(&json!("REJECTED")))
            .count();
        assert_eq!(success, 4);
        assert_eq!(rejected, 1);
    }

    #[tokio::test]
    async fn update_with_no_match_succeeds_empty() {
        let store = seeded_transactions().await;
        let updated = Query::table("transactions")
            .filter_eq("status", "CANCELLED")
            .update(row(json!({ "status": "SUCCESS" })))
            .fetch(&store)
            .await
            .unwrap();
        assert!(updated.is_empty());
    }

    #[tokio::test]
    async fn update_cannot_rewrite_the_id() {
        let store = seeded_transactions().await;
        let result = Query::table("transactions")
            .filter_eq("id", "t1")
            .update(row(json!({ "id": "t9" })))
            .fetch(&store)
            .await;
        assert!(matches!(result, Err(QueryError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_returns_no_content() {
        let store = seeded_transactions().await;

        let first = Query::table("transactions")
            .filter_eq("status", "PENDING")
            .delete()
            .fetch(&store)
            .await
            .unwrap();
        assert!(first.is_empty());
        assert_eq!(store.read_table("transactions").await.unwrap().len(), 2);

        let second = Query::table("transactions")
            .filter_eq("status", "PENDING")
            .delete()
            .fetch(&store)
            .await
            .unwrap();
        assert!(second.is_empty());
        assert_eq!(store.read_table("transactions").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fetch_one_returns_the_record() {
        let store = seeded_transactions().await;
        let record = Query::table("transactions")
            .filter_eq("id", "t2")
            .fetch_one(&store)
            .await
            .unwrap();
        assert_eq!(record.get("amount"), Some(&json!(50)));
    }

    #[tokio::test]
    async fn unknown_table_reads_empty() {
        let store = MapStore::default();
        let rows = Query::table("missing").fetch(&store).await.unwrap();
        assert!(rows.is_empty());
    }
}
