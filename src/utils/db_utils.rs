use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::SqlitePool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
/// Only keys listed in `allowed` may appear in the payload; everything else is
/// rejected before any SQL is assembled.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed: &[&str],
    id_column: &str,
    id_value: i64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    for key in obj.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(ErrorBadRequest(format!("Unknown field: {}", key)));
        }
    }

    // Build SET clause
    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    // Convert JSON values -> SqlValue
    for value in obj.values() {
        match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    values.push(SqlValue::Date(d));
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    values.push(SqlValue::DateTime(dt));
                } else {
                    values.push(SqlValue::String(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    // WHERE id = ?
    values.push(SqlValue::I64(id_value));

    Ok(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &SqlitePool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MEMBER_COLUMNS: [&str; 3] = ["name", "position", "pto_balance_hours"];

    #[test]
    fn test_build_update_sql() {
        let payload = json!({"name": "New Name", "pto_balance_hours": 45.0});
        let update = build_update_sql("members", &payload, &MEMBER_COLUMNS, "id", 7).unwrap();

        assert_eq!(
            update.sql,
            "UPDATE members SET name = ?, pto_balance_hours = ? WHERE id = ?"
        );
        assert_eq!(update.values.len(), 3);
    }

    #[test]
    fn test_rejects_unknown_field() {
        let payload = json!({"email": "sneaky@example.com"});
        assert!(build_update_sql("members", &payload, &MEMBER_COLUMNS, "id", 7).is_err());
    }

    #[test]
    fn test_rejects_empty_payload() {
        let payload = json!({});
        assert!(build_update_sql("members", &payload, &MEMBER_COLUMNS, "id", 7).is_err());
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let payload = json!(["not", "an", "object"]);
        assert!(build_update_sql("members", &payload, &MEMBER_COLUMNS, "id", 7).is_err());
    }

    #[actix_web::test]
    async fn test_execute_update_changes_row() {
        let pool = crate::db::test_pool().await;
        sqlx::query("INSERT INTO members (name, email, team, position) VALUES (?, ?, ?, ?)")
            .bind("Before")
            .bind("update.target@example.com")
            .bind("admin")
            .bind("CT Desk")
            .execute(&pool)
            .await
            .unwrap();

        let payload = json!({"name": "After", "pto_balance_hours": 37.5});
        let update = build_update_sql("members", &payload, &MEMBER_COLUMNS, "id", 1).unwrap();
        let affected = execute_update(&pool, update).await.unwrap();
        assert_eq!(affected, 1);

        let (name, hours): (String, f64) =
            sqlx::query_as("SELECT name, pto_balance_hours FROM members WHERE id = 1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(name, "After");
        assert_eq!(hours, 37.5);
    }
}
