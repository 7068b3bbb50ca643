use crate::models::DbCustomer;
use chrono::Utc;
use eyre::Result;
use sqlx::PgConnection;
use uuid::Uuid;

/// Returns the customer registered under `email`, inserting one if there is
/// none. An existing record is never modified.
pub async fn find_or_create_customer(
    conn: &mut PgConnection,
    name: &str,
    email: &str,
    phone: Option<&str>,
) -> Result<DbCustomer> {
    let inserted = sqlx::query_as::<_, DbCustomer>(
        r#"
        INSERT INTO customers (id, name, email, phone, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO NOTHING
        RETURNING id, name, email, phone, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(Utc::now())
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(customer) = inserted {
        tracing::debug!("Customer created: id={}", customer.id);
        return Ok(customer);
    }

    let existing = sqlx::query_as::<_, DbCustomer>(
        r#"
        SELECT id, name, email, phone, created_at
        FROM customers
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_one(&mut *conn)
    .await?;

    Ok(existing)
}
