use crate::console::{self, ExecuteOutcome, StatementKind};
use crate::DbError;
use core_types::{
    CustomerDiscount, CustomerMembership, MethodRevenue, MonthlySales, NewProduct, OrderSummary,
    Product, ProductDeletion, ProductPatch, RoutineInfo, TopProduct, TriggerInfo,
};
use sqlx::mysql::MySqlPool;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: MySqlPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Total revenue collected per payment method, highest-earning first.
    pub async fn revenue_by_method(&self) -> Result<Vec<MethodRevenue>, DbError> {
        let rows = sqlx::query_as::<_, MethodRevenue>(
            r#"
            SELECT
                p.method AS method,
                SUM(p.amount_paid) AS total_revenue
            FROM
                payments AS p
            GROUP BY
                p.method
            ORDER BY
                total_revenue DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The three best-selling products by total units sold.
    pub async fn top_products(&self) -> Result<Vec<TopProduct>, DbError> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT
                p.product_name AS product_name,
                SUM(oi.quantity) AS total_sold
            FROM
                order_items AS oi
            JOIN
                products AS p ON p.product_id = oi.product_id
            GROUP BY
                oi.product_id, p.product_name
            ORDER BY
                total_sold DESC
            LIMIT 3
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Sales totals grouped by calendar month, ascending by month key.
    pub async fn monthly_sales(&self) -> Result<Vec<MonthlySales>, DbError> {
        let rows = sqlx::query_as::<_, MonthlySales>(
            r#"
            SELECT
                DATE_FORMAT(o.order_date, '%Y-%m') AS month,
                SUM(o.total_amount) AS monthly_sales
            FROM
                orders AS o
            GROUP BY
                month
            ORDER BY
                month ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Customers joined with their membership tier. Customers without a
    /// membership are not part of this report (inner join).
    pub async fn customers_with_membership(&self) -> Result<Vec<CustomerMembership>, DbError> {
        let rows = sqlx::query_as::<_, CustomerMembership>(
            r#"
            SELECT
                c.customer_id AS customer_id,
                c.name AS name,
                m.type AS membership_type,
                m.discount_rate AS discount_rate
            FROM
                customers AS c
            JOIN
                memberships AS m ON m.membership_id = c.membership_id
            ORDER BY
                c.customer_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The ten most recent orders with customer and employee names. The
    /// employee join is LEFT because self-service orders carry no employee.
    pub async fn recent_orders(&self) -> Result<Vec<OrderSummary>, DbError> {
        let rows = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT
                o.order_id AS order_id,
                c.name AS customer_name,
                e.name AS employee_name,
                o.total_amount AS total_amount
            FROM
                orders AS o
            JOIN
                customers AS c ON c.customer_id = o.customer_id
            LEFT JOIN
                employees AS e ON e.employee_id = o.employee_id
            ORDER BY
                o.order_id DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Lists products ordered by id, up to `limit` rows.
    pub async fn list_products(&self, limit: i64) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT product_id, product_name, price, category_id, supplier_id FROM products ORDER BY product_id ASC LIMIT ?"
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Fetches a single product by id, or `None` when no such row exists.
    pub async fn get_product(&self, product_id: i64) -> Result<Option<Product>, DbError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT product_id, product_name, price, category_id, supplier_id FROM products WHERE product_id = ?"
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    /// Inserts a new product and returns the generated id.
    pub async fn create_product(&self, new_product: &NewProduct) -> Result<i64, DbError> {
        let result = sqlx::query(
            "INSERT INTO products (product_name, price, category_id, supplier_id) VALUES (?, ?, ?, ?)"
        )
        .bind(&new_product.product_name)
        .bind(new_product.price)
        .bind(new_product.category_id)
        .bind(new_product.supplier_id)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_id() as i64)
    }

    /// Applies a partial update; unsupplied fields keep their stored values
    /// via `COALESCE`. Returns the number of rows the update changed, which
    /// is zero both for an unknown id and for a no-op patch.
    pub async fn update_product(
        &self,
        product_id: i64,
        patch: &ProductPatch,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                product_name = COALESCE(?, product_name),
                price = COALESCE(?, price),
                category_id = COALESCE(?, category_id),
                supplier_id = COALESCE(?, supplier_id)
            WHERE
                product_id = ?
            "#,
        )
        .bind(patch.product_name.as_deref())
        .bind(patch.price)
        .bind(patch.category_id)
        .bind(patch.supplier_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Deletes a product inside a single transaction.
    ///
    /// Order items referencing the product block the delete unless `cascade`
    /// is set, in which case they are removed in the same transaction before
    /// the product row. Inventory rows are cleaned up by the schema's
    /// `ON DELETE CASCADE`. Deleting an id with no row is not an error.
    pub async fn delete_product(
        &self,
        product_id: i64,
        cascade: bool,
    ) -> Result<ProductDeletion, DbError> {
        let mut tx = self.pool.begin().await?;

        let removed_order_items = if cascade {
            sqlx::query("DELETE FROM order_items WHERE product_id = ?")
                .bind(product_id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        } else {
            let references: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE product_id = ?")
                    .bind(product_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if references > 0 {
                tx.rollback().await?;
                return Err(DbError::ProductReferenced(product_id));
            }
            0
        };

        sqlx::query("DELETE FROM products WHERE product_id = ?")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ProductDeletion {
            cascaded: removed_order_items > 0,
            removed_order_items,
        })
    }

    /// Runs one ad-hoc statement over the text protocol and shapes the
    /// outcome by statement kind. The text protocol is what lets DDL such as
    /// `CREATE TRIGGER` through; prepared statements would reject it.
    ///
    /// The caller is expected to have applied the keyword denylist already.
    pub async fn execute_statement(&self, statement: &str) -> Result<ExecuteOutcome, DbError> {
        match StatementKind::classify(statement) {
            StatementKind::Query => {
                let rows = sqlx::raw_sql(statement).fetch_all(&self.pool).await?;
                Ok(ExecuteOutcome::Rows(console::rows_to_json(&rows)?))
            }
            StatementKind::Mutation => {
                let result = sqlx::raw_sql(statement).execute(&self.pool).await?;
                Ok(ExecuteOutcome::Mutation {
                    affected_rows: result.rows_affected(),
                    insert_id: result.last_insert_id(),
                })
            }
            StatementKind::Definition => {
                sqlx::raw_sql(statement).execute(&self.pool).await?;
                Ok(ExecuteOutcome::Definition)
            }
        }
    }

    /// Installs (or reinstalls) the order-total trigger and the customer
    /// discount procedure. Every step is idempotent via `DROP ... IF EXISTS`,
    /// so this can be called repeatedly.
    pub async fn install_order_automation(&self) -> Result<(), DbError> {
        sqlx::raw_sql("DROP TRIGGER IF EXISTS trg_order_total_recalc")
            .execute(&self.pool)
            .await?;

        sqlx::raw_sql(
            r#"
            CREATE TRIGGER trg_order_total_recalc
            AFTER INSERT ON order_items
            FOR EACH ROW
            UPDATE orders
            SET total_amount = (
                SELECT COALESCE(SUM(subtotal), 0)
                FROM order_items
                WHERE order_id = NEW.order_id
            )
            WHERE order_id = NEW.order_id
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::raw_sql("DROP PROCEDURE IF EXISTS get_customer_discount")
            .execute(&self.pool)
            .await?;

        sqlx::raw_sql(
            r#"
            CREATE PROCEDURE get_customer_discount(IN customer_name VARCHAR(100))
            SELECT
                c.name AS name,
                m.type AS membership_type,
                m.discount_rate AS discount_rate
            FROM
                customers AS c
            JOIN
                memberships AS m ON m.membership_id = c.membership_id
            WHERE
                c.name = customer_name
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks up a customer's discount through the stored procedure. Returns
    /// an empty list when the name matches nobody.
    pub async fn customer_discount(&self, name: &str) -> Result<Vec<CustomerDiscount>, DbError> {
        let rows = sqlx::query_as::<_, CustomerDiscount>("CALL get_customer_discount(?)")
            .bind(name)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Lists the triggers defined in the current schema.
    pub async fn list_triggers(&self) -> Result<Vec<TriggerInfo>, DbError> {
        let rows = sqlx::query_as::<_, TriggerInfo>(
            r#"
            SELECT
                TRIGGER_NAME AS trigger_name,
                EVENT_MANIPULATION AS event_manipulation,
                EVENT_OBJECT_TABLE AS event_object_table,
                ACTION_TIMING AS action_timing,
                CREATED AS created
            FROM
                information_schema.TRIGGERS
            WHERE
                TRIGGER_SCHEMA = DATABASE()
            ORDER BY
                trigger_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Lists the stored routines (procedures and functions) defined in the
    /// current schema.
    pub async fn list_routines(&self) -> Result<Vec<RoutineInfo>, DbError> {
        let rows = sqlx::query_as::<_, RoutineInfo>(
            r#"
            SELECT
                ROUTINE_NAME AS routine_name,
                ROUTINE_TYPE AS routine_type,
                CREATED AS created,
                LAST_ALTERED AS last_altered
            FROM
                information_schema.ROUTINES
            WHERE
                ROUTINE_SCHEMA = DATABASE()
            ORDER BY
                routine_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
