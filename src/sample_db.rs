//! A sample customer table and the eleven catalog views, for trying the
//! dashboard and exporter without a production database.

use rusqlite::Connection;

use crate::Error;

/// Generates 240 customers from their row number so the sample is the same
/// every time.
const CREATE_CUSTOMERS: &str = "
CREATE TABLE customers (
    customer_id INTEGER PRIMARY KEY,
    branch TEXT NOT NULL,
    account_type TEXT NOT NULL,
    income REAL NOT NULL,
    balance REAL NOT NULL,
    tenure_years INTEGER NOT NULL,
    churned INTEGER NOT NULL
);

WITH RECURSIVE seq(n) AS (
    SELECT 1
    UNION ALL
    SELECT n + 1 FROM seq WHERE n < 240
)
INSERT INTO customers (customer_id, branch, account_type, income, balance, tenure_years, churned)
SELECT
    n,
    CASE n % 4
        WHEN 0 THEN 'Downtown'
        WHEN 1 THEN 'Uptown'
        WHEN 2 THEN 'Riverside'
        ELSE 'Airport'
    END,
    CASE n % 3
        WHEN 0 THEN 'Checking'
        WHEN 1 THEN 'Savings'
        ELSE 'Premium'
    END,
    20000 + (n * 7919) % 130000,
    ROUND(500 + (n * 104729) % 95000 + (n % 100) / 100.0, 2),
    n % 15,
    CASE WHEN n % 7 = 0 OR (n % 15 < 2 AND n % 2 = 0) THEN 1 ELSE 0 END
FROM seq;
";

const CREATE_VIEWS: &str = "
CREATE VIEW churn_by_branch AS
SELECT
    branch,
    COUNT(*) AS num_customers,
    SUM(churned) AS churned_customers,
    ROUND(100.0 * SUM(churned) / COUNT(*), 2) AS churn_rate_pct
FROM customers
GROUP BY branch
ORDER BY churn_rate_pct DESC;

CREATE VIEW churn_by_account_type AS
SELECT
    account_type,
    COUNT(*) AS num_customers,
    SUM(churned) AS churned_customers,
    ROUND(100.0 * SUM(churned) / COUNT(*), 2) AS churn_rate_pct
FROM customers
GROUP BY account_type
ORDER BY churn_rate_pct DESC;

CREATE VIEW income_band_churn AS
SELECT
    CASE
        WHEN income < 40000 THEN 'Under $40k'
        WHEN income < 80000 THEN '$40k - $80k'
        WHEN income < 120000 THEN '$80k - $120k'
        ELSE '$120k+'
    END AS income_band,
    COUNT(*) AS num_customers,
    ROUND(100.0 * SUM(churned) / COUNT(*), 2) AS churn_rate_pct
FROM customers
GROUP BY income_band
ORDER BY MIN(income);

CREATE VIEW avg_balance_by_branch AS
SELECT
    branch,
    COUNT(*) AS num_customers,
    ROUND(AVG(balance), 2) AS avg_balance
FROM customers
GROUP BY branch
ORDER BY avg_balance DESC;

CREATE VIEW avg_balance_by_account_type AS
SELECT
    account_type,
    COUNT(*) AS num_customers,
    ROUND(AVG(balance), 2) AS avg_balance
FROM customers
GROUP BY account_type
ORDER BY avg_balance DESC;

CREATE VIEW balance_by_tenure AS
SELECT
    CASE
        WHEN tenure_years <= 2 THEN '0-2 years'
        WHEN tenure_years <= 5 THEN '3-5 years'
        WHEN tenure_years <= 9 THEN '6-9 years'
        ELSE '10+ years'
    END AS tenure_group,
    COUNT(*) AS num_customers,
    ROUND(AVG(balance), 2) AS avg_balance
FROM customers
GROUP BY tenure_group
ORDER BY MIN(tenure_years);

CREATE VIEW account_type_distribution AS
SELECT
    account_type,
    COUNT(*) AS num_customers,
    ROUND(100.0 * COUNT(*) / (SELECT COUNT(*) FROM customers), 2) AS pct_of_customers
FROM customers
GROUP BY account_type
ORDER BY num_customers DESC;

CREATE VIEW branch_distribution AS
SELECT
    branch,
    COUNT(*) AS num_customers,
    ROUND(100.0 * COUNT(*) / (SELECT COUNT(*) FROM customers), 2) AS pct_of_customers
FROM customers
GROUP BY branch
ORDER BY num_customers DESC;

CREATE VIEW high_value_customers AS
SELECT customer_id, branch, account_type, balance, income, tenure_years, churned
FROM customers
WHERE balance >= 75000
ORDER BY balance DESC;

CREATE VIEW overall_kpis AS
SELECT
    COUNT(*) AS total_customers,
    ROUND(100.0 * SUM(churned) / COUNT(*), 2) AS overall_churn_rate_pct,
    ROUND(AVG(balance), 2) AS avg_balance,
    ROUND(SUM(balance), 2) AS total_balance
FROM customers;

CREATE VIEW branch_performance AS
SELECT
    branch,
    COUNT(*) AS num_customers,
    ROUND(100.0 * SUM(churned) / COUNT(*), 2) AS churn_rate_pct,
    ROUND(AVG(balance), 2) AS avg_balance,
    ROUND(SUM(balance), 2) AS total_balance
FROM customers
GROUP BY branch
ORDER BY branch;
";

/// Create the `customers` table, fill it with sample data, and create the
/// eleven catalog views on top of it.
///
/// # Errors
/// Returns an error if any of the tables or views already exist or if there
/// is an SQL error.
pub fn create_sample_database(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(CREATE_CUSTOMERS)?;
    connection.execute_batch(CREATE_VIEWS)?;

    Ok(())
}
