//! Reference SQL of each report (PostgreSQL), with the default parameters

/// R1: Top dishes of a customer per year
pub const R1: &str = r#"
SELECT customer_name, order_year, dish_name, total_orders
FROM (
    SELECT
        c.customer_name,
        EXTRACT(YEAR FROM o.order_date) AS order_year,
        o.order_item AS dish_name,
        COUNT(*) AS total_orders,
        DENSE_RANK() OVER (
            PARTITION BY EXTRACT(YEAR FROM o.order_date)
            ORDER BY COUNT(*) DESC
        ) AS rank
    FROM orders AS o
    JOIN customers AS c ON c.customer_id = o.customer_id
    WHERE c.customer_name = 'Arjun Mehta'
    GROUP BY c.customer_name, EXTRACT(YEAR FROM o.order_date), o.order_item
) AS ranked
WHERE rank <= 5
ORDER BY order_year, total_orders DESC, dish_name
"#;

/// R2: Popular time slots
pub const R2: &str = r#"
SELECT
    FLOOR(EXTRACT(HOUR FROM order_time) / 2) * 2 AS start_hour,
    FLOOR(EXTRACT(HOUR FROM order_time) / 2) * 2 + 2 AS end_hour,
    COUNT(*) AS total_orders
FROM orders
GROUP BY 1, 2
ORDER BY total_orders DESC, start_hour
"#;

/// R3: Order value analysis
pub const R3: &str = r#"
SELECT
    o.customer_id,
    c.customer_name,
    COUNT(*) AS total_orders,
    ROUND(AVG(o.total_amount)::numeric, 2) AS aov
FROM orders AS o
JOIN customers AS c ON c.customer_id = o.customer_id
GROUP BY o.customer_id, c.customer_name
HAVING COUNT(*) > 750
ORDER BY aov DESC, o.customer_id
"#;

/// R4: High-value customers
pub const R4: &str = r#"
SELECT
    o.customer_id,
    c.customer_name,
    ROUND(SUM(o.total_amount)::numeric, 2) AS total_spent
FROM orders AS o
JOIN customers AS c ON c.customer_id = o.customer_id
GROUP BY o.customer_id, c.customer_name
HAVING SUM(o.total_amount) > 100000
ORDER BY total_spent DESC, o.customer_id
"#;

/// R5: Orders without delivery
pub const R5: &str = r#"
SELECT
    r.restaurant_id,
    r.restaurant_name,
    r.city,
    COUNT(o.order_id) AS not_delivered
FROM orders AS o
LEFT JOIN deliveries AS d ON d.order_id = o.order_id
JOIN restaurants AS r ON r.restaurant_id = o.restaurant_id
WHERE d.delivery_id IS NULL OR d.delivery_status <> 'Delivered'
GROUP BY r.restaurant_id, r.restaurant_name, r.city
ORDER BY not_delivered DESC, r.restaurant_id
"#;

/// R6: Restaurant revenue ranking over the trailing year
pub const R6: &str = r#"
WITH ranking AS (
    SELECT
        r.city,
        r.restaurant_name,
        ROUND(SUM(o.total_amount)::numeric, 2) AS total_revenue,
        RANK() OVER (PARTITION BY r.city ORDER BY ROUND(SUM(o.total_amount)::numeric, 2) DESC) AS rank
    FROM orders AS o
    JOIN restaurants AS r ON r.restaurant_id = o.restaurant_id
    WHERE o.order_date >= (SELECT MAX(order_date) FROM orders) - INTERVAL '1 year'
    GROUP BY r.city, r.restaurant_id, r.restaurant_name
)
SELECT city, restaurant_name, total_revenue, rank
FROM ranking
WHERE rank = 1
ORDER BY city, restaurant_name
"#;

/// R7: Most popular dish by city
pub const R7: &str = r#"
SELECT city, dish_name, total_orders, rank
FROM (
    SELECT
        r.city,
        o.order_item AS dish_name,
        COUNT(o.order_id) AS total_orders,
        DENSE_RANK() OVER (PARTITION BY r.city ORDER BY COUNT(o.order_id) DESC) AS rank
    FROM orders AS o
    JOIN restaurants AS r ON r.restaurant_id = o.restaurant_id
    GROUP BY r.city, o.order_item
) AS ranked
WHERE rank = 1
ORDER BY city, dish_name
"#;

/// R8: Customer churn
pub const R8: &str = r#"
SELECT DISTINCT c.customer_id, c.customer_name
FROM orders AS o
JOIN customers AS c ON c.customer_id = o.customer_id
WHERE EXTRACT(YEAR FROM o.order_date) = 2023
  AND o.customer_id NOT IN (
      SELECT DISTINCT customer_id
      FROM orders
      WHERE EXTRACT(YEAR FROM order_date) = 2024
  )
ORDER BY c.customer_id
"#;

/// R9: Cancellation rate comparison
pub const R9: &str = r#"
WITH ratio_2023 AS (
    SELECT
        o.restaurant_id,
        ROUND(COUNT(*) FILTER (WHERE d.delivery_id IS NULL OR d.delivery_status <> 'Delivered')::numeric
              / COUNT(*) * 100, 2) AS cancel_ratio
    FROM orders AS o
    LEFT JOIN deliveries AS d ON d.order_id = o.order_id
    WHERE EXTRACT(YEAR FROM o.order_date) = 2023
    GROUP BY o.restaurant_id
),
ratio_2024 AS (
    SELECT
        o.restaurant_id,
        ROUND(COUNT(*) FILTER (WHERE d.delivery_id IS NULL OR d.delivery_status <> 'Delivered')::numeric
              / COUNT(*) * 100, 2) AS cancel_ratio
    FROM orders AS o
    LEFT JOIN deliveries AS d ON d.order_id = o.order_id
    WHERE EXTRACT(YEAR FROM o.order_date) = 2024
    GROUP BY o.restaurant_id
)
SELECT
    a.restaurant_id,
    r.restaurant_name,
    a.cancel_ratio AS cancel_ratio_2023,
    b.cancel_ratio AS cancel_ratio_2024
FROM ratio_2023 AS a
JOIN ratio_2024 AS b ON b.restaurant_id = a.restaurant_id
JOIN restaurants AS r ON r.restaurant_id = a.restaurant_id
ORDER BY a.restaurant_id
"#;

/// R10: Rider average delivery time
pub const R10: &str = r#"
SELECT
    d.rider_id,
    ri.rider_name,
    ROUND(AVG(
        EXTRACT(EPOCH FROM (
            d.delivery_time - o.order_time
            + CASE WHEN d.delivery_time < o.order_time THEN INTERVAL '1 day' ELSE INTERVAL '0 day' END
        )) / 60
    )::numeric, 2) AS avg_delivery_time_mins
FROM orders AS o
JOIN deliveries AS d ON d.order_id = o.order_id
JOIN riders AS ri ON ri.rider_id = d.rider_id
WHERE d.delivery_status = 'Delivered'
GROUP BY d.rider_id, ri.rider_name
ORDER BY d.rider_id
"#;

/// R11: Restaurant monthly growth ratio
pub const R11: &str = r#"
WITH monthly AS (
    SELECT
        o.restaurant_id,
        TO_CHAR(o.order_date, 'YYYY-MM') AS month,
        COUNT(o.order_id) AS current_month_orders,
        LAG(COUNT(o.order_id), 1) OVER (
            PARTITION BY o.restaurant_id
            ORDER BY TO_CHAR(o.order_date, 'YYYY-MM')
        ) AS previous_month_orders
    FROM orders AS o
    JOIN deliveries AS d ON d.order_id = o.order_id
    WHERE d.delivery_status = 'Delivered'
    GROUP BY o.restaurant_id, TO_CHAR(o.order_date, 'YYYY-MM')
)
SELECT
    restaurant_id,
    month,
    current_month_orders,
    previous_month_orders,
    ROUND((current_month_orders - previous_month_orders)::numeric
          / NULLIF(previous_month_orders, 0) * 100, 2) AS growth_ratio
FROM monthly
WHERE previous_month_orders IS NOT NULL
ORDER BY restaurant_id, month
"#;

/// R12: Customer segmentation
pub const R12: &str = r#"
SELECT
    customer_category,
    SUM(total_orders) AS total_orders,
    ROUND(SUM(total_spent)::numeric, 2) AS total_revenue
FROM (
    SELECT
        customer_id,
        COUNT(order_id) AS total_orders,
        SUM(total_amount) AS total_spent,
        CASE
            WHEN SUM(total_amount) > (SELECT AVG(total_amount) FROM orders) THEN 'Gold'
            ELSE 'Silver'
        END AS customer_category
    FROM orders
    GROUP BY customer_id
) AS segmented
GROUP BY customer_category
ORDER BY customer_category
"#;

/// R13: Rider monthly earnings
pub const R13: &str = r#"
SELECT
    d.rider_id,
    ri.rider_name,
    TO_CHAR(o.order_date, 'YYYY-MM') AS month,
    ROUND(SUM(o.total_amount)::numeric, 2) AS total_revenue,
    ROUND((SUM(o.total_amount) * 0.08)::numeric, 2) AS rider_earning
FROM orders AS o
JOIN deliveries AS d ON d.order_id = o.order_id
JOIN riders AS ri ON ri.rider_id = d.rider_id
GROUP BY d.rider_id, ri.rider_name, TO_CHAR(o.order_date, 'YYYY-MM')
ORDER BY d.rider_id, month
"#;

/// R14: Busiest weekday per restaurant
pub const R14: &str = r#"
SELECT restaurant_name, day_of_week, total_orders
FROM (
    SELECT
        r.restaurant_name,
        TRIM(TO_CHAR(o.order_date, 'Day')) AS day_of_week,
        COUNT(o.order_id) AS total_orders,
        DENSE_RANK() OVER (PARTITION BY r.restaurant_id ORDER BY COUNT(o.order_id) DESC) AS rank
    FROM orders AS o
    JOIN restaurants AS r ON r.restaurant_id = o.restaurant_id
    GROUP BY r.restaurant_id, r.restaurant_name, TRIM(TO_CHAR(o.order_date, 'Day'))
) AS ranked
WHERE rank = 1
ORDER BY restaurant_name, day_of_week
"#;

/// R15: Customer lifetime value
pub const R15: &str = r#"
SELECT
    o.customer_id,
    c.customer_name,
    ROUND(SUM(o.total_amount)::numeric, 2) AS clv
FROM orders AS o
JOIN customers AS c ON c.customer_id = o.customer_id
GROUP BY o.customer_id, c.customer_name
ORDER BY clv DESC, o.customer_id
"#;

/// R16: Monthly sales trend
pub const R16: &str = r#"
SELECT
    EXTRACT(YEAR FROM order_date) AS year,
    EXTRACT(MONTH FROM order_date) AS month,
    ROUND(SUM(total_amount)::numeric, 2) AS total_sale,
    LAG(ROUND(SUM(total_amount)::numeric, 2), 1) OVER (
        ORDER BY EXTRACT(YEAR FROM order_date), EXTRACT(MONTH FROM order_date)
    ) AS previous_month_sale
FROM orders
GROUP BY 1, 2
ORDER BY 1, 2
"#;

/// R17: City revenue ranking
pub const R17: &str = r#"
SELECT
    r.city,
    ROUND(SUM(o.total_amount)::numeric, 2) AS total_revenue,
    RANK() OVER (ORDER BY ROUND(SUM(o.total_amount)::numeric, 2) DESC) AS city_rank
FROM orders AS o
JOIN restaurants AS r ON r.restaurant_id = o.restaurant_id
WHERE EXTRACT(YEAR FROM o.order_date) = 2023
GROUP BY r.city
ORDER BY city_rank, r.city
"#;
