//! SQL text of the analytic queries. `?` marks the bound CustomerID.

pub const CUSTOMER_ORDER_LINES: &str = "
SELECT
    c.FirstName || ' ' || c.LastName AS Name,
    p.ProductName AS ProductName,
    od.OrderDate AS OrderDate,
    p.ProductUnitPrice AS ProductUnitPrice,
    od.QuantityOrdered AS QuantityOrdered,
    round(p.ProductUnitPrice * od.QuantityOrdered, 2) AS Total
FROM OrderDetail od
JOIN customer c ON od.CustomerID = c.CustomerID
JOIN product p ON od.ProductID = p.ProductID
WHERE od.CustomerID = ?
ORDER BY od.OrderID
";

pub const CUSTOMER_TOTAL: &str = "
SELECT
    c.FirstName || ' ' || c.LastName AS Name,
    round(sum(p.ProductUnitPrice * od.QuantityOrdered), 2) AS Total
FROM OrderDetail od
JOIN customer c ON od.CustomerID = c.CustomerID
JOIN product p ON od.ProductID = p.ProductID
WHERE od.CustomerID = ?
GROUP BY od.CustomerID
";

pub const CUSTOMER_TOTALS: &str = "
SELECT
    c.FirstName || ' ' || c.LastName AS Name,
    round(sum(p.ProductUnitPrice * od.QuantityOrdered), 2) AS Total
FROM OrderDetail od
JOIN customer c ON od.CustomerID = c.CustomerID
JOIN product p ON od.ProductID = p.ProductID
GROUP BY od.CustomerID
ORDER BY Total DESC
";

pub const REGION_TOTALS: &str = "
SELECT
    r.Region AS Region,
    round(sum(p.ProductUnitPrice * od.QuantityOrdered), 2) AS Total
FROM OrderDetail od
JOIN customer c ON od.CustomerID = c.CustomerID
JOIN product p ON od.ProductID = p.ProductID
JOIN country co ON c.CountryID = co.CountryID
JOIN region r ON co.RegionID = r.RegionID
GROUP BY r.Region
ORDER BY Total DESC
";

pub const COUNTRY_TOTALS: &str = "
SELECT
    co.Country AS Country,
    round(sum(p.ProductUnitPrice * od.QuantityOrdered), 0) AS CountryTotal
FROM OrderDetail od
JOIN customer c ON od.CustomerID = c.CustomerID
JOIN product p ON od.ProductID = p.ProductID
JOIN country co ON c.CountryID = co.CountryID
GROUP BY co.Country
ORDER BY CountryTotal DESC
";

pub const COUNTRY_REGIONAL_RANKS: &str = "
WITH region_country_total AS (
    SELECT
        r.Region AS Region,
        co.Country AS Country,
        round(sum(p.ProductUnitPrice * od.QuantityOrdered), 0) AS CountryTotal
    FROM OrderDetail od
    JOIN customer c ON od.CustomerID = c.CustomerID
    JOIN country co ON c.CountryID = co.CountryID
    JOIN region r ON co.RegionID = r.RegionID
    JOIN product p ON od.ProductID = p.ProductID
    GROUP BY r.Region, co.Country
),
ranked_country_total AS (
    SELECT *,
        dense_rank() OVER (PARTITION BY Region ORDER BY CountryTotal DESC) AS CountryRegionalRank
    FROM region_country_total
)
SELECT Region, Country, CountryTotal, CountryRegionalRank
FROM ranked_country_total
ORDER BY Region ASC, CountryRegionalRank ASC, Country ASC
";

pub const TOP_COUNTRY_PER_REGION: &str = "
WITH region_country_total AS (
    SELECT
        r.Region AS Region,
        co.Country AS Country,
        round(sum(p.ProductUnitPrice * od.QuantityOrdered), 0) AS CountryTotal
    FROM OrderDetail od
    JOIN customer c ON od.CustomerID = c.CustomerID
    JOIN country co ON c.CountryID = co.CountryID
    JOIN region r ON co.RegionID = r.RegionID
    JOIN product p ON od.ProductID = p.ProductID
    GROUP BY r.Region, co.Country
),
ranked_country_total AS (
    SELECT *,
        dense_rank() OVER (PARTITION BY Region ORDER BY CountryTotal DESC) AS CountryRegionalRank
    FROM region_country_total
)
SELECT Region, Country, CountryTotal, CountryRegionalRank
FROM ranked_country_total
WHERE CountryRegionalRank = 1
ORDER BY Region ASC, Country ASC
";

pub const QUARTERLY_CUSTOMER_SALES: &str = "
WITH SalesByQuarter AS (
    SELECT
        strftime('%Y', OrderDate) AS Year,
        CASE
            WHEN strftime('%m', OrderDate) BETWEEN '01' AND '03' THEN 'Q1'
            WHEN strftime('%m', OrderDate) BETWEEN '04' AND '06' THEN 'Q2'
            WHEN strftime('%m', OrderDate) BETWEEN '07' AND '09' THEN 'Q3'
            ELSE 'Q4'
        END AS Quarter,
        CustomerID,
        round(sum(p.ProductUnitPrice * od.QuantityOrdered), 0) AS Total
    FROM OrderDetail od
    JOIN product p ON od.ProductID = p.ProductID
    GROUP BY Year, Quarter, CustomerID
)
SELECT Quarter, CAST(Year AS INTEGER) AS Year, CustomerID, Total
FROM SalesByQuarter
ORDER BY Year, Quarter, CustomerID
";

pub const TOP_QUARTERLY_CUSTOMERS: &str = "
WITH SalesByQuarter AS (
    SELECT
        strftime('%Y', OrderDate) AS Year,
        CASE
            WHEN strftime('%m', OrderDate) BETWEEN '01' AND '03' THEN 'Q1'
            WHEN strftime('%m', OrderDate) BETWEEN '04' AND '06' THEN 'Q2'
            WHEN strftime('%m', OrderDate) BETWEEN '07' AND '09' THEN 'Q3'
            ELSE 'Q4'
        END AS Quarter,
        CustomerID,
        round(sum(p.ProductUnitPrice * od.QuantityOrdered), 0) AS Total
    FROM OrderDetail od
    JOIN product p ON od.ProductID = p.ProductID
    GROUP BY Year, Quarter, CustomerID
),
Top5Customers AS (
    SELECT
        Quarter,
        CAST(Year AS INTEGER) AS Year,
        CustomerID,
        Total,
        rank() OVER (PARTITION BY Quarter, Year ORDER BY Total DESC) AS CustomerRank
    FROM SalesByQuarter
)
SELECT Quarter, Year, CustomerID, Total, CustomerRank
FROM Top5Customers
WHERE CustomerRank <= 5
ORDER BY Year, Quarter, CustomerRank
";

pub const MONTHLY_SALES_RANK: &str = "
WITH SalesByMonth AS (
    SELECT
        CASE strftime('%m', OrderDate)
            WHEN '01' THEN 'January'
            WHEN '02' THEN 'February'
            WHEN '03' THEN 'March'
            WHEN '04' THEN 'April'
            WHEN '05' THEN 'May'
            WHEN '06' THEN 'June'
            WHEN '07' THEN 'July'
            WHEN '08' THEN 'August'
            WHEN '09' THEN 'September'
            WHEN '10' THEN 'October'
            WHEN '11' THEN 'November'
            WHEN '12' THEN 'December'
        END AS Month,
        sum(round(p.ProductUnitPrice * od.QuantityOrdered)) AS Total
    FROM OrderDetail od
    JOIN product p ON od.ProductID = p.ProductID
    GROUP BY Month
),
MonthlySalesRank AS (
    SELECT
        Month,
        Total,
        rank() OVER (ORDER BY Total DESC) AS TotalRank
    FROM SalesByMonth
)
SELECT Month, Total, TotalRank
FROM MonthlySalesRank
ORDER BY TotalRank, Month
";

pub const MAX_DAYS_WITHOUT_ORDER: &str = "
WITH OrderDates AS (
    SELECT
        CustomerID,
        OrderDate,
        lag(OrderDate, 1) OVER (PARTITION BY CustomerID ORDER BY OrderDate) AS PreviousOrderDate,
        julianday(OrderDate)
            - julianday(lag(OrderDate, 1) OVER (PARTITION BY CustomerID ORDER BY OrderDate))
            AS DaysSinceLastOrder
    FROM OrderDetail
)
SELECT
    od.CustomerID AS CustomerID,
    customer.FirstName AS FirstName,
    customer.LastName AS LastName,
    country.Country AS Country,
    od.OrderDate AS OrderDate,
    od.PreviousOrderDate AS PreviousOrderDate,
    max(od.DaysSinceLastOrder) AS MaxDaysWithoutOrder
FROM OrderDates od
JOIN customer ON od.CustomerID = customer.CustomerID
JOIN country ON customer.CountryID = country.CountryID
GROUP BY od.CustomerID
ORDER BY MaxDaysWithoutOrder DESC, od.CustomerID
";
