//! Normalized schema: Diesel table definitions and the DDL that creates them.

diesel::table! {
    region (region_id) {
        #[sql_name = "RegionID"]
        region_id -> Integer,
        #[sql_name = "Region"]
        name -> Text,
    }
}

diesel::table! {
    country (country_id) {
        #[sql_name = "CountryID"]
        country_id -> Integer,
        #[sql_name = "Country"]
        name -> Text,
        #[sql_name = "RegionID"]
        region_id -> Integer,
    }
}

diesel::table! {
    customer (customer_id) {
        #[sql_name = "CustomerID"]
        customer_id -> Integer,
        #[sql_name = "FirstName"]
        first_name -> Text,
        #[sql_name = "LastName"]
        last_name -> Text,
        #[sql_name = "Address"]
        address -> Text,
        #[sql_name = "City"]
        city -> Text,
        #[sql_name = "CountryID"]
        country_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "productcategory"]
    product_category (product_category_id) {
        #[sql_name = "ProductCategoryID"]
        product_category_id -> Integer,
        #[sql_name = "ProductCategory"]
        code -> Text,
        #[sql_name = "ProductCategoryDescription"]
        description -> Text,
    }
}

diesel::table! {
    product (product_id) {
        #[sql_name = "ProductID"]
        product_id -> Integer,
        #[sql_name = "ProductName"]
        name -> Text,
        #[sql_name = "ProductUnitPrice"]
        unit_price -> Double,
        #[sql_name = "ProductCategoryID"]
        product_category_id -> Integer,
    }
}

diesel::table! {
    #[sql_name = "OrderDetail"]
    order_detail (order_id) {
        #[sql_name = "OrderID"]
        order_id -> Integer,
        #[sql_name = "CustomerID"]
        customer_id -> Integer,
        #[sql_name = "ProductID"]
        product_id -> Integer,
        #[sql_name = "OrderDate"]
        order_date -> Text,
        #[sql_name = "QuantityOrdered"]
        quantity_ordered -> Integer,
    }
}

diesel::joinable!(country -> region (region_id));
diesel::joinable!(customer -> country (country_id));
diesel::joinable!(product -> product_category (product_category_id));
diesel::joinable!(order_detail -> customer (customer_id));
diesel::joinable!(order_detail -> product (product_id));

diesel::allow_tables_to_appear_in_same_query!(
    region,
    country,
    customer,
    product_category,
    product,
    order_detail,
);

pub const CREATE_REGION: &str = "
    CREATE TABLE IF NOT EXISTS region (
        RegionID INTEGER PRIMARY KEY,
        Region TEXT NOT NULL
    )";

pub const CREATE_COUNTRY: &str = "
    CREATE TABLE IF NOT EXISTS country (
        CountryID INTEGER PRIMARY KEY,
        Country TEXT NOT NULL,
        RegionID INTEGER NOT NULL,
        FOREIGN KEY (RegionID) REFERENCES region (RegionID)
    )";

pub const CREATE_CUSTOMER: &str = "
    CREATE TABLE IF NOT EXISTS customer (
        CustomerID INTEGER PRIMARY KEY,
        FirstName TEXT NOT NULL,
        LastName TEXT NOT NULL,
        Address TEXT NOT NULL,
        City TEXT NOT NULL,
        CountryID INTEGER NOT NULL,
        FOREIGN KEY (CountryID) REFERENCES country (CountryID)
    )";

pub const CREATE_PRODUCT_CATEGORY: &str = "
    CREATE TABLE IF NOT EXISTS productcategory (
        ProductCategoryID INTEGER PRIMARY KEY,
        ProductCategory TEXT NOT NULL,
        ProductCategoryDescription TEXT NOT NULL
    )";

pub const CREATE_PRODUCT: &str = "
    CREATE TABLE IF NOT EXISTS product (
        ProductID INTEGER PRIMARY KEY,
        ProductName TEXT NOT NULL,
        ProductUnitPrice REAL NOT NULL,
        ProductCategoryID INTEGER NOT NULL,
        FOREIGN KEY (ProductCategoryID) REFERENCES productcategory (ProductCategoryID)
    )";

pub const CREATE_ORDER_DETAIL: &str = "
    CREATE TABLE IF NOT EXISTS OrderDetail (
        OrderID INTEGER PRIMARY KEY,
        CustomerID INTEGER NOT NULL,
        ProductID INTEGER NOT NULL,
        OrderDate TEXT NOT NULL,
        QuantityOrdered INTEGER NOT NULL,
        FOREIGN KEY (CustomerID) REFERENCES customer (CustomerID),
        FOREIGN KEY (ProductID) REFERENCES product (ProductID)
    )";

/// Table names in dependency order (parents first)
pub const TABLES: [&str; 6] = [
    "region",
    "country",
    "customer",
    "productcategory",
    "product",
    "OrderDetail",
];
