//! Advisors for Snowflake.

pub mod table_require_pk;
