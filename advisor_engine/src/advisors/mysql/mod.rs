//! Advisors for the MySQL family (MySQL, TiDB, MariaDB, OceanBase).

pub mod column_comment_convention;
pub mod column_disallow_changing_type;
pub mod index_pk_type;
pub mod insert_must_specify_column;
pub mod statement_disallow_commit;
pub mod table_disallow_partition;
pub mod table_exists;
