//! Advisors for PostgreSQL.

pub mod statement_disallow_commit;
pub mod statement_dml_dry_run;
