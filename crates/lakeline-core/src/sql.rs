//! SQL statement construction
//!
//! Every identifier flowing into generated SQL passes through
//! [`quote_ident`]. The statements themselves are submitted verbatim by the
//! query submitter; there is no value parameterization layer, so this
//! module is the single seam where identifier handling can be hardened.

use crate::typemap::TypeMapper;
use lakeline_common::types::TableSchema;

/// Quote an identifier for the query engine: wrap in double quotes and
/// double any embedded quote characters.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build the CTAS statement materializing a managed Parquet table from a
/// registered external table.
///
/// Metadata columns (leading underscore) are excluded from the projection
/// so ingestion bookkeeping does not leak into the materialized layer.
pub fn ctas_statement(
    catalog: &str,
    namespace: &str,
    target_table: &str,
    source_database: &str,
    table: &TableSchema,
) -> String {
    let column_list = table
        .data_columns()
        .map(|c| format!("    {}", quote_ident(&c.name)))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "CREATE TABLE {}.{}.{}\n\
         WITH (\n    format = 'PARQUET'\n)\n\
         AS\nSELECT\n{}\nFROM {}.{}",
        quote_ident(catalog),
        quote_ident(namespace),
        quote_ident(target_table),
        column_list,
        quote_ident(source_database),
        quote_ident(&table.table_name),
    )
}

/// Render a `CREATE EXTERNAL TABLE` DDL statement for the given registry
/// entry, with column types mapped into the query-engine dialect. Used by
/// the `plan` command; the live pipeline registers external tables through
/// the catalog API instead.
pub fn external_table_ddl(database: &str, table: &TableSchema, mapper: &TypeMapper) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("  {} {}", quote_ident(&c.name), mapper.to_query(&c.logical_type)))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "CREATE EXTERNAL TABLE IF NOT EXISTS {}.{} (\n{}\n)\n\
         STORED AS PARQUET\n\
         LOCATION '{}'\n\
         TBLPROPERTIES (\n  'parquet.compression'='SNAPPY',\n  'classification'='parquet'\n);",
        quote_ident(database),
        quote_ident(&table.table_name),
        columns,
        table.storage_location,
    )
}
