//! Type Mapper
//!
//! Pure mapping from a source storage type string (the notation Parquet
//! schema introspection produces, e.g. `int64`, `timestamp[us]`,
//! `decimal128(38, 9)`) to a destination type in one of two dialects:
//! the catalog dialect (lowercase Hive types used in table storage
//! descriptors) and the query-engine dialect (uppercase SQL types used in
//! generated DDL).
//!
//! Mapping never fails: unrecognized inputs resolve to the generic string
//! type, favoring pipeline completion over strict typing.

/// Destination dialect for a mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDialect {
    /// Lowercase Hive types for catalog storage descriptors.
    Catalog,
    /// Uppercase SQL types for query-engine DDL.
    Query,
}

/// Exact matches on the normalized (lowercased, trimmed) source type.
/// Values are in catalog dialect; the query dialect uppercases them.
const EXACT: &[(&str, &str)] = &[
    ("int32", "int"),
    ("int64", "bigint"),
    ("float", "float"),
    ("double", "double"),
    ("string", "string"),
    ("binary", "binary"),
    ("bool", "boolean"),
    ("boolean", "boolean"),
    ("timestamp[us]", "timestamp"),
    ("timestamp[ms]", "timestamp"),
    ("date32[day]", "date"),
];

/// Substring fallbacks, checked in order after the exact table and the
/// decimal rule. Catches variants such as `timestamp[ns]` or
/// `large_string`.
const CONTAINS: &[(&str, &str)] = &[
    ("timestamp", "timestamp"),
    ("date32", "date"),
    ("int64", "bigint"),
    ("int32", "int"),
    ("double", "double"),
    ("float", "float"),
    ("string", "string"),
    ("binary", "binary"),
    ("bool", "boolean"),
];

const FALLBACK: &str = "string";

/// Stateless source-to-destination type mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMapper;

impl TypeMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map to the catalog (Hive) dialect, e.g. `int64` -> `bigint`.
    pub fn to_catalog(&self, source_type: &str) -> String {
        self.map(source_type, TypeDialect::Catalog)
    }

    /// Map to the query-engine dialect, e.g. `int64` -> `BIGINT`.
    pub fn to_query(&self, source_type: &str) -> String {
        self.map(source_type, TypeDialect::Query)
    }

    /// Map a source type string into the requested dialect.
    pub fn map(&self, source_type: &str, dialect: TypeDialect) -> String {
        let normalized = source_type.trim().to_lowercase();

        let catalog_type = Self::lookup(&normalized);
        match dialect {
            TypeDialect::Catalog => catalog_type,
            TypeDialect::Query => catalog_type.to_uppercase(),
        }
    }

    fn lookup(normalized: &str) -> String {
        if let Some((_, mapped)) = EXACT.iter().find(|(k, _)| *k == normalized) {
            return (*mapped).to_string();
        }

        if let Some(decimal) = Self::map_decimal(normalized) {
            return decimal;
        }

        if let Some((_, mapped)) = CONTAINS.iter().find(|(k, _)| normalized.contains(k)) {
            return (*mapped).to_string();
        }

        FALLBACK.to_string()
    }

    /// `decimal128(38, 9)` (and plain `decimal(38,9)`) map structurally,
    /// preserving precision and scale. Anything that looks like a decimal
    /// but does not parse falls through to the generic fallback.
    fn map_decimal(normalized: &str) -> Option<String> {
        if !normalized.starts_with("decimal") {
            return None;
        }
        let open = normalized.find('(')?;
        let close = normalized.find(')')?;
        let args = normalized.get(open + 1..close)?;
        let (precision, scale) = args.split_once(',')?;
        let precision: u8 = precision.trim().parse().ok()?;
        let scale: u8 = scale.trim().parse().ok()?;
        Some(format!("decimal({},{})", precision, scale))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_mappings() {
        let mapper = TypeMapper::new();
        assert_eq!(mapper.to_catalog("int64"), "bigint");
        assert_eq!(mapper.to_catalog("int32"), "int");
        assert_eq!(mapper.to_catalog("double"), "double");
        assert_eq!(mapper.to_catalog("string"), "string");
        assert_eq!(mapper.to_catalog("boolean"), "boolean");
        assert_eq!(mapper.to_catalog("bool"), "boolean");
        assert_eq!(mapper.to_catalog("timestamp[us]"), "timestamp");
        assert_eq!(mapper.to_catalog("timestamp[ms]"), "timestamp");
        assert_eq!(mapper.to_catalog("date32[day]"), "date");
        assert_eq!(mapper.to_catalog("binary"), "binary");
        assert_eq!(mapper.to_catalog("float"), "float");
    }

    #[test]
    fn test_query_mappings() {
        let mapper = TypeMapper::new();
        assert_eq!(mapper.to_query("int64"), "BIGINT");
        assert_eq!(mapper.to_query("double"), "DOUBLE");
        assert_eq!(mapper.to_query("string"), "STRING");
        assert_eq!(mapper.to_query("timestamp[us]"), "TIMESTAMP");
        assert_eq!(mapper.to_query("date32[day]"), "DATE");
    }

    #[test]
    fn test_case_insensitive() {
        let mapper = TypeMapper::new();
        assert_eq!(mapper.to_catalog("INT64"), "bigint");
        assert_eq!(mapper.to_query("Timestamp[US]"), "TIMESTAMP");
    }

    #[test]
    fn test_decimal_preserves_precision_and_scale() {
        let mapper = TypeMapper::new();
        assert_eq!(mapper.to_catalog("decimal128(38, 9)"), "decimal(38,9)");
        assert_eq!(mapper.to_query("decimal128(38, 9)"), "DECIMAL(38,9)");
        assert_eq!(mapper.to_catalog("decimal(10,2)"), "decimal(10,2)");
    }

    #[test]
    fn test_substring_fallbacks() {
        let mapper = TypeMapper::new();
        assert_eq!(mapper.to_catalog("timestamp[ns]"), "timestamp");
        assert_eq!(mapper.to_catalog("large_string"), "string");
    }

    #[test]
    fn test_unknown_types_fall_back_to_string() {
        let mapper = TypeMapper::new();
        assert_eq!(mapper.to_catalog("geometry"), "string");
        assert_eq!(mapper.to_query("geometry"), "STRING");
        assert_eq!(mapper.to_catalog(""), "string");
        // Malformed decimal still completes.
        assert_eq!(mapper.to_catalog("decimal128(x, y)"), "string");
    }
}
