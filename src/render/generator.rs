//! Statement templates.
//!
//! Each method renders one relational operation into concrete SQL text.
//! The templates compose by nesting the child statement as a subselect.

use std::collections::BTreeMap;

use super::error::{RenderError, RenderResult};
use super::ident::quote_name;
use crate::plan::Attribute;

/// Recognized bulk-load option keys.
///
/// This is a fixed whitelist; option values are passed through verbatim
/// and interpreted by the database, not by this crate.
pub const COPY_OPTION_KEYS: [&str; 9] = [
    "ON_ERROR",
    "SIZE_LIMIT",
    "PURGE",
    "RETURN_FAILED_ONLY",
    "MATCH_BY_COLUMN_NAME",
    "ENFORCE_LENGTH",
    "TRUNCATECOLUMNS",
    "FORCE",
    "LOAD_UNCERTAIN_FILES",
];

/// Renders relational operations into SQL statements.
#[derive(Debug, Clone, Default)]
pub struct SqlGenerator {
    _private: (),
}

impl SqlGenerator {
    /// Create a generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// `SELECT [DISTINCT] items FROM (child)`. An empty projection list
    /// renders as `*`.
    pub fn project_statement(&self, project: &[String], child: &str, is_distinct: bool) -> String {
        let columns = if project.is_empty() {
            "*".to_string()
        } else {
            project.join(", ")
        };
        format!(
            "SELECT {}{} FROM ({})",
            if is_distinct { "DISTINCT " } else { "" },
            columns,
            child
        )
    }

    /// `SELECT * FROM (child) WHERE condition`.
    pub fn filter_statement(&self, condition: &str, child: &str) -> String {
        format!("SELECT * FROM ({}) WHERE {}", child, condition)
    }

    /// A SELECT over a prior statement's result, via its placeholder id.
    pub fn result_scan_statement(&self, placeholder: &str) -> String {
        format!("SELECT * FROM TABLE(RESULT_SCAN('{}'))", placeholder)
    }

    /// A side-effect-free statement describing a known output schema as
    /// typed NULL columns.
    pub fn schema_value_statement(&self, attributes: &[Attribute]) -> String {
        let columns: Vec<String> = attributes
            .iter()
            .map(|attr| {
                format!(
                    "CAST(NULL AS {}) AS {}",
                    attr.data_type.sql_name(),
                    quote_name(&attr.name)
                )
            })
            .collect();
        format!("SELECT {}", columns.join(", "))
    }

    /// `COPY INTO table FROM 'path' FILE_FORMAT = (TYPE = fmt) [options]`.
    ///
    /// Option keys are validated against [`COPY_OPTION_KEYS`]; values are
    /// emitted verbatim.
    pub fn copy_into_table_statement(
        &self,
        table: &str,
        path: &str,
        file_format: &str,
        options: &BTreeMap<String, String>,
    ) -> RenderResult<String> {
        let mut statement = format!(
            "COPY INTO {} FROM '{}' FILE_FORMAT = (TYPE = {})",
            quote_name(table),
            path,
            file_format
        );
        for (key, value) in options {
            let key = key.to_uppercase();
            if !COPY_OPTION_KEYS.contains(&key.as_str()) {
                return Err(RenderError::UnrecognizedCopyOption(key));
            }
            statement.push_str(&format!(" {} = {}", key, value));
        }
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::DataType;

    #[test]
    fn test_project_statement() {
        let generator = SqlGenerator::new();
        assert_eq!(
            generator.project_statement(&[], "T", false),
            "SELECT * FROM (T)"
        );
        assert_eq!(
            generator.project_statement(&["\"A\"".to_string(), "\"B\"".to_string()], "T", false),
            "SELECT \"A\", \"B\" FROM (T)"
        );
        assert_eq!(
            generator.project_statement(&["\"A\"".to_string()], "T", true),
            "SELECT DISTINCT \"A\" FROM (T)"
        );
    }

    #[test]
    fn test_filter_statement() {
        let generator = SqlGenerator::new();
        assert_eq!(
            generator.filter_statement("\"A\" = 1", "SELECT * FROM (T)"),
            "SELECT * FROM (SELECT * FROM (T)) WHERE \"A\" = 1"
        );
    }

    #[test]
    fn test_result_scan_statement() {
        let generator = SqlGenerator::new();
        assert_eq!(
            generator.result_scan_statement("query_id_place_holder_X"),
            "SELECT * FROM TABLE(RESULT_SCAN('query_id_place_holder_X'))"
        );
    }

    #[test]
    fn test_schema_value_statement() {
        let generator = SqlGenerator::new();
        let attrs = vec![
            Attribute::new("id", DataType::Integer, false),
            Attribute::new("name", DataType::Text, true),
        ];
        assert_eq!(
            generator.schema_value_statement(&attrs),
            "SELECT CAST(NULL AS BIGINT) AS \"ID\", CAST(NULL AS VARCHAR) AS \"NAME\""
        );
    }

    #[test]
    fn test_copy_options_validated() {
        let generator = SqlGenerator::new();

        let options = BTreeMap::from([
            ("on_error".to_string(), "CONTINUE".to_string()),
            ("PURGE".to_string(), "TRUE".to_string()),
        ]);
        let sql = generator
            .copy_into_table_statement("t", "@stage/data", "CSV", &options)
            .unwrap();
        // BTreeMap iteration is ordered by the raw key.
        assert_eq!(
            sql,
            "COPY INTO \"T\" FROM '@stage/data' FILE_FORMAT = (TYPE = CSV) PURGE = TRUE ON_ERROR = CONTINUE"
        );

        let bad = BTreeMap::from([("COMPRESSION".to_string(), "GZIP".to_string())]);
        assert!(matches!(
            generator.copy_into_table_statement("t", "@stage/data", "CSV", &bad),
            Err(RenderError::UnrecognizedCopyOption(_))
        ));
    }
}
