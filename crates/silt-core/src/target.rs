//! Materialization targets parsed from table-creation directives.
//!
//! A directive has the shape
//! `CREATE EXTERNAL TABLE <catalog>.<schema>.<table> LOCATION '<uri>'
//! [OPTIONS (key=value, ...)] AS SELECT ...`. Parsing is pure: the same
//! directive string always yields a structurally equal target.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use crate::config::StoreConfig;
use crate::error::{DirectiveError, Result};

/// Storage-option key carrying the default region for object storage.
pub const AWS_REGION_OPTION: &str = "AWS_REGION";

const DIRECTIVE_PATTERN: &str = r"(?is)^\s*CREATE\s+EXTERNAL\s+TABLE\s+(\S+)\s+LOCATION\s+'([^']+)'(?:\s+OPTIONS\s*\(([^)]*)\))?\s+AS\s+(SELECT\b.*)$";

const CLASSIFIER_PATTERN: &str = r"(?is)^\s*CREATE\s+EXTERNAL\s+TABLE\s+.+\s+AS\s+SELECT\s";

/// Identifies what to write and where.
///
/// Constructed once per materialization request from a parsed directive and
/// immutable afterwards; the invocation that created it is its only owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializationTarget {
    /// Catalog the table belongs to.
    pub catalog_name: String,
    /// Schema within the catalog.
    pub schema_name: String,
    /// Table name within the schema.
    pub table_name: String,
    /// Storage URI where physical data lives, taken verbatim from the
    /// directive. Scheme correctness is not validated here; storage access
    /// surfaces failures downstream.
    pub location: String,
    /// Case-sensitive option mapping (write mode, partition key, region,
    /// credentials once merged). Later entries override earlier ones.
    pub storage_options: HashMap<String, String>,
}

impl MaterializationTarget {
    /// Returns the full `catalog.schema.table` name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{}.{}.{}",
            self.catalog_name, self.schema_name, self.table_name
        )
    }

    /// Returns the qualified name triple for this target.
    #[must_use]
    pub fn qualified_name(&self) -> QualifiedTableName {
        QualifiedTableName {
            catalog_name: self.catalog_name.clone(),
            schema_name: self.schema_name.clone(),
            table_name: self.table_name.clone(),
        }
    }
}

/// Fully qualified three-part table name returned by a successful
/// materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedTableName {
    /// Catalog name.
    pub catalog_name: String,
    /// Schema name.
    pub schema_name: String,
    /// Table name.
    pub table_name: String,
}

impl fmt::Display for QualifiedTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.catalog_name, self.schema_name, self.table_name
        )
    }
}

/// A directive split into its target and the residual select statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDirective {
    /// Where the query result will be written and registered.
    pub target: MaterializationTarget,
    /// The `SELECT ...` statement to hand to the query engine.
    pub select: String,
}

/// Returns true when the statement looks like a
/// `CREATE EXTERNAL TABLE ... AS SELECT` directive.
///
/// This is a cheap classifier for statement dispatch; full validation
/// happens in [`ParsedDirective::parse`].
#[must_use]
pub fn is_materialization_directive(statement: &str) -> bool {
    let pattern = Regex::new(CLASSIFIER_PATTERN).expect("classifier pattern is valid");
    pattern.is_match(statement)
}

impl ParsedDirective {
    /// Parses a table-creation directive.
    ///
    /// A default `AWS_REGION` option is injected from `config` when the
    /// directive does not supply one; a directive-supplied region always
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::InvalidDirectiveSyntax`] when the statement
    /// does not match the directive shape,
    /// [`DirectiveError::InvalidTargetName`] when the table name is not
    /// three non-empty dot-separated parts, and
    /// [`DirectiveError::InvalidOptionSyntax`] for malformed `OPTIONS`
    /// entries.
    pub fn parse(directive: &str, config: &StoreConfig) -> Result<Self> {
        let pattern = Regex::new(DIRECTIVE_PATTERN).expect("directive pattern is valid");
        let captures = pattern.captures(directive).ok_or_else(|| {
            DirectiveError::invalid_directive(
                "expected CREATE EXTERNAL TABLE <name> LOCATION '<uri>' \
                 [OPTIONS (...)] AS SELECT ...",
            )
        })?;

        let name = &captures[1];
        let location = captures[2].to_string();
        let raw_options = captures.get(3).map(|m| m.as_str());
        let select = captures[4].trim().to_string();

        let (catalog_name, schema_name, table_name) = split_table_name(name)?;

        let mut storage_options = match raw_options {
            Some(raw) => parse_options(raw)?,
            None => HashMap::new(),
        };
        storage_options
            .entry(AWS_REGION_OPTION.to_string())
            .or_insert_with(|| config.aws_region.clone());

        Ok(Self {
            target: MaterializationTarget {
                catalog_name,
                schema_name,
                table_name,
                location,
                storage_options,
            },
            select,
        })
    }
}

fn split_table_name(name: &str) -> Result<(String, String, String)> {
    let parts: Vec<&str> = name.split('.').collect();
    match parts.as_slice() {
        [catalog, schema, table]
            if !catalog.is_empty() && !schema.is_empty() && !table.is_empty() =>
        {
            Ok(((*catalog).to_string(), (*schema).to_string(), (*table).to_string()))
        }
        _ => Err(DirectiveError::invalid_target_name(format!(
            "'{name}' must be in the format 'catalog.schema.table'"
        ))),
    }
}

fn parse_options(raw: &str) -> Result<HashMap<String, String>> {
    let mut options = HashMap::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((key, value)) = entry.split_once('=') else {
            return Err(DirectiveError::invalid_option(format!(
                "'{entry}' is not a key=value pair"
            )));
        };
        options.insert(key.trim().to_string(), unquote(value.trim()).to_string());
    }
    Ok(options)
}

/// Strips one layer of matching single or double quotes.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StoreConfig {
        StoreConfig::default()
    }

    #[test]
    fn parses_directive_with_options() {
        let directive = "CREATE EXTERNAL TABLE db.sch.tbl LOCATION 's3://b/p' \
                         OPTIONS (AWS_REGION='us-west-2') AS SELECT * FROM src";
        let parsed = ParsedDirective::parse(directive, &config()).expect("parse");

        assert_eq!(parsed.target.catalog_name, "db");
        assert_eq!(parsed.target.schema_name, "sch");
        assert_eq!(parsed.target.table_name, "tbl");
        assert_eq!(parsed.target.location, "s3://b/p");
        assert_eq!(
            parsed.target.storage_options.get("AWS_REGION"),
            Some(&"us-west-2".to_string())
        );
        assert_eq!(parsed.select, "SELECT * FROM src");
    }

    #[test]
    fn injects_default_region_without_options() {
        let directive =
            "CREATE EXTERNAL TABLE db.sch.tbl LOCATION 's3://b/p' AS SELECT * FROM src";
        let parsed = ParsedDirective::parse(directive, &config()).expect("parse");

        assert_eq!(
            parsed.target.storage_options.get("AWS_REGION"),
            Some(&config().aws_region)
        );
    }

    #[test]
    fn directive_region_beats_default() {
        let directive = "CREATE EXTERNAL TABLE db.sch.tbl LOCATION 's3://b/p' \
                         OPTIONS (AWS_REGION='ap-south-1', mode=merge) AS SELECT 1";
        let parsed = ParsedDirective::parse(directive, &config()).expect("parse");

        assert_eq!(
            parsed.target.storage_options.get("AWS_REGION"),
            Some(&"ap-south-1".to_string())
        );
        assert_eq!(
            parsed.target.storage_options.get("mode"),
            Some(&"merge".to_string())
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        let directive = "CREATE EXTERNAL TABLE db.sch.tbl LOCATION 's3://b/p' \
                         OPTIONS (mode='overwrite_partition', partition_key=dt) \
                         AS SELECT dt, n FROM src";
        let first = ParsedDirective::parse(directive, &config()).expect("parse");
        let second = ParsedDirective::parse(directive, &config()).expect("parse");

        assert_eq!(first, second);
    }

    #[test]
    fn two_part_name_is_rejected() {
        let directive =
            "CREATE EXTERNAL TABLE db.tbl LOCATION 's3://b/p' AS SELECT * FROM src";
        let err = ParsedDirective::parse(directive, &config()).expect_err("must fail");

        assert!(matches!(err, DirectiveError::InvalidTargetName { .. }));
    }

    #[test]
    fn empty_name_part_is_rejected() {
        let directive =
            "CREATE EXTERNAL TABLE db..tbl LOCATION 's3://b/p' AS SELECT * FROM src";
        let err = ParsedDirective::parse(directive, &config()).expect_err("must fail");

        assert!(matches!(err, DirectiveError::InvalidTargetName { .. }));
    }

    #[test]
    fn option_without_equals_is_rejected() {
        let directive = "CREATE EXTERNAL TABLE db.sch.tbl LOCATION 's3://b/p' \
                         OPTIONS (mode) AS SELECT 1";
        let err = ParsedDirective::parse(directive, &config()).expect_err("must fail");

        assert!(matches!(err, DirectiveError::InvalidOptionSyntax { .. }));
    }

    #[test]
    fn non_directive_statement_is_rejected() {
        let err =
            ParsedDirective::parse("SELECT * FROM src", &config()).expect_err("must fail");

        assert!(matches!(err, DirectiveError::InvalidDirectiveSyntax { .. }));
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let directive = "create external table db.sch.tbl location 's3://b/p' \
                         options (mode=\"merge\", unique_key='id') as select id from src";
        let parsed = ParsedDirective::parse(directive, &config()).expect("parse");

        assert_eq!(parsed.target.storage_options.get("mode"), Some(&"merge".to_string()));
        assert_eq!(
            parsed.target.storage_options.get("unique_key"),
            Some(&"id".to_string())
        );
        assert_eq!(parsed.select, "select id from src");
    }

    #[test]
    fn classifier_accepts_directives_only() {
        assert!(is_materialization_directive(
            "CREATE EXTERNAL TABLE a.b.c LOCATION 's3://x' AS SELECT 1"
        ));
        assert!(!is_materialization_directive("SELECT 1"));
        assert!(!is_materialization_directive("CREATE TABLE t AS SELECT 1"));
    }

    #[test]
    fn qualified_name_displays_three_parts() {
        let directive =
            "CREATE EXTERNAL TABLE db.sch.tbl LOCATION 's3://b/p' AS SELECT 1";
        let parsed = ParsedDirective::parse(directive, &config()).expect("parse");

        assert_eq!(parsed.target.qualified_name().to_string(), "db.sch.tbl");
        assert_eq!(parsed.target.full_name(), "db.sch.tbl");
    }
}
