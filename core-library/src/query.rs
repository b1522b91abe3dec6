//! Filter validation and SQL composition for the song listing.
//!
//! The listing endpoint accepts a single `field`/`value` pair. Only a fixed
//! set of fields may be filtered on; anything else is rejected before any SQL
//! is built. Accepted filters become a [`FilterSpec`], which
//! [`SongQuerySpec::build`] turns into parameterized `SELECT`/`COUNT` queries.

use crate::models::{parse_date, DATE_FORMAT};
use crate::normalize::search_key;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Fields a listing may be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    SongName,
    ArtistName,
    ReleaseDate,
}

impl FilterField {
    /// All filterable fields, in documentation order
    pub const ALL: [FilterField; 3] = [
        FilterField::SongName,
        FilterField::ArtistName,
        FilterField::ReleaseDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::SongName => "song_name",
            FilterField::ArtistName => "artist_name",
            FilterField::ReleaseDate => "release_date",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a filter value is compared against stored data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Case-insensitive `LIKE`; the value may carry its own `%`/`_` wildcards
    Pattern,
    /// Case-insensitive substring match
    Contains,
    /// Exact equality
    Equals,
}

/// A validated listing filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: FilterField,
    /// Normalized value (lower-cased search key, or a `YYYY-MM-DD` date)
    pub value: String,
    pub comparison: Comparison,
}

/// The filter field is not one of [`FilterField::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid filter field '{field}'")]
pub struct Rejected {
    pub field: String,
}

/// Validates listing filters against the allow-list.
pub struct FilterQueryBuilder;

impl FilterQueryBuilder {
    /// Validate a `field`/`value` pair.
    ///
    /// - empty field, or empty value for a known field: no filter
    /// - unknown non-empty field: [`Rejected`], whatever the value
    /// - unparseable `release_date`: no filter
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::query::{Comparison, FilterField, FilterQueryBuilder};
    ///
    /// let spec = FilterQueryBuilder::build(Some("artist_name"), Some(" The  Beatles "))
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(spec.field, FilterField::ArtistName);
    /// assert_eq!(spec.value, "the beatles");
    /// assert_eq!(spec.comparison, Comparison::Contains);
    ///
    /// assert!(FilterQueryBuilder::build(Some("bogus"), None).is_err());
    /// assert!(FilterQueryBuilder::build(None, Some("x")).unwrap().is_none());
    /// ```
    pub fn build(
        field: Option<&str>,
        value: Option<&str>,
    ) -> Result<Option<FilterSpec>, Rejected> {
        let field = field.map(str::trim).unwrap_or_default();
        if field.is_empty() {
            return Ok(None);
        }

        let Some(field) = FilterField::parse(field) else {
            return Err(Rejected {
                field: field.to_string(),
            });
        };

        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Ok(None);
        }

        let spec = match field {
            FilterField::SongName => FilterSpec {
                field,
                value: search_key(value),
                comparison: Comparison::Pattern,
            },
            FilterField::ArtistName => FilterSpec {
                field,
                value: search_key(value),
                comparison: Comparison::Contains,
            },
            FilterField::ReleaseDate => match parse_date(value) {
                Some(date) => FilterSpec {
                    field,
                    value: date.format(DATE_FORMAT).to_string(),
                    comparison: Comparison::Equals,
                },
                None => {
                    debug!(value, "Ignoring unparseable release_date filter");
                    return Ok(None);
                }
            },
        };

        Ok(Some(spec))
    }
}

/// Parameterized listing queries for an optional filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongQuerySpec {
    /// Row query; `LIMIT ? OFFSET ?` must be bound after `binds`
    pub select_sql: String,
    /// Count of all matching rows
    pub count_sql: String,
    pub binds: Vec<String>,
}

impl SongQuerySpec {
    pub fn build(filter: Option<&FilterSpec>) -> Self {
        let mut joins = Vec::new();
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        if let Some(filter) = filter {
            match filter.field {
                FilterField::SongName => {
                    conditions.push("s.normalized_song_name LIKE ?");
                    binds.push(filter.value.clone());
                }
                FilterField::ArtistName => {
                    joins.push("INNER JOIN artists a ON a.id = s.artist_id");
                    conditions.push("a.normalized_name LIKE ? ESCAPE '\\'");
                    binds.push(format!("%{}%", escape_like(&filter.value)));
                }
                FilterField::ReleaseDate => {
                    conditions.push("s.release_date = ?");
                    binds.push(filter.value.clone());
                }
            }
        }

        let mut from = String::from(" FROM songs s");
        for join in &joins {
            from.push(' ');
            from.push_str(join);
        }
        if !conditions.is_empty() {
            from.push_str(" WHERE ");
            from.push_str(&conditions.join(" AND "));
        }

        Self {
            select_sql: format!(
                "SELECT s.*{from} ORDER BY s.created_at ASC, s.rowid ASC LIMIT ? OFFSET ?"
            ),
            count_sql: format!("SELECT COUNT(*) AS count{from}"),
            binds,
        }
    }
}

/// Escape `LIKE` wildcards so the value matches literally (escape char `\`)
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_is_rejected_regardless_of_value() {
        for value in [None, Some(""), Some("x")] {
            let err = FilterQueryBuilder::build(Some("bogus"), value).unwrap_err();
            assert_eq!(err.field, "bogus");
        }
    }

    #[test]
    fn test_empty_field_or_value_yields_no_filter() {
        assert_eq!(FilterQueryBuilder::build(None, None).unwrap(), None);
        assert_eq!(FilterQueryBuilder::build(Some(""), Some("x")).unwrap(), None);
        assert_eq!(FilterQueryBuilder::build(Some("  "), Some("x")).unwrap(), None);
        assert_eq!(FilterQueryBuilder::build(Some("song_name"), None).unwrap(), None);
        assert_eq!(
            FilterQueryBuilder::build(Some("artist_name"), Some("   ")).unwrap(),
            None
        );
    }

    #[test]
    fn test_song_name_filter_is_normalized_pattern() {
        let spec = FilterQueryBuilder::build(Some("song_name"), Some(" Hey  Jude - Live "))
            .unwrap()
            .unwrap();
        assert_eq!(spec.field, FilterField::SongName);
        assert_eq!(spec.value, "hey jude-live");
        assert_eq!(spec.comparison, Comparison::Pattern);
    }

    #[test]
    fn test_release_date_filter() {
        let spec = FilterQueryBuilder::build(Some("release_date"), Some("2006-07-16"))
            .unwrap()
            .unwrap();
        assert_eq!(spec.value, "2006-07-16");
        assert_eq!(spec.comparison, Comparison::Equals);
    }

    #[test]
    fn test_bad_release_date_is_dropped() {
        assert_eq!(
            FilterQueryBuilder::build(Some("release_date"), Some("16.07.2006")).unwrap(),
            None
        );
        assert_eq!(
            FilterQueryBuilder::build(Some("release_date"), Some("2006-13-40")).unwrap(),
            None
        );
        assert_eq!(
            FilterQueryBuilder::build(Some("release_date"), Some("2006-7-6")).unwrap(),
            None
        );
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        assert!(FilterQueryBuilder::build(Some("Song_Name"), Some("x")).is_err());
    }

    #[test]
    fn test_query_spec_without_filter() {
        let spec = SongQuerySpec::build(None);
        assert_eq!(spec.count_sql, "SELECT COUNT(*) AS count FROM songs s");
        assert!(spec.select_sql.starts_with("SELECT s.* FROM songs s ORDER BY"));
        assert!(spec.binds.is_empty());
    }

    #[test]
    fn test_query_spec_artist_join() {
        let filter = FilterQueryBuilder::build(Some("artist_name"), Some("50%_off"))
            .unwrap()
            .unwrap();
        let spec = SongQuerySpec::build(Some(&filter));

        assert!(spec.select_sql.contains("INNER JOIN artists a"));
        assert!(spec.count_sql.contains("INNER JOIN artists a"));
        assert!(spec.count_sql.contains("a.normalized_name LIKE ?"));
        assert_eq!(spec.binds, vec!["%50\\%\\_off%".to_string()]);
    }

    #[test]
    fn test_query_spec_song_and_date_filters() {
        let song = FilterQueryBuilder::build(Some("song_name"), Some("hey%"))
            .unwrap()
            .unwrap();
        let spec = SongQuerySpec::build(Some(&song));
        assert!(spec.count_sql.ends_with("WHERE s.normalized_song_name LIKE ?"));
        assert_eq!(spec.binds, vec!["hey%".to_string()]);

        let date = FilterQueryBuilder::build(Some("release_date"), Some("2006-07-16"))
            .unwrap()
            .unwrap();
        let spec = SongQuerySpec::build(Some(&date));
        assert!(spec.count_sql.ends_with("WHERE s.release_date = ?"));
        assert!(!spec.count_sql.contains("JOIN"));
    }
}
