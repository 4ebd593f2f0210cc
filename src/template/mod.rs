use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PartitionError, Result};

pub use self::catalog::{Catalog, Positions, Statement};

pub mod catalog;

/// A named slot that a statement template can reference as `{key}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// Partitioning column.
    Column,
    /// SQL literal of the chunk's lower bound.
    Start,
    /// SQL literal of the chunk's upper bound.
    End,
    MasterTableName,
    /// Name of the chunk's partition table. `{table}` is accepted as an alias.
    TableName,
    /// First/middle/last marker, such as `IF` or `ELSIF`.
    PosItem,
    IndexName,
    IndexCols,
}

impl Placeholder {
    pub const ALL: [Placeholder; 8] = [
        Placeholder::Column,
        Placeholder::Start,
        Placeholder::End,
        Placeholder::MasterTableName,
        Placeholder::TableName,
        Placeholder::PosItem,
        Placeholder::IndexName,
        Placeholder::IndexCols,
    ];

    /// Keys available to preambles and postambles, which are rendered once per statement.
    pub const FRAME: [Placeholder; 2] = [Placeholder::MasterTableName, Placeholder::Column];

    /// Keys available to a per-chunk template.
    pub const CHUNK: [Placeholder; 6] = [
        Placeholder::Column,
        Placeholder::Start,
        Placeholder::End,
        Placeholder::MasterTableName,
        Placeholder::TableName,
        Placeholder::PosItem,
    ];

    /// Keys available to a per-chunk, per-index-group template.
    pub const INDEX: [Placeholder; 8] = Self::ALL;

    pub fn key(&self) -> &'static str {
        match self {
            Placeholder::Column => "column",
            Placeholder::Start => "start",
            Placeholder::End => "end",
            Placeholder::MasterTableName => "master_table_name",
            Placeholder::TableName => "table_name",
            Placeholder::PosItem => "pos_item",
            Placeholder::IndexName => "index_name",
            Placeholder::IndexCols => "index_cols",
        }
    }
}

impl FromStr for Placeholder {
    type Err = PartitionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(Placeholder::TableName),
            key => Placeholder::ALL
                .into_iter()
                .find(|placeholder| placeholder.key() == key)
                .ok_or_else(|| PartitionError::Template(format!("Unknown key '{{{}}}'", key))),
        }
    }
}

impl Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Placeholder),
}

// Escaped braces, `{key}` slots, then any stray brace.
static SLOT_PATTERN: Lazy<std::result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]"));

/// A statement template parsed into literal text and [`Placeholder`] slots.
///
/// Templates use `{key}` slots; `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source`, refusing any key outside `allowed`.
    pub fn parse(source: &str, allowed: &[Placeholder]) -> Result<Self> {
        let re = (*SLOT_PATTERN).as_ref().map_err(|err| {
            PartitionError::Template(format!("Failed to compile regex pattern. {}", err))
        })?;

        let mut segments = Vec::new();
        let mut text = String::new();
        let mut last = 0;
        for captures in re.captures_iter(source) {
            let Some(matched) = captures.get(0) else {
                continue;
            };
            text.push_str(&source[last..matched.start()]);
            last = matched.end();
            match (matched.as_str(), captures.get(1)) {
                ("{{", _) => text.push('{'),
                ("}}", _) => text.push('}'),
                (_, Some(key)) => {
                    let placeholder = Placeholder::from_str(key.as_str().trim())?;
                    if !allowed.contains(&placeholder) {
                        return Err(PartitionError::Template(format!(
                            "Key {} is not available in this template: {}",
                            placeholder, source
                        )));
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Slot(placeholder));
                }
                (brace, None) => {
                    return Err(PartitionError::Template(format!(
                        "Unmatched '{}' at byte {} of template: {}",
                        brace,
                        matched.start(),
                        source
                    )))
                }
            }
        }
        text.push_str(&source[last..]);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholders referenced by the template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(placeholder) => Some(*placeholder),
            Segment::Text(_) => None,
        })
    }

    pub fn render(&self, values: &Substitutions<'_>) -> Result<String> {
        let mut rendered = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Slot(placeholder) => {
                    rendered.push_str(values.get(*placeholder).ok_or_else(|| {
                        PartitionError::Template(format!(
                            "No value supplied for {} in template: {}",
                            placeholder, self.source
                        ))
                    })?)
                }
            }
        }
        Ok(rendered)
    }
}

/// Values bound to placeholders for one rendering.
#[derive(Debug, Clone, Default)]
pub struct Substitutions<'a> {
    values: BTreeMap<Placeholder, &'a str>,
}

impl<'a> Substitutions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, placeholder: Placeholder, value: &'a str) -> Self {
        self.values.insert(placeholder, value);
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&'a str> {
        self.values.get(&placeholder).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_all_slots() {
        let template = Template::parse("DROP INDEX {index_name}; -- {table_name}", &Placeholder::INDEX)
            .unwrap();
        let values = Substitutions::new()
            .with(Placeholder::IndexName, "t_0_0_index")
            .with(Placeholder::TableName, "t_0");
        assert_eq!(template.render(&values).unwrap(), "DROP INDEX t_0_0_index; -- t_0");
        assert_eq!(
            template.placeholders().collect::<Vec<_>>(),
            vec![Placeholder::IndexName, Placeholder::TableName]
        );
    }

    #[test]
    fn test_table_alias() {
        let template = Template::parse("VACUUM {table};", &Placeholder::CHUNK).unwrap();
        let values = Substitutions::new().with(Placeholder::TableName, "t_1");
        assert_eq!(template.render(&values).unwrap(), "VACUUM t_1;");
    }

    #[test]
    fn test_escaped_braces() {
        let template = Template::parse("SELECT '{{}}' FROM {table_name};", &Placeholder::CHUNK)
            .unwrap();
        let values = Substitutions::new().with(Placeholder::TableName, "t_1");
        assert_eq!(template.render(&values).unwrap(), "SELECT '{}' FROM t_1;");
    }

    #[test]
    fn test_rejects_unknown_and_unavailable_keys() {
        assert!(matches!(
            Template::parse("VACUUM {tablename};", &Placeholder::CHUNK),
            Err(PartitionError::Template(_))
        ));
        assert!(matches!(
            Template::parse("DROP INDEX {index_name};", &Placeholder::CHUNK),
            Err(PartitionError::Template(_))
        ));
        assert!(matches!(
            Template::parse("BEGIN {start}", &Placeholder::FRAME),
            Err(PartitionError::Template(_))
        ));
        assert!(matches!(
            Template::parse("SELECT '{' FROM t;", &Placeholder::CHUNK),
            Err(PartitionError::Template(_))
        ));
    }

    #[test]
    fn test_missing_value() {
        let template = Template::parse("DROP TABLE {table_name};", &Placeholder::CHUNK).unwrap();
        assert!(matches!(
            template.render(&Substitutions::new()),
            Err(PartitionError::Template(_))
        ));
    }

    #[test]
    fn test_placeholder_keys_round_trip() {
        for placeholder in Placeholder::ALL {
            assert_eq!(placeholder.key().parse::<Placeholder>().unwrap(), placeholder);
        }
    }
}
