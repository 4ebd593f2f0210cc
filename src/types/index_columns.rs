use std::fmt::{self, Display};
use std::str::FromStr;
use std::{slice, vec};

use serde::{Deserialize, Serialize};

use crate::error::{PartitionError, Result};
use crate::utils::validate_identifier;

/// The ordered columns covered by one index on every partition table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexGroup(pub Vec<String>);

impl IndexGroup {
    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(PartitionError::Identifier(
                "Index column group is empty".to_string(),
            ));
        }
        self.0.iter().try_for_each(|column| validate_identifier(column))
    }
}

impl FromStr for IndexGroup {
    type Err = PartitionError;

    /// Parses a comma separated column list such as `"city_id, logdate"`.
    fn from_str(s: &str) -> Result<Self> {
        let group = IndexGroup(
            s.split(',')
                .map(str::trim)
                .filter(|column| !column.is_empty())
                .map(str::to_string)
                .collect(),
        );
        group.validate()?;
        Ok(group)
    }
}

impl<'a> FromIterator<&'a str> for IndexGroup {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

impl Display for IndexGroup {
    /// Formats the group as it appears inside `CREATE INDEX ... (...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Index column groups of a partitioned table. Position in the list is part of the
/// index name, so the order is significant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexColumns(pub Vec<IndexGroup>);

impl IndexColumns {
    /// The default: one index on the partitioning column.
    pub fn for_column(column: &str) -> Self {
        Self(vec![IndexGroup(vec![column.to_string()])])
    }

    pub fn groups(&self) -> &[IndexGroup] {
        &self.0
    }

    pub fn iter(&self) -> slice::Iter<'_, IndexGroup> {
        self.0.iter()
    }

    pub fn validate(&self) -> Result<()> {
        self.0.iter().try_for_each(IndexGroup::validate)
    }
}

impl FromIterator<IndexGroup> for IndexColumns {
    fn from_iter<T: IntoIterator<Item = IndexGroup>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Vec<String>>> for IndexColumns {
    fn from(value: Vec<Vec<String>>) -> Self {
        value.into_iter().map(IndexGroup).collect()
    }
}

impl IntoIterator for IndexColumns {
    type Item = IndexGroup;
    type IntoIter = vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IndexColumns {
    type Item = &'a IndexGroup;
    type IntoIter = slice::Iter<'a, IndexGroup>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
