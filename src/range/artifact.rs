use std::fmt::{self, Display};

use crate::error::Result;

use super::operations::{
    ArbitrarySql, CreateTables, DropTables, Indexes, RoutingFunction, RoutingTrigger,
};

/// The kinds of SQL text a partitioner can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    CreateDdl,
    DropDdl,
    Function,
    Trigger,
    DropTrigger,
    CreateIndexDdl,
    DropIndexDdl,
    Sql(String),
}

impl Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::CreateDdl => write!(f, "create table ddl"),
            Artifact::DropDdl => write!(f, "drop table ddl"),
            Artifact::Function => write!(f, "insert function"),
            Artifact::Trigger => write!(f, "insert trigger"),
            Artifact::DropTrigger => write!(f, "drop trigger"),
            Artifact::CreateIndexDdl => write!(f, "create index ddl"),
            Artifact::DropIndexDdl => write!(f, "drop index ddl"),
            Artifact::Sql(template) => write!(f, "arbitrary sql '{}'", template),
        }
    }
}

/// Renders any [`Artifact`] by dispatching to the matching operation.
pub trait Render:
    CreateTables + DropTables + RoutingFunction + RoutingTrigger + Indexes + ArbitrarySql
{
    fn render(&self, artifact: &Artifact) -> Result<String> {
        match artifact {
            Artifact::CreateDdl => self.create_ddl(),
            Artifact::DropDdl => self.drop_ddl(),
            Artifact::Function => self.function_code(),
            Artifact::Trigger => self.trigger_code(),
            Artifact::DropTrigger => self.drop_trigger_code(),
            Artifact::CreateIndexDdl => self.create_index_ddl(),
            Artifact::DropIndexDdl => self.drop_index_ddl(),
            Artifact::Sql(template) => self.sql(template),
        }
    }
}
