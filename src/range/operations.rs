use log::{debug, trace};

use crate::chunker::Chunker;
use crate::error::Result;
use crate::template::{Catalog, Placeholder, Statement, Substitutions};
use crate::{Chunk, IndexColumns};

/// A master table whose rows are spread over one partition table per chunk.
pub trait Partitioned
where
    Self: Sized,
{
    type Source: Chunker;

    fn chunker(&self) -> &Self::Source;
    fn master_table(&self) -> &str;
    fn column(&self) -> &str;
    fn index_columns(&self) -> &IndexColumns;

    /// Collects a fresh traversal of the domain.
    fn chunks(&self) -> Result<Vec<Chunk>> {
        Ok(self.chunker().chunks()?.collect())
    }

    /// Renders `statement` over every chunk and joins the lines with `\n`.
    ///
    /// All chunks are collected before anything is rendered, so an error never leaves
    /// partial SQL behind. A statement with a body renders to an empty string when the
    /// domain is empty, preamble and postamble included.
    fn render_statement(&self, statement: &Statement) -> Result<String> {
        let chunks = self.chunks()?;
        if statement.body.is_some() && chunks.is_empty() {
            debug!("no chunks for {}, nothing to render", self.master_table());
            return Ok(String::new());
        }

        let frame = Substitutions::new()
            .with(Placeholder::MasterTableName, self.master_table())
            .with(Placeholder::Column, self.column());
        let mut lines = Vec::new();

        if let Some(preamble) = &statement.preamble {
            lines.push(preamble.render(&frame)?);
        }
        if let Some(body) = &statement.body {
            for (i, chunk) in chunks.iter().enumerate() {
                let table_name = chunk.table_name(self.master_table());
                let values = frame
                    .clone()
                    .with(Placeholder::Start, chunk.sql_start())
                    .with(Placeholder::End, chunk.sql_end())
                    .with(Placeholder::TableName, &table_name)
                    .with(Placeholder::PosItem, statement.positions.marker(i, chunks.len()));
                if statement.per_index {
                    for (j, group) in self.index_columns().iter().enumerate() {
                        let index_name = format!("{}_{}_index", table_name, j);
                        let index_cols = group.to_string();
                        let values = values
                            .clone()
                            .with(Placeholder::IndexName, &index_name)
                            .with(Placeholder::IndexCols, &index_cols);
                        lines.push(body.render(&values)?);
                    }
                } else {
                    lines.push(body.render(&values)?);
                }
                trace!("rendered chunk {} of {}", table_name, self.master_table());
            }
        }
        if let Some(postamble) = &statement.postamble {
            lines.push(postamble.render(&frame)?);
        }

        debug!(
            "rendered {} statement lines over {} chunks of {}",
            lines.len(),
            chunks.len(),
            self.master_table()
        );
        Ok(lines.join("\n"))
    }
}

pub trait CreateTables: Partitioned {
    /// One `CREATE TABLE ... INHERITS` per chunk, each bounded by a `CHECK` constraint.
    fn create_ddl(&self) -> Result<String> {
        self.render_statement(&Catalog::get()?.create_table)
    }
}

pub trait DropTables: Partitioned {
    fn drop_ddl(&self) -> Result<String> {
        self.render_statement(&Catalog::get()?.drop_table)
    }
}

pub trait RoutingFunction: Partitioned {
    /// The `{master}_insert_function()` that routes each inserted row into its partition.
    ///
    /// The first chunk opens with `IF`, every other chunk is an `ELSIF`, and values
    /// outside the domain fall through to `RAISE EXCEPTION`.
    fn function_code(&self) -> Result<String> {
        self.render_statement(&Catalog::get()?.insert_function)
    }
}

pub trait RoutingTrigger: Partitioned {
    /// Binds the routing function as a before-insert trigger on the master table.
    fn trigger_code(&self) -> Result<String> {
        self.render_statement(&Catalog::get()?.create_trigger)
    }

    fn drop_trigger_code(&self) -> Result<String> {
        self.render_statement(&Catalog::get()?.drop_trigger)
    }
}

pub trait Indexes: Partitioned {
    /// One `CREATE INDEX` per chunk and index column group, named
    /// `{partition}_{group position}_index`.
    fn create_index_ddl(&self) -> Result<String> {
        self.render_statement(&Catalog::get()?.create_index)
    }

    /// Drops the indexes named by [`Indexes::create_index_ddl`] for the same domain.
    fn drop_index_ddl(&self) -> Result<String> {
        self.render_statement(&Catalog::get()?.drop_index)
    }
}

pub trait ArbitrarySql: Partitioned {
    /// Applies a caller supplied template, such as `VACUUM ANALYZE {table_name};`, to
    /// every partition.
    fn sql(&self, template: &str) -> Result<String> {
        self.render_statement(&Statement::per_chunk(template)?)
    }

    /// Like [`ArbitrarySql::sql`], framed by an optional preamble and postamble that may
    /// reference `{master_table_name}` and `{column}`.
    fn sql_with(
        &self,
        template: &str,
        preamble: Option<&str>,
        postamble: Option<&str>,
    ) -> Result<String> {
        let mut statement = Statement::per_chunk(template)?;
        if let Some(preamble) = preamble {
            statement = statement.with_preamble(preamble)?;
        }
        if let Some(postamble) = postamble {
            statement = statement.with_postamble(postamble)?;
        }
        self.render_statement(&statement)
    }
}
