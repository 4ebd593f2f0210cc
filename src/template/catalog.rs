//! Statement templates for every partitioning artifact.

use once_cell::sync::Lazy;

use crate::error::Result;

use super::{Placeholder, Template};

pub const CREATE_TABLE: &str = concat!(
    "CREATE TABLE {table_name} (\n",
    "    CHECK ( {column} >= {start} AND {column} < {end} )\n",
    ") INHERITS ({master_table_name});",
);

pub const DROP_TABLE: &str = "DROP TABLE {table_name};";

pub const INSERT_FUNCTION_PREAMBLE: &str = concat!(
    "CREATE OR REPLACE FUNCTION {master_table_name}_insert_function()\n",
    "RETURNS TRIGGER AS $$\n",
    "BEGIN",
);

pub const INSERT_FUNCTION_BRANCH: &str = concat!(
    "    {pos_item} ( NEW.{column} >= {start} AND NEW.{column} < {end} ) THEN\n",
    "        INSERT INTO {table_name} VALUES (NEW.*);",
);

pub const INSERT_FUNCTION_POSTAMBLE: &str = concat!(
    "    ELSE\n",
    "        RAISE EXCEPTION '{column} out of range.  Fix the {master_table_name}_insert_function() function!';\n",
    "    END IF;\n",
    "    RETURN NULL;\n",
    "END;\n",
    "$$\n",
    "LANGUAGE plpgsql;",
);

pub const CREATE_TRIGGER: &str = concat!(
    "CREATE TRIGGER insert_{master_table_name}_trigger\n",
    "    BEFORE INSERT ON {master_table_name}\n",
    "    FOR EACH ROW EXECUTE PROCEDURE {master_table_name}_insert_function();",
);

// Triggers cannot be replaced in place, so they are dropped before being recreated.
pub const DROP_TRIGGER: &str = "DROP TRIGGER insert_{master_table_name}_trigger ON {master_table_name};";

pub const CREATE_INDEX: &str = "CREATE INDEX {index_name} ON {table_name} ({index_cols});";

pub const DROP_INDEX: &str = "DROP INDEX {index_name};";

pub const FIRST_BRANCH: &str = "IF";
pub const MIDDLE_BRANCH: &str = "ELSIF";

/// Markers substituted for `{pos_item}` depending on the chunk's position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Positions {
    pub first: Option<&'static str>,
    pub middle: Option<&'static str>,
    pub last: Option<&'static str>,
}

impl Positions {
    /// Picks the marker for chunk `index` out of `count`. The first marker wins over the
    /// last one for a single chunk; an absent marker renders as nothing.
    pub fn marker(&self, index: usize, count: usize) -> &'static str {
        let marker = match (self.first, self.last) {
            (Some(first), _) if index == 0 => Some(first),
            (_, Some(last)) if index + 1 == count => Some(last),
            _ => self.middle,
        };
        marker.unwrap_or_default()
    }
}

/// Everything needed to render one artifact: an optional per-chunk body framed by an
/// optional preamble and postamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub body: Option<Template>,
    pub preamble: Option<Template>,
    pub postamble: Option<Template>,
    pub positions: Positions,
    /// Repeat the body once per index column group.
    pub per_index: bool,
}

impl Statement {
    /// A statement rendering `body` once per chunk.
    pub fn per_chunk(body: &str) -> Result<Self> {
        Ok(Self {
            body: Some(Template::parse(body, &Placeholder::CHUNK)?),
            ..Self::empty()
        })
    }

    /// A statement rendering `body` once per chunk and index column group.
    pub fn per_index(body: &str) -> Result<Self> {
        Ok(Self {
            body: Some(Template::parse(body, &Placeholder::INDEX)?),
            per_index: true,
            ..Self::empty()
        })
    }

    /// A single statement that does not depend on the domain.
    pub fn standalone(text: &str) -> Result<Self> {
        Self::empty().with_preamble(text)
    }

    pub fn with_preamble(mut self, preamble: &str) -> Result<Self> {
        self.preamble = Some(Template::parse(preamble, &Placeholder::FRAME)?);
        Ok(self)
    }

    pub fn with_postamble(mut self, postamble: &str) -> Result<Self> {
        self.postamble = Some(Template::parse(postamble, &Placeholder::FRAME)?);
        Ok(self)
    }

    pub fn with_positions(mut self, positions: Positions) -> Self {
        self.positions = positions;
        self
    }

    fn empty() -> Self {
        Self {
            body: None,
            preamble: None,
            postamble: None,
            positions: Positions::default(),
            per_index: false,
        }
    }

    pub fn create_table() -> Result<Self> {
        Self::per_chunk(CREATE_TABLE)
    }

    pub fn drop_table() -> Result<Self> {
        Self::per_chunk(DROP_TABLE)
    }

    pub fn insert_function() -> Result<Self> {
        Ok(Self::per_chunk(INSERT_FUNCTION_BRANCH)?
            .with_preamble(INSERT_FUNCTION_PREAMBLE)?
            .with_postamble(INSERT_FUNCTION_POSTAMBLE)?
            .with_positions(Positions {
                first: Some(FIRST_BRANCH),
                middle: Some(MIDDLE_BRANCH),
                last: None,
            }))
    }

    pub fn create_trigger() -> Result<Self> {
        Self::standalone(CREATE_TRIGGER)
    }

    pub fn drop_trigger() -> Result<Self> {
        Self::standalone(DROP_TRIGGER)
    }

    pub fn create_index() -> Result<Self> {
        Self::per_index(CREATE_INDEX)
    }

    pub fn drop_index() -> Result<Self> {
        Self::per_index(DROP_INDEX)
    }
}

/// The built-in statements, parsed and validated once per process.
#[derive(Debug)]
pub struct Catalog {
    pub create_table: Statement,
    pub drop_table: Statement,
    pub insert_function: Statement,
    pub create_trigger: Statement,
    pub drop_trigger: Statement,
    pub create_index: Statement,
    pub drop_index: Statement,
}

static CATALOG: Lazy<Result<Catalog>> = Lazy::new(Catalog::parse);

impl Catalog {
    fn parse() -> Result<Self> {
        Ok(Self {
            create_table: Statement::create_table()?,
            drop_table: Statement::drop_table()?,
            insert_function: Statement::insert_function()?,
            create_trigger: Statement::create_trigger()?,
            drop_trigger: Statement::drop_trigger()?,
            create_index: Statement::create_index()?,
            drop_index: Statement::drop_index()?,
        })
    }

    pub fn get() -> Result<&'static Catalog> {
        (*CATALOG).as_ref().map_err(Clone::clone)
    }
}
