use std::fmt;

pub mod models;

/// Postgres type of a column, as far as the query layer needs to know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Uuid,
    Text,
    Integer,
    Boolean,
    Timestamp,
    /// A user-defined enum type, e.g. `day`.
    Enum(&'static str),
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Uuid => f.write_str("uuid"),
            SqlType::Text => f.write_str("text"),
            SqlType::Integer => f.write_str("integer"),
            SqlType::Boolean => f.write_str("boolean"),
            SqlType::Timestamp => f.write_str("timestamp"),
            SqlType::Enum(name) => write!(f, "enum {}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    NoAction,
    Cascade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub table: &'static str,
    pub column: &'static str,
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub has_default: bool,
    /// Set to `now()` by every UPDATE that does not assign it explicitly.
    pub refresh_on_update: bool,
    pub references: Option<Reference>,
}

impl Column {
    pub const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Column {
            name,
            sql_type,
            nullable: false,
            primary_key: false,
            unique: false,
            has_default: false,
            refresh_on_update: false,
            references: None,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.has_default = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub const fn refresh_on_update(mut self) -> Self {
        self.refresh_on_update = true;
        self
    }

    pub const fn references(
        mut self,
        table: &'static str,
        column: &'static str,
        on_delete: OnDelete,
    ) -> Self {
        self.references = Some(Reference {
            table,
            column,
            on_delete,
        });
        self
    }

    /// Whether an INSERT must supply this column.
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.has_default
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub indexes: &'static [Index],
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary_key)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub tables: &'static [Table],
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tables.iter().map(|t| t.name)
    }

    /// Tables whose columns reference `table`.
    pub fn referencing(&self, table: &str) -> Vec<&Table> {
        self.tables
            .iter()
            .filter(|t| {
                t.columns
                    .iter()
                    .any(|c| c.references.is_some_and(|r| r.table == table))
            })
            .collect()
    }
}

pub const EVENTS: &str = "events";
pub const SCHEDULES: &str = "schedules";
pub const SCHEDULE_AVAILABILITIES: &str = "scheduleAvailabilities";

pub const DAY_ENUM: &str = "day";

const CREATED_AT: Column = Column::new("createdAt", SqlType::Timestamp).with_default();
const UPDATED_AT: Column = Column::new("updatedAt", SqlType::Timestamp)
    .with_default()
    .refresh_on_update();

/// The Calendra application schema.
pub static CALENDRA: Schema = Schema {
    tables: &[
        Table {
            name: EVENTS,
            columns: &[
                Column::new("id", SqlType::Uuid).primary_key(),
                Column::new("name", SqlType::Text),
                Column::new("description", SqlType::Text).nullable(),
                Column::new("durationInMinutes", SqlType::Integer),
                Column::new("clerkUserId", SqlType::Text),
                Column::new("isActive", SqlType::Boolean).with_default(),
                CREATED_AT,
                UPDATED_AT,
            ],
            indexes: &[Index {
                name: "clerkUserIdIndex",
                columns: &["clerkUserId"],
            }],
        },
        Table {
            name: SCHEDULES,
            columns: &[
                Column::new("id", SqlType::Uuid).primary_key(),
                Column::new("timezone", SqlType::Text),
                Column::new("clerkUserId", SqlType::Text).unique(),
                CREATED_AT,
                UPDATED_AT,
            ],
            indexes: &[],
        },
        Table {
            name: SCHEDULE_AVAILABILITIES,
            columns: &[
                Column::new("id", SqlType::Uuid).primary_key(),
                Column::new("scheduleId", SqlType::Uuid).references(
                    SCHEDULES,
                    "id",
                    OnDelete::Cascade,
                ),
                Column::new("startTime", SqlType::Text),
                Column::new("endTime", SqlType::Text),
                Column::new("dayOfWeek", SqlType::Enum(DAY_ENUM)),
            ],
            indexes: &[Index {
                name: "scheduleIdIndex",
                columns: &["scheduleId"],
            }],
        },
    ],
};
