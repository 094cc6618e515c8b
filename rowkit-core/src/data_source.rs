use crate::{ErrorKind, GenericSqlWriter, OleDbSqlWriter, Result, SqlWriter};
use anyhow::Context;
use std::{
    env,
    fmt::{self, Display},
    str::FromStr,
};

static GENERIC_WRITER: GenericSqlWriter = GenericSqlWriter::new();
static OLEDB_WRITER: OleDbSqlWriter = OleDbSqlWriter::new();

/// Environment variable holding the provider name.
pub const PROVIDER_VARIABLE: &str = "ROWKIT_PROVIDER";
/// Environment variable holding the connection string.
pub const CONNECTION_STRING_VARIABLE: &str = "ROWKIT_CONNECTION_STRING";

/// Family of backend, selects the SQL dialect and the driver able to serve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OleDb,
    SqlServer,
    MySql,
    Sqlite,
}

impl ProviderKind {
    /// Canonical provider invariant name.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OleDb => "System.Data.OleDb",
            ProviderKind::SqlServer => "System.Data.SqlClient",
            ProviderKind::MySql => "MySql.Data.MySqlClient",
            ProviderKind::Sqlite => "System.Data.SQLite",
        }
    }

    /// Dialect used to write the statements sent to this provider.
    pub fn sql_writer(&self) -> &'static dyn SqlWriter {
        match self {
            ProviderKind::OleDb => OLEDB_WRITER.as_dyn(),
            ProviderKind::SqlServer | ProviderKind::MySql | ProviderKind::Sqlite => {
                GENERIC_WRITER.as_dyn()
            }
        }
    }
}

impl FromStr for ProviderKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        [
            (ProviderKind::OleDb, &["System.Data.OleDb", "oledb"][..]),
            (
                ProviderKind::SqlServer,
                &["System.Data.SqlClient", "sqlserver", "mssql"][..],
            ),
            (ProviderKind::MySql, &["MySql.Data.MySqlClient", "mysql"][..]),
            (ProviderKind::Sqlite, &["System.Data.SQLite", "sqlite"][..]),
        ]
        .into_iter()
        .find_map(|(kind, names)| {
            names
                .iter()
                .any(|v| v.eq_ignore_ascii_case(s))
                .then_some(kind)
        })
        .ok_or_else(|| ErrorKind::argument(format!("Unknown provider `{s}`")))
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where to connect: the provider and its connection string. Holds no live resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSource {
    provider: ProviderKind,
    connection_string: String,
}

impl DataSource {
    pub fn new(provider: ProviderKind, connection_string: impl Into<String>) -> Self {
        Self {
            provider,
            connection_string: connection_string.into(),
        }
    }

    /// Build from a provider name, see [`ProviderKind::from_str`].
    pub fn parse(provider: &str, connection_string: impl Into<String>) -> Result<Self> {
        Ok(Self::new(provider.parse()?, connection_string))
    }

    /// Build from the `ROWKIT_PROVIDER` and `ROWKIT_CONNECTION_STRING` environment variables.
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| {
            env::var(name)
                .map_err(|e| ErrorKind::argument(format!("Cannot read `{name}`: {e}")))
        };
        let provider = read(PROVIDER_VARIABLE)?;
        let connection_string = read(CONNECTION_STRING_VARIABLE)?;
        Self::parse(&provider, connection_string)
            .with_context(|| format!("While reading `{PROVIDER_VARIABLE}`"))
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    pub fn sql_writer(&self) -> &'static dyn SqlWriter {
        self.provider.sql_writer()
    }
}
