use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PsqlSettings {
    pub ip: String,
    pub port: u16,
    pub db_name: Option<String>,
    pub username: String,
    pub password: Option<String>,
    pub max_connections: u32,
    /// Path to a root certificate, enables `verify-full` TLS when set.
    pub root_cert: Option<String>,
    #[serde(default)]
    pub log_statements: PsqlLogStatements,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum PsqlLogStatements {
    Enable,
    #[default]
    Disable,
}
