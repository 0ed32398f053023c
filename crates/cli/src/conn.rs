//! Builds the libpq-style connection string the `connectors` crate's
//! `Destination::connect` expects, from the CLI's discrete flags.

pub struct ConnectionParams {
    pub server: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

impl ConnectionParams {
    pub fn to_conn_string(&self) -> String {
        let mut parts = vec![format!("host={}", self.server), format!("dbname={}", self.database)];
        if let Some(user) = &self.username {
            parts.push(format!("user={user}"));
        }
        if let Some(password) = &self.password {
            parts.push(format!("password={password}"));
        }
        if let Some(secs) = self.connect_timeout_secs {
            parts.push(format!("connect_timeout={secs}"));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_absent_credentials() {
        let params = ConnectionParams {
            server: "db.internal".to_string(),
            database: "migrations".to_string(),
            username: None,
            password: None,
            connect_timeout_secs: None,
        };
        assert_eq!(params.to_conn_string(), "host=db.internal dbname=migrations");
    }

    #[test]
    fn includes_credentials_and_timeout_when_present() {
        let params = ConnectionParams {
            server: "db.internal".to_string(),
            database: "migrations".to_string(),
            username: Some("svc".to_string()),
            password: Some("hunter2".to_string()),
            connect_timeout_secs: Some(5),
        };
        let conn_str = params.to_conn_string();
        assert!(conn_str.contains("user=svc"));
        assert!(conn_str.contains("password=hunter2"));
        assert!(conn_str.contains("connect_timeout=5"));
    }
}
