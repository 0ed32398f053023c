use crate::error::ConnectorError;
use tokio_postgres::{Client, NoTls};
use tracing::{error, info};

/// One worker's destination connection. Each worker owns its own connection;
/// connections are never shared between workers.
pub struct Destination {
    client: Client,
}

impl Destination {
    /// Connects and spawns the driver's background I/O task, logging (not
    /// panicking) if that task later dies mid-run.
    pub async fn connect(conn_str: &str) -> Result<Self, ConnectorError> {
        let (client, connection) = tokio_postgres::connect(conn_str, NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "destination connection task terminated");
            }
        });
        info!("destination connection established");
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }
}
