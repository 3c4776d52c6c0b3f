use crate::attempt::AttemptResult;
use crate::error::{Error, Result};
use std::time::Duration;

/// Simulated result mailer. There is no real delivery backend; the send is
/// a fixed delay followed by a success acknowledgment.
#[derive(Clone)]
pub struct EmailService {
    simulation_delay: Duration,
}

impl EmailService {
    pub fn new(simulation_delay: Duration) -> Self {
        Self { simulation_delay }
    }

    pub async fn send_result(&self, address: &str, result: &AttemptResult) -> Result<()> {
        if !address.contains('@') {
            return Err(Error::BadRequest(format!(
                "'{}' is not a valid email address",
                address
            )));
        }

        tokio::time::sleep(self.simulation_delay).await;
        tracing::info!(
            address,
            score = result.score,
            total = result.total,
            percentage = result.percentage,
            "Result report sent"
        );
        Ok(())
    }
}
