use async_trait::async_trait;
use common::{document::DocumentEvent, error::BoxedCause};
use lapin::{
    options::{BasicPublishOptions, ExchangeDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::MessagingClient;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),

    #[error("Failed to serialize event payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Clone, Deserialize, Debug)]
pub struct MessagingConfig {
    pub address: String,
    pub exchange: String,
    pub routing_key: String,
}

/// Publishes lifecycle events to a RabbitMQ topic exchange with publisher
/// confirmation.
pub struct RabbitMqPublisher {
    // The connection owns the channel; it must outlive the publisher.
    _connection: Connection,
    channel: Channel,
    exchange: String,
    routing_key: String,
}

impl RabbitMqPublisher {
    pub async fn new(config: &MessagingConfig) -> Result<Self, MessagingError> {
        let connection =
            Connection::connect(&config.address, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;

        channel
            .exchange_declare(
                &config.exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        Ok(Self {
            _connection: connection,
            channel,
            exchange: config.exchange.clone(),
            routing_key: config.routing_key.clone(),
        })
    }

    /// Publishes a serialized lifecycle event and waits for the broker
    /// confirmation.
    pub async fn publish(&self, event: &DocumentEvent) -> Result<(), MessagingError> {
        let payload = serde_json::to_vec(event)?;

        self.channel
            .basic_publish(
                &self.exchange,
                &self.routing_key,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default(),
            )
            .await?
            .await?;

        info!(
            document_id = %event.document_id,
            event_type = %event.event_type,
            exchange = %self.exchange,
            routing_key = %self.routing_key,
            "Published document lifecycle event"
        );

        Ok(())
    }
}

#[async_trait]
impl MessagingClient for RabbitMqPublisher {
    async fn publish_event(&self, event: &DocumentEvent) -> Result<(), BoxedCause> {
        self.publish(event).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_failures_map_to_messaging_error() {
        // serde_json::Error is hard to provoke from a DocumentEvent, so build
        // one directly from malformed input.
        let err = serde_json::from_str::<DocumentEvent>("{").unwrap_err();
        let err = MessagingError::from(err);
        assert!(err.to_string().starts_with("Failed to serialize event payload: "));
    }
}
