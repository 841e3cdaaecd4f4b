use actix_web::web::{self, Path};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracking_core::Topic;

use super::{DeliveryPath, EntityPath, OrderPath};
use crate::{
    error::{Result, error::TopicSnafu},
    response::EventStream,
    states::AppState,
};

#[derive(Debug, Deserialize, Serialize)]
pub struct TopicParams {
    pub topic: String,
}

/// Streams the events of every entity.
pub async fn all_entities(state: web::Data<AppState>) -> EventStream {
    EventStream::new(state.publisher.subscribe(Topic::AllEntities))
}

pub async fn entity(state: web::Data<AppState>, path: Path<EntityPath>) -> EventStream {
    EventStream::new(state.publisher.subscribe(Topic::Entity(path.entity_id)))
}

/// Streams position and ETA updates of every delivery fulfilling the order.
pub async fn order(state: web::Data<AppState>, path: Path<OrderPath>) -> EventStream {
    EventStream::new(state.publisher.subscribe(Topic::Order(path.order_id)))
}

pub async fn delivery(state: web::Data<AppState>, path: Path<DeliveryPath>) -> EventStream {
    EventStream::new(state.publisher.subscribe(Topic::Delivery(path.delivery_id)))
}

/// Streams any topic by name, `all-entities` or `<entity|order|delivery>:<id>`.
#[tracing::instrument(skip(state))]
pub async fn topic(
    state: web::Data<AppState>,
    params: web::Query<TopicParams>,
) -> Result<EventStream> {
    let topic: Topic = params.topic.parse().context(TopicSnafu)?;
    Ok(EventStream::new(state.publisher.subscribe(topic)))
}
