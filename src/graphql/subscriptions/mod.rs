use async_graphql::*;
use futures_util::Stream;
use std::pin::Pin;

use crate::events::EventBroadcaster;
use crate::graphql::types::{RestaurantChanged, ReviewChanged, ReviewCommentChanged};

pub struct Subscription;

#[Subscription]
impl Subscription {
    /// Changes to one restaurant's detail page (updates and deletion)
    async fn restaurant_updated(
        &self,
        id: i32,
    ) -> Pin<Box<dyn Stream<Item = RestaurantChanged> + Send>> {
        let mut receiver = RESTAURANT_EVENTS.subscribe(id).await;

        let stream = async_stream::stream! {
            loop {
                use tokio::sync::broadcast::error::RecvError;

                match receiver.recv().await {
                    Ok(event) => {
                        if event.id == id {
                            yield event;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "Restaurant receiver lagged for restaurant {}, skipped {} events",
                            id,
                            skipped
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Box::pin(stream)
    }

    /// Changes to the restaurant listing. `end_cursor` is the last cursor the
    /// client has rendered; events for rows at or before it are dropped so a
    /// client only refreshes when its visible page may have changed.
    async fn restaurants_updated(
        &self,
        end_cursor: i32,
    ) -> Pin<Box<dyn Stream<Item = RestaurantChanged> + Send>> {
        let mut receiver = RESTAURANT_LIST_EVENTS.subscribe(()).await;

        let stream = async_stream::stream! {
            loop {
                use tokio::sync::broadcast::error::RecvError;

                match receiver.recv().await {
                    Ok(event) => {
                        if end_cursor <= event.id {
                            yield event;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "Restaurant list receiver lagged, skipped {} events",
                            skipped
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Box::pin(stream)
    }

    /// Review changes within one restaurant
    async fn review_updated(
        &self,
        restaurant_id: i32,
    ) -> Pin<Box<dyn Stream<Item = ReviewChanged> + Send>> {
        let mut receiver = REVIEW_EVENTS.subscribe(restaurant_id).await;

        let stream = async_stream::stream! {
            loop {
                use tokio::sync::broadcast::error::RecvError;

                match receiver.recv().await {
                    Ok(event) => {
                        if event.restaurant_id == restaurant_id {
                            yield event;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "Review receiver lagged for restaurant {}, skipped {} events",
                            restaurant_id,
                            skipped
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Box::pin(stream)
    }

    /// Owner comment changes within one restaurant
    async fn review_comment_updated(
        &self,
        restaurant_id: i32,
    ) -> Pin<Box<dyn Stream<Item = ReviewCommentChanged> + Send>> {
        let mut receiver = REVIEW_COMMENT_EVENTS.subscribe(restaurant_id).await;

        let stream = async_stream::stream! {
            loop {
                use tokio::sync::broadcast::error::RecvError;

                match receiver.recv().await {
                    Ok(event) => {
                        if event.restaurant_id == restaurant_id {
                            yield event;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "Review comment receiver lagged for restaurant {}, skipped {} events",
                            restaurant_id,
                            skipped
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Box::pin(stream)
    }
}

lazy_static::lazy_static! {
    /// Per-restaurant feed for detail pages, keyed by restaurant id
    pub static ref RESTAURANT_EVENTS: EventBroadcaster<i32, RestaurantChanged> =
        EventBroadcaster::new(1000);

    /// Single shared feed for the restaurant listing
    pub static ref RESTAURANT_LIST_EVENTS: EventBroadcaster<(), RestaurantChanged> =
        EventBroadcaster::new(1000);

    /// Review feeds keyed by the owning restaurant id
    pub static ref REVIEW_EVENTS: EventBroadcaster<i32, ReviewChanged> =
        EventBroadcaster::new(1000);

    /// Comment feeds keyed by the owning restaurant id
    pub static ref REVIEW_COMMENT_EVENTS: EventBroadcaster<i32, ReviewCommentChanged> =
        EventBroadcaster::new(1000);
}

/// Publish a restaurant change to its detail-page subscribers.
pub async fn publish_restaurant_event(event: RestaurantChanged) {
    let id = event.id;
    let count = RESTAURANT_EVENTS.publish(id, event).await;
    if count == 0 {
        tracing::debug!("No active receivers for restaurant {} event", id);
    }
}

/// Publish a restaurant change to listing subscribers.
pub async fn publish_restaurant_list_event(event: RestaurantChanged) {
    let id = event.id;
    let count = RESTAURANT_LIST_EVENTS.publish((), event).await;
    if count == 0 {
        tracing::debug!("No active receivers for restaurant list event ({})", id);
    }
}

/// Publish a review change to its restaurant's subscribers.
pub async fn publish_review_event(event: ReviewChanged) {
    let restaurant_id = event.restaurant_id;
    let count = REVIEW_EVENTS.publish(restaurant_id, event).await;
    if count == 0 {
        tracing::debug!(
            "No active receivers for review event on restaurant {}",
            restaurant_id
        );
    }
}

/// Publish a comment change to its restaurant's subscribers.
pub async fn publish_review_comment_event(event: ReviewCommentChanged) {
    let restaurant_id = event.restaurant_id;
    let count = REVIEW_COMMENT_EVENTS.publish(restaurant_id, event).await;
    if count == 0 {
        tracing::debug!(
            "No active receivers for comment event on restaurant {}",
            restaurant_id
        );
    }
}
