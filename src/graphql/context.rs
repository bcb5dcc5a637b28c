use sea_orm::DatabaseConnection;

use crate::auth::Actor;
use crate::services::{RestaurantService, ReviewCommentService, ReviewService};

#[derive(Clone)]
pub struct GraphQLContext {
    pub db: DatabaseConnection,
    pub restaurants: RestaurantService,
    pub reviews: ReviewService,
    pub comments: ReviewCommentService,
}

impl GraphQLContext {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            restaurants: RestaurantService::new(db.clone()),
            reviews: ReviewService::new(db.clone()),
            comments: ReviewCommentService::new(db.clone()),
            db,
        }
    }

    /// The acting identity for this request. The HTTP layer resolves the
    /// identity header against the users table and attaches an [`Actor`] to
    /// the request data; anything else is anonymous.
    pub fn actor(ctx: &async_graphql::Context<'_>) -> Actor {
        ctx.data_opt::<Actor>()
            .cloned()
            .unwrap_or_else(Actor::anonymous)
    }
}
