use async_graphql::*;
use sea_orm::DatabaseConnection;

use crate::graphql::context::GraphQLContext;
use crate::graphql::mutations::Mutation;
use crate::graphql::queries::Query;
use crate::graphql::subscriptions::Subscription;

pub type AppSchema = Schema<Query, Mutation, Subscription>;

pub fn build_schema(db: DatabaseConnection) -> AppSchema {
    Schema::build(Query, Mutation::default(), Subscription)
        .data(GraphQLContext::new(db))
        .finish()
}
