//! GraphQL operation tests
//!
//! Executes queries and mutations directly against the schema with a seeded
//! in-memory database. The demo seed creates users 1-5 (diner, customer,
//! owner, alternate owner, admin), twenty restaurants owned by user 3, one
//! review per restaurant by user 1 (ratings alternate 1 and 5) and comments
//! on the first four reviews.

use anyhow::Result;
use async_graphql::{Request, Value};
use serde_json::json;

use forkside::auth::{Actor, Role};
use forkside::database::migrations::Migrator;
use forkside::database::seed_data;
use forkside::graphql::{build_schema, AppSchema};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

const DINER: i32 = 1;
const CUSTOMER: i32 = 2;
const OWNER: i32 = 3;
const ALT_OWNER: i32 = 4;
const ADMIN: i32 = 5;

async fn setup_schema() -> Result<AppSchema> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    seed_data::create_demo_data(&db).await?;
    Ok(build_schema(db))
}

async fn execute(
    schema: &AppSchema,
    query: &str,
    actor: Option<Actor>,
) -> async_graphql::Response {
    let mut request = Request::new(query);
    if let Some(actor) = actor {
        request = request.data(actor);
    }
    schema.execute(request).await
}

async fn execute_ok(schema: &AppSchema, query: &str, actor: Option<Actor>) -> serde_json::Value {
    let response = execute(schema, query, actor).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

fn error_code(response: &async_graphql::Response) -> Option<&Value> {
    response
        .errors
        .first()
        .and_then(|e| e.extensions.as_ref())
        .and_then(|ext| ext.get("code"))
}

#[tokio::test]
async fn restaurants_listed_by_rating_descending() -> Result<()> {
    let schema = setup_schema().await?;

    let data = execute_ok(
        &schema,
        r#"{
            restaurants(limit: 5) {
                totalCount
                edges { cursor node { id } }
                pageInfo { endCursor hasNextPage }
            }
        }"#,
        None,
    )
    .await;

    let connection = &data["restaurants"];
    assert_eq!(connection["totalCount"], 20);

    // Even-numbered seeds carry rating 5, odd carry 1; ties break by id.
    let ids: Vec<i64> = connection["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["node"]["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 4, 6, 8, 10]);

    let cursors: Vec<i64> = connection["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["cursor"].as_i64().unwrap())
        .collect();
    assert_eq!(cursors, vec![0, 1, 2, 3, 4]);

    assert_eq!(connection["pageInfo"]["endCursor"], 4);
    assert_eq!(connection["pageInfo"]["hasNextPage"], true);

    Ok(())
}

#[tokio::test]
async fn restaurants_cursor_walks_to_the_last_page() -> Result<()> {
    let schema = setup_schema().await?;

    let data = execute_ok(
        &schema,
        r#"{
            restaurants(limit: 1, after: 18) {
                totalCount
                edges { cursor node { id } }
                pageInfo { endCursor hasNextPage }
            }
        }"#,
        None,
    )
    .await;

    let connection = &data["restaurants"];
    assert_eq!(connection["totalCount"], 20);
    assert_eq!(connection["edges"][0]["cursor"], 18);
    assert_eq!(connection["pageInfo"]["endCursor"], 18);
    assert_eq!(connection["pageInfo"]["hasNextPage"], true);

    let data = execute_ok(
        &schema,
        r#"{
            restaurants(limit: 1, after: 19) {
                edges { cursor }
                pageInfo { endCursor hasNextPage }
            }
        }"#,
        None,
    )
    .await;

    let connection = &data["restaurants"];
    assert_eq!(connection["pageInfo"]["endCursor"], 19);
    assert_eq!(connection["pageInfo"]["hasNextPage"], false);

    Ok(())
}

#[tokio::test]
async fn restaurants_past_the_end_yields_an_empty_page() -> Result<()> {
    let schema = setup_schema().await?;

    let data = execute_ok(
        &schema,
        r#"{
            restaurants(limit: 10, after: 25) {
                totalCount
                edges { cursor }
                pageInfo { endCursor hasNextPage }
            }
        }"#,
        None,
    )
    .await;

    let connection = &data["restaurants"];
    assert_eq!(connection["totalCount"], 20);
    assert!(connection["edges"].as_array().unwrap().is_empty());
    assert_eq!(connection["pageInfo"]["endCursor"], 0);
    assert_eq!(connection["pageInfo"]["hasNextPage"], false);

    Ok(())
}

#[tokio::test]
async fn ratings_minimum_keeps_strictly_better_rated_restaurants() -> Result<()> {
    let schema = setup_schema().await?;

    let data = execute_ok(
        &schema,
        r#"{
            restaurants(limit: 20, ratingsMinimum: 4) {
                totalCount
                edges { node { id } }
            }
        }"#,
        None,
    )
    .await;

    let connection = &data["restaurants"];
    assert_eq!(connection["totalCount"], 10);
    for edge in connection["edges"].as_array().unwrap() {
        assert_eq!(edge["node"]["id"].as_i64().unwrap() % 2, 0);
    }

    // Nothing rates above 5.
    let data = execute_ok(
        &schema,
        r#"{ restaurants(ratingsMinimum: 5) { totalCount } }"#,
        None,
    )
    .await;
    assert_eq!(data["restaurants"]["totalCount"], 0);

    Ok(())
}

#[tokio::test]
async fn owners_only_see_their_own_restaurants() -> Result<()> {
    let schema = setup_schema().await?;
    let query = r#"{ restaurants(limit: 20) { totalCount } }"#;

    let data = execute_ok(&schema, query, Some(Actor::user(OWNER, Role::Owner))).await;
    assert_eq!(data["restaurants"]["totalCount"], 20);

    let data = execute_ok(&schema, query, Some(Actor::user(ALT_OWNER, Role::Owner))).await;
    assert_eq!(data["restaurants"]["totalCount"], 0);

    // Customers and anonymous readers browse everything.
    let data = execute_ok(&schema, query, Some(Actor::user(CUSTOMER, Role::User))).await;
    assert_eq!(data["restaurants"]["totalCount"], 20);
    let data = execute_ok(&schema, query, None).await;
    assert_eq!(data["restaurants"]["totalCount"], 20);

    Ok(())
}

#[tokio::test]
async fn restaurant_detail_aggregates_reviews() -> Result<()> {
    let schema = setup_schema().await?;

    let query = r#"{
        restaurant(id: 2) {
            title
            averageRating
            totalReviews
            canAddReview
            highestReview { rating }
            lowestReview { rating }
            owner { username }
        }
    }"#;

    let data = execute_ok(&schema, query, None).await;
    let restaurant = &data["restaurant"];
    assert_eq!(restaurant["title"], "Restaurant title 2");
    assert_eq!(restaurant["averageRating"], 5.0);
    assert_eq!(restaurant["totalReviews"], 1);
    assert_eq!(restaurant["highestReview"]["rating"], 5);
    assert_eq!(restaurant["lowestReview"]["rating"], 5);
    assert_eq!(restaurant["owner"]["username"], "demo-owner");
    // Anonymous callers can never review.
    assert_eq!(restaurant["canAddReview"], false);

    // The seeded reviewer already posted; a fresh customer has not.
    let data = execute_ok(&schema, query, Some(Actor::user(DINER, Role::User))).await;
    assert_eq!(data["restaurant"]["canAddReview"], false);
    let data = execute_ok(&schema, query, Some(Actor::user(CUSTOMER, Role::User))).await;
    assert_eq!(data["restaurant"]["canAddReview"], true);

    let data = execute_ok(&schema, r#"{ restaurant(id: 999) { id } }"#, None).await;
    assert_eq!(data["restaurant"], json!(null));

    Ok(())
}

#[tokio::test]
async fn one_review_per_customer_per_restaurant() -> Result<()> {
    let schema = setup_schema().await?;
    let mutation = r#"mutation {
        addReview(input: { restaurantId: 1, rating: 4, content: "Solid lunch" }) {
            id
            rating
            restaurantId
        }
    }"#;

    // The seeded diner already reviewed restaurant 1.
    let response = execute(&schema, mutation, Some(Actor::user(DINER, Role::User))).await;
    assert_eq!(error_code(&response), Some(&Value::from("CONFLICT")));
    assert_eq!(
        response.errors[0].message,
        "User has already added a review to this restaurant"
    );

    // A different customer still can.
    let data = execute_ok(&schema, mutation, Some(Actor::user(CUSTOMER, Role::User))).await;
    assert_eq!(data["addReview"]["rating"], 4);
    assert_eq!(data["addReview"]["restaurantId"], 1);

    // And only once.
    let response = execute(&schema, mutation, Some(Actor::user(CUSTOMER, Role::User))).await;
    assert_eq!(error_code(&response), Some(&Value::from("CONFLICT")));

    let data = execute_ok(
        &schema,
        r#"{ restaurant(id: 1) { totalReviews } }"#,
        None,
    )
    .await;
    assert_eq!(data["restaurant"]["totalReviews"], 2);

    Ok(())
}

#[tokio::test]
async fn review_rating_must_be_in_range() -> Result<()> {
    let schema = setup_schema().await?;

    let response = execute(
        &schema,
        r#"mutation {
            addReview(input: { restaurantId: 1, rating: 6, content: "off the scale" }) { id }
        }"#,
        Some(Actor::user(CUSTOMER, Role::User)),
    )
    .await;
    assert_eq!(error_code(&response), Some(&Value::from("VALIDATION_FAILED")));

    let response = execute(
        &schema,
        r#"mutation {
            addReview(input: { restaurantId: 999, rating: 3, content: "ghost kitchen" }) { id }
        }"#,
        Some(Actor::user(CUSTOMER, Role::User)),
    )
    .await;
    assert_eq!(error_code(&response), Some(&Value::from("NOT_FOUND")));

    Ok(())
}

#[tokio::test]
async fn restaurant_mutations_respect_roles() -> Result<()> {
    let schema = setup_schema().await?;
    let add = r#"mutation {
        addRestaurant(input: {
            title: "Nuevo Bodegón",
            description: "Home cooking",
            location: "Av. Córdoba 1147",
            imageUrl: "https://example.com/front.jpg"
        }) { id title userId }
    }"#;

    // Anonymous callers are rejected outright, customers lack the scope.
    let response = execute(&schema, add, None).await;
    assert_eq!(error_code(&response), Some(&Value::from("UNAUTHORIZED")));
    let response = execute(&schema, add, Some(Actor::user(CUSTOMER, Role::User))).await;
    assert_eq!(error_code(&response), Some(&Value::from("FORBIDDEN")));

    // Owners create rows attributed to themselves.
    let data = execute_ok(&schema, add, Some(Actor::user(ALT_OWNER, Role::Owner))).await;
    assert_eq!(data["addRestaurant"]["title"], "Nuevo Bodegón");
    assert_eq!(data["addRestaurant"]["userId"], i64::from(ALT_OWNER));

    Ok(())
}

#[tokio::test]
async fn delete_restaurant_honours_ownership_and_admin_override() -> Result<()> {
    let schema = setup_schema().await?;
    let delete = |id: i32| format!("mutation {{ deleteRestaurant(id: {}) {{ id }} }}", id);

    // Customers never delete, other owners do not either.
    let response = execute(&schema, &delete(1), Some(Actor::user(CUSTOMER, Role::User))).await;
    assert_eq!(error_code(&response), Some(&Value::from("FORBIDDEN")));
    let response = execute(&schema, &delete(1), Some(Actor::user(ALT_OWNER, Role::Owner))).await;
    assert_eq!(error_code(&response), Some(&Value::from("FORBIDDEN")));

    // The owner removes their own row, admin removes anyone's.
    let data = execute_ok(&schema, &delete(1), Some(Actor::user(OWNER, Role::Owner))).await;
    assert_eq!(data["deleteRestaurant"]["id"], 1);
    let data = execute_ok(&schema, &delete(2), Some(Actor::user(ADMIN, Role::Admin))).await;
    assert_eq!(data["deleteRestaurant"]["id"], 2);

    // Deleting a vanished row reports a conflict.
    let response = execute(&schema, &delete(1), Some(Actor::user(ADMIN, Role::Admin))).await;
    assert_eq!(error_code(&response), Some(&Value::from("CONFLICT")));
    assert_eq!(response.errors[0].message, "Restaurant is already deleted");

    Ok(())
}

#[tokio::test]
async fn total_count_tracks_deletions() -> Result<()> {
    let schema = setup_schema().await?;
    let query = r#"{ restaurants(limit: 2) { totalCount pageInfo { hasNextPage } } }"#;

    let data = execute_ok(&schema, query, None).await;
    assert_eq!(data["restaurants"]["totalCount"], 20);

    execute_ok(
        &schema,
        r#"mutation { deleteRestaurant(id: 20) { id } }"#,
        Some(Actor::user(ADMIN, Role::Admin)),
    )
    .await;

    let data = execute_ok(&schema, query, None).await;
    assert_eq!(data["restaurants"]["totalCount"], 19);
    assert_eq!(data["restaurants"]["pageInfo"]["hasNextPage"], true);

    Ok(())
}

#[tokio::test]
async fn edit_restaurant_updates_fields() -> Result<()> {
    let schema = setup_schema().await?;

    let data = execute_ok(
        &schema,
        r#"mutation {
            editRestaurant(input: {
                id: 3,
                title: "Renamed",
                description: "New description",
                location: "Moved",
                imageUrl: "https://example.com/new.jpg"
            }) { id title location }
        }"#,
        Some(Actor::user(OWNER, Role::Owner)),
    )
    .await;
    assert_eq!(data["editRestaurant"]["title"], "Renamed");
    assert_eq!(data["editRestaurant"]["location"], "Moved");

    let data = execute_ok(&schema, r#"{ restaurant(id: 3) { title } }"#, None).await;
    assert_eq!(data["restaurant"]["title"], "Renamed");

    Ok(())
}

#[tokio::test]
async fn one_comment_per_review_by_the_restaurant_owner() -> Result<()> {
    let schema = setup_schema().await?;
    let comment = |review_id: i32| {
        format!(
            r#"mutation {{
                addReviewComment(input: {{ reviewId: {}, comment: "Thanks for coming!" }}) {{
                    id
                    reviewId
                }}
            }}"#,
            review_id
        )
    };

    // Review 5 is unanswered and sits on the demo owner's restaurant.
    let data = execute_ok(&schema, &comment(5), Some(Actor::user(OWNER, Role::Owner))).await;
    assert_eq!(data["addReviewComment"]["reviewId"], 5);

    // Only one answer per review; review 1 was answered by the seed already.
    let response = execute(&schema, &comment(5), Some(Actor::user(OWNER, Role::Owner))).await;
    assert_eq!(error_code(&response), Some(&Value::from("CONFLICT")));
    assert_eq!(response.errors[0].message, "Review already has a comment");
    let response = execute(&schema, &comment(1), Some(Actor::user(OWNER, Role::Owner))).await;
    assert_eq!(error_code(&response), Some(&Value::from("CONFLICT")));

    // Other owners and customers cannot answer someone else's reviews.
    let response = execute(&schema, &comment(6), Some(Actor::user(ALT_OWNER, Role::Owner))).await;
    assert_eq!(error_code(&response), Some(&Value::from("FORBIDDEN")));
    let response = execute(&schema, &comment(6), Some(Actor::user(DINER, Role::User))).await;
    assert_eq!(error_code(&response), Some(&Value::from("FORBIDDEN")));

    // Admins hold no comment-creation scope either.
    let response = execute(&schema, &comment(6), Some(Actor::user(ADMIN, Role::Admin))).await;
    assert_eq!(error_code(&response), Some(&Value::from("FORBIDDEN")));

    Ok(())
}

#[tokio::test]
async fn unanswered_reviews_shrink_as_the_owner_replies() -> Result<()> {
    let schema = setup_schema().await?;
    let query = r#"{ getUnansweredReviewsForOwner { id } }"#;

    // Seeds answer reviews 1-4, leaving 16 of 20 open.
    let data = execute_ok(&schema, query, Some(Actor::user(OWNER, Role::Owner))).await;
    let open = data["getUnansweredReviewsForOwner"].as_array().unwrap();
    assert_eq!(open.len(), 16);
    assert!(open.iter().all(|r| r["id"].as_i64().unwrap() >= 5));

    execute_ok(
        &schema,
        r#"mutation {
            addReviewComment(input: { reviewId: 7, comment: "Glad you enjoyed it" }) { id }
        }"#,
        Some(Actor::user(OWNER, Role::Owner)),
    )
    .await;

    let data = execute_ok(&schema, query, Some(Actor::user(OWNER, Role::Owner))).await;
    let open = data["getUnansweredReviewsForOwner"].as_array().unwrap();
    assert_eq!(open.len(), 15);
    assert!(open.iter().all(|r| r["id"].as_i64().unwrap() != 7));

    // The other owner has no restaurants, so nothing is pending.
    let data = execute_ok(&schema, query, Some(Actor::user(ALT_OWNER, Role::Owner))).await;
    assert!(data["getUnansweredReviewsForOwner"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn deleting_a_review_twice_reports_a_conflict() -> Result<()> {
    let schema = setup_schema().await?;
    let delete = r#"mutation { deleteReview(id: 10) { id restaurantId } }"#;

    // The reviewer removes their own review; the count drops with it.
    let data = execute_ok(&schema, delete, Some(Actor::user(DINER, Role::User))).await;
    assert_eq!(data["deleteReview"]["id"], 10);
    assert_eq!(data["deleteReview"]["restaurantId"], 10);

    let response = execute(&schema, delete, Some(Actor::user(DINER, Role::User))).await;
    assert_eq!(error_code(&response), Some(&Value::from("CONFLICT")));
    assert_eq!(response.errors[0].message, "Review is already deleted");

    // Someone else's review stays out of reach, admin aside.
    let response = execute(
        &schema,
        r#"mutation { deleteReview(id: 11) { id } }"#,
        Some(Actor::user(CUSTOMER, Role::User)),
    )
    .await;
    assert_eq!(error_code(&response), Some(&Value::from("FORBIDDEN")));
    let data = execute_ok(
        &schema,
        r#"mutation { deleteReview(id: 11) { id } }"#,
        Some(Actor::user(ADMIN, Role::Admin)),
    )
    .await;
    assert_eq!(data["deleteReview"]["id"], 11);

    Ok(())
}

#[tokio::test]
async fn review_date_uses_the_short_format() -> Result<()> {
    let schema = setup_schema().await?;

    let data = execute_ok(&schema, r#"{ review(id: 1) { date } }"#, None).await;
    let date = data["review"]["date"].as_str().unwrap();
    // e.g. "08/29/26 14:03"
    assert_eq!(date.len(), 14);
    assert_eq!(&date[2..3], "/");
    assert_eq!(&date[5..6], "/");
    assert_eq!(&date[8..9], " ");

    Ok(())
}
