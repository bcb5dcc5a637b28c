use anyhow::Result;
use sea_orm::*;
use tracing::info;

use crate::database::entities::{restaurants, review_comments, reviews, users};

const DEMO_IMAGE_URL: &str =
    "https://img.pystatic.com/profile-headers/chabuca-granda-header.jpg";

const REVIEW_SHORT: &str = "I got a burger and an order of empanadas from this place via \
delivery. The delivery was spot-on. FAST! Food arrived quite hot, and early. However the \
food also left much to be desired. The fries were soggy and the pattie was like leather. \
Not about to try again!";

const REVIEW_LONG: &str = "Excelente lugar para tomar un trago con tu grupo de amigos o \
con tu pareja si no te gusta lo excesivamente romántico. El lugar es cálido, bien atendido \
y cómodo. Vale la pena sobre todo la parte de sandwiches, muy variados y a buen precio. \
Tiene posibilidades de convertirse en mi bar de cabecera!";

/// Populate a demo dataset: one user per role (plus an alternate owner),
/// twenty restaurants owned by the demo owner, one review each and a thank-you
/// comment on the first few reviews. Skipped when demo data already exists.
pub async fn create_demo_data(db: &DatabaseConnection) -> Result<()> {
    let existing_user = users::Entity::find()
        .filter(users::Column::Username.eq("demo-owner"))
        .one(db)
        .await?;

    if existing_user.is_some() {
        info!("Demo data already exists, skipping seed");
        return Ok(());
    }

    info!("Seeding demo users, restaurants and reviews");

    let seeded_users = [
        ("demo-diner", "Dana Diner", "user"),
        ("demo-customer", "Casey Customer", "user"),
        ("demo-owner", "Olive Owner", "owner"),
        ("demo-alternate-owner", "Oscar Owner", "owner"),
        ("demo-admin", "Ada Admin", "admin"),
    ];

    let mut user_ids = Vec::new();
    for (username, display_name, role) in seeded_users {
        let user = users::ActiveModel {
            username: Set(username.to_string()),
            display_name: Set(display_name.to_string()),
            role: Set(role.to_string()),
            ..users::ActiveModel::new()
        };
        let user = user.insert(db).await?;
        user_ids.push(user.id);
    }

    // Restaurants belong to the demo owner; reviews come from the first diner.
    let owner_id = user_ids[2];
    let reviewer_id = user_ids[0];

    for ii in 1..=20 {
        let restaurant = restaurants::ActiveModel {
            title: Set(format!("Restaurant title {}", ii)),
            description: Set(format!("Restaurant description {}", ii)),
            location: Set("Av. Córdoba 1147".to_string()),
            image_url: Set(DEMO_IMAGE_URL.to_string()),
            user_id: Set(owner_id),
            ..restaurants::ActiveModel::new()
        };
        let restaurant = restaurant.insert(db).await?;

        let review = reviews::ActiveModel {
            restaurant_id: Set(restaurant.id),
            user_id: Set(reviewer_id),
            rating: Set(if ii % 2 == 0 { 5 } else { 1 }),
            content: Set(if ii % 2 == 0 {
                REVIEW_SHORT.to_string()
            } else {
                REVIEW_LONG.to_string()
            }),
            ..reviews::ActiveModel::new()
        };
        let review = review.insert(db).await?;

        // Leave most reviews unanswered for testing.
        if review.id < 5 {
            let comment = review_comments::ActiveModel {
                review_id: Set(review.id),
                comment: Set("Thanks for coming!".to_string()),
                ..review_comments::ActiveModel::new()
            };
            comment.insert(db).await?;
        }
    }

    info!("Demo data seeded");
    Ok(())
}
