use axum::Router;

use crate::state::AppState;

pub mod addresses;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod content;
pub mod coupons;
pub mod doc;
pub mod engagement;
pub mod forms;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod reviews;
pub mod shipping;
pub mod wishlist;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/categories", catalog::categories_router())
        .nest("/subcategories", catalog::sub_categories_router())
        .nest("/cart", cart::router())
        .nest("/wishlist", wishlist::router())
        .nest("/addresses", addresses::router())
        .nest("/orders", orders::router())
        .nest("/shipping", shipping::router())
        .nest("/coupons", coupons::router())
        .nest("/blogs", content::blogs_router())
        .nest("/faqs", content::faqs_router())
        .nest("/benefits", content::benefits_router())
        .nest("/videos", content::videos_router())
        .nest("/reviews", reviews::router())
        .nest("/contact", engagement::contact_router())
        .nest("/newsletter", engagement::newsletter_router())
        .nest("/admin", admin::router())
}
