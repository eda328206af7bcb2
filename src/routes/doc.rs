use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        addresses::AddressList,
        auth::SessionResponse,
        cart::{CartItemDto, CartList},
        catalog::{CategoryList, SubCategoryList},
        content::{BenefitList, BlogList, FaqList, VideoList},
        coupons::{CouponList, CouponQuote},
        orders::{OrderList, OrderWithItems, PendingOrder},
        products::{ProductDetail, ProductList},
        reviews::ReviewList,
        shipping::ShippingList,
        wishlist::WishlistList,
    },
    models::{
        Address, Benefit, Blog, CartItem, Category, ContactMessage, Coupon, Faq,
        NewsletterSubscriber, Order, OrderItem, Product, Review, ShippingPrice, SubCategory,
        User, Video, WishlistItem,
    },
    response::{ApiResponse, Meta},
    routes::{
        addresses, admin, auth, cart, catalog, content, coupons, engagement, health, orders,
        products, reviews, shipping, wishlist,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::request_otp,
        auth::verify_otp,
        auth::forgot_password,
        auth::reset_password,
        auth::oauth_sign_in,
        products::list_products,
        products::get_product,
        products::related_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        catalog::list_categories,
        catalog::get_category,
        catalog::create_category,
        catalog::update_category,
        catalog::delete_category,
        catalog::list_sub_categories,
        catalog::create_sub_category,
        catalog::delete_sub_category,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
        addresses::list_addresses,
        addresses::create_address,
        addresses::delete_address,
        orders::list_orders,
        orders::checkout,
        orders::pending_order,
        orders::get_order,
        shipping::list_rules,
        shipping::create_rule,
        shipping::update_rule,
        shipping::delete_rule,
        coupons::list_coupons,
        coupons::create_coupon,
        coupons::validate_coupon,
        coupons::update_coupon,
        coupons::delete_coupon,
        content::list_blogs,
        content::get_blog,
        content::create_blog,
        content::update_blog,
        content::delete_blog,
        content::list_faqs,
        content::create_faq,
        content::update_faq,
        content::delete_faq,
        content::list_benefits,
        content::create_benefit,
        content::delete_benefit,
        content::list_videos,
        content::create_video,
        content::delete_video,
        reviews::list_reviews,
        reviews::create_review,
        reviews::delete_review,
        engagement::submit_contact,
        engagement::subscribe_newsletter,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::mark_order_paid,
    ),
    components(
        schemas(
            User,
            Address,
            Product,
            Category,
            SubCategory,
            CartItem,
            WishlistItem,
            Order,
            OrderItem,
            Coupon,
            ShippingPrice,
            Blog,
            Review,
            Faq,
            Benefit,
            Video,
            ContactMessage,
            NewsletterSubscriber,
            SessionResponse,
            ProductList,
            ProductDetail,
            CategoryList,
            SubCategoryList,
            CartList,
            CartItemDto,
            WishlistList,
            AddressList,
            OrderList,
            OrderWithItems,
            PendingOrder,
            ShippingList,
            CouponList,
            CouponQuote,
            ReviewList,
            BlogList,
            FaqList,
            BenefitList,
            VideoList,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<SessionResponse>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, credential/OTP login, password reset, OAuth provisioning"),
        (name = "Products", description = "Catalog browsing and admin product management"),
        (name = "Catalog", description = "Categories and sub-categories"),
        (name = "Cart", description = "Per-user cart"),
        (name = "Wishlist", description = "Per-user wishlist"),
        (name = "Addresses", description = "Shipping addresses"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Shipping", description = "Regional shipping price rules"),
        (name = "Coupons", description = "Discount codes"),
        (name = "Content", description = "Blogs, FAQs, benefits, videos"),
        (name = "Reviews", description = "Product reviews"),
        (name = "Engagement", description = "Contact form and newsletter"),
        (name = "Admin", description = "Back-office order management"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
