pub mod addresses;
pub mod audit_logs;
pub mod benefits;
pub mod blogs;
pub mod cart_items;
pub mod categories;
pub mod contact_messages;
pub mod coupons;
pub mod faqs;
pub mod newsletter_subscribers;
pub mod order_items;
pub mod orders;
pub mod product_categories;
pub mod products;
pub mod reviews;
pub mod shipping_prices;
pub mod sub_categories;
pub mod users;
pub mod videos;
pub mod wishlist_items;

pub use addresses::Entity as Addresses;
pub use audit_logs::Entity as AuditLogs;
pub use benefits::Entity as Benefits;
pub use blogs::Entity as Blogs;
pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use contact_messages::Entity as ContactMessages;
pub use coupons::Entity as Coupons;
pub use faqs::Entity as Faqs;
pub use newsletter_subscribers::Entity as NewsletterSubscribers;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_categories::Entity as ProductCategories;
pub use products::Entity as Products;
pub use reviews::Entity as Reviews;
pub use shipping_prices::Entity as ShippingPrices;
pub use sub_categories::Entity as SubCategories;
pub use users::Entity as Users;
pub use videos::Entity as Videos;
pub use wishlist_items::Entity as WishlistItems;
