//! Shop integration tests
//!
//! Exercise the commerce workflow end to end against the in-memory
//! repositories, plus router-level guard tests.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use auth::application::config::AuthConfig;
use auth::domain::entity::{Session, User};
use auth::domain::repository::{SessionRepository, UserRepository};
use auth::domain::value_object::Email;
use auth::infra::memory::InMemoryAuthRepository;
use kernel::id::{OrderId, ProductId, UserId};
use platform::password::ClearTextPassword;

use crate::application::config::ShopConfig;
use crate::application::{CartUseCase, CheckoutUseCase, InvoiceUseCase, ProductInput, ProductUseCase};
use crate::domain::entity::Product;
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::error::ShopError;
use crate::infra::memory::InMemoryShopRepository;

struct TestEnv {
    users: Arc<InMemoryAuthRepository>,
    shop: Arc<InMemoryShopRepository>,
    config: Arc<ShopConfig>,
}

impl TestEnv {
    fn new() -> Self {
        let users = InMemoryAuthRepository::new();
        let shop = InMemoryShopRepository::new(users.clone());
        Self {
            users: Arc::new(users),
            shop: Arc::new(shop),
            config: Arc::new(ShopConfig::default()),
        }
    }

    async fn new_user(&self, email: &str) -> User {
        let hash = ClearTextPassword::new("correct horse battery".to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        let user = User::new(Email::new(email).unwrap(), hash);
        UserRepository::create(self.users.as_ref(), &user)
            .await
            .unwrap();
        user
    }

    async fn new_product(&self, owner: &UserId, title: &str, price: rust_decimal::Decimal) -> Product {
        let product = Product::new(*owner, title, price, "desc", "img").unwrap();
        ProductRepository::create(self.shop.as_ref(), &product)
            .await
            .unwrap();
        product
    }

    fn cart(&self) -> CartUseCase<InMemoryAuthRepository, InMemoryShopRepository> {
        CartUseCase::new(self.users.clone(), self.shop.clone())
    }

    fn checkout(
        &self,
    ) -> CheckoutUseCase<InMemoryAuthRepository, InMemoryShopRepository, InMemoryShopRepository>
    {
        CheckoutUseCase::new(self.users.clone(), self.shop.clone(), self.shop.clone())
    }

    fn products(&self) -> ProductUseCase<InMemoryShopRepository> {
        ProductUseCase::new(self.shop.clone(), self.config.clone())
    }

    fn invoices(&self) -> InvoiceUseCase<InMemoryShopRepository> {
        InvoiceUseCase::new(self.shop.clone())
    }
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_same_product_twice_increments_quantity() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;
    let product = env.new_product(&user.user_id, "Book", dec!(10.00)).await;

    env.cart().add(&user.user_id, &product.product_id).await.unwrap();
    let cart = env.cart().add(&user.user_id, &product.product_id).await.unwrap();

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.quantity_of(&product.product_id), Some(2));
}

#[tokio::test]
async fn test_add_unknown_product_rejected() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;

    let err = env
        .cart()
        .add(&user.user_id, &ProductId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::NotFound));
}

#[tokio::test]
async fn test_remove_drops_whole_entry() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;
    let book = env.new_product(&user.user_id, "Book", dec!(10.00)).await;
    let pen = env.new_product(&user.user_id, "Pen", dec!(2.50)).await;

    env.cart().add(&user.user_id, &book.product_id).await.unwrap();
    env.cart().add(&user.user_id, &book.product_id).await.unwrap();
    env.cart().add(&user.user_id, &pen.product_id).await.unwrap();

    let cart = env
        .cart()
        .remove(&user.user_id, &book.product_id)
        .await
        .unwrap();

    assert_eq!(cart.quantity_of(&book.product_id), None);
    assert_eq!(cart.quantity_of(&pen.product_id), Some(1));
}

#[tokio::test]
async fn test_stale_cart_write_is_rejected_by_the_store() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;
    let product = env.new_product(&user.user_id, "Book", dec!(10.00)).await;

    let cart = env.cart().add(&user.user_id, &product.product_id).await.unwrap();

    // A writer holding the pre-add version must lose
    let accepted = UserRepository::update_cart(
        env.users.as_ref(),
        &user.user_id,
        &cart.removed(&product.product_id),
        0,
    )
    .await
    .unwrap();
    assert!(!accepted);

    // And the cart is unchanged
    let current = env.cart().get(&user.user_id).await.unwrap();
    assert_eq!(current.quantity_of(&product.product_id), Some(1));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_snapshots_totals_and_clears_cart() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;
    let book = env.new_product(&user.user_id, "Book", dec!(10.00)).await;
    let pen = env.new_product(&user.user_id, "Pen", dec!(2.50)).await;

    env.cart().add(&user.user_id, &book.product_id).await.unwrap();
    env.cart().add(&user.user_id, &book.product_id).await.unwrap();
    env.cart().add(&user.user_id, &pen.product_id).await.unwrap();
    env.cart().add(&user.user_id, &pen.product_id).await.unwrap();

    let order = env.checkout().execute(&user.user_id).await.unwrap();

    assert_eq!(order.total(), dec!(25.00));
    assert_eq!(order.purchaser.email.as_str(), "buyer@example.com");
    assert_eq!(order.lines.len(), 2);

    // Cart cleared in the same commit
    let cart = env.cart().get(&user.user_id).await.unwrap();
    assert!(cart.is_empty());

    // And the order is in the history
    let history = env.checkout().orders(&user.user_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].order_id, order.order_id);
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;

    let err = env.checkout().execute(&user.user_id).await.unwrap_err();
    assert!(matches!(err, ShopError::EmptyCart));
}

#[tokio::test]
async fn test_checkout_skips_deleted_products() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;
    let book = env.new_product(&user.user_id, "Book", dec!(10.00)).await;
    let gone = env.new_product(&user.user_id, "Vanishing", dec!(99.00)).await;

    env.cart().add(&user.user_id, &book.product_id).await.unwrap();
    env.cart().add(&user.user_id, &gone.product_id).await.unwrap();

    ProductRepository::delete(env.shop.as_ref(), &gone.product_id)
        .await
        .unwrap();

    let order = env.checkout().execute(&user.user_id).await.unwrap();
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.total(), dec!(10.00));
}

#[tokio::test]
async fn test_checkout_with_only_dead_references_is_empty() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;
    let gone = env.new_product(&user.user_id, "Vanishing", dec!(99.00)).await;

    env.cart().add(&user.user_id, &gone.product_id).await.unwrap();
    ProductRepository::delete(env.shop.as_ref(), &gone.product_id)
        .await
        .unwrap();

    let err = env.checkout().execute(&user.user_id).await.unwrap_err();
    assert!(matches!(err, ShopError::EmptyCart));
}

#[tokio::test]
async fn test_stale_checkout_writes_nothing() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;
    let book = env.new_product(&user.user_id, "Book", dec!(10.00)).await;

    let cart = env.cart().add(&user.user_id, &book.product_id).await.unwrap();

    let order = crate::domain::entity::Order::new(
        crate::domain::entity::Purchaser {
            user_id: user.user_id,
            email: user.email.clone(),
        },
        vec![crate::domain::entity::OrderLine::snapshot(&book, 1)],
    );

    // Stale version: the commit must refuse and leave no trace
    let committed = OrderRepository::create_with_cart_clear(env.shop.as_ref(), &order, 99)
        .await
        .unwrap();
    assert!(!committed);

    let current = env.cart().get(&user.user_id).await.unwrap();
    assert_eq!(current, cart);

    let stored = OrderRepository::find_by_id(env.shop.as_ref(), &order.order_id)
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn test_deleting_a_product_leaves_past_orders_alone() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;
    let book = env.new_product(&user.user_id, "Book", dec!(10.00)).await;

    env.cart().add(&user.user_id, &book.product_id).await.unwrap();
    let order = env.checkout().execute(&user.user_id).await.unwrap();

    env.products()
        .delete(&user.user_id, &book.product_id)
        .await
        .unwrap();

    let stored = OrderRepository::find_by_id(env.shop.as_ref(), &order.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total(), dec!(10.00));
    assert_eq!(stored.lines[0].title, "Book");
}

// ============================================================================
// Invoices
// ============================================================================

#[tokio::test]
async fn test_invoice_renders_a_pdf_for_the_purchaser() {
    let env = TestEnv::new();
    let user = env.new_user("buyer@example.com").await;
    let book = env.new_product(&user.user_id, "Book", dec!(10.00)).await;

    env.cart().add(&user.user_id, &book.product_id).await.unwrap();
    let order = env.checkout().execute(&user.user_id).await.unwrap();

    let invoice = env
        .invoices()
        .render(&order.order_id, &user.user_id)
        .await
        .unwrap();

    assert_eq!(invoice.filename, format!("invoice-{}.pdf", order.order_id));
    assert!(invoice.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_invoice_is_purchaser_only() {
    let env = TestEnv::new();
    let buyer = env.new_user("buyer@example.com").await;
    let other = env.new_user("other@example.com").await;
    let book = env.new_product(&buyer.user_id, "Book", dec!(10.00)).await;

    env.cart().add(&buyer.user_id, &book.product_id).await.unwrap();
    let order = env.checkout().execute(&buyer.user_id).await.unwrap();

    let err = env
        .invoices()
        .render(&order.order_id, &other.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::Forbidden));

    let err = env
        .invoices()
        .render(&OrderId::new(), &buyer.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::NotFound));
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_pagination_metadata() {
    let env = TestEnv::new();
    let owner = env.new_user("seller@example.com").await;

    let config = Arc::new(ShopConfig { items_per_page: 2 });
    let use_case = ProductUseCase::new(env.shop.clone(), config);

    for i in 0..3 {
        env.new_product(&owner.user_id, &format!("Product {}", i), dec!(5.00))
            .await;
    }

    let first = use_case.list(1).await.unwrap();
    assert_eq!(first.products.len(), 2);
    assert_eq!(first.last_page, 2);
    assert!(first.has_next_page);
    assert!(!first.has_previous_page);

    let second = use_case.list(2).await.unwrap();
    assert_eq!(second.products.len(), 1);
    assert!(!second.has_next_page);
    assert!(second.has_previous_page);

    // Page 0 is clamped to 1
    let clamped = use_case.list(0).await.unwrap();
    assert_eq!(clamped.current_page, 1);
}

#[tokio::test]
async fn test_product_management_is_owner_scoped() {
    let env = TestEnv::new();
    let owner = env.new_user("seller@example.com").await;
    let intruder = env.new_user("intruder@example.com").await;

    let product = env
        .products()
        .create(
            &owner.user_id,
            ProductInput {
                title: "Book".to_string(),
                price: dec!(10.00),
                description: "desc".to_string(),
                image_url: "img".to_string(),
            },
        )
        .await
        .unwrap();

    let err = env
        .products()
        .delete(&intruder.user_id, &product.product_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::Forbidden));

    let err = env
        .products()
        .update(
            &intruder.user_id,
            &product.product_id,
            ProductInput {
                title: "Hijacked".to_string(),
                price: dec!(0.01),
                description: String::new(),
                image_url: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::Forbidden));

    // The owner still can
    env.products()
        .delete(&owner.user_id, &product.product_id)
        .await
        .unwrap();
}

// ============================================================================
// Router guards
// ============================================================================

mod router {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::presentation::router::{shop_api_router_generic, shop_router_generic};

    struct WebEnv {
        env: TestEnv,
        app: axum::Router,
        auth_config: Arc<AuthConfig>,
    }

    fn web_env() -> WebEnv {
        let env = TestEnv::new();
        let auth_config = Arc::new(AuthConfig::development());
        let app = shop_router_generic(
            env.shop.as_ref().clone(),
            env.users.as_ref().clone(),
            ShopConfig::default(),
            auth_config.clone(),
        );
        WebEnv {
            env,
            app,
            auth_config,
        }
    }

    /// Create a live session and return (cookie header value, csrf token)
    async fn log_in(env: &WebEnv, user: &User) -> (String, String) {
        let session = Session::new(user.user_id, Duration::from_secs(3600));
        SessionRepository::create(env.env.users.as_ref(), &session)
            .await
            .unwrap();

        let token = platform::token::sign_opaque(
            &env.auth_config.token_secret,
            &session.session_id.to_string(),
        );

        (
            format!("{}={}", env.auth_config.cookie.name, token),
            session.csrf_token,
        )
    }

    #[tokio::test]
    async fn test_catalog_is_public() {
        let env = web_env();

        let response = env
            .app
            .oneshot(
                Request::builder()
                    .uri("/products")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cart_requires_a_session() {
        let env = web_env();

        let response = env
            .app
            .oneshot(
                Request::builder()
                    .uri("/cart")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_state_change_without_csrf_token_has_no_effect() {
        let env = web_env();
        let user = env.env.new_user("buyer@example.com").await;
        let product = env.env.new_product(&user.user_id, "Book", dec!(10.00)).await;
        let (cookie, _csrf) = log_in(&env, &user).await;

        let response = env
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cart")
                    .header(header::COOKIE, &cookie)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "productId": product.product_id.to_string() })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // No side effects
        let cart = env.env.cart().get(&user.user_id).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_csrf_token_accepted_from_header() {
        let env = web_env();
        let user = env.env.new_user("buyer@example.com").await;
        let product = env.env.new_product(&user.user_id, "Book", dec!(10.00)).await;
        let (cookie, csrf) = log_in(&env, &user).await;

        let response = env
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cart")
                    .header(header::COOKIE, &cookie)
                    .header("x-csrf-token", &csrf)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "productId": product.product_id.to_string() })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let cart = env.env.cart().get(&user.user_id).await.unwrap();
        assert_eq!(cart.quantity_of(&product.product_id), Some(1));
    }

    #[tokio::test]
    async fn test_csrf_token_accepted_from_json_body() {
        let env = web_env();
        let user = env.env.new_user("buyer@example.com").await;
        let product = env.env.new_product(&user.user_id, "Book", dec!(10.00)).await;
        let (cookie, csrf) = log_in(&env, &user).await;

        let response = env
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cart")
                    .header(header::COOKIE, &cookie)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "productId": product.product_id.to_string(),
                            "csrfToken": csrf,
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_csrf_token_rejected() {
        let env = web_env();
        let user = env.env.new_user("buyer@example.com").await;
        let product = env.env.new_product(&user.user_id, "Book", dec!(10.00)).await;
        let (cookie, _csrf) = log_in(&env, &user).await;

        let response = env
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cart")
                    .header(header::COOKIE, &cookie)
                    .header("x-csrf-token", "not-the-right-token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "productId": product.product_id.to_string() })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_bearer_surface_skips_csrf() {
        let env = TestEnv::new();
        let auth_config = Arc::new(AuthConfig::development());
        let app = shop_api_router_generic(
            env.shop.as_ref().clone(),
            env.users.as_ref().clone(),
            ShopConfig::default(),
            auth_config.clone(),
        );

        let user = env.new_user("buyer@example.com").await;
        let product = env.new_product(&user.user_id, "Book", dec!(10.00)).await;

        let expires = chrono::Utc::now().timestamp_millis() + 60_000;
        let bearer = platform::token::sign_expiring(
            &auth_config.token_secret,
            &user.user_id.to_string(),
            expires,
        );

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cart")
                    .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "productId": product.product_id.to_string() })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        // Missing token still fails
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cart")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
