//! Shop Routers
//!
//! Two surfaces over the same handlers:
//!
//! - **Web** ([`shop_router`]): session cookie + CSRF on every
//!   state-changing request.
//! - **API** ([`shop_api_router`]): bearer token only, no CSRF (no cookie
//!   means nothing for a cross-site form to ride on).
//!
//! Catalog reads are public on the web surface.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use auth::application::config::AuthConfig;
use auth::domain::repository::{SessionRepository, UserRepository};
use auth::infra::postgres::PgAuthRepository;
use auth::presentation::middleware::{
    AuthGuardState, require_bearer, require_csrf, require_session,
};

use crate::application::config::ShopConfig;
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::infra::postgres::PgShopRepository;
use crate::presentation::handlers::{self, ShopAppState};

/// Create the web (session + CSRF) shop router with PostgreSQL repositories
pub fn shop_router(
    repo: PgShopRepository,
    auth_repo: PgAuthRepository,
    shop_config: ShopConfig,
    auth_config: Arc<AuthConfig>,
) -> Router {
    shop_router_generic(repo, auth_repo, shop_config, auth_config)
}

/// Create the API (bearer token) shop router with PostgreSQL repositories
pub fn shop_api_router(
    repo: PgShopRepository,
    auth_repo: PgAuthRepository,
    shop_config: ShopConfig,
    auth_config: Arc<AuthConfig>,
) -> Router {
    shop_api_router_generic(repo, auth_repo, shop_config, auth_config)
}

/// Generic web shop router for any repository implementation
pub fn shop_router_generic<R, A>(
    repo: R,
    auth_repo: A,
    shop_config: ShopConfig,
    auth_config: Arc<AuthConfig>,
) -> Router
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let auth_repo = Arc::new(auth_repo);

    let state = ShopAppState {
        repo: Arc::new(repo),
        users: auth_repo.clone(),
        config: Arc::new(shop_config),
    };
    let guard = AuthGuardState {
        repo: auth_repo,
        config: auth_config,
    };

    let public = Router::new()
        .route("/products", get(handlers::list_products::<R, A>))
        .route("/products/{id}", get(handlers::get_product::<R, A>));

    // route_layer runs last-added first: the session guard resolves the
    // session before the CSRF guard compares tokens
    let protected = protected_routes::<R, A>()
        .route_layer(middleware::from_fn(require_csrf))
        .route_layer(middleware::from_fn_with_state(
            guard,
            require_session::<A>,
        ));

    public.merge(protected).with_state(state)
}

/// Generic API shop router for any repository implementation
pub fn shop_api_router_generic<R, A>(
    repo: R,
    auth_repo: A,
    shop_config: ShopConfig,
    auth_config: Arc<AuthConfig>,
) -> Router
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let auth_repo = Arc::new(auth_repo);

    let state = ShopAppState {
        repo: Arc::new(repo),
        users: auth_repo.clone(),
        config: Arc::new(shop_config),
    };
    let guard = AuthGuardState {
        repo: auth_repo,
        config: auth_config,
    };

    let public = Router::new()
        .route("/products", get(handlers::list_products::<R, A>))
        .route("/products/{id}", get(handlers::get_product::<R, A>));

    let protected = protected_routes::<R, A>().route_layer(middleware::from_fn_with_state(
        guard,
        require_bearer::<A>,
    ));

    public.merge(protected).with_state(state)
}

fn protected_routes<R, A>() -> Router<ShopAppState<R, A>>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/cart",
            get(handlers::get_cart::<R, A>).post(handlers::add_to_cart::<R, A>),
        )
        .route("/cart/delete", post(handlers::remove_from_cart::<R, A>))
        .route("/checkout", post(handlers::checkout::<R, A>))
        .route("/orders", get(handlers::list_orders::<R, A>))
        .route("/orders/{id}/invoice", get(handlers::get_invoice::<R, A>))
        .route("/admin/products", post(handlers::create_product::<R, A>))
        .route(
            "/admin/products/{id}",
            put(handlers::update_product::<R, A>)
                .delete(handlers::delete_product::<R, A>),
        )
}
