//! HTTP Handlers
//!
//! All handlers assume a guard already ran: [`CurrentUser`] is attached
//! by `require_session` (web surface) or `require_bearer` (API surface),
//! except the public catalog reads.

use axum::extract::{Extension, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use auth::domain::repository::UserRepository;
use auth::presentation::middleware::CurrentUser;
use kernel::id::{OrderId, ProductId};

use crate::application::config::ShopConfig;
use crate::application::{CartUseCase, CheckoutUseCase, InvoiceUseCase, ProductInput, ProductUseCase};
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::error::{ShopError, ShopResult};
use crate::presentation::dto::{
    CartRequest, CartResponse, OrderResponse, PageQuery, ProductListResponse, ProductRequest,
    ProductResponse,
};

/// Shared state for shop handlers
///
/// `repo` holds the catalog and orders; `users` is the auth store the
/// cart lives in.
#[derive(Clone)]
pub struct ShopAppState<R, A>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub users: Arc<A>,
    pub config: Arc<ShopConfig>,
}

fn parse_product_id(raw: &str) -> ShopResult<ProductId> {
    raw.parse()
        .map_err(|_| ShopError::Validation("Invalid product id".to_string()))
}

// ============================================================================
// Catalog (public)
// ============================================================================

/// GET /products?page=N
pub async fn list_products<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Query(query): Query<PageQuery>,
) -> ShopResult<Json<ProductListResponse>>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProductUseCase::new(state.repo.clone(), state.config.clone());
    let page = use_case.list(query.page).await?;

    Ok(Json(ProductListResponse::from(&page)))
}

/// GET /products/{id}
pub async fn get_product<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Path(id): Path<Uuid>,
) -> ShopResult<Json<ProductResponse>>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProductUseCase::new(state.repo.clone(), state.config.clone());
    let product = use_case.get(&ProductId::from_uuid(id)).await?;

    Ok(Json(ProductResponse::from(&product)))
}

// ============================================================================
// Product management (owner-scoped)
// ============================================================================

/// POST /admin/products
pub async fn create_product<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ProductRequest>,
) -> ShopResult<impl IntoResponse>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProductUseCase::new(state.repo.clone(), state.config.clone());

    let product = use_case
        .create(
            &user.user_id,
            ProductInput {
                title: req.title,
                price: req.price,
                description: req.description,
                image_url: req.image_url,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// PUT /admin/products/{id}
pub async fn update_product<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductRequest>,
) -> ShopResult<Json<ProductResponse>>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProductUseCase::new(state.repo.clone(), state.config.clone());

    let product = use_case
        .update(
            &user.user_id,
            &ProductId::from_uuid(id),
            ProductInput {
                title: req.title,
                price: req.price,
                description: req.description,
                image_url: req.image_url,
            },
        )
        .await?;

    Ok(Json(ProductResponse::from(&product)))
}

/// DELETE /admin/products/{id}
pub async fn delete_product<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ShopResult<StatusCode>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProductUseCase::new(state.repo.clone(), state.config.clone());
    use_case
        .delete(&user.user_id, &ProductId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Cart
// ============================================================================

/// GET /cart
pub async fn get_cart<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Extension(user): Extension<CurrentUser>,
) -> ShopResult<Json<CartResponse>>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = CartUseCase::new(state.users.clone(), state.repo.clone());
    let cart = use_case.get(&user.user_id).await?;

    Ok(Json(CartResponse::from(&cart)))
}

/// POST /cart
pub async fn add_to_cart<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CartRequest>,
) -> ShopResult<Json<CartResponse>>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let product_id = parse_product_id(&req.product_id)?;

    let use_case = CartUseCase::new(state.users.clone(), state.repo.clone());
    let cart = use_case.add(&user.user_id, &product_id).await?;

    Ok(Json(CartResponse::from(&cart)))
}

/// POST /cart/delete
pub async fn remove_from_cart<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CartRequest>,
) -> ShopResult<Json<CartResponse>>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let product_id = parse_product_id(&req.product_id)?;

    let use_case = CartUseCase::new(state.users.clone(), state.repo.clone());
    let cart = use_case.remove(&user.user_id, &product_id).await?;

    Ok(Json(CartResponse::from(&cart)))
}

// ============================================================================
// Checkout and Orders
// ============================================================================

/// POST /checkout
pub async fn checkout<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Extension(user): Extension<CurrentUser>,
) -> ShopResult<impl IntoResponse>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        CheckoutUseCase::new(state.users.clone(), state.repo.clone(), state.repo.clone());
    let order = use_case.execute(&user.user_id).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /orders
pub async fn list_orders<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Extension(user): Extension<CurrentUser>,
) -> ShopResult<Json<Vec<OrderResponse>>>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        CheckoutUseCase::new(state.users.clone(), state.repo.clone(), state.repo.clone());
    let orders = use_case.orders(&user.user_id).await?;

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /orders/{id}/invoice
pub async fn get_invoice<R, A>(
    State(state): State<ShopAppState<R, A>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ShopResult<impl IntoResponse>
where
    R: ProductRepository + OrderRepository + Clone + Send + Sync + 'static,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = InvoiceUseCase::new(state.repo.clone());
    let invoice = use_case
        .render(&OrderId::from_uuid(id), &user.user_id)
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", invoice.filename),
            ),
        ],
        invoice.bytes,
    ))
}
