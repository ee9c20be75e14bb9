//! Per-service application state using dynamic dispatch

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::order::OrderRepository;
use crate::domain::product::ProductRepository;
use crate::domain::user::UserRepository;
use crate::domain::{DomainError, Order, Product, ProductChanges, ProductId, User};
use crate::infrastructure::auth::{JwtConfig, JwtService, TokenService};
use crate::infrastructure::order::{
    CreateOrderRequest, InMemoryOrderRepository, OrderService, PostgresOrderRepository,
};
use crate::infrastructure::product::{
    CreateProductRequest, InMemoryProductRepository, PostgresProductRepository, ProductService,
};
use crate::infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PasswordHasher, PostgresUserRepository, UserService,
};

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, DomainError>;
    async fn authenticate(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for order service operations
#[async_trait::async_trait]
pub trait OrderServiceTrait: Send + Sync {
    async fn create(&self, request: CreateOrderRequest) -> Result<Order, DomainError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for product service operations
#[async_trait::async_trait]
pub trait ProductServiceTrait: Send + Sync {
    async fn create(&self, request: CreateProductRequest) -> Result<Product, DomainError>;
    async fn list(&self) -> Result<Vec<Product>, DomainError>;
    async fn update(&self, id: &str, changes: ProductChanges) -> Result<Product, DomainError>;
    async fn delete(&self, id: &str) -> Result<ProductId, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<User, DomainError> {
        UserService::register(self, email, password).await
    }

    async fn authenticate(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R: OrderRepository + 'static> OrderServiceTrait for OrderService<R> {
    async fn create(&self, request: CreateOrderRequest) -> Result<Order, DomainError> {
        OrderService::create(self, request).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, DomainError> {
        OrderService::list_by_user(self, user_id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        OrderService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R: ProductRepository + 'static> ProductServiceTrait for ProductService<R> {
    async fn create(&self, request: CreateProductRequest) -> Result<Product, DomainError> {
        ProductService::create(self, request).await
    }

    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        ProductService::list(self).await
    }

    async fn update(&self, id: &str, changes: ProductChanges) -> Result<Product, DomainError> {
        ProductService::update(self, id, changes).await
    }

    async fn delete(&self, id: &str) -> Result<ProductId, DomainError> {
        ProductService::delete(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        ProductService::count(self).await
    }
}

/// State of the authentication service
#[derive(Clone)]
pub struct AuthState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub token_service: Arc<dyn TokenService>,
}

impl AuthState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>, token_service: Arc<dyn TokenService>) -> Self {
        Self {
            user_service,
            token_service,
        }
    }

    /// Auth state backed by an in-memory credential store
    pub fn in_memory(jwt_config: JwtConfig) -> Self {
        Self::with_repository(InMemoryUserRepository::new(), jwt_config)
    }

    /// Auth state backed by PostgreSQL
    pub fn postgres(pool: PgPool, jwt_config: JwtConfig) -> Self {
        Self::with_repository(PostgresUserRepository::new(pool), jwt_config)
    }

    fn with_repository<R: UserRepository + 'static>(repository: R, jwt_config: JwtConfig) -> Self {
        let user_service = UserService::new(Arc::new(repository), Arc::new(Argon2Hasher::new()));

        Self::new(Arc::new(user_service), Arc::new(JwtService::new(jwt_config)))
    }
}

/// State of the order service
#[derive(Clone)]
pub struct OrdersState {
    pub order_service: Arc<dyn OrderServiceTrait>,
}

impl OrdersState {
    pub fn new(order_service: Arc<dyn OrderServiceTrait>) -> Self {
        Self { order_service }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(OrderService::new(Arc::new(
            InMemoryOrderRepository::new(),
        ))))
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(OrderService::new(Arc::new(
            PostgresOrderRepository::new(pool),
        ))))
    }
}

/// State of the product service
#[derive(Clone)]
pub struct ProductsState {
    pub product_service: Arc<dyn ProductServiceTrait>,
}

impl ProductsState {
    pub fn new(product_service: Arc<dyn ProductServiceTrait>) -> Self {
        Self { product_service }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(ProductService::new(Arc::new(
            InMemoryProductRepository::new(),
        ))))
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(ProductService::new(Arc::new(
            PostgresProductRepository::new(pool),
        ))))
    }
}
