//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test in a binary. The
//! container starts and migrations run on the first test; later tests
//! reuse it with a fresh pool.

use anyhow::{Context, Result};
use axum::Router;
use rainbow_core::common::UserId;
use rainbow_core::domains::auth::JwtService;
use rainbow_core::kernel::{MockPushNotificationService, ModerationSettings, ServerDeps};
use rainbow_core::server::build_app;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_JWT_ISSUER: &str = "rainbow-test";

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test context: a fresh pool on the shared database plus a recording
/// push service.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let deps = ctx.deps();
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    pub push: MockPushNotificationService,
    pub jwt: Arc<JwtService>,
    pub settings: ModerationSettings,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            db_pool,
            push: MockPushNotificationService::new(),
            jwt: Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())),
            settings: ModerationSettings::default(),
        })
    }

    /// Server dependencies wired to the mock push service
    pub fn deps(&self) -> ServerDeps {
        self.deps_with(self.settings)
    }

    pub fn deps_with(&self, settings: ModerationSettings) -> ServerDeps {
        ServerDeps::new(
            self.db_pool.clone(),
            Arc::new(self.push.clone()),
            self.jwt.clone(),
            settings,
        )
    }

    /// The production router on top of [`TestHarness::deps`]
    pub fn app(&self) -> Router {
        build_app(self.deps(), &[])
    }

    pub fn token_for(&self, user_id: UserId, email: &str, is_admin: bool) -> String {
        self.jwt
            .create_token(user_id, email.to_string(), is_admin)
            .expect("Failed to create test token")
    }
}
