//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ContentService;
use blog_core::domain::User;
use blog_core::ports::{
    Clock, CommentRepository, Notifier, PasswordService, PostRepository, SystemClock,
    TokenService, UserRepository,
};
use blog_infra::{
    Argon2PasswordService, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtTokenService, LocalMediaStore, LogNotifier,
};

#[cfg(feature = "postgres")]
use blog_infra::{
    DatabaseConfig, DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

use crate::config::{AdminSeed, AppConfig};
use crate::render::Renderer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentService,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub clock: Arc<dyn Clock>,
    pub media: Arc<LocalMediaStore>,
    pub renderer: Renderer,
}

struct Stores {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &DatabaseConfig) -> anyhow::Result<Self> {
        use migration::{Migrator, MigratorTrait};

        let connections = DatabaseConnections::init(config).await?;
        Migrator::up(&connections.main, None).await?;
        tracing::info!("Database migrations applied");

        let db = connections.main;
        Ok(Self {
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            users: Arc::new(PostgresUserRepository::new(db)),
        })
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        #[cfg(feature = "postgres")]
        let stores = match &config.database {
            Some(db_config) => match Stores::postgres(db_config).await {
                Ok(stores) => stores,
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Stores::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Stores::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let stores = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Stores::in_memory()
        };

        let renderer = Renderer::from_dir(&config.template_dir)?;
        let notifier = Self::notifier(config)?;

        let state = Self::assemble(
            stores,
            notifier,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(SystemClock),
            LocalMediaStore::new(config.media_root.clone()),
            renderer,
        );

        if let Some(seed) = &config.admin {
            state.seed_admin(seed).await?;
        }

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// In-memory state with the given collaborators.
    pub fn in_memory(
        notifier: Arc<dyn Notifier>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
        media: LocalMediaStore,
        renderer: Renderer,
    ) -> Self {
        Self::assemble(Stores::in_memory(), notifier, tokens, clock, media, renderer)
    }

    fn assemble(
        stores: Stores,
        notifier: Arc<dyn Notifier>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
        media: LocalMediaStore,
        renderer: Renderer,
    ) -> Self {
        let media = Arc::new(media);
        let content = ContentService::new(stores.posts, stores.comments, media.clone(), notifier);

        Self {
            content,
            users: stores.users,
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
            clock,
            media,
            renderer,
        }
    }

    #[cfg(feature = "smtp")]
    fn notifier(config: &AppConfig) -> anyhow::Result<Arc<dyn Notifier>> {
        match &config.smtp {
            Some(smtp) => Ok(Arc::new(blog_infra::SmtpNotifier::new(smtp)?)),
            None => {
                tracing::warn!("SMTP_HOST not set. Comment notifications will only be logged.");
                Ok(Arc::new(LogNotifier::new(&config.notify_from, &config.notify_to)))
            }
        }
    }

    #[cfg(not(feature = "smtp"))]
    fn notifier(config: &AppConfig) -> anyhow::Result<Arc<dyn Notifier>> {
        Ok(Arc::new(LogNotifier::new(&config.notify_from, &config.notify_to)))
    }

    /// Create the configured account unless the username is taken.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> anyhow::Result<()> {
        if self.users.find_by_username(&seed.username).await?.is_some() {
            tracing::debug!(username = %seed.username, "Seed account already exists");
            return Ok(());
        }

        let hash = self.passwords.hash(&seed.password)?;
        let user = self.users.save(User::new(seed.username.clone(), hash)).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Seed account created");
        Ok(())
    }
}
