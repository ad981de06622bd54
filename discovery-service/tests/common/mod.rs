use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Role;
use chrono::Duration;
use chrono::Utc;
use discovery_service::contact::errors::NotifierError;
use discovery_service::contact::models::ContactMessage;
use discovery_service::contact::ports::ContactNotifier;
use discovery_service::contact::service::ContactService;
use discovery_service::discovery::service::DiscoveryService;
use discovery_service::inbound::http::router::create_router;
use discovery_service::inbound::http::router::AppState;
use discovery_service::outbound::repositories::InMemoryContactRepository;
use discovery_service::outbound::repositories::InMemoryDiscoveryRepository;
use discovery_service::outbound::repositories::InMemoryUserRepository;
use discovery_service::user::models::EmailAddress;
use discovery_service::user::models::User;
use discovery_service::user::models::UserId;
use discovery_service::user::models::Username;
use discovery_service::user::ports::UserRepository;
use discovery_service::user::service::UserService;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory adapters.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub user_repo: Arc<InMemoryUserRepository>,
    pub contact_repo: Arc<InMemoryContactRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Notifier that records which messages it was asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl ContactNotifier for RecordingNotifier {
    async fn notify(&self, message: &ContactMessage) -> Result<(), NotifierError> {
        self.sent.lock().unwrap().push(message.id.to_string());
        Ok(())
    }
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(
            Authenticator::new(TEST_SECRET, 2, Duration::hours(24))
                .expect("Failed to create authenticator"),
        );

        let user_repo = Arc::new(InMemoryUserRepository::new());
        let discovery_repo = Arc::new(InMemoryDiscoveryRepository::new());
        let contact_repo = Arc::new(InMemoryContactRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let state = AppState {
            user_service: Arc::new(UserService::new(
                Arc::clone(&user_repo),
                Arc::clone(&authenticator),
            )),
            discovery_service: Arc::new(DiscoveryService::new(
                discovery_repo,
                Arc::clone(&user_repo),
            )),
            contact_service: Arc::new(ContactService::new(
                Arc::clone(&contact_repo),
                Arc::clone(&notifier) as Arc<dyn ContactNotifier>,
            )),
            authenticator: Arc::clone(&authenticator),
        };

        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            user_repo,
            contact_repo,
            notifier,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user through the API; returns (token, user id).
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> (String, String) {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Seed an admin account directly in the store (registration never
    /// grants the admin role) and return a token for it.
    pub async fn seed_admin(&self, username: &str, email: &str, password: &str) -> String {
        let password_hash = self.authenticator.hash_password(password).unwrap();
        let user = User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            display_name: None,
            role: Role::Admin,
            is_active: true,
            created_at: Utc::now(),
        };

        let created = self
            .user_repo
            .create(user, password_hash)
            .await
            .expect("Failed to seed admin");

        self.authenticator
            .issue_token(&created.id.to_string(), created.role)
            .unwrap()
    }

    /// Create a discovery through the API; returns its id.
    pub async fn create_discovery(&self, token: &str, title: &str, status: &str) -> String {
        let response = self
            .post_authenticated("/api/discoveries", token)
            .json(&json!({
                "title": title,
                "content_md": "a faint shell of ionized gas",
                "status": status
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().unwrap().to_string()
    }
}
