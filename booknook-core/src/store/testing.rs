//! In-memory gateways for store tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::api::{
    Ack, AuthGateway, BookGateway, ClientError, Envelope, GatewayError, LoginResponse, Operation,
    RegisterResponse, TransportError, UserGateway,
};
use crate::models::{Book, BookPayload, BookUpdate, LoginPayload, RegisterPayload, User, UserUpdate};

/// How the next call should fail.
#[derive(Debug, Clone)]
pub enum Failure {
    /// No response at all.
    Network,
    /// Non-2xx with `{ "message": .. }`.
    Server(u16, &'static str),
    /// 2xx with a body of the wrong shape.
    Decode,
}

impl Failure {
    fn into_error(self, operation: Operation) -> GatewayError {
        let err = match self {
            Failure::Network => ClientError::from(TransportError::Network(
                "error sending request: connection refused".into(),
            )),
            Failure::Server(status, message) => ClientError::from(TransportError::Status {
                status,
                payload: Some(json!({ "message": message })),
            }),
            Failure::Decode => ClientError::Decode("invalid type: map, expected a sequence".into()),
        };
        GatewayError::new(operation, err)
    }
}

/// Counts concurrent calls so tests can check the single-flight guard.
#[derive(Debug, Default)]
pub struct FlightMeter {
    current: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl FlightMeter {
    async fn enter(&self, delay: Duration) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A tiny book server: ids are assigned sequentially after the seed data.
#[derive(Debug, Default)]
pub struct FakeBooks {
    pub server: Mutex<Vec<Book>>,
    next_id: AtomicUsize,
    failure: Mutex<Option<Failure>>,
    delay: Mutex<Duration>,
    pub meter: FlightMeter,
}

impl FakeBooks {
    pub fn with_books(books: Vec<Book>) -> Self {
        let fake = Self::default();
        fake.next_id.store(books.len() + 1, Ordering::SeqCst);
        *fake.server.lock() = books;
        fake
    }

    pub fn fail_next(&self, failure: Failure) {
        *self.failure.lock() = Some(failure);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    async fn call(&self, operation: Operation) -> Result<(), GatewayError> {
        let delay = *self.delay.lock();
        self.meter.enter(delay).await;
        self.meter.exit();
        match self.failure.lock().take() {
            Some(failure) => Err(failure.into_error(operation)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookGateway for FakeBooks {
    async fn list(&self) -> Result<Envelope<Vec<Book>>, GatewayError> {
        self.call(Operation::ListBooks).await?;
        Ok(Envelope::new(self.server.lock().clone()))
    }

    async fn create(&self, payload: &BookPayload) -> Result<Envelope<Book>, GatewayError> {
        self.call(Operation::CreateBook).await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).max(1);
        let book = Book {
            id: id.to_string(),
            title: payload.title.clone(),
            author: payload.author.clone(),
            description: payload.description.clone(),
            genre: payload.genre.clone(),
            published_year: Some(payload.published_year),
            created_by: None,
        };
        self.server.lock().insert(0, book.clone());
        Ok(Envelope::new(book).with_message("Book created"))
    }

    async fn update(&self, id: &str, payload: &BookUpdate) -> Result<Envelope<Book>, GatewayError> {
        self.call(Operation::UpdateBook).await?;
        let mut server = self.server.lock();
        let mut book = server
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .unwrap_or_else(|| Book::new(id, ""));
        if let Some(title) = &payload.title {
            book.title = title.clone();
        }
        if let Some(author) = &payload.author {
            book.author = author.clone();
        }
        if let Some(description) = &payload.description {
            book.description = description.clone();
        }
        if let Some(genre) = &payload.genre {
            book.genre = genre.clone();
        }
        if let Some(year) = payload.published_year {
            book.published_year = Some(year);
        }
        if let Some(slot) = server.iter_mut().find(|b| b.id == id) {
            *slot = book.clone();
        }
        Ok(Envelope::new(book))
    }

    async fn delete(&self, id: &str) -> Result<Ack, GatewayError> {
        self.call(Operation::DeleteBook).await?;
        let mut server = self.server.lock();
        match server.iter().position(|b| b.id == id) {
            Some(index) => {
                server.remove(index);
                Ok(Ack {
                    message: Some("Book deleted".into()),
                })
            }
            None => Err(Failure::Server(404, "Book not found").into_error(Operation::DeleteBook)),
        }
    }
}

/// User directory counterpart of [`FakeBooks`].
#[derive(Debug, Default)]
pub struct FakeUsers {
    pub server: Mutex<Vec<User>>,
    failure: Mutex<Option<Failure>>,
}

impl FakeUsers {
    pub fn with_users(users: Vec<User>) -> Self {
        let fake = Self::default();
        *fake.server.lock() = users;
        fake
    }

    pub fn fail_next(&self, failure: Failure) {
        *self.failure.lock() = Some(failure);
    }

    fn check(&self, operation: Operation) -> Result<(), GatewayError> {
        match self.failure.lock().take() {
            Some(failure) => Err(failure.into_error(operation)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserGateway for FakeUsers {
    async fn list(&self) -> Result<Envelope<Vec<User>>, GatewayError> {
        self.check(Operation::ListUsers)?;
        Ok(Envelope::new(self.server.lock().clone()))
    }

    async fn update(&self, id: &str, update: &UserUpdate) -> Result<Envelope<User>, GatewayError> {
        self.check(Operation::UpdateUser)?;
        let mut server = self.server.lock();
        let Some(user) = server.iter_mut().find(|u| u.id == id) else {
            return Err(Failure::Server(404, "User not found").into_error(Operation::UpdateUser));
        };
        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(bio) = &update.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(avatar) = &update.avatar {
            user.avatar_url = Some(format!("/uploads/{}", avatar.file_name));
        }
        Ok(Envelope::new(user.clone()).with_message("User updated"))
    }

    async fn delete(&self, id: &str) -> Result<Ack, GatewayError> {
        self.check(Operation::DeleteUser)?;
        self.server.lock().retain(|u| u.id != id);
        Ok(Ack::default())
    }
}

/// Accounts keyed by login name. Tokens are `token-<user id>`.
#[derive(Debug, Default)]
pub struct FakeAuth {
    accounts: Mutex<HashMap<String, (String, User)>>,
    /// When set, login responses omit the user object.
    login_without_user: bool,
    failure: Mutex<Option<Failure>>,
    me_failure: Mutex<Option<Failure>>,
    pub me_calls: AtomicUsize,
}

impl FakeAuth {
    pub fn with_account(name: &str, password_hash: &str, user: User) -> Self {
        let fake = Self::default();
        fake.accounts
            .lock()
            .insert(name.to_string(), (password_hash.to_string(), user));
        fake
    }

    pub fn login_without_user(mut self) -> Self {
        self.login_without_user = true;
        self
    }

    pub fn fail_next(&self, failure: Failure) {
        *self.failure.lock() = Some(failure);
    }

    /// Fails the next `me` call only, leaving register and login alone.
    pub fn fail_me(&self, failure: Failure) {
        *self.me_failure.lock() = Some(failure);
    }

    fn check(&self, operation: Operation) -> Result<(), GatewayError> {
        match self.failure.lock().take() {
            Some(failure) => Err(failure.into_error(operation)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthGateway for FakeAuth {
    async fn register(&self, payload: &RegisterPayload) -> Result<RegisterResponse, GatewayError> {
        self.check(Operation::Register)?;
        let mut accounts = self.accounts.lock();
        if accounts.contains_key(&payload.email) {
            return Err(Failure::Server(409, "Email already registered").into_error(Operation::Register));
        }
        let user = User::new(format!("u{}", accounts.len() + 1), payload.username.clone())
            .with_email(payload.email.clone());
        accounts.insert(
            payload.email.clone(),
            (payload.password_hash.clone(), user.clone()),
        );
        Ok(RegisterResponse {
            token: format!("token-{}", user.id),
            data: user,
            message: None,
        })
    }

    async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse, GatewayError> {
        self.check(Operation::Login)?;
        let accounts = self.accounts.lock();
        match accounts.get(&payload.name) {
            Some((hash, user)) if *hash == payload.password_hash => Ok(LoginResponse {
                token: format!("token-{}", user.id),
                message: Some("Login successful".into()),
                data: (!self.login_without_user).then(|| user.clone()),
            }),
            _ => Err(Failure::Server(401, "Invalid credentials").into_error(Operation::Login)),
        }
    }

    async fn me(&self) -> Result<User, GatewayError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.me_failure.lock().take() {
            return Err(failure.into_error(Operation::FetchMe));
        }
        self.check(Operation::FetchMe)?;
        self.accounts
            .lock()
            .values()
            .next()
            .map(|(_, user)| user.clone())
            .ok_or_else(|| Failure::Server(401, "Unauthorized").into_error(Operation::FetchMe))
    }
}
