//! In-memory fakes of the core traits for unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

use crm_core::error::{AuthError, CrmError, FetchError, MutationError};
use crm_core::interaction::{ConfirmPrompt, Confirmer, Notice, Notifier};
use crm_core::resource::{Organization, Resource, ResourceId, ResourceRepository};
use crm_core::session::{
    AuthApi, AuthToken, LoginResponse, PersistedSession, ProfileDraft, SessionEscalation,
    TokenStore, UserIdentity,
};

pub(crate) fn identity(id: &str) -> UserIdentity {
    UserIdentity {
        id: ResourceId::from(id),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        is_owner: true,
    }
}

pub(crate) fn org(id: &str, name: &str, city: &str) -> Organization {
    Organization {
        id: ResourceId::from(id),
        name: name.into(),
        email: None,
        phone: String::new(),
        address: None,
        city: city.into(),
        state: None,
        country: None,
        postal_code: None,
    }
}

/// Scripted authentication backend with an optional response delay.
pub(crate) struct FakeAuthApi {
    pub login_result: Mutex<Result<LoginResponse, AuthError>>,
    pub profile_result: Mutex<Result<UserIdentity, AuthError>>,
    pub update_result: Mutex<Result<UserIdentity, MutationError>>,
    pub delay: Mutex<Duration>,
    pub login_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

impl FakeAuthApi {
    pub fn accepting(user_id: &str, token: &str) -> Self {
        Self {
            login_result: Mutex::new(Ok(LoginResponse {
                token: AuthToken::new(token),
                user: identity(user_id),
            })),
            profile_result: Mutex::new(Ok(identity(user_id))),
            update_result: Mutex::new(Ok(identity(user_id))),
            delay: Mutex::new(Duration::ZERO),
            login_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_login(&self, result: Result<LoginResponse, AuthError>) {
        *self.login_result.lock().unwrap() = result;
    }

    pub fn set_profile(&self, result: Result<UserIdentity, AuthError>) {
        *self.profile_result.lock().unwrap() = result;
    }

    pub fn set_update(&self, result: Result<UserIdentity, MutationError>) {
        *self.update_result.lock().unwrap() = result;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.login_result.lock().unwrap().clone()
    }

    async fn get_profile(&self, _token: &AuthToken) -> Result<UserIdentity, AuthError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.profile_result.lock().unwrap().clone()
    }

    async fn update_profile(
        &self,
        _token: &AuthToken,
        _draft: &ProfileDraft,
    ) -> Result<UserIdentity, MutationError> {
        self.pause().await;
        self.update_result.lock().unwrap().clone()
    }
}

/// Token store kept in memory; share the `Arc` between stores to simulate a restart.
#[derive(Default)]
pub(crate) struct MemoryTokenStore {
    pub record: Mutex<Option<PersistedSession>>,
    pub fail_saves: AtomicBool,
    pub fail_loads: AtomicBool,
    pub clears: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn holding(token: &str, user: Option<UserIdentity>) -> Self {
        let store = Self::default();
        *store.record.lock().unwrap() = Some(PersistedSession::new(AuthToken::new(token), user));
        store
    }

    pub fn current(&self) -> Option<PersistedSession> {
        self.record.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> crm_core::error::Result<Option<PersistedSession>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(CrmError::storage("unreadable session file"));
        }
        Ok(self.current())
    }

    async fn save(&self, session: &PersistedSession) -> crm_core::error::Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CrmError::storage("disk full"));
        }
        *self.record.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> crm_core::error::Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.record.lock().unwrap() = None;
        Ok(())
    }
}

/// Repository backed by a vector, with scriptable list responses and failures.
pub(crate) struct FakeRepository<T: Resource> {
    pub items: Mutex<Vec<T>>,
    pending_lists: Mutex<VecDeque<oneshot::Receiver<Result<Vec<T>, FetchError>>>>,
    pending_removes: Mutex<VecDeque<oneshot::Receiver<Result<(), MutationError>>>>,
    pub list_failure: Mutex<Option<FetchError>>,
    pub get_failure: Mutex<Option<FetchError>>,
    pub mutation_failure: Mutex<Option<MutationError>>,
    pub saved: Mutex<Option<T>>,
    pub list_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
}

impl<T: Resource> FakeRepository<T> {
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
            pending_lists: Mutex::new(VecDeque::new()),
            pending_removes: Mutex::new(VecDeque::new()),
            list_failure: Mutex::new(None),
            get_failure: Mutex::new(None),
            mutation_failure: Mutex::new(None),
            saved: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        }
    }

    /// The next `list_all` waits for the returned sender instead of reading `items`.
    pub fn hold_next_list(&self) -> oneshot::Sender<Result<Vec<T>, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.pending_lists.lock().unwrap().push_back(rx);
        tx
    }

    /// The next `remove` waits for the returned sender and answers with its value.
    pub fn hold_next_remove(&self) -> oneshot::Sender<Result<(), MutationError>> {
        let (tx, rx) = oneshot::channel();
        self.pending_removes.lock().unwrap().push_back(rx);
        tx
    }

    pub fn fail_lists_with(&self, err: FetchError) {
        *self.list_failure.lock().unwrap() = Some(err);
    }

    pub fn fail_mutations_with(&self, err: MutationError) {
        *self.mutation_failure.lock().unwrap() = Some(err);
    }

    /// Record returned by the next successful create/update.
    pub fn will_save(&self, record: T) {
        *self.saved.lock().unwrap() = Some(record);
    }

    pub fn ids(&self) -> Vec<String> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .map(|item| item.id().to_string())
            .collect()
    }

    fn take_saved(&self) -> Result<T, MutationError> {
        if let Some(err) = self.mutation_failure.lock().unwrap().clone() {
            return Err(err);
        }
        let record = self
            .saved
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| MutationError::malformed("nothing scripted"))?;
        let mut items = self.items.lock().unwrap();
        items.retain(|item| item.id() != record.id());
        items.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl<T: Resource> ResourceRepository<T> for FakeRepository<T> {
    async fn list_all(&self) -> Result<Vec<T>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let pending = self.pending_lists.lock().unwrap().pop_front();
        if let Some(rx) = pending {
            return rx
                .await
                .unwrap_or_else(|_| Err(FetchError::unreachable("dropped")));
        }
        if let Some(err) = self.list_failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: &ResourceId) -> Result<T, FetchError> {
        if let Some(err) = self.get_failure.lock().unwrap().clone() {
            return Err(err);
        }
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| FetchError::not_found(id.to_string()))
    }

    async fn create(&self, _draft: &T::Draft) -> Result<T, MutationError> {
        self.take_saved()
    }

    async fn update(&self, _id: &ResourceId, _draft: &T::Draft) -> Result<T, MutationError> {
        self.take_saved()
    }

    async fn remove(&self, id: &ResourceId) -> Result<(), MutationError> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        let pending = self.pending_removes.lock().unwrap().pop_front();
        if let Some(rx) = pending {
            return rx
                .await
                .unwrap_or_else(|_| Err(MutationError::unreachable("dropped")));
        }
        if let Some(err) = self.mutation_failure.lock().unwrap().clone() {
            return Err(err);
        }
        self.items.lock().unwrap().retain(|item| item.id() != id);
        Ok(())
    }
}

/// Escalation sink that reports `true` only for the first call.
#[derive(Default)]
pub(crate) struct CountingEscalation {
    pub calls: AtomicUsize,
}

#[async_trait]
impl SessionEscalation for CountingEscalation {
    async fn escalate_unauthorized(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst) == 0
    }
}

/// Confirmer with a fixed answer that records the prompts it saw.
pub(crate) struct FixedConfirmer {
    pub answer: bool,
    pub prompts: Mutex<Vec<ConfirmPrompt>>,
}

impl FixedConfirmer {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Confirmer for FixedConfirmer {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        self.prompts.lock().unwrap().push(prompt);
        self.answer
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn taken(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
