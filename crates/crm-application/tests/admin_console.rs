//! End-to-end flows through the real HTTP and file adapters against a mock backend.

use std::sync::Arc;

use crm_application::{
    AdminConsole, ChannelConfirmer, ChannelNotifier, GateDecision, Interaction, RemoveOutcome,
};
use crm_core::interaction::Notice;
use crm_core::resource::{FetchResolution, ResourceId, ResourceKind};
use crm_core::session::SessionStatus;
use crm_infrastructure::{ClientConfig, CrmPaths};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Env {
    server: MockServer,
    _dir: TempDir,
    paths: CrmPaths,
    config: ClientConfig,
}

impl Env {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let paths = CrmPaths::with_base(dir.path());
        let config = ClientConfig {
            api_base_url: server.uri(),
            request_timeout_ms: 2_000,
            session_file: None,
        };
        Self {
            server,
            _dir: dir,
            paths,
            config,
        }
    }

    /// A console whose confirmations are answered with `approve`.
    fn console(&self, approve: bool) -> (AdminConsole, UnboundedReceiver<Notice>) {
        let (confirmer, mut requests) = ChannelConfirmer::new();
        tokio::spawn(async move {
            while let Some(request) = requests.recv().await {
                request.respond(approve);
            }
        });
        let (notifier, notices) = ChannelNotifier::new();
        let interaction = Interaction::new(Arc::new(confirmer), Arc::new(notifier));
        let console = AdminConsole::from_config(&self.config, &self.paths, interaction).unwrap();
        (console, notices)
    }

    async fn accept_login(&self) {
        Mock::given(method("POST"))
            .and(path("/admin-users/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": "tok-1", "user": operator()})),
            )
            .mount(&self.server)
            .await;
    }
}

fn operator() -> serde_json::Value {
    json!({"id": 1, "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com", "owner": true})
}

fn drain(notices: &mut UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut drained = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        drained.push(notice);
    }
    drained
}

#[tokio::test]
async fn signed_out_operator_is_sent_to_login() {
    let env = Env::start().await;
    let (console, _notices) = env.console(true);

    assert_eq!(console.boot().await, SessionStatus::Anonymous);
    let mut gate = console.gate();
    assert_eq!(
        gate.settle("/dashboard/contacts").await,
        GateDecision::Redirect {
            to: "/login".into()
        }
    );
    assert_eq!(gate.evaluate("/login"), GateDecision::Render);
}

#[tokio::test]
async fn restart_keeps_the_same_operator() {
    let env = Env::start().await;
    env.accept_login().await;
    Mock::given(method("GET"))
        .and(path("/admin-users/"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operator()))
        .expect(1)
        .mount(&env.server)
        .await;

    let (first, _) = env.console(true);
    let user = first.session().login("ada@example.com", "pw").await.unwrap();
    assert_eq!(user.id.as_str(), "1");
    assert!(env.paths.session_file().exists());
    drop(first);

    let (restarted, _) = env.console(true);
    assert_eq!(restarted.boot().await, SessionStatus::Authenticated);
    assert_eq!(restarted.session().current_user().unwrap().id.as_str(), "1");
    assert_eq!(
        restarted.gate().settle("/dashboard/users").await,
        GateDecision::Render
    );
}

#[tokio::test]
async fn rejected_token_signs_out_once_across_screens() {
    let env = Env::start().await;
    env.accept_login().await;
    for collection in ["/contacts", "/organizations", "/admin-users"] {
        Mock::given(method("GET"))
            .and(path(collection))
            .respond_with(ResponseTemplate::new(401))
            .mount(&env.server)
            .await;
    }

    let (console, mut notices) = env.console(true);
    console.session().login("ada@example.com", "pw").await.unwrap();

    let contacts = console.contacts();
    let organizations = console.organizations();
    let users = console.users();
    let (c, o, u) = tokio::join!(contacts.refresh(), organizations.refresh(), users.refresh());
    assert_eq!(c, FetchResolution::Unauthorized);
    assert_eq!(o, FetchResolution::Unauthorized);
    assert_eq!(u, FetchResolution::Unauthorized);

    assert_eq!(console.session().status(), SessionStatus::Invalid);
    assert_eq!(drain(&mut notices), vec![Notice::SessionExpired]);
    assert!(!env.paths.session_file().exists());
    assert_eq!(
        console.gate().evaluate("/dashboard/organizations"),
        GateDecision::Redirect {
            to: "/login".into()
        }
    );
}

#[tokio::test]
async fn removal_refreshes_the_list() {
    let env = Env::start().await;
    env.accept_login().await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Acme", "city": "Austin"},
            {"id": 2, "name": "Globex", "city": "Springfield"}
        ])))
        .up_to_n_times(1)
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Acme", "city": "Austin"}
        ])))
        .mount(&env.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/organizations/2"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&env.server)
        .await;

    let (console, mut notices) = env.console(true);
    console.session().login("ada@example.com", "pw").await.unwrap();
    let organizations = console.organizations();
    assert_eq!(
        organizations.refresh().await,
        FetchResolution::Ready { count: 2 }
    );

    let outcome = organizations.remove(&ResourceId::from("2")).await.unwrap();
    assert_eq!(
        outcome,
        RemoveOutcome::Removed {
            resync: FetchResolution::Ready { count: 1 }
        }
    );
    assert_eq!(organizations.visible().len(), 1);
    assert_eq!(
        drain(&mut notices),
        vec![Notice::Removed {
            kind: ResourceKind::Organization,
            id: ResourceId::from("2"),
        }]
    );
}

#[tokio::test]
async fn declined_removal_never_reaches_the_backend() {
    let env = Env::start().await;
    env.accept_login().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&env.server)
        .await;

    let (console, mut notices) = env.console(false);
    console.session().login("ada@example.com", "pw").await.unwrap();

    let outcome = console
        .contacts()
        .remove(&ResourceId::from("9"))
        .await
        .unwrap();
    assert_eq!(outcome, RemoveOutcome::Cancelled);
    assert!(drain(&mut notices).is_empty());
}
