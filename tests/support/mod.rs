//! Shared scaffolding for the behavioural tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use hubdeck::github::{ApiBase, IdentityGateway};
use hubdeck::{CredentialValidator, OctocrabGateway, SessionCoordinator};
use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Tokio runtime that can be stored in an `rstest-bdd` slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// A mock GitHub server with a session wired to it.
#[derive(Clone)]
pub struct Harness {
    pub runtime: SharedRuntime,
    pub server: Rc<MockServer>,
    pub gateway: Arc<OctocrabGateway>,
    pub session: Arc<SessionCoordinator>,
}

impl Harness {
    fn start() -> Self {
        let runtime = SharedRuntime::new(
            Runtime::new().unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}")),
        );
        let server = runtime.block_on(MockServer::start());
        let api_base = ApiBase::parse(&server.uri())
            .unwrap_or_else(|error| panic!("mock server URI should parse: {error}"));
        let gateway = Arc::new(OctocrabGateway::new(api_base));
        let identity: Arc<dyn IdentityGateway> = gateway.clone();
        let session = Arc::new(SessionCoordinator::new(CredentialValidator::new(identity)));

        Self {
            runtime,
            server: Rc::new(server),
            gateway,
            session,
        }
    }

    /// Mounts `mock` on the server.
    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }
}

/// Returns the scenario's harness, starting one on first use.
pub fn harness(slot: &Slot<Harness>) -> Harness {
    if let Some(existing) = slot.get() {
        return existing;
    }
    let started = Harness::start();
    slot.set(started.clone());
    started
}
