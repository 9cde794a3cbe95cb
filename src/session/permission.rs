//! Location permission gate in front of session creation

use crate::anchors::SceneGraph;
use crate::api::SharedTracker;
use crate::session::{SessionError, SessionStart};
use tracing::{debug, info};

/// Device location authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedAlways,
    AuthorizedWhenInUse,
}

/// Precision granted together with the authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyAuthorization {
    Full,
    Reduced,
}

/// Permission subsystem as seen by the gate
pub trait LocationAuthorizer {
    fn authorization_status(&self) -> AuthorizationStatus;

    fn accuracy_authorization(&self) -> AccuracyAuthorization;

    /// Ask the user; the answer arrives later as another authorization change
    fn request_when_in_use_authorization(&mut self);
}

/// What the gate did for one authorization change
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    AuthorizationRequested,
    Denied,
    ReducedAccuracy,
    SessionStarted(SessionStart),
    SessionAlreadyExists,
    SessionCreationFailed(SessionError),
}

/// Starts the geospatial session once full-accuracy location is granted
pub struct PermissionGate<A: LocationAuthorizer> {
    authorizer: A,
}

impl<A: LocationAuthorizer> PermissionGate<A> {
    pub fn new(authorizer: A) -> Self {
        Self { authorizer }
    }

    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    pub fn authorizer_mut(&mut self) -> &mut A {
        &mut self.authorizer
    }

    /// Re-check authorization; called on every authorization change
    pub fn on_authorization_changed<S: SceneGraph>(&mut self, tracker: &SharedTracker<S>) -> GateDecision {
        match self.authorizer.authorization_status() {
            AuthorizationStatus::NotDetermined => {
                debug!("requesting when-in-use location authorization");
                self.authorizer.request_when_in_use_authorization();
                GateDecision::AuthorizationRequested
            }
            AuthorizationStatus::Restricted | AuthorizationStatus::Denied => {
                info!("location authorization denied; geospatial session will not start");
                GateDecision::Denied
            }
            AuthorizationStatus::AuthorizedAlways | AuthorizationStatus::AuthorizedWhenInUse => {
                if self.authorizer.accuracy_authorization() != AccuracyAuthorization::Full {
                    debug!("reduced location accuracy; waiting for full accuracy");
                    return GateDecision::ReducedAccuracy;
                }
                tracker.ensure_session()
            }
        }
    }
}

/// Authorizer with a settable answer, for tests and the demo binary
#[derive(Debug, Clone)]
pub struct MockLocationAuthorizer {
    pub status: AuthorizationStatus,
    pub accuracy: AccuracyAuthorization,
    pub requests: u32,
}

impl MockLocationAuthorizer {
    pub fn new(status: AuthorizationStatus, accuracy: AccuracyAuthorization) -> Self {
        Self { status, accuracy, requests: 0 }
    }

    pub fn undetermined() -> Self {
        Self::new(AuthorizationStatus::NotDetermined, AccuracyAuthorization::Full)
    }

    pub fn grant(&mut self, status: AuthorizationStatus, accuracy: AccuracyAuthorization) {
        self.status = status;
        self.accuracy = accuracy;
    }
}

impl LocationAuthorizer for MockLocationAuthorizer {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    fn accuracy_authorization(&self) -> AccuracyAuthorization {
        self.accuracy
    }

    fn request_when_in_use_authorization(&mut self) {
        self.requests += 1;
    }
}
