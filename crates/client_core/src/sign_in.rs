//! Sign-in form state machine.
//!
//! [`reduce`] is the pure transition function. [`SignInMachine`] drives it as a
//! single actor: events are applied one at a time in dispatch order, the
//! remote call runs on its own task, and its result re-enters the actor's
//! queue as a completion so the reducer never waits on the network.

use std::sync::Arc;

use shared::{error::RemoteError, protocol::UserProfile};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info};

use crate::{
    auth_gateway::AuthGateway,
    error_classifier::{self, FieldScope},
};

const STATE_BROADCAST_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    Success(UserProfile),
    Failure(RemoteError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInEvent {
    EmailChanged(String),
    PasswordChanged(String),
    SubmitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInPhase {
    Idle,
    Submitting,
    SettledSuccess,
    SettledFailure(FieldScope),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInState {
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_submitting: bool,
    pub password_error: Option<String>,
    pub email_error: Option<String>,
    pub outcome: Option<SignInOutcome>,
}

impl SignInState {
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SignInPhase {
        if self.is_submitting {
            return SignInPhase::Submitting;
        }
        match (&self.outcome, &self.email_error, &self.password_error) {
            (Some(SignInOutcome::Success(_)), _, _) => SignInPhase::SettledSuccess,
            (Some(SignInOutcome::Failure(_)), _, _) => {
                SignInPhase::SettledFailure(FieldScope::General)
            }
            (None, Some(_), _) => SignInPhase::SettledFailure(FieldScope::Email),
            (None, None, Some(_)) => SignInPhase::SettledFailure(FieldScope::Password),
            (None, None, None) => SignInPhase::Idle,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self.phase(),
            SignInPhase::SettledSuccess | SignInPhase::SettledFailure(_)
        )
    }

    /// At most one report slot is filled, and none while a submit is pending.
    pub fn is_consistent(&self) -> bool {
        let reports = [
            self.email_error.is_some(),
            self.password_error.is_some(),
            self.outcome.is_some(),
        ]
        .into_iter()
        .filter(|filled| *filled)
        .count();
        reports <= 1 && !(self.is_submitting && reports > 0)
    }

    pub fn on_email_changed(&self, text: impl Into<String>) -> Self {
        Self {
            email: Some(text.into()),
            email_error: None,
            outcome: None,
            ..self.clone()
        }
    }

    pub fn on_password_changed(&self, text: impl Into<String>) -> Self {
        Self {
            password: Some(text.into()),
            password_error: None,
            outcome: None,
            ..self.clone()
        }
    }

    pub fn submitting(&self) -> Self {
        Self {
            email: self.email.clone(),
            password: self.password.clone(),
            is_submitting: true,
            ..Self::initial()
        }
    }

    /// Classified against `self`, not the state at submit time: a field error
    /// lands next to whatever email/password was typed while the call ran.
    pub fn settle(&self, result: Result<UserProfile, RemoteError>) -> Self {
        match result {
            Ok(profile) => Self {
                email: self.email.clone(),
                password: self.password.clone(),
                outcome: Some(SignInOutcome::Success(profile)),
                ..Self::initial()
            },
            Err(error) => error_classifier::classify(error, self),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduction {
    Replace(SignInState),
    Submit {
        interim: SignInState,
        email: String,
        password: String,
    },
    /// A submit arrived while another one is still pending; nothing changes.
    Ignore,
}

pub fn reduce(state: &SignInState, event: SignInEvent) -> Reduction {
    match event {
        SignInEvent::EmailChanged(text) => Reduction::Replace(state.on_email_changed(text)),
        SignInEvent::PasswordChanged(text) => Reduction::Replace(state.on_password_changed(text)),
        SignInEvent::SubmitRequested if state.is_submitting => Reduction::Ignore,
        SignInEvent::SubmitRequested => Reduction::Submit {
            interim: state.submitting(),
            email: state.email.clone().unwrap_or_default(),
            password: state.password.clone().unwrap_or_default(),
        },
    }
}

enum Command {
    Event(SignInEvent),
    Settled(Result<UserProfile, RemoteError>),
}

/// Handle to a running sign-in actor.
///
/// There is no timeout or cancellation for the gateway call. Dropping the
/// handle stops the actor once the queue drains; a call still in flight keeps
/// it alive until the gateway returns, and nobody observes that final state.
pub struct SignInMachine {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SignInState>,
    states: broadcast::Sender<SignInState>,
}

impl SignInMachine {
    pub fn spawn(gateway: Arc<dyn AuthGateway>) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshots) = watch::channel(SignInState::initial());
        let (states, _) = broadcast::channel(STATE_BROADCAST_CAPACITY);

        let actor = SignInActor {
            gateway,
            state: SignInState::initial(),
            completions: commands.downgrade(),
            snapshots: snapshot_tx,
            states: states.clone(),
        };
        tokio::spawn(actor.run(command_rx));

        Self {
            commands,
            snapshots,
            states,
        }
    }

    pub fn dispatch(&self, event: SignInEvent) {
        if self.commands.send(Command::Event(event)).is_err() {
            debug!("sign-in actor stopped; event dropped");
        }
    }

    pub fn email_changed(&self, text: impl Into<String>) {
        self.dispatch(SignInEvent::EmailChanged(text.into()));
    }

    pub fn password_changed(&self, text: impl Into<String>) {
        self.dispatch(SignInEvent::PasswordChanged(text.into()));
    }

    pub fn submit(&self) {
        self.dispatch(SignInEvent::SubmitRequested);
    }

    pub fn current(&self) -> SignInState {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SignInState> {
        self.states.subscribe()
    }
}

struct SignInActor {
    gateway: Arc<dyn AuthGateway>,
    state: SignInState,
    completions: mpsc::WeakUnboundedSender<Command>,
    snapshots: watch::Sender<SignInState>,
    states: broadcast::Sender<SignInState>,
}

impl SignInActor {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            match command {
                Command::Event(event) => self.apply(event),
                Command::Settled(result) => {
                    let next = self.state.settle(result);
                    info!(phase = ?next.phase(), "sign-in settled");
                    self.publish(next);
                }
            }
        }
        debug!("sign-in actor finished");
    }

    fn apply(&mut self, event: SignInEvent) {
        match reduce(&self.state, event) {
            Reduction::Replace(next) => self.publish(next),
            Reduction::Ignore => debug!("sign-in already in flight; submit ignored"),
            Reduction::Submit {
                interim,
                email,
                password,
            } => {
                self.publish(interim);
                let Some(completions) = self.completions.upgrade() else {
                    return;
                };
                let gateway = self.gateway.clone();
                tokio::spawn(async move {
                    let result = gateway.sign_in(&email, &password).await;
                    if completions.send(Command::Settled(result)).is_err() {
                        debug!("sign-in actor stopped; gateway result discarded");
                    }
                });
            }
        }
    }

    fn publish(&mut self, next: SignInState) {
        debug_assert!(next.is_consistent(), "inconsistent sign-in state: {next:?}");
        self.state = next;
        self.snapshots.send_replace(self.state.clone());
        // No subscribers is fine; the snapshot still tracks the latest state.
        let _ = self.states.send(self.state.clone());
    }
}

#[cfg(test)]
#[path = "tests/sign_in_tests.rs"]
mod tests;
