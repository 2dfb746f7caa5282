mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    HttpAuthGateway, SessionGateway, SignInMachine, SignInOutcome, SignInPhase, SignInState,
    ViewParamsBuilder,
};
use shared::{domain::ViewType, error::RemoteException, protocol::CreateViewRequest, wire};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides `server_url` from the config file and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true, default_value = "client.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    CreateView {
        #[arg(long)]
        belong_to: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        desc: String,
        #[arg(long)]
        thumbnail: Option<String>,
        #[arg(long, value_enum, default_value_t = ViewKind::Doc)]
        view_type: ViewKind,
        /// Print hex-encoded protobuf instead of JSON.
        #[arg(long)]
        wire: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewKind {
    Blank,
    Doc,
}

impl From<ViewKind> for ViewType {
    fn from(value: ViewKind) -> Self {
        match value {
            ViewKind::Blank => ViewType::Blank,
            ViewKind::Doc => ViewType::Doc,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match args.command {
        Command::SignIn { email, password } => {
            sign_in(&settings.server_url, email, password).await
        }
        Command::CreateView {
            belong_to,
            name,
            desc,
            thumbnail,
            view_type,
            wire: as_protobuf,
        } => {
            let params = ViewParamsBuilder::build(CreateViewRequest {
                belong_to_id: belong_to,
                name,
                description: desc,
                thumbnail,
                view_type: view_type.into(),
            });
            if as_protobuf {
                println!("{}", hex::encode(wire::encode_create_view_params(&params)));
            } else {
                println!("{}", serde_json::to_string_pretty(&params)?);
            }
            Ok(())
        }
    }
}

async fn sign_in(server_url: &str, email: String, password: String) -> Result<()> {
    let http = HttpAuthGateway::new(server_url)?;
    info!(server_url = http.server_url(), "signing in");

    let machine = SignInMachine::spawn(Arc::new(SessionGateway::new(Arc::new(http))));
    let mut states = machine.subscribe();
    machine.email_changed(email);
    machine.password_changed(password);
    machine.submit();

    loop {
        let state = states.recv().await?;
        if state.phase() == SignInPhase::Submitting {
            println!("Signing in...");
        }
        if state.is_settled() {
            return report(&state);
        }
    }
}

fn report(state: &SignInState) -> Result<()> {
    if let Some(message) = &state.email_error {
        bail!("email: {message}");
    }
    if let Some(message) = &state.password_error {
        bail!("password: {message}");
    }
    match &state.outcome {
        Some(SignInOutcome::Success(profile)) => {
            println!(
                "Signed in as {} <{}> (user_id={})",
                profile.name, profile.email, profile.id
            );
            Ok(())
        }
        Some(SignInOutcome::Failure(error)) => {
            let exception = RemoteException::from(error.clone());
            Err(anyhow::Error::new(exception).context("sign-in failed"))
        }
        None => bail!("sign-in settled without a result"),
    }
}

#[cfg(test)]
mod tests {
    use shared::{
        domain::UserId,
        error::{ErrorCode, RemoteError},
        protocol::UserProfile,
    };

    use super::*;

    #[test]
    fn general_failure_reports_the_remote_error() {
        let state = SignInState {
            outcome: Some(SignInOutcome::Failure(RemoteError::new(
                ErrorCode::ServerUnavailable,
                "maintenance",
            ))),
            ..SignInState::initial()
        };

        let err = report(&state).expect_err("failure");
        assert_eq!(
            format!("{err:#}"),
            "sign-in failed: ServerUnavailable: maintenance"
        );
        let remote = err.downcast_ref::<RemoteException>().expect("remote exception");
        assert_eq!(remote.code, ErrorCode::ServerUnavailable);
    }

    #[test]
    fn field_errors_name_the_field() {
        let state = SignInState {
            password_error: Some("too short".into()),
            ..SignInState::initial()
        };
        assert_eq!(
            report(&state).expect_err("failure").to_string(),
            "password: too short"
        );
    }

    #[test]
    fn success_is_ok() {
        let state = SignInState {
            outcome: Some(SignInOutcome::Success(UserProfile {
                id: UserId::from("u-1"),
                email: "a@b.com".into(),
                name: "Alice".into(),
                token: "t".into(),
            })),
            ..SignInState::initial()
        };
        assert!(report(&state).is_ok());
    }
}
