//! Client-side logic for the notes workspace: the sign-in flow and the
//! workspace view model.

pub mod auth_gateway;
pub mod error_classifier;
pub mod session;
pub mod sign_in;
pub mod view;

pub use auth_gateway::{AuthGateway, HttpAuthGateway};
pub use error_classifier::{classify, FieldScope};
pub use session::SessionGateway;
pub use sign_in::{
    reduce, Reduction, SignInEvent, SignInMachine, SignInOutcome, SignInPhase, SignInState,
};
pub use view::{ViewIndex, ViewParamsBuilder, ViewTree, ViewTreeError};
