//! Authentication use cases
//!
//! Sign-in, sign-out and session lookup on top of the domain `AuthService`.

mod get_current_user;
mod login_user;
mod logout_user;

pub use get_current_user::GetCurrentUserUseCase;
pub use login_user::{LoginOutcome, LoginUserCommand, LoginUserResponse, LoginUserUseCase};
pub use logout_user::LogoutUserUseCase;
