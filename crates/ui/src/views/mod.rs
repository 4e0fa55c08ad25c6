mod learn;
mod login;
mod menu;
mod register;
mod state;

pub use learn::{GameOutcome, LearnView};
pub use login::LoginView;
pub use menu::MenuView;
pub use register::RegisterView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
