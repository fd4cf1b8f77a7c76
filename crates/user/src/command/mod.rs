use std::ops::Deref;

mod authenticate;
mod avatar;
mod password;
mod register;

pub use authenticate::AuthenticateInput;
pub use avatar::AvatarInput;
pub use password::SetPasswordInput;
pub use register::RegisterInput;

#[derive(Clone)]
pub struct Command(foodgram_shared::State);

impl Deref for Command {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self(state)
    }
}
