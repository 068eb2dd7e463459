pub mod components;
pub mod home;
pub mod layout;
pub mod login;
pub mod signup;

pub use home::home;
pub use layout::{base, base_with_user};
pub use login::{login, login_form};
pub use signup::{signup, signup_form};
