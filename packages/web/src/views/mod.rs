mod home;
pub use home::Home;

mod sign_up;
pub use sign_up::SignUp;
