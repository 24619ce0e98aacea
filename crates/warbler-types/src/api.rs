use serde::Deserialize;

// Form bodies, posted as application/x-www-form-urlencoded.

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NewMessageForm {
    pub text: String,
}
