pub mod fade_steps;
pub mod faq_steps;
pub mod server_steps;
