mod client;
pub mod google;
pub mod octopus;
pub mod provider;
pub mod sheets;
pub mod telegram;
