pub mod clients;
pub mod forms;
pub mod ids;
pub mod notifications;
pub mod session;
