pub mod db;
pub mod notify;
pub mod scheduler;
pub mod security;
