pub mod category_id;
pub mod db;
pub mod quiz;
pub mod server;
pub mod settings;
pub mod telemetry;
