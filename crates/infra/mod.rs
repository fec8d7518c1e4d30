pub mod alerts;
pub mod db;
