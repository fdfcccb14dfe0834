pub mod db;
pub mod tags;
