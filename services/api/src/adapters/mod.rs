pub mod db;
pub mod demo;

pub use db::DbAdapter;
pub use demo::DemoAdapter;
