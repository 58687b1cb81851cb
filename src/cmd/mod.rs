pub mod add;
pub mod complete;
pub mod config_cmd;
pub mod list;
pub mod path;
pub mod validate;
