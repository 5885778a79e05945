pub mod commits;
pub mod dialog;
pub mod files;
pub mod help;
pub mod styles;
