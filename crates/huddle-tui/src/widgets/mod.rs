// TUI widget modules for each panel.

pub mod clear_confirm;
pub mod header;
pub mod help_bar;
pub mod members;
pub mod team_count;
pub mod teams;
pub mod text_input;
