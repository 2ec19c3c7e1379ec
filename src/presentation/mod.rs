pub mod console;
pub mod display;
pub mod menus;

pub use console::{Console, Prompt};
pub use display::{format_duration, print_page, print_result_entry, print_search_summary};
pub use menus::{App, MainMenuChoice, PageCommand};
