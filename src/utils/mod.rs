pub mod layout;
pub mod list_navigation;
pub mod path;
pub mod style;
pub mod text;
pub mod text_input;

pub use layout::{center_popup, create_standard_layout};
pub use list_navigation::{ListStateExt, DEFAULT_PAGE_SIZE};
pub use path::{get_config_dir, get_config_path, get_data_dir, get_log_dir};
pub use style::{
    disabled_border_style, disabled_text_style, focused_border_style, input_placeholder_style,
    input_text_style, unfocused_border_style,
};
pub use text::{short_hash, truncate, TITLE_LIMIT};
pub use text_input::TextInput;
