pub mod load;
pub mod save;
pub mod types;

pub use types::{
    Config, DateCopierSettings, ExtensionFilter, Language, MAX_RECENT_PATHS, MotionSettings,
    RedaterSettings, RenamerSettings, ToolSettings, UserSettings,
};
