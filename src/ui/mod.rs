pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, success, warn};
pub use table::{
    metrics_table, outcome_table, program_table, stats_table, stories_table, tags_table,
};
pub use theme::{err_theme, theme, Theme};
