pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const SEED: &str = "🌱";
    pub const EXPORT: &str = "📤";
    pub const IMPORT: &str = "📥";
}
