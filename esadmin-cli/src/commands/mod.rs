pub mod flush;
pub mod settings;
pub mod shards;

pub use flush::run_flush;
pub use settings::run_settings;
pub use shards::run_shards;
